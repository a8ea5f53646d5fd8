//! Key-value table interface used by the repos and the account orchestrator.
use async_trait::async_trait;
use serde_json::Value;

use crate::repos::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A minimal key-value table interface.
///
/// Items are JSON objects keyed by a primary key inside a named table.
/// This is intentionally small and condition-oriented:
/// - record creation only needs "put if absent" (collision-checked ids),
/// - the dashboards list only needs an atomic append and a plain replace.
///
/// `list_replace` deliberately carries NO version check. The removal flow
/// is a read-modify-write in the caller and the last writer wins; callers
/// relying on it must not assume lost updates are impossible.
///
/// Implementations are injected as `Arc<dyn TableStore>` so tests can
/// substitute an in-memory double with the same conditional semantics.
#[async_trait]
pub trait TableStore: Send + Sync {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get a whole item. `Ok(None)` when the key is absent.
    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Value>>;

    // Create an item only if the key does not exist.
    //
    // Returns:
    // - `Ok(true)`  if the item was created
    // - `Ok(false)` if the key already exists (collision)
    async fn put_item_if_absent(&self, table: &str, key: &str, item: &Value) -> StoreResult<bool>;

    // Atomically append one value to a list attribute of an existing item.
    // A missing attribute is treated as an empty list before the append.
    //
    // Returns `Ok(false)` when the item itself does not exist.
    async fn list_append(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<bool>;

    // Replace a list attribute of an existing item wholesale, leaving the
    // other attributes untouched. Last writer wins.
    //
    // Returns `Ok(false)` when the item itself does not exist.
    async fn list_replace(
        &self,
        table: &str,
        key: &str,
        field: &str,
        values: &Value,
    ) -> StoreResult<bool>;
}
