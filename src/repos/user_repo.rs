/*
 * Responsibility
 * - users テーブル向けの型付き操作
 * - TableStore を受け取り read / dashboards 更新を提供
 * - store エラーは StoreError のまま上位 (orchestrator) に返す
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repos::error::StoreError;
use crate::repos::store::TableStore;

/// A user record as stored in the users table.
///
/// Records are created by the external auth authority and mirrored here;
/// this service only ever mutates the `dashboards` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(default)]
    pub dashboards: Vec<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

pub async fn get(
    store: &dyn TableStore,
    table: &str,
    user_id: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let item = match store.get_item(table, user_id).await? {
        Some(item) => item,
        None => return Ok(None),
    };

    let record: UserRecord = serde_json::from_value(item)
        .map_err(|e| StoreError::InvalidItem(format!("user {}: {}", user_id, e)))?;

    Ok(Some(record))
}

// Atomic append; a missing dashboards attribute starts as an empty list.
// Safe under concurrent appends to the same user.
pub async fn append_dashboard(
    store: &dyn TableStore,
    table: &str,
    user_id: &str,
    dashboard_id: &str,
) -> Result<bool, StoreError> {
    store
        .list_append(table, user_id, "dashboards", &Value::String(dashboard_id.to_string()))
        .await
}

// Whole-list replacement, computed by the caller. No version check: two
// concurrent replacements race and the last writer wins.
pub async fn replace_dashboards(
    store: &dyn TableStore,
    table: &str,
    user_id: &str,
    dashboards: &[String],
) -> Result<bool, StoreError> {
    let values = serde_json::to_value(dashboards)
        .map_err(|e| StoreError::InvalidItem(e.to_string()))?;

    store.list_replace(table, user_id, "dashboards", &values).await
}
