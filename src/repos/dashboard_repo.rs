/*
 * Responsibility
 * - dashboards テーブル向けの型付き操作
 * - 新規 dashboard record の create-only 書き込み
 */
use serde::{Deserialize, Serialize};

use crate::repos::error::StoreError;
use crate::repos::store::TableStore;

/// A dashboard record keyed by its generated id.
///
/// Ownership lives on the user side (the `dashboards` list); removing the
/// reference there does not delete this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRecord {
    #[serde(rename = "dashboardID")]
    pub dashboard_id: String,
    #[serde(rename = "dashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

// Create-only conditional write: `Ok(false)` means the id already exists.
// Collision retries are the caller's responsibility.
pub async fn create(
    store: &dyn TableStore,
    table: &str,
    record: &DashboardRecord,
) -> Result<bool, StoreError> {
    let item = serde_json::to_value(record).map_err(|e| StoreError::InvalidItem(e.to_string()))?;

    store
        .put_item_if_absent(table, &record.dashboard_id, &item)
        .await
}
