/*
 * Responsibility
 * - userEvents テーブル向けの型付き操作
 * - append-only な監査イベントの create-only 書き込み
 */
use serde::{Deserialize, Serialize};

use crate::repos::error::StoreError;
use crate::repos::store::TableStore;

/// Enumerated audit event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "accessedAccount")]
    AccessedAccount,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::AccessedAccount => write!(f, "accessedAccount"),
        }
    }
}

/// An immutable audit event. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "eventType")]
    pub event_type: EventType,
    #[serde(rename = "eventOccurredAt")]
    pub event_occurred_at: i64,
    /// Open-ended additional attributes, stored alongside the fixed ones.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// Create-only conditional write keyed by the fresh event id; `Ok(false)`
// means the id collided with an existing event.
pub async fn create(
    store: &dyn TableStore,
    table: &str,
    event: &UserEvent,
) -> Result<bool, StoreError> {
    let item = serde_json::to_value(event).map_err(|e| StoreError::InvalidItem(e.to_string()))?;

    store.put_item_if_absent(table, &event.event_id, &item).await
}
