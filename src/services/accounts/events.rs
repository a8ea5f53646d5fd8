use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::repos::event_repo::{self, EventType, UserEvent};
use crate::repos::{StoreError, TableStore};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("missing required event field: {0}")]
    MissingField(&'static str),
    #[error("event id collision: {0}")]
    IdCollision(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Append-only audit event writer.
///
/// `put_event` is the strict entry point; `record_access_detached` is the
/// fire-and-forget wrapper used on the account-read path, where a failed
/// audit write must never fail the read.
#[derive(Clone)]
pub struct EventWriter {
    store: Arc<dyn TableStore>,
    table: String,
}

impl EventWriter {
    pub fn new(store: Arc<dyn TableStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Append one audit event.
    ///
    /// Mandatory fields are validated up front with a descriptive error;
    /// the event tag itself is enumerated so it cannot be empty. The write
    /// is create-only on a fresh time-ordered id, and a collision is
    /// reported to the caller instead of being retried here.
    pub async fn put_event(
        &self,
        user_id: &str,
        event_type: EventType,
        occurred_at: i64,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), EventError> {
        if user_id.trim().is_empty() {
            return Err(EventError::MissingField("userID"));
        }
        if occurred_at <= 0 {
            return Err(EventError::MissingField("eventOccurredAt"));
        }

        let event_id = Uuid::now_v7().to_string();
        let event = UserEvent {
            event_id: event_id.clone(),
            user_id: user_id.to_string(),
            event_type,
            event_occurred_at: occurred_at,
            extra,
        };

        let created = event_repo::create(self.store.as_ref(), &self.table, &event).await?;
        if !created {
            return Err(EventError::IdCollision(event_id));
        }

        Ok(())
    }

    /// Best-effort `accessedAccount` write, detached from the caller.
    ///
    /// The task is never joined with the caller's result; failures are
    /// logged and swallowed.
    pub fn record_access_detached(&self, user_id: &str) {
        let writer = self.clone();
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            let occurred_at = Utc::now().timestamp();
            if let Err(err) = writer
                .put_event(
                    &user_id,
                    EventType::AccessedAccount,
                    occurred_at,
                    serde_json::Map::new(),
                )
                .await
            {
                tracing::warn!(
                    user_id = %user_id,
                    error = %err,
                    "best-effort account-access event write failed"
                );
            }
        });
    }
}
