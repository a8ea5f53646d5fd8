/**
 * Responsibility
 * - store/repo が上位に伝える意味の定義
 */
use thiserror::Error;

/// Store-layer errors (transport/command/item shape).
///
/// Kept independent from `AppError` so callers can decide how to fail
/// (fail the request for record reads, swallow-and-log for audit events).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    BackendConnection(String),
    #[error("store command error: {0}")]
    BackendCommand(String),
    #[error("store item error: {0}")]
    InvalidItem(String),
}
