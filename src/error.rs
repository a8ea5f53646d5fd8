/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - AuthError / AccountError を統一的に変換 (内部詳細は leak しない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::accounts::AccountError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("conflict: {code}")]
    Conflict { code: &'static str },
    /// Dashboard registered to the user, record creation failed. Exposed
    /// with its own code so callers can retry/reconcile.
    #[error("dashboard registration incomplete")]
    RegistrationIncomplete { dashboard_id: String },
    #[error("auth provider failure")]
    UpstreamFailure,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "invalid credentials".into(),
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Conflict { code } => (StatusCode::CONFLICT, code, "conflict".into()),
            AppError::RegistrationIncomplete { dashboard_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "REGISTRATION_INCOMPLETE",
                format!("dashboard {dashboard_id} was registered but its record is missing"),
            ),
            AppError::UpstreamFailure => (
                StatusCode::BAD_GATEWAY,
                "AUTH_PROVIDER_FAILURE",
                "auth provider failure".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::AccountExists => AppError::Conflict {
                code: "ACCOUNT_EXISTS",
            },
            // Upstream detail was already logged where it happened.
            AuthError::ProviderFailure => AppError::UpstreamFailure,
        }
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::UserNotFound => AppError::not_found("user"),
            AccountError::IdCollision(_) => AppError::Conflict {
                code: "ID_COLLISION",
            },
            AccountError::DashboardRecordIncomplete { dashboard_id, .. } => {
                AppError::RegistrationIncomplete { dashboard_id }
            }
            AccountError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                AppError::Internal
            }
        }
    }
}
