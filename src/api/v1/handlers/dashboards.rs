/*
 * Responsibility
 * - dashboard 登録/削除の handler
 * - DTO validation → orchestrator 呼び出し → status/body の組み立て
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::dashboards::{RegisterDashboardRequest, RegisterDashboardResponse},
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    state::AppState,
};

pub async fn register_dashboard(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
    Json(req): Json<RegisterDashboardRequest>,
) -> Result<(StatusCode, Json<RegisterDashboardResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_DASHBOARD_REQUEST", msg))?;

    tracing::debug!(requester = %ctx.user_id, user_id = %user_id, "dashboard registration requested");

    let dashboard_id = state
        .accounts
        .register_new_dashboard(&user_id, &req.dashboard_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterDashboardResponse { dashboard_id }),
    ))
}

pub async fn remove_dashboard(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path((user_id, dashboard_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(requester = %ctx.user_id, user_id = %user_id, "dashboard removal requested");

    state
        .accounts
        .remove_dashboard(&user_id, &dashboard_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
