/*
 * Responsibility
 * - login / createUser / getUser / refresh の handler
 * - Json/Path を extractor で受け、DTO validation → orchestrator 呼び出し
 * - 認証は middleware 側の責務。ここでは AuthCtx を受け取るだけ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::accounts::{
        CreateUserRequest, CreateUserResponse, LoginRequest, TokenResponse, UserResponse,
    },
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LOGIN_REQUEST", msg))?;

    let jwt = state.accounts.login(&req.email, &req.password).await?;

    Ok(Json(TokenResponse { jwt }))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER_REQUEST", msg))?;

    let descriptor = state
        .accounts
        .register_new_user(&req.email, &req.password, &req.first_name, &req.last_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user_id: descriptor.user_id,
        }),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    tracing::debug!(requester = %ctx.user_id, user_id = %user_id, "user record requested");

    let user = state.accounts.get_user(&user_id).await?;

    Ok(Json(UserResponse {
        user_id: user.user_id,
        first_name: user.first_name,
        dashboards: user.dashboards,
        subscriptions: user.subscriptions,
    }))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<TokenResponse>, AppError> {
    // ゲートを通過済みのトークンをそのまま上流へ転送する
    let jwt = state.accounts.refresh_token(&ctx.token).await?;

    Ok(Json(TokenResponse { jwt }))
}
