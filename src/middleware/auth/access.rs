//! 認証ゲート: jwt / Authorization ヘッダの検証 → AuthCtx を extensions に入れる
//!
//! - 検証に失敗したら 401 で short-circuit し、下流 handler は実行されない。
//! - 成功したら AuthCtx (user_id + 生トークン) を request extensions に格納する。
//! - protected な route の手前に必ず掛けること。順序はセキュリティ上の不変条件。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::TokenVerifier;
use crate::state::AppState;

/// protected な sub-router に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = protected_routes();
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // 専用の `jwt` ヘッダ、なければ標準の Authorization ヘッダを受け付ける
    let raw = req
        .headers()
        .get("jwt")
        .or_else(|| req.headers().get(header::AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let claims = match state.verifier.verify(raw) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // refresh が上流へ転送するため、scheme を剥いだ生トークンも持ち回る
    let auth_ctx = AuthCtx::new(claims.user_id, TokenVerifier::strip_scheme(raw).to_string());

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
