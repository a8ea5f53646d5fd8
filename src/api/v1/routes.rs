/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - login / users / dashboards を merge
 * - 認証が必要な範囲はここで middleware を適用する (ゲートの順序はここで固定)
 */
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    accounts::{create_user, get_user, login, refresh_token},
    dashboards::{register_dashboard, remove_dashboard},
    health::health,
};

pub fn routes(state: AppState) -> Router<AppState> {
    // 認証なしで到達できるのは login / createUser / health のみ
    let public = Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/users", post(create_user));

    let protected = Router::new()
        .route("/login/refresh", post(refresh_token))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/dashboards", post(register_dashboard))
        .route(
            "/users/{user_id}/dashboards/{dashboard_id}",
            delete(remove_dashboard),
        );
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
