/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS/Trace など)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::repos::ValkeyTableStore;
use crate::services::accounts::{AccountService, EventWriter};
use crate::services::auth::{AuthProviderClient, TokenVerifier};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,account_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Build process-level services here and inject them into the shared
    // application state. No globals: everything is passed down explicitly.
    let store = Arc::new(
        ValkeyTableStore::new(&config.store_url)
            .await
            .context("failed to connect to the record store")?,
    );

    let verifier = Arc::new(TokenVerifier::new(
        &config.jwt_signing_key,
        config.jwt_leeway_seconds,
    ));

    let provider = AuthProviderClient::new(
        reqwest::Client::new(),
        config.auth_service_login_url.clone(),
        config.auth_service_create_user_url.clone(),
        config.auth_service_refresh_url.clone(),
        config.auth_service_jwt.clone(),
    );

    let events = EventWriter::new(store.clone(), config.user_events_table.clone());

    let accounts = Arc::new(AccountService::new(
        store,
        provider,
        events,
        config.users_table.clone(),
        config.dashboards_table.clone(),
    ));

    Ok(AppState::new(verifier, accounts))
}

fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(config))
        .with_state(state)
}

fn build_cors(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
