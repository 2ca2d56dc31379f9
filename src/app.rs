use std::panic;
use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::repos::PgTokenRepository;
use crate::services::token_manager::{BcryptHasher, TokenGenerator, TokenManager};
use crate::state::AppState;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");
        default_hook(info);
    }));
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    init_panic_hook();

    let config = Config::load()?;

    if config.https {
        tracing::warn!("jwt config requests https, but TLS termination is out of scope for this build; serving plain HTTP");
    }

    tracing::info!(addr = %config.addr, "starting token-manager");

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind listener");
            AppError::Internal
        })?;

    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!(error = %e, "server exited with error");
        AppError::Internal
    })?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let pool = PgPoolOptions::new()
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to database");
            AppError::Internal
        })?;

    state_from_pool(pool, config.jwt_key.clone(), &config.access_ttl, &config.refresh_ttl)
}

fn state_from_pool(
    pool: PgPool,
    jwt_key: Vec<u8>,
    access_ttl: &str,
    refresh_ttl: &str,
) -> Result<AppState, AppError> {
    let repo = Arc::new(PgTokenRepository::new(pool));
    let generator = Arc::new(TokenGenerator);
    let hasher = Arc::new(BcryptHasher);

    let manager = TokenManager::new(repo, generator, hasher, jwt_key, access_ttl, refresh_ttl)
        .map_err(|e| {
            tracing::error!(error = %e, "invalid token manager configuration");
            AppError::Internal
        })?;

    Ok(AppState::new(Arc::new(manager)))
}

fn build_router(state: AppState) -> axum::Router {
    let router = axum::Router::new()
        .nest("/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::cors::apply(router);
    middleware::http::apply(router)
}

/// Builds a router over an already-migrated pool, bypassing config-file
/// loading and TCP bind. Used by the integration tests in `tests/` to
/// spawn a real server against a per-test Postgres database, the way
/// `auth`'s sibling example crates build theirs for their own test harnesses.
pub fn test_router(pool: PgPool, jwt_key: Vec<u8>, access_ttl: &str, refresh_ttl: &str) -> axum::Router {
    let state = state_from_pool(pool, jwt_key, access_ttl, refresh_ttl)
        .expect("test token manager configuration must be valid");
    build_router(state)
}
