//! # spinfate_api
//!
//! HTTP API library for Spin of Fate.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::Router;
use axum::routing::{get, post};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, method_not_allowed, not_found, requests, spins};

/// Route paths.
pub mod routes {
    pub const GET_HEALTH: &str = "/health";
    pub const GET_AUTH_LOGIN: &str = "/auth/login";
    pub const GET_AUTH_CALLBACK: &str = "/auth/callback";
    pub const GET_AUTH_ME: &str = "/auth/me";
    pub const GET_AUTH_LOGOUT: &str = "/auth/logout";
    pub const SPINS: &str = "/spins";
    pub const GET_SPINS_STATUS: &str = "/spins/status";
    pub const POST_SPINS_REQUEST: &str = "/spins/request";
    pub const POST_REQUEST: &str = "/request";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool.
    pub pool: SqlitePool,
    /// API configuration.
    pub config: ApiConfig,
    /// Outbound HTTP client (OAuth and webhooks).
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ApiConfig) -> Self {
        Self {
            pool,
            config,
            http: reqwest::Client::new(),
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `spinfate_core::db::migrate()` which owns the migration files.
pub async fn migrate(pool: &SqlitePool) -> Result<(), spinfate_core::db::StoreError> {
    spinfate_core::db::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            routes::GET_HEALTH,
            get(health::health_handler).fallback(method_not_allowed),
        )
        .route(
            routes::GET_AUTH_LOGIN,
            get(auth::login_handler).fallback(method_not_allowed),
        )
        .route(
            routes::GET_AUTH_CALLBACK,
            get(auth::callback_handler).fallback(method_not_allowed),
        )
        .route(
            routes::GET_AUTH_ME,
            get(auth::me_handler).fallback(method_not_allowed),
        )
        .route(
            routes::GET_AUTH_LOGOUT,
            get(auth::logout_handler).fallback(method_not_allowed),
        )
        .route(
            routes::SPINS,
            get(spins::leaderboard_handler)
                .post(spins::submit_spin_handler)
                .fallback(method_not_allowed),
        )
        .route(
            routes::GET_SPINS_STATUS,
            get(spins::spin_status_handler).fallback(method_not_allowed),
        )
        .route(
            routes::POST_SPINS_REQUEST,
            post(requests::submit_request_handler).fallback(method_not_allowed),
        )
        .route(
            routes::POST_REQUEST,
            post(requests::submit_request_handler).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
