//! Request handlers.

pub mod auth;
pub mod health;
pub mod requests;
pub mod spins;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use chrono::{DateTime, Utc};

use spinfate_core::client::{CONNECTING_IP_HEADER, FORWARDED_FOR_HEADER, client_key};
use spinfate_core::session::{Session, resolve_session};

use crate::AppState;
use crate::error::AppError;

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for unsupported methods on a known path.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Rate-limit key for the caller.
pub(crate) fn caller_key(headers: &HeaderMap) -> String {
    client_key(
        header_str(headers, CONNECTING_IP_HEADER),
        header_str(headers, FORWARDED_FOR_HEADER),
    )
}

/// All `Cookie` headers joined into one (HTTP/2 may split them).
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let parts: Vec<&str> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Caller's session, if the cookie is present and valid at `now`.
pub(crate) fn caller_session(
    state: &AppState,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Option<Session> {
    resolve_session(
        cookie_header(headers).as_deref(),
        state.config.session_secret.as_deref(),
        now.timestamp_millis(),
    )
}
