//! Discord login flow and session endpoints.
//!
//! None of these handlers fail towards the browser: OAuth problems become a
//! redirect to the site root with an `error` query marker, and a bad or
//! missing cookie is simply "not logged in".

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::{HOST, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::Cookie;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use spinfate_core::input::{MAX_NAME_CHARS, trim_to};
use spinfate_core::session::Session;
use spinfate_core::token;

use super::caller_session;
use crate::AppState;
use crate::config::ApiConfig;
use crate::routes;
use crate::services::cookies::{clear_session_cookie, session_cookie, set_cookie_header};
use crate::services::discord::{self, DiscordError};

/// Callback error marker: the provider sent no code.
pub const ERROR_NO_CODE: &str = "no_code";
/// Callback error marker: the code did not yield an access token.
pub const ERROR_TOKEN_FAILED: &str = "token_failed";
/// Callback error marker: any other failure while logging in.
pub const ERROR_AUTH_FAILED: &str = "auth_failed";
/// Login error marker: OAuth is not configured.
pub const ERROR_LOGIN_UNAVAILABLE: &str = "login_unavailable";

/// Query parameters for the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// `GET /auth/me` response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Option<Session>,
}

/// Site origin (`scheme://host`) for redirects.
fn site_origin(config: &ApiConfig, headers: &HeaderMap) -> String {
    if let Some(base) = config.public_base_url.as_deref() {
        return base.trim_end_matches('/').to_string();
    }
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}")
}

/// `302 Found` to `location`, optionally setting a cookie.
fn found(location: &str, cookie: Option<Cookie<'static>>) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(LOCATION, value);
        }
        Err(_) => {
            headers.insert(LOCATION, HeaderValue::from_static("/"));
        }
    }
    if let Some(value) = cookie.as_ref().and_then(set_cookie_header) {
        headers.append(SET_COOKIE, value);
    }
    (StatusCode::FOUND, headers).into_response()
}

fn error_redirect(origin: &str, marker: &str) -> Response {
    found(&format!("{origin}/?error={marker}"), None)
}

/// `GET /auth/login`: redirect to the Discord authorization page.
pub async fn login_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = site_origin(&state.config, &headers);
    let Some(client_id) = state.config.discord_client_id.as_deref() else {
        warn!("login requested but DISCORD_CLIENT_ID is not set");
        return error_redirect(&origin, ERROR_LOGIN_UNAVAILABLE);
    };
    let redirect_uri = format!("{origin}{}", routes::GET_AUTH_CALLBACK);
    match discord::authorize_url(&state.config.discord_authorize_url, client_id, &redirect_uri) {
        Ok(url) => found(url.as_str(), None),
        Err(e) => {
            warn!("cannot build authorize url: {e}");
            error_redirect(&origin, ERROR_LOGIN_UNAVAILABLE)
        }
    }
}

/// `GET /auth/callback`: exchange the code, sign a session, set the cookie.
pub async fn callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let origin = site_origin(&state.config, &headers);
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return error_redirect(&origin, ERROR_NO_CODE);
    };
    let Some((client_id, client_secret)) = state.config.discord_credentials() else {
        warn!("oauth callback without discord credentials configured");
        return error_redirect(&origin, ERROR_AUTH_FAILED);
    };
    let Some(session_secret) = state.config.session_secret.as_deref() else {
        warn!("oauth callback without SESSION_SECRET configured");
        return error_redirect(&origin, ERROR_AUTH_FAILED);
    };
    let redirect_uri = format!("{origin}{}", routes::GET_AUTH_CALLBACK);
    let api_base = state.config.discord_api_base.as_str();

    let access_token = match discord::exchange_code(
        &state.http,
        api_base,
        client_id,
        client_secret,
        &code,
        &redirect_uri,
    )
    .await
    {
        Ok(t) => t,
        Err(DiscordError::MissingToken) => {
            warn!("discord token exchange returned no access token");
            return error_redirect(&origin, ERROR_TOKEN_FAILED);
        }
        Err(e) => {
            warn!("discord token exchange failed: {e}");
            return error_redirect(&origin, ERROR_AUTH_FAILED);
        }
    };

    let user = match discord::fetch_profile(&state.http, api_base, &access_token).await {
        Ok(u) => u,
        Err(e) => {
            warn!("discord profile fetch failed: {e}");
            return error_redirect(&origin, ERROR_AUTH_FAILED);
        }
    };

    let session = Session::new(
        user.id.clone(),
        trim_to(user.display_name(), MAX_NAME_CHARS),
        user.avatar_url(),
        Utc::now(),
    );
    let signed = match token::sign(&session, session_secret.as_bytes()) {
        Ok(t) => t,
        Err(e) => {
            warn!("session signing failed: {e}");
            return error_redirect(&origin, ERROR_AUTH_FAILED);
        }
    };

    info!(user_id = %session.id, username = %session.username, "discord login");
    found(&format!("{origin}/"), Some(session_cookie(&signed)))
}

/// `GET /auth/me`: current session, or `{"user": null}`.
pub async fn me_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<MeResponse> {
    Json(MeResponse {
        user: caller_session(&state, &headers, Utc::now()),
    })
}

/// `GET /auth/logout`: clear the cookie and go home.
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = site_origin(&state.config, &headers);
    found(&format!("{origin}/"), Some(clear_session_cookie()))
}
