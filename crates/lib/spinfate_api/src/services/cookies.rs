//! Cookie service: build and clear the httpOnly session cookie.

use axum::http::HeaderValue;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use spinfate_core::cookies::encode_cookie_value;
use spinfate_core::session::{SESSION_COOKIE, SESSION_TTL_SECS};

fn base_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Session cookie holding a signed token (percent-encoded).
pub fn session_cookie(token: &str) -> Cookie<'static> {
    let mut cookie = base_cookie(encode_cookie_value(token));
    cookie.set_max_age(Duration::seconds(SESSION_TTL_SECS));
    cookie
}

/// Expired, empty session cookie.
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = base_cookie(String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// Render a cookie as a `Set-Cookie` header value.
pub fn set_cookie_header(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}
