//! Sessions carried entirely in a signed cookie.
//!
//! Nothing is stored server-side: a session exists only as the payload of a
//! [`token`](crate::token) held by the browser. It is trusted for display
//! purposes only (name and avatar on the leaderboard).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cookies::cookie_value;
use crate::input::{MAX_NAME_CHARS, display_name, trim_to};
use crate::token;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sof_session";

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Identity payload of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity provider user id.
    pub id: String,
    pub username: String,
    /// Avatar image URL.
    pub avatar: String,
    /// Expiry, unix milliseconds.
    pub exp: i64,
}

impl Session {
    /// New session expiring [`SESSION_TTL_SECS`] after `now`.
    pub fn new(id: String, username: String, avatar: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            avatar,
            exp: (now + Duration::seconds(SESSION_TTL_SECS)).timestamp_millis(),
        }
    }

    /// Whether the session is past its expiry at `now_ms`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.exp
    }
}

/// Resolve the caller's session from a `Cookie` header.
///
/// `None` when the cookie is missing, no secret is configured, the
/// signature does not verify, or the session has expired.
pub fn resolve_session(
    cookie_header: Option<&str>,
    secret: Option<&str>,
    now_ms: i64,
) -> Option<Session> {
    let secret = secret.filter(|s| !s.is_empty())?;
    let raw = cookie_value(cookie_header?, SESSION_COOKIE)?;
    let Some(session) = token::verify::<Session>(&raw, secret.as_bytes()) else {
        debug!("session cookie failed verification");
        return None;
    };
    if session.is_expired(now_ms) {
        debug!(exp = session.exp, "session cookie expired");
        return None;
    }
    Some(session)
}

/// Display identity attached to a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub avatar: Option<String>,
}

impl Identity {
    /// Session identity if present, otherwise the cleaned guest name.
    ///
    /// Both names are capped at [`MAX_NAME_CHARS`].
    pub fn resolve(session: Option<&Session>, guest_name: Option<&str>) -> Self {
        match session {
            Some(s) if !s.username.trim().is_empty() => Self {
                name: trim_to(&s.username, MAX_NAME_CHARS),
                avatar: Some(s.avatar.clone()).filter(|a| !a.is_empty()),
            },
            _ => Self {
                name: display_name(guest_name),
                avatar: None,
            },
        }
    }
}
