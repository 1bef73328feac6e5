//! Spin endpoints: leaderboard, daily allowance, result submission.
//!
//! The allowance check and the counter update are separate statements, so two
//! concurrent submissions from one client can both pass the check. That window
//! is accepted.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use spinfate_core::input::{field_text, parse_body};
use spinfate_core::limits::{self, SpinUsage, utc_day};
use spinfate_core::notify::spin_payload;
use spinfate_core::segments::Segment;
use spinfate_core::session::Identity;
use spinfate_core::spins::{self, LEADERBOARD_SIZE, SpinRecord};

use super::{caller_key, caller_session};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::services::webhook;

/// `GET /spins` response.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub results: Vec<SpinRecord>,
}

/// `POST /spins` response.
#[derive(Debug, Serialize)]
pub struct SpinAccepted {
    pub ok: bool,
    pub remaining: i64,
    pub name: String,
}

/// `GET /spins`: the most recent spins, newest first.
pub async fn leaderboard_handler(
    State(state): State<AppState>,
) -> AppResult<Json<LeaderboardResponse>> {
    let results = spins::recent_spins(&state.pool, LEADERBOARD_SIZE).await?;
    Ok(Json(LeaderboardResponse { results }))
}

/// `GET /spins/status`: today's allowance for the caller. Read-only.
pub async fn spin_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<SpinUsage>> {
    let key = caller_key(&headers);
    let today = utc_day(Utc::now());
    let usage =
        limits::spin_usage(&state.pool, &key, today, state.config.daily_spin_limit).await?;
    Ok(Json(usage))
}

/// `POST /spins`: record a landed spin.
///
/// Body: `{"name"?: string, "result": string}`. The name is ignored for
/// logged-in callers.
pub async fn submit_spin_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<SpinAccepted>> {
    let now = Utc::now();
    let key = caller_key(&headers);
    let today = utc_day(now);

    let usage =
        limits::spin_usage(&state.pool, &key, today, state.config.daily_spin_limit).await?;
    if usage.is_exhausted() {
        debug!(client = %key, used = usage.used, "spin rejected, daily limit reached");
        return Err(AppError::LimitReached {
            message: usage.limit_message(),
            days_left: None,
        });
    }

    let body = parse_body(&body);
    let session = caller_session(&state, &headers, now);
    let identity = Identity::resolve(session.as_ref(), field_text(&body, "name").as_deref());

    let result: Segment = field_text(&body, "result")
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| AppError::Validation("Invalid data".into()))?;

    spins::insert_spin(
        &state.pool,
        &identity.name,
        identity.avatar.as_deref(),
        result,
        now,
    )
    .await?;
    limits::record_spin(&state.pool, &key, today).await?;

    let remaining = usage.after_spin().remaining;
    info!(
        client = %key,
        name = %identity.name,
        result = %result,
        remaining,
        "spin recorded"
    );

    webhook::dispatch_if_configured(
        &state.http,
        state.config.spin_webhook_url.as_deref(),
        || spin_payload(&identity.name, identity.avatar.as_deref(), result, remaining, now),
    );

    Ok(Json(SpinAccepted {
        ok: true,
        remaining,
        name: identity.name,
    }))
}
