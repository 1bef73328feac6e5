//! Segment request submission.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use spinfate_core::input::{field_text, parse_body, request_text};
use spinfate_core::limits::{self, Cooldown, utc_day};
use spinfate_core::notify::request_payload;
use spinfate_core::requests::insert_segment_request;
use spinfate_core::session::Identity;

use super::{caller_key, caller_session};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::services::webhook;

/// `POST /spins/request` response.
#[derive(Debug, Serialize)]
pub struct RequestAccepted {
    pub ok: bool,
}

/// `POST /spins/request` (alias `POST /request`).
///
/// Body: `{"name"?: string, "requestText": string}`. A cooldown of zero days
/// turns the per-client limit off; the last request date is still recorded.
pub async fn submit_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<RequestAccepted>> {
    let now = Utc::now();
    let key = caller_key(&headers);
    let today = utc_day(now);
    let cooldown_days = state.config.request_cooldown_days;

    if cooldown_days > 0 {
        let last = limits::last_request_date(&state.pool, &key).await?;
        if let Cooldown::Waiting { days_left } = Cooldown::check(last, today, cooldown_days) {
            debug!(client = %key, days_left, "segment request rejected, cooling down");
            return Err(AppError::LimitReached {
                message: Cooldown::message(days_left),
                days_left: Some(days_left),
            });
        }
    }

    let body = parse_body(&body);
    let session = caller_session(&state, &headers, now);
    let identity = Identity::resolve(session.as_ref(), field_text(&body, "name").as_deref());

    let text = request_text(field_text(&body, "requestText").as_deref())
        .ok_or_else(|| AppError::Validation("Request cannot be empty".into()))?;

    insert_segment_request(&state.pool, &identity.name, &text, now).await?;
    limits::record_request(&state.pool, &key, today).await?;

    info!(client = %key, name = %identity.name, "segment request recorded");

    webhook::dispatch_if_configured(
        &state.http,
        state.config.request_webhook_url.as_deref(),
        || request_payload(&identity.name, identity.avatar.as_deref(), &text, now),
    );

    Ok(Json(RequestAccepted { ok: true }))
}
