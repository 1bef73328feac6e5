//! Segment requests submitted by players.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::StoreError;

/// Append a segment request.
pub async fn insert_segment_request(
    pool: &SqlitePool,
    name: &str,
    request: &str,
    created_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO segment_requests (name, request, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(request)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Number of stored segment requests.
pub async fn segment_request_count(pool: &SqlitePool) -> Result<i64, StoreError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM segment_requests")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Most recent segment requests as `(name, request)`, newest first.
pub async fn recent_segment_requests(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<(String, String)>, StoreError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT name, request FROM segment_requests ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
