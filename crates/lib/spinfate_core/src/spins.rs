//! Spin results and the leaderboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::StoreError;
use crate::segments::Segment;

/// Number of records returned by the leaderboard.
pub const LEADERBOARD_SIZE: i64 = 50;

/// A stored spin result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinRecord {
    pub name: String,
    pub avatar: Option<String>,
    /// Segment label. Kept as text so rows written under an older segment set
    /// still render.
    pub result: String,
    pub created_at: DateTime<Utc>,
}

/// Append a spin result.
pub async fn insert_spin(
    pool: &SqlitePool,
    name: &str,
    avatar: Option<&str>,
    result: Segment,
    created_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO spins (name, avatar, result, created_at) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(avatar)
        .bind(result.label())
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Most recent spins, newest first.
pub async fn recent_spins(pool: &SqlitePool, limit: i64) -> Result<Vec<SpinRecord>, StoreError> {
    let rows = sqlx::query_as::<_, (String, Option<String>, String, DateTime<Utc>)>(
        "SELECT name, avatar, result, created_at FROM spins ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(name, avatar, result, created_at)| SpinRecord {
            name,
            avatar,
            result,
            created_at,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::db::open_pool_in_memory;

    #[tokio::test]
    async fn later_spin_is_listed_first() {
        let pool = open_pool_in_memory().await.unwrap();
        let t0 = Utc::now();
        insert_spin(&pool, "first", None, Segment::Lucky, t0)
            .await
            .unwrap();
        insert_spin(
            &pool,
            "second",
            Some("https://cdn.example/a.png"),
            Segment::Clown,
            t0 + Duration::seconds(1),
        )
        .await
        .unwrap();

        let rows = recent_spins(&pool, LEADERBOARD_SIZE).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "second");
        assert_eq!(rows[0].result, "CLOWN");
        assert_eq!(rows[0].avatar.as_deref(), Some("https://cdn.example/a.png"));
        assert_eq!(rows[1].name, "first");
        assert_eq!(rows[1].avatar, None);
    }

    #[tokio::test]
    async fn same_timestamp_still_orders_by_insertion() {
        let pool = open_pool_in_memory().await.unwrap();
        let t = Utc::now();
        for name in ["a", "b", "c"] {
            insert_spin(&pool, name, None, Segment::Genius, t).await.unwrap();
        }
        let names: Vec<_> = recent_spins(&pool, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn leaderboard_is_capped() {
        let pool = open_pool_in_memory().await.unwrap();
        let t = Utc::now();
        for i in 0..(LEADERBOARD_SIZE + 5) {
            insert_spin(&pool, &format!("p{i}"), None, Segment::Legend, t)
                .await
                .unwrap();
        }
        let rows = recent_spins(&pool, LEADERBOARD_SIZE).await.unwrap();
        assert_eq!(rows.len() as i64, LEADERBOARD_SIZE);
        assert_eq!(rows[0].name, format!("p{}", LEADERBOARD_SIZE + 4));
    }
}
