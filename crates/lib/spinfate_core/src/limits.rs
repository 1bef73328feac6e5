//! Per-client rate limits.
//!
//! Two policies share the same check-then-act shape:
//!
//! - **spins**: at most `limit` accepted spins per client key per UTC day,
//!   counted in `ip_limits`;
//! - **segment requests**: one accepted request per client key every
//!   `cooldown` days, tracked in `request_limits`.
//!
//! The check and the counter update are separate statements with no lock
//! between them, so two concurrent requests from one key can both pass the
//! check. Counting is best-effort.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[cfg(feature = "native")]
use sqlx::SqlitePool;

#[cfg(feature = "native")]
use crate::db::StoreError;

/// Spins allowed per client per day.
pub const DEFAULT_DAILY_SPIN_LIMIT: i64 = 3;

/// Days between accepted segment requests from one client.
pub const DEFAULT_REQUEST_COOLDOWN_DAYS: i64 = 30;

/// UTC calendar day a timestamp belongs to.
pub fn utc_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Spin allowance for a client on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpinUsage {
    pub used: i64,
    pub remaining: i64,
    pub limit: i64,
}

impl SpinUsage {
    pub fn new(used: i64, limit: i64) -> Self {
        Self {
            used,
            remaining: (limit - used).max(0),
            limit,
        }
    }

    /// No spins left today.
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Usage after one more accepted spin.
    pub fn after_spin(&self) -> Self {
        Self::new(self.used + 1, self.limit)
    }

    /// Message for a rejected spin.
    pub fn limit_message(&self) -> String {
        format!(
            "You have already spun {}x today. Come back tomorrow!",
            self.limit
        )
    }
}

/// Segment request eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cooldown {
    Ready,
    Waiting { days_left: i64 },
}

impl Cooldown {
    /// Eligibility given the last accepted request date.
    ///
    /// A `cooldown_days` of zero or less disables the policy.
    pub fn check(last: Option<NaiveDate>, today: NaiveDate, cooldown_days: i64) -> Self {
        let Some(last) = last else {
            return Cooldown::Ready;
        };
        if cooldown_days <= 0 {
            return Cooldown::Ready;
        }
        // A last date after today (clock change) counts as today.
        let elapsed = (today - last).num_days().max(0);
        if elapsed < cooldown_days {
            Cooldown::Waiting {
                days_left: cooldown_days - elapsed,
            }
        } else {
            Cooldown::Ready
        }
    }

    /// Message for a rejected request.
    pub fn message(days_left: i64) -> String {
        format!("You can request a new segment in {days_left} day(s).")
    }
}

/// Current spin usage for `key` on `day`. Read-only.
#[cfg(feature = "native")]
pub async fn spin_usage(
    pool: &SqlitePool,
    key: &str,
    day: NaiveDate,
    limit: i64,
) -> Result<SpinUsage, StoreError> {
    let used = sqlx::query_scalar::<_, i64>(
        "SELECT spin_count FROM ip_limits WHERE ip = ? AND date = ?",
    )
    .bind(key)
    .bind(day)
    .fetch_optional(pool)
    .await?
    .unwrap_or(0);
    Ok(SpinUsage::new(used, limit))
}

/// Count one spin for `key` on `day` (insert with 1 or increment).
#[cfg(feature = "native")]
pub async fn record_spin(pool: &SqlitePool, key: &str, day: NaiveDate) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO ip_limits (ip, date, spin_count) VALUES (?, ?, 1) \
         ON CONFLICT (ip, date) DO UPDATE SET spin_count = spin_count + 1",
    )
    .bind(key)
    .bind(day)
    .execute(pool)
    .await?;
    Ok(())
}

/// Date of the last accepted segment request for `key`.
#[cfg(feature = "native")]
pub async fn last_request_date(
    pool: &SqlitePool,
    key: &str,
) -> Result<Option<NaiveDate>, StoreError> {
    let day = sqlx::query_scalar::<_, NaiveDate>("SELECT last_req FROM request_limits WHERE ip = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(day)
}

/// Set the last accepted segment request date for `key` (insert or overwrite).
#[cfg(feature = "native")]
pub async fn record_request(pool: &SqlitePool, key: &str, day: NaiveDate) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO request_limits (ip, last_req) VALUES (?, ?) \
         ON CONFLICT (ip) DO UPDATE SET last_req = excluded.last_req",
    )
    .bind(key)
    .bind(day)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Days;

    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn remaining_floors_at_zero() {
        assert_eq!(SpinUsage::new(0, 3).remaining, 3);
        assert_eq!(SpinUsage::new(3, 3).remaining, 0);
        assert_eq!(SpinUsage::new(7, 3).remaining, 0);
        assert!(SpinUsage::new(3, 3).is_exhausted());
        assert!(!SpinUsage::new(2, 3).is_exhausted());
    }

    #[test]
    fn after_spin_counts_one_more() {
        let usage = SpinUsage::new(1, 3).after_spin();
        assert_eq!(usage, SpinUsage::new(2, 3));
        assert_eq!(usage.remaining, 1);
    }

    #[test]
    fn utc_day_ignores_time_of_day() {
        let late = DateTime::parse_from_rfc3339("2026-03-01T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(utc_day(late), day("2026-03-01"));
    }

    #[test]
    fn cooldown_without_history_is_ready() {
        assert_eq!(Cooldown::check(None, day("2026-01-01"), 30), Cooldown::Ready);
    }

    #[test]
    fn cooldown_boundaries() {
        let first = day("2026-01-01");
        let at = |n| first.checked_add_days(Days::new(n)).unwrap();
        assert_eq!(
            Cooldown::check(Some(first), first, 30),
            Cooldown::Waiting { days_left: 30 }
        );
        assert_eq!(
            Cooldown::check(Some(first), at(29), 30),
            Cooldown::Waiting { days_left: 1 }
        );
        assert_eq!(Cooldown::check(Some(first), at(30), 30), Cooldown::Ready);
        assert_eq!(Cooldown::check(Some(first), at(31), 30), Cooldown::Ready);
    }

    #[test]
    fn future_last_request_waits_full_cooldown() {
        let today = day("2026-01-01");
        let tomorrow = day("2026-01-02");
        assert_eq!(
            Cooldown::check(Some(tomorrow), today, 30),
            Cooldown::Waiting { days_left: 30 }
        );
    }

    #[test]
    fn zero_cooldown_disables_policy() {
        let d = day("2026-01-01");
        assert_eq!(Cooldown::check(Some(d), d, 0), Cooldown::Ready);
    }

    #[cfg(feature = "native")]
    mod store {
        use super::*;
        use crate::db::open_pool_in_memory;

        #[tokio::test]
        async fn fourth_spin_of_the_day_is_rejected() {
            let pool = open_pool_in_memory().await.unwrap();
            let today = day("2026-05-05");
            let mut remaining = Vec::new();

            for _ in 0..3 {
                let usage = spin_usage(&pool, "198.51.100.7", today, 3).await.unwrap();
                assert!(!usage.is_exhausted());
                record_spin(&pool, "198.51.100.7", today).await.unwrap();
                let after = spin_usage(&pool, "198.51.100.7", today, 3).await.unwrap();
                assert_eq!(after.remaining, usage.remaining - 1);
                remaining.push(after.remaining);
            }
            assert_eq!(remaining, vec![2, 1, 0]);

            let fourth = spin_usage(&pool, "198.51.100.7", today, 3).await.unwrap();
            assert!(fourth.is_exhausted());
            assert_eq!(fourth.remaining, 0);
        }

        #[tokio::test]
        async fn counters_are_per_key_and_per_day() {
            let pool = open_pool_in_memory().await.unwrap();
            let today = day("2026-05-05");
            let tomorrow = day("2026-05-06");
            for _ in 0..3 {
                record_spin(&pool, "a", today).await.unwrap();
            }
            assert_eq!(spin_usage(&pool, "a", today, 3).await.unwrap().used, 3);
            assert_eq!(spin_usage(&pool, "b", today, 3).await.unwrap().used, 0);
            assert_eq!(spin_usage(&pool, "a", tomorrow, 3).await.unwrap().used, 0);
        }

        #[tokio::test]
        async fn status_read_does_not_mutate() {
            let pool = open_pool_in_memory().await.unwrap();
            let today = day("2026-05-05");
            for _ in 0..5 {
                spin_usage(&pool, "a", today, 3).await.unwrap();
            }
            assert_eq!(spin_usage(&pool, "a", today, 3).await.unwrap().used, 0);
        }

        #[tokio::test]
        async fn request_cooldown_round_trip() {
            let pool = open_pool_in_memory().await.unwrap();
            let first = day("2026-01-01");
            assert_eq!(last_request_date(&pool, "k").await.unwrap(), None);

            record_request(&pool, "k", first).await.unwrap();
            let last = last_request_date(&pool, "k").await.unwrap();
            assert_eq!(last, Some(first));

            let day29 = first.checked_add_days(Days::new(29)).unwrap();
            assert_eq!(
                Cooldown::check(last, day29, 30),
                Cooldown::Waiting { days_left: 1 }
            );

            let day30 = first.checked_add_days(Days::new(30)).unwrap();
            assert_eq!(Cooldown::check(last, day30, 30), Cooldown::Ready);
            record_request(&pool, "k", day30).await.unwrap();
            assert_eq!(last_request_date(&pool, "k").await.unwrap(), Some(day30));
        }
    }
}
