use chrono::NaiveDate;
use lms_progression::{LeaderboardCategory, LeaderboardKind, Period};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{LeaderboardRow, RankedScore};

/// Advisory lock key for one (kind, category) leaderboard.
///
/// The discriminant packing only needs to be collision-free across the nine
/// combinations and stable across processes.
fn advisory_key(kind: LeaderboardKind, category: LeaderboardCategory) -> i64 {
    const CLASS: i64 = 0x4C45_4144; // "LEAD"
    let kind_idx = kind as i64;
    let category_idx = category as i64;
    (CLASS << 16) | (kind_idx << 8) | category_idx
}

/// Take a transaction-scoped advisory lock serializing rebuilds of one
/// leaderboard key. Released automatically at commit or rollback.
pub async fn lock_key<'e, E>(
    executor: E,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            SELECT pg_advisory_xact_lock($1)
        "#,
    )
    .bind(advisory_key(kind, category))
    .execute(executor)
    .await?;
    Ok(())
}

/// Drop every entry for one (kind, category, period_start) key.
pub async fn delete_key<'e, E>(
    executor: E,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
    period_start: NaiveDate,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM leaderboard_entries
            WHERE kind = $1 AND category = $2 AND period_start = $3
        "#,
    )
    .bind(kind.as_str())
    .bind(category.as_str())
    .bind(period_start)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Bulk-insert freshly ranked entries, assigning rank 1..N by position.
pub async fn insert_entries<'e, E>(
    executor: E,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
    period: Period,
    ranked: &[RankedScore],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if ranked.is_empty() {
        return Ok(());
    }

    let user_ids: Vec<Uuid> = ranked.iter().map(|r| r.user_id).collect();
    let scores: Vec<i64> = ranked.iter().map(|r| r.score).collect();
    let ranks: Vec<i32> = (1..=ranked.len() as i32).collect();

    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO leaderboard_entries (user_id, kind, category, score, rank, period_start, period_end)
            SELECT t.user_id, $4, $5, t.score, t.rank, $6, $7
            FROM UNNEST($1::uuid[], $2::bigint[], $3::int[]) AS t(user_id, score, rank)
        "#,
    )
    .bind(&user_ids)
    .bind(&scores)
    .bind(&ranks)
    .bind(kind.as_str())
    .bind(category.as_str())
    .bind(period.start)
    .bind(period.end)
    .execute(executor)
    .await?;
    Ok(())
}

/// The top entries for one leaderboard key, joined with usernames.
pub async fn top<'e, E>(
    executor: E,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
    period_start: NaiveDate,
    limit: i64,
) -> Result<Vec<LeaderboardRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT le.rank, le.score, le.user_id, u.username, le.period_start, le.period_end
            FROM leaderboard_entries le
            JOIN users u ON u.id = le.user_id
            WHERE le.kind = $1 AND le.category = $2 AND le.period_start = $3
            ORDER BY le.rank ASC
            LIMIT $4
        "#,
    )
    .bind(kind.as_str())
    .bind(category.as_str())
    .bind(period_start)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// One user's rank on a leaderboard key, if ranked at all.
pub async fn position<'e, E>(
    executor: E,
    user_id: Uuid,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
    period_start: NaiveDate,
) -> Result<Option<i32>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT rank
            FROM leaderboard_entries
            WHERE user_id = $1 AND kind = $2 AND category = $3 AND period_start = $4
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(category.as_str())
    .bind(period_start)
    .fetch_optional(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_keys_are_distinct() {
        let mut keys = Vec::new();
        for kind in LeaderboardKind::ALL {
            for category in LeaderboardCategory::ALL {
                keys.push(advisory_key(kind, category));
            }
        }
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }
}
