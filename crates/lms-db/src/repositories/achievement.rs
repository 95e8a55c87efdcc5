use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Achievement, EarnedAchievement};

const CATALOG_COLUMNS: &str = "id, name, description, icon, category, points, rarity, \
     condition_kind, condition_metric, condition_target, is_active, created_at";

/// All achievement definitions currently eligible for granting.
pub async fn all_active<'e, E>(executor: E) -> Result<Vec<Achievement>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "SELECT {CATALOG_COLUMNS} FROM achievements WHERE is_active ORDER BY id"
    ))
    .fetch_all(executor)
    .await
}

/// Ids of achievements already granted to the user.
pub async fn granted_ids<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT achievement_id
            FROM user_achievements
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Insert a grant row, relying on the unique constraint for at-most-once.
///
/// Returns `false` when the pair already existed (a concurrent check got
/// there first); the caller must then skip the point award.
pub async fn grant<'e, E>(
    executor: E,
    user_id: Uuid,
    achievement_id: i64,
    progress_value: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_achievements (user_id, achievement_id, progress_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(achievement_id)
    .bind(progress_value)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// All achievements granted to the user, with their definitions.
pub async fn earned<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<EarnedAchievement>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT a.id, a.name, a.description, a.icon, a.category, a.points, a.rarity,
                   a.condition_kind, a.condition_metric, a.condition_target, a.is_active, a.created_at,
                   ua.earned_at, ua.progress_value
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// The user's most recent grants, newest first.
pub async fn recent<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<EarnedAchievement>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT a.id, a.name, a.description, a.icon, a.category, a.points, a.rarity,
                   a.condition_kind, a.condition_metric, a.condition_target, a.is_active, a.created_at,
                   ua.earned_at, ua.progress_value
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at DESC
            LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn count_granted<'e, E>(executor: E, user_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM user_achievements WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn count_active<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM achievements WHERE is_active
        "#,
    )
    .fetch_one(executor)
    .await
}
