use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Badge, EarnedBadge};

const CATALOG_COLUMNS: &str =
    "id, name, description, icon, color, category, condition_kind, condition_value, \
     is_active, created_at";

/// All badge definitions currently eligible for granting.
pub async fn all_active<'e, E>(executor: E) -> Result<Vec<Badge>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "SELECT {CATALOG_COLUMNS} FROM badges WHERE is_active ORDER BY id"
    ))
    .fetch_all(executor)
    .await
}

/// Ids of badges already granted to the user.
pub async fn granted_ids<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT badge_id
            FROM user_badges
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Insert a grant row; the unique constraint makes a duplicate a no-op.
pub async fn grant<'e, E>(executor: E, user_id: Uuid, badge_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_badges (user_id, badge_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, badge_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(badge_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// All badges granted to the user, with their definitions.
pub async fn earned<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<EarnedBadge>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT b.id, b.name, b.description, b.icon, b.color, b.category,
                   b.condition_kind, b.condition_value, b.is_active, b.created_at,
                   ub.earned_at
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            ORDER BY ub.earned_at DESC
        "#,
    )
    .bind(user_id)
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
            SELECT COUNT(*) FROM user_badges WHERE user_id = $1
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
            SELECT COUNT(*) FROM badges WHERE is_active
        "#,
    )
    .fetch_one(executor)
    .await
}
