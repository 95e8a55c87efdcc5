use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::UserActivityRow;

/// Activity types the achievement metrics count.
pub const LEARNING_PATH_COMPLETED: &str = "learning_path_completed";
pub const RESOURCE_VIEWED: &str = "resource_viewed";

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    activity_type: &str,
    details: Option<&serde_json::Value>,
) -> Result<UserActivityRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_activity (user_id, activity_type, details)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, activity_type, details, created_at
        "#,
    )
    .bind(user_id)
    .bind(activity_type)
    .bind(details)
    .fetch_one(executor)
    .await
}

/// Page through a user's activity log, newest first, optionally filtered by
/// activity type.
pub async fn list<'e, E>(
    executor: E,
    user_id: Uuid,
    activity_type: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserActivityRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, activity_type, details, created_at
            FROM user_activity
            WHERE user_id = $1 AND ($2::varchar IS NULL OR activity_type = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(activity_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count<'e, E>(
    executor: E,
    user_id: Uuid,
    activity_type: Option<&str>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM user_activity
            WHERE user_id = $1 AND ($2::varchar IS NULL OR activity_type = $2)
        "#,
    )
    .bind(user_id)
    .bind(activity_type)
    .fetch_one(executor)
    .await
}
