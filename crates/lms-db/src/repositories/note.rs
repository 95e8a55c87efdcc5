use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::NoteRow;

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    resource_id: Option<i64>,
    title: &str,
    content: &str,
    tags: Option<&serde_json::Value>,
) -> Result<NoteRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO notes (user_id, resource_id, title, content, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, resource_id, title, content, tags, is_favorite, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(resource_id)
    .bind(title)
    .bind(content)
    .bind(tags)
    .fetch_one(executor)
    .await
}

pub async fn list<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<NoteRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, resource_id, title, content, tags, is_favorite, created_at, updated_at
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count<'e, E>(executor: E, user_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM notes WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}
