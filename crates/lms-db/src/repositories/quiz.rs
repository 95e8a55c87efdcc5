use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::QuizAttemptRow;

/// Record a completed quiz attempt.
pub async fn insert_attempt<'e, E>(
    executor: E,
    user_id: Uuid,
    quiz_id: i64,
    score: f64,
    max_score: f64,
    percentage: f64,
    time_taken_minutes: Option<i32>,
) -> Result<QuizAttemptRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO quiz_attempts (user_id, quiz_id, score, max_score, percentage, time_taken_minutes, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, user_id, quiz_id, score, max_score, percentage, time_taken_minutes, started_at, completed_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(max_score)
    .bind(percentage)
    .bind(time_taken_minutes)
    .fetch_one(executor)
    .await
}

pub async fn count_attempts<'e, E>(executor: E, user_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Mean percentage across all the user's attempts; 0 when there are none.
pub async fn average_percentage<'e, E>(executor: E, user_id: Uuid) -> Result<f64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COALESCE(AVG(percentage), 0.0)
            FROM quiz_attempts
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
}
