use chrono::NaiveDate;
use lms_progression::{LeaderboardCategory, LevelProgress};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{PointCategory, RankedScore, UserLevelRow};

const COLUMNS: &str = "user_id, current_level, total_points, points_to_next_level, \
     learning_points, quiz_points, achievement_points, social_points, \
     current_learning_streak, longest_learning_streak, last_activity_date, \
     created_at, updated_at";

/// Create the level row for a user if it does not exist yet.
///
/// Level rows are created lazily on the first gamification interaction, so
/// every mutating operation calls this first.
pub async fn ensure<'e, E>(executor: E, user_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_levels (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find<'e, E>(executor: E, user_id: Uuid) -> Result<Option<UserLevelRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM user_levels WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Fetch the level row with a row lock, serializing concurrent
/// read-modify-write cycles for the same user. Must run inside a transaction.
pub async fn lock<'e, E>(executor: E, user_id: Uuid) -> Result<UserLevelRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM user_levels WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Book awarded points on the category subtotal and the total, and store the
/// recalculated level position.
pub async fn apply_award<'e, E>(
    executor: E,
    user_id: Uuid,
    points: i64,
    category: PointCategory,
    progress: LevelProgress,
) -> Result<UserLevelRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        // language=PostgreSQL
        r#"
            UPDATE user_levels
            SET learning_points = learning_points + CASE WHEN $2 = 'learning' THEN $3 ELSE 0 END,
                quiz_points = quiz_points + CASE WHEN $2 = 'quiz' THEN $3 ELSE 0 END,
                achievement_points = achievement_points + CASE WHEN $2 = 'achievement' THEN $3 ELSE 0 END,
                social_points = social_points + CASE WHEN $2 = 'social' THEN $3 ELSE 0 END,
                total_points = total_points + $3,
                current_level = $4,
                points_to_next_level = $5,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(category.as_str())
    .bind(points)
    .bind(progress.level)
    .bind(progress.points_to_next)
    .fetch_one(executor)
    .await
}

/// Store the result of a streak transition.
pub async fn apply_streak<'e, E>(
    executor: E,
    user_id: Uuid,
    current: i32,
    longest: i32,
    last_activity: NaiveDate,
) -> Result<UserLevelRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(&format!(
        // language=PostgreSQL
        r#"
            UPDATE user_levels
            SET current_learning_streak = $2,
                longest_learning_streak = $3,
                last_activity_date = $4,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(current)
    .bind(longest)
    .bind(last_activity)
    .fetch_one(executor)
    .await
}

/// All users ranked by a leaderboard category's score.
///
/// Ties break by user id ascending so repeated rebuilds over unchanged data
/// assign identical ranks.
pub async fn rank_sources<'e, E>(
    executor: E,
    category: LeaderboardCategory,
    limit: i64,
) -> Result<Vec<RankedScore>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = match category {
        LeaderboardCategory::Points => {
            // language=PostgreSQL
            r#"
                SELECT user_id, total_points AS score
                FROM user_levels
                ORDER BY total_points DESC, user_id ASC
                LIMIT $1
            "#
        }
        LeaderboardCategory::Quizzes => {
            // language=PostgreSQL
            r#"
                SELECT user_id, quiz_points AS score
                FROM user_levels
                ORDER BY quiz_points DESC, user_id ASC
                LIMIT $1
            "#
        }
        LeaderboardCategory::Streak => {
            // language=PostgreSQL
            r#"
                SELECT user_id, longest_learning_streak::bigint AS score
                FROM user_levels
                ORDER BY longest_learning_streak DESC, user_id ASC
                LIMIT $1
            "#
        }
    };

    let rows: Vec<(Uuid, i64)> = sqlx::query_as(sql).bind(limit).fetch_all(executor).await?;
    Ok(rows
        .into_iter()
        .map(|(user_id, score)| RankedScore { user_id, score })
        .collect())
}
