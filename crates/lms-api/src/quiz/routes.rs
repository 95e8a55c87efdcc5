use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use lms_db::models::PointCategory;
use lms_db::repositories::{achievement, quiz};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, gamification::service};

/// Create the quiz attempt routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/users/{user_id}/quiz-attempts", post(submit_attempt))
}

#[derive(Debug, Deserialize)]
struct SubmitAttemptRequest {
    quiz_id: i64,
    score: f64,
    max_score: f64,
    time_taken_minutes: Option<i32>,
}

/// Record a completed quiz attempt and run the gamification hooks.
///
/// The attempt feeds the `quizzes_completed` and `average_quiz_score`
/// metrics, earns quiz points scaled by the result, counts as a day of
/// learning activity, and triggers achievement and badge checks.
async fn submit_attempt(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.score < 0.0 || payload.max_score < 0.0 {
        return Err(ApiError::Validation(
            "score and max_score must be non-negative".to_string(),
        ));
    }
    if payload.score > payload.max_score {
        return Err(ApiError::Validation(
            "score cannot exceed max_score".to_string(),
        ));
    }
    service::require_user(&state.pool, user_id).await?;

    let percentage = if payload.max_score > 0.0 {
        payload.score / payload.max_score * 100.0
    } else {
        0.0
    };

    let attempt = quiz::insert_attempt(
        &state.pool,
        user_id,
        payload.quiz_id,
        payload.score,
        payload.max_score,
        percentage,
        payload.time_taken_minutes,
    )
    .await?;

    let granted_before: HashSet<i64> = achievement::granted_ids(&state.pool, user_id)
        .await?
        .into_iter()
        .collect();

    // One point per 10% scored.
    let points = (percentage / 10.0).round() as i64;
    service::award_points(&state.pool, user_id, points, PointCategory::Quiz).await?;

    // Streak touch re-runs the achievement checks for us.
    let level = service::touch_streak(&state.pool, user_id, Utc::now().date_naive()).await?;
    let newly_earned_badges = service::check_badges(&state.pool, user_id).await?;

    let newly_earned_achievements: Vec<_> = achievement::earned(&state.pool, user_id)
        .await?
        .into_iter()
        .filter(|e| !granted_before.contains(&e.achievement.id))
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "attempt": attempt,
            "points_awarded": points,
            "level": level,
            "newly_earned_achievements": newly_earned_achievements,
            "newly_earned_badges": newly_earned_badges,
        })),
    ))
}
