use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use lms_db::repositories::activity;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiState, error::ApiError, gamification::service};

/// Create the activity log routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users/{user_id}/activities", post(log_activity))
        .route("/users/{user_id}/activities", get(get_activities))
}

#[derive(Debug, Deserialize, Validate)]
struct LogActivityRequest {
    #[validate(length(min = 1, max = 50, message = "activity_type must be 1-50 characters"))]
    activity_type: String,
    details: Option<serde_json::Value>,
}

/// Record one activity log entry
async fn log_activity(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<LogActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    service::require_user(&state.pool, user_id).await?;

    let row = activity::insert(
        &state.pool,
        user_id,
        &payload.activity_type,
        payload.details.as_ref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Activity logged successfully", "activity": row })),
    ))
}

#[derive(Debug, Deserialize)]
struct ActivityQuery {
    activity_type: Option<String>,
    page: Option<i64>,
    per_page: Option<i64>,
}

/// Page through a user's activity log, newest first
async fn get_activities(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let activity_type = query.activity_type.as_deref();

    let activities = activity::list(
        &state.pool,
        user_id,
        activity_type,
        per_page,
        (page - 1) * per_page,
    )
    .await?;
    let total = activity::count(&state.pool, user_id, activity_type).await?;

    Ok(Json(json!({
        "activities": activities,
        "total_activities": total,
        "pages": (total + per_page - 1) / per_page,
        "current_page": page,
    })))
}
