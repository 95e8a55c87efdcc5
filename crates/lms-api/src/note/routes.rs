use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use lms_db::repositories::note;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiState, error::ApiError, gamification::service};

/// Create the note routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users/{user_id}/notes", post(create_note))
        .route("/users/{user_id}/notes", get(get_notes))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    title: String,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    content: String,
    resource_id: Option<i64>,
    tags: Option<serde_json::Value>,
}

/// Create a note; notes feed the `notes_created` achievement metric
async fn create_note(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    service::require_user(&state.pool, user_id).await?;

    let row = note::insert(
        &state.pool,
        user_id,
        payload.resource_id,
        &payload.title,
        &payload.content,
        payload.tags.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "note": row }))))
}

#[derive(Debug, Deserialize)]
struct NoteQuery {
    page: Option<i64>,
    per_page: Option<i64>,
}

/// Page through a user's notes, newest first
async fn get_notes(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<NoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let notes = note::list(&state.pool, user_id, per_page, (page - 1) * per_page).await?;
    let total = note::count(&state.pool, user_id).await?;

    Ok(Json(json!({
        "notes": notes,
        "total_notes": total,
        "pages": (total + per_page - 1) / per_page,
        "current_page": page,
    })))
}
