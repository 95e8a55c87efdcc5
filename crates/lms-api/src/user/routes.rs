use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use lms_db::repositories::user;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiState, error::ApiError};

/// Create the user routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", delete(delete_user))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 3, max = 100, message = "username must be 3-100 characters"))]
    username: String,
    #[validate(email(message = "email must be a valid address"))]
    email: String,
}

/// Create a new user
async fn create_user(
    State(state): State<ApiState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match user::create(&state.pool, &payload.username, &payload.email).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(json!({ "user": created })))),
        Err(sqlx::Error::Database(db_err))
            if matches!(
                db_err.constraint(),
                Some("users_username_key" | "users_email_key")
            ) =>
        {
            Err(ApiError::Validation(
                "username or email is already taken".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a user by id
async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {id}")))?;
    Ok(Json(json!({ "user": found })))
}

/// Delete a user; all gamification rows cascade with the account
async fn delete_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = user::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("user {id}")));
    }
    Ok(Json(json!({ "message": "User deleted successfully", "id": id })))
}
