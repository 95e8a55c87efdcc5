use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{activity, gamification, note, quiz, state::ApiState, user};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(user::routes::routes())
        .merge(gamification::routes::routes())
        .merge(activity::routes::routes())
        .merge(quiz::routes::routes())
        .merge(note::routes::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
