use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use lms_db::models::PointCategory;
use lms_db::repositories::{achievement, badge, user_level};
use lms_progression::{LeaderboardCategory, LeaderboardKind, period_bounds, points_required};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiState, error::ApiError};

use super::model::{
    AchievementStatus, BadgeStatus, GamificationSummary, LeaderboardPage, LevelProgress,
    LevelProgressDetail,
};
use super::service;

/// Create the gamification routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users/{user_id}/gamification/profile", get(get_profile))
        .route(
            "/users/{user_id}/gamification/achievements",
            get(get_achievements),
        )
        .route("/users/{user_id}/gamification/badges", get(get_badges))
        .route(
            "/users/{user_id}/gamification/level-progress",
            get(get_level_progress),
        )
        .route(
            "/users/{user_id}/gamification/recent-achievements",
            get(get_recent_achievements),
        )
        .route("/users/{user_id}/gamification/stats", get(get_stats))
        .route("/users/{user_id}/gamification/points", post(award_points))
        .route("/users/{user_id}/gamification/streak", post(touch_streak))
        .route(
            "/users/{user_id}/gamification/achievements/check",
            post(check_achievements),
        )
        .route(
            "/users/{user_id}/gamification/badges/check",
            post(check_badges),
        )
        .route(
            "/gamification/leaderboard/{kind}/{category}",
            get(get_leaderboard),
        )
        .route(
            "/gamification/leaderboards/rebuild",
            post(rebuild_leaderboards),
        )
}

/// Get a user's complete gamification profile
async fn get_profile(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = service::get_user_stats(&state.pool, user_id).await?;
    Ok(Json(json!({ "profile": stats })))
}

#[derive(Debug, Deserialize, Validate)]
struct AwardPointsRequest {
    #[validate(range(min = 0, message = "points must be non-negative"))]
    points: i64,
    category: PointCategory,
}

/// Award points to a user
async fn award_points(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AwardPointsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let level =
        service::award_points(&state.pool, user_id, payload.points, payload.category).await?;
    Ok(Json(json!({ "level": level })))
}

#[derive(Debug, Default, Deserialize)]
struct TouchStreakRequest {
    /// Defaults to the current date when absent.
    date: Option<NaiveDate>,
}

/// Record a day of learning activity for the streak
async fn touch_streak(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    payload: Option<Json<TouchStreakRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let today = payload
        .and_then(|Json(p)| p.date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let level = service::touch_streak(&state.pool, user_id, today).await?;
    Ok(Json(json!({ "level": level })))
}

/// Evaluate and grant any newly met achievements
async fn check_achievements(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let newly_earned = service::check_achievements(&state.pool, user_id).await?;
    Ok(Json(json!({ "newly_earned": newly_earned })))
}

/// Evaluate and grant any newly met badges
async fn check_badges(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let newly_earned = service::check_badges(&state.pool, user_id).await?;
    Ok(Json(json!({ "newly_earned": newly_earned })))
}

/// Get the achievement catalog with the user's earned state and progress
async fn get_achievements(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;
    user_level::ensure(&state.pool, user_id).await?;
    let snapshot = user_level::find(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let definitions = achievement::all_active(&state.pool).await?;
    let earned: HashMap<i64, (DateTime<Utc>, i64)> = achievement::earned(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|e| (e.achievement.id, (e.earned_at, e.progress_value)))
        .collect();

    let mut cache = HashMap::new();
    let mut statuses = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let status = match earned.get(&definition.id) {
            Some(&(earned_at, progress_value)) => AchievementStatus {
                earned: true,
                earned_at: Some(earned_at),
                progress: progress_value as f64,
                progress_percentage: 100.0,
                achievement: definition,
            },
            None => {
                let progress = service::achievement_progress(
                    &state.pool,
                    user_id,
                    &snapshot,
                    definition.condition_metric,
                    &mut cache,
                )
                .await?;
                let percentage = if definition.condition_target > 0 {
                    (progress / definition.condition_target as f64 * 100.0).min(100.0)
                } else {
                    100.0
                };
                AchievementStatus {
                    earned: false,
                    earned_at: None,
                    progress,
                    progress_percentage: percentage,
                    achievement: definition,
                }
            }
        };
        statuses.push(status);
    }

    // Earned first, then by category and name.
    statuses.sort_by(|a, b| {
        b.earned
            .cmp(&a.earned)
            .then_with(|| a.achievement.category.cmp(&b.achievement.category))
            .then_with(|| a.achievement.name.cmp(&b.achievement.name))
    });

    Ok(Json(json!({ "achievements": statuses })))
}

/// Get the badge catalog with the user's earned state
async fn get_badges(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;

    let definitions = badge::all_active(&state.pool).await?;
    let earned: HashMap<i64, DateTime<Utc>> = badge::earned(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|e| (e.badge.id, e.earned_at))
        .collect();

    let mut statuses: Vec<BadgeStatus> = definitions
        .into_iter()
        .map(|definition| {
            let earned_at = earned.get(&definition.id).copied();
            BadgeStatus {
                earned: earned_at.is_some(),
                earned_at,
                badge: definition,
            }
        })
        .collect();

    statuses.sort_by(|a, b| {
        b.earned
            .cmp(&a.earned)
            .then_with(|| a.badge.category.cmp(&b.badge.category))
            .then_with(|| a.badge.name.cmp(&b.badge.name))
    });

    Ok(Json(json!({ "badges": statuses })))
}

/// Get detailed progress within the current level
async fn get_level_progress(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;
    user_level::ensure(&state.pool, user_id).await?;
    let level = user_level::find(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let current_level_points = points_required(level.current_level);
    let next_level_points = points_required(level.current_level + 1);
    let progress_in_level = level.total_points - current_level_points;
    let points_needed_for_level = next_level_points - current_level_points;
    let progress_percentage = if points_needed_for_level > 0 {
        (progress_in_level as f64 / points_needed_for_level as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    Ok(Json(LevelProgress {
        level_info: level,
        progress: LevelProgressDetail {
            current_level_points,
            next_level_points,
            progress_in_level,
            points_needed_for_level,
            progress_percentage,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<i64>,
}

/// Get the user's most recent achievements
async fn get_recent_achievements(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let recent = achievement::recent(&state.pool, user_id, limit).await?;
    Ok(Json(json!({ "recent_achievements": recent })))
}

/// Get headline gamification statistics for the user
async fn get_stats(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    service::require_user(&state.pool, user_id).await?;
    user_level::ensure(&state.pool, user_id).await?;
    let level = user_level::find(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let achievements_earned = achievement::count_granted(&state.pool, user_id).await?;
    let total_achievements = achievement::count_active(&state.pool).await?;
    let badges_earned = badge::count_granted(&state.pool, user_id).await?;
    let total_badges = badge::count_active(&state.pool).await?;

    let completion = |earned: i64, total: i64| {
        if total > 0 {
            earned as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };

    let leaderboard_positions =
        service::leaderboard_positions(&state.pool, user_id, Utc::now().date_naive()).await?;

    Ok(Json(json!({
        "stats": GamificationSummary {
            level: level.current_level,
            total_points: level.total_points,
            achievements_earned,
            total_achievements,
            achievement_completion_rate: completion(achievements_earned, total_achievements),
            badges_earned,
            total_badges,
            badge_completion_rate: completion(badges_earned, total_badges),
            current_streak: level.current_learning_streak,
            longest_streak: level.longest_learning_streak,
            leaderboard_positions,
        }
    })))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<i64>,
    /// When present, the response includes this user's own rank.
    user_id: Option<Uuid>,
}

/// Get a leaderboard page for the current period
async fn get_leaderboard(
    State(state): State<ApiState>,
    Path((kind, category)): Path<(LeaderboardKind, LeaderboardCategory)>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let period = period_bounds(kind, Utc::now().date_naive());

    let entries =
        lms_db::repositories::leaderboard::top(&state.pool, kind, category, period.start, limit)
            .await?;

    let user_position = match query.user_id {
        Some(user_id) => {
            lms_db::repositories::leaderboard::position(
                &state.pool,
                user_id,
                kind,
                category,
                period.start,
            )
            .await?
        }
        None => None,
    };

    Ok(Json(LeaderboardPage {
        total_entries: entries.len(),
        leaderboard: entries,
        user_position,
        kind,
        category,
        period_start: period.start,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct RebuildRequest {
    /// Defaults to the current date when absent.
    as_of: Option<NaiveDate>,
}

/// Recompute all leaderboards; intended for the periodic job or an operator
async fn rebuild_leaderboards(
    State(state): State<ApiState>,
    payload: Option<Json<RebuildRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let as_of = payload
        .and_then(|Json(p)| p.as_of)
        .unwrap_or_else(|| Utc::now().date_naive());

    service::rebuild_leaderboards(&state.pool, as_of).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Leaderboards rebuilt", "as_of": as_of })),
    ))
}
