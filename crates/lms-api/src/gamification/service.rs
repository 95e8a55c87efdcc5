//! The gamification facade.
//!
//! Orchestrates the point ledger, streak tracker, achievement and badge
//! evaluators, and the leaderboard builder. All operations are safe to
//! repeat: grants are guarded by unique constraints, streak touches are
//! idempotent per day, and leaderboard rebuilds replace their key wholesale.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use lms_db::models::{
    Achievement, Badge, BadgeConditionKind, Condition, MetricKind, PointCategory, UserLevelRow,
};
use lms_db::repositories::{achievement, activity, badge, leaderboard, note, quiz, user, user_level};
use lms_progression::{LeaderboardCategory, LeaderboardKind, Period, StreakState, period_bounds, progress_for};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::ApiError;
use crate::gamification::model::UserStats;
use crate::metrics;

/// Leaderboards keep the top 100 per (kind, category, period) key; everyone
/// below loses their row on rebuild.
const LEADERBOARD_SIZE: i64 = 100;

/// Award points to a user and recalculate their level.
///
/// Negative awards are rejected: the level curve only moves upward and the
/// category subtotals are non-negative by contract.
pub async fn award_points(
    pool: &PgPool,
    user_id: Uuid,
    points: i64,
    category: PointCategory,
) -> Result<UserLevelRow, ApiError> {
    if points < 0 {
        return Err(ApiError::Validation(format!(
            "point awards must be non-negative, got {points}"
        )));
    }
    require_user(pool, user_id).await?;

    let mut tx = pool.begin().await?;
    let updated = award_points_tx(&mut tx, user_id, points, category).await?;
    tx.commit().await?;

    Ok(updated)
}

/// The transactional body of a point award, shared with achievement grants so
/// a grant and its reward commit atomically.
///
/// The row lock serializes concurrent read-modify-write cycles on the same
/// user's level row.
async fn award_points_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    points: i64,
    category: PointCategory,
) -> Result<UserLevelRow, ApiError> {
    user_level::ensure(&mut **tx, user_id).await?;
    let current = user_level::lock(&mut **tx, user_id).await?;

    let progress = progress_for(current.total_points + points, current.current_level);
    let updated = user_level::apply_award(&mut **tx, user_id, points, category, progress).await?;

    if updated.current_level > current.current_level {
        tracing::info!(
            %user_id,
            from = current.current_level,
            to = updated.current_level,
            "user leveled up"
        );
    }
    metrics::record_points_awarded(category.as_str(), points);

    Ok(updated)
}

/// Record a day of learning activity and update the consecutive-day streak.
///
/// Repeated calls with the same date are no-ops. Streak achievements are
/// re-evaluated afterwards, so the returned row reflects any points those
/// grants awarded.
pub async fn touch_streak(
    pool: &PgPool,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<UserLevelRow, ApiError> {
    require_user(pool, user_id).await?;

    let mut tx = pool.begin().await?;
    user_level::ensure(&mut *tx, user_id).await?;
    let row = user_level::lock(&mut *tx, user_id).await?;

    let state = StreakState {
        current: row.current_learning_streak,
        longest: row.longest_learning_streak,
        last_activity: row.last_activity_date,
    };
    let next = state.advance(today);
    let mut updated =
        user_level::apply_streak(&mut *tx, user_id, next.current, next.longest, today).await?;
    tx.commit().await?;

    let newly_earned = check_achievements(pool, user_id).await?;
    if !newly_earned.is_empty() {
        // Pick up the points the grants just awarded.
        if let Some(fresh) = user_level::find(pool, user_id).await? {
            updated = fresh;
        }
    }

    Ok(updated)
}

/// Evaluate all active achievements for a user and grant the ones whose
/// criteria are met. Returns the newly granted definitions.
///
/// Metrics are computed against the level row as it stood when the call
/// started: points awarded by grants within this pass do not feed back into
/// later evaluations of the same pass, which keeps a single call from
/// cascading. The next scheduled check picks up anything newly satisfied.
pub async fn check_achievements(pool: &PgPool, user_id: Uuid) -> Result<Vec<Achievement>, ApiError> {
    require_user(pool, user_id).await?;
    user_level::ensure(pool, user_id).await?;
    let snapshot = user_level::find(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let definitions = achievement::all_active(pool).await?;
    let granted: HashSet<i64> = achievement::granted_ids(pool, user_id)
        .await?
        .into_iter()
        .collect();

    let mut cache = HashMap::new();
    let mut newly_earned = Vec::new();

    for definition in definitions {
        if granted.contains(&definition.id) {
            continue;
        }

        let condition = definition.condition()?;
        let progress =
            achievement_progress(pool, user_id, &snapshot, definition.condition_metric, &mut cache)
                .await?;

        let passed = match condition {
            Condition::Count { target, .. } => progress as i64 >= target,
            Condition::StreakDays { target } => progress as i32 >= target,
            Condition::AverageQuizScore { target } => progress >= target,
            Condition::TotalPoints { target } => progress as i64 >= target,
        };
        if !passed {
            continue;
        }

        // Grant and reward atomically. A concurrent check may have granted
        // the same pair already; the unique constraint decides, and a lost
        // race simply skips the reward.
        let mut tx = pool.begin().await?;
        let inserted =
            achievement::grant(&mut *tx, user_id, definition.id, progress as i64).await?;
        if !inserted {
            tx.rollback().await?;
            continue;
        }
        award_points_tx(&mut tx, user_id, definition.points, PointCategory::Achievement).await?;
        tx.commit().await?;

        tracing::info!(%user_id, achievement = %definition.name, "achievement earned");
        metrics::record_achievement_granted(definition.rarity.as_str());
        newly_earned.push(definition);
    }

    Ok(newly_earned)
}

/// Current value of an achievement metric for a user.
///
/// Streak and point metrics read the given snapshot; countable metrics query
/// their source tables, memoized per pass in `cache`.
pub(crate) async fn achievement_progress(
    pool: &PgPool,
    user_id: Uuid,
    snapshot: &UserLevelRow,
    metric: MetricKind,
    cache: &mut HashMap<MetricKind, f64>,
) -> Result<f64, ApiError> {
    if let Some(value) = cache.get(&metric) {
        return Ok(*value);
    }

    let value = match metric {
        MetricKind::LearningPathsCompleted => {
            activity::count(pool, user_id, Some(activity::LEARNING_PATH_COMPLETED)).await? as f64
        }
        MetricKind::ResourcesViewed => {
            activity::count(pool, user_id, Some(activity::RESOURCE_VIEWED)).await? as f64
        }
        MetricKind::QuizzesCompleted => quiz::count_attempts(pool, user_id).await? as f64,
        MetricKind::NotesCreated => note::count(pool, user_id).await? as f64,
        MetricKind::AverageQuizScore => quiz::average_percentage(pool, user_id).await?,
        MetricKind::LearningStreak => snapshot.current_learning_streak as f64,
        MetricKind::TotalPoints => snapshot.total_points as f64,
    };

    cache.insert(metric, value);
    Ok(value)
}

/// Evaluate all active badges for a user and grant the ones whose threshold
/// is met. Badges carry no point reward. Returns the newly granted badges.
pub async fn check_badges(pool: &PgPool, user_id: Uuid) -> Result<Vec<Badge>, ApiError> {
    require_user(pool, user_id).await?;
    user_level::ensure(pool, user_id).await?;
    let level = user_level::find(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let definitions = badge::all_active(pool).await?;
    let granted: HashSet<i64> = badge::granted_ids(pool, user_id)
        .await?
        .into_iter()
        .collect();
    let achievements_earned = achievement::count_granted(pool, user_id).await?;

    let mut newly_earned = Vec::new();
    for definition in definitions {
        if granted.contains(&definition.id) {
            continue;
        }

        let passed = match definition.condition_kind {
            BadgeConditionKind::Level => i64::from(level.current_level) >= definition.condition_value,
            BadgeConditionKind::Achievements => achievements_earned >= definition.condition_value,
            BadgeConditionKind::Points => level.total_points >= definition.condition_value,
        };
        if !passed {
            continue;
        }

        if badge::grant(pool, user_id, definition.id).await? {
            tracing::info!(%user_id, badge = %definition.name, "badge earned");
            metrics::record_badge_granted();
            newly_earned.push(definition);
        }
    }

    Ok(newly_earned)
}

/// Recompute every leaderboard for the periods containing `as_of`.
///
/// Each (kind, category) key is rebuilt independently; a failure in one key
/// aborts the run but never leaves a key half-populated.
pub async fn rebuild_leaderboards(pool: &PgPool, as_of: NaiveDate) -> Result<(), ApiError> {
    for kind in LeaderboardKind::ALL {
        let period = period_bounds(kind, as_of);
        for category in LeaderboardCategory::ALL {
            rebuild_leaderboard(pool, kind, category, period).await?;
        }
    }
    Ok(())
}

/// Replace one leaderboard key with freshly computed ranks.
///
/// The advisory lock serializes rebuilds of the same key; the surrounding
/// transaction means readers see either the old ranking or the new one,
/// never an empty window.
async fn rebuild_leaderboard(
    pool: &PgPool,
    kind: LeaderboardKind,
    category: LeaderboardCategory,
    period: Period,
) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;
    leaderboard::lock_key(&mut *tx, kind, category).await?;

    let ranked = user_level::rank_sources(&mut *tx, category, LEADERBOARD_SIZE).await?;
    leaderboard::delete_key(&mut *tx, kind, category, period.start).await?;
    leaderboard::insert_entries(&mut *tx, kind, category, period, &ranked).await?;
    tx.commit().await?;

    tracing::debug!(
        kind = kind.as_str(),
        category = category.as_str(),
        entries = ranked.len(),
        "leaderboard rebuilt"
    );
    metrics::record_leaderboard_rebuild(kind.as_str(), category.as_str());

    Ok(())
}

/// Read-only aggregate of a user's gamification state: level row, granted
/// achievements and badges, and current ranks across all nine leaderboards.
pub async fn get_user_stats(pool: &PgPool, user_id: Uuid) -> Result<UserStats, ApiError> {
    require_user(pool, user_id).await?;
    user_level::ensure(pool, user_id).await?;
    let level = user_level::find(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("level row for user {user_id}")))?;

    let achievements = achievement::earned(pool, user_id).await?;
    let badges = badge::earned(pool, user_id).await?;
    let leaderboard_positions =
        leaderboard_positions(pool, user_id, Utc::now().date_naive()).await?;

    Ok(UserStats {
        level,
        achievements,
        badges,
        leaderboard_positions,
    })
}

/// The user's rank on each of the nine leaderboards for the periods
/// containing `today`. Unranked combinations are absent from the map.
pub async fn leaderboard_positions(
    pool: &PgPool,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<BTreeMap<String, i32>, ApiError> {
    let mut positions = BTreeMap::new();
    for kind in LeaderboardKind::ALL {
        let period = period_bounds(kind, today);
        for category in LeaderboardCategory::ALL {
            if let Some(rank) =
                leaderboard::position(pool, user_id, kind, category, period.start).await?
            {
                positions.insert(format!("{kind}_{category}"), rank);
            }
        }
    }
    Ok(positions)
}

/// Resolve an unknown user id to a 404 before any lazy initialization.
pub(crate) async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
    if user::exists(pool, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("user {user_id}")))
    }
}
