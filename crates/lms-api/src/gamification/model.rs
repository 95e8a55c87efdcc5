use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use lms_db::models::{
    Achievement, Badge, EarnedAchievement, EarnedBadge, LeaderboardRow, UserLevelRow,
};
use lms_progression::{LeaderboardCategory, LeaderboardKind};
use serde::Serialize;

/// Full gamification aggregate for one user.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub level: UserLevelRow,
    pub achievements: Vec<EarnedAchievement>,
    pub badges: Vec<EarnedBadge>,
    /// Rank keyed by `{kind}_{category}`; unranked combinations are absent.
    pub leaderboard_positions: BTreeMap<String, i32>,
}

/// Catalog entry annotated with the user's earned state and live progress.
#[derive(Debug, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
    pub progress: f64,
    /// Progress toward the target, capped at 100.
    pub progress_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct BadgeStatus {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LevelProgress {
    pub level_info: UserLevelRow,
    pub progress: LevelProgressDetail,
}

#[derive(Debug, Serialize)]
pub struct LevelProgressDetail {
    /// Cumulative points that unlocked the current level.
    pub current_level_points: i64,
    /// Cumulative points that unlock the next level.
    pub next_level_points: i64,
    pub progress_in_level: i64,
    pub points_needed_for_level: i64,
    pub progress_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardPage {
    pub leaderboard: Vec<LeaderboardRow>,
    /// The requesting user's rank on this leaderboard, when asked for.
    pub user_position: Option<i32>,
    pub kind: LeaderboardKind,
    pub category: LeaderboardCategory,
    pub period_start: NaiveDate,
    pub total_entries: usize,
}

/// Headline numbers for a user's gamification dashboard.
#[derive(Debug, Serialize)]
pub struct GamificationSummary {
    pub level: i32,
    pub total_points: i64,
    pub achievements_earned: i64,
    pub total_achievements: i64,
    pub achievement_completion_rate: f64,
    pub badges_earned: i64,
    pub total_badges: i64,
    pub badge_completion_rate: f64,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub leaderboard_positions: BTreeMap<String, i32>,
}
