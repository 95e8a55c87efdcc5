use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account row; the FK target every user-owned table cascades from.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Point categories a point award can be booked under.
///
/// Each category maps to its own subtotal column on [`UserLevelRow`]; the
/// subtotals always sum to `total_points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    Learning,
    Quiz,
    Achievement,
    Social,
}

impl PointCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Quiz => "quiz",
            Self::Achievement => "achievement",
            Self::Social => "social",
        }
    }
}

impl FromStr for PointCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learning" => Ok(Self::Learning),
            "quiz" => Ok(Self::Quiz),
            "achievement" => Ok(Self::Achievement),
            "social" => Ok(Self::Social),
            other => Err(format!("unknown point category: '{other}'")),
        }
    }
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user level and streak tracking; one row per user, created lazily.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserLevelRow {
    pub user_id: Uuid,
    /// Derived from `total_points` via the quadratic curve; never decreases.
    pub current_level: i32,
    pub total_points: i64,
    /// Points still missing to reach `current_level + 1`.
    pub points_to_next_level: i64,
    pub learning_points: i64,
    pub quiz_points: i64,
    pub achievement_points: i64,
    pub social_points: i64,
    /// Consecutive days with recorded activity ending at `last_activity_date`.
    pub current_learning_streak: i32,
    pub longest_learning_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How rare an achievement is; display metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl TryFrom<String> for Rarity {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(format!("unknown rarity: '{other}'")),
        }
    }
}

/// The shape of an achievement condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Count of matching rows (activities, attempts, notes).
    Count,
    /// Current consecutive-day learning streak.
    Streak,
    /// Average quiz score percentage.
    Score,
    /// Cumulative total points.
    Time,
}

impl ConditionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Streak => "streak",
            Self::Score => "score",
            Self::Time => "time",
        }
    }
}

impl TryFrom<String> for ConditionKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "count" => Ok(Self::Count),
            "streak" => Ok(Self::Streak),
            "score" => Ok(Self::Score),
            "time" => Ok(Self::Time),
            other => Err(format!("unknown condition kind: '{other}'")),
        }
    }
}

/// The metric an achievement condition measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    LearningPathsCompleted,
    QuizzesCompleted,
    ResourcesViewed,
    NotesCreated,
    LearningStreak,
    AverageQuizScore,
    TotalPoints,
}

impl MetricKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LearningPathsCompleted => "learning_paths_completed",
            Self::QuizzesCompleted => "quizzes_completed",
            Self::ResourcesViewed => "resources_viewed",
            Self::NotesCreated => "notes_created",
            Self::LearningStreak => "learning_streak",
            Self::AverageQuizScore => "average_quiz_score",
            Self::TotalPoints => "total_points",
        }
    }
}

impl TryFrom<String> for MetricKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "learning_paths_completed" => Ok(Self::LearningPathsCompleted),
            "quizzes_completed" => Ok(Self::QuizzesCompleted),
            "resources_viewed" => Ok(Self::ResourcesViewed),
            "notes_created" => Ok(Self::NotesCreated),
            "learning_streak" => Ok(Self::LearningStreak),
            "average_quiz_score" => Ok(Self::AverageQuizScore),
            "total_points" => Ok(Self::TotalPoints),
            other => Err(format!("unknown condition metric: '{other}'")),
        }
    }
}

/// A countable resource backing a `count`-kind condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountMetric {
    LearningPathsCompleted,
    QuizzesCompleted,
    ResourcesViewed,
    NotesCreated,
}

/// The typed view of an achievement's condition triple.
///
/// Pairing `condition_kind` with `condition_metric` here, instead of
/// dispatching on raw strings, turns an inconsistent catalog row into a hard
/// error rather than a condition that silently never passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Count { metric: CountMetric, target: i64 },
    StreakDays { target: i32 },
    AverageQuizScore { target: f64 },
    TotalPoints { target: i64 },
}

/// A catalog row whose kind and metric do not form a valid condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCondition {
    pub achievement: String,
    pub kind: ConditionKind,
    pub metric: MetricKind,
}

impl fmt::Display for InvalidCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "achievement '{}' pairs condition kind '{}' with metric '{}'",
            self.achievement,
            self.kind.as_str(),
            self.metric.as_str()
        )
    }
}

impl std::error::Error for InvalidCondition {}

/// Immutable achievement catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    /// Points awarded (category `achievement`) when granted.
    pub points: i64,
    #[sqlx(try_from = "String")]
    pub rarity: Rarity,
    #[sqlx(try_from = "String")]
    pub condition_kind: ConditionKind,
    #[sqlx(try_from = "String")]
    pub condition_metric: MetricKind,
    pub condition_target: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Achievement {
    /// Resolve the stored kind/metric/target triple into a typed condition.
    pub fn condition(&self) -> Result<Condition, InvalidCondition> {
        use MetricKind as M;

        let invalid = || InvalidCondition {
            achievement: self.name.clone(),
            kind: self.condition_kind,
            metric: self.condition_metric,
        };

        match self.condition_kind {
            ConditionKind::Count => {
                let metric = match self.condition_metric {
                    M::LearningPathsCompleted => CountMetric::LearningPathsCompleted,
                    M::QuizzesCompleted => CountMetric::QuizzesCompleted,
                    M::ResourcesViewed => CountMetric::ResourcesViewed,
                    M::NotesCreated => CountMetric::NotesCreated,
                    M::LearningStreak | M::AverageQuizScore | M::TotalPoints => {
                        return Err(invalid());
                    }
                };
                Ok(Condition::Count {
                    metric,
                    target: self.condition_target,
                })
            }
            ConditionKind::Streak => match self.condition_metric {
                M::LearningStreak => Ok(Condition::StreakDays {
                    target: self.condition_target as i32,
                }),
                _ => Err(invalid()),
            },
            ConditionKind::Score => match self.condition_metric {
                M::AverageQuizScore => Ok(Condition::AverageQuizScore {
                    target: self.condition_target as f64,
                }),
                _ => Err(invalid()),
            },
            ConditionKind::Time => match self.condition_metric {
                M::TotalPoints => Ok(Condition::TotalPoints {
                    target: self.condition_target,
                }),
                _ => Err(invalid()),
            },
        }
    }
}

/// An achievement joined with the grant that earned it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EarnedAchievement {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub achievement: Achievement,
    pub earned_at: DateTime<Utc>,
    /// Metric value at the moment the grant was created.
    pub progress_value: i64,
}

/// The threshold a badge checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeConditionKind {
    /// Current level at or above the value.
    Level,
    /// Number of granted achievements at or above the value.
    Achievements,
    /// Total points at or above the value.
    Points,
}

impl BadgeConditionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Achievements => "achievements",
            Self::Points => "points",
        }
    }
}

impl TryFrom<String> for BadgeConditionKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "level" => Ok(Self::Level),
            "achievements" => Ok(Self::Achievements),
            "points" => Ok(Self::Points),
            other => Err(format!("unknown badge condition kind: '{other}'")),
        }
    }
}

/// Cosmetic badge catalog entry; no point reward.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Hex color for frontend rendering.
    pub color: String,
    pub category: String,
    #[sqlx(try_from = "String")]
    pub condition_kind: BadgeConditionKind,
    pub condition_value: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A badge joined with the grant that earned it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EarnedBadge {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: DateTime<Utc>,
}

/// One ranked row of a leaderboard, joined with the user's name for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeaderboardRow {
    pub rank: i32,
    pub score: i64,
    pub user_id: Uuid,
    pub username: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// A freshly computed rank assignment, staged for bulk insert.
#[derive(Debug, Clone)]
pub struct RankedScore {
    pub user_id: Uuid,
    pub score: i64,
}

/// Activity log row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserActivityRow {
    pub id: i64,
    pub user_id: Uuid,
    pub activity_type: String,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Completed quiz attempt.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct QuizAttemptRow {
    pub id: i64,
    pub user_id: Uuid,
    pub quiz_id: i64,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub time_taken_minutes: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// User note.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub user_id: Uuid,
    pub resource_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub tags: Option<serde_json::Value>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(kind: ConditionKind, metric: MetricKind) -> Achievement {
        Achievement {
            id: 1,
            name: "Test".to_string(),
            description: String::new(),
            icon: "star".to_string(),
            category: "learning".to_string(),
            points: 10,
            rarity: Rarity::Common,
            condition_kind: kind,
            condition_metric: metric,
            condition_target: 5,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_condition_pairing() {
        let cond = achievement(ConditionKind::Count, MetricKind::NotesCreated)
            .condition()
            .unwrap();
        assert_eq!(
            cond,
            Condition::Count {
                metric: CountMetric::NotesCreated,
                target: 5
            }
        );

        let cond = achievement(ConditionKind::Streak, MetricKind::LearningStreak)
            .condition()
            .unwrap();
        assert_eq!(cond, Condition::StreakDays { target: 5 });

        let cond = achievement(ConditionKind::Time, MetricKind::TotalPoints)
            .condition()
            .unwrap();
        assert_eq!(cond, Condition::TotalPoints { target: 5 });
    }

    #[test]
    fn test_condition_rejects_mismatched_pairs() {
        assert!(
            achievement(ConditionKind::Count, MetricKind::LearningStreak)
                .condition()
                .is_err()
        );
        assert!(
            achievement(ConditionKind::Streak, MetricKind::TotalPoints)
                .condition()
                .is_err()
        );
        assert!(
            achievement(ConditionKind::Score, MetricKind::NotesCreated)
                .condition()
                .is_err()
        );
    }

    #[test]
    fn test_point_category_round_trip() {
        for category in [
            PointCategory::Learning,
            PointCategory::Quiz,
            PointCategory::Achievement,
            PointCategory::Social,
        ] {
            assert_eq!(category.as_str().parse::<PointCategory>().unwrap(), category);
        }
        assert!("general".parse::<PointCategory>().is_err());
    }
}
