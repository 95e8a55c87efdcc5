//! Default achievement and badge catalog.
//!
//! The definitions below are the canonical seed data; `ensure_default_catalog`
//! inserts any that are missing and leaves existing rows untouched, so it is
//! safe to run on every startup. Definitions are keyed by name.

use sqlx::PgPool;

use crate::models::{BadgeConditionKind, ConditionKind, MetricKind, Rarity};

struct AchievementSeed {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: &'static str,
    points: i64,
    rarity: Rarity,
    kind: ConditionKind,
    metric: MetricKind,
    target: i64,
}

struct BadgeSeed {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    category: &'static str,
    kind: BadgeConditionKind,
    value: i64,
}

const DEFAULT_ACHIEVEMENTS: &[AchievementSeed] = &[
    // Learning paths
    AchievementSeed {
        name: "First Steps",
        description: "Complete your first learning path",
        icon: "graduation-cap",
        category: "learning",
        points: 100,
        rarity: Rarity::Common,
        kind: ConditionKind::Count,
        metric: MetricKind::LearningPathsCompleted,
        target: 1,
    },
    AchievementSeed {
        name: "Learning Enthusiast",
        description: "Complete 5 learning paths",
        icon: "book-open",
        category: "learning",
        points: 500,
        rarity: Rarity::Rare,
        kind: ConditionKind::Count,
        metric: MetricKind::LearningPathsCompleted,
        target: 5,
    },
    AchievementSeed {
        name: "Knowledge Master",
        description: "Complete 10 learning paths",
        icon: "crown",
        category: "learning",
        points: 1000,
        rarity: Rarity::Epic,
        kind: ConditionKind::Count,
        metric: MetricKind::LearningPathsCompleted,
        target: 10,
    },
    // Quizzes
    AchievementSeed {
        name: "Quiz Rookie",
        description: "Complete your first quiz",
        icon: "brain",
        category: "quiz",
        points: 50,
        rarity: Rarity::Common,
        kind: ConditionKind::Count,
        metric: MetricKind::QuizzesCompleted,
        target: 1,
    },
    AchievementSeed {
        name: "Quiz Champion",
        description: "Complete 25 quizzes",
        icon: "trophy",
        category: "quiz",
        points: 750,
        rarity: Rarity::Rare,
        kind: ConditionKind::Count,
        metric: MetricKind::QuizzesCompleted,
        target: 25,
    },
    AchievementSeed {
        name: "Perfect Score",
        description: "Achieve 95% average quiz score",
        icon: "star",
        category: "quiz",
        points: 1500,
        rarity: Rarity::Epic,
        kind: ConditionKind::Score,
        metric: MetricKind::AverageQuizScore,
        target: 95,
    },
    // Streaks
    AchievementSeed {
        name: "Consistent Learner",
        description: "Maintain a 7-day learning streak",
        icon: "calendar",
        category: "milestone",
        points: 300,
        rarity: Rarity::Rare,
        kind: ConditionKind::Streak,
        metric: MetricKind::LearningStreak,
        target: 7,
    },
    AchievementSeed {
        name: "Dedication Master",
        description: "Maintain a 30-day learning streak",
        icon: "flame",
        category: "milestone",
        points: 2000,
        rarity: Rarity::Legendary,
        kind: ConditionKind::Streak,
        metric: MetricKind::LearningStreak,
        target: 30,
    },
    // Resources
    AchievementSeed {
        name: "Curious Explorer",
        description: "View 50 learning resources",
        icon: "search",
        category: "learning",
        points: 200,
        rarity: Rarity::Common,
        kind: ConditionKind::Count,
        metric: MetricKind::ResourcesViewed,
        target: 50,
    },
    // Notes
    AchievementSeed {
        name: "Note Taker",
        description: "Create 10 notes",
        icon: "file-text",
        category: "learning",
        points: 150,
        rarity: Rarity::Common,
        kind: ConditionKind::Count,
        metric: MetricKind::NotesCreated,
        target: 10,
    },
    // Point milestones
    AchievementSeed {
        name: "Rising Star",
        description: "Earn 1,000 total points",
        icon: "trending-up",
        category: "milestone",
        points: 100,
        rarity: Rarity::Rare,
        kind: ConditionKind::Time,
        metric: MetricKind::TotalPoints,
        target: 1000,
    },
    AchievementSeed {
        name: "Point Collector",
        description: "Earn 5,000 total points",
        icon: "gem",
        category: "milestone",
        points: 500,
        rarity: Rarity::Epic,
        kind: ConditionKind::Time,
        metric: MetricKind::TotalPoints,
        target: 5000,
    },
];

const DEFAULT_BADGES: &[BadgeSeed] = &[
    // Levels
    BadgeSeed {
        name: "Novice",
        description: "Reach level 5",
        icon: "shield",
        color: "#10B981",
        category: "level",
        kind: BadgeConditionKind::Level,
        value: 5,
    },
    BadgeSeed {
        name: "Apprentice",
        description: "Reach level 10",
        icon: "shield",
        color: "#3B82F6",
        category: "level",
        kind: BadgeConditionKind::Level,
        value: 10,
    },
    BadgeSeed {
        name: "Expert",
        description: "Reach level 20",
        icon: "shield",
        color: "#8B5CF6",
        category: "level",
        kind: BadgeConditionKind::Level,
        value: 20,
    },
    BadgeSeed {
        name: "Master",
        description: "Reach level 50",
        icon: "shield",
        color: "#F59E0B",
        category: "level",
        kind: BadgeConditionKind::Level,
        value: 50,
    },
    // Achievement counts
    BadgeSeed {
        name: "Achiever",
        description: "Earn 5 achievements",
        icon: "award",
        color: "#EF4444",
        category: "achievement",
        kind: BadgeConditionKind::Achievements,
        value: 5,
    },
    BadgeSeed {
        name: "Overachiever",
        description: "Earn 10 achievements",
        icon: "award",
        color: "#DC2626",
        category: "achievement",
        kind: BadgeConditionKind::Achievements,
        value: 10,
    },
    // Point totals
    BadgeSeed {
        name: "Point Hunter",
        description: "Earn 2,500 points",
        icon: "target",
        color: "#06B6D4",
        category: "points",
        kind: BadgeConditionKind::Points,
        value: 2500,
    },
    BadgeSeed {
        name: "Point Master",
        description: "Earn 10,000 points",
        icon: "target",
        color: "#0891B2",
        category: "points",
        kind: BadgeConditionKind::Points,
        value: 10000,
    },
];

/// Insert any missing default achievements and badges.
pub async fn ensure_default_catalog(pool: &PgPool) -> Result<(), sqlx::Error> {
    for seed in DEFAULT_ACHIEVEMENTS {
        sqlx::query(
            // language=PostgreSQL
            r#"
                INSERT INTO achievements
                    (name, description, icon, category, points, rarity,
                     condition_kind, condition_metric, condition_target)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(seed.name)
        .bind(seed.description)
        .bind(seed.icon)
        .bind(seed.category)
        .bind(seed.points)
        .bind(seed.rarity.as_str())
        .bind(seed.kind.as_str())
        .bind(seed.metric.as_str())
        .bind(seed.target)
        .execute(pool)
        .await?;
    }

    for seed in DEFAULT_BADGES {
        sqlx::query(
            // language=PostgreSQL
            r#"
                INSERT INTO badges
                    (name, description, icon, color, category, condition_kind, condition_value)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(seed.name)
        .bind(seed.description)
        .bind(seed.icon)
        .bind(seed.color)
        .bind(seed.category)
        .bind(seed.kind.as_str())
        .bind(seed.value)
        .execute(pool)
        .await?;
    }

    Ok(())
}
