//! Leaderboard kinds, score categories, and period windows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day the all-time leaderboards count from.
const ALL_TIME_EPOCH: (i32, u32, u32) = (2024, 1, 1);

/// The time window a leaderboard covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardKind {
    Weekly,
    Monthly,
    AllTime,
}

impl LeaderboardKind {
    pub const ALL: [Self; 3] = [Self::Weekly, Self::Monthly, Self::AllTime];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::AllTime => "all_time",
        }
    }
}

impl FromStr for LeaderboardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "all_time" => Ok(Self::AllTime),
            other => Err(format!("unknown leaderboard kind: '{other}'")),
        }
    }
}

impl TryFrom<String> for LeaderboardKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for LeaderboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The score a leaderboard ranks users by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardCategory {
    /// Total points across all categories.
    Points,
    /// Points earned from quiz activity.
    Quizzes,
    /// Longest learning streak in days.
    Streak,
}

impl LeaderboardCategory {
    pub const ALL: [Self; 3] = [Self::Points, Self::Quizzes, Self::Streak];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Quizzes => "quizzes",
            Self::Streak => "streak",
        }
    }
}

impl FromStr for LeaderboardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(Self::Points),
            "quizzes" => Ok(Self::Quizzes),
            "streak" => Ok(Self::Streak),
            other => Err(format!("unknown leaderboard category: '{other}'")),
        }
    }
}

impl TryFrom<String> for LeaderboardCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for LeaderboardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive date range scoping one leaderboard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Compute the period window containing `as_of` for a leaderboard kind.
///
/// * weekly: Monday through Sunday of the ISO week containing `as_of`
/// * monthly: first through last day of the month containing `as_of`
/// * all-time: the fixed epoch (2024-01-01) through `as_of`
pub fn period_bounds(kind: LeaderboardKind, as_of: NaiveDate) -> Period {
    match kind {
        LeaderboardKind::Weekly => {
            let start = as_of - Duration::days(as_of.weekday().num_days_from_monday() as i64);
            Period {
                start,
                end: start + Duration::days(6),
            }
        }
        LeaderboardKind::Monthly => {
            let start = as_of.with_day(1).expect("day 1 exists in every month");
            let next_month = if as_of.month() == 12 {
                NaiveDate::from_ymd_opt(as_of.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(as_of.year(), as_of.month() + 1, 1)
            }
            .expect("first of month is always valid");
            Period {
                start,
                end: next_month - Duration::days(1),
            }
        }
        LeaderboardKind::AllTime => {
            let (y, m, d) = ALL_TIME_EPOCH;
            Period {
                start: NaiveDate::from_ymd_opt(y, m, d).expect("epoch is a valid date"),
                end: as_of,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_bounds() {
        // 2025-03-12 is a Wednesday; its ISO week runs Mon 10th..Sun 16th.
        let period = period_bounds(LeaderboardKind::Weekly, day(2025, 3, 12));
        assert_eq!(period.start, day(2025, 3, 10));
        assert_eq!(period.end, day(2025, 3, 16));

        // A Monday is its own week start.
        let period = period_bounds(LeaderboardKind::Weekly, day(2025, 3, 10));
        assert_eq!(period.start, day(2025, 3, 10));

        // A Sunday still belongs to the week that started the previous Monday.
        let period = period_bounds(LeaderboardKind::Weekly, day(2025, 3, 16));
        assert_eq!(period.start, day(2025, 3, 10));
    }

    #[test]
    fn test_monthly_bounds() {
        let period = period_bounds(LeaderboardKind::Monthly, day(2025, 2, 14));
        assert_eq!(period.start, day(2025, 2, 1));
        assert_eq!(period.end, day(2025, 2, 28));

        // December rolls over into the next year.
        let period = period_bounds(LeaderboardKind::Monthly, day(2025, 12, 31));
        assert_eq!(period.start, day(2025, 12, 1));
        assert_eq!(period.end, day(2025, 12, 31));

        // Leap February.
        let period = period_bounds(LeaderboardKind::Monthly, day(2024, 2, 10));
        assert_eq!(period.end, day(2024, 2, 29));
    }

    #[test]
    fn test_all_time_bounds() {
        let period = period_bounds(LeaderboardKind::AllTime, day(2025, 6, 1));
        assert_eq!(period.start, day(2024, 1, 1));
        assert_eq!(period.end, day(2025, 6, 1));
    }

    #[test]
    fn test_round_trips() {
        for kind in LeaderboardKind::ALL {
            assert_eq!(kind.as_str().parse::<LeaderboardKind>().unwrap(), kind);
        }
        for category in LeaderboardCategory::ALL {
            assert_eq!(
                category.as_str().parse::<LeaderboardCategory>().unwrap(),
                category
            );
        }
        assert!("daily".parse::<LeaderboardKind>().is_err());
        assert!("reviews".parse::<LeaderboardCategory>().is_err());
    }
}
