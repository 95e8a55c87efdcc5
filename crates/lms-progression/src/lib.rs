//! Progression algorithms for the learning service.
//!
//! This crate provides the pure computations behind the gamification layer:
//! the quadratic level curve, the consecutive-day streak transitions, and the
//! leaderboard period windows. It performs no I/O; the service layer feeds it
//! persisted state and writes back the results.

pub mod level;
pub mod period;
pub mod streak;

pub use level::{LevelProgress, points_required, progress_for};
pub use period::{LeaderboardCategory, LeaderboardKind, Period, period_bounds};
pub use streak::StreakState;
