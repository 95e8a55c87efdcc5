//! Quadratic level curve.
//!
//! Reaching level `L` costs `L² × 100` cumulative points: level 1 costs 100,
//! level 2 costs 400, level 10 costs 10,000. Users start at level 1 with zero
//! points, so the first level-up happens at 400 total points (the cost of
//! level 2), not at 100.

/// Cumulative points required to reach `level`.
///
/// There is no upper bound on levels; the curve keeps growing quadratically.
pub const fn points_required(level: i32) -> i64 {
    let level = level as i64;
    level * level * 100
}

/// A recalculated level position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// The level after applying the point total.
    pub level: i32,
    /// Points still missing to reach the next level.
    pub points_to_next: i64,
}

/// Recalculate the level for a point total.
///
/// Starting from `current_level` (levels never go down, even if points were
/// somehow removed), the level is incremented while the total covers the cost
/// of the next level. A single large award can therefore jump several levels
/// at once.
pub fn progress_for(total_points: i64, current_level: i32) -> LevelProgress {
    let mut level = current_level.max(1);
    while total_points >= points_required(level + 1) {
        level += 1;
    }
    LevelProgress {
        level,
        points_to_next: points_required(level + 1) - total_points,
    }
}
