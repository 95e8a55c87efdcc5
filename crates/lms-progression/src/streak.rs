//! Consecutive-day learning streak transitions.

use chrono::NaiveDate;

/// A user's streak counters as persisted on their level row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    /// Consecutive days with recorded activity, ending at `last_activity`.
    pub current: i32,
    /// The longest `current` ever reached.
    pub longest: i32,
    /// The last day activity was recorded, if any.
    pub last_activity: Option<NaiveDate>,
}

impl StreakState {
    /// Apply one day of activity to the streak.
    ///
    /// * first activity ever → streak starts at 1
    /// * same day again → unchanged (repeat activity on one day is a no-op)
    /// * exactly one day later → streak extends by 1
    /// * two or more days later → streak restarts at 1
    /// * `today` earlier than the recorded last activity (clock skew,
    ///   out-of-order delivery) → treated like a broken streak and restarts
    ///   at 1; the streak never decrements
    ///
    /// `longest` is raised to match `current` when it is exceeded, and
    /// `last_activity` always moves to `today`.
    pub fn advance(&self, today: NaiveDate) -> Self {
        let current = match self.last_activity {
            None => 1,
            Some(last) => match (today - last).num_days() {
                0 => self.current,
                1 => self.current + 1,
                _ => 1,
            },
        };

        Self {
            current,
            longest: self.longest.max(current),
            last_activity: Some(today),
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
    fn test_first_activity_starts_streak() {
        let state = StreakState {
            current: 0,
            longest: 0,
            last_activity: None,
        };
        let next = state.advance(day(2025, 3, 10));
        assert_eq!(next.current, 1);
        assert_eq!(next.longest, 1);
        assert_eq!(next.last_activity, Some(day(2025, 3, 10)));
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let state = StreakState {
            current: 4,
            longest: 6,
            last_activity: Some(day(2025, 3, 10)),
        };
        let next = state.advance(day(2025, 3, 10));
        assert_eq!(next, state);

        // A second call with the same date still changes nothing.
        assert_eq!(next.advance(day(2025, 3, 10)), next);
    }

    #[test]
    fn test_consecutive_day_extends() {
        let state = StreakState {
            current: 4,
            longest: 4,
            last_activity: Some(day(2025, 3, 10)),
        };
        let next = state.advance(day(2025, 3, 11));
        assert_eq!(next.current, 5);
        assert_eq!(next.longest, 5);
    }

    #[test]
    fn test_gap_resets_and_keeps_longest() {
        let state = StreakState {
            current: 5,
            longest: 5,
            last_activity: Some(day(2025, 3, 10)),
        };
        let next = state.advance(day(2025, 3, 13));
        assert_eq!(next.current, 1);
        assert_eq!(next.longest, 5);
        assert_eq!(next.last_activity, Some(day(2025, 3, 13)));
    }

    #[test]
    fn test_negative_gap_clamps_to_reset() {
        // A date before the recorded last activity must not decrement the
        // streak; it falls into the reset branch.
        let state = StreakState {
            current: 9,
            longest: 12,
            last_activity: Some(day(2025, 3, 10)),
        };
        let next = state.advance(day(2025, 3, 8));
        assert_eq!(next.current, 1);
        assert_eq!(next.longest, 12);
        assert_eq!(next.last_activity, Some(day(2025, 3, 8)));
    }

    #[test]
    fn test_longest_never_decreases() {
        let mut state = StreakState {
            current: 0,
            longest: 0,
            last_activity: None,
        };
        let days = [
            day(2025, 1, 1),
            day(2025, 1, 2),
            day(2025, 1, 3),
            day(2025, 1, 7), // gap, reset
            day(2025, 1, 8),
            day(2025, 1, 5), // out of order, reset
        ];
        let mut peak = 0;
        for d in days {
            state = state.advance(d);
            peak = peak.max(state.longest);
            assert!(state.longest >= state.current);
            assert_eq!(state.longest, peak);
        }
        assert_eq!(state.longest, 3);
        assert_eq!(state.current, 1);
    }
}
