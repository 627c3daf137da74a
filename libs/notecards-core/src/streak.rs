//! Daily study streak tracking.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::types::StreakState;

/// Ratings per day needed to extend the streak.
pub const DAILY_GOAL: u32 = 5;

/// What happens to the streak when a calendar day is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissedDay {
    /// Only the daily counter resets.
    #[default]
    KeepStreak,
    /// The streak drops to zero unless the last study day was yesterday.
    ResetStreak,
}

/// Streak rules.
#[derive(Debug, Clone)]
pub struct StreakTracker {
    pub daily_goal: u32,
    pub missed_day: MissedDay,
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self {
            daily_goal: DAILY_GOAL,
            missed_day: MissedDay::KeepStreak,
        }
    }
}

impl StreakTracker {
    /// Record one rating event on `today`.
    ///
    /// The streak grows by one on the session that reaches the daily goal,
    /// and never again on the same day.
    pub fn record_session(&self, state: &StreakState, today: NaiveDate) -> StreakState {
        let mut next = state.clone();

        if next.last_study_date != Some(today) {
            if self.missed_day == MissedDay::ResetStreak && next.last_study_date != today.pred_opt() {
                next.streak = 0;
            }
            next.daily_session_count = 0;
            next.last_study_date = Some(today);
        }

        next.daily_session_count = next.daily_session_count.saturating_add(1);
        if next.daily_session_count == self.daily_goal {
            next.streak = next.streak.saturating_add(1);
        }

        next
    }

    /// Sessions completed today toward the goal, capped at the goal.
    pub fn daily_progress(&self, state: &StreakState, today: NaiveDate) -> u32 {
        if state.last_study_date == Some(today) {
            state.daily_session_count.min(self.daily_goal)
        } else {
            0
        }
    }
}

/// The study day for a local timestamp.
///
/// Before `daily_reset_hour` the previous calendar day is still the current
/// study day, so late-night sessions count toward it.
pub fn adjusted_today(local: NaiveDateTime, daily_reset_hour: u32) -> NaiveDate {
    if local.hour() < daily_reset_hour {
        (local - Duration::days(1)).date()
    } else {
        local.date()
    }
}
