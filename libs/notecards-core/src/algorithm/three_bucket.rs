//! Three-bucket review policy (easy / medium / hard).

use super::{ReviewPolicy, SchedulingResult};
use crate::types::{CardStats, Difficulty};
use chrono::{DateTime, Duration, Utc};

/// What a `hard` rating does to the repetition count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HardReps {
    /// Every rating counts as a repetition.
    #[default]
    Increment,
    /// A `hard` rating starts the card over.
    Reset,
}

/// Simplified ease/interval policy with configurable parameters.
#[derive(Debug, Clone)]
pub struct ThreeBucket {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    pub easy_bonus: f64,
    pub hard_penalty: f64,
    /// Upper bound on the interval, in days.
    pub maximum_interval: u32,
    pub hard_reps: HardReps,
}

impl Default for ThreeBucket {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            maximum_ease: 3.0,
            easy_bonus: 0.15,
            hard_penalty: 0.2,
            maximum_interval: 36_500,
            hard_reps: HardReps::Increment,
        }
    }
}

impl ReviewPolicy for ThreeBucket {
    fn name(&self) -> &'static str {
        match self.hard_reps {
            HardReps::Increment => "three_bucket",
            HardReps::Reset => "three_bucket_strict",
        }
    }

    fn initial_stats(&self) -> CardStats {
        CardStats {
            ease: self.initial_ease,
            interval: 0,
            reps: 0,
        }
    }

    fn schedule(&self, stats: &CardStats, difficulty: Difficulty, now: DateTime<Utc>) -> SchedulingResult {
        let (ease, interval, reps) = match difficulty {
            Difficulty::Easy => self.schedule_easy(stats),
            Difficulty::Medium => self.schedule_medium(stats),
            Difficulty::Hard => self.schedule_hard(stats),
        };

        let new_stats = CardStats {
            ease: ease.clamp(self.minimum_ease, self.maximum_ease),
            interval: interval.min(self.maximum_interval),
            reps,
        };
        let next_due = now + Duration::days(i64::from(new_stats.interval));

        SchedulingResult { new_stats, next_due }
    }
}

impl ThreeBucket {
    fn schedule_easy(&self, stats: &CardStats) -> (f64, u32, u32) {
        let ease = (stats.ease + self.easy_bonus).min(self.maximum_ease);
        let interval = if stats.interval > 0 {
            round_days(f64::from(stats.interval) * ease, self.maximum_interval)
        } else {
            1
        };
        (ease, interval, stats.reps.saturating_add(1))
    }

    fn schedule_medium(&self, stats: &CardStats) -> (f64, u32, u32) {
        (stats.ease, stats.interval.max(1), stats.reps.saturating_add(1))
    }

    fn schedule_hard(&self, stats: &CardStats) -> (f64, u32, u32) {
        let ease = (stats.ease - self.hard_penalty).max(self.minimum_ease);
        let reps = match self.hard_reps {
            HardReps::Increment => stats.reps.saturating_add(1),
            HardReps::Reset => 0,
        };
        (ease, 1, reps)
    }
}

fn round_days(days: f64, maximum: u32) -> u32 {
    days.round().clamp(1.0, f64::from(maximum.max(1))) as u32
}
