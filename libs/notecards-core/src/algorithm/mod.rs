//! Review scheduling.

pub mod three_bucket;

use crate::error::Result;
use crate::types::{CardStats, Difficulty, Flashcard};
use chrono::{DateTime, Utc};

pub use three_bucket::{HardReps, ThreeBucket};

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_stats: CardStats,
    pub next_due: DateTime<Utc>,
}

/// Trait for review scheduling policies.
pub trait ReviewPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next stats and due time after a review.
    fn schedule(&self, stats: &CardStats, difficulty: Difficulty, now: DateTime<Utc>) -> SchedulingResult;

    /// Initial stats for a new card.
    fn initial_stats(&self) -> CardStats;

    /// Apply a review to a card, returning the updated copy.
    fn rate(&self, card: &Flashcard, difficulty: Difficulty, now: DateTime<Utc>) -> Flashcard {
        let result = self.schedule(&card.stats, difficulty, now);
        Flashcard {
            stats: result.new_stats,
            due: result.next_due,
            ..card.clone()
        }
    }
}

/// Get policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn ReviewPolicy>> {
    match name {
        "three_bucket" => Some(Box::new(ThreeBucket::default())),
        "three_bucket_strict" => Some(Box::new(ThreeBucket {
            hard_reps: HardReps::Reset,
            ..ThreeBucket::default()
        })),
        _ => None,
    }
}

/// Rate a card with the default policy.
pub fn rate(card: &Flashcard, difficulty: Difficulty, now: DateTime<Utc>) -> Flashcard {
    ThreeBucket::default().rate(card, difficulty, now)
}

/// Rate a card from a wire-format difficulty.
///
/// Unknown values fail with `InvalidDifficulty`; the card is never touched.
pub fn rate_str(card: &Flashcard, difficulty: &str, now: DateTime<Utc>) -> Result<Flashcard> {
    let difficulty = difficulty.parse::<Difficulty>()?;
    Ok(rate(card, difficulty, now))
}
