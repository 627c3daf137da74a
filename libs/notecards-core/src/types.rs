//! Core types for the notecards application.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Maximum answer length in characters. Longer answers are truncated.
pub const MAX_ANSWER_CHARS: usize = 500;

/// Coarse self-assessed difficulty for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(Error::InvalidDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-card scheduling statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStats {
    /// Ease factor, kept within [1.3, 3.0].
    pub ease: f64,
    /// Whole days until the next review. Zero only before the first review.
    pub interval: u32,
    pub reps: u32,
}

impl Default for CardStats {
    fn default() -> Self {
        Self {
            ease: 2.5,
            interval: 0,
            reps: 0,
        }
    }
}

/// Question/answer pair without identity or schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A card with identity and review schedule.
///
/// Missing fields in stored data are defaulted here, once, during
/// deserialization. `due` is stored as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default = "new_card_id")]
    pub id: String,
    #[serde(default = "default_question")]
    pub question: String,
    #[serde(default = "default_answer")]
    pub answer: String,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub due: DateTime<Utc>,
    #[serde(default)]
    pub stats: CardStats,
}

impl Flashcard {
    /// Build a fresh, never-reviewed card due immediately.
    pub fn new(draft: CardDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: new_card_id(),
            question: draft.question,
            answer: draft.answer,
            due: now,
            stats: CardStats::default(),
        }
    }

    /// Whether the card is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

/// Generate an opaque unique card identity.
pub fn new_card_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_question() -> String {
    "Empty?".to_string()
}

fn default_answer() -> String {
    "Empty.".to_string()
}

/// A named group of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// Number of ratings given per difficulty within one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingCounts {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

impl RatingCounts {
    pub fn record(&mut self, difficulty: Difficulty) {
        match difficulty {
            Difficulty::Easy => self.easy += 1,
            Difficulty::Medium => self.medium += 1,
            Difficulty::Hard => self.hard += 1,
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn total(&self) -> u64 {
        self.easy + self.medium + self.hard
    }
}

/// Consecutive-day study streak and today's session counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakState {
    pub streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_study_date: Option<NaiveDate>,
    pub daily_session_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
    }

    #[test]
    fn difficulty_rejects_unknown_values() {
        let err = "again".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, Error::InvalidDifficulty("again".to_string()));
    }

    #[test]
    fn stored_card_defaults_missing_fields() {
        let card: Flashcard = serde_json::from_str(r#"{"question":"Q","answer":"A"}"#).unwrap();
        assert!(!card.id.is_empty());
        assert_eq!(card.stats, CardStats::default());
    }

    #[test]
    fn stored_card_keeps_partial_stats() {
        let card: Flashcard =
            serde_json::from_str(r#"{"id":"x","question":"Q","answer":"A","due":0,"stats":{"interval":3}}"#)
                .unwrap();
        assert_eq!(card.id, "x");
        assert_eq!(card.due.timestamp_millis(), 0);
        assert_eq!(card.stats.interval, 3);
        assert_eq!(card.stats.ease, 2.5);
    }

    #[test]
    fn stored_card_without_text_gets_placeholders() {
        let card: Flashcard = serde_json::from_str(r#"{"id":"y"}"#).unwrap();
        assert_eq!(card.question, "Empty?");
        assert_eq!(card.answer, "Empty.");
    }

    #[test]
    fn rating_counts_record() {
        let mut counts = RatingCounts::default();
        counts.record(Difficulty::Easy);
        counts.record(Difficulty::Easy);
        counts.record(Difficulty::Hard);
        assert_eq!(counts.get(Difficulty::Easy), 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.total(), 3);
    }
}
