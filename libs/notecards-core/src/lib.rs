//! Core notecards library used by the backend application.
//!
//! Provides:
//! - Heuristic note-to-card extraction (line classifier, five strategies, loose fallback)
//! - Deduplication and normalization of extracted cards
//! - Three-bucket review scheduling and the daily study streak
//! - Parsing of remote text-generation responses
//! - Shared types (Flashcard, CardStats, Difficulty, StreakState, etc.)

pub mod algorithm;
pub mod classify;
pub mod deck;
pub mod error;
pub mod extract;
pub mod generation;
pub mod streak;
pub mod types;

pub use algorithm::{rate, rate_str, ReviewPolicy, SchedulingResult};
pub use error::{Error, Result};
pub use extract::{extract_cards, extract_report, new_card, normalize, Extraction, ExtractionSource};
pub use deck::{DeckSummary, StudyMode};
pub use generation::{build_prompt, parse_response, strip_code_fences, GeneratedCategory, GeneratedDeck, GenerationPlan};
pub use streak::{adjusted_today, MissedDay, StreakTracker, DAILY_GOAL};
pub use types::{
    CardDraft, CardStats, Category, Difficulty, Flashcard, RatingCounts, StreakState,
};
