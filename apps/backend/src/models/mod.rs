//! API request and response types

use serde::{Deserialize, Serialize};

pub use notecards_core::deck::{DeckSummary, StudyMode};
pub use notecards_core::{
    CardDraft, Category, Extraction, ExtractionSource, Flashcard, RatingCounts, StreakState,
};

use crate::services::generation::CardSource;

// === Categories ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
    pub selected_id: String,
}

/// Body for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectCategoryRequest {
    pub id: String,
}

// === Cards ===

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardsQuery {
    /// Case-insensitive search over question and answer.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsResponse {
    pub category_id: String,
    pub cards: Vec<Flashcard>,
    pub summary: DeckSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCardRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

// === Extraction and generation ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    /// Target for flat output; defaults to the selected category.
    pub category_id: Option<String>,
    #[serde(default)]
    pub force_remote: bool,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedCards {
    pub category_id: String,
    pub category_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub source: CardSource,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub added: Vec<AddedCards>,
    pub categories: Vec<Category>,
}

// === Study ===

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyQueueQuery {
    pub category_id: Option<String>,
    #[serde(default)]
    pub mode: StudyMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyQueueResponse {
    pub category_id: String,
    pub mode: StudyMode,
    pub cards: Vec<Flashcard>,
    pub summary: DeckSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub category_id: String,
    pub card_id: String,
    /// `easy`, `medium` or `hard`, case-insensitive.
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub card: Flashcard,
    pub streak: StreakState,
    pub daily_progress: u32,
    pub daily_goal: u32,
}

// === Stats ===

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub category_id: String,
    pub streak: u32,
    pub daily_progress: u32,
    pub daily_goal: u32,
    pub total_cards: usize,
    pub due_cards: usize,
    pub ratings: RatingCounts,
}
