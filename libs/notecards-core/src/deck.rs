//! Deck-level helpers: category merging, study queues and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::normalize;
use crate::generation::GeneratedDeck;
use crate::types::{Category, Flashcard};

/// Which cards a study session draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Only cards whose due time has passed.
    #[default]
    Due,
    /// Every card in the deck.
    All,
}

/// New cards destined for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCards {
    pub category_id: String,
    pub cards: Vec<Flashcard>,
}

/// Card totals for one deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub total: usize,
    pub due: usize,
}

impl DeckSummary {
    pub fn of(cards: &[Flashcard], now: DateTime<Utc>) -> Self {
        Self {
            total: cards.len(),
            due: cards.iter().filter(|c| c.is_due(now)).count(),
        }
    }
}

/// Case-insensitive category lookup by name.
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    let needle = name.trim().to_lowercase();
    categories.iter().find(|c| c.name.trim().to_lowercase() == needle)
}

/// Distribute generated cards over categories.
///
/// Categorized output is matched to existing categories by name, creating
/// missing ones in `categories`. Flat output and unnamed groups go to
/// `target_id`. Groups that end up with no cards are skipped.
pub fn merge_generated(
    categories: &mut Vec<Category>,
    generated: GeneratedDeck,
    target_id: &str,
    now: DateTime<Utc>,
) -> Vec<MergedCards> {
    let groups = match generated {
        GeneratedDeck::Cards(drafts) => vec![(target_id.to_string(), drafts)],
        GeneratedDeck::Categories(generated) => generated
            .into_iter()
            .map(|group| {
                let name = group.name.trim();
                let id = if name.is_empty() {
                    target_id.to_string()
                } else if let Some(existing) = find_category(categories, name) {
                    existing.id.clone()
                } else {
                    let created = Category::new(name);
                    let id = created.id.clone();
                    categories.push(created);
                    id
                };
                (id, group.cards)
            })
            .collect(),
    };

    let mut merged: Vec<MergedCards> = Vec::new();
    for (category_id, drafts) in groups {
        let cards = normalize(drafts, now);
        if cards.is_empty() {
            continue;
        }
        match merged.iter_mut().find(|m| m.category_id == category_id) {
            Some(entry) => entry.cards.extend(cards),
            None => merged.push(MergedCards { category_id, cards }),
        }
    }
    merged
}

/// Cards due at `now`, in deck order.
pub fn due_cards(cards: &[Flashcard], now: DateTime<Utc>) -> Vec<Flashcard> {
    cards.iter().filter(|c| c.is_due(now)).cloned().collect()
}

/// The whole deck ordered by due time, earliest first.
pub fn next_due(cards: &[Flashcard]) -> Vec<Flashcard> {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|c| c.due);
    sorted
}

/// Cards for a study session.
///
/// In `Due` mode an empty result means nothing needs review yet. `All`
/// mode returns the deck earliest-due first so overdue cards lead.
pub fn study_list(cards: &[Flashcard], mode: StudyMode, now: DateTime<Utc>) -> Vec<Flashcard> {
    match mode {
        StudyMode::Due => due_cards(cards, now),
        StudyMode::All => next_due(cards),
    }
}

/// Case-insensitive substring search over question and answer.
pub fn filter_cards(cards: &[Flashcard], needle: &str) -> Vec<Flashcard> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return cards.to_vec();
    }
    cards
        .iter()
        .filter(|c| {
            c.question.to_lowercase().contains(&needle) || c.answer.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
