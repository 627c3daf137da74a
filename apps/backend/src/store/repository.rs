//! Typed access to the stored blobs.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use notecards_core::{Category, Flashcard, RatingCounts, StreakState};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    cards_key, ratings_key, KvStore, StoreError, StoreResult, CATEGORIES_KEY, LAST_DATE_KEY,
    SELECTED_CATEGORY_KEY, SESSION_COUNT_KEY, STREAK_KEY,
};

/// Name of the category created when none exist.
pub const DEFAULT_CATEGORY: &str = "General";

pub struct Repository {
    store: Arc<dyn KvStore>,
    write_lock: Mutex<()>,
}

impl Repository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Serialize read-modify-write sequences.
    ///
    /// The guard must be dropped before any `.await`.
    pub fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    /// All categories, creating the default one when the list is empty.
    pub fn categories(&self) -> StoreResult<Vec<Category>> {
        let categories: Vec<Category> = self.read_json(CATEGORIES_KEY)?.unwrap_or_default();
        if !categories.is_empty() {
            return Ok(categories);
        }

        let general = Category::new(DEFAULT_CATEGORY);
        tracing::info!(id = %general.id, "creating default category");
        let categories = vec![general];
        self.save_categories(&categories)?;
        self.store.set(SELECTED_CATEGORY_KEY, &categories[0].id)?;
        Ok(categories)
    }

    pub fn save_categories(&self, categories: &[Category]) -> StoreResult<()> {
        self.write_json(CATEGORIES_KEY, categories)
    }

    pub fn category(&self, id: &str) -> StoreResult<Option<Category>> {
        Ok(self.categories()?.into_iter().find(|c| c.id == id))
    }

    /// The selected category, falling back to the first one.
    pub fn selected_category(&self) -> StoreResult<Category> {
        let mut categories = self.categories()?;
        let selected = self.store.get(SELECTED_CATEGORY_KEY)?;
        let index = selected
            .and_then(|id| categories.iter().position(|c| c.id == id))
            .unwrap_or(0);
        Ok(categories.swap_remove(index))
    }

    pub fn set_selected_category(&self, id: &str) -> StoreResult<()> {
        self.store.set(SELECTED_CATEGORY_KEY, id)
    }

    pub fn cards(&self, category_id: &str) -> StoreResult<Vec<Flashcard>> {
        Ok(self.read_json(&cards_key(category_id))?.unwrap_or_default())
    }

    pub fn save_cards(&self, category_id: &str, cards: &[Flashcard]) -> StoreResult<()> {
        self.write_json(&cards_key(category_id), cards)
    }

    pub fn ratings(&self, category_id: &str) -> StoreResult<RatingCounts> {
        Ok(self.read_json(&ratings_key(category_id))?.unwrap_or_default())
    }

    pub fn save_ratings(&self, category_id: &str, ratings: &RatingCounts) -> StoreResult<()> {
        self.write_json(&ratings_key(category_id), ratings)
    }

    /// Drop the cards and rating counts of a category.
    pub fn remove_category_data(&self, category_id: &str) -> StoreResult<()> {
        self.store.remove(&cards_key(category_id))?;
        self.store.remove(&ratings_key(category_id))
    }

    /// Streak state spread over three scalar keys.
    ///
    /// Unreadable scalars count as absent.
    pub fn streak(&self) -> StoreResult<StreakState> {
        let number = |key: &str| -> StoreResult<u32> {
            Ok(self
                .store
                .get(key)?
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(0))
        };
        let last_study_date = self
            .store
            .get(LAST_DATE_KEY)?
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());

        Ok(StreakState {
            streak: number(STREAK_KEY)?,
            last_study_date,
            daily_session_count: number(SESSION_COUNT_KEY)?,
        })
    }

    pub fn save_streak(&self, state: &StreakState) -> StoreResult<()> {
        self.store.set(STREAK_KEY, &state.streak.to_string())?;
        self.store
            .set(SESSION_COUNT_KEY, &state.daily_session_count.to_string())?;
        match state.last_study_date {
            Some(date) => self.store.set(LAST_DATE_KEY, &date.format("%Y-%m-%d").to_string()),
            None => self.store.remove(LAST_DATE_KEY),
        }
    }
}
