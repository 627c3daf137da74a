//! Key-value persistence.
//!
//! Everything is stored as opaque string blobs under the key layout below.
//! [`Repository`] adds typed JSON access on top.

pub mod repository;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

pub use repository::Repository;
pub use sqlite::SqliteStore;

pub const CATEGORIES_KEY: &str = "flashcards_categories";
pub const SELECTED_CATEGORY_KEY: &str = "flashcards_selected_category";
pub const STREAK_KEY: &str = "flashcards_streak";
pub const LAST_DATE_KEY: &str = "flashcards_last_date";
pub const SESSION_COUNT_KEY: &str = "flashcards_session_count";

/// Key holding the card list of a category.
pub fn cards_key(category_id: &str) -> String {
    format!("flashcards_{category_id}")
}

/// Key holding the rating counts of a category.
pub fn ratings_key(category_id: &str) -> String {
    format!("flashcards_ratings_{category_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt value under `{key}`: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Opaque string storage.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Process-local store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
