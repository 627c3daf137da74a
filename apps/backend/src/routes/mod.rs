pub mod cards;
pub mod categories;
pub mod extract;
pub mod stats;
pub mod study;

use notecards_core::Category;

use crate::error::{ApiError, Result};
use crate::store::Repository;

/// The named category, or the selected one when no id is given.
pub(crate) fn resolve_category(repo: &Repository, id: Option<&str>) -> Result<Category> {
    match id {
        Some(id) => repo
            .category(id)?
            .ok_or_else(|| ApiError::NotFound(format!("category {id}"))),
        None => Ok(repo.selected_category()?),
    }
}
