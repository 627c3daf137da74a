//! Category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use notecards_core::deck::find_category;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::store::Repository;
use crate::AppState;

fn snapshot(repo: &Repository) -> Result<CategoriesResponse> {
    let categories = repo.categories()?;
    let selected_id = repo.selected_category()?.id;
    Ok(CategoriesResponse {
        categories,
        selected_id,
    })
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("category name is empty".to_string()));
    }
    Ok(name.to_string())
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let _guard = state.repo.lock()?;
    Ok(Json(snapshot(&state.repo)?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryNameRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let name = clean_name(&payload.name)?;
    let _guard = state.repo.lock()?;

    let mut categories = state.repo.categories()?;
    if find_category(&categories, &name).is_some() {
        return Err(ApiError::BadRequest(format!("category `{name}` already exists")));
    }

    let category = Category::new(name);
    categories.push(category.clone());
    state.repo.save_categories(&categories)?;
    tracing::info!(id = %category.id, name = %category.name, "category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryNameRequest>,
) -> Result<Json<Category>> {
    let name = clean_name(&payload.name)?;
    let _guard = state.repo.lock()?;

    let mut categories = state.repo.categories()?;
    if find_category(&categories, &name).is_some_and(|c| c.id != id) {
        return Err(ApiError::BadRequest(format!("category `{name}` already exists")));
    }
    let category = categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("category {id}")))?;
    category.name = name;
    let renamed = category.clone();
    state.repo.save_categories(&categories)?;

    Ok(Json(renamed))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoriesResponse>> {
    let _guard = state.repo.lock()?;

    let mut categories = state.repo.categories()?;
    let index = categories
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("category {id}")))?;
    if categories.len() == 1 {
        return Err(ApiError::BadRequest("cannot delete the last category".to_string()));
    }

    let was_selected = state.repo.selected_category()?.id == id;
    categories.remove(index);
    state.repo.save_categories(&categories)?;
    state.repo.remove_category_data(&id)?;
    if was_selected {
        state.repo.set_selected_category(&categories[0].id)?;
    }
    tracing::info!(id = %id, "category deleted");

    Ok(Json(snapshot(&state.repo)?))
}

/// GET /api/selected-category
pub async fn selected(State(state): State<AppState>) -> Result<Json<Category>> {
    let _guard = state.repo.lock()?;
    Ok(Json(state.repo.selected_category()?))
}

/// PUT /api/selected-category
pub async fn select(
    State(state): State<AppState>,
    Json(payload): Json<SelectCategoryRequest>,
) -> Result<Json<Category>> {
    let _guard = state.repo.lock()?;

    let category = state
        .repo
        .category(&payload.id)?
        .ok_or_else(|| ApiError::NotFound(format!("category {}", payload.id)))?;
    state.repo.set_selected_category(&category.id)?;

    Ok(Json(category))
}
