//! Card library endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use notecards_core::deck::filter_cards;
use notecards_core::new_card;

use super::resolve_category;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/categories/:id/cards
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CardsQuery>,
) -> Result<Json<CardsResponse>> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&id))?;

    let cards = state.repo.cards(&category.id)?;
    let summary = DeckSummary::of(&cards, Utc::now());
    let cards = match query.q.as_deref() {
        Some(needle) => filter_cards(&cards, needle),
        None => cards,
    };

    Ok(Json(CardsResponse {
        category_id: category.id,
        cards,
        summary,
    }))
}

/// POST /api/categories/:id/cards
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewCardRequest>,
) -> Result<(StatusCode, Json<Flashcard>)> {
    let card = new_card(&payload.question, &payload.answer, Utc::now())?;
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&id))?;

    let mut cards = state.repo.cards(&category.id)?;
    cards.push(card.clone());
    state.repo.save_cards(&category.id, &cards)?;
    tracing::debug!(category = %category.id, card = %card.id, "card added");

    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/categories/:id/cards/:card_id
pub async fn update(
    State(state): State<AppState>,
    Path((id, card_id)): Path<(String, String)>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Flashcard>> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&id))?;

    let mut cards = state.repo.cards(&category.id)?;
    let card = cards
        .iter_mut()
        .find(|c| c.id == card_id)
        .ok_or_else(|| ApiError::NotFound(format!("card {card_id}")))?;

    // Validate the edited text the same way as a manual entry.
    let question = payload.question.as_deref().unwrap_or(&card.question);
    let answer = payload.answer.as_deref().unwrap_or(&card.answer);
    let edited = new_card(question, answer, card.due)?;
    card.question = edited.question;
    card.answer = edited.answer;
    let updated = card.clone();

    state.repo.save_cards(&category.id, &cards)?;
    Ok(Json(updated))
}

/// DELETE /api/categories/:id/cards/:card_id
pub async fn delete(
    State(state): State<AppState>,
    Path((id, card_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&id))?;

    let mut cards = state.repo.cards(&category.id)?;
    let before = cards.len();
    cards.retain(|c| c.id != card_id);
    if cards.len() == before {
        return Err(ApiError::NotFound(format!("card {card_id}")));
    }
    state.repo.save_cards(&category.id, &cards)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/categories/:id/cards
pub async fn clear(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&id))?;

    state.repo.save_cards(&category.id, &[])?;
    tracing::info!(category = %category.id, "deck cleared");

    Ok(StatusCode::NO_CONTENT)
}
