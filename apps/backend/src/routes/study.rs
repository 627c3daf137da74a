//! Study endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use notecards_core::deck::study_list;
use notecards_core::{Difficulty, ReviewPolicy};

use super::resolve_category;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/study/queue
pub async fn queue(
    State(state): State<AppState>,
    Query(query): Query<StudyQueueQuery>,
) -> Result<Json<StudyQueueResponse>> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, query.category_id.as_deref())?;

    let now = Utc::now();
    let deck = state.repo.cards(&category.id)?;
    let cards = study_list(&deck, query.mode, now);
    tracing::debug!(category = %category.id, mode = ?query.mode, cards = cards.len(), "study queue");

    Ok(Json(StudyQueueResponse {
        category_id: category.id,
        mode: query.mode,
        cards,
        summary: DeckSummary::of(&deck, now),
    }))
}

/// POST /api/study/review
pub async fn review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let difficulty: Difficulty = payload.difficulty.parse()?;

    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, Some(&payload.category_id))?;

    let mut cards = state.repo.cards(&category.id)?;
    let card = cards
        .iter_mut()
        .find(|c| c.id == payload.card_id)
        .ok_or_else(|| ApiError::NotFound(format!("card {}", payload.card_id)))?;

    let now = Utc::now();
    *card = state.study.policy.rate(card, difficulty, now);
    let rated = card.clone();
    state.repo.save_cards(&category.id, &cards)?;

    let mut ratings = state.repo.ratings(&category.id)?;
    ratings.record(difficulty);
    state.repo.save_ratings(&category.id, &ratings)?;

    let today = state.study.today();
    let streak = state.study.streak.record_session(&state.repo.streak()?, today);
    state.repo.save_streak(&streak)?;

    tracing::debug!(
        card = %rated.id,
        %difficulty,
        interval = rated.stats.interval,
        streak = streak.streak,
        "review recorded"
    );

    Ok(Json(ReviewResponse {
        daily_progress: state.study.streak.daily_progress(&streak, today),
        daily_goal: state.study.streak.daily_goal,
        card: rated,
        streak,
    }))
}
