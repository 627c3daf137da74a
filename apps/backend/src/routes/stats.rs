//! Progress statistics

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use super::resolve_category;
use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    let _guard = state.repo.lock()?;
    let category = resolve_category(&state.repo, query.category_id.as_deref())?;

    let cards = state.repo.cards(&category.id)?;
    let summary = DeckSummary::of(&cards, Utc::now());
    let streak = state.repo.streak()?;
    let tracker = &state.study.streak;

    Ok(Json(StatsResponse {
        streak: streak.streak,
        daily_progress: tracker.daily_progress(&streak, state.study.today()),
        daily_goal: tracker.daily_goal,
        total_cards: summary.total,
        due_cards: summary.due,
        ratings: state.repo.ratings(&category.id)?,
        category_id: category.id,
    }))
}
