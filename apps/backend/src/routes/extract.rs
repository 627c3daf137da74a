//! Note extraction and generation endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use notecards_core::deck::merge_generated;
use notecards_core::extract_report;

use super::resolve_category;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::generation::generate_cards;
use crate::AppState;

/// POST /api/extract
pub async fn extract(Json(payload): Json<ExtractRequest>) -> Json<Extraction> {
    let report = extract_report(&payload.text);
    tracing::info!(source = ?report.source, cards = report.cards.len(), "extracted notes");
    Json(report)
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("notes are empty".to_string()));
    }
    let count = payload.count.unwrap_or(state.study.card_count).max(1);

    let outcome = generate_cards(
        state.generator.as_deref(),
        &payload.text,
        count,
        payload.force_remote,
    )
    .await?;

    let _guard = state.repo.lock()?;
    let target = resolve_category(&state.repo, payload.category_id.as_deref())?;
    let mut categories = state.repo.categories()?;

    let merged = merge_generated(&mut categories, outcome.deck, &target.id, Utc::now());
    state.repo.save_categories(&categories)?;

    let mut added = Vec::with_capacity(merged.len());
    for group in merged {
        let mut cards = state.repo.cards(&group.category_id)?;
        let count = group.cards.len();
        cards.extend(group.cards);
        state.repo.save_cards(&group.category_id, &cards)?;

        let category_name = categories
            .iter()
            .find(|c| c.id == group.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        added.push(AddedCards {
            category_id: group.category_id,
            category_name,
            count,
        });
    }

    Ok(Json(GenerateResponse {
        source: outcome.source,
        fallback: outcome.fallback,
        warning: outcome.warning,
        added,
        categories,
    }))
}
