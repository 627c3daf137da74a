//! Heuristic extraction of question/answer cards from study notes.
//!
//! Five strategies run in a fixed priority order over the same classified
//! line array. They never consume lines from one another: overlapping
//! candidates are resolved by [`dedupe`], where the first occurrence of a
//! question wins. Only when all five produce nothing does the loose fallback
//! parser run.
//!
//! ```
//! use notecards_core::extract_cards;
//!
//! let cards = extract_cards("Q: What is TCP?\nA: A reliable transport protocol.");
//! assert_eq!(cards.len(), 1);
//! assert_eq!(cards[0].question, "What is TCP?");
//! ```

pub mod loose;
pub mod strategies;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

use crate::classify::{classify_lines, ClassifiedLine};
use crate::error::{Error, Result};
use crate::types::{CardDraft, Flashcard, MAX_ANSWER_CHARS};

/// Extraction strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Explicit,
    Delimiter,
    Gloss,
    Interrogative,
    Heading,
    Loose,
}

/// An unconfirmed question/answer pair and the lines it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub question: String,
    pub answer: String,
    pub lines: Range<usize>,
    pub strategy: Strategy,
}

impl Candidate {
    pub(crate) fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        lines: Range<usize>,
        strategy: Strategy,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            lines,
            strategy,
        }
    }
}

impl From<Candidate> for CardDraft {
    fn from(candidate: Candidate) -> Self {
        CardDraft::new(candidate.question, candidate.answer)
    }
}

/// Which extraction path produced the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Strategies,
    Fallback,
    Nothing,
}

/// Extracted cards plus the path that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub cards: Vec<CardDraft>,
    pub source: ExtractionSource,
}

/// Accumulate continuation lines starting at `start`.
///
/// Leading blank lines are skipped. Collection stops at a blank line once
/// something has been collected, or at any boundary line. Returns the joined
/// text and the index just past the last consumed line.
pub fn collect_answer(lines: &[ClassifiedLine<'_>], start: usize) -> (String, usize) {
    collect_from(lines, start, "")
}

/// Like [`collect_answer`], but starting with `seed` already collected, so a
/// blank line ends the answer immediately.
pub(crate) fn collect_from(lines: &[ClassifiedLine<'_>], start: usize, seed: &str) -> (String, usize) {
    let mut parts: Vec<&str> = Vec::new();
    if !seed.is_empty() {
        parts.push(seed);
    }

    let mut end = start;
    for (idx, line) in lines.iter().enumerate().skip(start) {
        if line.is_blank() {
            if !parts.is_empty() {
                break;
            }
            end = idx + 1;
            continue;
        }
        if line.is_boundary() {
            break;
        }
        parts.push(line.text);
        end = idx + 1;
    }

    (parts.join(" "), end)
}

/// Run the five strategies in priority order and concatenate their output.
pub fn extract_candidates(text: &str) -> Vec<Candidate> {
    let lines = classify_lines(text);

    let mut candidates = strategies::explicit(&lines);
    candidates.extend(strategies::delimiter(&lines));
    candidates.extend(strategies::gloss(&lines));
    candidates.extend(strategies::interrogative(&lines));
    candidates.extend(strategies::heading(&lines));
    candidates
}

/// Trim, drop empty pairs, fold case-insensitive duplicate questions (first
/// wins) and truncate long answers. Preserves first-seen order.
pub fn dedupe<I, T>(items: I) -> Vec<CardDraft>
where
    I: IntoIterator<Item = T>,
    T: Into<CardDraft>,
{
    let mut seen = HashSet::new();
    let mut drafts = Vec::new();

    for item in items {
        let draft: CardDraft = item.into();
        let question = draft.question.trim();
        let answer = draft.answer.trim();
        if question.is_empty() || answer.is_empty() {
            continue;
        }
        if !seen.insert(question.to_lowercase()) {
            continue;
        }
        drafts.push(CardDraft::new(question, truncate_answer(answer)));
    }

    drafts
}

fn truncate_answer(answer: &str) -> String {
    match answer.char_indices().nth(MAX_ANSWER_CHARS) {
        Some((byte_idx, _)) => answer[..byte_idx].to_string(),
        None => answer.to_string(),
    }
}

/// Extract cards and report which path produced them. Never fails.
pub fn extract_report(text: &str) -> Extraction {
    let candidates = extract_candidates(text);
    if !candidates.is_empty() {
        let cards = dedupe(candidates);
        let source = if cards.is_empty() {
            ExtractionSource::Nothing
        } else {
            ExtractionSource::Strategies
        };
        return Extraction { cards, source };
    }

    let cards = dedupe(loose::parse(text));
    let source = if cards.is_empty() {
        ExtractionSource::Nothing
    } else {
        ExtractionSource::Fallback
    };
    Extraction { cards, source }
}

/// Extract an ordered list of question/answer pairs from free-form notes.
///
/// Deterministic and side-effect free; empty or unstructured input yields an
/// empty list.
pub fn extract_cards(text: &str) -> Vec<CardDraft> {
    extract_report(text).cards
}

/// Turn drafts into fresh flashcards due at `now`, applying the same
/// trimming, deduplication and truncation rules as extraction.
pub fn normalize<I, T>(drafts: I, now: DateTime<Utc>) -> Vec<Flashcard>
where
    I: IntoIterator<Item = T>,
    T: Into<CardDraft>,
{
    dedupe(drafts)
        .into_iter()
        .map(|draft| Flashcard::new(draft, now))
        .collect()
}

/// Manual single-card entry.
pub fn new_card(question: &str, answer: &str, now: DateTime<Utc>) -> Result<Flashcard> {
    let question = question.trim();
    let answer = answer.trim();
    if question.is_empty() {
        return Err(Error::MalformedInput("question is empty".to_string()));
    }
    if answer.is_empty() {
        return Err(Error::MalformedInput("answer is empty".to_string()));
    }
    Ok(Flashcard::new(
        CardDraft::new(question, truncate_answer(answer)),
        now,
    ))
}
