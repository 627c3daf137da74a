//! Test fixtures and factory functions for creating test data.

use serde_json::json;

/// Short notes with two explicit question/answer blocks.
pub const SHORT_NOTES: &str = "Q: What is ATP?\nA: The energy currency of the cell.\n\nQ: What is DNA?\nA: The carrier of genetic information.";

/// Generate notes with a specified number of `term: definition` lines.
pub fn delimiter_notes(num_cards: usize) -> String {
    (0..num_cards)
        .map(|i| format!("Term {}: Definition number {}", i + 1, i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A fenced, categorized reply as a remote generator would send it.
pub fn categorized_reply(categories: serde_json::Value) -> String {
    format!("```json\n{}\n```", json!({ "categories": categories }))
}

pub fn new_card_request(question: &str, answer: &str) -> serde_json::Value {
    json!({ "question": question, "answer": answer })
}

pub fn review_request(category_id: &str, card_id: &str, difficulty: &str) -> serde_json::Value {
    json!({ "category_id": category_id, "card_id": card_id, "difficulty": difficulty })
}

pub fn generate_request(text: &str, force_remote: bool) -> serde_json::Value {
    json!({ "text": text, "force_remote": force_remote })
}
