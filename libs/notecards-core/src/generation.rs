//! Boundary with the remote text-generation collaborator.
//!
//! The collaborator itself lives outside the core. This module only builds
//! the prompt, decides whether the collaborator is worth calling, and turns
//! its raw text reply into card drafts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::CardDraft;

/// Number of cards requested when the caller does not say.
pub const DEFAULT_CARD_COUNT: u32 = 10;

/// Notes shorter than this are left to the heuristic extractor when it
/// already found enough cards.
pub const SHORT_NOTES_CHARS: usize = 300;

/// Heuristic card count considered good enough for short notes.
pub const ENOUGH_HEURISTIC_CARDS: usize = 2;

/// Cards for one named category in a categorized reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCategory {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CardDraft>,
}

/// A parsed reply from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedDeck {
    Cards(Vec<CardDraft>),
    Categories(Vec<GeneratedCategory>),
}

impl GeneratedDeck {
    pub fn card_count(&self) -> usize {
        match self {
            Self::Cards(cards) => cards.len(),
            Self::Categories(categories) => categories.iter().map(|c| c.cards.len()).sum(),
        }
    }
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    cards: Option<Vec<CardDraft>>,
    #[serde(default)]
    categories: Option<Vec<GeneratedCategory>>,
}

/// Prompt asking the collaborator for `count` question/answer pairs.
pub fn build_prompt(notes: &str, count: u32) -> String {
    format!(
        "You are an expert educator. Extract exactly {count} important Q/A pairs from the notes into JSON. \
         Format: {{\"categories\":[{{\"name\":\"Topic\",\"cards\":[{{\"question\":\"...\",\"answer\":\"...\"}}]}}]}} \
         NOTES: {notes}"
    )
}

/// Remove markdown code-fence markers around a JSON reply.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a raw collaborator reply.
///
/// A categorized reply takes precedence over a flat `cards` list. Replies
/// with leading or trailing chatter around the JSON object are tolerated.
pub fn parse_response(raw: &str) -> Result<GeneratedDeck> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(Error::RemoteGenerationFailure("empty response".to_string()));
    }

    let reply: RawReply = match serde_json::from_str(&cleaned) {
        Ok(reply) => reply,
        Err(first_err) => {
            let object = embedded_object(&cleaned).ok_or_else(|| {
                Error::RemoteGenerationFailure(format!("response is not JSON: {first_err}"))
            })?;
            serde_json::from_str(object).map_err(|e| {
                Error::RemoteGenerationFailure(format!("response is not JSON: {e}"))
            })?
        }
    };

    match (reply.categories, reply.cards) {
        (Some(categories), _) => Ok(GeneratedDeck::Categories(categories)),
        (None, Some(cards)) => Ok(GeneratedDeck::Cards(cards)),
        (None, None) => Err(Error::RemoteGenerationFailure(
            "response has neither cards nor categories".to_string(),
        )),
    }
}

fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Where cards for a generation request should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPlan {
    /// Use the heuristic extractor's output.
    Heuristic,
    /// Call the remote collaborator.
    Remote,
    /// Remote generation was forced but no credentials are configured.
    MissingCredentials,
}

impl GenerationPlan {
    pub fn decide(notes: &str, heuristic_count: usize, has_credentials: bool, force_remote: bool) -> Self {
        if !has_credentials {
            return if force_remote {
                Self::MissingCredentials
            } else {
                Self::Heuristic
            };
        }
        if !force_remote
            && notes.chars().count() < SHORT_NOTES_CHARS
            && heuristic_count >= ENOUGH_HEURISTIC_CARDS
        {
            return Self::Heuristic;
        }
        Self::Remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"cards\":[]}\n```"), "{\"cards\":[]}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_flat_cards() {
        let deck = parse_response(r#"{"cards":[{"question":"Q1","answer":"A1"}]}"#).unwrap();
        assert_eq!(deck, GeneratedDeck::Cards(vec![CardDraft::new("Q1", "A1")]));
    }

    #[test]
    fn parses_fenced_categories() {
        let raw = "```json\n{\"categories\":[{\"name\":\"Bio\",\"cards\":[{\"question\":\"Q\",\"answer\":\"A\"}]},{\"name\":\"Chem\",\"cards\":[]}]}\n```";
        let deck = parse_response(raw).unwrap();
        assert_eq!(deck.card_count(), 1);
        match deck {
            GeneratedDeck::Categories(categories) => {
                assert_eq!(categories.len(), 2);
                assert_eq!(categories[0].name, "Bio");
            }
            other => panic!("expected categories, got {other:?}"),
        }
    }

    #[test]
    fn tolerates_chatter_around_json() {
        let deck = parse_response("Sure! Here you go: {\"cards\":[{\"question\":\"Q\",\"answer\":\"A\"}]} Enjoy.").unwrap();
        assert_eq!(deck, GeneratedDeck::Cards(vec![CardDraft::new("Q", "A")]));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let deck = parse_response(r#"{"cards":[{"question":"only question"}]}"#).unwrap();
        assert_eq!(deck, GeneratedDeck::Cards(vec![CardDraft::new("only question", "")]));
    }

    #[test]
    fn rejects_unparsable_or_shapeless_replies() {
        assert!(matches!(parse_response("no json here"), Err(Error::RemoteGenerationFailure(_))));
        assert!(matches!(parse_response(""), Err(Error::RemoteGenerationFailure(_))));
        assert!(matches!(parse_response(r#"{"items":[]}"#), Err(Error::RemoteGenerationFailure(_))));
    }

    #[test]
    fn prompt_mentions_count_and_notes() {
        let prompt = build_prompt("cells are small", 7);
        assert!(prompt.contains("exactly 7"));
        assert!(prompt.ends_with("NOTES: cells are small"));
        assert!(prompt.contains(r#"{"categories":[{"name":"Topic""#));
    }

    #[test]
    fn plan_decision_table() {
        let short = "a: b\nc: d";
        let long = "x".repeat(SHORT_NOTES_CHARS);
        assert_eq!(GenerationPlan::decide(short, 2, false, false), GenerationPlan::Heuristic);
        assert_eq!(GenerationPlan::decide(short, 2, false, true), GenerationPlan::MissingCredentials);
        assert_eq!(GenerationPlan::decide(short, 2, true, false), GenerationPlan::Heuristic);
        assert_eq!(GenerationPlan::decide(short, 1, true, false), GenerationPlan::Remote);
        assert_eq!(GenerationPlan::decide(short, 2, true, true), GenerationPlan::Remote);
        assert_eq!(GenerationPlan::decide(&long, 5, true, false), GenerationPlan::Remote);
    }
}
