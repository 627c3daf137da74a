//! Remote card generation with heuristic fallback.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use notecards_core::generation::{build_prompt, parse_response, GeneratedDeck, GenerationPlan};
use notecards_core::extract_cards;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;
use crate::error::ApiError;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini endpoints tried in order: (api version, model, request JSON mime type).
const GEMINI_ENDPOINTS: [(&str, &str, bool); 2] = [
    ("v1beta", "gemini-1.5-flash-latest", true),
    ("v1", "gemini-1.5-flash", false),
];

/// Remote text-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
    Groq,
    Ollama,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown provider `{0}` (expected openai, gemini, groq or ollama)")]
pub struct UnknownProvider(String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response has no text at `{0}`")]
    MissingText(&'static str),
}

/// A non-success reply, keeping whatever could be read of its body.
fn status_error<E: std::fmt::Display>(status: u16, body: Result<String, E>) -> GeneratorError {
    let body = body.unwrap_or_else(|e| format!("<body unreadable: {e}>"));
    GeneratorError::Status { status, body }
}

/// Submits a prompt and returns the collaborator's raw text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// reqwest-backed generator for the supported providers.
pub struct HttpGenerator {
    client: reqwest::Client,
    provider: Provider,
    api_key: String,
    ollama_url: String,
    ollama_model: String,
}

impl HttpGenerator {
    /// Build a generator from configuration, or `None` when the selected
    /// provider has no credentials.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.provider_key()?;
        Some(Self {
            client: reqwest::Client::new(),
            provider: config.provider,
            api_key,
            ollama_url: config.ollama_url.clone(),
            ollama_model: config.ollama_model.clone(),
        })
    }

    async fn post_json(&self, url: &str, body: &Value, bearer: bool) -> Result<Value, GeneratorError> {
        let mut request = self.client.post(url).json(body);
        if bearer {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status.as_u16(), response.text().await));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn chat_completion(&self, url: &str, body: Value) -> Result<String, GeneratorError> {
        let data = self.post_json(url, &body, true).await?;
        text_at(&data, "/choices/0/message/content")
    }

    async fn ollama(&self, prompt: &str) -> Result<String, GeneratorError> {
        let url = format!("{}/api/generate", self.ollama_url);
        let body = json!({
            "model": self.ollama_model,
            "prompt": prompt,
            "format": "json",
            "stream": false,
        });
        let data = self.post_json(&url, &body, false).await?;
        text_at(&data, "/response")
    }

    async fn gemini(&self, prompt: &str) -> Result<String, GeneratorError> {
        let mut last_error = GeneratorError::MissingText("/candidates/0/content/parts/0/text");
        for (version, model, json_mime) in GEMINI_ENDPOINTS {
            let url = format!(
                "{GEMINI_BASE_URL}/{version}/models/{model}:generateContent?key={}",
                self.api_key
            );
            let generation_config = if json_mime {
                json!({ "responseMimeType": "application/json" })
            } else {
                json!({})
            };
            let body = json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": generation_config,
            });

            match self.post_json(&url, &body, false).await {
                Ok(data) => return text_at(&data, "/candidates/0/content/parts/0/text"),
                Err(e) => {
                    tracing::debug!(version, model, error = %e, "gemini endpoint failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        match self.provider {
            Provider::OpenAi => {
                let body = json!({
                    "model": OPENAI_MODEL,
                    "messages": [{ "role": "user", "content": prompt }],
                });
                self.chat_completion(OPENAI_URL, body).await
            }
            Provider::Groq => {
                let body = json!({
                    "model": GROQ_MODEL,
                    "messages": [{ "role": "user", "content": prompt }],
                    "response_format": { "type": "json_object" },
                });
                self.chat_completion(GROQ_URL, body).await
            }
            Provider::Ollama => self.ollama(prompt).await,
            Provider::Gemini => self.gemini(prompt).await,
        }
    }
}

fn text_at(data: &Value, pointer: &'static str) -> Result<String, GeneratorError> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(GeneratorError::MissingText(pointer))
}

/// Where the returned cards came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    Heuristic,
    Remote,
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub deck: GeneratedDeck,
    pub source: CardSource,
    /// Remote generation was attempted and its output replaced by the
    /// heuristic extractor's.
    pub fallback: bool,
    pub warning: Option<String>,
}

/// Produce cards for `notes`, calling the generator only when worthwhile.
///
/// Remote failures never surface as errors; only a forced remote request
/// without a configured generator does.
pub async fn generate_cards(
    generator: Option<&dyn TextGenerator>,
    notes: &str,
    count: u32,
    force_remote: bool,
) -> Result<GenerationOutcome, ApiError> {
    let heuristic = extract_cards(notes);
    let plan = GenerationPlan::decide(notes, heuristic.len(), generator.is_some(), force_remote);

    let generator = match (plan, generator) {
        (GenerationPlan::MissingCredentials, _) | (GenerationPlan::Remote, None) => {
            return Err(ApiError::BadRequest(
                "remote generation requested but no API key is configured".to_string(),
            ));
        }
        (GenerationPlan::Heuristic, _) => {
            tracing::info!(cards = heuristic.len(), "using heuristic extraction");
            return Ok(GenerationOutcome {
                deck: GeneratedDeck::Cards(heuristic),
                source: CardSource::Heuristic,
                fallback: false,
                warning: None,
            });
        }
        (GenerationPlan::Remote, Some(generator)) => generator,
    };

    let prompt = build_prompt(notes, count);
    tracing::info!(provider = %generator.provider(), count, "requesting remote generation");

    let failure = match generator.generate(&prompt).await {
        Ok(raw) => match parse_response(&raw) {
            Ok(deck) if deck.card_count() > 0 => {
                tracing::info!(cards = deck.card_count(), "remote generation succeeded");
                return Ok(GenerationOutcome {
                    deck,
                    source: CardSource::Remote,
                    fallback: false,
                    warning: None,
                });
            }
            Ok(_) => "remote generation returned no cards".to_string(),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    tracing::warn!(provider = %generator.provider(), error = %failure, "falling back to heuristic extraction");
    Ok(GenerationOutcome {
        deck: GeneratedDeck::Cards(heuristic),
        source: CardSource::Heuristic,
        fallback: true,
        warning: Some(failure),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(reply: Result<&str, u16>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn provider(&self) -> Provider {
            Provider::Ollama
        }

        async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|status| GeneratorError::Status {
                status,
                body: String::new(),
            })
        }
    }

    const SHORT_NOTES: &str = "Q: What is ATP?\nA: Energy currency.\n\nQ: What is DNA?\nA: Genetic code.";

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" ollama ".parse::<Provider>().unwrap(), Provider::Ollama);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_status_error_keeps_body_read_failure() {
        let err = status_error(429, Ok::<_, String>("rate limited".to_string()));
        assert_eq!(err.to_string(), "provider returned status 429: rate limited");

        let err = status_error(502, Err::<String, _>("connection reset"));
        assert_eq!(
            err.to_string(),
            "provider returned status 502: <body unreadable: connection reset>"
        );
    }

    #[test]
    fn test_text_at_pointers() {
        let chat = json!({ "choices": [{ "message": { "content": "{\"cards\":[]}" } }] });
        assert_eq!(text_at(&chat, "/choices/0/message/content").unwrap(), "{\"cards\":[]}");
        assert!(matches!(
            text_at(&json!({ "choices": [] }), "/choices/0/message/content"),
            Err(GeneratorError::MissingText(_))
        ));
    }

    #[test]
    fn test_short_notes_skip_remote() {
        let generator = Scripted::new(Ok("{}"));
        let outcome = tokio_test::block_on(generate_cards(Some(&generator as &dyn TextGenerator), SHORT_NOTES, 10, false)).unwrap();
        assert_eq!(outcome.source, CardSource::Heuristic);
        assert!(!outcome.fallback);
        assert_eq!(outcome.deck.card_count(), 2);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_forced_remote_uses_reply() {
        let generator = Scripted::new(Ok(
            "```json\n{\"categories\":[{\"name\":\"Bio\",\"cards\":[{\"question\":\"Q\",\"answer\":\"A\"}]}]}\n```",
        ));
        let outcome = tokio_test::block_on(generate_cards(Some(&generator as &dyn TextGenerator), SHORT_NOTES, 3, true)).unwrap();
        assert_eq!(outcome.source, CardSource::Remote);
        assert!(matches!(outcome.deck, GeneratedDeck::Categories(_)));

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("exactly 3"));
    }

    #[test]
    fn test_remote_failure_falls_back() {
        let generator = Scripted::new(Err(500));
        let outcome = tokio_test::block_on(generate_cards(Some(&generator as &dyn TextGenerator), SHORT_NOTES, 10, true)).unwrap();
        assert!(outcome.fallback);
        assert_eq!(outcome.source, CardSource::Heuristic);
        assert_eq!(outcome.deck.card_count(), 2);
        assert!(outcome.warning.unwrap().contains("500"));
    }

    #[test]
    fn test_unparsable_reply_falls_back() {
        let generator = Scripted::new(Ok("I cannot help with that."));
        let outcome = tokio_test::block_on(generate_cards(Some(&generator as &dyn TextGenerator), SHORT_NOTES, 10, true)).unwrap();
        assert!(outcome.fallback);
    }

    #[test]
    fn test_forced_without_generator_is_rejected() {
        let result = tokio_test::block_on(generate_cards(None, SHORT_NOTES, 10, true));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let outcome = tokio_test::block_on(generate_cards(None, SHORT_NOTES, 10, false)).unwrap();
        assert_eq!(outcome.source, CardSource::Heuristic);
    }
}
