//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};

use notecards_core::algorithm::get_policy;

use crate::services::generation::Provider;

const DEFAULT_POLICY: &str = "three_bucket";
/// Same as the default, except `hard` resets repetitions.
const STRICT_POLICY: &str = "three_bucket_strict";

/// Which key-value store backs the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite(PathBuf),
    Memory,
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub store: StoreKind,
    pub daily_reset_hour: u32,
    pub strict_streak: bool,
    /// Review policy name, resolved with `get_policy`.
    pub review_policy: String,
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub card_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_filter: "info".to_string(),
            store: StoreKind::Sqlite(default_store_path()),
            daily_reset_hour: 0,
            strict_streak: false,
            review_policy: DEFAULT_POLICY.to_string(),
            provider: Provider::Gemini,
            openai_api_key: None,
            gemini_api_key: None,
            groq_api_key: None,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            card_count: notecards_core::generation::DEFAULT_CARD_COUNT,
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_var("PORT", &port)?;
        }
        if let Some(filter) = get("RUST_LOG") {
            config.log_filter = filter;
        }

        let store_path = get("STORE_PATH").map(PathBuf::from);
        config.store = match get("STORE").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite(store_path.unwrap_or_else(default_store_path)),
            Some("memory") => StoreKind::Memory,
            Some(other) => return Err(anyhow!("STORE must be `sqlite` or `memory`, got `{other}`")),
        };

        if let Some(hour) = get("DAILY_RESET_HOUR") {
            let hour: u32 = parse_var("DAILY_RESET_HOUR", &hour)?;
            if hour > 23 {
                return Err(anyhow!("DAILY_RESET_HOUR must be between 0 and 23, got {hour}"));
            }
            config.daily_reset_hour = hour;
        }
        if let Some(strict) = get("STRICT_STREAK") {
            config.strict_streak = parse_flag("STRICT_STREAK", &strict)?;
        }
        if let Some(reset) = get("HARD_RESETS_REPS") {
            if parse_flag("HARD_RESETS_REPS", &reset)? {
                config.review_policy = STRICT_POLICY.to_string();
            }
        }
        if let Some(policy) = get("REVIEW_POLICY") {
            if get_policy(&policy).is_none() {
                return Err(anyhow!(
                    "REVIEW_POLICY must be `{DEFAULT_POLICY}` or `{STRICT_POLICY}`, got `{policy}`"
                ));
            }
            config.review_policy = policy;
        }

        if let Some(provider) = get("AI_PROVIDER") {
            config.provider = parse_var("AI_PROVIDER", &provider)?;
        }
        config.openai_api_key = get("OPENAI_API_KEY");
        config.gemini_api_key = get("GEMINI_API_KEY");
        config.groq_api_key = get("GROQ_API_KEY");
        if let Some(url) = get("OLLAMA_URL") {
            config.ollama_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            config.ollama_model = model;
        }
        if let Some(count) = get("CARD_COUNT") {
            let count: u32 = parse_var("CARD_COUNT", &count)?;
            if count == 0 {
                return Err(anyhow!("CARD_COUNT must be at least 1"));
            }
            config.card_count = count;
        }

        Ok(config)
    }

    /// The API key for the selected provider.
    ///
    /// Ollama runs locally and needs no key; it is treated as configured.
    pub fn provider_key(&self) -> Option<String> {
        match self.provider {
            Provider::OpenAi => self.openai_api_key.clone(),
            Provider::Gemini => self.gemini_api_key.clone(),
            Provider::Groq => self.groq_api_key.clone(),
            Provider::Ollama => Some(String::new()),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notecards")
        .join("store.db")
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value for {key}: `{value}`"))
}

fn parse_flag(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("invalid value for {key}: `{value}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.daily_reset_hour, 0);
        assert!(!config.strict_streak);
        assert_eq!(config.review_policy, "three_bucket");
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.card_count, 10);
        assert!(matches!(config.store, StoreKind::Sqlite(ref p) if p.ends_with("notecards/store.db")));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("STORE", "memory"),
            ("DAILY_RESET_HOUR", "4"),
            ("STRICT_STREAK", "true"),
            ("AI_PROVIDER", "groq"),
            ("GROQ_API_KEY", "gsk-test"),
            ("OLLAMA_URL", "http://ollama:11434/"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.daily_reset_hour, 4);
        assert!(config.strict_streak);
        assert_eq!(config.provider_key().as_deref(), Some("gsk-test"));
        assert_eq!(config.ollama_url, "http://ollama:11434");
    }

    #[test]
    fn test_review_policy_selection() {
        let legacy = config(&[("HARD_RESETS_REPS", "yes")]).unwrap();
        assert_eq!(legacy.review_policy, "three_bucket_strict");

        let named = config(&[("REVIEW_POLICY", "three_bucket_strict")]).unwrap();
        assert_eq!(named.review_policy, "three_bucket_strict");

        assert!(config(&[("REVIEW_POLICY", "sm2")]).is_err());
    }

    #[test]
    fn test_blank_keys_are_absent() {
        let config = config(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert_eq!(config.provider_key(), None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("DAILY_RESET_HOUR", "24")]).is_err());
        assert!(config(&[("STORE", "redis")]).is_err());
        assert!(config(&[("AI_PROVIDER", "claude")]).is_err());
        assert!(config(&[("STRICT_STREAK", "maybe")]).is_err());
        assert!(config(&[("CARD_COUNT", "0")]).is_err());
    }
}
