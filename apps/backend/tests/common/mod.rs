//! Common test utilities and fixtures for integration tests.
//!
//! Every test runs against an in-memory store and, where remote generation
//! is involved, a scripted generator. No network or database is needed.

pub mod fixtures;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;

use notecards_backend::services::generation::{GeneratorError, Provider, TextGenerator};
use notecards_backend::store::{KvStore, MemoryStore};
use notecards_backend::{build_router, AppState, StudySettings};

/// Generator that replays a fixed reply and records the prompts it saw.
pub struct ScriptedGenerator {
    reply: Result<String, u16>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|status| GeneratorError::Status {
            status,
            body: "scripted failure".to_string(),
        })
    }
}

/// Test context holding the store and router.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub generator: Option<Arc<ScriptedGenerator>>,
    app: Router,
}

impl TestContext {
    /// Context with no remote generator configured.
    pub fn new() -> Self {
        Self::build(None, StudySettings::default())
    }

    /// Context whose remote generator replays `generator`.
    pub fn with_generator(generator: ScriptedGenerator) -> Self {
        Self::build(Some(Arc::new(generator)), StudySettings::default())
    }

    /// Context with custom study rules.
    pub fn with_settings(study: StudySettings) -> Self {
        Self::build(None, study)
    }

    fn build(generator: Option<Arc<ScriptedGenerator>>, study: StudySettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let kv: Arc<dyn KvStore> = store.clone();
        let dyn_generator = generator
            .clone()
            .map(|g| g as Arc<dyn TextGenerator>);
        let state = AppState::new(kv, dyn_generator, study);

        Self {
            store,
            generator,
            app: build_router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Id of the category selected on first use.
    pub async fn default_category(server: &TestServer) -> String {
        let response = server.get("/api/categories").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["selected_id"].as_str().unwrap().to_string()
    }

    /// Add a manual card and return its id.
    pub async fn add_card(server: &TestServer, category_id: &str, question: &str, answer: &str) -> String {
        let response = server
            .post(&format!("/api/categories/{category_id}/cards"))
            .json(&fixtures::new_card_request(question, answer))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }
}
