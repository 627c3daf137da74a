pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use notecards_core::algorithm::{get_policy, ReviewPolicy, ThreeBucket};
use notecards_core::{adjusted_today, MissedDay, StreakTracker};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StoreKind};
use crate::services::generation::{HttpGenerator, TextGenerator};
use crate::store::{KvStore, MemoryStore, Repository, SqliteStore};

/// Scheduling and streak rules shared by the study endpoints.
pub struct StudySettings {
    pub policy: Arc<dyn ReviewPolicy>,
    pub streak: StreakTracker,
    pub daily_reset_hour: u32,
    pub card_count: u32,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            policy: Arc::new(ThreeBucket::default()),
            streak: StreakTracker::default(),
            daily_reset_hour: 0,
            card_count: notecards_core::generation::DEFAULT_CARD_COUNT,
        }
    }
}

impl StudySettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let policy = get_policy(&config.review_policy)
            .ok_or_else(|| anyhow::anyhow!("unknown review policy `{}`", config.review_policy))?;
        let missed_day = if config.strict_streak {
            MissedDay::ResetStreak
        } else {
            MissedDay::KeepStreak
        };
        Ok(Self {
            policy: Arc::from(policy),
            streak: StreakTracker {
                missed_day,
                ..StreakTracker::default()
            },
            daily_reset_hour: config.daily_reset_hour,
            card_count: config.card_count,
        })
    }

    /// Current study day in local time.
    pub fn today(&self) -> NaiveDate {
        adjusted_today(Local::now().naive_local(), self.daily_reset_hour)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub study: Arc<StudySettings>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KvStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        study: StudySettings,
    ) -> Self {
        Self {
            repo: Arc::new(Repository::new(store)),
            generator,
            study: Arc::new(study),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Category routes
        .route(
            "/api/categories",
            get(routes::categories::list).post(routes::categories::create),
        )
        .route(
            "/api/categories/:id",
            put(routes::categories::rename).delete(routes::categories::delete),
        )
        .route(
            "/api/selected-category",
            get(routes::categories::selected).put(routes::categories::select),
        )
        // Card routes
        .route(
            "/api/categories/:id/cards",
            get(routes::cards::list)
                .post(routes::cards::create)
                .delete(routes::cards::clear),
        )
        .route(
            "/api/categories/:id/cards/:card_id",
            put(routes::cards::update).delete(routes::cards::delete),
        )
        // Extraction routes
        .route("/api/extract", post(routes::extract::extract))
        .route("/api/generate", post(routes::extract::generate))
        // Study routes
        .route("/api/study/queue", get(routes::study::queue))
        .route("/api/study/review", post(routes::study::review))
        .route("/api/stats", get(routes::stats::get_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn KvStore> = match &config.store {
        StoreKind::Sqlite(path) => {
            tracing::info!("Opening store at {}", path.display());
            Arc::new(SqliteStore::open(path)?)
        }
        StoreKind::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let generator = HttpGenerator::from_config(&config).map(|g| Arc::new(g) as Arc<dyn TextGenerator>);
    match &generator {
        Some(g) => tracing::info!(provider = %g.provider(), "Remote generation enabled"),
        None => tracing::info!(provider = %config.provider, "No API key set, heuristic extraction only"),
    }

    let state = AppState::new(store, generator, StudySettings::from_config(&config)?);
    state.repo.categories()?;

    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
