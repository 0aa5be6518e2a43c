mod config;
mod enrichment;
mod errors;
mod leads;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enrichment::search::GoogleSearchClient;
use crate::leads::scoring::ScoringConfig;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::CsvRecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lead Radar v{}", env!("CARGO_PKG_VERSION"));

    let scoring = ScoringConfig::load(config.scoring_config.as_deref())
        .context("Failed to load scoring config")?;
    info!(
        "Scoring: {} per project, vacancy bonus {}, thresholds {}/{}",
        scoring.per_project,
        scoring.vacancy_bonus,
        scoring.thresholds.high,
        scoring.thresholds.medium
    );

    let store = CsvRecordStore::new(&config.data_file, scoring.clone());
    info!("Record store: {:?}", store.path());

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        RetryPolicy::default(),
    )
    .context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, key present: {})",
        llm_client::MODEL,
        config.openai_api_key.is_some()
    );

    let search = GoogleSearchClient::new(config.google_api_key.clone(), config.google_cx.clone())
        .context("Failed to build search client")?;
    info!(
        "Search client initialized (credentials present: {})",
        config.google_api_key.is_some() && config.google_cx.is_some()
    );

    let state = AppState {
        store: Arc::new(store),
        scoring: Arc::new(scoring),
        llm: Arc::new(llm),
        search: Arc::new(search),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
