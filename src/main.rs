//! Health Triage Assistant — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart and endpoint notes.

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use health_triage_assistant::api::{router, AppState};
use health_triage_assistant::config::AssistantConfig;
use health_triage_assistant::dataset::{self, source::FileSource, DatasetHandle};
use health_triage_assistant::metrics::Metrics;

pub const ENV_BIND_ADDR: &str = "HEALTH_BIND";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("health_triage_assistant=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    // This enables HEALTH_CONFIG_PATH / HEALTH_DATASET_PATH from .env
    // so config.rs and the dataset loader can pick them up.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AssistantConfig::load();
    let history_capacity = config.history.capacity;

    // --- Dataset store ---
    // A missing dataset is not fatal; replies degrade to the built-in
    // knowledge table until a load succeeds.
    let dataset = DatasetHandle::empty();
    let path = dataset::dataset_path();
    match dataset::load_from_source(&dataset, &FileSource::new(&path)).await {
        Ok(stats) => info!(
            symptoms = stats.total_symptoms,
            diseases = stats.total_diseases,
            "dataset loaded"
        ),
        Err(e) => warn!(
            error = ?e,
            path = %path.display(),
            "dataset unavailable; serving built-in knowledge only"
        ),
    }

    // If hot reload is enabled, spawn background watcher
    dataset::start_hot_reload_thread(dataset.clone(), path);

    // The recorder must be installed before the first request lands.
    let metrics = Metrics::init(history_capacity);

    let state = AppState::new(config, dataset);
    let app = router(state).merge(metrics.router());

    let addr = std::env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    info!(%addr, "health triage assistant listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
