//! Blockscope HTTP Server Binary
//!
//! Loads configuration and datasets, sets up the HTTP router, and starts
//! serving requests.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run --bin blockscope-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `DATA_DIR`: Directory holding `block_summary.json` and `answer_samples.json`
//! - `OPENAI_API_KEY`: Key for the explainer; without it explain calls fail
//! - `RUST_LOG`: Log level (default: info)
//!
//! Every variable overrides the matching key of `blockscope.toml`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use blockscope::config::AppConfig;
use blockscope::db;
use blockscope::http::{create_router, AppState};
use blockscope::llm::OpenAiGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Blockscope HTTP Server");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let repository = db::init_repository(&config);
    for status in repository.dataset_status().await? {
        info!(
            "dataset {}: {} records (loaded={})",
            status.name, status.records, status.loaded
        );
    }

    let generator = OpenAiGenerator::new(&config.llm)?;
    if !generator.is_configured() {
        warn!("OPENAI_API_KEY is not set; explain, generate and blend will fail");
    }
    info!("Explainer model: {}", generator.model());

    let state = AppState::new(repository, Arc::new(generator));
    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
