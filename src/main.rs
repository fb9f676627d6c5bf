//! SSS Healthcheck - Spatial Support System health-aggregation endpoint.
//!
//! Polls the external services backing the spatial-tracking platform and
//! exposes a pass/fail verdict with per-source detail as JSON and HTML.

mod config;
mod probe;
mod report;
mod web;

use config::Config;
use web::Server;

use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load a local .env file if one exists, before anything reads the
    // environment.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sss_healthcheck=info".parse()?),
        )
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting SSS healthcheck service on port {}...", cfg.port);

    // Shared HTTP client; the timeout bounds every outbound probe request.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.http_timeout_secs))
        .build()?;

    // Start web server
    let server = Server::new(cfg, client);
    server.start().await?;

    Ok(())
}
