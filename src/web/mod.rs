//! Web server module.

mod handlers;

use crate::config::Config;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
}

/// Web server exposing the healthcheck endpoints.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration and shared client.
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        Self {
            state: AppState {
                config: Arc::new(config),
                client,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::handle_healthcheck_html))
            .route("/json", get(handlers::handle_healthcheck_json))
            .route("/readiness", get(handlers::handle_readiness))
            .route("/liveness", get(handlers::handle_liveness))
            .route("/favicon.ico", get(handlers::handle_favicon))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
