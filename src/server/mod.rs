//! HTTP service
//!
//! A single route, `POST /generate-qr`, turns a JSON body into a PNG
//! symbol. Everything else answers 404.

/// Request handlers and API errors
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;

/// Shared state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service settings
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wrap a configuration for sharing across requests
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the router with the generation route and body limit
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/generate-qr", post(handlers::generate_qr))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(addr).await?;
    info!("QR server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;

    Ok(())
}
