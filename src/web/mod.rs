mod page_cache;
pub mod pages;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::content::ContentApi;

pub use page_cache::{PageCache, RevalidationCache};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ContentApi>,
    pub config: Arc<Config>,
    pub cache: Arc<PageCache>,
    /// Cancelled on shutdown; every listing view is scoped to a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, api: Arc<dyn ContentApi>, shutdown: CancellationToken) -> Self {
        Self {
            api,
            cache: Arc::new(PageCache::new(config.revalidate_after)),
            config: Arc::new(config),
            shutdown,
        }
    }
}

/// Start the web server and run until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(config: Config, api: Arc<dyn ContentApi>, shutdown: CancellationToken) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::new(config, api, shutdown.clone());
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Web server error")?;

    info!("Web server stopped");
    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
