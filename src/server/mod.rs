use crate::config::Config;
use crate::upstream::{self, KeySource, ManifestSource, UpstreamClient};
use anyhow::{Context, Result};
use axum::{
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_keys;
pub mod routes_playlist;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Upstream manifest adapter
    pub manifests: Arc<dyn ManifestSource>,
    /// Upstream key adapter
    pub keys: Arc<dyn KeySource>,
}

impl AppContext {
    /// Build the HTTP adapters described by the configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        let manifests = upstream::create_manifest_source(&config, client.clone());
        let keys = upstream::create_key_source(&config, client, manifests.clone());

        Ok(Self {
            config: Arc::new(config),
            manifests,
            keys,
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/playlist.m3u8", get(routes_playlist::master_playlist))
        .route("/keys", get(routes_keys::key_set))
        // media_playlist_<ID>.m3u8; other names get 404 from the handler
        .route("/:file", get(routes_playlist::media_playlist))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    tracing::info!("Manifest origin: {}", config.upstream.manifest_url);
    tracing::info!("Key source: {} ({})", config.keys.kind(), config.keys.url());

    let ctx = AppContext::from_config(config)?;
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
