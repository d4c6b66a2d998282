//! HTTP front for the product search and review summary backend.
//!
//! - `GET /api/search?keyword=` forwards to the backend search endpoint
//! - `POST /api/summary` forwards a product to the backend analysis endpoint
//! - `GET /health` answers `{ "ok": true }`

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use services::services::{
    backend_api::BackendClient, search_proxy::SearchProxy, summary_proxy::SummaryProxy,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;

use config::ServerConfig;

#[derive(Debug, Clone)]
pub struct AppState {
    pub search: SearchProxy,
    pub summary: SummaryProxy,
}

impl AppState {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            search: SearchProxy::new(backend.clone()),
            summary: SummaryProxy::new(backend),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", routes::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!(backend = %config.backend_base_url, "Initializing backend client...");
    let backend = BackendClient::new(config.backend_base_url.clone(), config.upstream_timeout)?;
    let app = app(AppState::new(backend));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
