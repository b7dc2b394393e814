use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue, routing::get};
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::{CorsMode, ViajeConfig};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState, config: &ViajeConfig) -> Router {
    Router::new()
        .route("/", get(api::root))
        .nest("/api", api::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer(&config.cors_mode()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(mode: &CorsMode) -> CorsLayer {
    let origin = match mode {
        CorsMode::AnyOrigin => AllowOrigin::mirror_request(),
        CorsMode::List(origins) => AllowOrigin::list(origins.iter().filter_map(|o| {
            HeaderValue::from_str(o)
                .inspect_err(|_| warn!("Ignoring invalid CORS origin '{}'", o))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn run(config: &ViajeConfig, state: AppState) -> Result<()> {
    let app = build_router(state, config);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("ViajeIA API running at http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
