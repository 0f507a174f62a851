//! Router assembly and serving.

use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::ServerConfig;
use super::{dashboard, routes};
use crate::pipeline::PredictionPipeline;
use crate::telemetry;
use crate::{CookError, Result};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
}

/// Build the application router.
pub fn router(pipeline: Arc<PredictionPipeline>, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/", get(routes::index))
        .route("/predict", post(routes::predict))
        .route("/health", get(routes::health))
        .route("/labels", get(routes::labels))
        .route("/dashboard", get(dashboard::page).post(dashboard::submit))
        .route_layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline });

    if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics::counter!(telemetry::HTTP_REQUESTS_TOTAL,
        "route" => route,
        "status" => response.status().as_u16().to_string(),
    )
    .increment(1);

    response
}

/// Bind `config.address` and serve until Ctrl-C.
pub async fn serve(pipeline: Arc<PredictionPipeline>, config: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.address).await.map_err(|e| {
        CookError::Configuration(format!("Failed to bind {}: {e}", config.address))
    })?;
    serve_on(listener, pipeline, config).await
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve_on(
    listener: TcpListener,
    pipeline: Arc<PredictionPipeline>,
    config: &ServerConfig,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, router(pipeline, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
