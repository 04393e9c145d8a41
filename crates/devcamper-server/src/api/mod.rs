pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::signal;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::features::{self, FeatureState};
use crate::geocoder::HttpGeocoder;
use crate::mailer;
use crate::middleware;
use response::{ApiResponse, ErrorResponse};

/// Connect the backing services and serve the API until shutdown
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = db::connect(&config.database).await?;
    tracing::info!(database = %config.database.name, "Document store ready");

    let geocoder = HttpGeocoder::new(&config.geocoder)?;
    let mailer = mailer::from_config(&config.mailer)?;

    let config = Arc::new(config);
    let state = FeatureState {
        store,
        config: config.clone(),
        geocoder: Arc::new(geocoder),
        mailer,
    };
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Build the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let api_v1 = features::router(state.clone());

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
        .nest("/api/v1", api_v1)
        .fallback(not_found);

    // Apply layers from innermost to outermost
    let router = middleware::rate_limit::with_rate_limit(router, &config.rate_limit);
    router
        .layer(middleware::catch_panic_layer())
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "DevCamper API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health(State(state): State<FeatureState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(ApiResponse::success(json!({
            "status": "healthy",
            "database": "connected"
        })))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Database unavailable")),
            )
                .into_response()
        },
    }
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Cannot {} {}", method, uri.path()))
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    tracing::info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
