//! HTTP server wiring
//!
//! Builds the axum router, owns the health endpoint, and runs the serve loop
//! with graceful shutdown.

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::{config::Config, db, features, middleware};

pub mod response;

/// Run the API server until a shutdown signal arrives.
pub async fn serve(config: Config) -> Result<()> {
    let pool = db::create_pool(&config.database).await?;

    let app = create_router(pool, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(pool: PgPool, config: &Config) -> Router {
    // Each `.layer` call wraps the ones before it, so CORS sits outermost
    // and compression innermost. CORS must stay outside the trace layer via
    // its own `.layer` call: the router re-boxes the response body between
    // calls, and `Cors` needs that body to implement `Default`, which the
    // trace layer's body does not.
    Router::new()
        .route("/health", get(health_check))
        .with_state(pool.clone())
        .nest("/api/v1", features::router(pool))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(pool): State<PgPool>) -> Result<Response, Response> {
    match db::health_check(&pool).await {
        Ok(()) => Ok((StatusCode::OK, Json(json!({ "status": "healthy" }))).into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
                .into_response())
        },
    }
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
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
