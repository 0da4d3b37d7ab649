//! HTTP Server
//!
//! Exposes the query service over `POST /query` and a `GET /health` probe.


use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::service::{QueryRequest, QueryResponse, QueryService};
use crate::{FaqError, Result};

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<FaqError> for ApiError {
    #[inline]
    fn from(err: FaqError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    #[inline]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Request handler failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    #[inline]
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    collection: String,
    points: usize,
}

/// Build the application router around a shared query service
#[inline]
pub fn router(service: Arc<QueryService>) -> Router {
    Router::new()
        .route("/query", post(query))
        .route("/health", get(health))
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C
#[inline]
pub async fn serve(service: Arc<QueryService>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn query(
    State(service): State<Arc<QueryService>>,
    Json(request): Json<QueryRequest>,
) -> std::result::Result<Json<QueryResponse>, ApiError> {
    debug!("Query received (length: {})", request.question.len());

    // Embedding and index clients block on network I/O
    let response = tokio::task::spawn_blocking(move || service.answer(&request.question))
        .await?
        .inspect_err(|e| error!("Query failed: {}", e))?;

    info!("Answered query with score {:.4}", response.score);
    Ok(Json(response))
}

async fn health(
    State(service): State<Arc<QueryService>>,
) -> std::result::Result<Json<HealthResponse>, ApiError> {
    let collection = service.collection().to_string();
    let points = tokio::task::spawn_blocking(move || service.point_count())
        .await?
        .map_err(|e| {
            warn!("Health check failed: {}", e);
            ApiError::Unavailable(e.to_string())
        })?;

    Ok(Json(HealthResponse {
        status: "ok",
        collection,
        points,
    }))
}
