//! System health and status handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::db::DocumentStore;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,
    /// Backend currently serving requests
    #[schema(example = "sqlite")]
    pub store: String,
}

/// Health check endpoint
///
/// Reports which store backend is in use, so a silent fallback to the
/// in-memory store is visible.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health<D: DocumentStore>(State(state): State<AppState<D>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        store: state.store().backend().to_string(),
    })
}
