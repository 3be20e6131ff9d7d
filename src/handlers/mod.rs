//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Activities API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Json, Redirect},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db;
use crate::error::ApiError;
use crate::server::AppState;

pub mod activities;

/// Location of the browser front end served from the static directory
pub const INDEX_PATH: &str = "/static/index.html";

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` when the store answered
    pub status: String,
}

/// Root handler that redirects browsers to the front end
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 307, description = "Redirect to the static front end")
    ),
    tag = "root"
)]
pub async fn root() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}

/// Health check that round-trips to the store
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service and store are reachable", body = HealthResponse),
        (status = 503, description = "Store unavailable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        tracing::error!(error = ?err, "Health check failed");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database service unavailable",
        )
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests;
