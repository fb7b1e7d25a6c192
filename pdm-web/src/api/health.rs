//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use pdm_common::ModelSummary;
use serde::Serialize;

use crate::AppState;

/// Loaded classifiers
#[derive(Debug, Serialize)]
pub struct ModelsHealth {
    pub maintenance: ModelSummary,
    pub failure_type: ModelSummary,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub git_hash: String,
    pub uptime_seconds: i64,
    pub models: ModelsHealth,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "pdm-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        uptime_seconds: uptime.num_seconds().max(0),
        models: ModelsHealth {
            maintenance: state.maintenance.summary(),
            failure_type: state.failure_type.summary(),
        },
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
