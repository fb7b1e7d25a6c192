//! pdm-web library - predictive maintenance front end
//!
//! Serves the single-record form, the dashboard, and batch CSV
//! upload/download on top of two preloaded classifiers.

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use pdm_common::config::ServerConfig;
use pdm_common::Predictor;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod batch;
pub mod dashboard;
pub mod error;
pub mod filename;
pub mod gateway;

use batch::UploadStore;
use gateway::PredictionGateway;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Binary "needs maintenance" classifier
    pub maintenance: PredictionGateway,
    /// Six-way failure type classifier
    pub failure_type: PredictionGateway,
    /// Upload directory holding inputs and `output_` results
    pub uploads: UploadStore,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServerConfig,
        maintenance: Arc<dyn Predictor>,
        failure_type: Arc<dyn Predictor>,
    ) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            config: Arc::new(config),
            maintenance: PredictionGateway::new("maintenance", maintenance),
            failure_type: PredictionGateway::new("failure-type", failure_type),
            uploads,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::predict_routes())
        .merge(api::dashboard_routes())
        .merge(api::upload_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
