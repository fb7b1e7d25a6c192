//! Dashboard for a single prediction
//!
//! The predict handler redirects here with the reading and the outcome in
//! the query string; nothing is stored server-side.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use pdm_common::{BinaryOutcome, Error, SensorReading};
use std::collections::HashMap;
use tracing::info;

use crate::api::predict::INPUT_ERROR_TEXT;
use crate::api::ui::pages;
use crate::dashboard::DashboardReport;
use crate::AppState;

fn report_from_query(query: &HashMap<String, String>) -> pdm_common::Result<DashboardReport> {
    let reading = SensorReading::from_form(query)?;
    let outcome = query
        .get("prediction")
        .and_then(|p| BinaryOutcome::parse(p.trim()))
        .ok_or_else(|| Error::Validation("missing or invalid 'prediction'".to_string()))?;
    Ok(DashboardReport::new(reading, outcome))
}

/// GET /dashboard
pub async fn dashboard(Query(query): Query<HashMap<String, String>>) -> Response {
    match report_from_query(&query) {
        Ok(report) => Html(pages::dashboard_page(&report)).into_response(),
        Err(e) => {
            info!("Rejected dashboard query: {}", e);
            (StatusCode::BAD_REQUEST, Html(pages::index_page(Some(INPUT_ERROR_TEXT)))).into_response()
        }
    }
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
