//! Single-record prediction
//!
//! `POST /predict` runs one form submission through the maintenance model.
//! Depending on configuration the outcome is rendered on the landing page
//! or handed to the dashboard through a redirect.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use pdm_common::{BinaryOutcome, Error, SensorReading};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::api::ui::pages;
use crate::error::{WebError, WebResult};
use crate::AppState;

/// Shown for any missing or malformed form field
pub const INPUT_ERROR_TEXT: &str = "Input error: Please enter valid numeric values for all fields.";

/// Prefix of the rendered outcome
pub const PREDICTION_TEXT_PREFIX: &str = "The need for maintenance is: ";

/// Query string handed to `GET /dashboard`
#[derive(Debug, Serialize)]
pub struct DashboardQuery<'a> {
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: i64,
    pub torque: f64,
    pub tool_wear: i64,
    pub machine_type: &'a str,
    pub prediction: &'a str,
}

impl<'a> DashboardQuery<'a> {
    pub fn new(reading: &'a SensorReading, outcome: BinaryOutcome) -> Self {
        Self {
            air_temperature: reading.air_temperature,
            process_temperature: reading.process_temperature,
            rotational_speed: reading.rotational_speed,
            torque: reading.torque,
            tool_wear: reading.tool_wear,
            machine_type: &reading.machine_type,
            prediction: outcome.as_str(),
        }
    }
}

/// Normalize, predict once, decode
pub async fn predict_outcome(
    state: &AppState,
    fields: &HashMap<String, String>,
) -> pdm_common::Result<(SensorReading, BinaryOutcome)> {
    let reading = SensorReading::from_form(fields)?;
    let codes = state.maintenance.predict(vec![reading.to_feature_row()]).await?;
    let code = codes
        .first()
        .copied()
        .ok_or_else(|| Error::Prediction("maintenance model returned no code".to_string()))?;
    let outcome = BinaryOutcome::from_code(code)?;
    Ok((reading, outcome))
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> WebResult<Response> {
    let Form(fields) = match form {
        Ok(form) => form,
        Err(rejection) => {
            info!("Rejected prediction form: {}", rejection.body_text());
            return Ok(Html(pages::index_page(Some(INPUT_ERROR_TEXT))).into_response());
        }
    };

    let (reading, outcome) = match predict_outcome(&state, &fields).await {
        Ok(result) => result,
        Err(Error::Validation(msg)) => {
            info!("Rejected prediction input: {}", msg);
            return Ok(Html(pages::index_page(Some(INPUT_ERROR_TEXT))).into_response());
        }
        Err(e) => return Err(WebError::from(e)),
    };

    info!("Maintenance prediction: {}", outcome);

    if state.config.dashboard {
        let query = serde_urlencoded::to_string(DashboardQuery::new(&reading, outcome))
            .map_err(|e| WebError::BadRequest(e.to_string()))?;
        return Ok(Redirect::to(&format!("/dashboard?{}", query)).into_response());
    }

    let text = format!("{}{}", PREDICTION_TEXT_PREFIX, outcome);
    Ok(Html(pages::index_page(Some(&text))).into_response())
}

/// Build prediction routes
///
/// Only POST is routed; GET /predict answers 405.
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}
