//! Prediction gateway
//!
//! The only place request handlers touch a classifier. Calls run on the
//! blocking pool so a panicking or slow model cannot take down the async
//! workers; every failure comes back as `Error::Prediction`.

use pdm_common::{Error, FeatureRow, ModelSummary, Predictor, Result};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared, read-only handle to one loaded classifier
#[derive(Clone)]
pub struct PredictionGateway {
    label: &'static str,
    predictor: Arc<dyn Predictor>,
}

impl PredictionGateway {
    pub fn new(label: &'static str, predictor: Arc<dyn Predictor>) -> Self {
        Self { label, predictor }
    }

    /// Run the classifier once over `rows`
    ///
    /// Returns exactly one class code per row, in input order.
    pub async fn predict(&self, rows: Vec<FeatureRow>) -> Result<Vec<i64>> {
        let expected = rows.len();
        let predictor = Arc::clone(&self.predictor);

        let outcome = tokio::task::spawn_blocking(move || predictor.predict(&rows)).await;

        let codes = match outcome {
            Ok(Ok(codes)) => codes,
            Ok(Err(Error::Prediction(msg))) => return Err(Error::Prediction(msg)),
            Ok(Err(other)) => return Err(Error::Prediction(other.to_string())),
            Err(join_err) => {
                error!("{} model crashed: {}", self.label, join_err);
                return Err(Error::Prediction(format!("{} model failed", self.label)));
            }
        };

        if codes.len() != expected {
            return Err(Error::Prediction(format!(
                "{} model returned {} codes for {} rows",
                self.label,
                codes.len(),
                expected
            )));
        }
        debug!("{} model predicted {} rows", self.label, expected);
        Ok(codes)
    }

    pub fn summary(&self) -> ModelSummary {
        self.predictor.summary()
    }
}
