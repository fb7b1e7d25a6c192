//! Classifier capability used by the prediction flows
//!
//! The flows only ever see `dyn Predictor`, so the artifact format behind it
//! can change without touching request handling.

use serde::Serialize;

use crate::reading::FeatureRow;
use crate::Result;

/// Opaque, deterministic classifier
///
/// Implementations are loaded once at startup and shared read-only between
/// requests, hence `Send + Sync` and `&self`.
pub trait Predictor: Send + Sync {
    /// One class code per input row, in input order
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>>;

    /// Identification for logs and the health endpoint
    fn summary(&self) -> ModelSummary;
}

/// Short description of a loaded model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub classes: Vec<i64>,
    /// Width of the encoded feature row
    pub features: usize,
}

impl std::fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, " v{}", version)?;
        }
        write!(f, " ({} features, classes {:?})", self.features, self.classes)
    }
}
