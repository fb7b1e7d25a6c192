//! Label tables mapping classifier class codes to human-readable outcomes
//!
//! The maintenance (binary) model and the failure-type model are trained
//! separately, so their code spaces are unrelated. Each table is decoded on
//! its own and the two are never merged.

use crate::{Error, Result};

/// Column appended to batch output tables
pub const PREDICTED_VALUE_COLUMN: &str = "Predicted_Value";

/// Failure-type labels, positionally indexed by class code 0..=5
pub const FAILURE_LABELS: [&str; 6] = [
    "Heat Dissipation",
    "No Failure",
    "Over Strain",
    "Power Failure",
    "Random Failure",
    "Tool Wear Failure",
];

/// Outcome of the single-record maintenance model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOutcome {
    No,
    Yes,
}

impl BinaryOutcome {
    /// Decode a maintenance class code: 0 is "No", 1 is "Yes"
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(BinaryOutcome::No),
            1 => Ok(BinaryOutcome::Yes),
            other => Err(Error::Prediction(format!(
                "maintenance model returned class code {} (expected 0 or 1)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOutcome::No => "No",
            BinaryOutcome::Yes => "Yes",
        }
    }

    /// Parse the literal outcome string carried in dashboard query strings
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "No" => Some(BinaryOutcome::No),
            "Yes" => Some(BinaryOutcome::Yes),
            _ => None,
        }
    }
}

impl std::fmt::Display for BinaryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode one failure-type class code
///
/// Codes outside 0..=5 are a prediction error rather than an index fault.
pub fn failure_label(code: i64) -> Result<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|idx| FAILURE_LABELS.get(idx).copied())
        .ok_or_else(|| {
            Error::Prediction(format!(
                "failure-type model returned class code {} (expected 0..={})",
                code,
                FAILURE_LABELS.len() - 1
            ))
        })
}

/// Decode a whole batch of failure-type codes, failing on the first bad code
pub fn decode_failure_labels(codes: &[i64]) -> Result<Vec<&'static str>> {
    codes.iter().map(|&code| failure_label(code)).collect()
}
