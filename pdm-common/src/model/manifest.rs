//! Feature layout sidecar for an exported classifier
//!
//! The ONNX graph only sees a dense `f32` row. The manifest records how a
//! normalized reading becomes that row: an ordered list of column encoders
//! mirroring the fitted preprocessing step, plus the class codes the graph
//! emits.

use serde::Deserialize;

use crate::reading::{ColumnKind, FeatureRow, FeatureValue, MODEL_COLUMNS};
use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Every label the graph may emit
    pub classes: Vec<i64>,
    pub encoders: Vec<ColumnEncoder>,
}

/// Maps one model column onto one or more feature slots
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    /// Numeric column copied into a single slot
    Passthrough { column: String },
    /// Categorical column expanded into one slot per category
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: UnknownCategory,
    },
}

impl ColumnEncoder {
    pub fn column(&self) -> &str {
        match self {
            ColumnEncoder::Passthrough { column } => column,
            ColumnEncoder::OneHot { column, .. } => column,
        }
    }

    /// Number of feature slots this encoder produces
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoder::Passthrough { .. } => 1,
            ColumnEncoder::OneHot { categories, .. } => categories.len(),
        }
    }
}

/// Behaviour for a category not seen at fit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategory {
    /// All slots zero
    Ignore,
    #[default]
    Error,
}

impl ModelManifest {
    /// Total width of the encoded feature row
    pub fn width(&self) -> usize {
        self.encoders.iter().map(ColumnEncoder::width).sum()
    }

    /// Checked once at load time
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::Model(format!("{}: no classes", self.name)));
        }
        if self.encoders.is_empty() {
            return Err(Error::Model(format!("{}: no encoders", self.name)));
        }

        for encoder in &self.encoders {
            let column = MODEL_COLUMNS
                .iter()
                .find(|c| c.name == encoder.column())
                .ok_or_else(|| {
                    Error::Model(format!(
                        "{}: encoder references unknown column '{}'",
                        self.name,
                        encoder.column()
                    ))
                })?;
            match (encoder, column.kind) {
                (ColumnEncoder::Passthrough { .. }, ColumnKind::Category) => {
                    return Err(Error::Model(format!(
                        "{}: categorical column '{}' cannot be passed through",
                        self.name, column.name
                    )));
                }
                (ColumnEncoder::OneHot { categories, .. }, ColumnKind::Category) => {
                    if categories.is_empty() {
                        return Err(Error::Model(format!(
                            "{}: one-hot encoder for '{}' has no categories",
                            self.name, column.name
                        )));
                    }
                }
                (ColumnEncoder::OneHot { .. }, _) => {
                    return Err(Error::Model(format!(
                        "{}: numeric column '{}' cannot be one-hot encoded",
                        self.name, column.name
                    )));
                }
                (ColumnEncoder::Passthrough { .. }, _) => {}
            }
        }
        Ok(())
    }

    /// Apply the column encoders to one normalized row
    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<f32>> {
        let mut features = Vec::with_capacity(self.width());
        for encoder in &self.encoders {
            let value = row.get(encoder.column()).ok_or_else(|| {
                Error::Prediction(format!("input row lacks column '{}'", encoder.column()))
            })?;
            match (encoder, value) {
                (ColumnEncoder::Passthrough { .. }, FeatureValue::Number(v)) => {
                    features.push(*v as f32)
                }
                (
                    ColumnEncoder::OneHot { categories, handle_unknown, column },
                    FeatureValue::Category(c),
                ) => {
                    let hit = categories.iter().position(|cat| cat == c);
                    if hit.is_none() && *handle_unknown == UnknownCategory::Error {
                        return Err(Error::Prediction(format!(
                            "unknown category '{}' for column '{}'",
                            c, column
                        )));
                    }
                    features.extend((0..categories.len()).map(|i| {
                        if Some(i) == hit { 1.0 } else { 0.0 }
                    }));
                }
                (encoder, value) => {
                    return Err(Error::Prediction(format!(
                        "column '{}' has unexpected value type: {:?}",
                        encoder.column(),
                        value
                    )));
                }
            }
        }
        Ok(features)
    }
}
