//! Sensor readings and the input normalizer
//!
//! Translates user-facing field names (`air_temperature`, ...) and uploaded
//! table columns into the column vocabulary the exported pipeline was fitted
//! on (`Air temperature [K]`, ...). Everything here is a pure transformation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// Declared type of a model column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Integer,
    Category,
}

/// One model input column and the form field that feeds it
#[derive(Debug, Clone, Copy)]
pub struct ModelColumn {
    /// Form field name
    pub field: &'static str,
    /// Column name expected by the pipeline
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Model input columns, in pipeline order
pub const MODEL_COLUMNS: [ModelColumn; 6] = [
    ModelColumn { field: "air_temperature", name: "Air temperature [K]", kind: ColumnKind::Float },
    ModelColumn { field: "process_temperature", name: "Process temperature [K]", kind: ColumnKind::Float },
    ModelColumn { field: "rotational_speed", name: "Rotational speed [rpm]", kind: ColumnKind::Integer },
    ModelColumn { field: "torque", name: "Torque [Nm]", kind: ColumnKind::Float },
    ModelColumn { field: "tool_wear", name: "Tool wear [min]", kind: ColumnKind::Integer },
    ModelColumn { field: "machine_type", name: "Type", kind: ColumnKind::Category },
];

/// One typed cell of a normalized row
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// A normalized row: one value per entry of [`MODEL_COLUMNS`], same order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<FeatureValue>,
}

impl FeatureRow {
    /// Build a row from values already in [`MODEL_COLUMNS`] order
    pub fn new(values: Vec<FeatureValue>) -> Result<Self> {
        if values.len() != MODEL_COLUMNS.len() {
            return Err(Error::Validation(format!(
                "expected {} columns, got {}",
                MODEL_COLUMNS.len(),
                values.len()
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Look up a value by model column name
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        MODEL_COLUMNS
            .iter()
            .position(|c| c.name == column)
            .and_then(|idx| self.values.get(idx))
    }
}

/// One fully validated single-record submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Kelvin
    pub air_temperature: f64,
    /// Kelvin
    pub process_temperature: f64,
    /// rpm
    pub rotational_speed: i64,
    /// Nm
    pub torque: f64,
    /// minutes
    pub tool_wear: i64,
    pub machine_type: String,
}

impl SensorReading {
    /// Normalize raw form fields keyed by the user-facing field names
    ///
    /// Every field is mandatory. The first missing or malformed field aborts
    /// normalization; no partial reading is produced.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self> {
        let raw = |field: &str| -> Result<&str> {
            let value = fields
                .get(field)
                .map(|v| v.trim())
                .ok_or_else(|| Error::Validation(format!("missing field '{}'", field)))?;
            if value.is_empty() {
                return Err(Error::Validation(format!("field '{}' is empty", field)));
            }
            Ok(value)
        };

        Ok(Self {
            air_temperature: parse_float("air_temperature", raw("air_temperature")?)?,
            process_temperature: parse_float("process_temperature", raw("process_temperature")?)?,
            rotational_speed: parse_integer("rotational_speed", raw("rotational_speed")?)?,
            torque: parse_float("torque", raw("torque")?)?,
            tool_wear: parse_integer("tool_wear", raw("tool_wear")?)?,
            machine_type: raw("machine_type")?.to_string(),
        })
    }

    /// Row in the pipeline's column vocabulary
    pub fn to_feature_row(&self) -> FeatureRow {
        FeatureRow {
            values: vec![
                FeatureValue::Number(self.air_temperature),
                FeatureValue::Number(self.process_temperature),
                FeatureValue::Number(self.rotational_speed as f64),
                FeatureValue::Number(self.torque),
                FeatureValue::Number(self.tool_wear as f64),
                FeatureValue::Category(self.machine_type.clone()),
            ],
        }
    }
}

fn parse_float(field: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::Validation(format!(
            "field '{}' is not a valid number: '{}'",
            field, value
        ))),
    }
}

fn parse_integer(field: &str, value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| {
        Error::Validation(format!(
            "field '{}' is not a valid integer: '{}'",
            field, value
        ))
    })
}

/// Normalize an uploaded table into model rows
///
/// `identifier_column`, when present in the header, is dropped before the
/// model columns are located. Every model column must appear in the header;
/// other columns are ignored. Numeric cells are read as numbers whatever
/// their integer/float spelling.
pub fn normalize_table(
    headers: &[String],
    rows: &[Vec<String>],
    identifier_column: Option<&str>,
) -> Result<Vec<FeatureRow>> {
    let kept: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| Some(h.trim()) != identifier_column)
        .map(|(idx, h)| (idx, h.trim()))
        .collect();

    let mut positions = Vec::with_capacity(MODEL_COLUMNS.len());
    let mut missing = Vec::new();
    for column in MODEL_COLUMNS.iter() {
        match kept.iter().find(|(_, h)| *h == column.name) {
            Some((idx, _)) => positions.push(*idx),
            None => missing.push(column.name),
        }
    }
    if !missing.is_empty() {
        return Err(Error::Schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    rows.iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let values = MODEL_COLUMNS
                .iter()
                .zip(&positions)
                .map(|(column, &pos)| {
                    let cell = row.get(pos).map(|c| c.trim()).unwrap_or("");
                    match column.kind {
                        ColumnKind::Category => Ok(FeatureValue::Category(cell.to_string())),
                        ColumnKind::Float | ColumnKind::Integer => match cell.parse::<f64>() {
                            Ok(v) if v.is_finite() => Ok(FeatureValue::Number(v)),
                            _ => Err(Error::Validation(format!(
                                "row {}: column '{}' is not numeric: '{}'",
                                row_idx + 1,
                                column.name,
                                cell
                            ))),
                        },
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FeatureRow { values })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_form() -> HashMap<String, String> {
        [
            ("air_temperature", "298.6"),
            ("process_temperature", "308.9"),
            ("rotational_speed", "2986"),
            ("torque", "30.9"),
            ("tool_wear", "206"),
            ("machine_type", "Low"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_from_form_reference_reading() {
        let reading = SensorReading::from_form(&reference_form()).unwrap();
        assert_eq!(reading.air_temperature, 298.6);
        assert_eq!(reading.process_temperature, 308.9);
        assert_eq!(reading.rotational_speed, 2986);
        assert_eq!(reading.torque, 30.9);
        assert_eq!(reading.tool_wear, 206);
        assert_eq!(reading.machine_type, "Low");
    }

    #[test]
    fn test_every_field_is_mandatory() {
        for column in MODEL_COLUMNS.iter() {
            let mut form = reference_form();
            form.remove(column.field);
            let err = SensorReading::from_form(&form).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "missing {}", column.field);
        }
    }

    #[test]
    fn test_corrupt_numeric_fields_rejected() {
        for column in MODEL_COLUMNS.iter().filter(|c| c.kind != ColumnKind::Category) {
            for bad in ["abc", "", "   ", "nan", "1e400"] {
                let mut form = reference_form();
                form.insert(column.field.to_string(), bad.to_string());
                assert!(
                    matches!(SensorReading::from_form(&form), Err(Error::Validation(_))),
                    "{}={:?} should be rejected",
                    column.field,
                    bad
                );
            }
        }
    }

    #[test]
    fn test_integer_fields_reject_fractions() {
        let mut form = reference_form();
        form.insert("tool_wear".to_string(), "206.5".to_string());
        assert!(SensorReading::from_form(&form).is_err());
    }

    #[test]
    fn test_empty_machine_type_rejected() {
        let mut form = reference_form();
        form.insert("machine_type".to_string(), " ".to_string());
        assert!(SensorReading::from_form(&form).is_err());
    }

    #[test]
    fn test_feature_row_uses_model_vocabulary() {
        let row = SensorReading::from_form(&reference_form()).unwrap().to_feature_row();
        assert_eq!(row.get("Air temperature [K]"), Some(&FeatureValue::Number(298.6)));
        assert_eq!(row.get("Rotational speed [rpm]"), Some(&FeatureValue::Number(2986.0)));
        assert_eq!(row.get("Type"), Some(&FeatureValue::Category("Low".to_string())));
        assert_eq!(row.get("air_temperature"), None);
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_table_drops_identifier_and_reorders() {
        let h = headers(&[
            "UDI",
            "Type",
            "Tool wear [min]",
            "Torque [Nm]",
            "Rotational speed [rpm]",
            "Process temperature [K]",
            "Air temperature [K]",
        ]);
        let rows = vec![vec!["1", "M", "0", "42.8", "1551", "308.6", "298.1"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()];

        let normalized = normalize_table(&h, &rows, Some("UDI")).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(
            normalized[0].values(),
            &[
                FeatureValue::Number(298.1),
                FeatureValue::Number(308.6),
                FeatureValue::Number(1551.0),
                FeatureValue::Number(42.8),
                FeatureValue::Number(0.0),
                FeatureValue::Category("M".to_string()),
            ]
        );
    }

    #[test]
    fn test_normalize_table_missing_columns_is_schema_error() {
        let h = headers(&["UDI", "Type", "Torque [Nm]"]);
        let err = normalize_table(&h, &[], Some("UDI")).unwrap_err();
        match err {
            Error::Schema(msg) => {
                assert!(msg.contains("Air temperature [K]"));
                assert!(msg.contains("Tool wear [min]"));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_table_identifier_cannot_stand_in_for_model_column() {
        let h = headers(&[
            "Type",
            "Air temperature [K]",
            "Process temperature [K]",
            "Rotational speed [rpm]",
            "Torque [Nm]",
            "Tool wear [min]",
        ]);
        assert!(matches!(normalize_table(&h, &[], Some("Type")), Err(Error::Schema(_))));
    }

    #[test]
    fn test_normalize_table_bad_cell_names_row() {
        let h = headers(&[
            "Type",
            "Air temperature [K]",
            "Process temperature [K]",
            "Rotational speed [rpm]",
            "Torque [Nm]",
            "Tool wear [min]",
        ]);
        let row = |air: &str| -> Vec<String> {
            vec!["L", air, "308.6", "1551", "42.8", "0"].into_iter().map(String::from).collect()
        };
        let err = normalize_table(&h, &[row("298.1"), row("hot")], None).unwrap_err();
        match err {
            Error::Validation(msg) => assert!(msg.starts_with("row 2")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_table_empty_rows() {
        let h: Vec<String> = MODEL_COLUMNS.iter().map(|c| c.name.to_string()).collect();
        assert!(normalize_table(&h, &[], Some("UDI")).unwrap().is_empty());
    }
}
