//! # PdM Common Library
//!
//! Shared code for the predictive maintenance service:
//! - Error taxonomy
//! - Configuration loading
//! - Sensor readings and the input normalizer
//! - Label tables for the two classifiers
//! - The `Predictor` capability and ONNX classifier loading

pub mod config;
pub mod error;
pub mod labels;
pub mod model;
pub mod predictor;
pub mod reading;

pub use error::{Error, Result};
pub use labels::BinaryOutcome;
pub use predictor::{ModelSummary, Predictor};
pub use reading::{FeatureRow, FeatureValue, SensorReading};
