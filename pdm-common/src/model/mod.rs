//! Exported classifiers
//!
//! A model is two files side by side: the ONNX graph (`maintenance.onnx`)
//! and its feature layout manifest (`maintenance.manifest.json`). Loading
//! happens once at startup; the result is immutable and safe to share
//! across request handlers.

pub mod manifest;
pub mod onnx;

pub use manifest::{ColumnEncoder, ModelManifest, UnknownCategory};
pub use onnx::OnnxClassifier;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{Error, Result};

/// Manifest location for a graph: same stem, `.manifest.json`
pub fn manifest_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("manifest.json")
}

/// Parse a manifest from JSON text
pub fn load_manifest_str(json: &str) -> Result<ModelManifest> {
    serde_json::from_str(json).map_err(|e| Error::Model(format!("Invalid model manifest: {}", e)))
}

/// Read the manifest next to `model_path`, then load the graph
pub fn load_from_path(model_path: &Path) -> Result<OnnxClassifier> {
    let manifest_file = manifest_path(model_path);
    let content = std::fs::read_to_string(&manifest_file).map_err(|e| {
        Error::Model(format!("Failed to read model manifest {}: {}", manifest_file.display(), e))
    })?;
    let manifest = load_manifest_str(&content)
        .map_err(|e| Error::Model(format!("{}: {}", manifest_file.display(), e)))?;

    let model = OnnxClassifier::load(model_path, manifest)?;
    info!("Loaded model {}", model_path.display());
    Ok(model)
}
