//! ONNX classifier backed by tract
//!
//! The graph is a scikit-learn classifier exported with skl2onnx
//! (`TreeEnsembleClassifier`, `zipmap` disabled): one `f32` input of shape
//! `[N, width]`, outputs `label` (`i64`) and `probabilities`. It is
//! optimized and planned once; runs are row by row on a `[1, width]` input.

use std::path::Path;
use tract_onnx::prelude::*;

use crate::model::manifest::ModelManifest;
use crate::predictor::{ModelSummary, Predictor};
use crate::reading::FeatureRow;
use crate::{Error, Result};

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

#[derive(Debug)]
pub struct OnnxClassifier {
    manifest: ModelManifest,
    plan: Plan,
}

impl OnnxClassifier {
    /// Load, optimize and plan the graph at `path` for `manifest`'s layout
    pub fn load(path: &Path, manifest: ModelManifest) -> Result<Self> {
        manifest.validate()?;
        let width = manifest.width();

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, width)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| Error::Model(format!("{}: {:#}", path.display(), e)))?;

        Ok(Self { manifest, plan })
    }

    fn classify(&self, features: &[f32]) -> Result<i64> {
        let input = Tensor::from_shape(&[1, features.len()], features)
            .map_err(|e| Error::Prediction(format!("{:#}", e)))?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| Error::Prediction(format!("{}: {:#}", self.manifest.name, e)))?;

        let labels = outputs
            .first()
            .ok_or_else(|| Error::Prediction(format!("{}: no outputs", self.manifest.name)))?
            .to_array_view::<i64>()
            .map_err(|e| Error::Prediction(format!("{}: label output: {:#}", self.manifest.name, e)))?;
        let label = labels
            .iter()
            .next()
            .copied()
            .ok_or_else(|| Error::Prediction(format!("{}: empty label output", self.manifest.name)))?;

        if !self.manifest.classes.contains(&label) {
            return Err(Error::Prediction(format!(
                "{}: label {} not in {:?}",
                self.manifest.name, label, self.manifest.classes
            )));
        }
        Ok(label)
    }
}

impl Predictor for OnnxClassifier {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
        rows.iter()
            .map(|row| {
                let features = self.manifest.encode(row)?;
                self.classify(&features)
            })
            .collect()
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.manifest.name.clone(),
            version: self.manifest.version.clone(),
            classes: self.manifest.classes.clone(),
            features: self.manifest.width(),
        }
    }
}
