use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::PipelineError;
use crate::inference::encoder::FeatureVector;

/// Fitted standard-scaler parameters, `(x - mean) / scale` per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Builds a scaler from fitted parameters.
    ///
    /// A zero scale marks a feature that was constant during fitting; it is replaced by
    /// 1.0 so the feature is only centred.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.is_empty() {
            return Err(anyhow::anyhow!("Scaler has no fitted features"));
        }
        if mean.len() != scale.len() {
            return Err(anyhow::anyhow!(
                "Scaler parameter length mismatch: {} means vs {} scales",
                mean.len(),
                scale.len()
            ));
        }
        if let Some(idx) = mean.iter().chain(scale.iter()).position(|v| !v.is_finite()) {
            return Err(anyhow::anyhow!(
                "Scaler parameter at position {} is not finite",
                idx % mean.len()
            ));
        }
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { mean, scale })
    }

    /// Loads `{"mean": [...], "scale": [...]}` from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler artifact at {:?}", path))?;
        let parsed: Scaler = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler artifact at {:?}", path))?;
        Self::new(parsed.mean, parsed.scale)
            .with_context(|| format!("Invalid scaler artifact at {:?}", path))
    }

    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    pub fn normalize(&self, vector: &FeatureVector) -> Result<FeatureVector, PipelineError> {
        if vector.len() != self.feature_count() {
            return Err(PipelineError::ScalerMismatch {
                expected: self.feature_count(),
                actual: vector.len(),
            });
        }
        let scaled = vector
            .as_slice()
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();
        Ok(FeatureVector::from_vec(scaled))
    }
}
