use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::inference::encoder::FEATURE_COUNT;
use crate::inference::label_decoder::LabelEncoder;
use crate::inference::normalizer::Scaler;
use crate::inference::predictor::{DenseNetwork, Predictor};

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Scaler, model and label encoder loaded together from one artifact directory.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub scaler: Arc<Scaler>,
    pub predictor: Arc<DenseNetwork>,
    pub label_encoder: Arc<LabelEncoder>,
}

impl ModelArtifacts {
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(anyhow::anyhow!("Artifact directory not found at: {:?}", dir));
        }
        info!(artifact_dir = %dir.display(), "Loading model artifacts");

        let scaler = Scaler::load(&dir.join(SCALER_FILE))?;
        let predictor = DenseNetwork::load(&dir.join(MODEL_FILE))?;
        let label_encoder = LabelEncoder::load(&dir.join(LABEL_ENCODER_FILE))?;

        let artifacts = Self {
            scaler: Arc::new(scaler),
            predictor: Arc::new(predictor),
            label_encoder: Arc::new(label_encoder),
        };
        artifacts
            .check_consistency()
            .with_context(|| format!("Artifacts in {:?} were not fitted together", dir))?;

        info!(
            features = artifacts.scaler.feature_count(),
            meal_plan_classes = artifacts.label_encoder.len(),
            "Model artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Checks that the three artifacts agree with each other and with the encoder.
    pub fn check_consistency(&self) -> Result<()> {
        if self.scaler.feature_count() != FEATURE_COUNT {
            return Err(anyhow::anyhow!(
                "Scaler was fitted on {} features, encoder produces {}",
                self.scaler.feature_count(),
                FEATURE_COUNT
            ));
        }
        if self.predictor.input_width() != FEATURE_COUNT {
            return Err(anyhow::anyhow!(
                "Model expects {} inputs, encoder produces {}",
                self.predictor.input_width(),
                FEATURE_COUNT
            ));
        }
        if self.predictor.meal_plan_classes() != self.label_encoder.len() {
            return Err(anyhow::anyhow!(
                "Model has {} meal-plan classes but the label encoder knows {}",
                self.predictor.meal_plan_classes(),
                self.label_encoder.len()
            ));
        }
        Ok(())
    }
}
