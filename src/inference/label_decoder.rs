use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::PipelineError;
use crate::inference::predictor::PredictorError;

/// Fitted meal-plan label encoder: class index -> label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(anyhow::anyhow!("Label encoder has no classes"));
        }
        Ok(Self { classes })
    }

    /// Loads `{"classes": [...]}` from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label encoder artifact at {:?}", path))?;
        let parsed: LabelEncoder = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse label encoder artifact at {:?}", path))?;
        Self::new(parsed.classes)
            .with_context(|| format!("Invalid label encoder artifact at {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Inverse lookup of a class index.
    pub fn label(&self, index: usize) -> Result<&str, PipelineError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(PipelineError::UnknownLabelIndex {
                index,
                known: self.classes.len(),
            })
    }

    /// Picks the most probable class and returns its label.
    ///
    /// Ties go to the lowest index. An empty vector or one holding only NaN is a
    /// model fault, not a lookup miss.
    pub fn decode(&self, probabilities: &[f64]) -> Result<String, PipelineError> {
        if probabilities.is_empty() {
            return Err(PredictorError::EmptyOutput("meal_plan").into());
        }
        let index = argmax(probabilities).ok_or(PredictorError::NonFinite("meal_plan"))?;
        self.label(index).map(str::to_string)
    }
}

/// Index of the largest value; NaN entries never win.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (idx, &v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((idx, v)),
        })
        .map(|(idx, _)| idx)
}
