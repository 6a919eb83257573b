use thiserror::Error;

use crate::inference::predictor::PredictorError;

/// Failures raised while turning a profile into a meal plan.
///
/// Every kind is a deterministic function of the inputs and the loaded artifacts,
/// so none of them is worth retrying without changing one or the other.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// A categorical choice outside its closed enumeration.
    #[error("invalid value '{value}' for {field}; expected one of: {expected}")]
    InvalidCategory {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// A numeric profile field outside its declared bounds.
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("feature vector has {actual} entries but the scaler was fitted on {expected}")]
    ScalerMismatch { expected: usize, actual: usize },

    #[error("predictor failed: {0}")]
    Prediction(#[from] PredictorError),

    #[error("meal-plan class index {index} has no label (encoder knows {known} classes)")]
    UnknownLabelIndex { index: usize, known: usize },

    #[error("predicted macro total {total} is not positive; ratios are undefined")]
    DegenerateMacros { total: f64 },

    #[error("no menu row for diet archetype '{0}'")]
    UnknownArchetype(String),
}

impl PipelineError {
    /// True when the request itself was bad, as opposed to an artifact or model fault.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidCategory { .. } | PipelineError::OutOfRange { .. }
        )
    }
}
