//! Multi-output nutrient predictor.
//!
//! The pipeline only sees the [`Predictor`] trait. [`DenseNetwork`] is the shipped
//! backend: a feed-forward network exported to JSON, a shared trunk followed by one
//! head per output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictorError {
    #[error("model expects {expected} inputs, got {actual}")]
    InputWidth { expected: usize, actual: usize },

    #[error("model produced a non-finite value for '{0}'")]
    NonFinite(&'static str),

    #[error("model produced no values for '{0}'")]
    EmptyOutput(&'static str),
}

/// The five raw outputs of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub meal_plan_probabilities: Vec<f64>,
}

/// A pretrained model mapping a normalized feature vector to nutrient targets.
///
/// Implementations must be deterministic for a fixed artifact and input, and shareable
/// across threads.
pub trait Predictor: Send + Sync {
    fn predict(&self, input: &[f64]) -> Result<RawPrediction, PredictorError>;

    fn input_width(&self) -> usize;

    fn meal_plan_classes(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Softmax,
}

/// Fully connected layer, weights stored row-major as `[out][in]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default = "default_activation")]
    pub activation: Activation,
}

fn default_activation() -> Activation {
    Activation::Linear
}

impl DenseLayer {
    fn input_width(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn output_width(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self, expected_input: usize, label: &str) -> Result<()> {
        if self.weights.is_empty() {
            return Err(anyhow::anyhow!("{}: layer has no units", label));
        }
        if self.bias.len() != self.weights.len() {
            return Err(anyhow::anyhow!(
                "{}: {} weight rows but {} biases",
                label,
                self.weights.len(),
                self.bias.len()
            ));
        }
        if let Some(row) = self.weights.iter().position(|r| r.len() != expected_input) {
            return Err(anyhow::anyhow!(
                "{}: weight row {} has {} inputs, expected {}",
                label,
                row,
                self.weights[row].len(),
                expected_input
            ));
        }
        Ok(())
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect();

        match self.activation {
            Activation::Linear => {}
            Activation::Relu => out.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Softmax => softmax_in_place(&mut out),
        }
        out
    }
}

fn softmax_in_place(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        values.iter_mut().for_each(|v| *v /= sum);
    }
}

fn run_layers(layers: &[DenseLayer], input: Vec<f64>) -> Vec<f64> {
    layers.iter().fold(input, |acc, layer| layer.forward(&acc))
}

/// One layer stack per model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkHeads {
    pub calories: Vec<DenseLayer>,
    pub protein: Vec<DenseLayer>,
    pub carbs: Vec<DenseLayer>,
    pub fats: Vec<DenseLayer>,
    pub meal_plan: Vec<DenseLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    #[serde(default)]
    pub trunk: Vec<DenseLayer>,
    pub heads: NetworkHeads,
    #[serde(skip)]
    input_width: usize,
}

/// Checks that a stack chains from `input` and returns its output width.
fn validate_stack(layers: &[DenseLayer], input: usize, label: &str) -> Result<usize> {
    layers.iter().enumerate().try_fold(input, |width, (idx, layer)| {
        layer.validate(width, &format!("{} layer {}", label, idx))?;
        Ok(layer.output_width())
    })
}

impl DenseNetwork {
    /// Validates layer shapes and fixes the input width.
    pub fn new(trunk: Vec<DenseLayer>, heads: NetworkHeads) -> Result<Self> {
        let input_width = trunk
            .first()
            .or_else(|| heads.calories.first())
            .map(DenseLayer::input_width)
            .ok_or_else(|| anyhow::anyhow!("Model has no layers"))?;
        if input_width == 0 {
            return Err(anyhow::anyhow!("Model input width is zero"));
        }

        let trunk_width = validate_stack(&trunk, input_width, "trunk")?;
        for (name, head) in [
            ("calories", &heads.calories),
            ("protein", &heads.protein),
            ("carbs", &heads.carbs),
            ("fats", &heads.fats),
        ] {
            if head.is_empty() {
                return Err(anyhow::anyhow!("Head '{}' has no layers", name));
            }
            let width = validate_stack(head, trunk_width, name)?;
            if width != 1 {
                return Err(anyhow::anyhow!(
                    "Head '{}' must end in a single unit, found {}",
                    name,
                    width
                ));
            }
        }
        if heads.meal_plan.is_empty() {
            return Err(anyhow::anyhow!("Head 'meal_plan' has no layers"));
        }
        validate_stack(&heads.meal_plan, trunk_width, "meal_plan")?;

        Ok(Self { trunk, heads, input_width })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact at {:?}", path))?;
        let parsed: DenseNetwork = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model artifact at {:?}", path))?;
        Self::new(parsed.trunk, parsed.heads)
            .with_context(|| format!("Invalid model artifact at {:?}", path))
    }

    fn scalar_head(&self, layers: &[DenseLayer], hidden: &[f64], name: &'static str) -> Result<f64, PredictorError> {
        let out = run_layers(layers, hidden.to_vec());
        let value = *out.first().ok_or(PredictorError::EmptyOutput(name))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PredictorError::NonFinite(name))
        }
    }
}

impl Predictor for DenseNetwork {
    fn predict(&self, input: &[f64]) -> Result<RawPrediction, PredictorError> {
        if input.len() != self.input_width {
            return Err(PredictorError::InputWidth {
                expected: self.input_width,
                actual: input.len(),
            });
        }
        let hidden = run_layers(&self.trunk, input.to_vec());

        let meal_plan_probabilities = run_layers(&self.heads.meal_plan, hidden.clone());
        if meal_plan_probabilities.iter().any(|p| !p.is_finite()) {
            return Err(PredictorError::NonFinite("meal_plan"));
        }

        Ok(RawPrediction {
            calories: self.scalar_head(&self.heads.calories, &hidden, "calories")?,
            protein: self.scalar_head(&self.heads.protein, &hidden, "protein")?,
            carbs: self.scalar_head(&self.heads.carbs, &hidden, "carbs")?,
            fats: self.scalar_head(&self.heads.fats, &hidden, "fats")?,
            meal_plan_probabilities,
        })
    }

    fn input_width(&self) -> usize {
        self.input_width
    }

    fn meal_plan_classes(&self) -> usize {
        self.heads.meal_plan.last().map_or(0, DenseLayer::output_width)
    }
}
