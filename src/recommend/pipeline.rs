use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::inference::{encode, LabelEncoder, ModelArtifacts, NutrientPrediction, Predictor, Scaler};
use crate::profile::UserProfile;
use crate::recommend::diet_classifier::{classify, DietArchetype};
use crate::recommend::meal_allocator::{allocate, MealPlan};

/// Everything produced for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub bmi: f64,
    pub prediction: NutrientPrediction,
    pub archetype: DietArchetype,
    pub plan: MealPlan,
}

/// Profile in, meal plan out. Holds the fitted artifacts it was built with and no
/// per-request state, so one instance can serve any number of threads.
#[derive(Clone)]
pub struct RecommendationPipeline {
    scaler: Arc<Scaler>,
    label_encoder: Arc<LabelEncoder>,
    predictor: Arc<dyn Predictor>,
}

impl RecommendationPipeline {
    pub fn new(scaler: Arc<Scaler>, label_encoder: Arc<LabelEncoder>, predictor: Arc<dyn Predictor>) -> Self {
        Self { scaler, label_encoder, predictor }
    }

    pub fn from_artifacts(artifacts: &ModelArtifacts) -> Self {
        Self::new(
            Arc::clone(&artifacts.scaler),
            Arc::clone(&artifacts.label_encoder),
            artifacts.predictor.clone(),
        )
    }

    /// Validates, encodes, normalizes and runs the predictor, then decodes the label.
    pub fn predict_nutrients(&self, profile: &UserProfile) -> Result<NutrientPrediction, PipelineError> {
        profile.validate()?;

        let features = encode(profile);
        debug!(bmi = profile.bmi(), "Encoded profile into {} features", features.len());

        let normalized = self.scaler.normalize(&features)?;
        let raw = self.predictor.predict(normalized.as_slice())?;
        debug!(
            calories = raw.calories,
            protein = raw.protein,
            carbs = raw.carbs,
            fats = raw.fats,
            "Predictor returned daily targets"
        );

        let meal_plan_label = self.label_encoder.decode(&raw.meal_plan_probabilities)?;

        Ok(NutrientPrediction {
            calories: raw.calories,
            protein: raw.protein,
            carbs: raw.carbs,
            fats: raw.fats,
            meal_plan_label,
        })
    }

    pub fn recommend(&self, profile: &UserProfile) -> Result<Recommendation, PipelineError> {
        let prediction = self.predict_nutrients(profile)?;
        let archetype = classify(prediction.protein, prediction.carbs, prediction.fats)?;
        let plan = allocate(&prediction, archetype)?;

        info!(
            archetype = %archetype,
            meal_plan = %prediction.meal_plan_label,
            calories = prediction.calories,
            "Recommendation ready"
        );

        Ok(Recommendation {
            bmi: profile.bmi(),
            prediction,
            archetype,
            plan,
        })
    }
}
