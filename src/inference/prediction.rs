use serde::{Deserialize, Serialize};

/// Daily nutrient targets predicted for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientPrediction {
    /// kcal/day
    pub calories: f64,
    /// g/day
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub meal_plan_label: String,
}

impl NutrientPrediction {
    pub fn macro_total(&self) -> f64 {
        self.protein + self.carbs + self.fats
    }
}
