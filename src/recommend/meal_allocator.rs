use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::PipelineError;
use crate::inference::NutrientPrediction;
use crate::recommend::diet_classifier::DietArchetype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub fn name(self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
        }
    }

    fn menu_column(self) -> usize {
        match self {
            Meal::Breakfast => 0,
            Meal::Lunch => 1,
            Meal::Dinner => 2,
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Share of the daily totals served at each meal, in serving order.
pub const MEAL_SPLIT: [(Meal, f64); 3] = [
    (Meal::Breakfast, 0.3),
    (Meal::Lunch, 0.4),
    (Meal::Dinner, 0.3),
];

/// Fixed menus per archetype: breakfast, lunch, dinner.
const DIET_MENUS: &[(DietArchetype, [&str; 3])] = &[
    (
        DietArchetype::HighProtein,
        [
            "Boiled eggs + brown bread + milk",
            "Lentil soup + grilled chicken + rice + salad",
            "Fish curry + steamed rice + steamed vegetables",
        ],
    ),
    (
        DietArchetype::Balanced,
        [
            "Oatmeal with banana + milk",
            "Rice + mixed vegetable curry + lentils + boiled egg",
            "Chicken or fish + chapati + salad + yogurt",
        ],
    ),
    (
        DietArchetype::LowFat,
        [
            "Porridge (rice or oats) + fruit",
            "Steamed vegetables + grilled fish + brown rice",
            "Lentil soup + chapati + cucumber salad",
        ],
    ),
    (
        DietArchetype::LowCarb,
        [
            "Boiled eggs + spinach stir-fry",
            "Grilled chicken or fish + mixed vegetable salad",
            "Omelette + sautéed vegetables",
        ],
    ),
];

/// Menu text served for `meal` under `archetype`.
pub fn menu_for(archetype: DietArchetype, meal: Meal) -> Result<&'static str, PipelineError> {
    DIET_MENUS
        .iter()
        .find(|(a, _)| *a == archetype)
        .map(|(_, menus)| menus[meal.menu_column()])
        .ok_or_else(|| PipelineError::UnknownArchetype(archetype.to_string()))
}

/// One meal's share of the daily targets plus what to eat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAllocation {
    pub meal_name: Meal,
    pub food_description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub meals: Vec<MealAllocation>,
}

impl MealPlan {
    pub fn meal(&self, meal: Meal) -> Option<&MealAllocation> {
        self.meals.iter().find(|m| m.meal_name == meal)
    }

    /// Per-nutrient sums across all meals: (calories, protein, carbs, fats).
    pub fn totals(&self) -> (f64, f64, f64, f64) {
        self.meals.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, m| {
            (acc.0 + m.calories, acc.1 + m.protein, acc.2 + m.carbs, acc.3 + m.fats)
        })
    }
}

/// Splits the predicted daily totals across breakfast, lunch and dinner.
///
/// Values are not rounded here.
pub fn allocate(prediction: &NutrientPrediction, archetype: DietArchetype) -> Result<MealPlan, PipelineError> {
    let meals = MEAL_SPLIT
        .iter()
        .map(|&(meal, ratio)| {
            Ok(MealAllocation {
                meal_name: meal,
                food_description: menu_for(archetype, meal)?.to_string(),
                calories: prediction.calories * ratio,
                protein: prediction.protein * ratio,
                carbs: prediction.carbs * ratio,
                fats: prediction.fats * ratio,
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(MealPlan { meals })
}
