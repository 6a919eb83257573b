use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::PipelineError;

/// Diet category assigned from the predicted macro balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietArchetype {
    #[serde(rename = "High-Protein")]
    HighProtein,
    #[serde(rename = "Balanced")]
    Balanced,
    #[serde(rename = "Low-Fat")]
    LowFat,
    #[serde(rename = "Low-Carb")]
    LowCarb,
}

impl DietArchetype {
    pub const ALL: [DietArchetype; 4] = [
        DietArchetype::HighProtein,
        DietArchetype::Balanced,
        DietArchetype::LowFat,
        DietArchetype::LowCarb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DietArchetype::HighProtein => "High-Protein",
            DietArchetype::Balanced => "Balanced",
            DietArchetype::LowFat => "Low-Fat",
            DietArchetype::LowCarb => "Low-Carb",
        }
    }
}

impl fmt::Display for DietArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const HIGH_PROTEIN_MIN_RATIO: f64 = 0.30;
pub const LOW_FAT_MAX_RATIO: f64 = 0.25;
pub const LOW_CARB_MAX_RATIO: f64 = 0.35;

/// Each macro's share of protein + carbs + fats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroRatios {
    pub fn from_grams(protein: f64, carbs: f64, fats: f64) -> Result<Self, PipelineError> {
        let total = protein + carbs + fats;
        if !total.is_finite() || total <= 0.0 {
            return Err(PipelineError::DegenerateMacros { total });
        }
        Ok(Self {
            protein: protein / total,
            carbs: carbs / total,
            fats: fats / total,
        })
    }
}

struct DietRule {
    archetype: DietArchetype,
    applies: fn(&MacroRatios) -> bool,
}

// Evaluated top to bottom, first match wins. Conditions overlap (a diet can be both
// protein-heavy and low in fat), so the order decides the outcome.
const DIET_RULES: [DietRule; 3] = [
    DietRule {
        archetype: DietArchetype::HighProtein,
        applies: |r: &MacroRatios| r.protein >= HIGH_PROTEIN_MIN_RATIO,
    },
    DietRule {
        archetype: DietArchetype::LowFat,
        applies: |r: &MacroRatios| r.fats <= LOW_FAT_MAX_RATIO,
    },
    DietRule {
        archetype: DietArchetype::LowCarb,
        applies: |r: &MacroRatios| r.carbs <= LOW_CARB_MAX_RATIO,
    },
];

const FALLBACK_ARCHETYPE: DietArchetype = DietArchetype::Balanced;

pub fn classify_ratios(ratios: &MacroRatios) -> DietArchetype {
    DIET_RULES
        .iter()
        .find(|rule| (rule.applies)(ratios))
        .map_or(FALLBACK_ARCHETYPE, |rule| rule.archetype)
}

/// Classifies predicted daily macros (grams) into a diet archetype.
///
/// # Errors
/// `DegenerateMacros` when the total is zero, negative or not finite. No archetype is
/// substituted in that case.
pub fn classify(protein: f64, carbs: f64, fats: f64) -> Result<DietArchetype, PipelineError> {
    MacroRatios::from_grams(protein, carbs, fats).map(|ratios| classify_ratios(&ratios))
}
