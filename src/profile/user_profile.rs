use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::profile::categories::{AlcoholHabit, Cuisine, DietaryHabit, Gender, SmokingHabit};

/// Declared range and form default of one numeric profile field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldBounds {
    const fn new(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self { name, min, max, default }
    }

    pub fn check(&self, value: f64) -> Result<(), PipelineError> {
        // NaN fails both comparisons, so it is rejected here too
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(PipelineError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const AGE: FieldBounds = FieldBounds::new("age", 18.0, 100.0, 30.0);
pub const HEIGHT_CM: FieldBounds = FieldBounds::new("height_cm", 140.0, 210.0, 170.0);
pub const WEIGHT_KG: FieldBounds = FieldBounds::new("weight_kg", 40.0, 150.0, 70.0);
pub const SYSTOLIC_BP: FieldBounds = FieldBounds::new("systolic_bp", 90.0, 200.0, 120.0);
pub const DIASTOLIC_BP: FieldBounds = FieldBounds::new("diastolic_bp", 60.0, 130.0, 80.0);
pub const CHOLESTEROL: FieldBounds = FieldBounds::new("cholesterol", 100.0, 300.0, 180.0);
pub const BLOOD_SUGAR: FieldBounds = FieldBounds::new("blood_sugar", 60.0, 250.0, 110.0);
pub const DAILY_STEPS: FieldBounds = FieldBounds::new("daily_steps", 0.0, 50_000.0, 8_000.0);
pub const EXERCISE_PER_WEEK: FieldBounds = FieldBounds::new("exercise_per_week", 0.0, 14.0, 3.0);
pub const SLEEP_HOURS: FieldBounds = FieldBounds::new("sleep_hours", 0.0, 24.0, 7.0);
pub const CALORIC_INTAKE: FieldBounds = FieldBounds::new("caloric_intake", 1_000.0, 4_000.0, 2_200.0);
pub const PROTEIN_INTAKE: FieldBounds = FieldBounds::new("protein_intake", 20.0, 250.0, 100.0);
pub const CARBS_INTAKE: FieldBounds = FieldBounds::new("carbs_intake", 50.0, 500.0, 200.0);
pub const FAT_INTAKE: FieldBounds = FieldBounds::new("fat_intake", 10.0, 200.0, 70.0);

/// Health and lifestyle details submitted for one recommendation.
///
/// BMI is not a field: it is always derived from height and weight so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: f64,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub cholesterol: f64,
    pub blood_sugar: f64,
    pub daily_steps: f64,
    pub exercise_per_week: f64,
    pub sleep_hours: f64,
    pub alcohol: AlcoholHabit,
    pub smoking: SmokingHabit,
    pub dietary_habit: DietaryHabit,
    pub caloric_intake: f64,
    pub protein_intake: f64,
    pub carbs_intake: f64,
    pub fat_intake: f64,
    pub cuisine: Cuisine,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: AGE.default,
            gender: Gender::default(),
            height_cm: HEIGHT_CM.default,
            weight_kg: WEIGHT_KG.default,
            systolic_bp: SYSTOLIC_BP.default,
            diastolic_bp: DIASTOLIC_BP.default,
            cholesterol: CHOLESTEROL.default,
            blood_sugar: BLOOD_SUGAR.default,
            daily_steps: DAILY_STEPS.default,
            exercise_per_week: EXERCISE_PER_WEEK.default,
            sleep_hours: SLEEP_HOURS.default,
            alcohol: AlcoholHabit::default(),
            smoking: SmokingHabit::default(),
            dietary_habit: DietaryHabit::default(),
            caloric_intake: CALORIC_INTAKE.default,
            protein_intake: PROTEIN_INTAKE.default,
            carbs_intake: CARBS_INTAKE.default,
            fat_intake: FAT_INTAKE.default,
            cuisine: Cuisine::default(),
        }
    }
}

impl UserProfile {
    /// Body mass index, `weight / (height in metres)^2`.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }

    fn bounded_fields(&self) -> [(FieldBounds, f64); 14] {
        [
            (AGE, self.age),
            (HEIGHT_CM, self.height_cm),
            (WEIGHT_KG, self.weight_kg),
            (SYSTOLIC_BP, self.systolic_bp),
            (DIASTOLIC_BP, self.diastolic_bp),
            (CHOLESTEROL, self.cholesterol),
            (BLOOD_SUGAR, self.blood_sugar),
            (DAILY_STEPS, self.daily_steps),
            (EXERCISE_PER_WEEK, self.exercise_per_week),
            (SLEEP_HOURS, self.sleep_hours),
            (CALORIC_INTAKE, self.caloric_intake),
            (PROTEIN_INTAKE, self.protein_intake),
            (CARBS_INTAKE, self.carbs_intake),
            (FAT_INTAKE, self.fat_intake),
        ]
    }

    /// Checks every numeric field against its declared bounds.
    ///
    /// Reports the first violation in field order.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.bounded_fields()
            .iter()
            .try_for_each(|(bounds, value)| bounds.check(*value))
    }
}
