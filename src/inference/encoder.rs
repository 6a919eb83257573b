use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Width of the model input.
pub const FEATURE_COUNT: usize = 21;

/// Slot names in the order the scaler and model were fitted on.
/// Reordering these silently corrupts every prediction.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender",
    "height_cm",
    "weight_kg",
    "bmi",
    "systolic_bp",
    "diastolic_bp",
    "cholesterol",
    "blood_sugar",
    "reserved",
    "daily_steps",
    "exercise_per_week",
    "sleep_hours",
    "alcohol",
    "smoking",
    "dietary_habit",
    "caloric_intake",
    "protein_intake",
    "carbs_intake",
    "fat_intake",
    "cuisine",
];

pub const BMI_INDEX: usize = 4;

/// Slot the fitted artifacts expect to hold a constant; never user supplied.
pub const RESERVED_INDEX: usize = 9;
pub const RESERVED_VALUE: f64 = 0.0;

/// Ordered numeric features, raw or normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Value of a slot by its name in [`FEATURE_NAMES`].
    pub fn named(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|idx| self.get(idx))
    }
}

/// Encodes a profile into the fixed-order model input.
///
/// Categorical choices are already closed enums at this point, so encoding cannot fail;
/// unknown category text is rejected when the profile is built.
pub fn encode(profile: &UserProfile) -> FeatureVector {
    let features: [f64; FEATURE_COUNT] = [
        profile.age,
        profile.gender.code(),
        profile.height_cm,
        profile.weight_kg,
        profile.bmi(),
        profile.systolic_bp,
        profile.diastolic_bp,
        profile.cholesterol,
        profile.blood_sugar,
        RESERVED_VALUE,
        profile.daily_steps,
        profile.exercise_per_week,
        profile.sleep_hours,
        profile.alcohol.code(),
        profile.smoking.code(),
        profile.dietary_habit.code(),
        profile.caloric_intake,
        profile.protein_intake,
        profile.carbs_intake,
        profile.fat_intake,
        profile.cuisine.code(),
    ];
    FeatureVector(features.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AlcoholHabit, Cuisine, DietaryHabit, Gender, SmokingHabit};

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: 42.0,
            gender: Gender::Female,
            height_cm: 165.0,
            weight_kg: 62.0,
            systolic_bp: 118.0,
            diastolic_bp: 76.0,
            cholesterol: 190.0,
            blood_sugar: 95.0,
            daily_steps: 10_500.0,
            exercise_per_week: 4.0,
            sleep_hours: 6.5,
            alcohol: AlcoholHabit::Occasional,
            smoking: SmokingHabit::Regular,
            dietary_habit: DietaryHabit::Vegan,
            caloric_intake: 1900.0,
            protein_intake: 80.0,
            carbs_intake: 240.0,
            fat_intake: 55.0,
            cuisine: Cuisine::Mediterranean,
        }
    }

    #[test]
    fn test_encode_order() {
        let profile = sample_profile();
        let v = encode(&profile);
        assert_eq!(v.len(), FEATURE_COUNT);

        let expected = [
            42.0,
            1.0,
            165.0,
            62.0,
            profile.bmi(),
            118.0,
            76.0,
            190.0,
            95.0,
            0.0,
            10_500.0,
            4.0,
            6.5,
            1.0,
            2.0,
            2.0,
            1900.0,
            80.0,
            240.0,
            55.0,
            2.0,
        ];
        assert_eq!(v.as_slice(), &expected[..]);
    }

    #[test]
    fn test_bmi_slot() {
        let profile = UserProfile { height_cm: 170.0, weight_kg: 70.0, ..Default::default() };
        let v = encode(&profile);
        let bmi = v.get(BMI_INDEX).unwrap();
        assert!((bmi - 24.22).abs() < 0.01);
        assert_eq!(v.named("bmi"), Some(bmi));
    }

    #[test]
    fn test_reserved_slot_is_constant() {
        let v = encode(&sample_profile());
        assert_eq!(v.get(RESERVED_INDEX), Some(RESERVED_VALUE));
        assert_eq!(FEATURE_NAMES[RESERVED_INDEX], "reserved");
    }

    #[test]
    fn test_encode_is_idempotent() {
        let profile = sample_profile();
        let first = encode(&profile);
        let second = encode(&profile);
        let first_bits: Vec<u64> = first.as_slice().iter().map(|x| x.to_bits()).collect();
        let second_bits: Vec<u64> = second.as_slice().iter().map(|x| x.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn test_feature_names_are_unique() {
        let mut names = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }
}
