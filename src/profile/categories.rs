use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PipelineError;

/// Declares a closed categorical input: its display labels, its integer code in the
/// feature vector, and parsing that rejects anything outside the table.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal,
        { $($variant:ident => ($label:literal, $code:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted value, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            /// Profile field this category fills.
            pub const FIELD: &'static str = $field;

            /// Integer code the model was fitted with.
            pub fn code(self) -> f64 {
                match self {
                    $($name::$variant => $code as f64),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn expected_labels() -> String {
                Self::ALL.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl FromStr for $name {
            type Err = PipelineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| PipelineError::InvalidCategory {
                        field: $field,
                        value: s.to_string(),
                        expected: Self::expected_labels(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = PipelineError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical!(
    Gender, field = "gender",
    {
        Male => ("Male", 0),
        Female => ("Female", 1),
        Other => ("Other", 2),
    }
);

categorical!(
    /// Self-reported alcohol consumption.
    AlcoholHabit, field = "alcohol",
    {
        Never => ("None", 0),
        Occasional => ("Occasional", 1),
        Regular => ("Regular", 2),
    }
);

categorical!(
    SmokingHabit, field = "smoking",
    {
        NonSmoker => ("Non-smoker", 0),
        Occasional => ("Occasional", 1),
        Regular => ("Regular", 2),
    }
);

categorical!(
    DietaryHabit, field = "dietary_habit",
    {
        Vegetarian => ("Vegetarian", 0),
        NonVegetarian => ("Non-Vegetarian", 1),
        Vegan => ("Vegan", 2),
        Other => ("Other", 3),
    }
);

categorical!(
    /// Preferred cuisine. Only feeds the model; menus are not cuisine-specific.
    Cuisine, field = "cuisine",
    {
        Western => ("Western", 0),
        Indian => ("Indian", 1),
        Mediterranean => ("Mediterranean", 2),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_fitted_tables() {
        assert_eq!(Gender::Male.code(), 0.0);
        assert_eq!(Gender::Female.code(), 1.0);
        assert_eq!(Gender::Other.code(), 2.0);

        assert_eq!(AlcoholHabit::Never.code(), 0.0);
        assert_eq!(AlcoholHabit::Regular.code(), 2.0);

        assert_eq!(SmokingHabit::NonSmoker.code(), 0.0);
        assert_eq!(SmokingHabit::Occasional.code(), 1.0);

        assert_eq!(DietaryHabit::NonVegetarian.code(), 1.0);
        assert_eq!(DietaryHabit::Other.code(), 3.0);

        assert_eq!(Cuisine::Indian.code(), 1.0);
        assert_eq!(Cuisine::Mediterranean.code(), 2.0);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("None".parse::<AlcoholHabit>().unwrap(), AlcoholHabit::Never);
        assert_eq!("non-smoker".parse::<SmokingHabit>().unwrap(), SmokingHabit::NonSmoker);
        assert_eq!(" Non-Vegetarian ".parse::<DietaryHabit>().unwrap(), DietaryHabit::NonVegetarian);
        assert_eq!("MEDITERRANEAN".parse::<Cuisine>().unwrap(), Cuisine::Mediterranean);
    }

    #[test]
    fn test_unknown_value_is_invalid_category() {
        let err = "Pescatarian".parse::<DietaryHabit>().unwrap_err();
        match err {
            PipelineError::InvalidCategory { field, value, expected } => {
                assert_eq!(field, "dietary_habit");
                assert_eq!(value, "Pescatarian");
                assert_eq!(expected, "Vegetarian, Non-Vegetarian, Vegan, Other");
            }
            other => panic!("expected InvalidCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&SmokingHabit::NonSmoker).unwrap();
        assert_eq!(json, "\"Non-smoker\"");

        let parsed: AlcoholHabit = serde_json::from_str("\"Occasional\"").unwrap();
        assert_eq!(parsed, AlcoholHabit::Occasional);

        let bad = serde_json::from_str::<Gender>("\"Robot\"");
        assert!(bad.unwrap_err().to_string().contains("invalid value 'Robot' for gender"));
    }

    #[test]
    fn test_defaults_are_first_choice() {
        assert_eq!(Gender::default(), Gender::Male);
        assert_eq!(AlcoholHabit::default(), AlcoholHabit::Never);
        assert_eq!(SmokingHabit::default(), SmokingHabit::NonSmoker);
        assert_eq!(DietaryHabit::default(), DietaryHabit::Vegetarian);
        assert_eq!(Cuisine::default(), Cuisine::Western);
    }
}
