pub mod categories;
pub mod user_profile;

pub use categories::{AlcoholHabit, Cuisine, DietaryHabit, Gender, SmokingHabit};
pub use user_profile::{FieldBounds, UserProfile};
