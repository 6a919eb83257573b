pub mod diet_classifier;
pub mod meal_allocator;
pub mod pipeline;

pub use diet_classifier::{classify, DietArchetype};
pub use meal_allocator::{allocate, Meal, MealAllocation, MealPlan};
pub use pipeline::{Recommendation, RecommendationPipeline};
