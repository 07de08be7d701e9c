pub mod food;
pub mod plan;

pub use food::{Food, FoodRecord, Nutrient};
pub use plan::{MealPlan, MealPlanItem, Solution};
