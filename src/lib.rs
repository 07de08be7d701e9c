pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlanError, Result};
pub use models::{Food, MealPlan, MealPlanItem, Nutrient, Solution};
pub use planner::MealSolver;
