mod catalog;
mod persistence;

pub use catalog::FoodCatalog;
pub use persistence::{load_foods, save_foods, write_plan_csv};
