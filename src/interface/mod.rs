pub mod prompts;
pub mod render;

pub use prompts::{
    collect_macro_targets, prompt_yes_no, resolve_food_name, resolve_food_name_with, MacroInputs,
};
pub use render::{display_food_list, display_goal, display_meal, display_meal_times};
