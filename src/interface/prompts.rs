use dialoguer::{Confirm, Input};

use crate::error::{PlanError, Result};
use crate::planner::targets::MacroTargets;
use crate::state::FoodCatalog;

/// Prompt for a non-negative number with a default.
fn prompt_number(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number: {}", input)))?;

    if value < 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "{} must not be negative",
            prompt
        )));
    }

    Ok(value)
}

/// Prompt for bodyweight in pounds.
fn prompt_bodyweight() -> Result<f64> {
    prompt_number("What is your bodyweight (lb)?", "150")
}

/// Prompt for the protein ratio (grams per pound).
fn prompt_protein_ratio() -> Result<f64> {
    prompt_number("Protein per pound of bodyweight?", "1")
}

/// Prompt for the fat ratio (grams per pound).
fn prompt_fat_ratio() -> Result<f64> {
    prompt_number("Fat per pound of bodyweight (0.3-0.5 recommended)?", "0.4")
}

/// Prompt for the daily calorie goal.
fn prompt_daily_calories() -> Result<f64> {
    prompt_number("How many calories per day?", "2200")
}

/// Prompt for the number of meals per day.
fn prompt_meals() -> Result<u32> {
    let input: String = Input::new()
        .with_prompt("How many meals per day (4+ recommended)?")
        .default("4".to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput("Invalid number of meals".to_string()))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Resolve a typed food name, asking before accepting a fuzzy match.
pub fn resolve_food_name(catalog: &FoodCatalog, name: &str) -> Result<String> {
    resolve_food_name_with(catalog, name, |suggestion| {
        prompt_yes_no(&format!("Did you mean '{}'?", suggestion), true)
    })
}

/// Exact matches pass straight through. A near match is offered to
/// `confirm`; declining it, or having no near match, is `UnknownFood`.
pub fn resolve_food_name_with<F>(
    catalog: &FoodCatalog,
    name: &str,
    mut confirm: F,
) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    match catalog.resolve(name) {
        Ok(food) => Ok(food.name().to_string()),
        Err(unknown) => match catalog.suggest(name) {
            Some(food) if confirm(food.name())? => Ok(food.name().to_string()),
            _ => Err(unknown),
        },
    }
}

/// Inputs to the per-meal macro arithmetic; missing ones are prompted for.
#[derive(Debug, Clone, Default)]
pub struct MacroInputs {
    pub bodyweight: Option<f64>,
    pub protein_ratio: Option<f64>,
    pub fat_ratio: Option<f64>,
    pub daily_calories: Option<f64>,
    pub meals: Option<u32>,
}

/// Collect per-meal macro targets, asking only for what was not given.
pub fn collect_macro_targets(inputs: &MacroInputs) -> Result<MacroTargets> {
    let bodyweight = match inputs.bodyweight {
        Some(v) => v,
        None => prompt_bodyweight()?,
    };
    let protein_ratio = match inputs.protein_ratio {
        Some(v) => v,
        None => prompt_protein_ratio()?,
    };
    let fat_ratio = match inputs.fat_ratio {
        Some(v) => v,
        None => prompt_fat_ratio()?,
    };
    let daily_calories = match inputs.daily_calories {
        Some(v) => v,
        None => prompt_daily_calories()?,
    };
    let meals = match inputs.meals {
        Some(v) => v,
        None => prompt_meals()?,
    };

    MacroTargets::per_meal(bodyweight, protein_ratio, fat_ratio, daily_calories, meals)
}
