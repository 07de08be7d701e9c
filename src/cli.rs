use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::interface::MacroInputs;
use crate::models::Nutrient;

/// MealProportion: solve food quantities that hit your macro targets.
#[derive(Parser, Debug)]
#[command(name = "meal_proportion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the foods JSON file.
    #[arg(short, long, default_value = "foods.json", global = true)]
    pub file: String,

    /// Log solver progress (debug level).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve quantities of each food for one meal.
    Plan(PlanArgs),

    /// List the foods in the foods file.
    Foods,

    /// Write a starter foods file.
    Init {
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },

    /// Space meals through the day around wake, gym and sleep times.
    Timing(TimingArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan(PlanArgs::default())
    }
}

/// A `NAME=QTY` fixed-quantity request.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedQuantity {
    pub name: String,
    pub quantity: f64,
}

/// A `NAME=MIN:MAX` bound request.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Bodyweight in pounds.
    #[arg(long)]
    pub bodyweight: Option<f64>,

    /// Protein grams per pound of bodyweight.
    #[arg(long)]
    pub protein_ratio: Option<f64>,

    /// Fat grams per pound of bodyweight.
    #[arg(long)]
    pub fat_ratio: Option<f64>,

    /// Daily calorie goal.
    #[arg(long)]
    pub daily_calories: Option<f64>,

    /// Meals per day.
    #[arg(long)]
    pub meals: Option<u32>,

    /// Calories for this meal (skips the macro arithmetic).
    #[arg(long)]
    pub calories: Option<f64>,

    /// Protein grams for this meal.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Fat grams for this meal.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Carb grams for this meal.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Any meal total, e.g. --total "quantity=400" for 400 units of food overall.
    #[arg(long, value_parser = parse_total)]
    pub total: Vec<(Nutrient, f64)>,

    /// Fix a food's quantity, e.g. --fix "Vegetables=100".
    #[arg(long, value_parser = parse_fixed_quantity)]
    pub fix: Vec<FixedQuantity>,

    /// Bound a food's quantity, e.g. --bound "Vegetables=80:120".
    #[arg(long, value_parser = parse_bound)]
    pub bound: Vec<BoundSpec>,

    /// Start the solver from a random point drawn with this seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the plan to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl PlanArgs {
    /// Targets given directly as meal totals, if any.
    pub fn direct_targets(&self) -> Vec<(Nutrient, f64)> {
        [
            (Nutrient::Calories, self.calories),
            (Nutrient::Carbs, self.carbs),
            (Nutrient::Protein, self.protein),
            (Nutrient::Fat, self.fat),
        ]
        .into_iter()
        .filter_map(|(nutrient, target)| target.map(|t| (nutrient, t)))
        .chain(self.total.iter().copied())
        .collect()
    }

    pub fn macro_inputs(&self) -> MacroInputs {
        MacroInputs {
            bodyweight: self.bodyweight,
            protein_ratio: self.protein_ratio,
            fat_ratio: self.fat_ratio,
            daily_calories: self.daily_calories,
            meals: self.meals,
        }
    }
}

#[derive(Args, Debug)]
pub struct TimingArgs {
    /// Wake-up time in decimal hours.
    #[arg(long, default_value = "8")]
    pub wake: f64,

    /// Hours after waking for the first meal.
    #[arg(long, default_value = "0.1667")]
    pub delta_wake: f64,

    /// Gym time in decimal hours.
    #[arg(long, default_value = "17.5")]
    pub gym: f64,

    /// Hours before the gym for the pre-gym meal.
    #[arg(long, default_value = "2")]
    pub delta_gym: f64,

    /// Sleep time in decimal hours.
    #[arg(long, default_value = "23")]
    pub sleep: f64,

    /// Hours before sleep for the last meal.
    #[arg(long, default_value = "3")]
    pub delta_sleep: f64,

    /// Meals per day (at least 3).
    #[arg(long, default_value = "4")]
    pub meals: usize,
}

fn split_assignment(s: &str) -> Result<(&str, &str), String> {
    let (name, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing food name in '{}'", s));
    }
    Ok((name, value.trim()))
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", s))
}

/// Parse `NAME=QTY`.
pub fn parse_fixed_quantity(s: &str) -> Result<FixedQuantity, String> {
    let (name, value) = split_assignment(s)?;
    Ok(FixedQuantity {
        name: name.to_string(),
        quantity: parse_number(value)?,
    })
}

/// Parse `NUTRIENT=VALUE`.
pub fn parse_total(s: &str) -> Result<(Nutrient, f64), String> {
    let (name, value) = split_assignment(s)?;
    let nutrient: Nutrient = name.parse().map_err(|e: crate::error::PlanError| e.to_string())?;
    Ok((nutrient, parse_number(value)?))
}

/// Parse `NAME=MIN:MAX`.
pub fn parse_bound(s: &str) -> Result<BoundSpec, String> {
    let (name, range) = split_assignment(s)?;
    let (min, max) = range
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{}'", range))?;
    Ok(BoundSpec {
        name: name.to_string(),
        min: parse_number(min)?,
        max: parse_number(max)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_quantity() {
        assert_eq!(
            parse_fixed_quantity("Vegetables=100").unwrap(),
            FixedQuantity {
                name: "Vegetables".to_string(),
                quantity: 100.0
            }
        );
        assert!(parse_fixed_quantity("Vegetables").is_err());
        assert!(parse_fixed_quantity("=5").is_err());
        assert!(parse_fixed_quantity("Rice=lots").is_err());
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(
            parse_bound("Chicken breast = 80:120").unwrap(),
            BoundSpec {
                name: "Chicken breast".to_string(),
                min: 80.0,
                max: 120.0
            }
        );
        assert!(parse_bound("Rice=80").is_err());
    }

    #[test]
    fn test_parse_total() {
        assert_eq!(
            parse_total("quantity=400").unwrap(),
            (Nutrient::Quantity, 400.0)
        );
        assert_eq!(parse_total("Cals=550").unwrap(), (Nutrient::Calories, 550.0));
        assert!(parse_total("fiber=10").is_err());
    }

    #[test]
    fn test_direct_targets() {
        let args = PlanArgs {
            calories: Some(500.0),
            protein: Some(40.0),
            total: vec![(Nutrient::Quantity, 300.0)],
            ..Default::default()
        };
        assert_eq!(
            args.direct_targets(),
            vec![
                (Nutrient::Calories, 500.0),
                (Nutrient::Protein, 40.0),
                (Nutrient::Quantity, 300.0)
            ]
        );
        assert!(PlanArgs::default().direct_targets().is_empty());
    }

    #[test]
    fn test_cli_parses_plan() {
        let cli = Cli::try_parse_from([
            "meal_proportion",
            "plan",
            "--calories",
            "500",
            "--fix",
            "Rice=100",
            "--bound",
            "Rice=50:150",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Plan(args)) => {
                assert_eq!(args.calories, Some(500.0));
                assert_eq!(args.fix.len(), 1);
                assert_eq!(args.bound[0].max, 150.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
