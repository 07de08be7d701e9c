use clap::Parser;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use meal_proportion_rs::cli::{Cli, Command, PlanArgs, TimingArgs};
use meal_proportion_rs::error::{PlanError, Result};
use meal_proportion_rs::interface::{
    collect_macro_targets, display_food_list, display_goal, display_meal, display_meal_times,
    prompt_yes_no, resolve_food_name,
};
use meal_proportion_rs::models::Nutrient;
use meal_proportion_rs::planner::{calc_meal_times, InitialGuess, MealSolver, MealTimingRequest};
use meal_proportion_rs::state::{load_foods, save_foods, write_plan_csv, FoodCatalog};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan(args) => cmd_plan(&cli.file, &args),
        Command::Foods => cmd_foods(&cli.file),
        Command::Init { force } => cmd_init(&cli.file, force),
        Command::Timing(args) => cmd_timing(&args),
    }
}

/// RUST_LOG wins; otherwise info, or debug with --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Solve quantities for one meal.
fn cmd_plan(file_path: &str, args: &PlanArgs) -> Result<()> {
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Foods file not found: {}", file_path);
        eprintln!("Run 'init' to write a starter foods file.");
        return Ok(());
    }

    let catalog = FoodCatalog::new(load_foods(path)?)?;
    if catalog.is_empty() {
        return Err(PlanError::NoFoods);
    }
    info!(foods = catalog.len(), "loaded foods");

    // Meal totals given on the command line, else the bodyweight arithmetic.
    let mut targets = args.direct_targets();
    if targets.is_empty() {
        let goal = collect_macro_targets(&args.macro_inputs())?;
        display_goal(&goal);
        targets = vec![
            (Nutrient::Protein, goal.protein),
            (Nutrient::Calories, goal.calories),
            (Nutrient::Fat, goal.fat),
        ];
    }

    // Resolve typed names against the catalog before it is handed to the solver.
    // A near miss is only used once the user confirms it.
    let fixes = args
        .fix
        .iter()
        .map(|f| -> Result<(String, f64)> {
            Ok((resolve_food_name(&catalog, &f.name)?, f.quantity))
        })
        .collect::<Result<Vec<_>>>()?;
    let bounds = args
        .bound
        .iter()
        .map(|b| -> Result<(String, f64, f64)> {
            Ok((resolve_food_name(&catalog, &b.name)?, b.min, b.max))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut solver = MealSolver::new(catalog.into_foods())?;
    if let Some(seed) = args.seed {
        solver.set_initial_guess(InitialGuess::Random { seed });
    }

    for (nutrient, target) in targets {
        debug!(%nutrient, target, "meal total");
        solver.add_total_constraint(nutrient, target)?;
    }
    for (name, quantity) in &fixes {
        solver.add_quantity_constraint(name, *quantity)?;
    }
    for (name, min, max) in &bounds {
        solver.set_bounds(name, *min, *max)?;
    }

    let solution = match solver.solve() {
        Err(PlanError::ConvergenceFailure { iterations, best }) => {
            warn!(iterations, "no convergence; retrying from the best iterate");
            solver.solve_with(&InitialGuess::Explicit(best.x))?
        }
        other => other?,
    };

    let plan = solution.to_plan(solver.foods());
    println!();
    display_meal(&plan);

    if let Some(csv_path) = &args.csv {
        write_plan_csv(csv_path, &plan)?;
        println!("Wrote plan to {}", csv_path.display());
    }

    Ok(())
}

/// List the foods file.
fn cmd_foods(file_path: &str) -> Result<()> {
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Foods file not found: {}", file_path);
        return Ok(());
    }

    let catalog = FoodCatalog::new(load_foods(path)?)?;
    display_food_list(catalog.foods(), "Foods");
    Ok(())
}

/// Write the starter catalog.
fn cmd_init(file_path: &str, force: bool) -> Result<()> {
    let path = Path::new(file_path);

    if path.exists() && !force {
        let overwrite = prompt_yes_no(&format!("{} exists. Overwrite?", file_path), false)?;
        if !overwrite {
            return Ok(());
        }
    }

    let catalog = FoodCatalog::starter()?;
    save_foods(path, catalog.foods())?;
    println!("Wrote {} foods to {}", catalog.len(), file_path);
    Ok(())
}

/// Fit meal times through the day.
fn cmd_timing(args: &TimingArgs) -> Result<()> {
    let request = MealTimingRequest {
        wake: args.wake,
        delta_wake: args.delta_wake,
        gym: args.gym,
        delta_gym: args.delta_gym,
        sleep: args.sleep,
        delta_sleep: args.delta_sleep,
        n_meals: args.meals,
    };

    let schedule = calc_meal_times(&request)?;
    display_meal_times(&schedule, &request);
    Ok(())
}
