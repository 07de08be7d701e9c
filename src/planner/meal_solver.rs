use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{PlanError, Result};
use crate::models::{Food, Nutrient, Solution};
use crate::planner::constants::{MAX_QUANTITY, MIN_QUANTITY};
use crate::planner::constraints::ConstraintSystem;
use crate::planner::discrete;
use crate::planner::least_squares::{self, Bounds, LeastSquaresOptions};

/// Starting point of the bounded least-squares fit.
///
/// The objective is convex, so the start only matters for retries after a
/// `ConvergenceFailure`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InitialGuess {
    /// Midpoint of each food's bounds.
    #[default]
    Midpoint,
    /// Uniform draw within each food's bounds.
    Random { seed: u64 },
    /// Caller-supplied quantities, clamped into the bounds.
    Explicit(Vec<f64>),
}

impl InitialGuess {
    fn resolve(&self, bounds: &Bounds) -> Result<Vec<f64>> {
        match self {
            InitialGuess::Midpoint => Ok(bounds.midpoint()),
            InitialGuess::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(bounds
                    .lower()
                    .iter()
                    .zip(bounds.upper())
                    .map(|(&lo, &hi)| rng.gen_range(lo..=hi))
                    .collect())
            }
            InitialGuess::Explicit(x0) => {
                if x0.len() != bounds.len() {
                    return Err(PlanError::DimensionMismatch {
                        expected: bounds.len(),
                        actual: x0.len(),
                    });
                }
                if x0.iter().any(|v| !v.is_finite()) {
                    return Err(PlanError::InvalidInput(
                        "initial guess must be finite".to_string(),
                    ));
                }
                Ok(bounds.clamp(x0))
            }
        }
    }
}

/// Configurable solver behaviour.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    pub least_squares: LeastSquaresOptions,
    pub initial_guess: InitialGuess,
}

/// Solves food quantities for a set of nutrient and quantity targets.
///
/// The food list is fixed at construction so constraint and bound indices
/// stay valid. A solver holds mutable session state (constraints, bounds)
/// and is not meant to be shared across threads without external locking.
#[derive(Debug, Clone)]
pub struct MealSolver {
    foods: Vec<Food>,
    /// Food index keyed by lowercase name.
    index: HashMap<String, usize>,
    system: ConstraintSystem,
    bounds: Bounds,
    options: SolverOptions,
}

impl MealSolver {
    /// Create a solver over a fixed, ordered list of foods.
    ///
    /// Names must be unique (case-insensitive).
    pub fn new(foods: Vec<Food>) -> Result<Self> {
        if foods.is_empty() {
            return Err(PlanError::NoFoods);
        }

        let mut index = HashMap::with_capacity(foods.len());
        for (i, food) in foods.iter().enumerate() {
            if index.insert(food.key(), i).is_some() {
                return Err(PlanError::DuplicateFood(food.name().to_string()));
            }
        }

        let n = foods.len();
        Ok(Self {
            foods,
            index,
            system: ConstraintSystem::new(n),
            bounds: Bounds::quantity_defaults(n),
            options: SolverOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_initial_guess(&mut self, guess: InitialGuess) {
        self.options.initial_guess = guess;
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn constraints(&self) -> &ConstraintSystem {
        &self.system
    }

    /// Index of a food by name (case-insensitive).
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| PlanError::UnknownFood(name.to_string()))
    }

    /// Require the meal's total of `nutrient` to equal `target`.
    pub fn add_total_constraint(&mut self, nutrient: Nutrient, target: f64) -> Result<()> {
        let coefficients = self.foods.iter().map(|f| f.density(nutrient)).collect();
        self.system.add_constraint(coefficients, target)
    }

    /// Require the quantity of one food to equal `target`.
    pub fn add_quantity_constraint(&mut self, food: &str, target: f64) -> Result<()> {
        let i = self.index_of(food)?;
        let mut coefficients = vec![0.0; self.foods.len()];
        coefficients[i] = 1.0;
        self.system.add_constraint(coefficients, target)
    }

    /// Restrict one food to `[min, max]` within the global quantity range.
    pub fn set_bounds(&mut self, food: &str, min: f64, max: f64) -> Result<()> {
        let i = self.index_of(food)?;
        if !(min >= MIN_QUANTITY && max <= MAX_QUANTITY) {
            return Err(PlanError::InvalidBounds(format!(
                "[{}, {}] for {} is outside [{}, {}]",
                min, max, food, MIN_QUANTITY, MAX_QUANTITY
            )));
        }
        self.bounds.set(i, min, max)
    }

    /// Degrees of freedom the current constraints leave undetermined.
    pub fn rank_deficiency(&self) -> Result<usize> {
        self.system.rank_deficiency()
    }

    /// Fit the quantities, then snap discrete foods to whole units.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(&self.options.initial_guess)
    }

    /// Same as `solve`, starting from a specific guess.
    pub fn solve_with(&self, guess: &InitialGuess) -> Result<Solution> {
        let system = self.system.assemble()?;

        let rank_deficiency = system.rank_deficiency();
        if rank_deficiency > 0 {
            warn!(
                rank_deficiency,
                "infinitely many solutions; add {} linearly independent constraints for a unique one",
                rank_deficiency
            );
        }

        let x0 = guess.resolve(&self.bounds)?;
        let fit = least_squares::least_squares(
            &system,
            &self.bounds,
            &x0,
            &self.options.least_squares,
        )?;
        debug!(
            cost = fit.cost,
            iterations = fit.iterations,
            "continuous optimum found"
        );

        let discrete: Vec<usize> = self
            .foods
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_discrete())
            .map(|(i, _)| i)
            .collect();
        let names: Vec<&str> = self.foods.iter().map(Food::name).collect();
        let refined = discrete::refine(&system, &self.bounds, &fit.x, &discrete, &names)?;
        if !discrete.is_empty() {
            debug!(
                combinations = refined.evaluated,
                loss = refined.loss,
                "discrete refinement done"
            );
        }

        Ok(Solution {
            quantities: refined.quantities,
            loss: refined.loss,
            rank_deficiency,
            iterations: fit.iterations,
        })
    }
}
