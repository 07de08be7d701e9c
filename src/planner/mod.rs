pub mod constants;
pub mod constraints;
pub mod discrete;
pub mod least_squares;
pub mod linalg;
pub mod meal_solver;
pub mod targets;
pub mod timing;

pub use constants::*;
pub use constraints::{Constraint, ConstraintSystem, LinearSystem};
pub use discrete::{refine, Refinement};
pub use least_squares::{least_squares, Bounds, LeastSquaresFit, LeastSquaresOptions};
pub use meal_solver::{InitialGuess, MealSolver, SolverOptions};
pub use targets::{daily_macros, MacroTargets};
pub use timing::{calc_meal_times, format_clock, MealSchedule, MealTimingRequest};
