use thiserror::Error;

use crate::planner::least_squares::LeastSquaresFit;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid target: {0} (targets must be finite and non-negative)")]
    InvalidTarget(f64),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("No constraints registered")]
    NoConstraints,

    #[error("Unknown food: {0}")]
    UnknownFood(String),

    #[error("Invalid serving size for {name}: {serving_size}")]
    InvalidServingSize { name: String, serving_size: f64 },

    #[error("Duplicate food: {0}")]
    DuplicateFood(String),

    #[error("No foods to plan with")]
    NoFoods,

    #[error("Least squares did not converge after {iterations} iterations (cost {:.6})", .best.cost)]
    ConvergenceFailure {
        iterations: usize,
        best: Box<LeastSquaresFit>,
    },

    #[error("No whole quantity of {0} fits within its bounds")]
    NoDiscreteCandidate(String),

    #[error("Too many discrete foods: {count} (limit {limit})")]
    TooManyDiscrete { count: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
