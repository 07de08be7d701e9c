/// Smallest quantity any food may be bounded to.
pub const MIN_QUANTITY: f64 = 0.0;

/// Largest quantity any food may be bounded to (10 kg when the unit is grams).
pub const MAX_QUANTITY: f64 = 10_000.0;

// ─────────────────────────────────────────────────────────────────────────────
// Bounded least squares
// ─────────────────────────────────────────────────────────────────────────────

/// Iteration budget of the bounded least-squares fit.
pub const LSQ_MAX_ITERATIONS: usize = 200;

/// Projected-gradient tolerance, relative to `1 + |Aᵀb|∞`.
pub const LSQ_GRADIENT_TOL: f64 = 1e-10;

/// Step-size tolerance, relative to `1 + |x|`.
pub const LSQ_STEP_TOL: f64 = 1e-12;

/// Halvings tried along a search direction before giving up on it.
pub const LSQ_MAX_BACKTRACKS: usize = 40;

/// Pivots below this fraction of the largest entry count as zero.
pub const PIVOT_TOL: f64 = 1e-12;

/// Relative tolerance for the numerical rank of a constraint matrix.
pub const RANK_TOL: f64 = 1e-10;

// ─────────────────────────────────────────────────────────────────────────────
// Discrete refinement
// ─────────────────────────────────────────────────────────────────────────────

/// Most discrete foods the exhaustive floor/ceil search will enumerate (2^20 combinations).
pub const MAX_DISCRETE_FOODS: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// Meal timing
// ─────────────────────────────────────────────────────────────────────────────

/// Fewest meals the timing solver can space out.
pub const MIN_TIMED_MEALS: usize = 3;
