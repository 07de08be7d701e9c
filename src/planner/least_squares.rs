//! Bounded linear least squares: minimize `|Ax - b|²` subject to `lower <= x <= upper`.
//!
//! The objective is a convex quadratic over a box, so the projected Newton
//! iteration below reaches the global optimum from any feasible start. Each
//! iteration fixes the variables held against a bound by the gradient, takes
//! the exact Gauss-Newton step on the rest, and projects back into the box.
//! When that step fails to reduce the cost, a projected steepest-descent
//! step is tried instead.

#![allow(clippy::needless_range_loop)]

use tracing::debug;

use crate::error::{PlanError, Result};
use crate::planner::constants::{
    LSQ_GRADIENT_TOL, LSQ_MAX_BACKTRACKS, LSQ_MAX_ITERATIONS, LSQ_STEP_TOL, MAX_QUANTITY,
    MIN_QUANTITY, PIVOT_TOL,
};
use crate::planner::constraints::LinearSystem;
use crate::planner::linalg;

/// Per-variable `[lower, upper]` box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Fails with `InvalidBounds` if the lengths differ or any pair is not
    /// finite or has `lower > upper`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(PlanError::InvalidBounds(format!(
                "{} lower bounds but {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        for (&lo, &hi) in lower.iter().zip(&upper) {
            check_pair(lo, hi)?;
        }
        Ok(Self { lower, upper })
    }

    /// `[MIN_QUANTITY, MAX_QUANTITY]` for every food.
    pub fn quantity_defaults(n: usize) -> Self {
        Self {
            lower: vec![MIN_QUANTITY; n],
            upper: vec![MAX_QUANTITY; n],
        }
    }

    pub fn set(&mut self, i: usize, lower: f64, upper: f64) -> Result<()> {
        if i >= self.len() {
            return Err(PlanError::InvalidBounds(format!(
                "index {} out of range for {} variables",
                i,
                self.len()
            )));
        }
        check_pair(lower, upper)?;
        self.lower[i] = lower;
        self.upper[i] = upper;
        Ok(())
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn get(&self, i: usize) -> (f64, f64) {
        (self.lower[i], self.upper[i])
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn midpoint(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| lo + 0.5 * (hi - lo))
            .collect()
    }

    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .enumerate()
            .map(|(i, &xi)| xi.clamp(self.lower[i], self.upper[i]))
            .collect()
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.len()
            && x
                .iter()
                .enumerate()
                .all(|(i, &xi)| xi >= self.lower[i] && xi <= self.upper[i])
    }
}

fn check_pair(lower: f64, upper: f64) -> Result<()> {
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(PlanError::InvalidBounds(format!("[{}, {}]", lower, upper)));
    }
    Ok(())
}

/// Options for the bounded least-squares fit.
#[derive(Debug, Clone)]
pub struct LeastSquaresOptions {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Projected-gradient tolerance, scaled by `1 + |Aᵀb|∞`
    pub g_tol: f64,
    /// Step tolerance, scaled by `1 + |x|`
    pub x_tol: f64,
}

impl Default for LeastSquaresOptions {
    fn default() -> Self {
        Self {
            max_iter: LSQ_MAX_ITERATIONS,
            g_tol: LSQ_GRADIENT_TOL,
            x_tol: LSQ_STEP_TOL,
        }
    }
}

/// Outcome of a bounded least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Feasible point with the lowest cost found
    pub x: Vec<f64>,
    /// `A x - b` at `x`
    pub residuals: Vec<f64>,
    /// Sum of squared residuals
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

struct Iterate {
    x: Vec<f64>,
    residuals: Vec<f64>,
    cost: f64,
}

impl Iterate {
    fn at(system: &LinearSystem, x: Vec<f64>) -> Self {
        let residuals = system.residuals(&x);
        let cost = linalg::norm_squared(&residuals);
        Self { x, residuals, cost }
    }

    fn into_fit(self, iterations: usize, converged: bool) -> LeastSquaresFit {
        LeastSquaresFit {
            x: self.x,
            residuals: self.residuals,
            cost: self.cost,
            iterations,
            converged,
        }
    }
}

/// Minimize `|Ax - b|²` over the box, starting from `x0` (clamped into the box).
///
/// Returns `ConvergenceFailure` carrying the best iterate if the iteration
/// budget runs out before the projected gradient vanishes.
pub fn least_squares(
    system: &LinearSystem,
    bounds: &Bounds,
    x0: &[f64],
    options: &LeastSquaresOptions,
) -> Result<LeastSquaresFit> {
    let n = system.n_cols();
    if bounds.len() != n {
        return Err(PlanError::InvalidBounds(format!(
            "{} bound pairs for {} variables",
            bounds.len(),
            n
        )));
    }
    if x0.len() != n {
        return Err(PlanError::DimensionMismatch {
            expected: n,
            actual: x0.len(),
        });
    }

    let a = system.matrix();
    let gradient_scale = 1.0 + linalg::inf_norm(&linalg::transpose_mul(a, system.target()));
    let mut current = Iterate::at(system, bounds.clamp(x0));

    for iter in 0..options.max_iter {
        let gradient = linalg::transpose_mul(a, &current.residuals);
        let free = free_variables(&current.x, &gradient, bounds);

        let pg_norm = projected_gradient_norm(&current.x, &gradient, bounds);
        if pg_norm <= options.g_tol * gradient_scale {
            debug!(iterations = iter, cost = current.cost, "least squares converged");
            return Ok(current.into_fit(iter, true));
        }

        let newton = newton_direction(a, &gradient, &free);
        if let Some(next) = projected_search(system, bounds, &current, &newton) {
            let step = step_norm(&current.x, &next.x);
            let x_scale = 1.0 + linalg::norm_squared(&next.x).sqrt();
            current = next;
            if step <= options.x_tol * x_scale {
                debug!(iterations = iter + 1, cost = current.cost, "least squares step stalled");
                return Ok(current.into_fit(iter + 1, true));
            }
            continue;
        }

        let steepest = steepest_direction(a, &gradient, &free);
        match projected_search(system, bounds, &current, &steepest) {
            Some(next) => current = next,
            None => {
                // No descent direction survives rounding: stationary at working precision.
                debug!(
                    iterations = iter + 1,
                    pg_norm, "least squares stopped without further descent"
                );
                return Ok(current.into_fit(iter + 1, true));
            }
        }
    }

    Err(PlanError::ConvergenceFailure {
        iterations: options.max_iter,
        best: Box::new(current.into_fit(options.max_iter, false)),
    })
}

/// Variables not pinned to a bound by the gradient.
fn free_variables(x: &[f64], gradient: &[f64], bounds: &Bounds) -> Vec<bool> {
    x.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let (lo, hi) = bounds.get(i);
            let pinned_low = xi <= lo && gradient[i] > 0.0;
            let pinned_high = xi >= hi && gradient[i] < 0.0;
            lo < hi && !pinned_low && !pinned_high
        })
        .collect()
}

/// Infinity norm of the gradient with bound-blocked components removed.
fn projected_gradient_norm(x: &[f64], gradient: &[f64], bounds: &Bounds) -> f64 {
    x.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let (lo, hi) = bounds.get(i);
            let g = gradient[i];
            if (xi <= lo && g > 0.0) || (xi >= hi && g < 0.0) {
                0.0
            } else {
                g.abs()
            }
        })
        .fold(0.0, f64::max)
}

/// Gauss-Newton step on the free variables: `(A_Fᵀ A_F) d_F = -g_F`, zero elsewhere.
fn newton_direction(a: &[Vec<f64>], gradient: &[f64], free: &[bool]) -> Vec<f64> {
    let n = gradient.len();
    let idx: Vec<usize> = (0..n).filter(|&i| free[i]).collect();
    let k = idx.len();

    let mut normal = vec![vec![0.0; k]; k];
    for row in a {
        for p in 0..k {
            let ap = row[idx[p]];
            if ap == 0.0 {
                continue;
            }
            for q in 0..k {
                normal[p][q] += ap * row[idx[q]];
            }
        }
    }
    let rhs: Vec<f64> = idx.iter().map(|&i| -gradient[i]).collect();
    let step = linalg::solve_consistent(&normal, &rhs, PIVOT_TOL);

    let mut direction = vec![0.0; n];
    for (p, &i) in idx.iter().enumerate() {
        direction[i] = step[p];
    }
    direction
}

/// Negative gradient on the free variables, scaled to the exact line minimizer.
fn steepest_direction(a: &[Vec<f64>], gradient: &[f64], free: &[bool]) -> Vec<f64> {
    let direction: Vec<f64> = gradient
        .iter()
        .zip(free)
        .map(|(&g, &f)| if f { -g } else { 0.0 })
        .collect();

    let curvature = linalg::norm_squared(&linalg::mul(a, &direction));
    if curvature <= 0.0 {
        return direction;
    }
    let length = linalg::norm_squared(&direction) / curvature;
    direction.into_iter().map(|d| d * length).collect()
}

/// Backtrack along `direction`, projecting onto the box, until the cost drops.
fn projected_search(
    system: &LinearSystem,
    bounds: &Bounds,
    current: &Iterate,
    direction: &[f64],
) -> Option<Iterate> {
    if direction.iter().all(|&d| d == 0.0) {
        return None;
    }

    let mut t = 1.0;
    for _ in 0..LSQ_MAX_BACKTRACKS {
        let trial: Vec<f64> = current
            .x
            .iter()
            .zip(direction)
            .map(|(&xi, &di)| xi + t * di)
            .collect();
        let candidate = Iterate::at(system, bounds.clamp(&trial));
        if candidate.cost < current.cost {
            return Some(candidate);
        }
        t *= 0.5;
    }
    None
}

fn step_norm(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
