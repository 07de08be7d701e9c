//! Snap serving-discrete quantities to whole units.
//!
//! With every other quantity held fixed, the loss along one integer axis is
//! convex, so only the floor and ceil of the continuous optimum can be best on
//! that axis. The refiner enumerates every floor/ceil combination across the
//! discrete foods (up to 2^k) and keeps the one with the lowest loss. There is
//! no pruning: k is the number of discrete foods in one meal and is capped at
//! `MAX_DISCRETE_FOODS`.

use crate::error::{PlanError, Result};
use crate::planner::constants::MAX_DISCRETE_FOODS;
use crate::planner::constraints::LinearSystem;
use crate::planner::least_squares::Bounds;

/// Best whole-unit adjustment of a continuous solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub quantities: Vec<f64>,
    pub loss: f64,
    /// Number of candidate combinations evaluated.
    pub evaluated: usize,
}

/// Whole-unit candidates for one discrete dimension.
///
/// `floor` and `ceil` of `value`, deduplicated when `value` is already whole,
/// with anything outside `[lower, upper]` dropped.
pub fn candidates(value: f64, lower: f64, upper: f64) -> Vec<f64> {
    let floor = value.floor();
    let ceil = value.ceil();
    let mut out = Vec::with_capacity(2);
    for c in [floor, ceil] {
        if c >= lower && c <= upper && !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// Replace the quantities at `discrete` with the best floor/ceil combination.
///
/// `names` labels the dimensions for error messages. Continuous dimensions
/// keep their value from `x`. Without discrete dimensions this returns `x`
/// unchanged with its loss.
pub fn refine(
    system: &LinearSystem,
    bounds: &Bounds,
    x: &[f64],
    discrete: &[usize],
    names: &[&str],
) -> Result<Refinement> {
    if discrete.is_empty() {
        return Ok(Refinement {
            quantities: x.to_vec(),
            loss: system.loss(x),
            evaluated: 1,
        });
    }
    if discrete.len() > MAX_DISCRETE_FOODS {
        return Err(PlanError::TooManyDiscrete {
            count: discrete.len(),
            limit: MAX_DISCRETE_FOODS,
        });
    }

    let mut choices = Vec::with_capacity(discrete.len());
    for &i in discrete {
        let (lower, upper) = bounds.get(i);
        let options = candidates(x[i], lower, upper);
        if options.is_empty() {
            let name = names.get(i).copied().unwrap_or("food");
            return Err(PlanError::NoDiscreteCandidate(name.to_string()));
        }
        choices.push(options);
    }

    let mut trial = x.to_vec();
    let mut best_loss = f64::INFINITY;
    let mut best = x.to_vec();
    let mut evaluated = 0;

    // Odometer over the choices, last dimension fastest.
    let mut digits = vec![0usize; choices.len()];
    loop {
        for ((&i, options), &d) in discrete.iter().zip(&choices).zip(&digits) {
            trial[i] = options[d];
        }
        let loss = system.loss(&trial);
        evaluated += 1;
        if loss < best_loss {
            best_loss = loss;
            best.copy_from_slice(&trial);
        }

        let mut pos = digits.len();
        loop {
            if pos == 0 {
                return Ok(Refinement {
                    quantities: best,
                    loss: best_loss,
                    evaluated,
                });
            }
            pos -= 1;
            digits[pos] += 1;
            if digits[pos] < choices[pos].len() {
                break;
            }
            digits[pos] = 0;
        }
    }
}
