use crate::error::{PlanError, Result};
use crate::planner::constants::RANK_TOL;
use crate::planner::linalg;

/// One linear requirement over the food quantities: `coefficients · x = target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub target: f64,
}

/// Append-only list of constraints over a fixed number of foods.
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    n_foods: usize,
    constraints: Vec<Constraint>,
}

impl ConstraintSystem {
    pub fn new(n_foods: usize) -> Self {
        Self {
            n_foods,
            constraints: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// The coefficient vector must have one entry per food and the target
    /// must be a finite, non-negative amount.
    pub fn add_constraint(&mut self, coefficients: Vec<f64>, target: f64) -> Result<()> {
        if coefficients.len() != self.n_foods {
            return Err(PlanError::DimensionMismatch {
                expected: self.n_foods,
                actual: coefficients.len(),
            });
        }
        if !target.is_finite() || target < 0.0 {
            return Err(PlanError::InvalidTarget(target));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PlanError::InvalidInput(
                "constraint coefficients must be finite".to_string(),
            ));
        }

        self.constraints.push(Constraint {
            coefficients,
            target,
        });
        Ok(())
    }

    /// Stack the rows into `A` and `b`.
    pub fn assemble(&self) -> Result<LinearSystem> {
        if self.constraints.is_empty() {
            return Err(PlanError::NoConstraints);
        }

        let (a, b) = self
            .constraints
            .iter()
            .map(|c| (c.coefficients.clone(), c.target))
            .unzip();

        LinearSystem::new(a, b)
    }

    /// `n_foods - rank(A)`; positive means the optimum is not unique.
    pub fn rank_deficiency(&self) -> Result<usize> {
        Ok(self.assemble()?.rank_deficiency())
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// Dense `A x ≈ b` with `A` stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl LinearSystem {
    /// Fails with `DimensionMismatch` when `A` is ragged or its row count differs from `b`.
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Self> {
        if a.len() != b.len() {
            return Err(PlanError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        let n = a.first().map_or(0, Vec::len);
        if let Some(row) = a.iter().find(|row| row.len() != n) {
            return Err(PlanError::DimensionMismatch {
                expected: n,
                actual: row.len(),
            });
        }
        Ok(Self { a, b })
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.a
    }

    pub fn target(&self) -> &[f64] {
        &self.b
    }

    pub fn n_cols(&self) -> usize {
        self.a.first().map_or(0, Vec::len)
    }

    /// `n_cols - rank(A)`, with rank taken by complete-pivot elimination.
    pub fn rank_deficiency(&self) -> usize {
        let rank = linalg::matrix_rank(&self.a, RANK_TOL);
        self.n_cols().saturating_sub(rank)
    }

    /// `A x - b`.
    pub fn residuals(&self, x: &[f64]) -> Vec<f64> {
        self.a
            .iter()
            .zip(&self.b)
            .map(|(row, &bi)| linalg::dot(row, x) - bi)
            .collect()
    }

    /// Mean squared residual at `x`.
    pub fn loss(&self, x: &[f64]) -> f64 {
        if self.b.is_empty() {
            return 0.0;
        }
        linalg::norm_squared(&self.residuals(x)) / self.b.len() as f64
    }
}
