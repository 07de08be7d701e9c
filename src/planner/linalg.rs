//! Dense elimination helpers for the small systems the planner builds.

#![allow(clippy::needless_range_loop)]

/// Upper-trapezoidal form of a matrix with its permuted right-hand side.
struct Elimination {
    reduced: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    columns: Vec<usize>,
    rank: usize,
}

/// Gaussian elimination with complete pivoting on a copy of `matrix`.
///
/// Pivots at or below `rel_tol * max|a_ij| * max(m, n)` are treated as zero.
fn eliminate(matrix: &[Vec<f64>], rhs: &[f64], rel_tol: f64) -> Elimination {
    let m = matrix.len();
    let n = matrix.first().map_or(0, Vec::len);
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut b = rhs.to_vec();
    let mut columns: Vec<usize> = (0..n).collect();

    let max_abs = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tol = rel_tol * max_abs * m.max(n) as f64;

    let mut rank = 0;
    if max_abs == 0.0 {
        return Elimination {
            reduced: a,
            rhs: b,
            columns,
            rank,
        };
    }

    for k in 0..m.min(n) {
        let mut pivot = (k, k);
        let mut pivot_abs = 0.0;
        for i in k..m {
            for j in k..n {
                if a[i][j].abs() > pivot_abs {
                    pivot_abs = a[i][j].abs();
                    pivot = (i, j);
                }
            }
        }
        if pivot_abs <= tol {
            break;
        }

        let (p, q) = pivot;
        a.swap(k, p);
        b.swap(k, p);
        if q != k {
            for row in a.iter_mut() {
                row.swap(k, q);
            }
            columns.swap(k, q);
        }

        for i in (k + 1)..m {
            let factor = a[i][k] / a[k][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[i][j] -= factor * a[k][j];
            }
            b[i] -= factor * b[k];
        }
        rank += 1;
    }

    Elimination {
        reduced: a,
        rhs: b,
        columns,
        rank,
    }
}

/// Numerical rank of a dense row-major matrix.
pub fn matrix_rank(matrix: &[Vec<f64>], rel_tol: f64) -> usize {
    let zeros = vec![0.0; matrix.len()];
    eliminate(matrix, &zeros, rel_tol).rank
}

/// Solve a square system that may be singular but is consistent.
///
/// Directions the matrix cannot resolve are set to zero, which picks one
/// solution out of the affine family when the system is rank deficient.
pub fn solve_consistent(matrix: &[Vec<f64>], rhs: &[f64], rel_tol: f64) -> Vec<f64> {
    let n = rhs.len();
    let Elimination {
        reduced,
        rhs: b,
        columns,
        rank,
    } = eliminate(matrix, rhs, rel_tol);

    let mut y = vec![0.0; n];
    for k in (0..rank).rev() {
        let mut acc = b[k];
        for j in (k + 1)..rank {
            acc -= reduced[k][j] * y[j];
        }
        y[k] = acc / reduced[k][k];
    }

    let mut x = vec![0.0; n];
    for (k, &col) in columns.iter().enumerate() {
        x[col] = y[k];
    }
    x
}

/// `Aᵀ v` for a row-major `A`.
pub fn transpose_mul(matrix: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let n = matrix.first().map_or(0, Vec::len);
    let mut out = vec![0.0; n];
    for (row, &vi) in matrix.iter().zip(v) {
        for (o, &aij) in out.iter_mut().zip(row) {
            *o += aij * vi;
        }
    }
    out
}

/// `A x` for a row-major `A`.
pub fn mul(matrix: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, x)).collect()
}

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm_squared(v: &[f64]) -> f64 {
    dot(v, v)
}

#[inline]
pub fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}
