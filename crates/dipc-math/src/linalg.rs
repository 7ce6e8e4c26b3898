// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Dense Linear Algebra
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Small dense routines on `ndarray` matrices: Gaussian solve/inverse,
//! numerical rank, and the scaling-and-squaring matrix exponential.
//! Everything here targets the ≤ ~40-state systems of this workspace;
//! no LAPACK backend is linked.

use ndarray::{Array2, Axis};

use dipc_types::error::{ControlError, Result};

/// Max absolute row sum.
pub fn inf_norm(a: &Array2<f64>) -> f64 {
    a.axis_iter(Axis(0))
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

fn ensure_square(a: &Array2<f64>, what: &str) -> Result<usize> {
    if a.nrows() != a.ncols() {
        return Err(ControlError::DimensionMismatch(format!(
            "{what} must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(a.nrows())
}

/// Solve `A·X = B` by Gaussian elimination with partial pivoting.
pub fn solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let n = ensure_square(a, "coefficient matrix")?;
    if b.nrows() != n {
        return Err(ControlError::DimensionMismatch(format!(
            "right-hand side has {} rows, expected {n}",
            b.nrows()
        )));
    }
    let m = b.ncols();
    let mut lu = a.clone();
    let mut x = b.clone();
    let scale = inf_norm(a).max(1e-300);

    for col in 0..n {
        // Partial pivot.
        let mut pivot_row = col;
        for row in col + 1..n {
            if lu[[row, col]].abs() > lu[[pivot_row, col]].abs() {
                pivot_row = row;
            }
        }
        if lu[[pivot_row, col]].abs() <= f64::EPSILON * (n as f64) * scale {
            return Err(ControlError::Singular);
        }
        if pivot_row != col {
            for j in 0..n {
                lu.swap([col, j], [pivot_row, j]);
            }
            for j in 0..m {
                x.swap([col, j], [pivot_row, j]);
            }
        }
        let pivot = lu[[col, col]];
        for row in col + 1..n {
            let factor = lu[[row, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                lu[[row, j]] -= factor * lu[[col, j]];
            }
            for j in 0..m {
                x[[row, j]] -= factor * x[[col, j]];
            }
        }
    }

    // Back substitution.
    for col in (0..n).rev() {
        for j in 0..m {
            let mut sum = x[[col, j]];
            for k in col + 1..n {
                sum -= lu[[col, k]] * x[[k, j]];
            }
            x[[col, j]] = sum / lu[[col, col]];
        }
    }
    Ok(x)
}

pub fn inverse(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = ensure_square(a, "matrix")?;
    solve(a, &Array2::eye(n))
}

/// Numerical rank via row echelon reduction.
pub fn rank(a: &Array2<f64>) -> usize {
    let mut r = a.clone();
    let (rows, cols) = (r.nrows(), r.ncols());
    let tol = f64::EPSILON
        * (rows.max(cols) as f64)
        * r.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(1.0);

    let mut rank = 0;
    let mut pivot_col = 0;
    while rank < rows && pivot_col < cols {
        let mut pivot_row = rank;
        for row in rank + 1..rows {
            if r[[row, pivot_col]].abs() > r[[pivot_row, pivot_col]].abs() {
                pivot_row = row;
            }
        }
        if r[[pivot_row, pivot_col]].abs() <= tol {
            pivot_col += 1;
            continue;
        }
        if pivot_row != rank {
            for j in 0..cols {
                r.swap([rank, j], [pivot_row, j]);
            }
        }
        for row in rank + 1..rows {
            let factor = r[[row, pivot_col]] / r[[rank, pivot_col]];
            for j in pivot_col..cols {
                r[[row, j]] -= factor * r[[rank, j]];
            }
        }
        rank += 1;
        pivot_col += 1;
    }
    rank
}

/// Matrix exponential by scaling-and-squaring with a Taylor kernel.
pub fn expm(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = ensure_square(a, "matrix")?;
    let norm = inf_norm(a);
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as u32
    } else {
        0
    };
    let scaled = a / 2.0_f64.powi(squarings as i32);

    let mut term = Array2::<f64>::eye(n);
    let mut sum = Array2::<f64>::eye(n);
    for k in 1..=40 {
        term = term.dot(&scaled) / (k as f64);
        sum += &term;
        if inf_norm(&term) <= f64::EPSILON * inf_norm(&sum) {
            break;
        }
    }

    for _ in 0..squarings {
        sum = sum.dot(&sum);
    }
    Ok(sum)
}

/// `n` evenly spaced samples over `[lo, hi]`, both ends included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / ((n - 1) as f64);
            (0..n).map(|i| lo + step * (i as f64)).collect()
        }
    }
}
