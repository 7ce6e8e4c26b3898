// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Riccati Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Algebraic Riccati solutions without LAPACK. The discrete equation is
//! solved by residual-checked fixed-point iteration; the continuous one
//! by integrating the differential Riccati equation to steady state,
//! whose fixed point is the ARE solution. Non-convergence is reported,
//! with the offending matrices logged at the failure site.

use ndarray::Array2;

use dipc_math::eig::symmetric_eigenvalues;
use dipc_math::linalg::{inf_norm, inverse, solve};
use dipc_math::rk4::rk4_step_matrix;
use dipc_types::error::{ControlError, Result};

/// Iteration limits for the discrete fixed point.
#[derive(Debug, Clone, Copy)]
pub struct DareOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for DareOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            tolerance: 1e-11,
        }
    }
}

/// Step and limits for the integrated differential Riccati equation.
#[derive(Debug, Clone, Copy)]
pub struct CareOptions {
    pub step_s: f64,
    pub max_steps: usize,
    pub tolerance: f64,
}

impl Default for CareOptions {
    fn default() -> Self {
        Self {
            step_s: 5e-4,
            max_steps: 400_000,
            tolerance: 1e-10,
        }
    }
}

fn check_system_dims(a: &Array2<f64>, b: &Array2<f64>, q: &Array2<f64>, r: &Array2<f64>) -> Result<(usize, usize)> {
    let n = a.nrows();
    let m = b.ncols();
    if a.ncols() != n || b.nrows() != n || q.nrows() != n || q.ncols() != n || r.nrows() != m || r.ncols() != m {
        return Err(ControlError::DimensionMismatch(format!(
            "A {}x{}, B {}x{}, Q {}x{}, R {}x{}",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols(),
            q.nrows(),
            q.ncols(),
            r.nrows(),
            r.ncols()
        )));
    }
    Ok((n, m))
}

/// Fail unless the (symmetrized) matrix has no eigenvalue below `−tol`.
pub fn ensure_positive_semi_definite(name: &'static str, m: &Array2<f64>) -> Result<()> {
    let eigs = symmetric_eigenvalues(m)?;
    let scale = eigs.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    match eigs.first() {
        Some(&min) if min < -1e-9 * scale => {
            Err(ControlError::NotPositiveSemiDefinite { name, eigenvalue: min })
        }
        _ => Ok(()),
    }
}

/// Fail unless every eigenvalue is strictly positive.
pub fn ensure_positive_definite(name: &'static str, m: &Array2<f64>) -> Result<()> {
    let eigs = symmetric_eigenvalues(m)?;
    let scale = eigs.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    match eigs.first() {
        Some(&min) if min <= 1e-12 * scale => {
            Err(ControlError::NotPositiveDefinite { name, eigenvalue: min })
        }
        None => Err(ControlError::NotPositiveDefinite {
            name,
            eigenvalue: f64::NEG_INFINITY,
        }),
        _ => Ok(()),
    }
}

/// Solve `P = AᵀPA − AᵀPB(R + BᵀPB)⁻¹BᵀPA + Q` by fixed-point
/// iteration from `P₀ = Q`.
pub fn solve_dare(
    a: &Array2<f64>,
    b: &Array2<f64>,
    q: &Array2<f64>,
    r: &Array2<f64>,
    opts: &DareOptions,
) -> Result<Array2<f64>> {
    check_system_dims(a, b, q, r)?;
    let mut p = q.clone();
    let mut residual = f64::INFINITY;

    for _ in 0..opts.max_iterations {
        let at_p = a.t().dot(&p);
        let bt_p = b.t().dot(&p);
        let gram = r + &bt_p.dot(b);
        let gain = solve(&gram, &bt_p.dot(a))?;
        let next = &at_p.dot(a) - &at_p.dot(b).dot(&gain) + q;
        // Symmetrize to keep round-off from accumulating.
        let next = (&next + &next.t()) * 0.5;

        residual = inf_norm(&(&next - &p));
        p = next;
        if residual <= opts.tolerance * (1.0 + inf_norm(&p)) {
            return Ok(p);
        }
    }

    tracing::error!(?a, ?b, ?q, ?r, residual, "discrete Riccati iteration stalled");
    Err(ControlError::RiccatiDiverged {
        iterations: opts.max_iterations,
        residual,
    })
}

/// LQR-type gain `(R + BᵀPB)⁻¹BᵀPA` for a solved DARE.
pub fn dare_gain(
    a: &Array2<f64>,
    b: &Array2<f64>,
    r: &Array2<f64>,
    p: &Array2<f64>,
) -> Result<Array2<f64>> {
    let bt_p = b.t().dot(p);
    let gram = r + &bt_p.dot(b);
    solve(&gram, &bt_p.dot(a))
}

/// Solve `AᵀP + PA − PBR⁻¹BᵀP + Q = 0` by marching the differential
/// Riccati equation in time-to-go from `P(0) = 0` until it stalls on
/// the steady state.
pub fn solve_care(
    a: &Array2<f64>,
    b: &Array2<f64>,
    q: &Array2<f64>,
    r: &Array2<f64>,
    opts: &CareOptions,
) -> Result<Array2<f64>> {
    let (n, _) = check_system_dims(a, b, q, r)?;
    let r_inv = inverse(r)?;
    let g = b.dot(&r_inv).dot(&b.t());

    let flow = |p: &Array2<f64>| a.t().dot(p) + p.dot(a) - p.dot(&g).dot(p) + q;

    let mut p = Array2::<f64>::zeros((n, n));
    let mut residual = f64::INFINITY;
    for _ in 0..opts.max_steps {
        let next = rk4_step_matrix(&flow, &p, opts.step_s);
        let next = (&next + &next.t()) * 0.5;
        if !next.iter().all(|v| v.is_finite()) {
            break;
        }
        residual = inf_norm(&flow(&next));
        p = next;
        if residual <= opts.tolerance * (1.0 + inf_norm(&p)) {
            return Ok(p);
        }
    }

    tracing::error!(?a, ?b, ?q, ?r, residual, "continuous Riccati integration stalled");
    Err(ControlError::RiccatiDiverged {
        iterations: opts.max_steps,
        residual,
    })
}
