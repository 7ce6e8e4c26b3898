// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Pole Placement
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Single-input pole placement by Ackermann's formula, with the
//! controllability-rank test as the failure gate and the achieved
//! closed-loop spectrum as the verification artifact.

use ndarray::{s, Array2};
use num_complex::Complex64;

use dipc_math::eig::eigenvalues;
use dipc_math::linalg::{rank, solve};
use dipc_types::error::{ControlError, Result};

/// `[B, AB, A²B, …, Aⁿ⁻¹B]`.
pub fn controllability_matrix(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let m = b.ncols();
    if a.ncols() != n || b.nrows() != n {
        return Err(ControlError::DimensionMismatch(format!(
            "A is {}x{}, B is {}x{}",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    let mut out = Array2::<f64>::zeros((n, n * m));
    let mut block = b.clone();
    for k in 0..n {
        out.slice_mut(s![.., k * m..(k + 1) * m]).assign(&block);
        block = a.dot(&block);
    }
    Ok(out)
}

pub fn controllability_rank(a: &Array2<f64>, b: &Array2<f64>) -> Result<usize> {
    Ok(rank(&controllability_matrix(a, b)?))
}

/// Monic characteristic polynomial `Π(λ − pᵢ)` as real coefficients,
/// leading term first. Poles must close under conjugation.
fn real_characteristic_coefficients(poles: &[Complex64]) -> Result<Vec<f64>> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &p in poles {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * p;
        }
        coeffs = next;
    }
    let mut real = Vec::with_capacity(coeffs.len());
    for c in &coeffs {
        if c.im.abs() > 1e-8 * (1.0 + c.re.abs()) {
            return Err(ControlError::PolesNotConjugate);
        }
        real.push(c.re);
    }
    Ok(real)
}

/// Gain plus verification spectrum from one placement call.
#[derive(Debug, Clone)]
pub struct PolePlacement {
    /// `1×n` feedback gain for `u = −K·x`.
    pub gain: Array2<f64>,
    pub controllability_rank: usize,
    /// Closed-loop eigenvalues of `A − B·K`.
    pub achieved: Vec<Complex64>,
}

/// Place the closed-loop eigenvalues of the single-input pair `(A, B)`
/// at the desired locations.
pub fn place_poles(
    a: &Array2<f64>,
    b: &Array2<f64>,
    poles: &[Complex64],
) -> Result<PolePlacement> {
    let n = a.nrows();
    if b.ncols() != 1 {
        return Err(ControlError::DimensionMismatch(format!(
            "Ackermann placement needs a single-input plant, B has {} columns",
            b.ncols()
        )));
    }
    if poles.len() != n {
        return Err(ControlError::DimensionMismatch(format!(
            "{} poles for an {n}-state system",
            poles.len()
        )));
    }

    let ctrb = controllability_matrix(a, b)?;
    let ctrb_rank = rank(&ctrb);
    if ctrb_rank < n {
        return Err(ControlError::NotControllable {
            rank: ctrb_rank,
            dim: n,
        });
    }

    let coeffs = real_characteristic_coefficients(poles)?;
    // α(A) by Horner's scheme.
    let mut alpha = Array2::<f64>::eye(n);
    for &c in &coeffs[1..] {
        alpha = alpha.dot(a) + &(Array2::<f64>::eye(n) * c);
    }

    // K = eₙᵀ · M⁻¹ · α(A).
    let m_inv_alpha = solve(&ctrb, &alpha)?;
    let gain = m_inv_alpha.slice(s![n - 1..n, ..]).to_owned();

    let a_cl = a - &b.dot(&gain);
    let achieved = eigenvalues(&a_cl)?;

    Ok(PolePlacement {
        gain,
        controllability_rank: ctrb_rank,
        achieved,
    })
}
