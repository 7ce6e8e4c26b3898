// ─────────────────────────────────────────────────────────────────────
// DIPC Control — ZOH Discretization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Exact zero-order-hold discretization via the augmented-matrix
//! exponential: `exp([[A, B], [0, 0]]·Ts)` carries `A_d` and `B_d` in
//! its top blocks.

use ndarray::{s, Array2};

use dipc_math::linalg::expm;
use dipc_types::error::{ControlError, Result};

/// `(A_d, B_d)` for sample period `ts`.
pub fn zoh_discretize(a: &Array2<f64>, b: &Array2<f64>, ts: f64) -> Result<(Array2<f64>, Array2<f64>)> {
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
    if ts <= 0.0 {
        return Err(ControlError::InvalidConfig(
            "sample period must be positive".into(),
        ));
    }

    let mut aug = Array2::<f64>::zeros((n + m, n + m));
    aug.slice_mut(s![..n, ..n]).assign(a);
    aug.slice_mut(s![..n, n..]).assign(b);
    let exp_aug = expm(&(aug * ts))?;

    let a_d = exp_aug.slice(s![..n, ..n]).to_owned();
    let b_d = exp_aug.slice(s![..n, n..]).to_owned();
    Ok((a_d, b_d))
}

/// Delay expressed in whole sample periods, `⌈delay/Ts⌉`.
pub fn delay_steps(delay_s: f64, ts: f64) -> Result<usize> {
    if ts <= 0.0 {
        return Err(ControlError::InvalidConfig(
            "sample period must be positive".into(),
        ));
    }
    if delay_s < 0.0 {
        return Err(ControlError::InvalidConfig(
            "delay must be non-negative".into(),
        ));
    }
    Ok((delay_s / ts).ceil() as usize)
}
