// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Delay-Augmented State Space
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Folds the actuation delay into the discrete model: the last
//! `delay_steps` inputs become extra state rows realized as a shift
//! register (sub-diagonal identity block), so delay-free synthesis
//! applies unchanged. Built fresh from a base model, never mutated.
//!
//! Augmented state layout: `[x; u(t−d); u(t−d+1); …; u(t−1)]`.

use ndarray::{s, Array2};

use dipc_types::error::{ControlError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedStateSpace {
    pub a: Array2<f64>,
    pub b: Array2<f64>,
    pub n_states: usize,
    pub n_inputs: usize,
    pub delay_steps: usize,
}

impl AugmentedStateSpace {
    pub fn build(a_d: &Array2<f64>, b_d: &Array2<f64>, delay_steps: usize) -> Result<Self> {
        let n = a_d.nrows();
        let m = b_d.ncols();
        if a_d.ncols() != n || b_d.nrows() != n {
            return Err(ControlError::DimensionMismatch(format!(
                "A_d is {}x{}, B_d is {}x{}",
                a_d.nrows(),
                a_d.ncols(),
                b_d.nrows(),
                b_d.ncols()
            )));
        }
        if delay_steps == 0 {
            return Ok(Self {
                a: a_d.clone(),
                b: b_d.clone(),
                n_states: n,
                n_inputs: m,
                delay_steps,
            });
        }

        let total = n + delay_steps * m;
        let mut a = Array2::<f64>::zeros((total, total));
        let mut b = Array2::<f64>::zeros((total, m));

        a.slice_mut(s![..n, ..n]).assign(a_d);
        // The oldest stored input is the one the plant receives.
        a.slice_mut(s![..n, n..n + m]).assign(b_d);
        if delay_steps > 1 {
            let shift = (delay_steps - 1) * m;
            a.slice_mut(s![n..n + shift, n + m..n + delay_steps * m])
                .assign(&Array2::eye(shift));
        }
        // Fresh input enters at the tail of the register.
        b.slice_mut(s![n + (delay_steps - 1) * m.., ..])
            .assign(&Array2::eye(m));

        Ok(Self {
            a,
            b,
            n_states: n,
            n_inputs: m,
            delay_steps,
        })
    }

    /// Augmented state dimension.
    pub fn dim(&self) -> usize {
        self.n_states + self.delay_steps * self.n_inputs
    }

    /// State cost extended with zero blocks over the delay states.
    pub fn extend_cost(&self, q: &Array2<f64>) -> Result<Array2<f64>> {
        if q.nrows() != self.n_states || q.ncols() != self.n_states {
            return Err(ControlError::DimensionMismatch(format!(
                "Q is {}x{}, expected {n}x{n}",
                q.nrows(),
                q.ncols(),
                n = self.n_states
            )));
        }
        let mut out = Array2::<f64>::zeros((self.dim(), self.dim()));
        out.slice_mut(s![..self.n_states, ..self.n_states]).assign(q);
        Ok(out)
    }

    /// Output matrix extended with zero columns over the delay states.
    pub fn extend_output(&self, c: &Array2<f64>) -> Result<Array2<f64>> {
        if c.ncols() != self.n_states {
            return Err(ControlError::DimensionMismatch(format!(
                "C has {} columns, expected {}",
                c.ncols(),
                self.n_states
            )));
        }
        let mut out = Array2::<f64>::zeros((c.nrows(), self.dim()));
        out.slice_mut(s![.., ..self.n_states]).assign(c);
        Ok(out)
    }

    /// Columns of an augmented gain acting on the physical states.
    pub fn slice_physical(&self, k_ext: &Array2<f64>) -> Result<Array2<f64>> {
        if k_ext.ncols() != self.dim() {
            return Err(ControlError::DimensionMismatch(format!(
                "gain has {} columns, expected {}",
                k_ext.ncols(),
                self.dim()
            )));
        }
        Ok(k_ext.slice(s![.., ..self.n_states]).to_owned())
    }
}
