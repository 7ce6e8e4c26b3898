// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Delay-Compensated Discrete LQR
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Discretize, fold the delay into the state, extend the cost with
//! zero blocks, validate definiteness, solve the DARE and slice the
//! gain back to the physical states. Validation runs before any
//! Riccati work is attempted.

use ndarray::Array2;

use dipc_types::error::Result;
use dipc_types::state::GainVector;

use crate::augment::AugmentedStateSpace;
use crate::discretize::{delay_steps, zoh_discretize};
use crate::riccati::{
    dare_gain, ensure_positive_definite, ensure_positive_semi_definite, solve_dare, DareOptions,
};

/// Everything one delay-LQR synthesis produced.
#[derive(Debug, Clone)]
pub struct LqrDelayDesign {
    /// Gain over the full augmented state.
    pub gain_augmented: Array2<f64>,
    /// Columns acting on the physical states; the only part a caller
    /// may apply to the plant.
    pub gain_physical: Array2<f64>,
    /// DARE solution for the augmented system.
    pub riccati: Array2<f64>,
    pub delay_steps: usize,
}

impl LqrDelayDesign {
    /// Physical gain as a 4-vector, for the 4-state pendulum plant.
    pub fn gain_vector(&self) -> Option<GainVector> {
        if self.gain_physical.nrows() == 1 && self.gain_physical.ncols() == 4 {
            let mut k = [0.0; 4];
            for (i, v) in self.gain_physical.row(0).iter().enumerate() {
                k[i] = *v;
            }
            Some(GainVector(k))
        } else {
            None
        }
    }
}

/// Delay-compensated LQR for the continuous pair `(A, B)`.
pub fn dlqr_delay(
    a: &Array2<f64>,
    b: &Array2<f64>,
    q: &Array2<f64>,
    r: &Array2<f64>,
    ts: f64,
    delay_s: f64,
    opts: &DareOptions,
) -> Result<LqrDelayDesign> {
    let (a_d, b_d) = zoh_discretize(a, b, ts)?;
    let steps = delay_steps(delay_s, ts)?;
    let aug = AugmentedStateSpace::build(&a_d, &b_d, steps)?;
    let q_ext = aug.extend_cost(q)?;

    ensure_positive_semi_definite("Q_extended", &q_ext)?;
    ensure_positive_definite("R", r)?;

    let p = solve_dare(&aug.a, &aug.b, &q_ext, r, opts)?;
    let gain_augmented = dare_gain(&aug.a, &aug.b, r, &p)?;
    let gain_physical = aug.slice_physical(&gain_augmented)?;

    tracing::info!(
        delay_steps = steps,
        augmented_dim = aug.dim(),
        "delay LQR synthesis complete"
    );

    Ok(LqrDelayDesign {
        gain_augmented,
        gain_physical,
        riccati: p,
        delay_steps: steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dipc_math::eig::spectral_radius;
    use dipc_types::error::ControlError;
    use ndarray::array;

    fn double_integrator() -> (Array2<f64>, Array2<f64>) {
        (array![[0.0, 1.0], [0.0, 0.0]], array![[0.0], [1.0]])
    }

    #[test]
    fn test_no_delay_reduces_to_plain_dlqr() {
        let (a, b) = double_integrator();
        let q = Array2::<f64>::eye(2);
        let r = array![[1.0]];
        let design = dlqr_delay(&a, &b, &q, &r, 0.1, 0.0, &DareOptions::default()).unwrap();
        assert_eq!(design.delay_steps, 0);
        assert_eq!(design.gain_augmented, design.gain_physical);
        // The designed loop is stable in discrete time.
        let (a_d, b_d) = zoh_discretize(&a, &b, 0.1).unwrap();
        let a_cl = &a_d - &b_d.dot(&design.gain_physical);
        assert!(spectral_radius(&a_cl).unwrap() < 1.0);
    }

    #[test]
    fn test_delay_augments_and_stabilizes() {
        let (a, b) = double_integrator();
        let q = Array2::<f64>::eye(2);
        let r = array![[0.5]];
        let design = dlqr_delay(&a, &b, &q, &r, 0.1, 0.25, &DareOptions::default()).unwrap();
        assert_eq!(design.delay_steps, 3);
        assert_eq!(design.gain_augmented.ncols(), 5);
        assert_eq!(design.gain_physical.ncols(), 2);
        // Augmented closed loop (delay included) is stable.
        let aug = {
            let (a_d, b_d) = zoh_discretize(&a, &b, 0.1).unwrap();
            AugmentedStateSpace::build(&a_d, &b_d, 3).unwrap()
        };
        let a_cl = &aug.a - &aug.b.dot(&design.gain_augmented);
        assert!(spectral_radius(&a_cl).unwrap() < 1.0);
    }

    #[test]
    fn test_indefinite_q_fails_before_riccati() {
        let (a, b) = double_integrator();
        let q = array![[1.0, 0.0], [0.0, -1.0]];
        let r = array![[1.0]];
        let err = dlqr_delay(&a, &b, &q, &r, 0.1, 0.2, &DareOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ControlError::NotPositiveSemiDefinite {
                name: "Q_extended",
                ..
            }
        ));
    }

    #[test]
    fn test_non_positive_r_fails_fast() {
        let (a, b) = double_integrator();
        let q = Array2::<f64>::eye(2);
        let r = array![[0.0]];
        let err = dlqr_delay(&a, &b, &q, &r, 0.1, 0.0, &DareOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ControlError::NotPositiveDefinite { name: "R", .. }
        ));
    }

    #[test]
    fn test_gain_vector_requires_four_states() {
        let (a, b) = double_integrator();
        let q = Array2::<f64>::eye(2);
        let r = array![[1.0]];
        let design = dlqr_delay(&a, &b, &q, &r, 0.1, 0.0, &DareOptions::default()).unwrap();
        assert!(design.gain_vector().is_none());
    }
}
