// ─────────────────────────────────────────────────────────────────────
// DIPC Control — H-infinity Synthesis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! State-feedback H-infinity gains from a Riccati solve parameterized
//! by the performance bound γ on the weighted output `C·x`:
//! continuous (`Q = CᵀC`, `R = γ²I`, CARE, `K = R⁻¹BᵀP`) or discrete
//! with the delay folded into the state and the central gain
//! `K = (BᵀPB − γ²I)⁻¹BᵀPA`. A singular central term means the bound
//! is infeasible for this γ.

use ndarray::Array2;

use dipc_math::linalg::{inverse, solve};
use dipc_types::error::{ControlError, Result};
use dipc_types::state::GainVector;

use crate::augment::AugmentedStateSpace;
use crate::discretize::{delay_steps, zoh_discretize};
use crate::riccati::{solve_care, solve_dare, CareOptions, DareOptions};

#[derive(Debug, Clone)]
pub struct HInfDesign {
    /// Gain columns acting on the physical states.
    pub gain_physical: Array2<f64>,
    /// Riccati solution behind the gain.
    pub riccati: Array2<f64>,
    pub gamma: f64,
    pub delay_steps: usize,
}

impl HInfDesign {
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

fn check_gamma(gamma: f64) -> Result<()> {
    if gamma <= 0.0 || !gamma.is_finite() {
        return Err(ControlError::InvalidConfig(
            "gamma must be positive and finite".into(),
        ));
    }
    Ok(())
}

fn check_output_dims(a: &Array2<f64>, c: &Array2<f64>) -> Result<()> {
    if c.ncols() != a.nrows() {
        return Err(ControlError::DimensionMismatch(format!(
            "C has {} columns for an {}-state plant",
            c.ncols(),
            a.nrows()
        )));
    }
    Ok(())
}

/// Continuous-time H-infinity state feedback, no delay model.
pub fn h_infinity_continuous(
    a: &Array2<f64>,
    b: &Array2<f64>,
    c: &Array2<f64>,
    gamma: f64,
    opts: &CareOptions,
) -> Result<HInfDesign> {
    check_gamma(gamma)?;
    check_output_dims(a, c)?;
    let q = c.t().dot(c);
    let r = Array2::<f64>::eye(b.ncols()) * (gamma * gamma);

    let p = solve_care(a, b, &q, &r, opts)?;
    let gain = inverse(&r)?.dot(&b.t()).dot(&p);

    Ok(HInfDesign {
        gain_physical: gain,
        riccati: p,
        gamma,
        delay_steps: 0,
    })
}

/// Discrete-time H-infinity state feedback with the delay folded into
/// extra state rows.
pub fn h_infinity_discrete(
    a: &Array2<f64>,
    b: &Array2<f64>,
    c: &Array2<f64>,
    gamma: f64,
    ts: f64,
    delay_s: f64,
    opts: &DareOptions,
) -> Result<HInfDesign> {
    check_gamma(gamma)?;
    check_output_dims(a, c)?;

    let (a_d, b_d) = zoh_discretize(a, b, ts)?;
    let steps = delay_steps(delay_s, ts)?;
    let aug = AugmentedStateSpace::build(&a_d, &b_d, steps)?;
    let c_ext = aug.extend_output(c)?;

    let q = c_ext.t().dot(&c_ext);
    let m = aug.n_inputs;
    let r = Array2::<f64>::eye(m) * (gamma * gamma);

    let p = solve_dare(&aug.a, &aug.b, &q, &r, opts)?;

    // Central gain: (BᵀPB − γ²I)⁻¹ BᵀPA.
    let bt_p = aug.b.t().dot(&p);
    let central = &bt_p.dot(&aug.b) - &r;
    let k_ext = solve(&central, &bt_p.dot(&aug.a)).map_err(|e| match e {
        ControlError::Singular => ControlError::GammaInfeasible { gamma },
        other => other,
    })?;
    let gain_physical = aug.slice_physical(&k_ext)?;

    tracing::info!(gamma, delay_steps = steps, "H-infinity synthesis complete");

    Ok(HInfDesign {
        gain_physical,
        riccati: p,
        gamma,
        delay_steps: steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dipc_math::linalg::inf_norm;
    use ndarray::array;

    #[test]
    fn test_continuous_scalar_matches_closed_form() {
        // a=0, b=1, C=1, γ=1: P = 1, K = P/γ² = 1.
        let design = h_infinity_continuous(
            &array![[0.0]],
            &array![[1.0]],
            &array![[1.0]],
            1.0,
            &CareOptions::default(),
        )
        .unwrap();
        assert!((design.riccati[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((design.gain_physical[[0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_stabilizes_unstable_plant() {
        let a = array![[0.0, 1.0], [4.0, 0.0]];
        let b = array![[0.0], [1.0]];
        let c = Array2::<f64>::eye(2);
        let design =
            h_infinity_continuous(&a, &b, &c, 1.0, &CareOptions::default()).unwrap();
        let a_cl = &a - &b.dot(&design.gain_physical);
        let eigs = dipc_math::eig::eigenvalues(&a_cl).unwrap();
        assert!(eigs.iter().all(|e| e.re < 0.0), "spectrum {eigs:?}");
    }

    #[test]
    fn test_larger_gamma_relaxes_the_gain() {
        let a = array![[0.0, 1.0], [4.0, 0.0]];
        let b = array![[0.0], [1.0]];
        let c = Array2::<f64>::eye(2);
        let tight =
            h_infinity_continuous(&a, &b, &c, 1.0, &CareOptions::default()).unwrap();
        let loose =
            h_infinity_continuous(&a, &b, &c, 10.0, &CareOptions::default()).unwrap();
        assert!(inf_norm(&loose.gain_physical) < inf_norm(&tight.gain_physical));
    }

    #[test]
    fn test_discrete_with_delay_slices_physical_gain() {
        let a = array![[0.0, 1.0], [0.5, 0.0]];
        let b = array![[0.0], [1.0]];
        let c = array![[0.01, 0.0], [0.0, 0.001]];
        let design = h_infinity_discrete(
            &a,
            &b,
            &c,
            1.0,
            0.1,
            0.25,
            &DareOptions::default(),
        )
        .unwrap();
        assert_eq!(design.delay_steps, 3);
        assert_eq!(design.gain_physical.ncols(), 2);
        assert_eq!(design.gain_physical.nrows(), 1);
        assert!(design.gain_physical.iter().all(|v| v.is_finite()));
        // Riccati solution of the augmented system.
        assert_eq!(design.riccati.nrows(), 5);
    }

    #[test]
    fn test_invalid_gamma_rejected() {
        let a = array![[0.0]];
        let b = array![[1.0]];
        let c = array![[1.0]];
        assert!(h_infinity_continuous(&a, &b, &c, 0.0, &CareOptions::default()).is_err());
        assert!(
            h_infinity_discrete(&a, &b, &c, -1.0, 0.1, 0.0, &DareOptions::default()).is_err()
        );
    }

    #[test]
    fn test_output_dimension_checked() {
        let a = array![[0.0, 1.0], [0.0, 0.0]];
        let b = array![[0.0], [1.0]];
        let c = array![[1.0]];
        assert!(matches!(
            h_infinity_continuous(&a, &b, &c, 1.0, &CareOptions::default()),
            Err(ControlError::DimensionMismatch(_))
        ));
    }
}
