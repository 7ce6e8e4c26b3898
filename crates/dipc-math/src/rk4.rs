// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Runge-Kutta Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Classical 4th-order Runge-Kutta, stateless and deterministic for
//! identical inputs. Returns the next state together with the combined
//! slope so callers get the state derivative for free.

use ndarray::Array2;

use dipc_types::error::Result;
use dipc_types::state::PlantState;

/// One RK4 step of `ẋ = f(x, u)` with constant input over the step.
pub fn rk4_step<F>(f: F, x: PlantState, u: f64, dt: f64) -> Result<(PlantState, PlantState)>
where
    F: Fn(PlantState, f64) -> Result<PlantState>,
{
    let k1 = f(x, u)?;
    let k2 = f(x.axpy(0.5 * dt, k1), u)?;
    let k3 = f(x.axpy(0.5 * dt, k2), u)?;
    let k4 = f(x.axpy(dt, k3), u)?;

    let dx = PlantState([
        (k1.0[0] + 2.0 * k2.0[0] + 2.0 * k3.0[0] + k4.0[0]) / 6.0,
        (k1.0[1] + 2.0 * k2.0[1] + 2.0 * k3.0[1] + k4.0[1]) / 6.0,
        (k1.0[2] + 2.0 * k2.0[2] + 2.0 * k3.0[2] + k4.0[2]) / 6.0,
        (k1.0[3] + 2.0 * k2.0[3] + 2.0 * k3.0[3] + k4.0[3]) / 6.0,
    ]);

    Ok((x.axpy(dt, dx), dx))
}

/// RK4 step for matrix-valued autonomous ODEs `Ṗ = f(P)`; used by the
/// differential-Riccati integration.
pub fn rk4_step_matrix<F>(f: F, p: &Array2<f64>, h: f64) -> Array2<f64>
where
    F: Fn(&Array2<f64>) -> Array2<f64>,
{
    let k1 = f(p);
    let k2 = f(&(p + &(&k1 * (0.5 * h))));
    let k3 = f(&(p + &(&k2 * (0.5 * h))));
    let k4 = f(&(p + &(&k3 * h)));
    p + &((k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_dynamics_is_idempotent() {
        let x = PlantState::new(0.3, -0.2, 1.0, -1.0);
        for dt in [1e-4, 0.01, 0.5, -0.01] {
            let (next, dx) = rk4_step(|_, _| Ok(PlantState::ZERO), x, 0.0, dt).unwrap();
            assert_eq!(next, x);
            assert_eq!(dx, PlantState::ZERO);
        }
    }

    #[test]
    fn test_exact_on_constant_slope() {
        let (next, dx) = rk4_step(
            |_, u| Ok(PlantState::new(u, 0.0, 0.0, 0.0)),
            PlantState::ZERO,
            2.0,
            0.25,
        )
        .unwrap();
        assert!((next.phi1() - 0.5).abs() < 1e-15);
        assert!((dx.phi1() - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_harmonic_oscillator_accuracy() {
        // φ̈ = −φ from φ(0)=1: φ(t) = cos t.
        let f = |x: PlantState, _u: f64| Ok(PlantState::new(x.dphi1(), 0.0, -x.phi1(), 0.0));
        let mut x = PlantState::new(1.0, 0.0, 0.0, 0.0);
        let dt = 0.01;
        for _ in 0..100 {
            x = rk4_step(f, x, 0.0, dt).unwrap().0;
        }
        assert!((x.phi1() - 1.0_f64.cos()).abs() < 1e-9);
    }

    #[test]
    fn test_determinism() {
        let f = |x: PlantState, u: f64| {
            Ok(PlantState::new(x.dphi1(), 0.0, u - x.phi1().sin(), 0.0))
        };
        let x = PlantState::new(0.1, 0.0, -0.3, 0.0);
        let a = rk4_step(f, x, 0.7, 0.013).unwrap();
        let b = rk4_step(f, x, 0.7, 0.013).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_matrix_step_scalar_exponential() {
        // Ṗ = P from P(0)=1: P(h) = eʰ.
        let p = array![[1.0]];
        let next = rk4_step_matrix(|p| p.clone(), &p, 0.1);
        assert!((next[[0, 0]] - 0.1_f64.exp()).abs() < 1e-8);
    }
}
