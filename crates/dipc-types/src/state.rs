// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Plant State & Run Records
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Plant state vector and the per-run record types shared between the
//! simulator, the grid search and the snapshot adapter.

use serde::{Deserialize, Serialize};

/// Generalized coordinates `[φ1, φ2, dφ1, dφ2]`.
///
/// The single-pendulum model uses slots 0 and 2 only; the unused slots
/// stay at zero. Replaced wholesale each integration step, never mutated
/// in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState(pub [f64; 4]);

impl PlantState {
    pub const ZERO: PlantState = PlantState([0.0; 4]);

    pub fn new(phi1: f64, phi2: f64, dphi1: f64, dphi2: f64) -> Self {
        Self([phi1, phi2, dphi1, dphi2])
    }

    #[inline]
    pub fn phi1(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn phi2(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn dphi1(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn dphi2(&self) -> f64 {
        self.0[3]
    }

    /// `self + h·k`, the RK4 stage update.
    #[inline]
    pub fn axpy(&self, h: f64, k: PlantState) -> PlantState {
        PlantState([
            self.0[0] + h * k.0[0],
            self.0[1] + h * k.0[1],
            self.0[2] + h * k.0[2],
            self.0[3] + h * k.0[3],
        ])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// One `(Kp, Kd)` candidate of the gain grid. Identity is the pair plus
/// its row-major enumeration index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainPair {
    pub kp: f64,
    pub kd: f64,
}

/// Full state-feedback gain over the four physical states, already
/// sliced out of any delay-augmented solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainVector(pub [f64; 4]);

impl GainVector {
    /// `u = −K·x`.
    #[inline]
    pub fn command(&self, x: &PlantState) -> f64 {
        -(self.0[0] * x.0[0] + self.0[1] * x.0[1] + self.0[2] * x.0[2] + self.0[3] * x.0[3])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// One tick of a closed-loop run: post-step state, its derivative, the
/// control actually applied (lagged), the recovered cart force and the
/// accumulated simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub state: PlantState,
    pub derivative: PlantState,
    pub applied_input: f64,
    pub cart_force: f64,
    pub elapsed_s: f64,
}

/// Terminal classification of a run.
///
/// `Diverged` is an ordinary outcome (the angle bound is the instability
/// classifier, not an error); `Faulted` records a numerical failure
/// isolated to this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    Diverged,
    Faulted(String),
}

impl RunOutcome {
    pub fn completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Outcome of one simulator invocation. Written once by the worker that
/// owns the run, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Row-major enumeration index; only used for progress reporting and
    /// stable tie-breaks in the ranking.
    pub index: usize,
    pub gains: GainPair,
    pub elapsed_s: f64,
    pub outcome: RunOutcome,
    pub trace: Vec<TraceSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpy() {
        let x = PlantState::new(1.0, 2.0, 3.0, 4.0);
        let k = PlantState::new(0.5, 0.5, 0.5, 0.5);
        let y = x.axpy(2.0, k);
        assert_eq!(y, PlantState::new(2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn test_gain_vector_command_sign() {
        let k = GainVector([1.0, 0.0, 2.0, 0.0]);
        let x = PlantState::new(0.1, 0.0, -0.2, 0.0);
        assert!((k.command(&x) - 0.3).abs() < 1e-15);
    }

    #[test]
    fn test_outcome_completed_flag() {
        assert!(RunOutcome::Completed.completed());
        assert!(!RunOutcome::Diverged.completed());
        assert!(!RunOutcome::Faulted("s near zero".into()).completed());
    }

    #[test]
    fn test_non_finite_state_detected() {
        let mut x = PlantState::ZERO;
        assert!(x.is_finite());
        x.0[2] = f64::NAN;
        assert!(!x.is_finite());
    }
}
