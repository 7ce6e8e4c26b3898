// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Closed-Loop Simulator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Forward simulation of plant + integrator + delay line + feedback
//! law. Each tick: divergence test, control law, delay push/pop, one
//! RK4 step with a jittered period, trace append. Runs end `Completed`,
//! `Diverged` (the angle bound is an ordinary classification) or
//! `Faulted` (numerical failure isolated to this run).

use rand::rngs::StdRng;
use rand::Rng;

use dipc_math::plant::PlantModel;
use dipc_math::rk4::rk4_step;
use dipc_types::config::SearchConfig;
use dipc_types::constants::SAMPLE_JITTER_S;
use dipc_types::error::ControlError;
use dipc_types::state::{GainVector, PlantState, RunOutcome, TraceSample};

use crate::delay::DelayLine;

/// Feedback law evaluated on the *current* (undelayed) state; the delay
/// line lags what the plant actually receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlLaw {
    /// `u = −(Kp·φ1 + Kd·dφ1)`, the grid-search law.
    Pd { kp: f64, kd: f64 },
    /// `u = −K·x` with a synthesized 4-gain vector.
    StateFeedback(GainVector),
}

impl ControlLaw {
    #[inline]
    pub fn command(&self, x: &PlantState) -> f64 {
        match self {
            ControlLaw::Pd { kp, kd } => -(kp * x.phi1() + kd * x.dphi1()),
            ControlLaw::StateFeedback(k) => k.command(x),
        }
    }
}

/// Per-run parameters of one closed-loop simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    pub sample_period_s: f64,
    pub run_time_s: f64,
    pub max_angle_rad: f64,
    pub delay_s: f64,
    /// Half-width of the uniform step-size jitter; zero disables it.
    pub jitter_s: f64,
}

impl SimSettings {
    pub fn from_search(cfg: &SearchConfig) -> Self {
        Self {
            sample_period_s: cfg.sample_period_s,
            run_time_s: cfg.run_time_s,
            max_angle_rad: cfg.max_angle_rad,
            delay_s: cfg.delay_s,
            jitter_s: SAMPLE_JITTER_S,
        }
    }

    pub fn ticks(&self) -> usize {
        (self.run_time_s / self.sample_period_s).round() as usize
    }

    /// Delay expressed in whole sample frames.
    pub fn delay_steps(&self) -> usize {
        (self.delay_s / self.sample_period_s).round() as usize
    }
}

/// Outcome of one forward simulation; gains and enumeration index are
/// attached by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedLoopRun {
    pub outcome: RunOutcome,
    pub elapsed_s: f64,
    pub trace: Vec<TraceSample>,
}

pub fn simulate_run(
    model: &PlantModel,
    law: &ControlLaw,
    x0: PlantState,
    settings: &SimSettings,
    rng: &mut StdRng,
) -> ClosedLoopRun {
    let ticks = settings.ticks();
    let ts = settings.sample_period_s;
    let jitter = settings.jitter_s;
    let mut delay = DelayLine::new(settings.delay_steps());

    let mut x = x0;
    let mut elapsed = 0.0;
    let mut trace = Vec::with_capacity(ticks);
    let mut outcome = RunOutcome::Completed;

    for _ in 0..ticks {
        if x.phi1().abs() > settings.max_angle_rad {
            outcome = RunOutcome::Diverged;
            break;
        }

        let computed = law.command(&x);
        let applied = delay.push(computed);

        let dt = if jitter > 0.0 {
            rng.gen_range(ts - jitter..=ts + jitter)
        } else {
            ts
        };

        match rk4_step(|x, u| model.derivative(x, u), x, applied, dt) {
            Ok((next, dx)) if next.is_finite() => {
                elapsed += dt;
                let cart_force = model.cart_force(next, dx, applied);
                trace.push(TraceSample {
                    state: next,
                    derivative: dx,
                    applied_input: applied,
                    cart_force,
                    elapsed_s: elapsed,
                });
                x = next;
            }
            Ok(_) => {
                outcome = RunOutcome::Faulted(
                    ControlError::NonFiniteState { elapsed_s: elapsed }.to_string(),
                );
                break;
            }
            Err(e) => {
                outcome = RunOutcome::Faulted(e.to_string());
                break;
            }
        }
    }

    ClosedLoopRun {
        outcome,
        elapsed_s: elapsed,
        trace,
    }
}
