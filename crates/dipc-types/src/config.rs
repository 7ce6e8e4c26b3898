// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Configuration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Serde-backed configuration records. Every struct validates itself
//! before any simulation or synthesis work is scheduled.

use serde::{Deserialize, Serialize};

use crate::constants::GRAVITY_M_S2;
use crate::error::{ControlError, Result};

/// Rod geometry and mass distribution. A missing or zero second rod
/// selects the single-pendulum model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub rod_a_length_m: f64,
    pub rod_b_length_m: Option<f64>,
    /// Linear mass density of rod A [kg/m].
    pub rod_a_density_kg_m: f64,
    pub rod_b_density_kg_m: f64,
    pub gravity_m_s2: f64,
}

impl GeometryConfig {
    pub fn single(rod_a_length_m: f64, rod_a_density_kg_m: f64) -> Self {
        Self {
            rod_a_length_m,
            rod_b_length_m: None,
            rod_a_density_kg_m,
            rod_b_density_kg_m: 0.0,
            gravity_m_s2: GRAVITY_M_S2,
        }
    }

    pub fn double(
        rod_a_length_m: f64,
        rod_b_length_m: f64,
        rod_a_density_kg_m: f64,
        rod_b_density_kg_m: f64,
    ) -> Self {
        Self {
            rod_a_length_m,
            rod_b_length_m: Some(rod_b_length_m),
            rod_a_density_kg_m,
            rod_b_density_kg_m,
            gravity_m_s2: GRAVITY_M_S2,
        }
    }

    pub fn is_double(&self) -> bool {
        matches!(self.rod_b_length_m, Some(l) if l > 0.0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rod_a_length_m <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "rod A length must be positive".into(),
            ));
        }
        if self.rod_a_density_kg_m <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "rod A density must be positive".into(),
            ));
        }
        if self.is_double() && self.rod_b_density_kg_m <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "rod B density must be positive for the double pendulum".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one gain-space sweep needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub kp_range: Vec<f64>,
    pub kd_range: Vec<f64>,
    /// Actuation delay [s]; quantized to `round(delay / sample_period)`
    /// frames by the simulator.
    pub delay_s: f64,
    pub sample_period_s: f64,
    pub run_time_s: f64,
    pub max_angle_rad: f64,
    /// Worker pool size; one chunk of `ceil(total/workers)` candidates
    /// per worker.
    pub workers: usize,
    /// Base seed for the per-candidate jitter streams.
    pub seed: u64,
}

impl SearchConfig {
    pub fn grid_len(&self) -> usize {
        self.kp_range.len() * self.kd_range.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.kp_range.is_empty() || self.kd_range.is_empty() {
            return Err(ControlError::InvalidConfig(
                "gain ranges must be non-empty".into(),
            ));
        }
        if self.sample_period_s <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "sample period must be positive".into(),
            ));
        }
        if self.run_time_s <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "run time must be positive".into(),
            ));
        }
        if self.delay_s < 0.0 {
            return Err(ControlError::InvalidConfig(
                "delay must be non-negative".into(),
            ));
        }
        if self.max_angle_rad <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "max angle must be positive".into(),
            ));
        }
        if self.workers == 0 {
            return Err(ControlError::InvalidConfig(
                "worker pool must have at least one thread".into(),
            ));
        }
        Ok(())
    }
}

/// LQR weighting: diagonal state cost plus scalar input cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LqrWeights {
    pub q_diag: [f64; 4],
    pub r: f64,
}

impl Default for LqrWeights {
    fn default() -> Self {
        Self {
            q_diag: [1.0; 4],
            r: 1.0,
        }
    }
}
