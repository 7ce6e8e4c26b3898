// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Online Synthesis Front End
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Geometry-tracking synthesis for the real-time loop: holds the
//! linearized plant, recomputes it whenever a rod changes, and
//! dispatches on a tagged method variant (each carrying only the
//! parameters it needs) to produce a 4-gain vector plus the
//! diagnostic report consumed by the external display.

use std::f64::consts::TAU;
use std::fmt;

use ndarray::{array, Array2};
use num_complex::Complex64;

use dipc_math::eig::eigenvalues;
use dipc_math::plant::PlantModel;
use dipc_types::config::{GeometryConfig, LqrWeights};
use dipc_types::error::{ControlError, Result};
use dipc_types::state::GainVector;

use crate::augment::AugmentedStateSpace;
use crate::discretize::{delay_steps, zoh_discretize};
use crate::h_infinity::{h_infinity_continuous, h_infinity_discrete};
use crate::lqr::dlqr_delay;
use crate::pole_place::{controllability_rank, place_poles};
use crate::riccati::{CareOptions, DareOptions};

/// How to compute the feedback gain. One variant per method, each with
/// only its own parameters.
#[derive(Debug, Clone)]
pub enum SynthesisMethod {
    /// Place the delay-augmented discrete spectrum; pole count must
    /// equal the augmented dimension.
    PolePlacement { poles: Vec<Complex64> },
    /// Delay-compensated discrete LQR.
    Lqr { weights: LqrWeights },
    /// Riccati H-infinity with performance bound `gamma`; `discrete`
    /// folds the delay in, the continuous form ignores it.
    HInfinity { gamma: f64, discrete: bool },
    /// Operator-supplied gains, passed through unchanged.
    Custom { gains: GainVector },
}

impl SynthesisMethod {
    fn name(&self) -> &'static str {
        match self {
            SynthesisMethod::PolePlacement { .. } => "pole_placement",
            SynthesisMethod::Lqr { .. } => "lqr",
            SynthesisMethod::HInfinity { .. } => "h_inf",
            SynthesisMethod::Custom { .. } => "custom",
        }
    }
}

/// Diagnostic bundle of one synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisReport {
    pub method: &'static str,
    pub gain: GainVector,
    pub plant_eigenvalues: Vec<Complex64>,
    pub natural_frequencies_hz: Vec<f64>,
    pub dominant_frequency_hz: f64,
    pub controllability_rank: usize,
    pub delay_steps: usize,
    pub desired_poles: Option<Vec<Complex64>>,
    pub riccati: Option<Array2<f64>>,
    pub gamma: Option<f64>,
}

impl fmt::Display for SynthesisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "================ SYSTEM ANALYSIS REPORT ================")?;
        writeln!(f, "  method           : {}", self.method)?;
        writeln!(f, "  gain             : {:?}", self.gain.as_slice())?;
        writeln!(f, "  plant eigenvalues:")?;
        for e in &self.plant_eigenvalues {
            writeln!(f, "    {:+.4} {:+.4}i", e.re, e.im)?;
        }
        writeln!(
            f,
            "  dominant frequency: {:.4} Hz",
            self.dominant_frequency_hz
        )?;
        writeln!(f, "  controllability rank: {}", self.controllability_rank)?;
        writeln!(f, "  delay steps      : {}", self.delay_steps)?;
        if let Some(poles) = &self.desired_poles {
            writeln!(f, "  desired poles    : {poles:?}")?;
        }
        if let Some(p) = &self.riccati {
            writeln!(f, "  Riccati solution : {}x{}", p.nrows(), p.ncols())?;
        }
        if let Some(g) = self.gamma {
            writeln!(f, "  gamma            : {g}")?;
        }
        write!(f, "========================================================")
    }
}

/// Performance weights on (φ1, φ2) for the discrete H-infinity design.
fn h_inf_output_weights() -> Array2<f64> {
    array![[0.01, 0.0, 0.0, 0.0], [0.0, 0.001, 0.0, 0.0]]
}

/// Linearized delayed plant plus the sampling setup; the synthesis
/// entry point for the real-time loop.
#[derive(Debug, Clone)]
pub struct DelayedPlantDesign {
    model: PlantModel,
    a_lin: Array2<f64>,
    b_lin: Array2<f64>,
    sample_period_s: f64,
    delay_s: f64,
}

impl DelayedPlantDesign {
    pub fn new(geometry: &GeometryConfig, sample_period_s: f64, delay_s: f64) -> Result<Self> {
        if sample_period_s <= 0.0 {
            return Err(ControlError::InvalidConfig(
                "sample period must be positive".into(),
            ));
        }
        if delay_s < 0.0 {
            return Err(ControlError::InvalidConfig(
                "delay must be non-negative".into(),
            ));
        }
        let model = PlantModel::from_geometry(geometry)?;
        let (a_lin, b_lin) = model.linearize().ok_or_else(|| {
            ControlError::InvalidConfig(
                "gain synthesis is defined for the double-pendulum model only".into(),
            )
        })?;
        Ok(Self {
            model,
            a_lin,
            b_lin,
            sample_period_s,
            delay_s,
        })
    }

    /// Rebuild constants and linearization after a rod change.
    pub fn update_geometry(&mut self, geometry: &GeometryConfig) -> Result<()> {
        let next = Self::new(geometry, self.sample_period_s, self.delay_s)?;
        *self = next;
        Ok(())
    }

    pub fn model(&self) -> &PlantModel {
        &self.model
    }

    /// Continuous `(A, B)` currently in effect.
    pub fn matrices(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.a_lin, &self.b_lin)
    }

    pub fn delay_steps(&self) -> Result<usize> {
        delay_steps(self.delay_s, self.sample_period_s)
    }

    /// Compute the feedback gain with the selected method and bundle
    /// the diagnostics. Errors abort the call; nothing is cached.
    pub fn synthesize(&self, method: &SynthesisMethod) -> Result<SynthesisReport> {
        let plant_eigenvalues = eigenvalues(&self.a_lin)?;
        let natural_frequencies_hz: Vec<f64> =
            plant_eigenvalues.iter().map(|e| e.im / TAU).collect();
        let dominant_frequency_hz = natural_frequencies_hz
            .iter()
            .cloned()
            .fold(0.0, f64::max);
        let ctrb_rank = controllability_rank(&self.a_lin, &self.b_lin)?;
        let steps = self.delay_steps()?;

        let mut report = SynthesisReport {
            method: method.name(),
            gain: GainVector([0.0; 4]),
            plant_eigenvalues,
            natural_frequencies_hz,
            dominant_frequency_hz,
            controllability_rank: ctrb_rank,
            delay_steps: steps,
            desired_poles: None,
            riccati: None,
            gamma: None,
        };

        match method {
            SynthesisMethod::PolePlacement { poles } => {
                let (a_d, b_d) =
                    zoh_discretize(&self.a_lin, &self.b_lin, self.sample_period_s)?;
                let aug = AugmentedStateSpace::build(&a_d, &b_d, steps)?;
                if poles.len() != aug.dim() {
                    return Err(ControlError::DimensionMismatch(format!(
                        "{} poles for the {}-state augmented system",
                        poles.len(),
                        aug.dim()
                    )));
                }
                let placed = place_poles(&aug.a, &aug.b, poles)?;
                let physical = aug.slice_physical(&placed.gain)?;
                report.gain = to_gain_vector(&physical)?;
                report.desired_poles = Some(poles.clone());
            }
            SynthesisMethod::Lqr { weights } => {
                let q = Array2::from_diag(&ndarray::arr1(&weights.q_diag));
                let r = array![[weights.r]];
                let design = dlqr_delay(
                    &self.a_lin,
                    &self.b_lin,
                    &q,
                    &r,
                    self.sample_period_s,
                    self.delay_s,
                    &DareOptions::default(),
                )?;
                report.gain = design.gain_vector().ok_or_else(|| {
                    ControlError::DimensionMismatch("expected a 1x4 physical gain".into())
                })?;
                report.riccati = Some(design.riccati);
            }
            SynthesisMethod::HInfinity { gamma, discrete } => {
                let design = if *discrete {
                    h_infinity_discrete(
                        &self.a_lin,
                        &self.b_lin,
                        &h_inf_output_weights(),
                        *gamma,
                        self.sample_period_s,
                        self.delay_s,
                        &DareOptions::default(),
                    )?
                } else {
                    h_infinity_continuous(
                        &self.a_lin,
                        &self.b_lin,
                        &Array2::eye(4),
                        *gamma,
                        &CareOptions::default(),
                    )?
                };
                report.gain = design.gain_vector().ok_or_else(|| {
                    ControlError::DimensionMismatch("expected a 1x4 physical gain".into())
                })?;
                report.riccati = Some(design.riccati);
                report.gamma = Some(design.gamma);
            }
            SynthesisMethod::Custom { gains } => {
                report.gain = *gains;
            }
        }

        tracing::info!(method = report.method, "synthesis report\n{report}");
        Ok(report)
    }
}

fn to_gain_vector(physical: &Array2<f64>) -> Result<GainVector> {
    if physical.nrows() != 1 || physical.ncols() != 4 {
        return Err(ControlError::DimensionMismatch(format!(
            "physical gain is {}x{}, expected 1x4",
            physical.nrows(),
            physical.ncols()
        )));
    }
    let mut k = [0.0; 4];
    for (i, v) in physical.row(0).iter().enumerate() {
        k[i] = *v;
    }
    Ok(GainVector(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> GeometryConfig {
        GeometryConfig::double(3.0, 1.0, 1.0, 1.0)
    }

    #[test]
    fn test_single_pendulum_rejected() {
        let geometry = GeometryConfig::single(3.0, 1.0);
        assert!(DelayedPlantDesign::new(&geometry, 0.0167, 0.23).is_err());
    }

    #[test]
    fn test_plant_spectrum_is_saddle() {
        // Upright double pendulum: symmetric ±real eigenvalue pairs.
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.0).unwrap();
        let report = design
            .synthesize(&SynthesisMethod::Custom {
                gains: GainVector([0.0; 4]),
            })
            .unwrap();
        assert_eq!(report.plant_eigenvalues.len(), 4);
        let positives = report
            .plant_eigenvalues
            .iter()
            .filter(|e| e.re > 1e-6)
            .count();
        assert_eq!(positives, 2);
        assert_eq!(report.controllability_rank, 4);
    }

    #[test]
    fn test_pole_placement_hits_requested_spectrum() {
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.0).unwrap();
        let poles: Vec<Complex64> = [0.90, 0.88, 0.86, 0.84]
            .iter()
            .map(|&p| Complex64::new(p, 0.0))
            .collect();
        let report = design
            .synthesize(&SynthesisMethod::PolePlacement {
                poles: poles.clone(),
            })
            .unwrap();
        // Verify the closed discrete loop carries the requested poles.
        let (a, b) = design.matrices();
        let (a_d, b_d) = zoh_discretize(a, b, 1.0 / 60.0).unwrap();
        let k = ndarray::arr2(&[report.gain.0]);
        let a_cl = &a_d - &b_d.dot(&k);
        let achieved = eigenvalues(&a_cl).unwrap();
        for want in &poles {
            assert!(
                achieved.iter().any(|got| (got - want).norm() < 1e-4),
                "missing {want}, got {achieved:?}"
            );
        }
        assert_eq!(report.desired_poles.as_deref(), Some(poles.as_slice()));
    }

    #[test]
    fn test_pole_count_must_match_augmented_dim() {
        // Nonzero delay: four poles are too few for the augmented pair.
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.05).unwrap();
        let poles: Vec<Complex64> =
            (0..4).map(|i| Complex64::new(0.9 - 0.01 * i as f64, 0.0)).collect();
        assert!(matches!(
            design.synthesize(&SynthesisMethod::PolePlacement { poles }),
            Err(ControlError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_lqr_reports_riccati_solution() {
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.23).unwrap();
        let report = design
            .synthesize(&SynthesisMethod::Lqr {
                weights: LqrWeights::default(),
            })
            .unwrap();
        assert!(report.gain.as_slice().iter().all(|v| v.is_finite()));
        assert_eq!(report.delay_steps, 14);
        let p = report.riccati.as_ref().unwrap();
        // Augmented dimension 4 + 14.
        assert_eq!(p.nrows(), 18);
    }

    #[test]
    fn test_lqr_rejects_negative_state_cost() {
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.23).unwrap();
        let weights = LqrWeights {
            q_diag: [1.0, 1.0, -1.0, 1.0],
            r: 1.0,
        };
        assert!(matches!(
            design.synthesize(&SynthesisMethod::Lqr { weights }),
            Err(ControlError::NotPositiveSemiDefinite { .. })
        ));
    }

    #[test]
    fn test_h_inf_variants_produce_gains() {
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.23).unwrap();
        let continuous = design
            .synthesize(&SynthesisMethod::HInfinity {
                gamma: 1.0,
                discrete: false,
            })
            .unwrap();
        assert!(continuous.gain.as_slice().iter().all(|v| v.is_finite()));
        assert_eq!(continuous.gamma, Some(1.0));

        let discrete = design
            .synthesize(&SynthesisMethod::HInfinity {
                gamma: 1.0,
                discrete: true,
            })
            .unwrap();
        assert!(discrete.gain.as_slice().iter().all(|v| v.is_finite()));
        assert!(discrete.riccati.is_some());
    }

    #[test]
    fn test_update_geometry_recomputes_linearization() {
        let mut design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.23).unwrap();
        let a_before = design.matrices().0.clone();
        design
            .update_geometry(&GeometryConfig::double(5.0, 1.0, 1.0, 1.0))
            .unwrap();
        let a_after = design.matrices().0;
        assert_ne!(&a_before, a_after);
    }

    #[test]
    fn test_report_renders() {
        let design = DelayedPlantDesign::new(&rig(), 1.0 / 60.0, 0.0).unwrap();
        let report = design
            .synthesize(&SynthesisMethod::Custom {
                gains: GainVector([1.0, 2.0, 3.0, 4.0]),
            })
            .unwrap();
        let text = report.to_string();
        assert!(text.contains("SYSTEM ANALYSIS REPORT"));
        assert!(text.contains("controllability rank: 4"));
    }
}
