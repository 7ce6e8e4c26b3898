// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Pendulum-on-Cart Plant Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Nonlinear equations of motion for the single and double inverted
//! pendulum on a cart, driven by the cart acceleration `u = q̈`.
//!
//! Angles are measured from the upright position. The double-rod model
//! is the matrix decomposition `ẋ = A(x)·x + B(x)·u + L(x)` with a
//! denominator `s = c3²·cos²(φ1−φ2) − c1·c2` that is singular only for
//! non-physical constants; a near-zero `s` is reported, never clamped.

use ndarray::{array, Array2};

use dipc_types::config::GeometryConfig;
use dipc_types::constants::DENOM_EPS;
use dipc_types::error::{ControlError, Result};
use dipc_types::state::PlantState;

/// Derived constants of the single-rod model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleRodConstants {
    pub c1: f64,
    pub c2: f64,
    pub m1: f64,
    pub l1: f64,
    pub g: f64,
}

impl SingleRodConstants {
    pub fn from_geometry(rho: f64, l1: f64, g: f64) -> Self {
        let c1 = 3.0 / (2.0 * l1);
        Self {
            c1,
            c2: g * c1,
            m1: l1 * rho,
            l1,
            g,
        }
    }
}

/// Derived constants of the double-rod model. Fields are public so that
/// degenerate (ill-conditioned) instances can be constructed directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleRodConstants {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub c5: f64,
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
    pub g: f64,
}

impl DoubleRodConstants {
    pub fn from_geometry(rho1: f64, rho2: f64, l1: f64, l2: f64, g: f64) -> Self {
        let m1 = l1 * rho1;
        let m2 = l2 * rho2;
        // Rod inertias about their centers of mass.
        let i_s1 = m1 * l1 * l1 / 12.0;
        let i_s2 = m2 * l2 * l2 / 12.0;
        Self {
            c1: i_s1 + l1 * l1 * (m1 / 4.0 + m2),
            c2: i_s2 + l2 * l2 * (m2 / 4.0),
            c3: l1 * l2 * m2 / 2.0,
            c4: -g * l1 * (m1 / 2.0 + m2),
            c5: -g * l2 * m2 / 2.0,
            m1,
            m2,
            l1,
            l2,
            g,
        }
    }
}

/// Single- or double-rod plant. Selection is by whether the geometry
/// carries a second rod of nonzero length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlantModel {
    Single(SingleRodConstants),
    Double(DoubleRodConstants),
}

impl PlantModel {
    pub fn from_geometry(geometry: &GeometryConfig) -> Result<Self> {
        geometry.validate()?;
        if geometry.is_double() {
            Ok(PlantModel::Double(DoubleRodConstants::from_geometry(
                geometry.rod_a_density_kg_m,
                geometry.rod_b_density_kg_m,
                geometry.rod_a_length_m,
                geometry.rod_b_length_m.unwrap_or(0.0),
                geometry.gravity_m_s2,
            )))
        } else {
            Ok(PlantModel::Single(SingleRodConstants::from_geometry(
                geometry.rod_a_density_kg_m,
                geometry.rod_a_length_m,
                geometry.gravity_m_s2,
            )))
        }
    }

    pub fn is_double(&self) -> bool {
        matches!(self, PlantModel::Double(_))
    }

    /// State derivative for cart acceleration `u`.
    pub fn derivative(&self, x: PlantState, u: f64) -> Result<PlantState> {
        match self {
            PlantModel::Single(c) => {
                let ddphi1 = c.c1 * u * x.phi1().cos() + c.c2 * x.phi1().sin();
                Ok(PlantState::new(x.dphi1(), x.dphi2(), ddphi1, 0.0))
            }
            PlantModel::Double(c) => {
                let (x1, x2) = x.phi1().sin_cos();
                let (x3, x4) = x.phi2().sin_cos();
                let (x5, x6) = (x.phi1() - x.phi2()).sin_cos();
                let (dphi1, dphi2) = (x.dphi1(), x.dphi2());

                let s = c.c3 * c.c3 * x6 * x6 - c.c1 * c.c2;
                if s.abs() < DENOM_EPS {
                    return Err(ControlError::IllConditioned { denominator: s });
                }

                let b2 = -(c.c2 * c.l1 * c.m1 * x2 + 2.0 * c.c2 * c.l1 * c.m2 * x2
                    - c.c3 * c.l2 * c.m2 * x4 * x6)
                    / (2.0 * s);
                let b3 = (c.c3 * c.l1 * c.m1 * x2 * x6 - c.c1 * c.l2 * c.m2 * x4
                    + 2.0 * c.c3 * c.l1 * c.m2 * x2 * x6)
                    / (2.0 * s);
                let l2 = (c.c2 * c.c4 * x1 - c.c3 * c.c5 * x3 * x6) / s;
                let l3 = (c.c1 * c.c5 * x3 - c.c3 * c.c4 * x1 * x6) / s;

                let ddphi1 = dphi1 * dphi1 * c.c3 * c.c3 * x6 * x5 / s
                    + dphi2 * dphi2 * c.c2 * c.c3 * x5 / s
                    + b2 * u
                    + l2;
                let ddphi2 = -dphi1 * dphi1 * c.c1 * c.c3 * x5 / s
                    - dphi2 * dphi2 * c.c3 * c.c3 * x6 * x5 / s
                    + b3 * u
                    + l3;

                Ok(PlantState::new(dphi1, dphi2, ddphi1, ddphi2))
            }
        }
    }

    /// Horizontal force the cart must exert to realize acceleration
    /// `ddq` at the given state and state derivative.
    pub fn cart_force(&self, x: PlantState, dx: PlantState, ddq: f64) -> f64 {
        match self {
            PlantModel::Single(c) => {
                let (sin1, cos1) = x.phi1().sin_cos();
                c.m1 * ddq + x.dphi1() * x.dphi1() * c.l1 * c.m1 * sin1 / 2.0
                    - dx.dphi1() * c.l1 * c.m1 * cos1 / 2.0
            }
            PlantModel::Double(c) => {
                let (sin1, cos1) = x.phi1().sin_cos();
                let (sin2, cos2) = x.phi2().sin_cos();
                (c.m1 + c.m2) * ddq
                    - (c.l1 * cos1 * (c.m1 + 2.0 * c.m2)) / 2.0 * dx.dphi1()
                    - (c.l2 * c.m2 * cos2) / 2.0 * dx.dphi2()
                    + (c.l1 * sin1 * (c.m1 + 2.0 * c.m2)) / 2.0 * x.dphi1() * x.dphi1()
                    + (c.l2 * c.m2 * sin2) / 2.0 * x.dphi2() * x.dphi2()
            }
        }
    }

    /// Continuous `(A, B)` linearized about the upright equilibrium.
    /// Defined for the double-rod model only.
    pub fn linearize(&self) -> Option<(Array2<f64>, Array2<f64>)> {
        match self {
            PlantModel::Single(_) => None,
            PlantModel::Double(c) => {
                let s1 = c.c3 * c.c3 - c.c1 * c.c2;
                let a = array![
                    [0.0, 0.0, 1.0, 0.0],
                    [0.0, 0.0, 0.0, 1.0],
                    [c.c2 * c.c4 / s1, -c.c3 * c.c5 / s1, 0.0, 0.0],
                    [-c.c3 * c.c4 / s1, c.c1 * c.c5 / s1, 0.0, 0.0],
                ];
                let b = array![
                    [0.0],
                    [0.0],
                    [-(c.c2 * c.l1 * c.m1 + 2.0 * c.c2 * c.l1 * c.m2 - c.c3 * c.l2 * c.m2)
                        / (2.0 * s1)],
                    [(c.c3 * c.l1 * c.m1 - c.c1 * c.l2 * c.m2 + 2.0 * c.c3 * c.l1 * c.m2)
                        / (2.0 * s1)],
                ];
                Some((a, b))
            }
        }
    }
}
