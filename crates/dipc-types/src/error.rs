// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Error Taxonomy
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Workspace-wide error type.
//!
//! Synthesis-time errors abort the requesting call. Per-run simulation
//! errors never propagate out of the sweep; the closed loop captures
//! them as a faulted run record instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    /// Dynamics denominator `s = c3²·cos²(Δφ) − c1·c2` too close to zero.
    #[error("dynamics denominator is near-singular (s = {denominator:.3e})")]
    IllConditioned { denominator: f64 },

    #[error("state left the finite range at t = {elapsed_s:.3} s")]
    NonFiniteState { elapsed_s: f64 },

    #[error("augmented pair is uncontrollable (rank {rank} < {dim})")]
    NotControllable { rank: usize, dim: usize },

    #[error("{name} must be positive semi-definite (min eigenvalue {eigenvalue:.3e})")]
    NotPositiveSemiDefinite { name: &'static str, eigenvalue: f64 },

    #[error("{name} must be positive definite (min eigenvalue {eigenvalue:.3e})")]
    NotPositiveDefinite { name: &'static str, eigenvalue: f64 },

    #[error("Riccati iteration stalled after {iterations} steps (residual {residual:.3e})")]
    RiccatiDiverged { iterations: usize, residual: f64 },

    #[error("gamma = {gamma} is infeasible for the H-infinity central gain")]
    GammaInfeasible { gamma: f64 },

    #[error("eigenvalue iteration failed to deflate within {iterations} sweeps")]
    EigenFailure { iterations: usize },

    #[error("matrix is singular to working precision")]
    Singular,

    #[error("desired poles must close under complex conjugation")]
    PolesNotConjugate,

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot I/O failed: {0}")]
    Snapshot(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    SnapshotEncoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ControlError>;
