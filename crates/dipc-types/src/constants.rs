// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Physical Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────

/// Standard gravity [m/s²].
pub const GRAVITY_M_S2: f64 = 9.81;

/// Half-width of the uniform sampling jitter [s], measured spread of the
/// ~60 Hz input clock on the reference rig.
pub const SAMPLE_JITTER_S: f64 = 5.947_888_710_060_88e-4;

/// Magnitude below which the double-rod dynamics denominator counts as
/// singular.
pub const DENOM_EPS: f64 = 1e-9;

pub const DEG_TO_RAD: f64 = 0.017_453_292_52;
