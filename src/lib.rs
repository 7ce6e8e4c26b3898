// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Workspace Facade
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Delay-aware simulation and controller synthesis for the single and
//! double inverted pendulum on a cart.
//!
//! One roof over the member crates:
//! - [`types`]: shared config, state and error types
//! - [`math`]: plant dynamics, RK4, dense linear algebra
//! - [`sim`]: delay line, closed-loop runs, gain-space search, ranking
//! - [`control`]: delay-augmented pole placement / LQR / H-infinity

pub use dipc_control as control;
pub use dipc_math as math;
pub use dipc_sim as sim;
pub use dipc_types as types;
