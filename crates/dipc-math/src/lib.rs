// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Numerical Kernels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
pub mod eig;
pub mod linalg;
pub mod plant;
pub mod rk4;
