// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Delay-Augmented Controller Synthesis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
pub mod augment;
pub mod design;
pub mod discretize;
pub mod h_infinity;
pub mod lqr;
pub mod pole_place;
pub mod riccati;
