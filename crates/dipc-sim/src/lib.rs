// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Closed-Loop Simulation & Gain Search
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
pub mod closed_loop;
pub mod delay;
pub mod ranking;
pub mod search;
pub mod snapshot;
