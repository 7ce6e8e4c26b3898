// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Gain-Space Search Scheduler
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Embarrassingly parallel sweep over the `(Kp, Kd)` grid. Candidates
//! are enumerated row-major, partitioned into contiguous chunks of
//! `ceil(total/workers)` and fanned out on a dedicated rayon pool; each
//! worker owns its plant constants, delay line and rng. Result order is
//! unspecified; ranking restores determinism downstream. A faulted run
//! is recorded, never allowed to take down the sweep.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use dipc_math::plant::PlantModel;
use dipc_types::config::SearchConfig;
use dipc_types::error::{ControlError, Result};
use dipc_types::state::{GainPair, PlantState, RunRecord};

use crate::closed_loop::{simulate_run, ControlLaw, SimSettings};

const PROGRESS_STRIDE: usize = 64;

/// One grid cell; identity is the gain pair plus its row-major index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainCandidate {
    pub index: usize,
    pub gains: GainPair,
}

/// Row-major Cartesian product of the two gain ranges, deterministic
/// enumeration order.
pub fn enumerate_grid(kp_range: &[f64], kd_range: &[f64]) -> Vec<GainCandidate> {
    let mut out = Vec::with_capacity(kp_range.len() * kd_range.len());
    let mut index = 0;
    for &kp in kp_range {
        for &kd in kd_range {
            out.push(GainCandidate {
                index,
                gains: GainPair { kp, kd },
            });
            index += 1;
        }
    }
    out
}

/// Evaluate every `(Kp, Kd)` combination with the closed-loop
/// simulator. Returns exactly `grid_len` records in unspecified order.
pub fn run_grid_search(
    model: &PlantModel,
    x0: PlantState,
    cfg: &SearchConfig,
) -> Result<Vec<RunRecord>> {
    cfg.validate()?;

    let candidates = enumerate_grid(&cfg.kp_range, &cfg.kd_range);
    let total = candidates.len();
    let chunk = total.div_ceil(cfg.workers);
    let settings = SimSettings::from_search(cfg);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .build()
        .map_err(|e| ControlError::InvalidConfig(format!("worker pool: {e}")))?;

    tracing::info!(total, workers = cfg.workers, "evaluating gain combinations");

    let done = AtomicUsize::new(0);
    let records: Vec<RunRecord> = pool.install(|| {
        candidates
            .par_chunks(chunk)
            .flat_map_iter(|chunk| {
                chunk.iter().map(|cand| {
                    let mut rng = StdRng::seed_from_u64(cfg.seed.wrapping_add(cand.index as u64));
                    let law = ControlLaw::Pd {
                        kp: cand.gains.kp,
                        kd: cand.gains.kd,
                    };
                    let run = simulate_run(model, &law, x0, &settings, &mut rng);
                    // Approximate under concurrency; progress only.
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if finished % PROGRESS_STRIDE == 0 {
                        tracing::debug!(finished, total, "grid search progress");
                    }
                    RunRecord {
                        index: cand.index,
                        gains: cand.gains,
                        elapsed_s: run.elapsed_s,
                        outcome: run.outcome,
                        trace: run.trace,
                    }
                })
            })
            .collect()
    });

    tracing::info!(
        completed = records.iter().filter(|r| r.outcome.completed()).count(),
        total,
        "grid search finished"
    );
    Ok(records)
}
