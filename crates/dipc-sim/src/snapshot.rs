// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Result Snapshot Adapter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Durable snapshot of a ranked result set, keyed by run title. One
//! opaque JSON blob per sweep; loading restores a structure per-field
//! equal to what was saved. Strictly post-computation; nothing here is
//! on a simulation hot path.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use dipc_types::error::Result;

use crate::ranking::RankedRuns;

fn snapshot_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{title}.json"))
}

/// Write the full ranked set (traces included) under `dir/title.json`.
pub fn save_runs(dir: &Path, title: &str, runs: &RankedRuns) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = snapshot_path(dir, title);
    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(file, runs)?;
    tracing::info!(path = %path.display(), runs = runs.len(), "snapshot saved");
    Ok(path)
}

pub fn load_runs(dir: &Path, title: &str) -> Result<RankedRuns> {
    let path = snapshot_path(dir, title);
    let file = BufReader::new(File::open(&path)?);
    let runs = serde_json::from_reader(file)?;
    tracing::info!(path = %path.display(), "snapshot loaded");
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_runs;
    use dipc_types::state::{GainPair, PlantState, RunOutcome, RunRecord, TraceSample};

    fn sample_runs() -> RankedRuns {
        let records = (0..3)
            .map(|i| RunRecord {
                index: i,
                gains: GainPair {
                    kp: 5.0 + i as f64,
                    kd: 0.5 * i as f64,
                },
                elapsed_s: 0.04,
                outcome: if i == 2 {
                    RunOutcome::Diverged
                } else {
                    RunOutcome::Completed
                },
                trace: (0..4)
                    .map(|t| TraceSample {
                        state: PlantState::new(0.01 * (i as f64 + 1.0), 0.0, -0.1, 0.0),
                        derivative: PlantState::new(-0.1, 0.0, 0.2, 0.0),
                        applied_input: 0.3,
                        cart_force: 1.25,
                        elapsed_s: (t + 1) as f64 * 0.01,
                    })
                    .collect(),
            })
            .collect();
        rank_runs(records)
    }

    fn unique_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dipc_snapshot_{tag}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_roundtrip_is_field_equal() {
        let dir = unique_dir("roundtrip");
        let runs = sample_runs();
        save_runs(&dir, "M_1_bench", &runs).unwrap();
        let loaded = load_runs(&dir, "M_1_bench").unwrap();
        assert_eq!(runs, loaded);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let dir = unique_dir("missing");
        assert!(load_runs(&dir, "nope").is_err());
    }

    #[test]
    fn test_titles_key_separate_blobs() {
        let dir = unique_dir("titles");
        let runs = sample_runs();
        let p1 = save_runs(&dir, "M_1", &runs).unwrap();
        let p2 = save_runs(&dir, "M_3", &runs).unwrap();
        assert_ne!(p1, p2);
        assert!(p1.exists() && p2.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
