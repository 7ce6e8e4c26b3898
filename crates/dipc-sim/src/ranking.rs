// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Result Ranking & Summary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Scores each run by its mean squared first angle, stable-sorts
//! ascending (tighter excursion first) and projects a compact summary
//! table. Ties keep enumeration order, so the ranking is independent of
//! worker completion order.

use std::io::Write;

use serde::{Deserialize, Serialize};

use dipc_types::error::Result;
use dipc_types::state::{RunRecord, TraceSample};

/// One scored run; the full trace stays addressable by rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRun {
    pub record: RunRecord,
    /// `Σ φ1² / samples`; infinite for runs with an empty trace.
    pub mean_squared_angle: f64,
}

/// Ranked result set, ascending by metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRuns(Vec<ScoredRun>);

/// Compact projection of one run: everything the report table needs,
/// none of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub kp: f64,
    pub kd: f64,
    pub time_s: f64,
    pub completed: bool,
    pub mean_squared_angle: f64,
}

fn score(trace: &[TraceSample]) -> f64 {
    if trace.is_empty() {
        // A run that faulted before its first sample has no mean; it
        // ranks behind everything finite.
        return f64::INFINITY;
    }
    trace
        .iter()
        .map(|s| s.state.phi1() * s.state.phi1())
        .sum::<f64>()
        / trace.len() as f64
}

/// Score and sort a full sweep. Records arrive in arbitrary completion
/// order; enumeration order is restored first so the metric sort is
/// stable and total.
pub fn rank_runs(mut records: Vec<RunRecord>) -> RankedRuns {
    records.sort_by_key(|r| r.index);
    let mut scored: Vec<ScoredRun> = records
        .into_iter()
        .map(|record| {
            let mean_squared_angle = score(&record.trace);
            ScoredRun {
                record,
                mean_squared_angle,
            }
        })
        .collect();
    scored.sort_by(|a, b| a.mean_squared_angle.total_cmp(&b.mean_squared_angle));
    RankedRuns(scored)
}

impl RankedRuns {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full run at the given rank (0 = best).
    pub fn get(&self, rank: usize) -> Option<&ScoredRun> {
        self.0.get(rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRun> {
        self.0.iter()
    }

    pub fn summaries(&self) -> Vec<RunSummary> {
        self.0
            .iter()
            .map(|s| RunSummary {
                kp: s.record.gains.kp,
                kd: s.record.gains.kd,
                time_s: s.record.elapsed_s,
                completed: s.record.outcome.completed(),
                mean_squared_angle: s.mean_squared_angle,
            })
            .collect()
    }

    /// Summary table as CSV, best pair first.
    pub fn write_summary_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        for summary in self.summaries() {
            w.serialize(summary).map_err(std::io::Error::other)?;
        }
        w.flush()?;
        Ok(())
    }

    /// One run's summary line plus its full trace as CSV rows.
    pub fn write_run_csv<W: Write>(&self, rank: usize, writer: W) -> Result<()> {
        let Some(run) = self.get(rank) else {
            return Ok(());
        };
        let mut w = csv::Writer::from_writer(writer);
        w.write_record([
            "kp", "kd", "time_s", "completed", "mean_squared_angle",
        ])
        .map_err(std::io::Error::other)?;
        w.write_record([
            run.record.gains.kp.to_string(),
            run.record.gains.kd.to_string(),
            run.record.elapsed_s.to_string(),
            run.record.outcome.completed().to_string(),
            run.mean_squared_angle.to_string(),
        ])
        .map_err(std::io::Error::other)?;
        w.write_record([
            "phi1", "phi2", "dphi1", "dphi2", "applied_input", "cart_force", "elapsed_s",
        ])
        .map_err(std::io::Error::other)?;
        for s in &run.record.trace {
            w.write_record([
                s.state.phi1().to_string(),
                s.state.phi2().to_string(),
                s.state.dphi1().to_string(),
                s.state.dphi2().to_string(),
                s.applied_input.to_string(),
                s.cart_force.to_string(),
                s.elapsed_s.to_string(),
            ])
            .map_err(std::io::Error::other)?;
        }
        w.flush()?;
        Ok(())
    }
}
