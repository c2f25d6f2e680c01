use anyhow::{Context, Result};
use nback_core::{Outcome, RoundResult};
use serde::Serialize;
use std::path::Path;

/// Aggregate of one game's round results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub rounds: usize,
    pub scorable: usize,
    pub hits: usize,
    pub misses: usize,
    pub false_alarms: usize,
    pub correct_rejections: usize,
    pub score: u32,
}

impl SessionSummary {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let mut summary = Self {
            rounds: results.len(),
            ..Self::default()
        };
        for verdict in results.iter().filter_map(|r| r.verdict) {
            summary.scorable += 1;
            summary.score += verdict.score_delta;
            match verdict.outcome {
                Outcome::Hit => summary.hits += 1,
                Outcome::Miss => summary.misses += 1,
                Outcome::FalseAlarm => summary.false_alarms += 1,
                Outcome::CorrectRejection => summary.correct_rejections += 1,
            }
        }
        summary
    }

    /// Share of scorable rounds without a wrong verdict, in percent.
    pub fn accuracy(&self) -> f64 {
        if self.scorable == 0 {
            return 0.0;
        }
        (self.hits + self.correct_rejections) as f64 / self.scorable as f64 * 100.0
    }
}

/// Writes the round results as pretty JSON.
pub fn export_results(path: &Path, results: &[RoundResult]) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, results)
        .with_context(|| format!("writing results to {}", path.display()))?;
    tracing::info!(rounds = results.len(), path = %path.display(), "results saved");
    Ok(())
}
