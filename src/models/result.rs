//! Final outcome of a completed play session.

use crate::models::judgement::JudgementCounts;

/// Summary of a finished session, for result screens and leaderboards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionResults {
    pub score: u32,
    /// Final accuracy in `[0, 1]`.
    pub accuracy: f64,
    pub max_combo: u32,
    /// Per-tier judgement counts.
    pub counts: JudgementCounts,
    /// md5 of the chart document this score was set on.
    pub chart_hash: String,
}

impl SessionResults {
    /// Accuracy as a display percentage.
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// True when the combo was never broken.
    pub fn is_full_combo(&self) -> bool {
        self.counts.miss == 0
    }
}
