use serde::{Deserialize, Serialize};

/// Aggregate compliance counters over the stored verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
    /// Number of stored verdicts.
    pub total: u64,
    /// Compliant verdicts.
    pub passed: u64,
    /// Non-compliant verdicts.
    pub failed: u64,
    /// Share of compliant verdicts, rounded to two decimals; `0` when empty.
    pub compliance_score_percent: f64,
}

impl ComplianceStats {
    /// Builds stats from passed and failed counts.
    #[must_use]
    pub fn from_counts(passed: u64, failed: u64) -> Self {
        let total = passed + failed;
        let compliance_score_percent = if total == 0 {
            0.0
        } else {
            round_two_decimals(passed as f64 / total as f64 * 100.0)
        };

        Self {
            total,
            passed,
            failed,
            compliance_score_percent,
        }
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
