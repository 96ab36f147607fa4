//! Input data types.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One period's worth of observed data for a single variant.
///
/// Counts are unsigned, so negative values are unrepresentable by
/// construction; the remaining consistency constraint
/// (`successes <= trials`) is checked when the observation is folded
/// into a posterior, not silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodObservation {
    /// Number of conversions observed in this period.
    pub successes: u64,

    /// Number of exposures (trials) in this period.
    pub trials: u64,
}

impl PeriodObservation {
    /// Create a new period observation.
    pub fn new(successes: u64, trials: u64) -> Self {
        Self { successes, trials }
    }

    /// Check internal consistency (`successes <= trials`).
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.successes > self.trials {
            return Err(AnalysisError::InvalidObservation {
                successes: self.successes,
                trials: self.trials,
            });
        }
        Ok(())
    }

    /// Observed conversion rate for this period, or 0.0 for an empty period.
    pub fn rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.successes as f64 / self.trials as f64
        }
    }
}
