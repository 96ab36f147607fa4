//! Error types for the analysis pipeline.
//!
//! All errors are raised synchronously at the point of first detection.
//! Nothing here is retryable: a caller recovers by supplying corrected
//! inputs. No partial trajectory is ever returned alongside an error.

use std::fmt;

/// Errors that can occur during sequential Bayesian analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Observation with more successes than trials.
    ///
    /// Rejected at posterior-update time, never silently clamped.
    InvalidObservation {
        /// Observed success count.
        successes: u64,
        /// Observed trial count.
        trials: u64,
    },

    /// Out-of-range analysis parameter.
    ///
    /// Raised before any sampling takes place (rope, hdi_mass,
    /// rope_threshold, or n_samples outside its valid range).
    InvalidParameters {
        /// Description of the offending parameter.
        message: String,
    },

    /// Variant observation sequences have different lengths.
    ///
    /// The two sequences must be period-aligned; this is checked before
    /// the monitoring loop starts.
    MisalignedPeriods {
        /// Number of periods observed for variant A.
        len_a: usize,
        /// Number of periods observed for variant B.
        len_b: usize,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidObservation { successes, trials } => {
                write!(
                    f,
                    "Invalid observation: {} successes exceed {} trials",
                    successes, trials
                )
            }
            AnalysisError::InvalidParameters { message } => {
                write!(f, "Invalid parameters: {}", message)
            }
            AnalysisError::MisalignedPeriods { len_a, len_b } => {
                write!(
                    f,
                    "Misaligned periods: variant A has {} periods, variant B has {}",
                    len_a, len_b
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
