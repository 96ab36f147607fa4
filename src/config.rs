//! Configuration for sequential Bayesian A/B analysis.

use crate::conjugate::BetaPosterior;
use crate::error::AnalysisError;

/// Default seed for Monte Carlo draws when the caller doesn't supply one.
pub const DEFAULT_SEED: u64 = 0x61625f74657374;

/// Configuration options for [`SequentialAnalyzer`](crate::SequentialAnalyzer)
/// and [`metrics::evaluate`](crate::metrics::evaluate).
///
/// Every knob is an explicit field here rather than ambient state, so two
/// runs with the same `Config`, data, and seed produce bit-identical
/// trajectories.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Decision thresholds
    // =========================================================================
    /// Half-width of the region of practical equivalence on the rate
    /// difference `rate_B - rate_A`.
    ///
    /// Differences inside `[-rope, +rope]` are treated as practically
    /// equivalent. Default: 0.01 (one percentage point).
    pub rope: f64,

    /// Posterior mass a side (or the interior) of the ROPE must exceed for
    /// the decision to resolve.
    ///
    /// Default: 0.95.
    pub rope_threshold: f64,

    // =========================================================================
    // Posterior summaries
    // =========================================================================
    /// Probability mass the highest-density interval must contain.
    ///
    /// Must be in (0, 1). Default: 0.95.
    pub hdi_mass: f64,

    /// Number of Monte Carlo draws per posterior per evaluation.
    ///
    /// More draws tighten the metric estimates at linear cost.
    /// Default: 100,000.
    pub n_samples: usize,

    // =========================================================================
    // Reproducibility and loop control
    // =========================================================================
    /// Base seed for Monte Carlo draws.
    ///
    /// Each period derives its own stream from this seed and the period
    /// index, so re-running is reproducible and periods don't reuse
    /// identical draws. Default: [`DEFAULT_SEED`].
    pub seed: u64,

    /// Optional cap on the number of periods to analyze.
    ///
    /// `None` replays the full data. Default: `None`.
    pub max_periods: Option<usize>,

    // =========================================================================
    // Priors
    // =========================================================================
    /// Prior for variant A's conversion rate. Default: uninformative Beta(1,1).
    pub prior_a: BetaPosterior,

    /// Prior for variant B's conversion rate. Default: uninformative Beta(1,1).
    pub prior_b: BetaPosterior,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rope: 0.01,
            rope_threshold: 0.95,
            hdi_mass: 0.95,
            n_samples: 100_000,
            seed: DEFAULT_SEED,
            max_periods: None,
            prior_a: BetaPosterior::uniform(),
            prior_b: BetaPosterior::uniform(),
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quick configuration for development and calibration runs.
    ///
    /// Uses 10,000 Monte Carlo draws per evaluation.
    pub fn quick() -> Self {
        Self {
            n_samples: 10_000,
            ..Default::default()
        }
    }

    /// Create a thorough configuration for final analyses.
    ///
    /// Uses 1,000,000 Monte Carlo draws per evaluation.
    pub fn thorough() -> Self {
        Self {
            n_samples: 1_000_000,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the ROPE half-width.
    pub fn rope(mut self, rope: f64) -> Self {
        assert!(rope >= 0.0, "rope must be non-negative");
        self.rope = rope;
        self
    }

    /// Set the ROPE decision threshold.
    pub fn rope_threshold(mut self, threshold: f64) -> Self {
        assert!(
            threshold > 0.0 && threshold < 1.0,
            "rope_threshold must be in (0, 1)"
        );
        self.rope_threshold = threshold;
        self
    }

    /// Set the HDI probability mass.
    pub fn hdi_mass(mut self, mass: f64) -> Self {
        assert!(mass > 0.0 && mass < 1.0, "hdi_mass must be in (0, 1)");
        self.hdi_mass = mass;
        self
    }

    /// Set the number of Monte Carlo draws per evaluation.
    pub fn n_samples(mut self, n: usize) -> Self {
        assert!(n > 0, "n_samples must be positive");
        self.n_samples = n;
        self
    }

    /// Set the base Monte Carlo seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of analyzed periods.
    pub fn max_periods(mut self, max: usize) -> Self {
        assert!(max > 0, "max_periods must be positive");
        self.max_periods = Some(max);
        self
    }

    /// Set the prior for variant A.
    pub fn prior_a(mut self, prior: BetaPosterior) -> Self {
        self.prior_a = prior;
        self
    }

    /// Set the prior for variant B.
    pub fn prior_b(mut self, prior: BetaPosterior) -> Self {
        self.prior_b = prior;
        self
    }

    /// Check that every parameter is in range.
    ///
    /// Called at the entry of `evaluate` and `run`, before any sampling.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.rope >= 0.0) {
            return Err(AnalysisError::InvalidParameters {
                message: format!("rope must be non-negative, got {}", self.rope),
            });
        }
        if !(self.rope_threshold > 0.0 && self.rope_threshold < 1.0) {
            return Err(AnalysisError::InvalidParameters {
                message: format!(
                    "rope_threshold must be in (0, 1), got {}",
                    self.rope_threshold
                ),
            });
        }
        if !(self.hdi_mass > 0.0 && self.hdi_mass < 1.0) {
            return Err(AnalysisError::InvalidParameters {
                message: format!("hdi_mass must be in (0, 1), got {}", self.hdi_mass),
            });
        }
        if self.n_samples < 1 {
            return Err(AnalysisError::InvalidParameters {
                message: "n_samples must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
