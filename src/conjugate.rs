//! Conjugate Beta-Binomial model for a single variant's conversion rate.
//!
//! The conversion rate p has a Beta(α, β) posterior. With a binomial
//! likelihood the update is closed-form:
//!
//! ```text
//! α' = α + successes
//! β' = β + (trials - successes)
//! ```
//!
//! No numerical optimization is involved, so each period update is O(1)
//! and the sequential loop runs in linear total time regardless of the
//! per-period sample size.

use rand::Rng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::types::PeriodObservation;

/// Beta distribution over a conversion rate.
///
/// A prior is this same type before any data arrives: `α` and `β` are
/// pseudo-counts of successes and failures. Updates are pure functional
/// transitions producing a new value; each variant owns its own posterior,
/// so no state is ever shared across variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPosterior {
    /// Success pseudo-count. Invariant: `alpha > 0`.
    pub alpha: f64,

    /// Failure pseudo-count. Invariant: `beta > 0`.
    pub beta: f64,
}

impl BetaPosterior {
    /// Create a posterior with the given parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        assert!(alpha > 0.0, "alpha must be positive");
        assert!(beta > 0.0, "beta must be positive");
        Self { alpha, beta }
    }

    /// Non-informative prior: Beta(1, 1).
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Informative prior from historical data.
    pub fn from_history(conversions: u64, total: u64) -> Self {
        assert!(conversions <= total, "conversions must not exceed total");
        Self {
            alpha: conversions as f64 + 1.0,
            beta: (total - conversions) as f64 + 1.0,
        }
    }

    /// Fold one period's observation into the posterior.
    ///
    /// Returns a new posterior; the receiver is unchanged. Fails with
    /// [`AnalysisError::InvalidObservation`] if `successes > trials`.
    pub fn update(&self, obs: PeriodObservation) -> Result<Self, AnalysisError> {
        obs.validate()?;
        Ok(Self {
            alpha: self.alpha + obs.successes as f64,
            beta: self.beta + (obs.trials - obs.successes) as f64,
        })
    }

    /// Posterior mean: α / (α + β).
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Posterior variance: αβ / ((α+β)²(α+β+1)).
    pub fn variance(&self) -> f64 {
        let s = self.alpha + self.beta;
        (self.alpha * self.beta) / (s * s * (s + 1.0))
    }

    /// Total pseudo-count α + β (prior weight plus observed trials).
    pub fn total_count(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Draw one sample from the posterior.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sampler().sample(rng)
    }

    /// Build the sampling distribution once for repeated draws.
    ///
    /// The positivity invariant on `alpha`/`beta` makes construction
    /// infallible.
    pub(crate) fn sampler(&self) -> Beta<f64> {
        Beta::new(self.alpha, self.beta).expect("posterior parameters are positive")
    }
}
