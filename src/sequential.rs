//! Sequential monitoring loop with early stopping.
//!
//! [`SequentialAnalyzer::run`] replays the experiment's per-period counts in
//! order, folding each period into both variants' posteriors, evaluating the
//! decision metrics, and asking the [`StoppingRule`] whether the evidence is
//! conclusive. The loop is a pure in-process fold: no I/O, no shared mutable
//! state, and bit-identical trajectories for identical inputs and seed.
//!
//! Stopping rules see snapshots strictly in period order, so the first-fire
//! semantics hold even though later periods' metrics are independent of the
//! rule's verdicts.

use log::debug;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::metrics;
use crate::result::{MetricsSnapshot, RopeDecision, StopReason, StoppingDecision, Trajectory, Winner};
use crate::types::PeriodObservation;

// ============================================================================
// StoppingRule - pluggable early-stop policy
// ============================================================================

/// Decides, from one period's metrics, whether the test can stop.
///
/// `Some(winner)` stops the loop (with `Winner::None` meaning practical
/// equivalence); `None` continues. Implementations must be pure functions
/// of the snapshot and period index, or determinism of the run is lost.
///
/// This is the extension seam for different business risk tolerances:
/// callers may wrap or replace [`RopeRule`] with their own policy.
pub trait StoppingRule {
    /// Check the stopping condition for the given period.
    fn check(&self, snapshot: &MetricsSnapshot, period: usize) -> Option<Winner>;
}

/// Default policy: stop as soon as the ROPE verdict resolves.
///
/// `a_better`/`b_better` declare that variant the winner; `equivalent`
/// stops with no winner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RopeRule;

impl StoppingRule for RopeRule {
    fn check(&self, snapshot: &MetricsSnapshot, _period: usize) -> Option<Winner> {
        match snapshot.rope_decision {
            RopeDecision::ABetter => Some(Winner::A),
            RopeDecision::BBetter => Some(Winner::B),
            RopeDecision::Equivalent => Some(Winner::None),
            RopeDecision::Inconclusive => None,
        }
    }
}

/// Guard that suppresses an inner rule until a minimum number of periods
/// has been observed.
///
/// A common safeguard against stopping on early noise.
#[derive(Debug, Clone, Copy)]
pub struct MinPeriods<R> {
    min_periods: usize,
    inner: R,
}

impl<R> MinPeriods<R> {
    /// Wrap `inner`, ignoring its verdicts before `min_periods` periods.
    pub fn new(min_periods: usize, inner: R) -> Self {
        Self { min_periods, inner }
    }
}

impl<R: StoppingRule> StoppingRule for MinPeriods<R> {
    fn check(&self, snapshot: &MetricsSnapshot, period: usize) -> Option<Winner> {
        if period + 1 < self.min_periods {
            return None;
        }
        self.inner.check(snapshot, period)
    }
}

// ============================================================================
// SequentialAnalyzer - the monitoring loop
// ============================================================================

/// Drives the period-by-period monitoring loop.
#[derive(Debug, Clone, Default)]
pub struct SequentialAnalyzer {
    config: Config,
}

impl SequentialAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Access the analyzer's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replay the experiment and evaluate the stopping rule each period.
    ///
    /// The two observation sequences must be period-aligned (same length,
    /// same period boundaries). Each period, both posteriors are updated,
    /// the decision metrics are computed with a per-period seed derived
    /// from the base seed, and the rule is consulted; the loop terminates
    /// on the first fire or when the data (or `max_periods`) is exhausted.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::MisalignedPeriods`] if the sequences differ in
    ///   length (checked before any computation).
    /// - [`AnalysisError::InvalidParameters`] if the configuration is out
    ///   of range.
    /// - [`AnalysisError::InvalidObservation`] if a period has
    ///   `successes > trials`.
    ///
    /// On error no partial trajectory is returned.
    pub fn run<R: StoppingRule>(
        &self,
        observations_a: &[PeriodObservation],
        observations_b: &[PeriodObservation],
        rule: &R,
    ) -> Result<(Trajectory, StoppingDecision), AnalysisError> {
        self.config.validate()?;

        if observations_a.len() != observations_b.len() {
            return Err(AnalysisError::MisalignedPeriods {
                len_a: observations_a.len(),
                len_b: observations_b.len(),
            });
        }

        let data_len = observations_a.len();
        let n_periods = match self.config.max_periods {
            Some(max) => max.min(data_len),
            None => data_len,
        };

        let mut posterior_a = self.config.prior_a;
        let mut posterior_b = self.config.prior_b;
        let mut trajectory = Vec::with_capacity(n_periods);

        for period in 0..n_periods {
            posterior_a = posterior_a.update(observations_a[period])?;
            posterior_b = posterior_b.update(observations_b[period])?;

            let period_seed = derive_period_seed(self.config.seed, period);
            let snapshot = metrics::evaluate(&posterior_a, &posterior_b, &self.config, period_seed)?
                .at_period(period);

            debug!(
                "period {}: prob_b_better={:.4} loss_a={:.6} loss_b={:.6} rope={:?}",
                period,
                snapshot.prob_b_better,
                snapshot.expected_loss_a,
                snapshot.expected_loss_b,
                snapshot.rope_decision
            );

            let verdict = rule.check(&snapshot, period);
            trajectory.push(snapshot);

            if let Some(winner) = verdict {
                debug!("stopping rule fired at period {}: winner {:?}", period, winner);
                let decision = StoppingDecision {
                    stopped_at_period: Some(period),
                    winner,
                    reason: StopReason::RopeResolved,
                };
                return Ok((trajectory, decision));
            }
        }

        // Data exhausted without the rule firing.
        let reason = match self.config.max_periods {
            Some(max) if data_len < max => StopReason::Inconclusive,
            _ => StopReason::MaxPeriodsReached,
        };
        let decision = StoppingDecision {
            stopped_at_period: n_periods.checked_sub(1),
            winner: Winner::None,
            reason,
        };
        Ok((trajectory, decision))
    }
}

/// Derive a per-period Monte Carlo seed from the base seed (splitmix64).
///
/// Successive periods get decorrelated streams while replays of the same
/// base seed are bit-identical.
fn derive_period_seed(base_seed: u64, period: usize) -> u64 {
    let mut z = base_seed.wrapping_add((period as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_periods(successes: u64, trials: u64, n: usize) -> Vec<PeriodObservation> {
        vec![PeriodObservation::new(successes, trials); n]
    }

    #[test]
    fn test_period_seed_derivation_is_stable() {
        assert_eq!(derive_period_seed(1763, 0), derive_period_seed(1763, 0));
        assert_ne!(derive_period_seed(1763, 0), derive_period_seed(1763, 1));
        assert_ne!(derive_period_seed(1763, 0), derive_period_seed(1764, 0));
    }

    #[test]
    fn test_misaligned_periods_rejected_before_loop() {
        let analyzer = SequentialAnalyzer::new(Config::quick());
        let obs_a = constant_periods(5, 50, 10);
        let obs_b = constant_periods(5, 50, 9);

        let err = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MisalignedPeriods { len_a: 10, len_b: 9 }
        );
    }

    #[test]
    fn test_invalid_observation_aborts_run() {
        let analyzer = SequentialAnalyzer::new(Config::quick());
        let mut obs_a = constant_periods(5, 50, 3);
        obs_a[1] = PeriodObservation::new(60, 50);
        let obs_b = constant_periods(5, 50, 3);

        let err = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidObservation { .. }));
    }

    #[test]
    fn test_empty_input_yields_empty_trajectory() {
        let analyzer = SequentialAnalyzer::new(Config::quick());
        let (trajectory, decision) = analyzer.run(&[], &[], &RopeRule).unwrap();

        assert!(trajectory.is_empty());
        assert_eq!(decision.stopped_at_period, None);
        assert_eq!(decision.winner, Winner::None);
        assert_eq!(decision.reason, StopReason::MaxPeriodsReached);
    }

    #[test]
    fn test_max_periods_caps_the_loop() {
        // Wide rope keeps the rule from firing; the cap should bound the run.
        let config = Config::quick().rope(0.5).seed(9).max_periods(4);
        let analyzer = SequentialAnalyzer::new(config);
        let obs_a = constant_periods(5, 50, 10);
        let obs_b = constant_periods(20, 50, 10);

        // rope 0.5 makes everything equivalent, so the rule fires at period 0;
        // use a rule that never fires to observe the cap instead.
        struct Never;
        impl StoppingRule for Never {
            fn check(&self, _: &MetricsSnapshot, _: usize) -> Option<Winner> {
                None
            }
        }

        let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &Never).unwrap();
        assert_eq!(trajectory.len(), 4);
        assert_eq!(decision.stopped_at_period, Some(3));
        assert_eq!(decision.reason, StopReason::MaxPeriodsReached);
    }

    #[test]
    fn test_short_data_with_cap_is_inconclusive() {
        let config = Config::quick().rope(0.5).max_periods(10);
        let analyzer = SequentialAnalyzer::new(config);

        struct Never;
        impl StoppingRule for Never {
            fn check(&self, _: &MetricsSnapshot, _: usize) -> Option<Winner> {
                None
            }
        }

        let obs = constant_periods(5, 50, 3);
        let (trajectory, decision) = analyzer.run(&obs, &obs, &Never).unwrap();
        assert_eq!(trajectory.len(), 3);
        assert_eq!(decision.reason, StopReason::Inconclusive);
        assert_eq!(decision.winner, Winner::None);
    }

    #[test]
    fn test_min_periods_guard_delays_stop() {
        // rope = 1.0 resolves Equivalent from the very first period, so the
        // unguarded rule stops at period 0 and the guarded one at period 4.
        let config = Config::quick().rope(1.0);
        let analyzer = SequentialAnalyzer::new(config);
        let obs = constant_periods(5, 50, 10);

        let (trajectory, decision) = analyzer.run(&obs, &obs, &RopeRule).unwrap();
        assert_eq!(decision.stopped_at_period, Some(0));
        assert_eq!(trajectory.len(), 1);

        let guarded = MinPeriods::new(5, RopeRule);
        let (trajectory, decision) = analyzer.run(&obs, &obs, &guarded).unwrap();
        assert_eq!(decision.stopped_at_period, Some(4));
        assert_eq!(trajectory.len(), 5);
        assert_eq!(decision.winner, Winner::None);
        assert_eq!(decision.reason, StopReason::RopeResolved);
    }

    #[test]
    fn test_trajectory_periods_are_sequential() {
        let config = Config::quick().rope(0.5);
        let analyzer = SequentialAnalyzer::new(config);

        struct Never;
        impl StoppingRule for Never {
            fn check(&self, _: &MetricsSnapshot, _: usize) -> Option<Winner> {
                None
            }
        }

        let obs = constant_periods(5, 50, 6);
        let (trajectory, _) = analyzer.run(&obs, &obs, &Never).unwrap();
        for (i, snapshot) in trajectory.iter().enumerate() {
            assert_eq!(snapshot.period, i);
        }
    }
}
