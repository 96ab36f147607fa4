//! Synthetic A/B test data.
//!
//! Generates per-period conversion counts for two variants with known true
//! rates, in the shape [`SequentialAnalyzer`](crate::SequentialAnalyzer)
//! consumes. Useful for calibration studies and examples; production
//! callers feed in their own historical counts.

use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::PeriodObservation;

/// Simulate an A/B test with binomial conversion counts.
///
/// Each period, each variant observes `period_n` trials; conversions are
/// drawn from Binomial(`period_n`, true rate). Returns the two aligned
/// observation sequences `(variant_a, variant_b)`.
///
/// # Panics
///
/// Panics if a rate is outside [0, 1].
pub fn simulate_ab_test(
    n_periods: usize,
    period_n: u64,
    p_a: f64,
    p_b: f64,
    seed: u64,
) -> (Vec<PeriodObservation>, Vec<PeriodObservation>) {
    assert!((0.0..=1.0).contains(&p_a), "p_a must be in [0, 1]");
    assert!((0.0..=1.0).contains(&p_b), "p_b must be in [0, 1]");

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist_a = Binomial::new(period_n, p_a).expect("rate is in [0, 1]");
    let dist_b = Binomial::new(period_n, p_b).expect("rate is in [0, 1]");

    let mut observations_a = Vec::with_capacity(n_periods);
    let mut observations_b = Vec::with_capacity(n_periods);
    for _ in 0..n_periods {
        observations_a.push(PeriodObservation::new(dist_a.sample(&mut rng), period_n));
        observations_b.push(PeriodObservation::new(dist_b.sample(&mut rng), period_n));
    }

    (observations_a, observations_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_shape() {
        let (obs_a, obs_b) = simulate_ab_test(5, 100, 0.10, 0.12, 42);
        assert_eq!(obs_a.len(), 5);
        assert_eq!(obs_b.len(), 5);
        for obs in obs_a.iter().chain(&obs_b) {
            assert_eq!(obs.trials, 100);
            assert!(obs.successes <= obs.trials);
        }
    }

    #[test]
    fn test_simulation_reproducible() {
        let run1 = simulate_ab_test(10, 100, 0.10, 0.12, 123);
        let run2 = simulate_ab_test(10, 100, 0.10, 0.12, 123);
        assert_eq!(run1, run2, "same seed should give identical data");
    }

    #[test]
    fn test_simulation_rates_near_truth() {
        let (obs_a, obs_b) = simulate_ab_test(100, 1000, 0.10, 0.20, 7);

        let rate = |obs: &[PeriodObservation]| {
            let s: u64 = obs.iter().map(|o| o.successes).sum();
            let t: u64 = obs.iter().map(|o| o.trials).sum();
            s as f64 / t as f64
        };

        assert!((rate(&obs_a) - 0.10).abs() < 0.01);
        assert!((rate(&obs_b) - 0.20).abs() < 0.01);
    }

    #[test]
    #[should_panic(expected = "p_b must be in [0, 1]")]
    fn test_out_of_range_rate_panics() {
        let _ = simulate_ab_test(1, 10, 0.1, 1.5, 0);
    }
}
