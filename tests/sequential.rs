//! End-to-end sequential analysis scenarios.

use bayes_ab::{
    Config, PeriodObservation, RopeDecision, RopeRule, SequentialAnalyzer, StopReason, Winner,
};

fn repeated(successes: u64, trials: u64, periods: usize) -> Vec<PeriodObservation> {
    vec![PeriodObservation::new(successes, trials); periods]
}

/// Test that a clearly better variant B stops the experiment early.
///
/// A converts at 10% (5/50 per period), B at 12% (6/50). With a tight
/// ROPE the difference is practically significant, and the posterior
/// should concentrate enough to resolve before the data runs out.
#[test]
fn better_variant_wins_and_stops_early() {
    let obs_a = repeated(5, 50, 50);
    let obs_b = repeated(6, 50, 50);

    let config = Config::new().rope(0.005).seed(1763);
    let analyzer = SequentialAnalyzer::new(config);
    let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    assert_eq!(decision.winner, Winner::B, "decision was {:?}", decision);
    assert_eq!(decision.reason, StopReason::RopeResolved);

    // The analyzer stops at the resolving period, not at exhaustion.
    let stopped = decision.stopped_at_period.unwrap();
    assert!(stopped < 49, "did not stop early: period {}", stopped);
    assert_eq!(trajectory.len(), stopped + 1);

    let last = trajectory.last().unwrap();
    assert_eq!(last.rope_decision, RopeDecision::BBetter);
    assert!(
        last.prob_b_better > 0.9,
        "final P(B > A) was {}",
        last.prob_b_better
    );

    // Evidence accumulates: P(B > A) should trend upward over the run.
    let first = trajectory.first().unwrap();
    assert!(last.prob_b_better > first.prob_b_better);
}

/// Test that identical variants resolve as practically equivalent.
///
/// Both arms convert at exactly 10% with large per-period samples, so the
/// posterior difference concentrates well inside a 1% ROPE.
#[test]
fn identical_variants_resolve_equivalent() {
    let obs_a = repeated(50, 500, 40);
    let obs_b = repeated(50, 500, 40);

    let config = Config::new().rope(0.01).seed(1763);
    let analyzer = SequentialAnalyzer::new(config);
    let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    assert_eq!(decision.winner, Winner::None, "decision was {:?}", decision);
    assert_eq!(decision.reason, StopReason::RopeResolved);
    assert_eq!(
        trajectory.last().unwrap().rope_decision,
        RopeDecision::Equivalent
    );

    // With no true difference, P(B > A) hovers near one half.
    let last = trajectory.last().unwrap();
    assert!(
        last.prob_b_better > 0.3 && last.prob_b_better < 0.7,
        "P(B > A) was {}",
        last.prob_b_better
    );
}

/// Test that inconclusive data exhausts the horizon without a winner.
#[test]
fn noisy_data_exhausts_without_winner() {
    // Tiny samples and a tight ROPE: nothing resolves in 5 periods.
    let obs_a = repeated(1, 10, 5);
    let obs_b = repeated(2, 10, 5);

    let config = Config::quick().rope(0.001).seed(7);
    let analyzer = SequentialAnalyzer::new(config);
    let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    assert_eq!(decision.winner, Winner::None);
    assert_eq!(decision.reason, StopReason::MaxPeriodsReached);
    assert_eq!(trajectory.len(), 5);
    assert_eq!(decision.stopped_at_period, Some(4));
}

/// Test that the same configuration and data give bit-identical runs.
#[test]
fn trajectories_are_deterministic() {
    let obs_a = repeated(5, 50, 20);
    let obs_b = repeated(7, 50, 20);
    let config = Config::quick().seed(42);

    let analyzer = SequentialAnalyzer::new(config.clone());
    let (first, _) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    let analyzer = SequentialAnalyzer::new(config);
    let (second, _) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.period, b.period);
        assert_eq!(a.prob_b_better, b.prob_b_better);
        assert_eq!(a.expected_loss_a, b.expected_loss_a);
        assert_eq!(a.expected_loss_b, b.expected_loss_b);
        assert_eq!(a.hdi_a, b.hdi_a);
        assert_eq!(a.hdi_b, b.hdi_b);
        assert_eq!(a.rope_decision, b.rope_decision);
    }
}

/// Test that different seeds still agree on the qualitative outcome.
#[test]
fn outcome_is_stable_across_seeds() {
    let obs_a = repeated(5, 50, 50);
    let obs_b = repeated(8, 50, 50);

    for seed in [1, 2, 3] {
        let config = Config::quick().rope(0.005).seed(seed);
        let analyzer = SequentialAnalyzer::new(config);
        let (_, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();
        assert_eq!(decision.winner, Winner::B, "seed {} gave {:?}", seed, decision);
    }
}

/// Test that a max_periods cap truncates the run with the cap's reason.
#[test]
fn max_periods_caps_the_run() {
    let obs_a = repeated(1, 10, 30);
    let obs_b = repeated(1, 10, 30);

    let config = Config::quick().rope(0.0001).max_periods(8).seed(3);
    let analyzer = SequentialAnalyzer::new(config);
    let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();

    assert_eq!(trajectory.len(), 8);
    assert_eq!(decision.reason, StopReason::MaxPeriodsReached);
    assert_eq!(decision.winner, Winner::None);
}

/// Test that mismatched variant lengths are rejected up front.
#[test]
fn misaligned_inputs_error() {
    let obs_a = repeated(5, 50, 10);
    let obs_b = repeated(5, 50, 9);

    let analyzer = SequentialAnalyzer::new(Config::quick());
    let err = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap_err();
    assert!(err.to_string().contains("10"), "error was: {}", err);
    assert!(err.to_string().contains("9"));
}
