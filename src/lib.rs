//! Sequential Bayesian A/B testing with a Beta-Binomial conjugate model.
//!
//! This crate analyzes two-variant conversion experiments period by period.
//! Each variant's conversion rate gets a Beta posterior updated in closed
//! form from per-period (successes, trials) counts, and decision metrics
//! are integrated by seeded Monte Carlo over the joint posterior:
//!
//! - **P(B > A)**: probability that variant B's true rate exceeds A's
//! - **Expected loss**: the cost of shipping each variant if it is worse
//! - **HDI**: highest density interval for each posterior
//! - **ROPE**: region of practical equivalence decision on the difference
//!
//! The [`SequentialAnalyzer`] drives the monitoring loop, re-evaluating the
//! metrics after every period and consulting a pluggable [`StoppingRule`]
//! so experiments end as soon as the evidence resolves.
//!
//! # Quick start
//!
//! ```
//! use bayes_ab::{simulate_ab_test, Config, RopeRule, SequentialAnalyzer, Winner};
//!
//! let (obs_a, obs_b) = simulate_ab_test(30, 500, 0.10, 0.13, 42);
//!
//! let config = Config::new().rope(0.01).seed(42);
//! let analyzer = SequentialAnalyzer::new(config);
//! let (trajectory, decision) = analyzer.run(&obs_a, &obs_b, &RopeRule).unwrap();
//!
//! assert_eq!(decision.winner, Winner::B);
//! assert!(trajectory.len() <= 30);
//! ```
//!
//! All randomness flows from the configured seed, so identical inputs
//! produce bit-identical trajectories.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod conjugate;
pub mod error;
pub mod frequentist;
pub mod math;
pub mod metrics;
pub mod result;
pub mod sequential;
pub mod simulation;
pub mod types;

pub use config::{Config, DEFAULT_SEED};
pub use conjugate::BetaPosterior;
pub use error::AnalysisError;
pub use frequentist::{
    power_analysis, proportion_test, Alternative, PowerAnalysisResult, ProportionTestResult,
};
pub use metrics::{evaluate, PosteriorMetrics};
pub use result::{
    MetricsSnapshot, RopeDecision, StopReason, StoppingDecision, Trajectory, Winner,
};
pub use sequential::{MinPeriods, RopeRule, SequentialAnalyzer, StoppingRule};
pub use simulation::simulate_ab_test;
pub use types::PeriodObservation;
