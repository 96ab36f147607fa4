//! Result types produced by the sequential analysis.
//!
//! A run yields a [`Trajectory`] (one [`MetricsSnapshot`] per evaluated
//! period, in order) plus a final [`StoppingDecision`]. Snapshots are
//! immutable records: the plotting collaborator consumes the period index
//! and the numeric fields directly.

use serde::{Deserialize, Serialize};

// ============================================================================
// MetricsSnapshot - per-period decision metrics
// ============================================================================

/// Decision metrics computed from the posterior pair at one period.
///
/// Produced once per period by the metric engine and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Period index (0-based) this snapshot was computed at.
    pub period: usize,

    /// P(rate_B > rate_A), estimated from paired posterior draws.
    pub prob_b_better: f64,

    /// Expected loss of choosing A: E[max(0, rate_B - rate_A)].
    pub expected_loss_a: f64,

    /// Expected loss of choosing B: E[max(0, rate_A - rate_B)].
    pub expected_loss_b: f64,

    /// Highest-density interval for variant A's conversion rate.
    pub hdi_a: (f64, f64),

    /// Highest-density interval for variant B's conversion rate.
    pub hdi_b: (f64, f64),

    /// ROPE verdict for the rate difference at this period.
    pub rope_decision: RopeDecision,
}

/// Ordered sequence of per-period snapshots.
///
/// Terminal length equals the full data length, or the stopping period + 1
/// when the rule fires early.
pub type Trajectory = Vec<MetricsSnapshot>;

// ============================================================================
// RopeDecision - region-of-practical-equivalence verdict
// ============================================================================

/// Verdict from comparing the posterior rate-difference distribution
/// against the region of practical equivalence `[-rope, +rope]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RopeDecision {
    /// Not enough posterior mass on any side to decide.
    Inconclusive,

    /// Mass below `-rope` exceeds the decision threshold: A wins.
    ABetter,

    /// Mass above `+rope` exceeds the decision threshold: B wins.
    BBetter,

    /// Mass inside the ROPE exceeds the decision threshold: the variants
    /// are practically equivalent.
    Equivalent,
}

impl RopeDecision {
    /// Whether this verdict resolves the test (anything but inconclusive).
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RopeDecision::Inconclusive)
    }
}

// ============================================================================
// StoppingDecision - final verdict of a run
// ============================================================================

/// Which variant (if any) the analysis declared the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// Variant A outperforms B.
    A,
    /// Variant B outperforms A.
    B,
    /// No winner (practical equivalence, or no conclusion reached).
    None,
}

/// Why the sequential loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The stopping rule fired on a resolved ROPE verdict.
    RopeResolved,

    /// The configured period cap (or the full data) was consumed without
    /// the rule firing.
    MaxPeriodsReached,

    /// The data ran out before the configured `max_periods`, still
    /// unresolved.
    Inconclusive,
}

/// Final verdict of a sequential analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppingDecision {
    /// Index of the last evaluated period. `None` only when the input was
    /// empty and no period was ever evaluated.
    pub stopped_at_period: Option<usize>,

    /// Declared winner, if any.
    pub winner: Winner,

    /// Why the loop terminated.
    pub reason: StopReason,
}
