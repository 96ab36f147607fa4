//! Frequentist A/B testing utilities.
//!
//! A traditional, fixed-horizon companion to the Bayesian engine: power
//! analysis to size a test up front, and a two-proportion z-test to judge
//! it afterwards. These procedures are independent of the sequential loop
//! and never feed back into its stopping rule.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::math::{cohens_h, normal_cdf, probit};
use crate::types::PeriodObservation;

/// Alternative hypothesis for proportion tests and power analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// Treatment ≠ control (two-sided, most common).
    TwoSided,
    /// Treatment > control (one-sided).
    Larger,
    /// Treatment < control (one-sided).
    Smaller,
}

/// Result of a power analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysisResult {
    /// Required sample size per group.
    pub n_per_group: u64,
    /// Total required sample size across both groups.
    pub total_n: u64,
    /// Cohen's h effect size.
    pub effect_size: f64,
    /// Statistical power (1 − β) the analysis was sized for.
    pub power: f64,
    /// Significance level (α).
    pub alpha: f64,
    /// Expected control conversion rate.
    pub p_control: f64,
    /// Expected treatment conversion rate.
    pub p_treatment: f64,
    /// Relative lift (treatment/control − 1).
    pub relative_lift: f64,
}

/// Result of a two-proportion z-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionTestResult {
    /// Z-test statistic (positive when B's rate exceeds A's).
    pub z_statistic: f64,
    /// P-value under the chosen alternative.
    pub p_value: f64,
    /// Whether `p_value < alpha`.
    pub significant: bool,
    /// Significance level used.
    pub alpha: f64,
    /// Observed conversion rate for variant A.
    pub rate_a: f64,
    /// Observed conversion rate for variant B.
    pub rate_b: f64,
    /// Absolute difference (B − A).
    pub absolute_lift: f64,
    /// Relative lift (B/A − 1); infinite when A converted nothing.
    pub relative_lift: f64,
    /// Normal-approximation confidence interval for A's rate.
    pub ci_a: (f64, f64),
    /// Normal-approximation confidence interval for B's rate.
    pub ci_b: (f64, f64),
    /// Total trials for variant A.
    pub n_a: u64,
    /// Total trials for variant B.
    pub n_b: u64,
    /// Alternative hypothesis used.
    pub alternative: Alternative,
}

/// Required sample size per group for a two-proportion z-test.
///
/// Sizes the test to detect the difference between `p_control` and
/// `p_treatment` with the requested power at significance `alpha`, using
/// Cohen's h as the standardized effect:
///
/// ```text
/// n_control = (z_alpha + z_power)^2 * (1 + 1/ratio) / h^2
/// ```
///
/// `ratio` is treatment-to-control allocation (1.0 = equal groups).
///
/// # Errors
///
/// Fails with [`AnalysisError::InvalidParameters`] if a rate, `power`, or
/// `alpha` is out of range, the rates are equal, or `ratio <= 0`.
pub fn power_analysis(
    p_control: f64,
    p_treatment: f64,
    power: f64,
    alpha: f64,
    ratio: f64,
    alternative: Alternative,
) -> Result<PowerAnalysisResult, AnalysisError> {
    for (name, rate) in [("p_control", p_control), ("p_treatment", p_treatment)] {
        if !(rate > 0.0 && rate < 1.0) {
            return Err(AnalysisError::InvalidParameters {
                message: format!("{} must be in (0, 1), got {}", name, rate),
            });
        }
    }
    if !(power > 0.0 && power < 1.0) {
        return Err(AnalysisError::InvalidParameters {
            message: format!("power must be in (0, 1), got {}", power),
        });
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AnalysisError::InvalidParameters {
            message: format!("alpha must be in (0, 1), got {}", alpha),
        });
    }
    if !(ratio > 0.0) {
        return Err(AnalysisError::InvalidParameters {
            message: format!("ratio must be positive, got {}", ratio),
        });
    }
    if p_treatment == p_control {
        return Err(AnalysisError::InvalidParameters {
            message: "p_treatment must differ from p_control".to_string(),
        });
    }

    let effect_size = cohens_h(p_treatment, p_control);

    let z_alpha = match alternative {
        Alternative::TwoSided => probit(1.0 - alpha / 2.0),
        Alternative::Larger | Alternative::Smaller => probit(1.0 - alpha),
    };
    let z_power = probit(power);

    let n_control =
        (z_alpha + z_power).powi(2) * (1.0 + 1.0 / ratio) / effect_size.powi(2);
    let n_per_group = n_control.ceil() as u64;
    let total_n = (n_control * (1.0 + ratio)).ceil() as u64;

    Ok(PowerAnalysisResult {
        n_per_group,
        total_n,
        effect_size,
        power,
        alpha,
        p_control,
        p_treatment,
        relative_lift: p_treatment / p_control - 1.0,
    })
}

/// Two-proportion z-test over aggregated per-period counts.
///
/// Pools both variants' totals, computes the pooled-variance z statistic
/// for `rate_B - rate_A`, and reports significance against `alpha` under
/// the chosen alternative. Confidence intervals use the normal (Wald)
/// approximation per variant.
///
/// # Errors
///
/// Fails with [`AnalysisError::InvalidObservation`] if any period has
/// `successes > trials`, and [`AnalysisError::InvalidParameters`] if
/// `alpha` is out of range or either variant has zero total trials.
pub fn proportion_test(
    observations_a: &[PeriodObservation],
    observations_b: &[PeriodObservation],
    alpha: f64,
    alternative: Alternative,
) -> Result<ProportionTestResult, AnalysisError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AnalysisError::InvalidParameters {
            message: format!("alpha must be in (0, 1), got {}", alpha),
        });
    }

    let (conversions_a, n_a) = aggregate(observations_a)?;
    let (conversions_b, n_b) = aggregate(observations_b)?;
    if n_a == 0 || n_b == 0 {
        return Err(AnalysisError::InvalidParameters {
            message: "each variant needs at least one trial".to_string(),
        });
    }

    let rate_a = conversions_a as f64 / n_a as f64;
    let rate_b = conversions_b as f64 / n_b as f64;

    // Pooled z-test for rate_B - rate_A.
    let pooled = (conversions_a + conversions_b) as f64 / (n_a + n_b) as f64;
    let se = (pooled * (1.0 - pooled) * (1.0 / n_a as f64 + 1.0 / n_b as f64)).sqrt();
    let z_statistic = if se > 0.0 { (rate_b - rate_a) / se } else { 0.0 };

    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * (1.0 - normal_cdf(z_statistic.abs())),
        Alternative::Larger => 1.0 - normal_cdf(z_statistic),
        Alternative::Smaller => normal_cdf(z_statistic),
    };

    let z_ci = probit(1.0 - alpha / 2.0);
    let wald = |rate: f64, n: u64| {
        let half = z_ci * (rate * (1.0 - rate) / n as f64).sqrt();
        (rate - half, rate + half)
    };

    Ok(ProportionTestResult {
        z_statistic,
        p_value,
        significant: p_value < alpha,
        alpha,
        rate_a,
        rate_b,
        absolute_lift: rate_b - rate_a,
        relative_lift: if rate_a > 0.0 {
            rate_b / rate_a - 1.0
        } else {
            f64::INFINITY
        },
        ci_a: wald(rate_a, n_a),
        ci_b: wald(rate_b, n_b),
        n_a,
        n_b,
        alternative,
    })
}

/// Sum a variant's observations, validating each period.
fn aggregate(observations: &[PeriodObservation]) -> Result<(u64, u64), AnalysisError> {
    let mut conversions = 0;
    let mut trials = 0;
    for obs in observations {
        obs.validate()?;
        conversions += obs.successes;
        trials += obs.trials;
    }
    Ok((conversions, trials))
}
