//! Welch's two-sample t-test (unequal variances).
//!
//! Works from partition summaries so callers never need the raw values a
//! second time. The statistic is oriented post − pre: a positive `t` means
//! the metric rose after the pivot.

use serde::{Deserialize, Serialize};

use super::describe::PartitionStats;
use super::distribution::two_sided_p_value;

/// Outcome of a Welch test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl WelchTest {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Run the test on two summaries.
///
/// Returns `None` when either side has fewer than two observations (its
/// variance is undefined) or when both variances are zero, since the
/// statistic then has no finite value.
pub fn welch_t_test(pre: &PartitionStats, post: &PartitionStats) -> Option<WelchTest> {
    let var_pre = pre.variance()?;
    let var_post = post.variance()?;

    let se_pre = var_pre / pre.count as f64;
    let se_post = var_post / post.count as f64;
    let se_sum = se_pre + se_post;
    if se_sum <= 0.0 {
        return None;
    }

    let t_statistic = (post.mean - pre.mean) / se_sum.sqrt();
    let df = se_sum.powi(2)
        / (se_pre.powi(2) / (pre.count as f64 - 1.0) + se_post.powi(2) / (post.count as f64 - 1.0));
    let p_value = two_sided_p_value(t_statistic, df);

    if !t_statistic.is_finite() || !p_value.is_finite() {
        return None;
    }

    Some(WelchTest {
        t_statistic,
        df,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::describe;

    #[test]
    fn known_reference_values() {
        let pre = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let post = describe(&[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        let test = welch_t_test(&pre, &post).unwrap();

        assert!((test.t_statistic - 1.897_366_6).abs() < 1e-6);
        assert!((test.df - 5.882_352_9).abs() < 1e-6);
        assert!((test.p_value - 0.107_53).abs() < 1e-3);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn orientation_is_post_minus_pre() {
        let pre = describe(&[10.0, 11.0, 12.0]).unwrap();
        let post = describe(&[1.0, 2.0, 3.0]).unwrap();
        let test = welch_t_test(&pre, &post).unwrap();
        assert!(test.t_statistic < 0.0);
    }

    #[test]
    fn clear_shift_is_significant() {
        let pre = describe(&[1.0, 1.2, 0.9, 1.1, 1.0, 0.8, 1.05]).unwrap();
        let post = describe(&[5.0, 5.3, 4.9, 5.1, 5.2, 4.8]).unwrap();
        let test = welch_t_test(&pre, &post).unwrap();
        assert!(test.is_significant(0.05));
        assert!(test.p_value < 1e-6);
    }

    #[test]
    fn single_observation_side_is_undefined() {
        let pre = describe(&[3.0]).unwrap();
        let post = describe(&[1.0, 2.0, 3.0]).unwrap();
        assert!(welch_t_test(&pre, &post).is_none());
        assert!(welch_t_test(&post, &pre).is_none());
    }

    #[test]
    fn zero_variance_both_sides_is_undefined() {
        let pre = describe(&[2.0, 2.0, 2.0]).unwrap();
        let post = describe(&[5.0, 5.0]).unwrap();
        assert!(welch_t_test(&pre, &post).is_none());
    }

    #[test]
    fn zero_variance_one_side_still_tests() {
        let pre = describe(&[2.0, 2.0, 2.0]).unwrap();
        let post = describe(&[4.0, 5.0, 6.0]).unwrap();
        let test = welch_t_test(&pre, &post).unwrap();
        // Only the post side contributes: df collapses to n_post - 1.
        assert!((test.df - 2.0).abs() < 1e-12);
        assert!(test.t_statistic > 0.0);
    }
}
