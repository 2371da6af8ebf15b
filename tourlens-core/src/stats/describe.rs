//! Descriptive statistics for one partition.

use serde::{Deserialize, Serialize};

/// Summary of a non-empty partition.
///
/// `std_dev` is the sample standard deviation (N−1 denominator) and is
/// `None` when fewer than two observations exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl PartitionStats {
    /// Sample variance, if defined.
    pub fn variance(&self) -> Option<f64> {
        self.std_dev.map(|s| s * s)
    }
}

/// Summarise `values`. Returns `None` for an empty slice.
pub fn describe(values: &[f64]) -> Option<PartitionStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let std_dev = if values.len() < 2 {
        None
    } else {
        let sum_sq = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>();
        Some((sum_sq / (n - 1.0)).sqrt())
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(PartitionStats {
        count: values.len(),
        mean,
        std_dev,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_stats() {
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn single_value_has_undefined_std_dev() {
        let s = describe(&[4.2]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 4.2);
        assert!(s.std_dev.is_none());
        assert!(s.variance().is_none());
        assert_eq!(s.min, 4.2);
        assert_eq!(s.max, 4.2);
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        // mean 5, squared deviations sum to 32, / 7 = 4.571...
        let s = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.std_dev.unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
    }

    #[test]
    fn negative_values() {
        let s = describe(&[-3.0, -1.0]).unwrap();
        assert_eq!(s.mean, -2.0);
        assert_eq!(s.min, -3.0);
        assert_eq!(s.max, -1.0);
        assert!((s.std_dev.unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
