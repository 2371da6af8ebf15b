//! Knobs for the comparator.

use serde::{Deserialize, Serialize};

/// Largest half width accepted from config files and flags (ten years).
pub const MAX_HALF_WIDTH_DAYS: i64 = 3650;

/// Comparator settings. Every field has a default so a partial config table
/// deserializes cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareSettings {
    /// Days either side of the pivot included in a window.
    pub half_width_days: i64,
    /// Significance threshold for the Welch test.
    pub alpha: f64,
    /// Run the Welch test at all.
    pub welch_test: bool,
    /// `|pre_mean|` below this flags the percent change as unstable.
    pub near_zero_baseline: f64,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            half_width_days: 30,
            alpha: 0.05,
            welch_test: true,
            near_zero_baseline: 0.1,
        }
    }
}

impl CompareSettings {
    pub fn with_half_width(mut self, days: i64) -> Self {
        self.half_width_days = days;
        self
    }

    pub fn without_welch_test(mut self) -> Self {
        self.welch_test = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = CompareSettings::default();
        assert_eq!(s.half_width_days, 30);
        assert_eq!(s.alpha, 0.05);
        assert!(s.welch_test);
    }

    #[test]
    fn builders() {
        let s = CompareSettings::default()
            .with_half_width(14)
            .without_welch_test();
        assert_eq!(s.half_width_days, 14);
        assert!(!s.welch_test);
    }
}
