//! ComparisonResult — the value object the comparator hands to display code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::{PartitionStats, WelchTest};

/// Which sides of the pivot had data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Complete,
    MissingPre,
    MissingPost,
    NoData,
}

impl Coverage {
    pub fn from_counts(pre: usize, post: usize) -> Self {
        match (pre > 0, post > 0) {
            (true, true) => Coverage::Complete,
            (false, true) => Coverage::MissingPre,
            (true, false) => Coverage::MissingPost,
            (false, false) => Coverage::NoData,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Coverage::Complete => "complete",
            Coverage::MissingPre => "no data before event",
            Coverage::MissingPost => "no data after event",
            Coverage::NoData => "no data",
        }
    }
}

/// Significance verdict for the Welch test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Significant,
    NotSignificant,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Significant => "significant",
            Verdict::NotSignificant => "not significant",
        }
    }
}

/// Pre/post comparison for one city.
///
/// Every statistic is optional. `None` means "unavailable" and must be shown
/// as such; it is never a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub entity: String,
    pub pivot: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub coverage: Coverage,
    pub pre: Option<PartitionStats>,
    pub post: Option<PartitionStats>,
    /// `(post_mean - pre_mean) / |pre_mean| * 100`; `None` when a side is
    /// missing or the pre mean is exactly zero.
    pub percent_change: Option<f64>,
    pub welch: Option<WelchTest>,
    pub verdict: Option<Verdict>,
    /// Pre mean is non-zero but small enough that the percent change swings
    /// wildly. The value is still reported.
    pub baseline_near_zero: bool,
}

impl ComparisonResult {
    pub fn pre_mean(&self) -> Option<f64> {
        self.pre.map(|s| s.mean)
    }

    pub fn post_mean(&self) -> Option<f64> {
        self.post.map(|s| s.mean)
    }

    pub fn p_value(&self) -> Option<f64> {
        self.welch.map(|w| w.p_value)
    }

    pub fn t_statistic(&self) -> Option<f64> {
        self.welch.map(|w| w.t_statistic)
    }

    pub fn has_data(&self) -> bool {
        self.coverage != Coverage::NoData
    }

    pub fn is_significant(&self) -> bool {
        self.verdict == Some(Verdict::Significant)
    }

    pub fn observation_count(&self) -> usize {
        self.pre.map_or(0, |s| s.count) + self.post.map_or(0, |s| s.count)
    }
}
