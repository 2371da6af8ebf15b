//! Ordering of multi-city results for the ranking table and bar chart.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tourlens_core::{ComparisonResult, MultiComparison};

/// Sort order of the multi-city view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Order the cities were requested in.
    #[default]
    Input,
    /// Largest percent change first.
    Change,
    /// Smallest p-value first; results without a test go last.
    PValue,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Input, SortKey::Change, SortKey::PValue];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Input => "input",
            SortKey::Change => "change",
            SortKey::PValue => "p-value",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Input => SortKey::Change,
            SortKey::Change => SortKey::PValue,
            SortKey::PValue => SortKey::Input,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Ok(SortKey::Input),
            "change" => Ok(SortKey::Change),
            "p-value" | "pvalue" | "p" => Ok(SortKey::PValue),
            other => Err(format!(
                "unknown sort key '{other}' (expected input, change or p-value)"
            )),
        }
    }
}

/// Stable sort; ties keep input order.
pub fn sort_results(results: &mut [ComparisonResult], key: SortKey) {
    match key {
        SortKey::Input => {}
        SortKey::Change => {
            results.sort_by(|a, b| none_last(a.percent_change, b.percent_change, true))
        }
        SortKey::PValue => results.sort_by(|a, b| none_last(a.p_value(), b.p_value(), false)),
    }
}

/// Compare two optional values with `None` after every value.
fn none_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One bar of the percent-change chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub entity: String,
    pub percent_change: f64,
    pub significant: bool,
}

/// Bars for every result with a percent change, in `key` order.
pub fn bar_entries(multi: &MultiComparison, key: SortKey) -> Vec<BarEntry> {
    let mut results = multi.results.clone();
    sort_results(&mut results, key);
    results
        .iter()
        .filter_map(|r| {
            r.percent_change.map(|change| BarEntry {
                entity: r.entity.clone(),
                percent_change: change,
                significant: r.is_significant(),
            })
        })
        .collect()
}

/// Horizontal text bar scaled so `max_abs` fills `width` cells.
///
/// Negative values draw with `-`, positive with `#`.
pub fn text_bar(value: f64, max_abs: f64, width: usize) -> String {
    if !value.is_finite() || max_abs <= 0.0 || width == 0 {
        return String::new();
    }
    let cells = ((value.abs() / max_abs) * width as f64).round() as usize;
    let cells = cells.clamp(usize::from(value != 0.0), width);
    let ch = if value < 0.0 { '-' } else { '#' };
    std::iter::repeat(ch).take(cells).collect()
}
