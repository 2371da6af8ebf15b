//! Window — the date-bounded, null-free slice of one city's series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single present observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

impl Point {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observations for one entity with `start <= date <= end`, ascending by date.
///
/// Missing cells never appear here; the store drops them while slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub entity: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    points: Vec<Point>,
}

impl Window {
    /// Build a window, sorting the points by date.
    pub fn new(
        entity: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        mut points: Vec<Point>,
    ) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            entity: entity.into(),
            start,
            end,
            points,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Split at `pivot`. The pivot date itself lands in `post`.
    pub fn partition(&self, pivot: NaiveDate) -> Partition<'_> {
        let split = self.points.partition_point(|p| p.date < pivot);
        let (pre, post) = self.points.split_at(split);
        Partition { pivot, pre, post }
    }
}

/// Pre/post view of a window. Borrowed; lives as long as the window.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    pub pivot: NaiveDate,
    pub pre: &'a [Point],
    pub post: &'a [Point],
}

impl Partition<'_> {
    pub fn pre_values(&self) -> Vec<f64> {
        self.pre.iter().map(|p| p.value).collect()
    }

    pub fn post_values(&self) -> Vec<f64> {
        self.post.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.pre.len() + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}
