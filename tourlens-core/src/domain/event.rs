//! Event — a city paired with the date its window is centered on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A concert in one city. One event per city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub entity: String,
    pub pivot: NaiveDate,
}

impl Event {
    pub fn new(entity: impl Into<String>, pivot: NaiveDate) -> Self {
        Self {
            entity: entity.into(),
            pivot,
        }
    }

    /// Signed number of days from the pivot to `date` (negative before it).
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.pivot).num_days()
    }
}
