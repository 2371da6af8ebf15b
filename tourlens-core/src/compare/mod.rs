//! Comparison engine: single-window comparator and the multi-city driver.

pub mod many;
pub mod settings;
pub mod window;

pub use many::{
    compare_entity, compare_many, EntityComparison, MultiComparison, QueryError, SkipReason,
    SkippedEntity,
};
pub use settings::{CompareSettings, MAX_HALF_WIDTH_DAYS};
pub use window::{compare, percent_change, window_bounds};
