//! TourLens Core — observation store, event registry, window comparison engine.
//!
//! This crate contains the comparison engine behind the dashboard:
//! - Domain types (events, window points, comparison results)
//! - Date-indexed observation store loaded from CSV
//! - Event registry mapping each city to its concert date
//! - Descriptive statistics and Welch's two-sample t-test
//! - Window comparator (pre/post split around a pivot date)
//! - Multi-city comparator that skips cities it cannot score
//!
//! Everything derived from the store is recomputed on demand. Nothing in
//! this crate caches a result or mutates a loaded table.

pub mod compare;
pub mod data;
pub mod domain;
pub mod registry;
pub mod sample;
pub mod stats;

pub use compare::{
    compare, compare_entity, compare_many, window_bounds, CompareSettings, EntityComparison,
    MultiComparison, QueryError, SkipReason, SkippedEntity, MAX_HALF_WIDTH_DAYS,
};
pub use data::{ObservationStore, StoreError};
pub use domain::{ComparisonResult, Coverage, Event, Partition, Point, Verdict, Window};
pub use registry::{EventRegistry, RegistryError};
pub use stats::{PartitionStats, WelchTest};
