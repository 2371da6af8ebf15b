//! Domain types for TourLens

pub mod comparison;
pub mod event;
pub mod window;

pub use comparison::{ComparisonResult, Coverage, Verdict};
pub use event::Event;
pub use window::{Partition, Point, Window};
