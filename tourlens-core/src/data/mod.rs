//! Observation data: CSV loading, date parsing, and the immutable store.

pub mod dates;
pub mod store;

pub use dates::parse_date;
pub use store::{LoadOptions, ObservationStore, StoreError};
