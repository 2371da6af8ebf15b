//! Statistics primitives: descriptive summaries, Student's t distribution,
//! and Welch's unequal-variance two-sample test.

pub mod describe;
pub mod distribution;
pub mod welch;

pub use describe::{describe, PartitionStats};
pub use distribution::{t_cdf, two_sided_p_value};
pub use welch::{welch_t_test, WelchTest};
