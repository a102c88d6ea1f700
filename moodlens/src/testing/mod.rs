//! Fixtures and assertion helpers for exercising the rewrite guards.
//!
//! Public so downstream crates can run the same property checks against
//! their own generator implementations.

mod assertions;
pub mod fixtures;

pub use assertions::{assert_no_polarity_flip, assert_residual_clean, assert_substantive_change};
