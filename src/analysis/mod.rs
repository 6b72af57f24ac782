//! Aggregation engine.
//!
//! Derives the map and time-series views from a fixture store and a
//! filter state, plus summary statistics over the result.

pub mod aggregator;
pub mod summary;

pub use aggregator::*;
pub use summary::*;
