//! Typed access to the country-level trade and resilience dataset.

mod dataset;
pub mod vulnerability;

pub use dataset::{DataError, Dataset, FlowDirection, Record};
