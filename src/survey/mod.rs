//! Survey cleaning and aggregation.
//!
//! This module turns the raw GSS rows into a typed table, then computes the
//! grouped means, counts and row-level subsets the dashboard views are built
//! from. Every stage borrows its input and returns a new value.

pub mod aggregate;
pub mod binning;
pub mod clean;
pub mod types;
pub mod utility;
