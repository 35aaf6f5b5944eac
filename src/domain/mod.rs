//! Domain types shared by the fetch, statistics and report layers.
//!
//! This module defines:
//!
//! - raw and parsed loan-offer records (`RawRecord`, `ParsedRecord`)
//! - period buckets and the chart-ready amount distribution
//! - API filter parameters, table reports and calculator output

pub mod types;

pub use types::*;
