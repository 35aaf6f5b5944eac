//! Amount-distribution statistics over loan offers.
//!
//! - field parsing that tolerates locale-style numbers (`normalize`)
//! - bucketing and counting into chart-ready series (`distribution`)

pub mod distribution;
pub mod normalize;

pub use distribution::*;
pub use normalize::*;
