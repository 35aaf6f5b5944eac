//! Input/output helpers.
//!
//! - table report exports (CSV) (`export`)
//! - distribution JSON read/write (`distribution`)

pub mod distribution;
pub mod export;

pub use distribution::*;
pub use export::*;
