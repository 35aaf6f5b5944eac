//! `lend-report` library crate.
//!
//! The binary (`lend`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fetch and statistics layers can back other front-ends (e.g. a web UI)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod calc;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod stats;
