//! `skulytics` library crate.
//!
//! The binary (`skulytics`) is a thin wrapper around this library so that:
//!
//! - the ingest/reshape/forecast pipeline is testable without spawning processes
//! - the HTTP binding and the CLI share one implementation of every operation
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod report;
pub mod server;
