//! Command-line parsing for the SKUlytics service.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and the HTTP binding.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ServerConfig, View};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "skulytics", version, about = "Sales & inventory export analytics API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the upload/products/sales-history/forecast HTTP API.
    Serve(ServeArgs),
    /// Run the upload pipeline on a local CSV file and print a view of it.
    ///
    /// Nothing is kept after the command exits.
    Inspect(InspectArgs),
}

/// Options for the HTTP server.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted upload request, in MiB.
    #[arg(long, env = "SKULYTICS_MAX_UPLOAD_MB", default_value_t = 32)]
    pub max_upload_mb: usize,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}

/// Options for offline inspection of an export.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// CSV export to read.
    #[arg(value_name = "CSV")]
    pub file: PathBuf,

    /// Which view to print (views other than `summary` are printed as JSON).
    #[arg(long, value_enum, default_value_t = View::Summary)]
    pub view: View,
}
