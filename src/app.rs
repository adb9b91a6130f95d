//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - runs the HTTP server, or inspects a local export

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Command, InspectArgs, ServeArgs};
use crate::data::SnapshotStore;
use crate::domain::View;
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "skulytics=info,tower_http=info";

/// Entry point for the `skulytics` binary.
pub fn run() -> Result<(), AppError> {
    // Optional; a missing `.env` is not an error.
    dotenvy::dotenv().ok();
    init_tracing();

    // We want `skulytics` and `skulytics --port 9000` to behave like
    // `skulytics serve ...`. Clap requires a subcommand name, so we do a
    // small, explicit rewrite of the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    // Log to stderr so `inspect` output on stdout stays machine-readable.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::io(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(crate::server::serve(config, SnapshotStore::new()))
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    println!("{}", inspect(&args.file, args.view)?);
    Ok(())
}

/// Run the upload pipeline on a local file and render the requested view.
pub fn inspect(path: &Path, view: View) -> Result<String, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::io(format!("Failed to read CSV '{}': {e}", path.display())))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let store = SnapshotStore::new();
    let summary = pipeline::upload(&store, &bytes, &filename)?;

    match view {
        View::Summary => {
            let forecasts = pipeline::forecast(&store)?;
            let snapshot = store.get()?;
            Ok(crate::report::format_summary(
                &filename,
                summary.encoding,
                &snapshot,
                &forecasts,
            ))
        }
        View::Products => to_json(&pipeline::products(&store)?),
        View::History => to_json(&pipeline::sales_history(&store)?),
        View::Forecast => to_json(&pipeline::forecast(&store)?),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::io(format!("Failed to render JSON: {e}")))
}

/// Rewrite argv so `skulytics` defaults to `skulytics serve`.
///
/// Rules:
/// - `skulytics`                      -> `skulytics serve`
/// - `skulytics --port 9000 ...`      -> `skulytics serve --port 9000 ...`
/// - `skulytics --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "inspect");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "serve flags".
    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    argv
}
