//! CLI entry point.
//!
//! Wires argument parsing, candidate discovery, the worker pool, and
//! summary/failure rendering together. All of the actual engineering lives
//! in the library crate; this binary is glue.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use httpspec::config::{self, RunConfig};
use httpspec::discovery;
use httpspec::pool;
use httpspec::reporting::{self, ErrorSink};

/// Run `.http`/`.httpspec` files as assertion-driven HTTP tests.
#[derive(Debug, Parser)]
#[command(name = "httpspec", version, about, long_about = None)]
struct Cli {
    /// Files or directories to test. With no arguments, recursively
    /// discovers `.http`/`.httpspec` files under the current directory.
    paths: Vec<std::path::PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let files = match discovery::resolve(&cli.paths) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("httpspec: {error}");
            return ExitCode::FAILURE;
        }
    };

    if files.is_empty() {
        tracing::warn!("no .http/.httpspec files found");
    }

    let thread_count = config::thread_count_from_env();
    let run_config = RunConfig::new(files.clone(), thread_count);

    let sink = Arc::new(ErrorSink::new(io::stderr()));
    let counters = pool::run(files, run_config.thread_count, run_config.request_timeout, sink);

    print!("{}", reporting::format_summary(&counters));

    if counters.fail == 0 && counters.invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
