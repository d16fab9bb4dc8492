//! `xsd-sample`: generate a sample XML instance from an XSD schema.
//!
//! This binary delegates to `xsd_sample::cli` for loading, generation and
//! output, keeping the behaviour testable without spawning a process.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};
use xsd_sample::cli::{CliArgs, run, success_message};

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    match run(&args) {
        Ok(summary) => {
            write_success(&success_message(&summary));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "sample generation failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn write_success(message: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
