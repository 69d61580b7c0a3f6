//! Binary crate for the `wcli` command-line tool.
//!
//! This crate focuses on:
//! - Dispatching the first argument to a command
//! - Interactive credential setup
//! - Mapping failures to exit codes

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => return cli::report_parse_failure(err),
    };

    init_logging(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wcli={level},wcli_core={level}")));

    fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}
