//! CLI entry point for the spantree MST engine.
//!
//! Parses command-line arguments with clap, runs the requested kernel on an
//! in-process rank cluster, renders the summary to stdout, and maps errors
//! to exit codes. Logging is initialised eagerly so subsequent operations
//! can emit structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use spantree_cli::{
    cli::{render_summary, run_cli, Cli},
    logging::{self, LoggingError},
};
use spantree_core::EngineError;

/// Parse CLI arguments, execute the solve, render the summary, and flush
/// the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to compute the MST")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(engine_error) = err.downcast_ref::<EngineError>() {
                error!(
                    error = %engine_error,
                    code = %engine_error.code(),
                    "command execution failed"
                );
            } else {
                error!(error = %err, "command execution failed");
            }
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
