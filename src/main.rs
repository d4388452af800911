//! Siteforge CLI
//!
//! Usage: siteforge [--json] <COMMAND>
//!
//! Commands:
//!   preview    Show what a deploy would ship
//!   deploy     Generate, filter, commit and publish a document
//!   republish  Publish the current head of a branch again
//!   bootstrap  Preview a document and provision a hosting project
//!   versions   List the version history of a branch
//!   classify   Run the production filter over file paths

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use siteforge::presentation::cli::Cli;
use siteforge::presentation::commands;
use siteforge::presentation::output::{create_renderer, OutputFormat};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let renderer = create_renderer(OutputFormat::from_json_flag(cli.json), cli.verbose);
    let outcome = commands::run(&cli);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let code = match outcome {
        Ok(output) => {
            renderer
                .render(&output, &mut stdout)
                .context("failed to write output")?;
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, status = err.http_status(), "command failed");
            if cli.json {
                renderer
                    .render_error(&err, &mut stdout)
                    .context("failed to write output")?;
            } else {
                renderer
                    .render_error(&err, &mut io::stderr())
                    .context("failed to write error")?;
            }
            ExitCode::FAILURE
        }
    };
    stdout.flush().context("failed to flush output")?;
    Ok(code)
}

/// Logs go to stderr. `SITEFORGE_LOG` or `RUST_LOG` win over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SITEFORGE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
