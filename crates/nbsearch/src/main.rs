//! nbsearch: search Jupyter notebooks and reuse their cells.
//!
//! The command line front end translates queries between their free-form and structured
//! forms, builds requests for the nbsearch server extension, renders saved responses, and
//! copies cells from a found notebook into a working notebook. Re-inserting the same
//! selection refreshes the cells placed last time instead of duplicating them.

#![warn(missing_docs)]

mod cli;

use std::{io, process::ExitCode};

use tracing_subscriber::EnvFilter;

use crate::cli::{CommandContext, args::Commands, commands};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "NBSEARCH_LOG";

fn main() -> ExitCode {
    let cli = cli::args::parse_cli();
    init_logging();

    let context = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match context {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}

/// Installs a stderr logger filtered by `NBSEARCH_LOG`, warnings only by default.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
