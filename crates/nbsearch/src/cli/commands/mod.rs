//! Command implementations and dispatch.

pub mod cell_query;
pub mod compose;
pub mod config;
pub mod fields;
pub mod init;
pub mod insert;
pub mod magic;
pub mod parse;
pub mod request;
pub mod results;
pub mod sections;
mod shared;
pub mod status;
pub mod tags;
pub mod url;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(&cmd),
        Commands::Compose(cmd) => compose::run(&cmd),
        Commands::Url { what } => url::run(ctx, what),
        Commands::Request(cmd) => request::run(ctx, &cmd),
        Commands::Results(cmd) => results::run(ctx, &cmd),
        Commands::CellQuery(cmd) => cell_query::run(ctx, &cmd),
        Commands::Sections(cmd) => sections::run(ctx, &cmd),
        Commands::Tags(cmd) => tags::run(ctx, &cmd),
        Commands::Insert(cmd) => insert::run(ctx, &cmd),
        Commands::Magic(cmd) => magic::run(ctx, &cmd),
        Commands::Fields => fields::run(),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
    }
}
