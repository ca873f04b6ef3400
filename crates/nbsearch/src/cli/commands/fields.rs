//! Implementation of `nbsearch fields`.

use std::process::ExitCode;

use crate::cli::output::fields_table;

/// Lists the searchable index fields.
pub fn run() -> ExitCode {
    println!("{}", fields_table());
    ExitCode::SUCCESS
}
