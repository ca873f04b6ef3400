//! Implementation of `nbsearch sections`.

use std::process::ExitCode;

use nbsearch_notebook::partition;

use crate::cli::{
    args::SectionsCommand,
    context::CommandContext,
    output::{JsonSection, dim, print_json, sections_table},
};

/// Lists the heading sections of a notebook.
pub fn run(ctx: &CommandContext, cmd: &SectionsCommand) -> ExitCode {
    let notebook = match ctx.read_notebook(&cmd.notebook) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };
    let sections = partition(&notebook.cells);

    if cmd.json {
        let json: Vec<JsonSection> = sections.iter().map(JsonSection::from).collect();
        return print_json(&json);
    }

    if sections.is_empty() {
        println!("{}", dim("Notebook has no cells."));
    } else {
        println!("{}", sections_table(&sections));
    }
    ExitCode::SUCCESS
}
