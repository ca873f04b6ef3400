//! Implementation of `nbsearch cell-query`.

use std::process::ExitCode;

use nbsearch_notebook::NotebookError;
use nbsearch_search::{CellSearchMode, cell_search_query};

use crate::cli::{args::CellQueryCommand, context::CommandContext, output::dim};

/// Prints the default search for cells related to one cell of a notebook.
pub fn run(ctx: &CommandContext, cmd: &CellQueryCommand) -> ExitCode {
    let notebook = match ctx.read_notebook(&cmd.notebook) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };
    let Some(cell) = notebook.cells.get(cmd.index) else {
        let err = NotebookError::IndexOutOfRange {
            index: cmd.index,
            len: notebook.cells.len(),
        };
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    };

    let mode = if cmd.by_content {
        CellSearchMode::ByContent
    } else {
        CellSearchMode::ByMeme
    };
    let location = cmd.location.unwrap_or_default();
    let query = cell_search_query(
        cell.cell_type.as_str(),
        cell.meme(),
        &cell.source.search_text(),
        mode,
        location,
    );

    println!("{}", query.query_string);
    if let Some(q_op) = query.q_op {
        println!("{}", dim(&format!("q_op: {q_op}")));
    }
    ExitCode::SUCCESS
}
