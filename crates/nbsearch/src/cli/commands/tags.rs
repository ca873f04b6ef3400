//! Implementation of `nbsearch tags`.

use std::process::ExitCode;

use nbsearch_notebook::{NotebookError, markdown_searches};

use crate::cli::{
    args::TagsCommand,
    context::CommandContext,
    output::{JsonTag, dim, print_json, tags_table},
};

/// Lists the heading and hashtag searches of a notebook's markdown cells.
pub fn run(ctx: &CommandContext, cmd: &TagsCommand) -> ExitCode {
    let notebook = match ctx.read_notebook(&cmd.notebook) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };
    if let Some(index) = cmd.index
        && index >= notebook.cells.len()
    {
        let err = NotebookError::IndexOutOfRange {
            index,
            len: notebook.cells.len(),
        };
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let tags: Vec<JsonTag> = notebook
        .cells
        .iter()
        .enumerate()
        .filter(|(index, _)| cmd.index.is_none_or(|wanted| wanted == *index))
        .flat_map(|(index, cell)| {
            markdown_searches(cell)
                .into_iter()
                .map(move |search| JsonTag::new(index, search))
        })
        .collect();

    if cmd.json {
        return print_json(&tags);
    }

    if tags.is_empty() {
        println!("{}", dim("No headings or hashtags found."));
    } else {
        println!("{}", tags_table(&tags));
    }
    ExitCode::SUCCESS
}
