//! Implementation of `nbsearch magic`.

use std::process::ExitCode;

use nbsearch_highlight::{Highlighter, indent_content};
use nbsearch_notebook::{MagicDirective, Notebook, NotebookError, Source, is_directive};
use nbsearch_search::CompositeQuery;
use serde::Serialize;

use crate::cli::{
    args::MagicCommand,
    context::CommandContext,
    output::{composite_table, dim, print_json, subheader, success},
};

/// JSON output for `nbsearch magic`.
#[derive(Serialize)]
struct JsonMagic<'a> {
    /// Index of the directive cell.
    index: usize,
    /// Query string of the directive.
    query: String,
    /// The directive as a composite query.
    composite: &'a CompositeQuery,
    /// Section titles recorded by the directive.
    sections: &'a [String],
}

/// Decodes the `%%nbsearch` cell of a notebook, optionally commenting it out.
pub fn run(ctx: &CommandContext, cmd: &MagicCommand) -> ExitCode {
    let mut notebook = match ctx.read_notebook(&cmd.notebook) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };

    let index = match cmd.index {
        Some(index) if index >= notebook.cells.len() => {
            let err = NotebookError::IndexOutOfRange {
                index,
                len: notebook.cells.len(),
            };
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
        Some(index) => index,
        None => {
            let found = notebook
                .cells
                .iter()
                .position(|cell| is_directive(&cell.source.text()));
            let Some(index) = found else {
                eprintln!("error: no %%nbsearch cell in {}", cmd.notebook.display());
                return ExitCode::FAILURE;
            };
            index
        }
    };

    let directive = match MagicDirective::parse(&notebook.cells[index].source.text()) {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("error: cell {index}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let composite = match directive.query.to_composite() {
        Ok(composite) => composite,
        Err(e) => {
            eprintln!("error: cell {index}: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.comment {
        return comment_out(ctx, cmd, &mut notebook, index, &directive);
    }

    if cmd.json {
        return print_json(&JsonMagic {
            index,
            query: directive.query.query_string(),
            composite: &composite,
            sections: &directive.sections,
        });
    }

    println!("{}", subheader("Query:"));
    println!("   {}", directive.query.query_string());
    println!();
    println!("{}", composite_table(&composite));
    println!();
    println!("{}", subheader("Sections:"));
    if directive.sections.is_empty() {
        println!("   {}", dim("(none)"));
    } else {
        for title in &directive.sections {
            println!("   {title}");
        }
    }

    match directive.render(false) {
        Ok(rendered) => {
            println!();
            println!("{}", subheader("Normalized cell:"));
            let highlighter = Highlighter::new();
            println!("{}", indent_content(&highlighter.highlight_yaml(&rendered)));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Rewrites the directive cell as comments so it no longer runs as a magic.
fn comment_out(
    ctx: &CommandContext,
    cmd: &MagicCommand,
    notebook: &mut Notebook,
    index: usize,
    directive: &MagicDirective,
) -> ExitCode {
    let rendered = match directive.render(true) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    notebook.cells[index].source = Source::from(rendered);
    if let Err(code) = ctx.write_notebook(&cmd.notebook, notebook) {
        return code;
    }
    println!(
        "{}",
        success(&format!(
            "Commented out cell {index} in {}",
            cmd.notebook.display()
        ))
    );
    ExitCode::SUCCESS
}
