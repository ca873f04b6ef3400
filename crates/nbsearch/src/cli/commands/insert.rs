//! Implementation of `nbsearch insert`.

use std::process::ExitCode;

use nbsearch_notebook::{Placement, Section, SelectionState, apply, partition, plan, select_cells};
use tracing::debug;

use crate::cli::{
    args::InsertCommand,
    context::CommandContext,
    output::{dim, success, warning},
};

/// Copies the selected cells of a hit's notebook into a target notebook.
///
/// Cells a previous run placed at the insertion point are updated in place, so running
/// the same insertion twice leaves the notebook unchanged.
pub fn run(ctx: &CommandContext, cmd: &InsertCommand) -> ExitCode {
    let source = match ctx.read_notebook(&cmd.from) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };
    let mut target = match ctx.read_notebook(&cmd.target) {
        Ok(notebook) => notebook,
        Err(code) => return code,
    };

    let sections = partition(&source.cells);
    let mut state = SelectionState::new(sections.clone(), true);
    let scope = cmd.scope.unwrap_or_else(|| ctx.config.insert.scope());
    if !state.set_scope(scope) {
        eprintln!("error: scope '{scope}' is not available for this cell");
        return ExitCode::FAILURE;
    }
    state.set_range(cmd.range.unwrap_or_else(|| ctx.config.insert.range()));

    if !cmd.sections.is_empty() {
        if !state.shows_sections() {
            eprintln!(
                "{}",
                warning("warning: --section only applies to --scope notebook --range all")
            );
        }
        state.deselect_all();
        for index in match_sections(&sections, &cmd.sections) {
            state.set_checked(index, true);
        }
    }

    let result = state.result();
    debug!(?result, meme = %cmd.meme, "resolved selection");
    let selected = select_cells(&result, &source.cells, &sections, &cmd.meme);
    if selected.is_empty() {
        if source.position_of_meme(&cmd.meme).is_none() {
            eprintln!(
                "error: no cell with MEME {} in {}",
                cmd.meme,
                cmd.from.display()
            );
            return ExitCode::FAILURE;
        }
        println!("{}", dim("Nothing selected."));
        return ExitCode::SUCCESS;
    }

    let placement = plan(&target, cmd.after, selected);
    let description = describe(&placement);
    if cmd.dry_run {
        println!("{description}");
        println!("{}", dim("(dry run)"));
        return ExitCode::SUCCESS;
    }

    let outcome = match apply(&mut target, placement) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(code) = ctx.write_notebook(&cmd.target, &target) {
        return code;
    }

    println!(
        "{}",
        success(&format!(
            "Inserted {} and updated {} cells in {}",
            outcome.inserted,
            outcome.updated,
            cmd.target.display()
        ))
    );
    ExitCode::SUCCESS
}

/// Indices of every section a requested title names, with or without heading markup.
///
/// Titles that match no section are reported.
fn match_sections(sections: &[Section], requested: &[String]) -> Vec<usize> {
    let mut indices = Vec::new();
    for name in requested {
        let before = indices.len();
        indices.extend(
            sections
                .iter()
                .enumerate()
                .filter(|(_, section)| section.title == *name || section.plain_title() == *name)
                .map(|(index, _)| index),
        );
        if indices.len() == before {
            eprintln!("{}", warning(&format!("warning: no section titled '{name}'")));
        }
    }
    indices
}

/// One-line summary of a placement.
fn describe(placement: &Placement) -> String {
    match placement {
        Placement::Insert { at, cells } => format!("Insert {} cells at index {at}", cells.len()),
        Placement::Update { start, cells } => {
            format!("Update {} cells from index {start}", cells.len())
        }
        Placement::Nothing => String::from("Nothing to place"),
    }
}

#[cfg(test)]
mod tests {
    use nbsearch_notebook::Cell;

    use super::*;

    #[test]
    fn describes_placements() {
        let cells = vec![Cell::code("x = 1"), Cell::code("y = 2")];
        assert_eq!(
            describe(&Placement::Insert {
                at: 3,
                cells: cells.clone()
            }),
            "Insert 2 cells at index 3"
        );
        assert_eq!(
            describe(&Placement::Update { start: 0, cells }),
            "Update 2 cells from index 0"
        );
        assert_eq!(describe(&Placement::Nothing), "Nothing to place");
    }

    #[test]
    fn matches_titles_with_or_without_markup() {
        let cells = vec![
            Cell::markdown("# Setup"),
            Cell::code("import os"),
            Cell::markdown("## Plot"),
            Cell::code("plot()"),
        ];
        let sections = partition(&cells);
        assert_eq!(
            match_sections(&sections, &["Setup".into(), "## Plot".into()]),
            vec![0, 1]
        );
        assert!(match_sections(&sections, &["Missing".into()]).is_empty());
    }

    #[test]
    fn repeated_titles_all_match() {
        let cells = vec![
            Cell::markdown("# Results"),
            Cell::markdown("# Method"),
            Cell::markdown("# Results"),
        ];
        let sections = partition(&cells);
        assert_eq!(match_sections(&sections, &["Results".into()]), vec![0, 2]);
    }
}
