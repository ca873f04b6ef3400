//! Implementation of `nbsearch results`.

use std::{fs, process::ExitCode};

use nbsearch_config::ResultsSettings;
use nbsearch_search::{Entity, SearchResponse};
use serde::Serialize;

use crate::cli::{
    args::ResultsCommand,
    context::CommandContext,
    output::{dim, page_summary, print_json, results_table},
};

/// JSON output for `nbsearch results`.
#[derive(Serialize)]
struct JsonResults {
    /// Offset of the first hit.
    start: u64,
    /// Page size.
    limit: u64,
    /// Total number of hits.
    num_found: u64,
    /// Hits reduced to the configured columns.
    results: Vec<Entity>,
}

/// Renders a saved search response with the configured columns.
pub fn run(ctx: &CommandContext, cmd: &ResultsCommand) -> ExitCode {
    let path = ctx.resolve(&cmd.file);
    let body = match fs::read_to_string(&path) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    let response = match SearchResponse::from_json(cmd.target, &body) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("error: {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut columns = ctx.config.results.columns(cmd.target);
    if columns.is_empty() {
        columns = ResultsSettings::default().columns(cmd.target);
    }

    if cmd.json {
        let results = response
            .entities
            .iter()
            .map(|entity| {
                columns
                    .iter()
                    .filter_map(|column| {
                        column
                            .value_in(entity)
                            .map(|value| (column.column(), value.clone()))
                    })
                    .collect()
            })
            .collect();
        return print_json(&JsonResults {
            start: response.start,
            limit: response.limit,
            num_found: response.num_found,
            results,
        });
    }

    if response.entities.is_empty() {
        println!("{}", dim("No results found."));
    } else {
        println!("{}", results_table(&response.entities, &columns));
    }
    println!("{}", dim(&page_summary(&response)));

    ExitCode::SUCCESS
}
