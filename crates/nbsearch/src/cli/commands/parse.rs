//! Implementation of `nbsearch parse`.

use std::process::ExitCode;

use nbsearch_query::parse;
use nbsearch_search::{CompositeQuery, composite_to_string, expand, parse_to_composite, simplify};
use serde::Serialize;

use crate::cli::{
    args::ParseCommand,
    output::{composite_table, dim, print_json, subheader},
};

/// JSON output for `nbsearch parse`.
#[derive(Serialize)]
struct JsonParse {
    /// The input.
    query: String,
    /// The parsed expression written back out; absent for an empty query.
    normalized: Option<String>,
    /// Whether the query has a structured form.
    structurable: bool,
    /// The structured form.
    composite: Option<CompositeQuery>,
    /// Query string regenerated from the structured form.
    query_string: Option<String>,
    /// Shorthand without a redundant full-text prefix.
    simplified: String,
    /// Shorthand expanded back to a field query.
    expanded: String,
}

/// Parses a query and reports its structure.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let expr = match parse(&cmd.query) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };

    let composite = parse_to_composite(&cmd.query);
    let query_string = composite.as_ref().map(composite_to_string);
    let simplified = simplify(&cmd.query);

    if cmd.json {
        return print_json(&JsonParse {
            query: cmd.query.clone(),
            normalized: expr.as_ref().map(|e| e.to_query_string()),
            structurable: composite.is_some(),
            composite,
            query_string,
            expanded: expand(&simplified),
            simplified,
        });
    }

    println!("{}", subheader("Parsed query:"));
    match &expr {
        Some(expr) => {
            for line in expr.to_string().lines() {
                println!("   {line}");
            }
        }
        None => println!("   {}", dim("(empty query)")),
    }
    println!();

    match (&composite, &query_string) {
        (Some(composite), Some(query_string)) => {
            println!(
                "{} yes ({})",
                subheader("Structured:"),
                composite.composition
            );
            println!("{}", composite_table(composite));
            println!();
            println!("{} {query_string}", subheader("Query string:"));
        }
        _ => {
            println!("{} no", subheader("Structured:"));
            println!(
                "   {}",
                dim("Groups, negations, mixed AND/OR and unknown fields stay free-form.")
            );
        }
    }
    println!("{} {simplified}", subheader("Shorthand:"));

    ExitCode::SUCCESS
}
