//! Implementation of `nbsearch compose`.

use std::process::ExitCode;

use nbsearch_search::{CompositeQuery, Composition, Condition, composite_to_string, parse_field_list};

use crate::cli::args::ComposeCommand;

/// Builds a query string from `FIELD=VALUE` conditions.
///
/// `a|b=VALUE` adds one condition per listed field. An empty value searches for anything.
pub fn run(cmd: &ComposeCommand) -> ExitCode {
    let composition = if cmd.any {
        Composition::Or
    } else {
        Composition::And
    };

    let mut fields = Vec::new();
    for condition in &cmd.conditions {
        let Some((names, value)) = condition.split_once('=') else {
            eprintln!("error: expected FIELD=VALUE, got '{condition}'");
            return ExitCode::FAILURE;
        };
        let targets = match parse_field_list(names) {
            Ok(targets) if !targets.is_empty() => targets,
            Ok(_) => {
                eprintln!("error: no field named in '{condition}'");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("error: {e}");
                eprintln!("Run 'nbsearch fields' to list the searchable fields.");
                return ExitCode::FAILURE;
            }
        };
        let value = if value.trim().is_empty() { "*" } else { value };
        fields.extend(targets.into_iter().map(|target| Condition::new(target, value)));
    }

    let composite = CompositeQuery::new(composition, fields);
    println!("{}", composite_to_string(&composite));
    ExitCode::SUCCESS
}
