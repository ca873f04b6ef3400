//! Implementation of `nbsearch status`.

use std::process::ExitCode;

use nbsearch_config::{ConfigWarning, discover_config_files, is_global_config};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files, the server endpoint and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("nbsearch init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config_files {
        let display = path.strip_prefix(&ctx.cwd).unwrap_or(path);
        if is_global_config(path) {
            println!("   {} {}", display.display(), dim("(global)"));
        } else {
            println!("   {}", display.display());
        }
    }
    println!();

    let config = &ctx.config;
    println!("{}", subheader("Server:"));
    println!("   {}", config.server.url);
    println!();

    println!("{}", subheader("Search defaults:"));
    println!("   limit: {}", config.search.page_limit());
    println!(
        "   sort: {}",
        config
            .search
            .sort_query()
            .map_or_else(|| dim("(backend default)"), |sort| sort.to_string())
    );
    println!(
        "   q_op: {}",
        config
            .search
            .composition()
            .map_or_else(|| dim("(backend default)"), |op| op.keyword().to_string())
    );
    println!(
        "   insert: scope {}, range {}",
        config.insert.scope(),
        config.insert.range()
    );
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut shown: Vec<&str> = Vec::new();
    for w in warnings {
        let hint = match w {
            ConfigWarning::InvalidServerUrl { .. } => {
                "Hint: [server] url must be an absolute http(s) URL"
            }
            ConfigWarning::UnknownSortColumn { .. } | ConfigWarning::UnknownColumn { .. } => {
                "Hint: run 'nbsearch fields' to list the index fields"
            }
            ConfigWarning::MalformedSort { .. } => "Hint: write sort as 'COLUMN asc' or 'COLUMN desc'",
            _ => continue,
        };
        if !shown.contains(&hint) {
            println!("{}", dim(hint));
            shown.push(hint);
        }
    }
}
