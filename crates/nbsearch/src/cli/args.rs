//! Clap argument definitions for the `nbsearch` CLI.

use std::{env, path::PathBuf, process::exit};

use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};
use nbsearch_notebook::{Range, Scope};
use nbsearch_search::{CellLocation, Composition, SearchTarget};

/// Parse a search target from a string.
fn parse_target(s: &str) -> Result<SearchTarget, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse a query operator from a string.
fn parse_composition(s: &str) -> Result<Composition, String> {
    Composition::parse(s).ok_or_else(|| format!("unknown operator '{s}': expected AND or OR"))
}

/// Parse a cell location from a string.
fn parse_location(s: &str) -> Result<CellLocation, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse a selection scope from a string.
fn parse_scope(s: &str) -> Result<Scope, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse a selection range from a string.
fn parse_range(s: &str) -> Result<Range, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "nbsearch")]
#[command(about = "Search Jupyter notebooks and reuse their cells")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flags for sorting and paging a search.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Sort as "column asc" or "column desc" [default: from config]
    #[arg(long)]
    pub sort: Option<String>,

    /// Offset of the first result
    #[arg(long)]
    pub start: Option<u64>,

    /// Results per page [default: 50]
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,
}

/// Arguments for `nbsearch parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query string
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `nbsearch compose`.
#[derive(Args, Debug, Clone)]
pub struct ComposeCommand {
    /// Conditions as FIELD=VALUE, e.g. owner=alice
    pub conditions: Vec<String>,

    /// Join the conditions with OR instead of AND
    #[arg(long)]
    pub any: bool,
}

/// Arguments for `nbsearch request`.
#[derive(Args, Debug, Clone)]
pub struct RequestCommand {
    /// What to search: notebook or cell
    #[arg(value_parser = parse_target)]
    pub target: SearchTarget,

    /// Query string
    pub query: String,

    #[command(flatten)]
    /// Sort and page flags.
    pub page: PageArgs,

    /// Default operator for the backend's query parser (AND or OR)
    #[arg(long, value_parser = parse_composition)]
    pub q_op: Option<Composition>,
}

/// Arguments for `nbsearch results`.
#[derive(Args, Debug, Clone)]
pub struct ResultsCommand {
    /// What the response holds: notebook or cell
    #[arg(value_parser = parse_target)]
    pub target: SearchTarget,

    /// File holding the JSON response
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `nbsearch cell-query`.
#[derive(Args, Debug, Clone)]
pub struct CellQueryCommand {
    /// Notebook file
    pub notebook: PathBuf,

    /// Index of the cell
    #[arg(short = 'i', long)]
    pub index: usize,

    /// Where to look relative to the cell: current, next, previous, next-section,
    /// previous-section, next-notebook, previous-notebook [default: next]
    #[arg(short = 'l', long, value_parser = parse_location)]
    pub location: Option<CellLocation>,

    /// Search for the cell's text instead of following MEMEs
    #[arg(long)]
    pub by_content: bool,
}

/// Arguments for `nbsearch sections`.
#[derive(Args, Debug, Clone)]
pub struct SectionsCommand {
    /// Notebook file
    pub notebook: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `nbsearch tags`.
#[derive(Args, Debug, Clone)]
pub struct TagsCommand {
    /// Notebook file
    pub notebook: PathBuf,

    /// Only this cell
    #[arg(short = 'i', long)]
    pub index: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `nbsearch insert`.
#[derive(Args, Debug, Clone)]
pub struct InsertCommand {
    /// Notebook to insert into
    pub target: PathBuf,

    /// Notebook holding the search hit
    #[arg(long)]
    pub from: PathBuf,

    /// MEME of the hit cell
    #[arg(long)]
    pub meme: String,

    /// Index of the cell to insert after [default: top of the notebook]
    #[arg(long)]
    pub after: Option<usize>,

    /// What to insert: cell, section or notebook [default: from config]
    #[arg(long, value_parser = parse_scope)]
    pub scope: Option<Scope>,

    /// Which side of the hit: before, after or all [default: from config]
    #[arg(long, value_parser = parse_range)]
    pub range: Option<Range>,

    /// Section title to include with --scope notebook --range all (repeatable)
    #[arg(long = "section")]
    pub sections: Vec<String>,

    /// Show what would change without writing the notebook
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `nbsearch magic`.
#[derive(Args, Debug, Clone)]
pub struct MagicCommand {
    /// Notebook file
    pub notebook: PathBuf,

    /// Index of the %%nbsearch cell [default: first one in the notebook]
    #[arg(short = 'i', long)]
    pub index: Option<usize>,

    /// Comment the directive out and write the notebook back
    #[arg(long)]
    pub comment: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `nbsearch init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.nbsearch.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `nbsearch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query and show whether it has a structured form
    #[command(after_help = "\
QUERY SYNTAX:
  pandas                 Full-text term
  owner:alice            Term in an index field
  source:\"import os\"     Exact phrase
  mtime:[* TO NOW]       Range
  a AND b, a b           Both
  a OR b                 Either
  NOT a, -a              Negation
  (a OR b) AND c         Grouping

Only flat AND-only or OR-only lists of known fields have a structured form.

EXAMPLES:
  nbsearch parse 'owner:alice AND filename:*.ipynb'
  nbsearch parse '(owner:a OR owner:b) AND source:c'")]
    Parse(ParseCommand),

    /// Build a query string from FIELD=VALUE conditions
    Compose(ComposeCommand),

    /// Convert a search to and from page URL parameters
    Url {
        /// Direction of the conversion
        #[command(subcommand)]
        what: UrlWhat,
    },

    /// Print the server URL for a search
    Request(RequestCommand),

    /// Show a saved search response as a table
    Results(ResultsCommand),

    /// Show the search for cells related to a notebook cell
    CellQuery(CellQueryCommand),

    /// List the heading sections of a notebook
    Sections(SectionsCommand),

    /// List heading and hashtag searches in a notebook's markdown cells
    Tags(TagsCommand),

    /// Insert cells from a found notebook, refreshing an earlier insertion in place
    Insert(InsertCommand),

    /// Show or complete a %%nbsearch cell
    Magic(MagicCommand),

    /// List the searchable index fields
    Fields,

    /// Initialize nbsearch configuration in current directory
    Init(InitCommand),

    /// Show status and validate configuration
    Status,

    /// Show effective configuration settings
    Config,
}

/// Conversions for `nbsearch url`.
#[derive(Clone, Subcommand)]
pub enum UrlWhat {
    /// Write a search as URL parameters
    Encode {
        /// Query string
        query: String,

        #[command(flatten)]
        /// Sort and page flags.
        page: PageArgs,
    },
    /// Read a search from URL parameters
    Decode {
        /// Query part of a URL, with or without the leading '?'
        params: String,
    },
    /// Drop the search keys from URL parameters, keeping the rest
    Clear {
        /// Query part of a URL, with or without the leading '?'
        params: String,
    },
}

/// Parses CLI arguments, printing hierarchical help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_hierarchical_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom help with hierarchical subcommand display.
fn print_hierarchical_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: nbsearch <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }

        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:11} {about}");

        for subsub in sub.get_subcommands() {
            let subname = subsub.get_name();
            if subname == "help" {
                continue;
            }
            let subabout = subsub
                .get_about()
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!("    {subname:9} {subabout}");
        }
    }

    println!(
        "  {:<11} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -h, --help  Print help");
}

#[cfg(test)]
mod tests {
    use nbsearch_search::DEFAULT_PAGE_LIMIT;

    use super::*;

    /// Gets help text for a subcommand's argument.
    fn get_arg_help(cmd: &clap::Command, subcmd: &str, arg: &str) -> String {
        cmd.get_subcommands()
            .find(|c| c.get_name() == subcmd)
            .and_then(|c| c.get_arguments().find(|a| a.get_id() == arg))
            .and_then(|a| a.get_help().map(|h| h.to_string()))
            .unwrap_or_default()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn limit_help_matches_default() {
        let cmd = Cli::command();
        let help = get_arg_help(&cmd, "request", "limit");
        assert!(
            help.contains(&format!("[default: {DEFAULT_PAGE_LIMIT}]")),
            "request --limit help should contain default {DEFAULT_PAGE_LIMIT}: {help}"
        );
    }

    #[test]
    fn subcommand_names() {
        let cmd = Cli::command();
        let names: Vec<_> = cmd.get_subcommands().map(|c| c.get_name().to_string()).collect();
        for name in ["parse", "cell-query", "insert", "magic", "url"] {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
    }

    #[test]
    fn value_parsers() {
        assert_eq!(parse_target("cell"), Ok(SearchTarget::Cell));
        assert!(parse_target("page").is_err());
        assert_eq!(parse_composition("or"), Ok(Composition::Or));
        assert_eq!(parse_location("next-section"), Ok(CellLocation::NextSection));
        assert_eq!(parse_scope("notebook"), Ok(Scope::Notebook));
        assert_eq!(parse_range("before"), Ok(Range::Before));
    }

    #[test]
    fn parses_insert_flags() {
        let cli = Cli::try_parse_from([
            "nbsearch", "insert", "work.ipynb", "--from", "hit.ipynb", "--meme", "m1",
            "--after", "2", "--scope", "notebook", "--range", "all", "--section", "# A",
            "--section", "# B",
        ])
        .unwrap();
        let Commands::Insert(cmd) = cli.command else {
            panic!("expected insert");
        };
        assert_eq!(cmd.after, Some(2));
        assert_eq!(cmd.scope, Some(Scope::Notebook));
        assert_eq!(cmd.sections, ["# A", "# B"]);
        assert!(!cmd.dry_run);
    }

    #[test]
    fn rejects_zero_limit() {
        assert!(Cli::try_parse_from(["nbsearch", "request", "cell", "x", "--limit", "0"]).is_err());
    }
}
