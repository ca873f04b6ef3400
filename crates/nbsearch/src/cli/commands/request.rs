//! Implementation of `nbsearch request`.

use std::process::ExitCode;

use nbsearch_search::{PageQuery, SearchQuery};
use tracing::debug;

use super::shared::{explicit_page, query_or_match_all, resolve_sort};
use crate::cli::{args::RequestCommand, context::CommandContext};

/// Prints the server URL for a search, filling unset flags from the configuration.
pub fn run(ctx: &CommandContext, cmd: &RequestCommand) -> ExitCode {
    let endpoint = match ctx.endpoint() {
        Ok(endpoint) => endpoint,
        Err(code) => return code,
    };
    let defaults = &ctx.config.search;

    let sort_query = match resolve_sort(&cmd.page, defaults.sort_query()) {
        Ok(sort) => sort,
        Err(code) => return code,
    };
    let page_query = explicit_page(&cmd.page, defaults).unwrap_or(PageQuery {
        start: 0,
        limit: defaults.page_limit(),
    });

    let query = SearchQuery {
        query_string: query_or_match_all(&cmd.query),
        sort_query,
        page_query: Some(page_query),
        q_op: cmd.q_op.or_else(|| defaults.composition()),
    };
    debug!(search_target = %cmd.target, ?query, "built search request");

    println!("{}", endpoint.search_url(cmd.target, &query));
    ExitCode::SUCCESS
}
