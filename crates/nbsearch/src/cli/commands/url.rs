//! Implementation of `nbsearch url`.

use std::process::ExitCode;

use nbsearch_search::{
    MATCH_ALL, ParamSet, SEARCH_PARAM_KEYS, SearchQuery, UrlSearchParams, can_structure,
    clear_search_params, expand, has_search_params, simplify,
};

use super::shared::{explicit_page, query_or_match_all, resolve_sort};
use crate::cli::{
    args::{PageArgs, UrlWhat},
    context::CommandContext,
    output::dim,
};

/// Converts between searches and URL parameters.
pub fn run(ctx: &CommandContext, what: UrlWhat) -> ExitCode {
    match what {
        UrlWhat::Encode { query, page } => encode(ctx, &query, &page),
        UrlWhat::Decode { params } => decode(&params),
        UrlWhat::Clear { params } => clear(&params),
    }
}

/// Prints the URL parameters recording a search.
///
/// The query is written in shorthand form; a match-all query is left out entirely.
fn encode(ctx: &CommandContext, query: &str, page: &PageArgs) -> ExitCode {
    let sort_query = match resolve_sort(page, None) {
        Ok(sort) => sort,
        Err(code) => return code,
    };
    let query_string = query_or_match_all(query);
    let query_string = if query_string == MATCH_ALL {
        query_string
    } else {
        simplify(&query_string)
    };
    let search = SearchQuery {
        query_string,
        sort_query,
        page_query: explicit_page(page, &ctx.config.search),
        q_op: None,
    };

    let mut set = ParamSet::default();
    UrlSearchParams::from(&search).apply_to(&mut set);
    println!("?{}", set.to_query_string());
    ExitCode::SUCCESS
}

/// Prints the search recorded in URL parameters.
fn decode(params: &str) -> ExitCode {
    let set = ParamSet::parse(params);
    let url_params = UrlSearchParams::from_params(&set);
    let search = url_params
        .to_search_query()
        .apply(SearchQuery::new(MATCH_ALL));
    let query = expand(&search.query_string);

    let active = if has_search_params(&set) { "yes" } else { "no" };
    println!("active:     {active}");
    println!("query:      {query}");
    let structured = if can_structure(&query) { "yes" } else { "no" };
    println!("structured: {structured}");
    if let Some(sort) = &search.sort_query {
        println!("sort:       {sort}");
    }
    if let Some(page) = search.page_query {
        println!("page:       start {}, limit {}", page.start, page.limit);
    }
    if let Some(size) = url_params.size {
        println!("size:       {size}");
    }
    if let Some(num_found) = url_params.num_found {
        println!("numFound:   {num_found}");
    }
    if let Some(error) = &url_params.error {
        println!("error:      {error}");
    }

    let others: Vec<String> = set
        .iter()
        .filter(|(key, _)| !SEARCH_PARAM_KEYS.contains(key))
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if !others.is_empty() {
        println!("{}", dim(&format!("other:      {}", others.join(" "))));
    }

    ExitCode::SUCCESS
}

/// Prints the parameters with every nbsearch key removed.
fn clear(params: &str) -> ExitCode {
    let mut set = ParamSet::parse(params);
    clear_search_params(&mut set);
    if set.is_empty() {
        println!();
    } else {
        println!("?{}", set.to_query_string());
    }
    ExitCode::SUCCESS
}
