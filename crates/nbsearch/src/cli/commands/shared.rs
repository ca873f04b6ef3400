//! Shared helpers for command implementations.

use std::process::ExitCode;

use nbsearch_config::SearchSettings;
use nbsearch_search::{MATCH_ALL, PageQuery, SortQuery};

use crate::cli::args::PageArgs;

/// The query to send: blank input searches everything.
pub fn query_or_match_all(query: &str) -> String {
    if query.trim().is_empty() {
        MATCH_ALL.to_string()
    } else {
        query.to_string()
    }
}

/// The sort from `--sort`, or `default` when the flag is absent.
pub fn resolve_sort(
    args: &PageArgs,
    default: Option<SortQuery>,
) -> Result<Option<SortQuery>, ExitCode> {
    let Some(sort) = &args.sort else {
        return Ok(default);
    };
    SortQuery::parse(sort).map(Some).ok_or_else(|| {
        eprintln!("error: invalid sort '{sort}': expected \"column asc\" or \"column desc\"");
        ExitCode::FAILURE
    })
}

/// The page window named by `--start` and `--limit`, if either is given.
///
/// A missing start is 0 and a missing limit is the configured page size.
pub fn explicit_page(args: &PageArgs, defaults: &SearchSettings) -> Option<PageQuery> {
    (args.start.is_some() || args.limit.is_some()).then(|| PageQuery {
        start: args.start.unwrap_or(0),
        limit: args.limit.unwrap_or_else(|| defaults.page_limit()),
    })
}

#[cfg(test)]
mod tests {
    use nbsearch_search::SortOrder;

    use super::*;

    #[test]
    fn blank_query_matches_all() {
        assert_eq!(query_or_match_all("  "), "_text_:*");
        assert_eq!(query_or_match_all("owner:a"), "owner:a");
    }

    #[test]
    fn sort_flag_overrides_default() {
        let default = SortQuery::parse("mtime desc");
        let args = PageArgs {
            sort: Some("owner asc".into()),
            ..PageArgs::default()
        };
        let sort = resolve_sort(&args, default.clone()).unwrap().unwrap();
        assert_eq!(sort.column, "owner");
        assert_eq!(sort.order, SortOrder::Ascending);
        assert_eq!(resolve_sort(&PageArgs::default(), default.clone()).unwrap(), default);
    }

    #[test]
    fn malformed_sort_fails() {
        let args = PageArgs {
            sort: Some("mtime".into()),
            ..PageArgs::default()
        };
        assert!(resolve_sort(&args, None).is_err());
    }

    #[test]
    fn page_defaults() {
        let defaults = SearchSettings {
            limit: 20,
            ..SearchSettings::default()
        };
        assert_eq!(explicit_page(&PageArgs::default(), &defaults), None);
        let args = PageArgs {
            start: Some(40),
            ..PageArgs::default()
        };
        assert_eq!(
            explicit_page(&args, &defaults),
            Some(PageQuery {
                start: 40,
                limit: 20
            })
        );
    }
}
