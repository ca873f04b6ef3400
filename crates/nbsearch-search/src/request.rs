//! Requests to the nbsearch server extension.
//!
//! Builds endpoint URLs and decodes JSON responses. Sending the request is left to
//! the caller.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::params::{ParamSet, SearchQuery};

/// A result entity: a flat JSON object keyed by index field name.
pub type Entity = Map<String, Value>;

/// Errors from building requests or decoding responses.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server URL is not an http(s) URL with a host.
    #[error("invalid server url '{0}': expected an http:// or https:// url with a host")]
    InvalidServerUrl(String),

    /// An unknown search target name.
    #[error("unknown search target '{0}': expected 'notebook' or 'cell'")]
    UnknownTarget(String),

    /// The response body is not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response has no result list for the target.
    #[error("response has no '{0}' list")]
    MissingResults(&'static str),
}

/// What a search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// Whole notebooks.
    Notebook,
    /// Individual cells.
    Cell,
}

impl SearchTarget {
    /// The path segment naming the target.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notebook => "notebook",
            Self::Cell => "cell",
        }
    }

    /// The response key holding the result list.
    pub fn results_key(self) -> &'static str {
        match self {
            Self::Notebook => "notebooks",
            Self::Cell => "cells",
        }
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchTarget {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notebook" => Ok(Self::Notebook),
            "cell" => Ok(Self::Cell),
            other => Err(RequestError::UnknownTarget(other.to_string())),
        }
    }
}

/// Path of the search endpoint for a target.
pub fn search_path(target: SearchTarget) -> String {
    format!("v1/{target}/search")
}

/// Query parameters of a search request.
///
/// `limit` and `start` are sent together whenever the query has a page window.
pub fn search_params(query: &SearchQuery) -> ParamSet {
    let mut pairs = vec![("query", query.query_string.clone())];
    if let Some(q_op) = query.q_op {
        pairs.push(("q_op", q_op.keyword().to_string()));
    }
    if let Some(sort) = &query.sort_query {
        pairs.push(("sort", sort.to_string()));
    }
    if let Some(page) = query.page_query {
        pairs.push(("limit", page.limit.to_string()));
        pairs.push(("start", page.start.to_string()));
    }
    ParamSet::from_pairs(pairs)
}

/// Path that asks the server to copy a found notebook next to `path`.
///
/// `path` is the destination directory with a leading `/`, or empty for the root.
pub fn import_path(path: &str, id: &str) -> String {
    format!("v1/import{path}/{id}")
}

/// Path returning the raw notebook of a search hit.
pub fn data_path(id: &str) -> String {
    format!("v1/data/{id}")
}

/// Checks that a server URL uses http or https and names a host.
pub fn validate_server_url(url: &str) -> Result<(), RequestError> {
    parse_server_url(url).map(|_| ())
}

/// Parses a server URL, rejecting anything but http(s) with a host.
fn parse_server_url(raw: &str) -> Result<Url, RequestError> {
    let invalid = || RequestError::InvalidServerUrl(raw.to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(url)
}

/// Base URL of the nbsearch handlers on a Jupyter server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Parsed server URL.
    base: Url,
}

impl Endpoint {
    /// Creates an endpoint for a Jupyter server URL.
    pub fn new(server_url: &str) -> Result<Self, RequestError> {
        let mut base = parse_server_url(server_url)?;
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    /// Full URL of an nbsearch path, with optional query parameters.
    ///
    /// Each `/`-separated part of `path` is percent-encoded as a path segment.
    pub fn url(&self, path: &str, params: Option<&ParamSet>) -> String {
        let mut url = self.base.clone();
        // http(s) URLs with a host always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("nbsearch")
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        url.into()
    }

    /// Full URL of a search request.
    pub fn search_url(&self, target: SearchTarget, query: &SearchQuery) -> String {
        self.url(&search_path(target), Some(&search_params(query)))
    }
}

/// Wire shape shared by both search responses.
#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    /// Notebook hits.
    notebooks: Option<Vec<Entity>>,
    /// Cell hits.
    cells: Option<Vec<Entity>>,
    /// Offset of the first hit.
    start: u64,
    /// Page size.
    limit: u64,
    /// Total number of hits.
    #[serde(rename = "numFound")]
    num_found: u64,
}

/// A decoded search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Hits on this page.
    pub entities: Vec<Entity>,
    /// Offset of the first hit.
    pub start: u64,
    /// Page size.
    pub limit: u64,
    /// Total number of hits.
    pub num_found: u64,
}

impl SearchResponse {
    /// Decodes the JSON body of a search response for `target`.
    pub fn from_json(target: SearchTarget, body: &str) -> Result<Self, RequestError> {
        let raw: RawSearchResponse = serde_json::from_str(body)?;
        let entities = match target {
            SearchTarget::Notebook => raw.notebooks,
            SearchTarget::Cell => raw.cells,
        }
        .ok_or(RequestError::MissingResults(target.results_key()))?;
        Ok(Self {
            entities,
            start: raw.start,
            limit: raw.limit,
            num_found: raw.num_found,
        })
    }
}

/// Response of an import request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportResponse {
    /// Path of the imported notebook on the server.
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use crate::{
        composite::Composition,
        fields::FieldId,
        params::{PageQuery, SortOrder, SortQuery},
    };

    use super::*;

    #[test]
    fn paths() {
        assert_eq!(search_path(SearchTarget::Notebook), "v1/notebook/search");
        assert_eq!(search_path(SearchTarget::Cell), "v1/cell/search");
        assert_eq!(import_path("/work", "abc"), "v1/import/work/abc");
        assert_eq!(import_path("", "abc"), "v1/import/abc");
        assert_eq!(data_path("abc"), "v1/data/abc");
    }

    #[test]
    fn bare_query_params() {
        let params = search_params(&SearchQuery::new("owner:alice"));
        assert_eq!(params.to_query_string(), "query=owner%3Aalice");
    }

    #[test]
    fn full_query_params() {
        let query = SearchQuery {
            query_string: "_text_:*".into(),
            sort_query: Some(SortQuery {
                column: "mtime".into(),
                order: SortOrder::Descending,
            }),
            page_query: Some(PageQuery { start: 50, limit: 25 }),
            q_op: Some(Composition::Or),
        };
        let params = search_params(&query);
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![
                ("query", "_text_:*"),
                ("q_op", "OR"),
                ("sort", "mtime desc"),
                ("limit", "25"),
                ("start", "50"),
            ]
        );
    }

    #[test]
    fn endpoint_urls() {
        let endpoint = Endpoint::new("http://localhost:8888").unwrap();
        assert_eq!(
            endpoint.search_url(SearchTarget::Cell, &SearchQuery::new("pandas")),
            "http://localhost:8888/nbsearch/v1/cell/search?query=pandas"
        );
        let endpoint = Endpoint::new("https://hub.example.org/user/a/").unwrap();
        assert_eq!(
            endpoint.url(&data_path("x1"), None),
            "https://hub.example.org/user/a/nbsearch/v1/data/x1"
        );
    }

    #[test]
    fn endpoint_encodes_path_segments() {
        let endpoint = Endpoint::new("http://localhost:8888/").unwrap();
        assert_eq!(
            endpoint.url(&import_path("/my work", "a?b#c"), None),
            "http://localhost:8888/nbsearch/v1/import/my%20work/a%3Fb%23c"
        );
    }

    #[test]
    fn endpoint_drops_server_query() {
        let endpoint = Endpoint::new("http://localhost:8888/lab?token=abc#top").unwrap();
        assert_eq!(
            endpoint.url(&data_path("x1"), None),
            "http://localhost:8888/lab/nbsearch/v1/data/x1"
        );
    }

    #[test]
    fn rejects_non_http_server() {
        assert!(matches!(
            Endpoint::new("localhost:8888"),
            Err(RequestError::InvalidServerUrl(_))
        ));
        assert!(Endpoint::new("ftp://files.example.org/").is_err());
    }

    #[test]
    fn rejects_malformed_server_urls() {
        for url in ["http://", "https://", "https://exa mple.com", "http://:::/x"] {
            assert!(
                matches!(validate_server_url(url), Err(RequestError::InvalidServerUrl(_))),
                "{url} should be rejected"
            );
        }
        assert!(validate_server_url("http://127.0.0.1:8888").is_ok());
        assert!(validate_server_url("https://hub.example.org/user/a/").is_ok());
    }

    #[test]
    fn target_from_str() {
        assert_eq!("cell".parse::<SearchTarget>().unwrap(), SearchTarget::Cell);
        assert!("page".parse::<SearchTarget>().is_err());
    }

    #[test]
    fn decodes_notebook_response() {
        let body = r#"{
            "notebooks": [{"id": "n1", "filename": "a.ipynb", "owner": "alice"}],
            "start": 0, "limit": 50, "numFound": 1
        }"#;
        let resp = SearchResponse::from_json(SearchTarget::Notebook, body).unwrap();
        assert_eq!(resp.num_found, 1);
        assert_eq!(resp.entities.len(), 1);
        assert_eq!(
            FieldId::Owner.value_in(&resp.entities[0]),
            Some(&Value::from("alice"))
        );
    }

    #[test]
    fn missing_result_list() {
        let body = r#"{"notebooks": [], "start": 0, "limit": 50, "numFound": 0}"#;
        let err = SearchResponse::from_json(SearchTarget::Cell, body).unwrap_err();
        assert!(matches!(err, RequestError::MissingResults("cells")));
    }

    #[test]
    fn malformed_body() {
        assert!(matches!(
            SearchResponse::from_json(SearchTarget::Cell, "{"),
            Err(RequestError::Decode(_))
        ));
    }

    #[test]
    fn import_response() {
        let resp: ImportResponse = serde_json::from_str(r#"{"filename": "work/a.ipynb"}"#).unwrap();
        assert_eq!(resp.filename, "work/a.ipynb");
    }
}
