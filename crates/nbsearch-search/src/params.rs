//! Search state carried in URL query parameters.
//!
//! A search page records its query in the page URL (`?solrquery=...&sort=...`) so a
//! reload or a shared link restores it. Keys that nbsearch does not own are left alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{composite::Composition, translate::MATCH_ALL};

/// Keys owned by nbsearch.
pub const SEARCH_PARAM_KEYS: [&str; 8] = [
    "solrquery",
    "sort",
    "start",
    "limit",
    "size",
    "numFound",
    "error",
    "nbsearch",
];

/// Page size used when a URL names a start offset but no limit.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// Marker value of the `nbsearch` key for an active search.
pub const ACTIVE_MARKER: &str = "yes";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// The keyword used in sort strings.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortQuery {
    /// Index column to sort by.
    pub column: String,
    /// Direction.
    pub order: SortOrder,
}

impl SortQuery {
    /// Parses `"column asc|desc"`.
    ///
    /// The last space-separated word is the order and everything before it the column.
    /// Any word other than `asc` sorts descending. A string without a space is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let (column, order) = s.rsplit_once(' ')?;
        let order = if order == "asc" {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        };
        Some(Self {
            column: column.to_string(),
            order,
        })
    }
}

impl fmt::Display for SortQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.order.keyword())
    }
}

/// A page window over the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Offset of the first result.
    pub start: u64,
    /// Number of results per page.
    pub limit: u64,
}

impl PageQuery {
    /// The previous page, or `None` on the first page.
    pub fn previous(self) -> Option<Self> {
        (self.start > 0).then(|| Self {
            start: self.start.saturating_sub(self.limit),
            limit: self.limit,
        })
    }

    /// The next page, or `None` when this page reaches `num_found` or the end of `u64`.
    pub fn next(self, num_found: u64) -> Option<Self> {
        self.start
            .checked_add(self.limit)
            .filter(|&start| start < num_found)
            .map(|start| Self {
                start,
                limit: self.limit,
            })
    }

    /// Position label such as `50-100 / 230`.
    pub fn label(self, num_found: u64) -> String {
        let end = self.start.saturating_add(self.limit).min(num_found);
        format!("{}-{} / {}", self.start, end, num_found)
    }
}

/// A complete search request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The boolean query string.
    pub query_string: String,
    /// Sort order, if any.
    pub sort_query: Option<SortQuery>,
    /// Page window, if any.
    pub page_query: Option<PageQuery>,
    /// Default operator for the backend's query parser.
    pub q_op: Option<Composition>,
}

impl SearchQuery {
    /// Creates a query with no sort, paging or operator.
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            ..Self::default()
        }
    }
}

/// The parts of a search query recoverable from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQueryUpdate {
    /// Query string, when the URL carries one.
    pub query_string: Option<String>,
    /// Sort order, when the URL carries a well-formed one.
    pub sort_query: Option<SortQuery>,
    /// Page window, when the URL carries a start or limit.
    pub page_query: Option<PageQuery>,
}

impl SearchQueryUpdate {
    /// Applies the recovered parts over an existing query.
    pub fn apply(self, base: SearchQuery) -> SearchQuery {
        SearchQuery {
            query_string: self.query_string.unwrap_or(base.query_string),
            sort_query: self.sort_query.or(base.sort_query),
            page_query: self.page_query.or(base.page_query),
            q_op: base.q_op,
        }
    }
}

/// Typed view of the nbsearch keys of a URL.
///
/// When writing, `None` leaves a key untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlSearchParams {
    /// The query string.
    pub solrquery: Option<String>,
    /// Sort string, `column asc|desc`.
    pub sort: Option<String>,
    /// Start offset.
    pub start: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Number of results on the page.
    pub size: Option<u64>,
    /// Total number of hits.
    pub num_found: Option<u64>,
    /// Error message of the last search.
    pub error: Option<String>,
    /// `yes` while a search is active.
    pub nbsearch: Option<String>,
}

/// Reads a non-empty string parameter.
fn non_empty(set: &ParamSet, key: &str) -> Option<String> {
    set.get(key).filter(|v| !v.is_empty()).map(String::from)
}

/// Reads an unsigned integer parameter; anything else counts as absent.
fn unsigned(set: &ParamSet, key: &str) -> Option<u64> {
    set.get(key).and_then(|v| v.parse().ok())
}

impl UrlSearchParams {
    /// Extracts the nbsearch keys from a parameter set.
    ///
    /// Numeric keys that are not non-negative integers are dropped, as is a zero limit.
    pub fn from_params(set: &ParamSet) -> Self {
        Self {
            solrquery: non_empty(set, "solrquery"),
            sort: non_empty(set, "sort"),
            start: unsigned(set, "start"),
            limit: unsigned(set, "limit").filter(|&limit| limit > 0),
            size: unsigned(set, "size"),
            num_found: unsigned(set, "numFound"),
            error: non_empty(set, "error"),
            nbsearch: non_empty(set, "nbsearch"),
        }
    }

    /// Writes these values into a parameter set.
    ///
    /// An empty or match-all query removes `solrquery`; an empty sort removes `sort`;
    /// a zero start or limit removes that key. Other keys are never touched.
    pub fn apply_to(&self, set: &mut ParamSet) {
        if let Some(query) = &self.solrquery {
            if query.is_empty() || query == MATCH_ALL {
                set.delete("solrquery");
            } else {
                set.set("solrquery", query);
            }
        }
        if let Some(sort) = &self.sort {
            if sort.is_empty() {
                set.delete("sort");
            } else {
                set.set("sort", sort);
            }
        }
        for (key, value) in [("start", self.start), ("limit", self.limit)] {
            match value {
                Some(n) if n > 0 => set.set(key, &n.to_string()),
                Some(_) => set.delete(key),
                None => {}
            }
        }
        if let Some(marker) = &self.nbsearch {
            set.set("nbsearch", marker);
        }
    }

    /// Whether these parameters mark an active search.
    pub fn is_active(&self) -> bool {
        self.nbsearch.as_deref() == Some(ACTIVE_MARKER)
    }

    /// Recovers the search query parts.
    pub fn to_search_query(&self) -> SearchQueryUpdate {
        let page_query = (self.start.is_some() || self.limit.is_some()).then(|| PageQuery {
            start: self.start.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        });
        SearchQueryUpdate {
            query_string: self.solrquery.clone(),
            sort_query: self.sort.as_deref().and_then(SortQuery::parse),
            page_query,
        }
    }
}

impl From<&SearchQuery> for UrlSearchParams {
    /// Parameters recording a search, marked active.
    fn from(query: &SearchQuery) -> Self {
        Self {
            solrquery: Some(query.query_string.clone()),
            sort: query.sort_query.as_ref().map(ToString::to_string),
            start: query.page_query.map(|page| page.start),
            limit: query.page_query.map(|page| page.limit),
            nbsearch: Some(ACTIVE_MARKER.to_string()),
            ..Self::default()
        }
    }
}

/// An ordered multiset of URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamSet {
    /// Decoded key/value pairs in URL order.
    pairs: Vec<(String, String)>,
}

impl ParamSet {
    /// Parses a query string. A leading `?` is optional.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// Builds a set from pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The first value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every value of a key with one value, keeping the first position.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value.to_string();
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k == key {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    /// Removes every value of a key.
    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Whether the set has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the set as a form-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

/// Whether a parameter set records an active search.
pub fn has_search_params(set: &ParamSet) -> bool {
    UrlSearchParams::from_params(set).is_active()
}

/// Removes every nbsearch key, leaving other keys in place.
pub fn clear_search_params(set: &mut ParamSet) {
    for key in SEARCH_PARAM_KEYS {
        set.delete(key);
    }
}
