//! Search-side model for nbsearch.
//!
//! nbsearch indexes notebooks and cells in Solr. This crate owns everything between a
//! user's query and the HTTP request to the server extension:
//!
//! - the catalog of searchable index fields,
//! - translation between free-form query strings and structured composite queries,
//! - the query state carried in page URLs,
//! - endpoint URLs and response decoding,
//! - default searches derived from a cell's MEME,
//! - heading and hashtag searches from markdown cells.

#![warn(missing_docs)]

mod composite;
mod fields;
mod location;
mod markdown;
mod params;
mod request;
mod translate;

pub use composite::{CompositeQuery, Composition, Condition};
pub use fields::{CATALOG, CatalogError, FieldId, FieldSpec, InputHint, parse_field_list};
pub use location::{
    CellLocation, CellSearchMode, LocationContext, cell_search_query, default_cell_query,
    join_source,
};
pub use markdown::{MarkdownSearch, find_hashtags, has_heading_line};
pub use params::{
    ACTIVE_MARKER, DEFAULT_PAGE_LIMIT, PageQuery, ParamSet, SEARCH_PARAM_KEYS, SearchQuery,
    SearchQueryUpdate, SortOrder, SortQuery, UrlSearchParams, clear_search_params,
    has_search_params,
};
pub use request::{
    Endpoint, Entity, ImportResponse, RequestError, SearchResponse, SearchTarget, data_path,
    import_path, search_params, search_path, validate_server_url,
};
pub use translate::{
    FULL_TEXT_PREFIX, MATCH_ALL, can_structure, composite_to_string, expand, parse_to_composite,
    simplify,
};
