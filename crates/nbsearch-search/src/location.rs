//! Default cell searches relative to a cell in the open notebook.
//!
//! A cell's MEME links it to its neighbours in every notebook that shares its
//! lineage, so "what usually follows this cell" is a lookup on the neighbour fields
//! of the index.

use std::{fmt, str::FromStr};

use crate::{
    composite::Composition,
    fields::CatalogError,
    params::SearchQuery,
};

/// Where, relative to the current cell, the searched cells sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellLocation {
    /// The cell itself.
    Current,
    /// The cell right after.
    #[default]
    Next,
    /// The cell right before.
    Previous,
    /// Cells after it in the same section.
    NextSection,
    /// Cells before it in the same section.
    PreviousSection,
    /// Cells after it in the notebook.
    NextNotebook,
    /// Cells before it in the notebook.
    PreviousNotebook,
}

impl CellLocation {
    /// All locations, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Current,
        Self::Next,
        Self::Previous,
        Self::NextSection,
        Self::PreviousSection,
        Self::NextNotebook,
        Self::PreviousNotebook,
    ];

    /// The identifier used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::NextSection => "next-section",
            Self::PreviousSection => "previous-section",
            Self::NextNotebook => "next-notebook",
            Self::PreviousNotebook => "previous-notebook",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "Current cell",
            Self::Next => "Subsequent cell",
            Self::Previous => "Preceding cell",
            Self::NextSection => "Subsequent cells(in section)",
            Self::PreviousSection => "Preceding cells(in section)",
            Self::NextNotebook => "Subsequent cells(in notebook)",
            Self::PreviousNotebook => "Preceding cells(in notebook)",
        }
    }

    /// The index field that must hold the MEME for a cell to sit at this location.
    ///
    /// A cell follows the current one when its *previous* MEME is the current MEME.
    pub fn meme_field(self) -> &'static str {
        match self {
            Self::Current => "lc_cell_meme__current",
            Self::Next => "lc_cell_meme__previous",
            Self::Previous => "lc_cell_meme__next",
            Self::NextSection => "lc_cell_memes__previous__in_section",
            Self::PreviousSection => "lc_cell_memes__next__in_section",
            Self::NextNotebook => "lc_cell_memes__previous__in_notebook",
            Self::PreviousNotebook => "lc_cell_memes__next__in_notebook",
        }
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellLocation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownLocation(s.to_string()))
    }
}

/// The MEME bound to one neighbour field, if the cell has a MEME.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationContext {
    /// Location the context was built for.
    pub location: CellLocation,
    /// MEME of the current cell.
    pub meme: Option<String>,
}

impl LocationContext {
    /// Binds a cell's MEME to the field for `location`. Empty MEMEs count as missing.
    pub fn new(location: CellLocation, meme: Option<&str>) -> Self {
        Self {
            location,
            meme: meme.filter(|m| !m.is_empty()).map(String::from),
        }
    }

    /// The `(field, meme)` slot, when filled.
    pub fn slot(&self) -> Option<(&'static str, &str)> {
        self.meme
            .as_deref()
            .map(|meme| (self.location.meme_field(), meme))
    }
}

/// How a cell search is derived from the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellSearchMode {
    /// Follow MEME links.
    #[default]
    ByMeme,
    /// Search for the cell's text.
    ByContent,
}

/// Joins source lines with spaces, as the index tokenizes them.
pub fn join_source<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The default query for cells at a location.
///
/// Direct neighbours and the cell itself are found by MEME. Section and notebook
/// ranges, and cells without a MEME, fall back to a search on the cell's text.
pub fn default_cell_query(context: &LocationContext, cell_type: &str, source: &str) -> String {
    match (context.location, context.slot()) {
        (CellLocation::Next | CellLocation::Previous, Some((field, meme))) => {
            format!("{field}:{meme}")
        }
        (CellLocation::Current, Some((field, meme))) => {
            format!("cell_type:{cell_type} AND {field}:{meme}")
        }
        _ => {
            let text = source.replace('\n', " ");
            let text = if text.trim().is_empty() { "*" } else { text.as_str() };
            format!("cell_type:{cell_type} AND source__{cell_type}:{text}")
        }
    }
}

/// Builds the search for cells related to a cell.
///
/// `source` is the cell's joined source, empty for cells that carry no text.
pub fn cell_search_query(
    cell_type: &str,
    meme: Option<&str>,
    source: &str,
    mode: CellSearchMode,
    location: CellLocation,
) -> SearchQuery {
    match mode {
        CellSearchMode::ByContent => SearchQuery::new(source),
        CellSearchMode::ByMeme => {
            let context = LocationContext::new(location, meme);
            SearchQuery {
                q_op: Some(Composition::Or),
                ..SearchQuery::new(default_cell_query(&context, cell_type, source))
            }
        }
    }
}
