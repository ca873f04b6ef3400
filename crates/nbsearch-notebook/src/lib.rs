//! Notebook-side model for nbsearch.
//!
//! Reads and writes `.ipynb` documents, splits them into heading sections, resolves a
//! range selection around a search hit, and places selected cells into a target notebook,
//! updating cells a previous insertion left behind instead of duplicating them.

#![warn(missing_docs)]

mod cell;
mod error;
mod magic;
mod markdown;
mod meme;
mod section;
mod selection;

pub use cell::{Cell, CellType, MEME_METADATA_KEY, Notebook, Source};
pub use error::{MagicError, NotebookError, SelectionError};
pub use magic::{KeywordQuery, MAGIC_HEADER, MagicDirective, is_directive};
pub use markdown::markdown_searches;
pub use meme::{
    CellDocument, Placement, PlacementOutcome, apply, meme_sequence, place, plan, sequences_match,
};
pub use section::{Section, heading_text, partition};
pub use selection::{Range, Scope, SelectionResult, SelectionState, select_cells};
