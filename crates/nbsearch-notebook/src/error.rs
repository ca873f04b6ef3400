//! Error types for notebook handling.

use std::{
    io,
    path::{Path, PathBuf},
};

use nbsearch_search::CatalogError;
use thiserror::Error;

/// Errors from reading, writing or interpreting notebooks.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// Failed to read a notebook file.
    #[error("failed to read notebook {path}: {source}")]
    ReadFile {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write a notebook file.
    #[error("failed to write notebook {path}: {source}")]
    WriteFile {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The JSON is not a notebook.
    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A file holds JSON that is not a notebook.
    #[error("invalid notebook {path}: {source}")]
    InvalidNotebook {
        /// Path to the file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A search hit lacks a required field.
    #[error("search result has no '{0}' field")]
    MissingField(&'static str),

    /// A search hit describes a cell nbsearch cannot create.
    #[error("unsupported cell type: {0}")]
    UnsupportedCellType(String),

    /// A cell index is outside the notebook.
    #[error("cell index {index} is out of range (notebook has {len} cells)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of cells.
        len: usize,
    },
}

impl NotebookError {
    /// Attaches the file path to a parse error.
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Json(source) => Self::InvalidNotebook {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

/// Errors from `%%nbsearch` directives.
#[derive(Debug, Error)]
pub enum MagicError {
    /// The cell does not start with the directive line.
    #[error("cell does not start with %%nbsearch")]
    NotDirective,

    /// The directive body is not valid YAML of the expected shape.
    #[error("invalid %%nbsearch body: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A keyword value is a list or mapping instead of a scalar.
    #[error("keyword '{0}' must have a scalar value")]
    InvalidValue(String),

    /// A keyword names a field outside the catalog.
    #[error(transparent)]
    UnknownField(#[from] CatalogError),
}

/// Errors from naming a selection scope or range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Not one of `cell`, `section`, `notebook`.
    #[error("unknown scope '{0}' (expected cell, section or notebook)")]
    UnknownScope(String),

    /// Not one of `before`, `after`, `all`.
    #[error("unknown range '{0}' (expected before, after or all)")]
    UnknownRange(String),
}
