//! `.ipynb` documents.
//!
//! Only the parts nbsearch reads are typed; every other key of a notebook or cell
//! (outputs, execution counts, attachments, ids) is carried through untouched.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use nbsearch_search::{Entity, join_source};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::NotebookError;

/// Metadata key holding a cell's MEME record.
pub const MEME_METADATA_KEY: &str = "lc_cell_meme";

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Executable code.
    Code,
    /// Markdown text.
    Markdown,
    /// Unrendered text.
    Raw,
}

impl CellType {
    /// The name used in notebooks and in the index.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell source: a single string or a list of lines, each keeping its newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// List form, as written by Jupyter.
    Lines(Vec<String>),
    /// Single-string form.
    Text(String),
}

impl Default for Source {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl Source {
    /// The full text.
    pub fn text(&self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text.clone(),
        }
    }

    /// The source lines. List items are taken as lines; a string is split on `\n`.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::Text(text) => text.split('\n').collect(),
        }
    }

    /// The source as one line of search text: list items joined with spaces.
    pub fn search_text(&self) -> String {
        match self {
            Self::Lines(lines) => join_source(lines),
            Self::Text(text) => text.clone(),
        }
    }

    /// Whether the source has no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lines(lines) => lines.iter().all(String::is_empty),
            Self::Text(text) => text.is_empty(),
        }
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Kind of cell.
    pub cell_type: CellType,
    /// Cell text.
    #[serde(default)]
    pub source: Source,
    /// Cell metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Every other key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates a cell with empty metadata.
    pub fn new(cell_type: CellType, source: impl Into<Source>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    /// Creates a code cell with an empty output list, as Jupyter expects.
    pub fn code(source: impl Into<Source>) -> Self {
        let mut cell = Self::new(CellType::Code, source);
        cell.extra.insert("outputs".into(), Value::Array(Vec::new()));
        cell.extra.insert("execution_count".into(), Value::Null);
        cell
    }

    /// Creates a markdown cell.
    pub fn markdown(source: impl Into<Source>) -> Self {
        Self::new(CellType::Markdown, source)
    }

    /// The cell's MEME, from `metadata.lc_cell_meme.current`. Empty MEMEs count as missing.
    pub fn meme(&self) -> Option<&str> {
        self.metadata
            .get(MEME_METADATA_KEY)?
            .get("current")?
            .as_str()
            .filter(|meme| !meme.is_empty())
    }

    /// Sets `metadata.lc_cell_meme.current`, keeping other MEME keys.
    pub fn set_meme(&mut self, meme: &str) {
        let record = self
            .metadata
            .entry(MEME_METADATA_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !record.is_object() {
            *record = Value::Object(Map::new());
        }
        if let Value::Object(record) = record {
            record.insert("current".into(), Value::String(meme.to_string()));
        }
    }

    /// Builds a cell from a cell-search hit.
    ///
    /// The hit's `cell_type` selects `source__code` or `source__markdown`, and its
    /// `lc_cell_meme__current` becomes the new cell's MEME.
    pub fn from_entity(entity: &Entity) -> Result<Self, NotebookError> {
        let cell_type = entity
            .get("cell_type")
            .and_then(Value::as_str)
            .ok_or(NotebookError::MissingField("cell_type"))?;
        let (mut cell, field) = match cell_type {
            "code" => (Self::code(""), "source__code"),
            "markdown" => (Self::markdown(""), "source__markdown"),
            other => return Err(NotebookError::UnsupportedCellType(other.to_string())),
        };
        let source = entity.get(field).and_then(Value::as_str).unwrap_or_default();
        cell.source = Source::from(source);
        let meme = entity
            .get("lc_cell_meme__current")
            .and_then(Value::as_str)
            .unwrap_or_default();
        cell.set_meme(meme);
        Ok(cell)
    }

    /// Copies another cell's content into this one, keeping this cell's kind and outputs.
    pub fn overwrite_with(&mut self, other: &Self) {
        self.source = other.source.clone();
        self.metadata = other.metadata.clone();
        match other.extra.get("attachments") {
            Some(attachments) => {
                self.extra.insert("attachments".into(), attachments.clone());
            }
            None => {
                self.extra.remove("attachments");
            }
        }
    }
}

/// A Jupyter notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in order.
    pub cells: Vec<Cell>,
    /// Notebook metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Every other key (`nbformat`, `nbformat_minor`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Creates a notebook holding `cells`, in nbformat 4.5.
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut extra = Map::new();
        extra.insert("nbformat".into(), Value::from(4));
        extra.insert("nbformat_minor".into(), Value::from(5));
        Self {
            cells,
            metadata: Map::new(),
            extra,
        }
    }

    /// Parses a notebook from JSON.
    pub fn from_json(json: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a notebook wrapped in a data response (`{"notebook": {...}}`) or bare.
    pub fn from_data_response(json: &str) -> Result<Self, NotebookError> {
        let value: Value = serde_json::from_str(json)?;
        let notebook = match value {
            Value::Object(mut map) if map.contains_key("notebook") => {
                map.remove("notebook").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(notebook)?)
    }

    /// Reads a notebook file.
    pub fn read(path: &Path) -> Result<Self, NotebookError> {
        let content = fs::read_to_string(path).map_err(|source| NotebookError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|err| err.with_path(path))
    }

    /// Serializes the notebook as indented JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the notebook to a file.
    ///
    /// The JSON goes to a temporary file next to `path` that then replaces it, so a
    /// failed write leaves the previous file intact.
    pub fn write(&self, path: &Path) -> Result<(), NotebookError> {
        let json = self.to_json()?;
        replace_file(path, json.as_bytes()).map_err(|source| NotebookError::WriteFile {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Index of the first cell carrying `meme`.
    pub fn position_of_meme(&self, meme: &str) -> Option<usize> {
        self.cells.iter().position(|cell| cell.meme() == Some(meme))
    }
}

/// Atomically replaces `path` with `contents`, keeping the old file's permissions.
fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.persist(path).map(|_| ()).map_err(|e| e.error)
}
