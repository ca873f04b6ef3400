//! The catalog of index fields a query may target.
//!
//! Every searchable column of the notebook/cell index is listed once with its index
//! name and display label. A few columns exist only in result listings and name
//! several index fields in preference order (`source__markdown|source__code`).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised when looking up catalog names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The name does not belong to any catalog field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The name is not a cell location.
    #[error("unknown cell location: {0}")]
    UnknownLocation(String),
}

/// How an input widget should treat a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputHint {
    /// An integer count.
    Number,
    /// A Solr date expression (`NOW-1DAY`, `[* TO NOW]`).
    DateTime,
}

/// Symbolic identifier of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldId {
    /// Default full-text field.
    FullText,
    /// Notebook owner.
    Owner,
    /// Notebook file name.
    Path,
    /// Jupyter server that saved the notebook.
    Server,
    /// Text of any cell.
    Cells,
    /// Output of any cell.
    Outputs,
    /// MEMEs of the cells in a notebook.
    CellMemes,
    /// File modification time.
    Modified,
    /// Time a cell finished executing.
    Executed,
    /// Execution time, or modification time when the cell never ran.
    EstimatedModifiedTime,
    /// MEME of the notebook.
    CurrentMeme,
    /// Notebook path as recorded in its signature.
    SignatureNotebookPath,
    /// Source of code cells.
    SourceCode,
    /// Source of markdown cells.
    SourceMarkdown,
    /// Operation notes written in markdown cells.
    OperationNote,
    /// Number of headings in a markdown cell.
    NumberOfHeaders,
    /// TODO items in markdown cells.
    SourceMarkdownTodo,
    /// Headings in markdown cells.
    SourceMarkdownHeading,
    /// Hashtags in markdown cells.
    SourceMarkdownHashtags,
    /// URLs in markdown cells.
    SourceMarkdownUrl,
    /// Code blocks in markdown cells.
    SourceMarkdownCode,
    /// Captured standard output.
    Stdout,
    /// Captured standard error.
    Stderr,
    /// Plain-text execution result.
    ResultPlain,
    /// HTML execution result.
    ResultHtml,
    /// Cell source, markdown or code, whichever the entity carries.
    Source,
}

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Symbolic identifier.
    pub id: FieldId,
    /// Index field names, in preference order.
    pub names: &'static [&'static str],
    /// Human-readable label.
    pub label: &'static str,
    /// Input hint for query editors.
    pub hint: Option<InputHint>,
}

/// Shorthand for a single-name entry.
const fn entry(
    id: FieldId,
    names: &'static [&'static str],
    label: &'static str,
    hint: Option<InputHint>,
) -> FieldSpec {
    FieldSpec {
        id,
        names,
        label,
        hint,
    }
}

/// All fields known to the index.
pub const CATALOG: &[FieldSpec] = &[
    entry(FieldId::FullText, &["_text_"], "Full text search", None),
    entry(FieldId::Owner, &["owner"], "Owner name", None),
    entry(FieldId::Path, &["filename"], "Path", None),
    entry(FieldId::Server, &["signature_server_url"], "Server URL", None),
    entry(FieldId::Cells, &["source"], "Text in cell", None),
    entry(FieldId::Outputs, &["outputs"], "Output of cell", None),
    entry(FieldId::CellMemes, &["lc_cell_memes"], "MEME of cell", None),
    entry(FieldId::Modified, &["mtime"], "Modified time", Some(InputHint::DateTime)),
    entry(
        FieldId::Executed,
        &["lc_cell_meme__execution_end_time"],
        "Executed time",
        Some(InputHint::DateTime),
    ),
    entry(
        FieldId::EstimatedModifiedTime,
        &["estimated_mtime"],
        "Executed/Modified",
        Some(InputHint::DateTime),
    ),
    entry(FieldId::CurrentMeme, &["lc_notebook_meme__current"], "MEME of notebook", None),
    entry(FieldId::SignatureNotebookPath, &["signature_notebook_path"], "File path", None),
    entry(FieldId::SourceCode, &["source__code"], "Text in code cell", None),
    entry(FieldId::SourceMarkdown, &["source__markdown"], "Text in markdown cell", None),
    entry(
        FieldId::OperationNote,
        &["source__markdown__operation_note"],
        "Text in Operation Note",
        None,
    ),
    entry(
        FieldId::NumberOfHeaders,
        &["source__markdown__heading_count"],
        "Number of headers in markdown cell",
        Some(InputHint::Number),
    ),
    entry(FieldId::SourceMarkdownTodo, &["source__markdown__todo"], "TODO in markdown cell", None),
    entry(
        FieldId::SourceMarkdownHeading,
        &["source__markdown__heading"],
        "Header in markdown cell",
        None,
    ),
    entry(
        FieldId::SourceMarkdownHashtags,
        &["source__markdown__hashtags"],
        "Hashtag in markdown cell",
        None,
    ),
    entry(FieldId::SourceMarkdownUrl, &["source__markdown__url"], "URL in markdown cell", None),
    entry(FieldId::SourceMarkdownCode, &["source__markdown__code"], "Code in markdown cell", None),
    entry(FieldId::Stdout, &["outputs__stdout"], "STDOUT of cell", None),
    entry(FieldId::Stderr, &["outputs__stderr"], "STDERR of cell", None),
    entry(FieldId::ResultPlain, &["outputs__result_plain"], "Result Text of cell", None),
    entry(FieldId::ResultHtml, &["outputs__result_html"], "Result HTML of cell", None),
    entry(FieldId::Source, &["source__markdown", "source__code"], "Source", None),
];

impl FieldId {
    /// Returns the catalog entry for this field.
    pub fn spec(self) -> &'static FieldSpec {
        CATALOG
            .iter()
            .find(|spec| spec.id == self)
            .unwrap_or(&CATALOG[0])
    }

    /// Every catalog field, in catalog order.
    pub fn all() -> impl Iterator<Item = Self> {
        CATALOG.iter().map(|spec| spec.id)
    }

    /// Fields that can appear in a structured query.
    pub fn searchable() -> impl Iterator<Item = Self> {
        Self::all().filter(|id| id.is_searchable())
    }

    /// The index column, alternates joined with `|`.
    pub fn column(self) -> String {
        self.spec().names.join("|")
    }

    /// Index field names in preference order.
    pub fn names(self) -> &'static [&'static str] {
        self.spec().names
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Input hint for query editors.
    pub fn hint(self) -> Option<InputHint> {
        self.spec().hint
    }

    /// Whether this field maps to exactly one index field.
    ///
    /// Alternate-list columns only exist in result listings and cannot be queried.
    pub fn is_searchable(self) -> bool {
        self.spec().names.len() == 1
    }

    /// Looks up a searchable field by its index name.
    pub fn from_index_name(name: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|spec| spec.names.len() == 1 && spec.names[0] == name)
            .map(|spec| spec.id)
    }

    /// Reads this field from a result entity, taking the first alternate present.
    pub fn value_in(self, entity: &Map<String, Value>) -> Option<&Value> {
        self.names().iter().find_map(|name| entity.get(*name))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column())
    }
}

impl FromStr for FieldId {
    type Err = CatalogError;

    /// Parses an index column, including alternate-list columns.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|spec| spec.names.join("|") == s)
            .map(|spec| spec.id)
            .ok_or_else(|| CatalogError::UnknownField(s.to_string()))
    }
}

impl TryFrom<String> for FieldId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.column()
    }
}

/// Expands a `|`-separated field list into searchable fields.
///
/// Empty segments are skipped; an unknown name fails the whole list.
pub fn parse_field_list(list: &str) -> Result<Vec<FieldId>, CatalogError> {
    list.split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            FieldId::from_index_name(name).ok_or_else(|| CatalogError::UnknownField(name.into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_field_has_an_entry() {
        for id in FieldId::all() {
            assert_eq!(id.spec().id, id);
        }
        assert_eq!(FieldId::all().count(), 26);
    }

    #[test]
    fn index_names_round_trip() {
        for id in FieldId::searchable() {
            assert_eq!(FieldId::from_index_name(&id.column()), Some(id));
        }
    }

    #[test]
    fn alternates_are_not_searchable() {
        assert!(!FieldId::Source.is_searchable());
        assert_eq!(FieldId::Source.column(), "source__markdown|source__code");
        assert_eq!(FieldId::from_index_name("source__markdown|source__code"), None);
        assert_eq!(
            "source__markdown|source__code".parse::<FieldId>(),
            Ok(FieldId::Source)
        );
    }

    #[test]
    fn labels_and_hints() {
        assert_eq!(FieldId::FullText.column(), "_text_");
        assert_eq!(FieldId::Owner.label(), "Owner name");
        assert_eq!(FieldId::Modified.hint(), Some(InputHint::DateTime));
        assert_eq!(FieldId::NumberOfHeaders.hint(), Some(InputHint::Number));
        assert_eq!(FieldId::Stdout.hint(), None);
    }

    #[test]
    fn unknown_field() {
        assert_eq!(
            "bogus_field".parse::<FieldId>(),
            Err(CatalogError::UnknownField("bogus_field".into()))
        );
    }

    #[test]
    fn value_in_prefers_first_alternate() {
        let markdown = json!({"source__markdown": "# Intro", "source__code": "x = 1"});
        let code = json!({"source__code": "x = 1"});
        let (Value::Object(markdown), Value::Object(code)) = (markdown, code) else {
            unreachable!()
        };
        assert_eq!(FieldId::Source.value_in(&markdown), Some(&json!("# Intro")));
        assert_eq!(FieldId::Source.value_in(&code), Some(&json!("x = 1")));
        assert_eq!(FieldId::Owner.value_in(&code), None);
    }

    #[test]
    fn field_list_expands() {
        assert_eq!(
            parse_field_list("source__markdown|source__code").unwrap(),
            vec![FieldId::SourceMarkdown, FieldId::SourceCode]
        );
        assert_eq!(parse_field_list("owner").unwrap(), vec![FieldId::Owner]);
        assert!(parse_field_list("owner|nope").is_err());
    }

    #[test]
    fn serde_uses_column_names() {
        assert_eq!(serde_json::to_string(&FieldId::Owner).unwrap(), "\"owner\"");
        let id: FieldId = serde_json::from_str("\"lc_cell_memes\"").unwrap();
        assert_eq!(id, FieldId::CellMemes);
        assert!(serde_json::from_str::<FieldId>("\"nope\"").is_err());
    }
}
