//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
pub use nbsearch_highlight::{dim, header, subheader, success, warning};
use nbsearch_notebook::Section;
use nbsearch_search::{
    CompositeQuery, Entity, FieldId, InputHint, MarkdownSearch, PageQuery, SearchResponse,
};
use serde::Serialize;
use serde_json::Value;

/// Longest cell text shown in a table column.
const MAX_CELL_WIDTH: usize = 60;

/// JSON output for one section.
#[derive(Serialize)]
pub struct JsonSection {
    /// Heading line of the section.
    pub title: String,
    /// Heading text without markdown markup.
    pub plain_title: String,
    /// Heading level, when the section starts with a heading.
    pub level: Option<u8>,
    /// First cell index.
    pub start_index: usize,
    /// Last cell index, inclusive.
    pub end_index: usize,
}

impl From<&Section> for JsonSection {
    fn from(section: &Section) -> Self {
        Self {
            title: section.title.clone(),
            plain_title: section.plain_title(),
            level: section.heading_level(),
            start_index: section.start_index,
            end_index: section.end_index,
        }
    }
}

/// JSON output for one heading or hashtag search.
#[derive(Serialize)]
pub struct JsonTag {
    /// Index of the markdown cell.
    pub index: usize,
    /// The heading or hashtag.
    #[serde(flatten)]
    pub search: MarkdownSearch,
    /// Query string finding cells with the same heading or hashtag.
    pub query: String,
}

impl JsonTag {
    /// Pairs a search with the cell it came from.
    pub fn new(index: usize, search: MarkdownSearch) -> Self {
        let query = search.query_string();
        Self {
            index,
            search,
            query,
        }
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// A table with the standard look.
fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Shortens text to one line of at most `MAX_CELL_WIDTH` characters.
pub fn truncate(text: &str) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or_default().trim();
    let more = line.chars().count() > MAX_CELL_WIDTH || text.trim().lines().count() > 1;
    let mut short: String = line.chars().take(MAX_CELL_WIDTH).collect();
    if more {
        short.push('…');
    }
    short
}

/// Display text of an entity value.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

/// Table of search hits with the given columns.
pub fn results_table(entities: &[Entity], columns: &[FieldId]) -> Table {
    let mut table = new_table();
    table.set_header(columns.iter().map(|column| column.label()));
    for entity in entities {
        table.add_row(columns.iter().map(|column| {
            let text = column.value_in(entity).map(value_text).unwrap_or_default();
            Cell::new(truncate(&text))
        }));
    }
    table
}

/// Position and paging summary of a response, e.g. `0-50 / 230 (next: --start 50)`.
pub fn page_summary(response: &SearchResponse) -> String {
    let page = PageQuery {
        start: response.start,
        limit: response.limit,
    };
    let mut summary = page.label(response.num_found);
    let mut moves = Vec::new();
    if let Some(previous) = page.previous() {
        moves.push(format!("previous: --start {}", previous.start));
    }
    if let Some(next) = page.next(response.num_found) {
        moves.push(format!("next: --start {}", next.start));
    }
    if !moves.is_empty() {
        summary.push_str(&format!(" ({})", moves.join(", ")));
    }
    summary
}

/// Table of a notebook's sections.
pub fn sections_table(sections: &[Section]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Cells", "Level", "Title"]);
    for (i, section) in sections.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{}-{}", section.start_index, section.end_index)),
            Cell::new(section.heading_level().map(|l| l.to_string()).unwrap_or_default()),
            Cell::new(truncate(&section.plain_title())),
        ]);
    }
    table
}

/// Table of heading and hashtag searches.
pub fn tags_table(tags: &[JsonTag]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Cell", "Kind", "Text", "Query"]);
    for tag in tags {
        table.add_row(vec![
            Cell::new(tag.index),
            Cell::new(tag.search.kind()),
            Cell::new(truncate(tag.search.text())),
            Cell::new(&tag.query),
        ]);
    }
    table
}

/// Table of the conditions of a composite query.
pub fn composite_table(query: &CompositeQuery) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Field", "Label", "Value"]);
    for condition in &query.fields {
        table.add_row(vec![
            Cell::new(condition.target.column()),
            Cell::new(condition.target.label()),
            Cell::new(&condition.query),
        ]);
    }
    table
}

/// Table of the searchable catalog fields.
pub fn fields_table() -> Table {
    let mut table = new_table();
    table.set_header(vec!["Field", "Label", "Input"]);
    for field in FieldId::searchable() {
        let hint = match field.hint() {
            Some(InputHint::Number) => "number",
            Some(InputHint::DateTime) => "datetime",
            None => "",
        };
        table.add_row(vec![
            Cell::new(field.column()),
            Cell::new(field.label()),
            Cell::new(hint),
        ]);
    }
    table
}
