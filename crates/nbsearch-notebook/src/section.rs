//! Splitting a notebook into sections at markdown headings.
//!
//! A section starts at a markdown cell whose first non-blank line is an ATX heading
//! and runs until the next such cell. Cells before the first heading form a leading
//! section with a synthesized title.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::cell::{Cell, CellType};

/// A contiguous run of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The heading line (`# Intro`), or `Section N` for a leading run without one.
    pub title: String,
    /// Index of the first cell.
    pub start_index: usize,
    /// Index of the last cell, inclusive.
    pub end_index: usize,
}

impl Section {
    /// The section's cells within the notebook they were partitioned from.
    pub fn cells<'a>(&self, cells: &'a [Cell]) -> &'a [Cell] {
        let end = self.end_index.saturating_add(1).min(cells.len());
        cells.get(self.start_index..end).unwrap_or_default()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.end_index
            .saturating_add(1)
            .saturating_sub(self.start_index)
    }

    /// Whether the section is empty. Partitioned sections never are.
    pub fn is_empty(&self) -> bool {
        self.end_index < self.start_index
    }

    /// Whether the section holds the cell at `index`.
    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    /// The title as rendered text, with heading markers and inline markup removed.
    pub fn plain_title(&self) -> String {
        render_heading(&self.title).map_or_else(|| self.title.clone(), |(_, text)| text)
    }

    /// Heading level (1-6), or `None` for a synthesized title.
    pub fn heading_level(&self) -> Option<u8> {
        render_heading(&self.title).map(|(level, _)| level)
    }
}

/// Extracts the heading line of a markdown cell.
///
/// Blank lines are skipped; the first non-blank line must start with `#`.
pub fn heading_text(cell: &Cell) -> Option<String> {
    if cell.cell_type != CellType::Markdown {
        return None;
    }
    cell.source
        .lines()
        .into_iter()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| line.starts_with('#'))
        .map(String::from)
}

/// Partitions cells into sections.
///
/// The result covers every index exactly once, in order. Empty input yields no sections.
pub fn partition(cells: &[Cell]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut start = 0;

    for (index, cell) in cells.iter().enumerate() {
        if index > start && heading_text(cell).is_some() {
            sections.push(close_section(cells, start, index - 1, sections.len()));
            start = index;
        }
    }

    if start < cells.len() {
        sections.push(close_section(cells, start, cells.len() - 1, sections.len()));
    }

    sections
}

/// Builds the section `[start, end]`, titled after its first cell.
fn close_section(cells: &[Cell], start: usize, end: usize, count: usize) -> Section {
    let title = heading_text(&cells[start]).unwrap_or_else(|| format!("Section {}", count + 1));
    Section {
        title,
        start_index: start,
        end_index: end,
    }
}

/// Renders a heading line with a CommonMark parser, returning its level and text.
fn render_heading(line: &str) -> Option<(u8, String)> {
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new(line) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading)) = current {
                    heading.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                return current
                    .take()
                    .map(|(level, text)| (heading_level_to_u8(level), text.trim().to_string()));
            }
            _ => {}
        }
    }

    None
}

/// Converts a pulldown_cmark HeadingLevel to a u8 (1-6).
fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
