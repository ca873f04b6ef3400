//! Searches started from a rendered markdown cell.
//!
//! Headings and `#hashtags` in markdown cells are indexed into their own fields, so a
//! heading or a tag in one notebook leads to every cell that carries the same one.

use std::fmt;

use serde::Serialize;

use crate::{fields::FieldId, params::SearchQuery};

/// A heading or hashtag found in a markdown cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum MarkdownSearch {
    /// A hashtag, `#` included.
    Hashtag(String),
    /// Heading text without markers.
    Heading(String),
}

impl MarkdownSearch {
    /// The index field searched.
    pub fn field(&self) -> FieldId {
        match self {
            Self::Hashtag(_) => FieldId::SourceMarkdownHashtags,
            Self::Heading(_) => FieldId::SourceMarkdownHeading,
        }
    }

    /// The hashtag or heading text.
    pub fn text(&self) -> &str {
        match self {
            Self::Hashtag(text) | Self::Heading(text) => text,
        }
    }

    /// Kind name as shown to users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hashtag(_) => "hashtag",
            Self::Heading(_) => "heading",
        }
    }

    /// The query string, matching the text as one phrase.
    pub fn query_string(&self) -> String {
        format!("{}:{}", self.field().column(), phrase(self.text()))
    }

    /// The search for cells carrying the same heading or hashtag.
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.query_string())
    }
}

impl fmt::Display for MarkdownSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Quotes text as a phrase, escaping quotes and backslashes.
fn phrase(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Finds hashtags in plain text: a `#` followed by characters that are neither
/// whitespace nor `#`.
///
/// A run of `#` only starts a tag at its last `#`, and a lone `#` is not a tag.
pub fn find_hashtags(text: &str) -> Vec<&str> {
    let mut tags = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    while let Some(pos) = rest.find('#') {
        let start = offset + pos;
        let body = &text[start + 1..];
        let len = body
            .find(|c: char| c.is_whitespace() || c == '#')
            .unwrap_or(body.len());
        let end = start + 1 + len;
        if len > 0 {
            tags.push(&text[start..end]);
        }
        offset = if len > 0 { end } else { start + 1 };
        rest = &text[offset..];
    }

    tags
}

/// Whether a markdown source has an ATX heading line: one to six `#` then whitespace.
pub fn has_heading_line(source: &str) -> bool {
    source.lines().any(|line| {
        let hashes = line.chars().take_while(|&c| c == '#').count();
        (1..=6).contains(&hashes) && line[hashes..].starts_with(char::is_whitespace)
    })
}
