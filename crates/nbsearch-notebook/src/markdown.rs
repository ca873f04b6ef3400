//! Headings and hashtags of markdown cells, as search starting points.

use nbsearch_search::{MarkdownSearch, find_hashtags, has_heading_line};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, TextMergeStream};

use crate::cell::{Cell, CellType};

/// The headings and hashtags a markdown cell renders, in document order.
///
/// Hashtags inside links, images and code are ignored. Duplicates are dropped.
pub fn markdown_searches(cell: &Cell) -> Vec<MarkdownSearch> {
    if cell.cell_type != CellType::Markdown {
        return Vec::new();
    }
    let source = cell.source.text();
    if !source.contains('#') {
        return Vec::new();
    }
    let want_headings = has_heading_line(&source);

    let mut found: Vec<MarkdownSearch> = Vec::new();
    let mut heading: Option<String> = None;
    let mut opaque = 0usize;

    for event in TextMergeStream::new(Parser::new(&source)) {
        match event {
            Event::Start(Tag::Heading { .. }) => heading = Some(String::new()),
            Event::End(TagEnd::Heading(_)) => {
                let text = heading.take().map(|text| text.trim().to_string());
                if let Some(text) = text.filter(|text| want_headings && !text.is_empty()) {
                    push_unique(&mut found, MarkdownSearch::Heading(text));
                }
            }
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => opaque += 1,
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque = opaque.saturating_sub(1);
            }
            Event::Text(text) => {
                if let Some(heading) = heading.as_mut() {
                    heading.push_str(&text);
                }
                if opaque == 0 {
                    for tag in find_hashtags(&text) {
                        push_unique(&mut found, MarkdownSearch::Hashtag(tag.to_string()));
                    }
                }
            }
            Event::Code(code) => {
                if let Some(heading) = heading.as_mut() {
                    heading.push_str(&code);
                }
            }
            _ => {}
        }
    }

    found
}

/// Appends unless already present.
fn push_unique(found: &mut Vec<MarkdownSearch>, item: MarkdownSearch) {
    if !found.contains(&item) {
        found.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A hashtag search.
    fn hashtag(text: &str) -> MarkdownSearch {
        MarkdownSearch::Hashtag(text.into())
    }

    /// A heading search.
    fn heading(text: &str) -> MarkdownSearch {
        MarkdownSearch::Heading(text.into())
    }

    #[test]
    fn headings_and_tags_in_order() {
        let cell = Cell::markdown("# Load *raw* data\n\nUses #pandas and #io.\n\n## Clean `df`\n");
        assert_eq!(
            markdown_searches(&cell),
            [
                heading("Load raw data"),
                hashtag("#pandas"),
                hashtag("#io."),
                heading("Clean df"),
            ]
        );
    }

    #[test]
    fn tags_in_code_and_links_are_ignored() {
        let cell = Cell::markdown(
            "Run `#notatag` or see [#linked](https://example.org/#frag).\n\n\
             ```\n# comment #code\n```\n\n#kept",
        );
        assert_eq!(markdown_searches(&cell), [hashtag("#kept")]);
    }

    #[test]
    fn duplicates_and_hash_runs() {
        let cell = Cell::markdown("#a and #a again, ##b and a lone # here");
        assert_eq!(markdown_searches(&cell), [hashtag("#a"), hashtag("#b")]);
    }

    #[test]
    fn setext_headings_are_not_heading_searches() {
        let cell = Cell::markdown("Title #t\n=====\n");
        assert_eq!(markdown_searches(&cell), [hashtag("#t")]);
    }

    #[test]
    fn code_cells_and_plain_text() {
        assert!(markdown_searches(&Cell::code("# Not markdown #tag")).is_empty());
        assert!(markdown_searches(&Cell::markdown("just text")).is_empty());
        assert!(markdown_searches(&Cell::markdown("#")).is_empty());
    }

    #[test]
    fn heading_carries_its_tags() {
        let cell = Cell::markdown("### Results #final");
        assert_eq!(
            markdown_searches(&cell),
            [hashtag("#final"), heading("Results #final")]
        );
    }
}
