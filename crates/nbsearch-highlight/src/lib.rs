//! Syntax highlighting and terminal colors for nbsearch.
//!
//! Configuration, notebooks and directives are printed as highlighted TOML, JSON and
//! YAML. Colors are dropped when stdout is not a terminal or `NO_COLOR` is set, so
//! piped output stays plain text.

#![warn(missing_docs)]

use std::{
    env,
    io::{self, IsTerminal},
};

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Whether styled output should be written to stdout.
pub fn colors_enabled() -> bool {
    env::var_os("NO_COLOR").is_none_or(|value| value.is_empty()) && io::stdout().is_terminal()
}

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and YAML from the extra set.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
    /// When false, content passes through unchanged.
    enabled: bool,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme, colored only on a terminal.
    pub fn new() -> Self {
        Self::with_color(colors_enabled())
    }

    /// Creates a highlighter that always or never colors.
    pub fn with_color(enabled: bool) -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
            enabled,
        }
    }

    /// Highlights TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights YAML.
    pub fn highlight_yaml(&self, content: &str) -> String {
        self.highlight(content, "yaml")
    }

    /// Highlights content with the named syntax (extension or name).
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        if !self.enabled {
            return content.to_string();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps text in a style when colors are enabled.
fn styled(style: &str, text: &str) -> String {
    if colors_enabled() {
        format!("{style}{text}{}", colors::RESET)
    } else {
        text.to_string()
    }
}

/// Formats a header (bold cyan).
pub fn header(text: &str) -> String {
    styled(&format!("{}{}", colors::BOLD, colors::CYAN), text)
}

/// Formats a subheader (bold).
pub fn subheader(text: &str) -> String {
    styled(colors::BOLD, text)
}

/// Formats less important text.
pub fn dim(text: &str) -> String {
    styled(colors::DIM, text)
}

/// Formats a success message (green).
pub fn success(text: &str) -> String {
    styled(colors::GREEN, text)
}

/// Formats a warning (yellow).
pub fn warning(text: &str) -> String {
    styled(colors::YELLOW, text)
}

/// Formats an error (red).
pub fn error(text: &str) -> String {
    styled(colors::RED, text)
}

/// A dimmed horizontal rule.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}

/// Indents every line of a block by three spaces, matching list output.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("   {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_toml() {
        let hl = Highlighter::with_color(true);
        let output = hl.highlight_toml("[search]\nlimit = 50\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
    }

    #[test]
    fn highlights_json_and_yaml() {
        let hl = Highlighter::with_color(true);
        assert!(hl.highlight_json("{\"cells\": []}\n").contains("\x1b["));
        assert!(hl.highlight_yaml("query:\n  composition: AND\n").contains("\x1b["));
    }

    #[test]
    fn plain_when_disabled() {
        let hl = Highlighter::with_color(false);
        assert_eq!(hl.highlight_toml("limit = 50\n"), "limit = 50\n");
    }

    #[test]
    fn unknown_syntax_is_plain_text() {
        let hl = Highlighter::with_color(true);
        let output = hl.highlight("hello\n", "no-such-syntax");
        assert!(output.contains("hello"));
    }

    #[test]
    fn syntaxes_available() {
        let ss = extra_syntaxes();
        for ext in ["toml", "json", "yaml"] {
            assert!(ss.find_syntax_by_extension(ext).is_some(), "missing {ext}");
        }
    }

    #[test]
    fn indents_lines() {
        assert_eq!(indent_content("a\n\nb"), "   a\n\n   b");
    }

    #[test]
    fn styles_keep_text() {
        for styled in [header("T"), subheader("T"), dim("T"), success("T"), warning("T"), error("T")] {
            assert!(styled.contains('T'));
        }
    }
}
