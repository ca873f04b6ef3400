//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word. Wildcards and backslash escapes are kept verbatim.
    Term(String),

    /// A quoted phrase (quotes stripped, content preserved).
    Phrase {
        /// Text between the quotes.
        text: String,
        /// Proximity or boost suffix attached to the closing quote (`~2`, `^3`).
        modifier: Option<String>,
    },

    /// A range such as `[1 TO 10]`, brackets included.
    Range(String),

    /// Field prefix (e.g., "owner:" produces FieldPrefix("owner")).
    FieldPrefix(String),

    /// The AND keyword (or `&&`).
    And,

    /// The OR keyword (or `||`).
    Or,

    /// The NOT keyword or a `-` prefix.
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,
}

/// A token together with the byte offset where it starts.
pub(crate) type Spanned = (Token, usize);

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens: Vec<Spanned> = Vec::new();

        loop {
            let skipped = self.skip_whitespace();
            // A value glued to its field prefix may contain colons and leading dashes.
            let value_mode = !skipped && matches!(tokens.last(), Some((Token::FieldPrefix(_), _)));
            let start = self.position;
            match self.next_token(value_mode)? {
                Some(token) => tokens.push((token, start)),
                None => break,
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self, value_mode: bool) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_phrase().map(Some),
            '[' | '{' => self.read_range().map(Some),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '-' if !value_mode && self.starts_prefix_operator() => {
                self.advance();
                Ok(Some(Token::Not))
            }
            _ => self.read_term_or_keyword(value_mode),
        }
    }

    /// Checks whether the `-` under the cursor negates the following expression.
    fn starts_prefix_operator(&self) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next().is_some_and(|c| !c.is_whitespace())
    }

    /// Reads a quoted phrase and an optional `~N` / `^N` modifier.
    fn read_phrase(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut text = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance();
                    break;
                }
                Some(&'\\') => {
                    text.push('\\');
                    self.advance();
                    if let Some(&escaped) = self.chars.peek() {
                        text.push(escaped);
                        self.advance();
                    }
                }
                Some(&ch) => {
                    text.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed quote", start_pos)),
            }
        }

        let modifier = match self.chars.peek() {
            Some(&sigil @ ('~' | '^')) => {
                self.advance();
                let mut modifier = String::from(sigil);
                while let Some(&ch) = self.chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        modifier.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(modifier)
            }
            _ => None,
        };

        Ok(Token::Phrase { text, modifier })
    }

    /// Reads a bracketed range verbatim, e.g. `[NOW-1YEAR TO NOW]` or `{1 TO 5]`.
    fn read_range(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        let mut raw = String::new();

        if let Some(&open) = self.chars.peek() {
            raw.push(open);
            self.advance();
        }

        loop {
            match self.chars.peek() {
                Some(&close @ (']' | '}')) => {
                    raw.push(close);
                    self.advance();
                    return Ok(Token::Range(raw));
                }
                Some(&ch) => {
                    raw.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed range", start_pos)),
            }
        }
    }

    /// Reads a term, keyword (AND/OR/NOT), or field prefix.
    fn read_term_or_keyword(&mut self, value_mode: bool) -> Result<Option<Token>, LexError> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }

            if ch == '\\' {
                word.push(ch);
                self.advance();
                if let Some(&escaped) = self.chars.peek() {
                    word.push(escaped);
                    self.advance();
                }
                continue;
            }

            if ch == ':' && !value_mode {
                self.advance(); // consume the colon
                if word.is_empty() {
                    // Bare colon, treat as part of next term
                    continue;
                }
                return Ok(Some(Token::FieldPrefix(word)));
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            // Only stray colons were consumed; continue with whatever follows.
            self.skip_whitespace();
            return self.next_token(false);
        }

        if !value_mode {
            match word.as_str() {
                "AND" | "&&" => return Ok(Some(Token::And)),
                "OR" | "||" => return Ok(Some(Token::Or)),
                "NOT" => return Ok(Some(Token::Not)),
                _ => {}
            }
        }

        Ok(Some(Token::Term(word)))
    }

    /// Skips whitespace characters, returning whether any were skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.position != start
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string, keeping the byte offset of every token.
pub(crate) fn tokenize_spanned(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|(token, _)| token)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Token {
        Token::Term(s.into())
    }

    fn field(s: &str) -> Token {
        Token::FieldPrefix(s.into())
    }

    fn phrase(s: &str) -> Token {
        Token::Phrase {
            text: s.into(),
            modifier: None,
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn single_term() {
        assert_eq!(tokenize("python").unwrap(), vec![term("python")]);
    }

    #[test]
    fn field_value() {
        assert_eq!(
            tokenize("owner:alice").unwrap(),
            vec![field("owner"), term("alice")]
        );
    }

    #[test]
    fn boolean_keywords() {
        assert_eq!(
            tokenize("owner:a AND source:b OR c").unwrap(),
            vec![
                field("owner"),
                term("a"),
                Token::And,
                field("source"),
                term("b"),
                Token::Or,
                term("c"),
            ]
        );
    }

    #[test]
    fn lowercase_keywords_are_terms() {
        assert_eq!(
            tokenize("cats and dogs").unwrap(),
            vec![term("cats"), term("and"), term("dogs")]
        );
    }

    #[test]
    fn symbolic_operators() {
        assert_eq!(
            tokenize("a && b || c").unwrap(),
            vec![term("a"), Token::And, term("b"), Token::Or, term("c")]
        );
    }

    #[test]
    fn negation_forms() {
        assert_eq!(
            tokenize("NOT owner:a -b").unwrap(),
            vec![Token::Not, field("owner"), term("a"), Token::Not, term("b")]
        );
    }

    #[test]
    fn lone_dash_is_a_term() {
        assert_eq!(tokenize("a - b").unwrap(), vec![term("a"), term("-"), term("b")]);
    }

    #[test]
    fn hyphenated_word_stays_whole() {
        assert_eq!(
            tokenize("fc68b4b4-2927-11e9").unwrap(),
            vec![term("fc68b4b4-2927-11e9")]
        );
    }

    #[test]
    fn value_may_contain_colons() {
        assert_eq!(
            tokenize("signature_server_url:http://host:8888/").unwrap(),
            vec![field("signature_server_url"), term("http://host:8888/")]
        );
    }

    #[test]
    fn value_may_start_with_dash() {
        assert_eq!(
            tokenize("source__markdown__heading_count:-1").unwrap(),
            vec![field("source__markdown__heading_count"), term("-1")]
        );
    }

    #[test]
    fn quoted_phrase() {
        assert_eq!(
            tokenize("owner:\"John Doe\"").unwrap(),
            vec![field("owner"), phrase("John Doe")]
        );
    }

    #[test]
    fn phrase_modifier() {
        assert_eq!(
            tokenize("\"import pandas\"~2").unwrap(),
            vec![Token::Phrase {
                text: "import pandas".into(),
                modifier: Some("~2".into()),
            }]
        );
    }

    #[test]
    fn escaped_quote_in_phrase() {
        assert_eq!(
            tokenize(r#""say \"hi\"""#).unwrap(),
            vec![phrase(r#"say \"hi\""#)]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("owner:\"alice").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.message.contains("unclosed quote"));
    }

    #[test]
    fn range_is_verbatim() {
        assert_eq!(
            tokenize("mtime:[NOW-1YEAR TO NOW]").unwrap(),
            vec![field("mtime"), Token::Range("[NOW-1YEAR TO NOW]".into())]
        );
        assert_eq!(
            tokenize("n:{1 TO 5]").unwrap(),
            vec![field("n"), Token::Range("{1 TO 5]".into())]
        );
    }

    #[test]
    fn unclosed_range_error() {
        let err = tokenize("mtime:[NOW TO").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.message.contains("unclosed range"));
    }

    #[test]
    fn escaped_colon_stays_in_term() {
        assert_eq!(tokenize(r"a\:b").unwrap(), vec![term(r"a\:b")]);
    }

    #[test]
    fn wildcards_are_terms() {
        assert_eq!(
            tokenize("_text_:* owner:ali?e*").unwrap(),
            vec![field("_text_"), term("*"), field("owner"), term("ali?e*")]
        );
    }

    #[test]
    fn parentheses_and_field_groups() {
        assert_eq!(
            tokenize("owner:(a OR b)").unwrap(),
            vec![
                field("owner"),
                Token::LParen,
                term("a"),
                Token::Or,
                term("b"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn keyword_after_spaced_prefix() {
        assert_eq!(
            tokenize("owner: AND b").unwrap(),
            vec![field("owner"), Token::And, term("b")]
        );
    }

    #[test]
    fn positions_are_byte_offsets() {
        let spanned = tokenize_spanned("é owner:x").unwrap();
        let offsets: Vec<usize> = spanned.iter().map(|(_, pos)| *pos).collect();
        assert_eq!(offsets, vec![0, 3, 9]);
    }
}
