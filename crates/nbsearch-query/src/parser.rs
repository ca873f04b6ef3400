//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → unary (("AND")? unary)*
//! unary      → ("NOT" | "-") unary | primary
//! primary    → tag | "(" or_expr ")" | FIELD_PREFIX "(" or_expr ")"
//! tag        → FIELD_PREFIX? value
//! value      → TERM | PHRASE | RANGE | ε
//! ```
//!
//! The empty value is only accepted after a field prefix.
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Field prefix: `field:`
//! 3. Negation: `NOT`, `-`
//! 4. AND (explicit or implicit between adjacent expressions)
//! 5. OR

use std::mem;

use crate::{
    ast::{BoolOp, QueryExpr, TagValue},
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize_spanned},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse, with byte offsets.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Option<QueryExpr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            let message = match token {
                Token::RParen => "unexpected closing parenthesis".to_string(),
                other => format!("unexpected token: {other:?}"),
            };
            return Err(ParseError::new(message, self.offset()));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance(); // consume OR
            self.expect_operand(BoolOp::Or)?;
            let right = self.parse_and_expr()?;
            left = QueryExpr::logical(BoolOp::Or, left, right);
        }

        Ok(left)
    }

    /// Parses: and_expr → unary (("AND")? unary)*
    fn parse_and_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            if self.check(&Token::And) {
                self.advance(); // consume AND
                self.expect_operand(BoolOp::And)?;
                let right = self.parse_unary()?;
                left = QueryExpr::logical(BoolOp::And, left, right);
            } else if self.can_start_unary() {
                let right = self.parse_unary()?;
                left = QueryExpr::implicit_and(left, right);
            } else {
                break;
            }
        }

        Ok(left)
    }

    /// Fails when an operator is the last token of the query.
    fn expect_operand(&self, operator: BoolOp) -> Result<(), ParseError> {
        if self.peek().is_none() {
            return Err(ParseError::new(
                format!("expected expression after {}", operator.keyword()),
                None,
            ));
        }
        Ok(())
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Term(_)
                    | Token::Phrase { .. }
                    | Token::Range(_)
                    | Token::Not
                    | Token::LParen
                    | Token::FieldPrefix(_)
            )
        )
    }

    /// Parses: unary → ("NOT" | "-") unary | primary
    fn parse_unary(&mut self) -> Result<QueryExpr, ParseError> {
        if self.check(&Token::Not) {
            self.advance(); // consume NOT
            if self.peek().is_none() {
                return Err(ParseError::new("expected expression after NOT", None));
            }
            let expr = self.parse_unary()?;
            return Ok(QueryExpr::Not(Box::new(expr)));
        }

        self.parse_primary()
    }

    /// Parses: primary → tag | "(" or_expr ")" | FIELD_PREFIX "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<QueryExpr, ParseError> {
        match self.peek().cloned() {
            Some(Token::Term(_) | Token::Phrase { .. } | Token::Range(_)) => {
                Ok(QueryExpr::bare(self.take_value()))
            }

            Some(Token::FieldPrefix(name)) => {
                self.advance();
                self.parse_field_expr(name)
            }

            Some(Token::LParen) => {
                let expr = self.parse_group("expected closing parenthesis")?;
                Ok(QueryExpr::Group {
                    field: None,
                    expr: Box::new(expr),
                })
            }

            Some(Token::RParen) => Err(ParseError::new(
                "unexpected closing parenthesis",
                self.offset(),
            )),

            Some(Token::Or) => Err(ParseError::new(
                "unexpected OR (needs expression before it)",
                self.offset(),
            )),

            Some(Token::And) => Err(ParseError::new(
                "unexpected AND (needs expression before it)",
                self.offset(),
            )),

            Some(Token::Not) => Err(ParseError::new("unexpected negation", self.offset())),

            None => Err(ParseError::new("unexpected end of query", None)),
        }
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String) -> Result<QueryExpr, ParseError> {
        match self.peek() {
            Some(Token::Term(_) | Token::Phrase { .. } | Token::Range(_)) => {
                Ok(QueryExpr::tag(name, self.take_value()))
            }
            Some(Token::LParen) => {
                let expr =
                    self.parse_group("expected closing parenthesis after field expression")?;
                Ok(QueryExpr::Group {
                    field: Some(name),
                    expr: Box::new(expr),
                })
            }
            // Nothing usable follows the prefix: `owner:` alone, before `)`, or before an operator.
            _ => Ok(QueryExpr::tag(name, TagValue::Empty)),
        }
    }

    /// Consumes a TERM, PHRASE or RANGE token and converts it into a tag value.
    fn take_value(&mut self) -> TagValue {
        let value = match self.peek().cloned() {
            Some(Token::Term(text)) => TagValue::Literal(text),
            Some(Token::Phrase { text, modifier }) => TagValue::Quoted { text, modifier },
            Some(Token::Range(raw)) => TagValue::Range(raw),
            _ => TagValue::Empty,
        };
        self.advance();
        value
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self, missing_rparen_msg: &str) -> Result<QueryExpr, ParseError> {
        self.advance(); // consume (
        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(ParseError::new(missing_rparen_msg, self.offset()));
        }
        self.advance(); // consume )

        Ok(inner)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    /// Byte offset of the current token, `None` at end of input.
    fn offset(&self) -> Option<usize> {
        self.tokens.get(self.position).map(|(_, offset)| *offset)
    }

    /// Checks if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into an AST.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(expr))` for valid queries,
/// or `Err(QueryError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<QueryExpr>, QueryError> {
    let tokens = tokenize_spanned(input)?;
    Parser::new(tokens)
        .parse()
        .map_err(|err| QueryError::from_parse(err, input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> TagValue {
        TagValue::Literal(s.into())
    }

    fn bare(s: &str) -> QueryExpr {
        QueryExpr::bare(lit(s))
    }

    fn tag(field: &str, s: &str) -> QueryExpr {
        QueryExpr::tag(field, lit(s))
    }

    fn and(l: QueryExpr, r: QueryExpr) -> QueryExpr {
        QueryExpr::logical(BoolOp::And, l, r)
    }

    fn or(l: QueryExpr, r: QueryExpr) -> QueryExpr {
        QueryExpr::logical(BoolOp::Or, l, r)
    }

    fn not(e: QueryExpr) -> QueryExpr {
        QueryExpr::Not(Box::new(e))
    }

    fn group(field: Option<&str>, e: QueryExpr) -> QueryExpr {
        QueryExpr::Group {
            field: field.map(String::from),
            expr: Box::new(e),
        }
    }

    #[test]
    fn empty_query() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn single_tag() {
        assert_eq!(parse("owner:alice").unwrap(), Some(tag("owner", "alice")));
    }

    #[test]
    fn bare_term() {
        assert_eq!(parse("pandas").unwrap(), Some(bare("pandas")));
    }

    #[test]
    fn and_is_left_associative() {
        assert_eq!(
            parse("a AND b AND c").unwrap(),
            Some(and(and(bare("a"), bare("b")), bare("c")))
        );
    }

    #[test]
    fn adjacency_is_implicit_and() {
        assert_eq!(
            parse("a b").unwrap(),
            Some(QueryExpr::implicit_and(bare("a"), bare("b")))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("a OR b AND c").unwrap(),
            Some(or(bare("a"), and(bare("b"), bare("c"))))
        );
        assert_eq!(
            parse("a AND b OR c").unwrap(),
            Some(or(and(bare("a"), bare("b")), bare("c")))
        );
    }

    #[test]
    fn negation() {
        assert_eq!(parse("NOT a").unwrap(), Some(not(bare("a"))));
        assert_eq!(parse("-owner:a").unwrap(), Some(not(tag("owner", "a"))));
        assert_eq!(parse("--a").unwrap(), Some(not(not(bare("a")))));
    }

    #[test]
    fn grouping() {
        assert_eq!(
            parse("(a OR b) AND c").unwrap(),
            Some(and(group(None, or(bare("a"), bare("b"))), bare("c")))
        );
    }

    #[test]
    fn field_group() {
        assert_eq!(
            parse("owner:(a OR b)").unwrap(),
            Some(group(Some("owner"), or(bare("a"), bare("b"))))
        );
    }

    #[test]
    fn empty_field_value() {
        assert_eq!(
            parse("owner:").unwrap(),
            Some(QueryExpr::tag("owner", TagValue::Empty))
        );
        assert_eq!(
            parse("owner: AND b").unwrap(),
            Some(and(QueryExpr::tag("owner", TagValue::Empty), bare("b")))
        );
        assert_eq!(
            parse("(owner:)").unwrap(),
            Some(group(None, QueryExpr::tag("owner", TagValue::Empty)))
        );
    }

    #[test]
    fn phrase_and_range_values() {
        assert_eq!(
            parse("source:\"import pandas\"^2").unwrap(),
            Some(QueryExpr::tag(
                "source",
                TagValue::Quoted {
                    text: "import pandas".into(),
                    modifier: Some("^2".into()),
                }
            ))
        );
        assert_eq!(
            parse("mtime:[NOW-1DAY TO NOW]").unwrap(),
            Some(QueryExpr::tag(
                "mtime",
                TagValue::Range("[NOW-1DAY TO NOW]".into())
            ))
        );
    }

    #[test]
    fn unclosed_group_error() {
        let err = parse("(a OR b").unwrap_err();
        assert!(err.message().contains("closing parenthesis"));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn unexpected_rparen_error() {
        let err = parse("a)").unwrap_err();
        assert!(err.message().contains("unexpected closing parenthesis"));
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn leading_operator_error() {
        let err = parse("OR a").unwrap_err();
        assert!(err.message().contains("unexpected OR"));
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn trailing_operator_error() {
        let err = parse("owner:a AND").unwrap_err();
        assert_eq!(err.message(), "expected expression after AND");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn dangling_not_error() {
        assert!(parse("a NOT").is_err());
    }

    #[test]
    fn lex_error_propagates() {
        let err = parse("owner:\"alice").unwrap_err();
        assert!(err.message().contains("unclosed quote"));
        assert_eq!(err.query, "owner:\"alice");
    }

    #[test]
    fn query_string_reparses_to_same_tree() {
        for query in [
            "owner:alice AND source:pandas",
            "a b OR c",
            "NOT owner:(a OR b) mtime:[1 TO 2]",
            "source:\"x y\"~3 OR _text_:*",
        ] {
            let expr = parse(query).unwrap().unwrap();
            let again = parse(&expr.to_query_string()).unwrap().unwrap();
            assert_eq!(expr, again, "query: {query}");
        }
    }
}
