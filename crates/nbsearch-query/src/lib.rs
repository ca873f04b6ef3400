//! Boolean query parsing and AST for nbsearch.
//!
//! nbsearch talks to a Solr index, so users type queries in a simplified Solr syntax:
//!
//! - **Tags**: `owner:alice` - a value scoped to an index field
//! - **Implicit field**: `pandas` - a value searched in the default (full-text) field
//! - **Phrases**: `source:"import pandas"` - exact sequences, quotes preserved
//! - **Ranges**: `mtime:[NOW-1YEAR TO NOW]` - kept verbatim
//! - **Boolean operators**: `a AND b`, `a OR b`, adjacency as implicit AND
//! - **Negation**: `NOT a`, `-a`
//! - **Grouping**: `(a OR b) AND c`, `owner:(a OR b)`
//!
//! The parser keeps the binary shape of the input (`a AND b AND c` is
//! `AND(AND(a, b), c)`) so callers can tell a flat condition list from a nested one.
//!
//! # Example
//!
//! ```
//! use nbsearch_query::{QueryExpr, parse};
//!
//! let expr = parse("owner:alice AND source:pandas").unwrap().unwrap();
//! assert!(matches!(expr, QueryExpr::Logical { .. }));
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{BoolOp, FieldRef, QueryExpr, TagValue};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
