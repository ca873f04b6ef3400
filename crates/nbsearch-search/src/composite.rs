//! Structured queries: a flat list of field conditions joined by one operator.

use std::fmt;

use nbsearch_query::BoolOp;
use serde::{Deserialize, Serialize};

use crate::fields::FieldId;

/// How the conditions of a composite query are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Composition {
    /// Every condition must match.
    #[default]
    And,
    /// Any condition may match.
    Or,
}

impl Composition {
    /// The keyword used in query strings.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Parses `AND` / `OR`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if s.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

impl From<BoolOp> for Composition {
    fn from(op: BoolOp) -> Self {
        match op {
            BoolOp::And => Self::And,
            BoolOp::Or => Self::Or,
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One `field:value` condition. The value is passed to the index untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The field searched.
    pub target: FieldId,
    /// The value expression, e.g. `pandas`, `"import os"`, `[* TO NOW]`.
    pub query: String,
}

impl Condition {
    /// Creates a condition.
    pub fn new(target: FieldId, query: impl Into<String>) -> Self {
        Self {
            target,
            query: query.into(),
        }
    }
}

/// A flat, single-operator list of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeQuery {
    /// Operator joining all conditions.
    pub composition: Composition,
    /// The conditions, in query order.
    pub fields: Vec<Condition>,
}

impl CompositeQuery {
    /// Creates a composite query.
    pub fn new(composition: Composition, fields: Vec<Condition>) -> Self {
        Self {
            composition,
            fields,
        }
    }

    /// Whether the query has no conditions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for CompositeQuery {
    /// Full-text wildcard, the state of a fresh search form.
    fn default() -> Self {
        Self::new(Composition::And, vec![Condition::new(FieldId::FullText, "*")])
    }
}
