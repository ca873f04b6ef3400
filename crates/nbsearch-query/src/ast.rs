//! Query abstract syntax tree.
//!
//! Represents parsed query expressions before they are structured into condition lists.

use std::fmt;

/// Boolean operator joining two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Both sides must match.
    And,
    /// Either side may match.
    Or,
}

impl BoolOp {
    /// The keyword used in query strings.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// The field a tag is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// No field prefix; the search engine's default field applies.
    Implicit,
    /// An explicit `name:` prefix.
    Named(String),
}

/// The value side of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// A bare term, wildcards and escapes verbatim.
    Literal(String),
    /// A quoted phrase.
    Quoted {
        /// Text between the quotes.
        text: String,
        /// Attached `~N` or `^N` suffix.
        modifier: Option<String>,
    },
    /// A range such as `[1 TO 5]`, brackets included.
    Range(String),
    /// A field prefix with nothing after it.
    Empty,
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) | Self::Range(s) => f.write_str(s),
            Self::Quoted { text, modifier } => {
                write!(f, "\"{text}\"")?;
                if let Some(m) = modifier {
                    f.write_str(m)?;
                }
                Ok(())
            }
            Self::Empty => Ok(()),
        }
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// A single field:value leaf.
    Tag {
        /// Field the value is scoped to.
        field: FieldRef,
        /// The value.
        value: TagValue,
    },

    /// A binary boolean expression.
    Logical {
        /// The operator.
        operator: BoolOp,
        /// Whether the operator was implied by adjacency rather than written.
        implicit: bool,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// Negation: results must NOT match this expression.
    Not(Box<Self>),

    /// A parenthesized expression, optionally scoped to a field (`owner:(a OR b)`).
    Group {
        /// Field prefix in front of the parentheses.
        field: Option<String>,
        /// The enclosed expression.
        expr: Box<Self>,
    },
}

impl QueryExpr {
    /// Creates a tag scoped to a named field.
    pub fn tag(field: impl Into<String>, value: TagValue) -> Self {
        Self::Tag {
            field: FieldRef::Named(field.into()),
            value,
        }
    }

    /// Creates a tag without a field prefix.
    pub fn bare(value: TagValue) -> Self {
        Self::Tag {
            field: FieldRef::Implicit,
            value,
        }
    }

    /// Creates an explicit binary expression.
    pub fn logical(operator: BoolOp, left: Self, right: Self) -> Self {
        Self::Logical {
            operator,
            implicit: false,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an AND implied by two adjacent expressions.
    pub fn implicit_and(left: Self, right: Self) -> Self {
        Self::Logical {
            operator: BoolOp::And,
            implicit: true,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Tag { field, value } => {
                let name = match field {
                    FieldRef::Implicit => "<implicit>",
                    FieldRef::Named(name) => name.as_str(),
                };
                match value {
                    TagValue::Empty => writeln!(f, "{prefix}Tag({name}, <empty>)"),
                    TagValue::Range(raw) => writeln!(f, "{prefix}Tag({name}, Range({raw}))"),
                    other => writeln!(f, "{prefix}Tag({name}, {other})"),
                }
            }
            Self::Logical {
                operator,
                implicit,
                left,
                right,
            } => {
                if *implicit {
                    writeln!(f, "{prefix}{} (implicit)", operator.keyword())?;
                } else {
                    writeln!(f, "{prefix}{}", operator.keyword())?;
                }
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Group { field, expr } => {
                match field {
                    Some(name) => writeln!(f, "{prefix}Group({name})")?,
                    None => writeln!(f, "{prefix}Group")?,
                }
                expr.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression as a query string.
    ///
    /// Operators implied by adjacency are written back as adjacency, so re-parsing
    /// the output yields the same tree.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Tag { field, value } => match field {
                FieldRef::Implicit => value.to_string(),
                FieldRef::Named(name) => format!("{name}:{value}"),
            },
            Self::Logical {
                operator,
                implicit,
                left,
                right,
            } => {
                let left = left.to_query_string();
                let right = right.to_query_string();
                if *implicit {
                    format!("{left} {right}")
                } else {
                    format!("{left} {} {right}", operator.keyword())
                }
            }
            Self::Not(inner) => format!("NOT {}", inner.to_query_string()),
            Self::Group { field, expr } => match field {
                Some(name) => format!("{name}:({})", expr.to_query_string()),
                None => format!("({})", expr.to_query_string()),
            },
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
