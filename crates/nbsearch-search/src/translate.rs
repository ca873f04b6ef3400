//! Translation between boolean query strings and composite queries.
//!
//! Only flat queries translate: one or more `field:value` tags joined by a single
//! operator. Groups, negations and unknown fields keep a query in its string form.

use nbsearch_query::{FieldRef, QueryExpr, TagValue, parse};
use tracing::warn;

use crate::{
    composite::{CompositeQuery, Composition, Condition},
    fields::FieldId,
};

/// Prefix of a query against the default full-text field.
pub const FULL_TEXT_PREFIX: &str = "_text_:";

/// The query matching every document.
pub const MATCH_ALL: &str = "_text_:*";

/// Converts a query string into a composite query.
///
/// Returns `None` when the query is empty, does not parse, or has a shape a
/// composite query cannot hold.
pub fn parse_to_composite(query: &str) -> Option<CompositeQuery> {
    match parse(query) {
        Ok(Some(expr)) => structure(&expr),
        Ok(None) => None,
        Err(err) => {
            warn!(query, error = err.message(), "query could not be parsed");
            None
        }
    }
}

/// Walks an expression and flattens it into conditions.
fn structure(expr: &QueryExpr) -> Option<CompositeQuery> {
    match expr {
        QueryExpr::Tag { field, value } => {
            let target = match field {
                FieldRef::Implicit => FieldId::FullText,
                FieldRef::Named(name) => FieldId::from_index_name(name)?,
            };
            let query = match value {
                TagValue::Empty => "*".to_string(),
                other => other.to_string(),
            };
            Some(CompositeQuery::new(
                Composition::Or,
                vec![Condition::new(target, query)],
            ))
        }
        QueryExpr::Logical {
            operator,
            left,
            right,
            ..
        } => {
            let composition = Composition::from(*operator);
            let left = structure(left)?;
            let right = structure(right)?;
            // A single condition fits under either operator; a list must already agree.
            if [&left, &right]
                .iter()
                .any(|side| side.composition != composition && side.fields.len() > 1)
            {
                return None;
            }
            let mut fields = left.fields;
            fields.extend(right.fields);
            Some(CompositeQuery::new(composition, fields))
        }
        QueryExpr::Not(_) | QueryExpr::Group { .. } => None,
    }
}

/// Renders a composite query as a query string.
///
/// An empty query renders as [`MATCH_ALL`].
pub fn composite_to_string(query: &CompositeQuery) -> String {
    if query.fields.is_empty() {
        return MATCH_ALL.to_string();
    }
    let separator = format!(" {} ", query.composition.keyword());
    query
        .fields
        .iter()
        .map(|condition| format!("{}:{}", condition.target.column(), condition.query))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Whether a query string can be edited as a composite query.
pub fn can_structure(query: &str) -> bool {
    parse_to_composite(query).is_some()
}

/// Whether a query joins several clauses with an explicit operator.
fn has_operator(query: &str) -> bool {
    query.contains(" AND ") || query.contains(" OR ")
}

/// Whether a bare value would be read back as a full-text search.
fn reads_as_full_text(value: &str) -> bool {
    !value.contains(':') && value != "*"
}

/// Drops the `_text_:` prefix from a lone full-text search.
///
/// The prefix stays when removing it would change how the query reads back:
/// for the match-all `_text_:*` and for values containing a colon.
pub fn simplify(query: &str) -> String {
    if !has_operator(query)
        && let Some(rest) = query.strip_prefix(FULL_TEXT_PREFIX)
        && reads_as_full_text(rest)
    {
        return rest.to_string();
    }
    query.to_string()
}

/// Adds the `_text_:` prefix to a bare value. Inverse of [`simplify`].
pub fn expand(value: &str) -> String {
    if !has_operator(value) && reads_as_full_text(value) {
        format!("{FULL_TEXT_PREFIX}{value}")
    } else {
        value.to_string()
    }
}
