//! `%%nbsearch` cells.
//!
//! A code cell starting with `%%nbsearch` records a search as YAML so that it can be
//! re-run later:
//!
//! ```yaml
//! %%nbsearch
//! query:
//!   composition: AND
//!   keyword:
//!     owner: alice
//!     _text_: pandas
//! sections:
//! - '# Intro'
//! ```
//!
//! Older cells hold only the keyword mapping (`owner: alice`), which reads as an AND
//! query with no sections. Once the results are inserted the cell is commented out.

use std::iter;

use nbsearch_search::{CatalogError, CompositeQuery, Composition, Condition, FieldId, MATCH_ALL};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::MagicError;

/// First line of a directive cell.
pub const MAGIC_HEADER: &str = "%%nbsearch";

/// A flat query: index field names mapped to values under one operator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordQuery {
    /// Operator joining the entries.
    pub composition: Composition,
    /// `(field, value)` entries, in document order. Field names are unique.
    pub keyword: Vec<(String, String)>,
}

impl KeywordQuery {
    /// Converts to a composite query. No entries give the default composite.
    pub fn to_composite(&self) -> Result<CompositeQuery, MagicError> {
        if self.keyword.is_empty() {
            return Ok(CompositeQuery::default());
        }
        let fields = self
            .keyword
            .iter()
            .map(|(field, value)| {
                FieldId::from_index_name(field)
                    .map(|target| Condition::new(target, value.as_str()))
                    .ok_or_else(|| CatalogError::UnknownField(field.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeQuery::new(self.composition, fields))
    }

    /// Builds from a composite query. A repeated field keeps its last value.
    pub fn from_composite(query: &CompositeQuery) -> Self {
        let mut keyword: Vec<(String, String)> = Vec::new();
        for condition in &query.fields {
            let field = condition.target.column();
            match keyword.iter_mut().find(|(name, _)| *name == field) {
                Some(entry) => entry.1 = condition.query.clone(),
                None => keyword.push((field, condition.query.clone())),
            }
        }
        Self {
            composition: query.composition,
            keyword,
        }
    }

    /// The query string: `field:value` entries joined by the operator.
    pub fn query_string(&self) -> String {
        if self.keyword.is_empty() {
            return MATCH_ALL.to_string();
        }
        self.keyword
            .iter()
            .map(|(field, value)| format!("{field}:{value}"))
            .collect::<Vec<_>>()
            .join(&format!(" {} ", self.composition.keyword()))
    }
}

/// A decoded `%%nbsearch` cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MagicDirective {
    /// The recorded query.
    pub query: KeywordQuery,
    /// Titles of the sections chosen last time.
    pub sections: Vec<String>,
}

/// On-disk shape of the query.
#[derive(Debug, Serialize, Deserialize)]
struct RawQuery {
    /// Operator.
    composition: Composition,
    /// Field to value.
    #[serde(default)]
    keyword: Mapping,
}

/// Either directive shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDirective {
    /// `query:` plus `sections:`.
    Full {
        /// The query.
        query: RawQuery,
        /// Section titles.
        #[serde(default)]
        sections: Vec<String>,
    },
    /// A bare keyword mapping.
    Legacy(Mapping),
}

/// Shape written back to the cell.
#[derive(Debug, Serialize)]
struct RawOutput<'a> {
    /// The query.
    query: RawQuery,
    /// Section titles.
    sections: &'a [String],
}

/// Whether a cell's source is a directive.
pub fn is_directive(source: &str) -> bool {
    source.lines().next().map(str::trim_end) == Some(MAGIC_HEADER)
}

impl MagicDirective {
    /// Decodes a cell's source.
    pub fn parse(source: &str) -> Result<Self, MagicError> {
        if !is_directive(source) {
            return Err(MagicError::NotDirective);
        }
        let body = source.split_once('\n').map_or("", |(_, body)| body);
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        match serde_yaml::from_str::<RawDirective>(body)? {
            RawDirective::Full { query, sections } => Ok(Self {
                query: KeywordQuery {
                    composition: query.composition,
                    keyword: mapping_entries(&query.keyword)?,
                },
                sections,
            }),
            RawDirective::Legacy(keyword) => Ok(Self {
                query: KeywordQuery {
                    composition: Composition::And,
                    keyword: mapping_entries(&keyword)?,
                },
                sections: Vec::new(),
            }),
        }
    }

    /// Encodes the directive as cell source, optionally commenting every line out.
    pub fn render(&self, commented: bool) -> Result<String, MagicError> {
        let keyword = self
            .query
            .keyword
            .iter()
            .map(|(field, value)| (Value::from(field.as_str()), Value::from(value.as_str())))
            .collect();
        let output = RawOutput {
            query: RawQuery {
                composition: self.query.composition,
                keyword,
            },
            sections: &self.sections,
        };
        let yaml = serde_yaml::to_string(&output)?;

        let lines = iter::once(MAGIC_HEADER).chain(yaml.trim().lines());
        let rendered: Vec<String> = if commented {
            lines.map(|line| format!("# {line}")).collect()
        } else {
            lines.map(String::from).collect()
        };
        Ok(rendered.join("\n"))
    }
}

/// Reads a YAML mapping as string pairs, keeping document order.
fn mapping_entries(mapping: &Mapping) -> Result<Vec<(String, String)>, MagicError> {
    mapping
        .iter()
        .map(|(key, value)| {
            let key = scalar_text(key).ok_or_else(|| MagicError::InvalidValue(format!("{key:?}")))?;
            let value = scalar_text(value).ok_or_else(|| MagicError::InvalidValue(key.clone()))?;
            Ok((key, value))
        })
        .collect()
}

/// Text of a scalar YAML value. Null reads as empty.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
