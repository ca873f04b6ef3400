//! Configuration validation.
//!
//! Reports settings that load but will be ignored or rejected when used.

use std::fmt;

use nbsearch_notebook::{Range, Scope};
use nbsearch_search::{Composition, FieldId, SortQuery, validate_server_url};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The server URL is not http(s).
    InvalidServerUrl {
        /// The configured URL.
        url: String,
    },
    /// The page size is zero or negative.
    InvalidLimit {
        /// The configured limit.
        limit: i64,
    },
    /// The sort string is not `column asc|desc`.
    MalformedSort {
        /// The configured sort.
        sort: String,
    },
    /// The sort column is not an index field.
    UnknownSortColumn {
        /// The column name.
        column: String,
    },
    /// The default operator is neither AND nor OR.
    InvalidQueryOperator {
        /// The configured operator.
        value: String,
    },
    /// The insertion scope is not cell, section or notebook.
    InvalidScope {
        /// The configured scope.
        value: String,
    },
    /// The insertion range is not before, after or all.
    InvalidRange {
        /// The configured range.
        value: String,
    },
    /// A result column is not an index field.
    UnknownColumn {
        /// `notebook_columns` or `cell_columns`.
        list: &'static str,
        /// The column name.
        column: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidServerUrl { url } => {
                write!(f, "server url must start with http:// or https://: {url}")
            }
            Self::InvalidLimit { limit } => {
                write!(f, "search limit must be positive, got {limit}; using default")
            }
            Self::MalformedSort { sort } => {
                write!(f, "search sort must be \"column asc\" or \"column desc\": {sort}")
            }
            Self::UnknownSortColumn { column } => {
                write!(f, "search sort column is not an index field: {column}")
            }
            Self::InvalidQueryOperator { value } => {
                write!(f, "search q_op must be AND or OR: {value}")
            }
            Self::InvalidScope { value } => {
                write!(f, "insert scope must be cell, section or notebook: {value}")
            }
            Self::InvalidRange { value } => {
                write!(f, "insert range must be before, after or all: {value}")
            }
            Self::UnknownColumn { list, column } => {
                write!(f, "results {list} names an unknown column: {column}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if validate_server_url(&config.server.url).is_err() {
        warnings.push(ConfigWarning::InvalidServerUrl {
            url: config.server.url.clone(),
        });
    }

    let search = &config.search;
    if search.limit <= 0 {
        warnings.push(ConfigWarning::InvalidLimit {
            limit: search.limit,
        });
    }
    if let Some(sort) = &search.sort {
        match SortQuery::parse(sort) {
            None => warnings.push(ConfigWarning::MalformedSort { sort: sort.clone() }),
            Some(query) if query.column.parse::<FieldId>().is_err() => {
                warnings.push(ConfigWarning::UnknownSortColumn {
                    column: query.column,
                });
            }
            Some(_) => {}
        }
    }
    if let Some(q_op) = &search.q_op
        && Composition::parse(q_op).is_none()
    {
        warnings.push(ConfigWarning::InvalidQueryOperator {
            value: q_op.clone(),
        });
    }

    if config.insert.scope.parse::<Scope>().is_err() {
        warnings.push(ConfigWarning::InvalidScope {
            value: config.insert.scope.clone(),
        });
    }
    if config.insert.range.parse::<Range>().is_err() {
        warnings.push(ConfigWarning::InvalidRange {
            value: config.insert.range.clone(),
        });
    }

    let lists = [
        ("notebook_columns", &config.results.notebook_columns),
        ("cell_columns", &config.results.cell_columns),
    ];
    for (list, columns) in lists {
        for column in columns {
            if column.parse::<FieldId>().is_err() {
                warnings.push(ConfigWarning::UnknownColumn {
                    list,
                    column: column.clone(),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn reports_each_problem() {
        let mut config = Config::default();
        config.server.url = "localhost:8888".into();
        config.search.limit = 0;
        config.search.sort = Some("mtime".into());
        config.search.q_op = Some("XOR".into());
        config.insert.scope = "page".into();
        config.insert.range = "middle".into();
        config.results.cell_columns.push("bogus".into());

        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![
                ConfigWarning::InvalidServerUrl {
                    url: "localhost:8888".into()
                },
                ConfigWarning::InvalidLimit { limit: 0 },
                ConfigWarning::MalformedSort {
                    sort: "mtime".into()
                },
                ConfigWarning::InvalidQueryOperator {
                    value: "XOR".into()
                },
                ConfigWarning::InvalidScope {
                    value: "page".into()
                },
                ConfigWarning::InvalidRange {
                    value: "middle".into()
                },
                ConfigWarning::UnknownColumn {
                    list: "cell_columns",
                    column: "bogus".into()
                },
            ]
        );
    }

    #[test]
    fn unknown_sort_column() {
        let mut config = Config::default();
        config.search.sort = Some("popularity desc".into());
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::UnknownSortColumn {
                column: "popularity".into()
            }]
        );
    }

    #[test]
    fn lowercase_operator_is_accepted() {
        let mut config = Config::default();
        config.search.q_op = Some("or".into());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn messages() {
        let warning = ConfigWarning::InvalidLimit { limit: -1 };
        assert_eq!(
            warning.to_string(),
            "search limit must be positive, got -1; using default"
        );
    }
}
