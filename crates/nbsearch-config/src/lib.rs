//! Configuration system for nbsearch.
//!
//! nbsearch uses TOML configuration files named `.nbsearch.toml`. Configuration is resolved
//! by walking up the directory tree from the current working directory, collecting any
//! `.nbsearch.toml` files found, then loading `~/.nbsearch.toml` as the global config with
//! lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
use nbsearch_notebook::{Range, Scope};
use nbsearch_search::{Composition, DEFAULT_PAGE_LIMIT, FieldId, SearchTarget, SortQuery};
pub use parse::{
    RawConfig, RawInsertSettings, RawResultsSettings, RawSearchSettings, RawServerSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server settings.
    pub server: ServerSettings,
    /// Search defaults.
    pub search: SearchSettings,
    /// Insertion defaults.
    pub insert: InsertSettings,
    /// Result table layout.
    pub results: ResultsSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.nbsearch.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from config files given in precedence order, highest first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings in `.nbsearch.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            server: &self.server,
            search: &self.search,
            insert: &self.insert,
            results: &self.results,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Jupyter server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server URL; the nbsearch handlers live under `nbsearch/`.
    pub url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:8888/"),
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page.
    pub limit: i64,
    /// Default sort, `column asc|desc`.
    pub sort: Option<String>,
    /// Default operator sent to the backend.
    pub q_op: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            sort: None,
            q_op: None,
        }
    }
}

impl SearchSettings {
    /// The page size, falling back to the default for non-positive values.
    pub fn page_limit(&self) -> u64 {
        u64::try_from(self.limit)
            .ok()
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// The default sort, if set and well-formed.
    pub fn sort_query(&self) -> Option<SortQuery> {
        self.sort.as_deref().and_then(SortQuery::parse)
    }

    /// The default operator, if set and valid.
    pub fn composition(&self) -> Option<Composition> {
        self.q_op.as_deref().and_then(Composition::parse)
    }
}

/// Insertion defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InsertSettings {
    /// `cell`, `section` or `notebook`.
    pub scope: String,
    /// `before`, `after` or `all`.
    pub range: String,
}

impl Default for InsertSettings {
    fn default() -> Self {
        Self {
            scope: Scope::default().to_string(),
            range: Range::default().to_string(),
        }
    }
}

impl InsertSettings {
    /// The configured scope, or the default when invalid.
    pub fn scope(&self) -> Scope {
        self.scope.parse().unwrap_or_default()
    }

    /// The configured range, or the default when invalid.
    pub fn range(&self) -> Range {
        self.range.parse().unwrap_or_default()
    }
}

/// Result table layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResultsSettings {
    /// Columns for notebook hits.
    pub notebook_columns: Vec<String>,
    /// Columns for cell hits.
    pub cell_columns: Vec<String>,
}

impl Default for ResultsSettings {
    fn default() -> Self {
        let columns = |ids: &[FieldId]| -> Vec<String> { ids.iter().map(|id| id.column()).collect() };
        Self {
            notebook_columns: columns(&[
                FieldId::Path,
                FieldId::Server,
                FieldId::Owner,
                FieldId::Modified,
                FieldId::Executed,
                FieldId::OperationNote,
                FieldId::NumberOfHeaders,
            ]),
            cell_columns: columns(&[
                FieldId::Source,
                FieldId::Path,
                FieldId::Server,
                FieldId::Owner,
                FieldId::EstimatedModifiedTime,
            ]),
        }
    }
}

impl ResultsSettings {
    /// Known columns for a target, in configured order. Unknown names are skipped.
    pub fn columns(&self, target: SearchTarget) -> Vec<FieldId> {
        let names = match target {
            SearchTarget::Notebook => &self.notebook_columns,
            SearchTarget::Cell => &self.cell_columns,
        };
        names.iter().filter_map(|name| name.parse().ok()).collect()
    }
}

/// Borrowed settings for TOML serialization.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Server settings.
    server: &'a ServerSettings,
    /// Search defaults.
    search: &'a SearchSettings,
    /// Insertion defaults.
    insert: &'a InsertSettings,
    /// Result table layout.
    results: &'a ResultsSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.url, "http://localhost:8888/");
        assert_eq!(config.search.limit, 50);
        assert_eq!(config.search.sort, None);
        assert_eq!(config.insert.scope(), Scope::Cell);
        assert_eq!(config.insert.range(), Range::After);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn page_limit_falls_back() {
        let mut search = SearchSettings {
            limit: 20,
            ..SearchSettings::default()
        };
        assert_eq!(search.page_limit(), 20);
        search.limit = 0;
        assert_eq!(search.page_limit(), DEFAULT_PAGE_LIMIT);
        search.limit = -3;
        assert_eq!(search.page_limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn typed_accessors() {
        let search = SearchSettings {
            limit: 10,
            sort: Some("mtime asc".into()),
            q_op: Some("or".into()),
        };
        assert_eq!(search.sort_query().unwrap().to_string(), "mtime asc");
        assert_eq!(search.composition(), Some(Composition::Or));

        let insert = InsertSettings {
            scope: "sideways".into(),
            range: "all".into(),
        };
        assert_eq!(insert.scope(), Scope::Cell);
        assert_eq!(insert.range(), Range::All);
    }

    #[test]
    fn default_columns() {
        let results = ResultsSettings::default();
        assert_eq!(results.columns(SearchTarget::Notebook)[0], FieldId::Path);
        assert_eq!(results.columns(SearchTarget::Cell)[0], FieldId::Source);
        assert_eq!(results.cell_columns[0], "source__markdown|source__code");
    }

    #[test]
    fn unknown_columns_are_skipped() {
        let results = ResultsSettings {
            notebook_columns: vec!["owner".into(), "nope".into()],
            cell_columns: Vec::new(),
        };
        assert_eq!(results.columns(SearchTarget::Notebook), vec![FieldId::Owner]);
        assert!(results.columns(SearchTarget::Cell).is_empty());
    }

    #[test]
    fn settings_to_toml() {
        let toml = Config::default().settings_to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[insert]"));
        assert!(toml.contains("[results]"));
        assert!(toml.contains("limit = 50"));
        assert!(toml.contains("scope = \"cell\""));

        let parsed: toml::Value = toml::from_str(&toml).unwrap();
        assert!(parsed.get("server").is_some());
        assert!(parsed["search"].get("sort").is_none());
    }
}
