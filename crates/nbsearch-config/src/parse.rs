//! Configuration file parsing.
//!
//! Parses individual `.nbsearch.toml` files into `RawConfig` structures that keep every
//! field optional until files are merged.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// `[server]` section.
    pub server: Option<RawServerSettings>,
    /// `[search]` section.
    pub search: Option<RawSearchSettings>,
    /// `[insert]` section.
    pub insert: Option<RawInsertSettings>,
    /// `[results]` section.
    pub results: Option<RawResultsSettings>,
}

/// Raw server settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawServerSettings {
    /// Jupyter server URL.
    pub url: Option<String>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Results per page.
    pub limit: Option<i64>,
    /// Default sort, `column asc|desc`.
    pub sort: Option<String>,
    /// Default operator sent to the backend.
    pub q_op: Option<String>,
}

/// Raw insertion defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInsertSettings {
    /// Default scope.
    pub scope: Option<String>,
    /// Default range.
    pub range: Option<String>,
}

/// Raw result table settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawResultsSettings {
    /// Columns for notebook hits. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub notebook_columns: Option<Vec<String>>,
    /// Columns for cell hits. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub cell_columns: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string. `path` is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_config() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.server.is_none());
        assert!(config.search.is_none());
        assert!(config.insert.is_none());
        assert!(config.results.is_none());
    }

    #[test]
    fn all_sections() {
        let config = parse(
            r#"
root = true

[server]
url = "http://nb.example:8888/"

[search]
limit = 20
sort = "mtime desc"
q_op = "OR"

[insert]
scope = "section"
range = "all"

[results]
notebook_columns = ["filename", "owner"]
"#,
        );
        assert_eq!(config.root, Some(true));
        assert_eq!(config.server.unwrap().url.as_deref(), Some("http://nb.example:8888/"));
        let search = config.search.unwrap();
        assert_eq!(search.limit, Some(20));
        assert_eq!(search.sort.as_deref(), Some("mtime desc"));
        assert_eq!(search.q_op.as_deref(), Some("OR"));
        let insert = config.insert.unwrap();
        assert_eq!(insert.scope.as_deref(), Some("section"));
        assert_eq!(insert.range.as_deref(), Some("all"));
        let results = config.results.unwrap();
        assert_eq!(results.notebook_columns, Some(vec!["filename".into(), "owner".into()]));
        assert!(results.cell_columns.is_none());
    }

    #[test]
    fn single_column_string() {
        let config = parse("[results]\ncell_columns = \"filename\"\n");
        assert_eq!(config.results.unwrap().cell_columns, Some(vec!["filename".into()]));
    }

    #[test]
    fn negative_limit_parses() {
        let config = parse("[search]\nlimit = -5\n");
        assert_eq!(config.search.unwrap().limit, Some(-5));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let err = parse_config_str("[search\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { ref path, .. } if path == Path::new("bad.toml")));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(parse_config_str("[search]\nlimit = \"many\"\n", Path::new("t.toml")).is_err());
    }

    #[test]
    fn missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.nbsearch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
