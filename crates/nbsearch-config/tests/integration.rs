//! Integration tests for nbsearch-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use nbsearch_config::{Config, ConfigError, ConfigWarning, discover_config_files, local_template};
use nbsearch_notebook::{Range, Scope};
use nbsearch_search::{Composition, FieldId, SearchTarget};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Temporary root directory.
    root: tempfile::TempDir,
}

impl TestEnv {
    /// Creates an empty environment.
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Root of the environment.
    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_single_config() {
    let env = TestEnv::new();
    env.create_file(
        ".nbsearch.toml",
        r#"
root = true

[server]
url = "https://hub.example/user/alice/"

[search]
limit = 20
sort = "mtime desc"
"#,
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.server.url, "https://hub.example/user/alice/");
    assert_eq!(config.search.page_limit(), 20);
    assert_eq!(config.search.sort_query().unwrap().column, "mtime");
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
    assert!(config.validate().is_empty());
}

#[test]
fn test_load_nested_configs_merging() {
    let env = TestEnv::new();
    let subdir = env.create_dir("project/subdir");

    env.create_file(
        ".nbsearch.toml",
        r#"
root = true

[search]
limit = 5
q_op = "OR"

[insert]
scope = "notebook"
"#,
    );
    env.create_file(
        "project/.nbsearch.toml",
        r#"
[search]
limit = 25

[insert]
range = "all"
"#,
    );

    let config = Config::load(&subdir).unwrap();

    // Closest file wins
    assert_eq!(config.search.limit, 25);
    // Values the closer file leaves unset fall through
    assert_eq!(config.search.composition(), Some(Composition::Or));
    assert_eq!(config.insert.scope(), Scope::Notebook);
    assert_eq!(config.insert.range(), Range::All);
    assert_eq!(config.config_root, Some(env.path().join("project")));
}

#[test]
fn test_root_config_stops_discovery() {
    let env = TestEnv::new();
    let project = env.create_dir("project");

    env.create_file(".nbsearch.toml", "[search]\nlimit = 99\n");
    env.create_file("project/.nbsearch.toml", "root = true\n");

    let files = discover_config_files(&project);
    assert_eq!(files, vec![project.join(".nbsearch.toml")]);

    let config = Config::load(&project).unwrap();
    assert_eq!(config.search.limit, 50);
}

#[test]
fn test_results_columns() {
    let env = TestEnv::new();
    env.create_file(
        ".nbsearch.toml",
        r#"
root = true

[results]
notebook_columns = ["filename", "owner"]
cell_columns = "source__markdown|source__code"
"#,
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(
        config.results.columns(SearchTarget::Notebook),
        vec![FieldId::Path, FieldId::Owner]
    );
    assert_eq!(config.results.columns(SearchTarget::Cell), vec![FieldId::Source]);
}

#[test]
fn test_parse_error_names_file() {
    let env = TestEnv::new();
    let path = env.create_file(".nbsearch.toml", "root = true\n[search\nlimit = 1\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_type_is_an_error() {
    let env = TestEnv::new();
    env.create_file(".nbsearch.toml", "root = true\n[search]\nlimit = \"many\"\n");

    assert!(matches!(
        Config::load(env.path()),
        Err(ConfigError::ParseToml { .. })
    ));
}

#[test]
fn test_validation_warnings() {
    let env = TestEnv::new();
    env.create_file(
        ".nbsearch.toml",
        r#"
root = true

[search]
limit = -1

[insert]
scope = "page"
"#,
    );

    let config = Config::load(env.path()).unwrap();
    let warnings = config.validate();

    assert_eq!(
        warnings,
        vec![
            ConfigWarning::InvalidLimit { limit: -1 },
            ConfigWarning::InvalidScope {
                value: "page".into()
            },
        ]
    );
    // Invalid values still resolve to usable defaults
    assert_eq!(config.search.page_limit(), 50);
    assert_eq!(config.insert.scope(), Scope::Cell);
}

#[test]
fn test_template_loads_cleanly() {
    let env = TestEnv::new();
    env.create_file(".nbsearch.toml", &format!("root = true\n{}", local_template()));

    let config = Config::load(env.path()).unwrap();
    assert!(config.validate().is_empty());
}

#[test]
fn test_settings_round_trip_through_toml() {
    let env = TestEnv::new();
    env.create_file(
        ".nbsearch.toml",
        "root = true\n[search]\nlimit = 7\nsort = \"owner asc\"\n",
    );
    let config = Config::load(env.path()).unwrap();
    let toml = config.settings_to_toml().unwrap();

    let other = TestEnv::new();
    other.create_file(".nbsearch.toml", &format!("root = true\n{toml}"));
    let reloaded = Config::load(other.path()).unwrap();

    assert_eq!(reloaded.search.limit, 7);
    assert_eq!(reloaded.search.sort.as_deref(), Some("owner asc"));
    assert_eq!(reloaded.results.cell_columns, config.results.cell_columns);
}
