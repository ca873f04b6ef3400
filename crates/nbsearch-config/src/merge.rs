//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single `Config`. Files are given highest
//! precedence first; for every scalar the first file that defines it wins.

use std::path::PathBuf;

use crate::{
    Config, InsertSettings, ResultsSettings, SearchSettings, ServerSettings,
    parse::{
        RawConfig, RawInsertSettings, RawResultsSettings, RawSearchSettings, RawServerSettings,
    },
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files into a single `Config`.
///
/// Files are applied lowest precedence first so that closer files overwrite farther ones.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut config = Config {
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(PathBuf::from),
        ..Config::default()
    };

    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(server) = &raw.server {
            apply_server(&mut config.server, server);
        }
        if let Some(search) = &raw.search {
            apply_search(&mut config.search, search);
        }
        if let Some(insert) = &raw.insert {
            apply_insert(&mut config.insert, insert);
        }
        if let Some(results) = &raw.results {
            apply_results(&mut config.results, results);
        }
    }

    config
}

/// Applies raw server settings.
fn apply_server(result: &mut ServerSettings, raw: &RawServerSettings) {
    if let Some(v) = &raw.url {
        result.url.clone_from(v);
    }
}

/// Applies raw search settings.
fn apply_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(v) = &raw.sort {
        result.sort = Some(v.clone());
    }
    if let Some(v) = &raw.q_op {
        result.q_op = Some(v.clone());
    }
}

/// Applies raw insertion defaults.
fn apply_insert(result: &mut InsertSettings, raw: &RawInsertSettings) {
    if let Some(v) = &raw.scope {
        result.scope.clone_from(v);
    }
    if let Some(v) = &raw.range {
        result.range.clone_from(v);
    }
}

/// Applies raw result table settings. A column list replaces the whole list.
fn apply_results(result: &mut ResultsSettings, raw: &RawResultsSettings) {
    if let Some(v) = &raw.notebook_columns {
        result.notebook_columns.clone_from(v);
    }
    if let Some(v) = &raw.cell_columns {
        result.cell_columns.clone_from(v);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parse::parse_config_str;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn empty_list_gives_defaults() {
        let config = merge_configs(&[]);
        assert_eq!(config.search.limit, 50);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn closest_file_wins() {
        let config = merge_configs(&[
            parsed("/p/a/.nbsearch.toml", "[search]\nlimit = 10\n"),
            parsed("/p/.nbsearch.toml", "[search]\nlimit = 30\nsort = \"owner asc\"\n"),
        ]);
        assert_eq!(config.search.limit, 10);
        assert_eq!(config.search.sort.as_deref(), Some("owner asc"));
        assert_eq!(config.config_root, Some(PathBuf::from("/p/a")));
    }

    #[test]
    fn sections_merge_independently() {
        let config = merge_configs(&[
            parsed("/p/a/.nbsearch.toml", "[insert]\nscope = \"section\"\n"),
            parsed(
                "/home/u/.nbsearch.toml",
                "[server]\nurl = \"https://hub.example/user/u/\"\n[insert]\nrange = \"all\"\n",
            ),
        ]);
        assert_eq!(config.server.url, "https://hub.example/user/u/");
        assert_eq!(config.insert.scope, "section");
        assert_eq!(config.insert.range, "all");
    }

    #[test]
    fn column_lists_replace() {
        let config = merge_configs(&[
            parsed("/p/.nbsearch.toml", "[results]\nnotebook_columns = \"owner\"\n"),
        ]);
        assert_eq!(config.results.notebook_columns, ["owner"]);
        assert_eq!(config.results.cell_columns, ResultsSettings::default().cell_columns);
    }
}
