//! Configuration file discovery.
//!
//! Discovers `.nbsearch.toml` files by walking up the directory tree from a starting
//! point, then appending the global `~/.nbsearch.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".nbsearch.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last. Discovery
/// stops at a file with `root = true`, and the global file is then skipped.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            debug!(path = %config_path.display(), is_root, "found config file");
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        debug!(path = %global_path.display(), "found global config file");
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.nbsearch.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    /// Discovered files other than the global one.
    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn no_configs() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("a/b/c");
        assert!(local(&discover_config_files(&subdir)).is_empty());
    }

    #[test]
    fn precedence_order() {
        let test_dir = TestDir::new();
        let root_config = test_dir.create_config_at_root();
        let mid_config = test_dir.create_config("a/b");
        let leaf_config = test_dir.create_config("a/b/c/d");
        let working_dir = test_dir.create_dir("a/b/c/d/e");

        let configs = discover_config_files(&working_dir);
        assert_eq!(local(&configs), [&leaf_config, &mid_config, &root_config]);
    }

    #[test]
    fn config_in_cwd() {
        let test_dir = TestDir::new();
        let config = test_dir.create_config_at_root();
        assert_eq!(local(&discover_config_files(test_dir.path())), [&config]);
    }

    #[test]
    fn skips_directory_named_like_config() {
        let test_dir = TestDir::new();
        fs::create_dir_all(test_dir.path().join(CONFIG_FILENAME)).unwrap();
        let subdir = test_dir.create_dir("subdir");
        assert!(local(&discover_config_files(&subdir)).is_empty());
    }

    #[test]
    fn root_config_stops_discovery() {
        let test_dir = TestDir::new();
        test_dir.create_config_at_root();
        let root_config = test_dir.create_root_config("project");
        let child_config = test_dir.create_config("project/sub");
        let working_dir = test_dir.create_dir("project/sub/deep");

        let configs = discover_config_files(&working_dir);
        assert_eq!(configs, vec![child_config, root_config]);
    }

    #[test]
    fn root_false_keeps_walking() {
        let test_dir = TestDir::new();
        let parent_config = test_dir.create_config_at_root();
        let mid_config = test_dir.create_config_with_content("project", "root = false\n");
        let working_dir = test_dir.create_dir("project/src");

        let configs = discover_config_files(&working_dir);
        assert_eq!(local(&configs), [&mid_config, &parent_config]);
    }

    #[test]
    fn global_path() {
        let global = global_config_path().unwrap();
        assert!(global.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&global));
        assert!(!is_global_config(Path::new("/some/other/.nbsearch.toml")));
    }
}
