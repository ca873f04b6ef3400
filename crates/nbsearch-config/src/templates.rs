//! Configuration templates for `nbsearch init`.
//!
//! Templates are stored as valid TOML files and returned as commented-out examples.

/// Local configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Comments out every non-empty line that is not already a comment.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::{Config, parse::parse_config_str};

    #[test]
    fn local_template_parses_as_valid_toml() {
        let raw = parse_config_str(LOCAL_TEMPLATE, Path::new("config.toml")).unwrap();
        assert!(raw.server.is_some());
        assert!(raw.insert.is_some());
    }

    #[test]
    fn global_template_parses_as_valid_toml() {
        let raw = parse_config_str(GLOBAL_TEMPLATE, Path::new("config-global.toml")).unwrap();
        assert!(raw.root.is_none());
    }

    #[test]
    fn local_template_values_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".nbsearch.toml");
        fs::write(&path, LOCAL_TEMPLATE).unwrap();
        let config = Config::load_from_files(&[path]).unwrap();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
    }

    #[test]
    fn commented_template_is_empty_config() {
        let raw = parse_config_str(&local_template(), Path::new("t.toml")).unwrap();
        assert!(raw.server.is_none());
        assert!(raw.search.is_none());
    }

    #[test]
    fn comment_template_rules() {
        assert_eq!(
            comment_template("# note\n[section]\nkey = \"value\"\n\nother = 1\n"),
            "# note\n# [section]\n# key = \"value\"\n\n# other = 1\n"
        );
    }
}
