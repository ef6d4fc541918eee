//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$POSTFORGE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/postforge/config.toml`
//! 3. `~/.postforge/config.toml`
//!
//! Missing files are skipped; the first one found wins. Parse and
//! validation failures are errors, not fallthrough.
//!
//! # Example
//!
//! ```no_run
//! use postforge::core::config::PublishConfig;
//!
//! let config = PublishConfig::load().unwrap();
//! println!("publishing to {}/{}", config.repository.owner, config.repository.repo);
//! ```

pub mod schema;

pub use schema::{ContentConfig, PublishConfig, PublishSettings, RepositoryConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the config location.
const CONFIG_ENV: &str = "POSTFORGE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no config file found; create one at ~/.postforge/config.toml")]
    NotFound,
}

impl PublishConfig {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no candidate file exists, or a
    /// read/parse/validation error for the first file found.
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::candidate_paths() {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        Err(ConfigError::NotFound)
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config: PublishConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Candidate config locations, in precedence order.
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            paths.push(PathBuf::from(explicit));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("postforge").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".postforge").join("config.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_minimal_config_with_defaults() {
        let (_dir, path) = write_config(
            r#"
            [repository]
            owner = "linxz-coder"
            repo = "zola-basic"
            "#,
        );

        let config = PublishConfig::load_from(&path).unwrap();
        assert_eq!(config.repository.owner, "linxz-coder");
        assert_eq!(config.repository.repo, "zola-basic");
        assert_eq!(config.repository.branch, "main");
        assert_eq!(config.content.root, "content");
        assert_eq!(config.publish.commit_message, "Add new blog post");
        assert_eq!(config.publish.timeout_secs, 30);
    }

    #[test]
    fn loads_full_config() {
        let (_dir, path) = write_config(
            r#"
            [repository]
            owner = "octocat"
            repo = "site"
            branch = "publish"

            [content]
            root = "site/content"
            presets = ["blog", "notes"]
            default_section = "notes"

            [publish]
            commit_message = "New post"
            timeout_secs = 10
            "#,
        );

        let config = PublishConfig::load_from(&path).unwrap();
        assert_eq!(config.repository.branch, "publish");
        assert_eq!(config.content.presets, vec!["blog", "notes"]);
        assert_eq!(config.content.default_section, "notes");
        assert_eq!(config.publish.timeout_secs, 10);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let (_dir, path) = write_config(
            r#"
            [repository]
            owner = "octocat"
            repo = "site"
            tunk = "main"
            "#,
        );

        assert!(matches!(
            PublishConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_repository_is_a_parse_error() {
        let (_dir, path) = write_config("[content]\nroot = \"content\"\n");
        assert!(matches!(
            PublishConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_value_fails_validation() {
        let (_dir, path) = write_config(
            r#"
            [repository]
            owner = ""
            repo = "site"
            "#,
        );

        assert!(matches!(
            PublishConfig::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            PublishConfig::load_from(&path),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
