//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the branch must be non-empty, preset names must
//! be valid path segments).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Publication configuration.
///
/// # Example
///
/// ```toml
/// [repository]
/// owner = "linxz-coder"
/// repo = "zola-basic"
/// branch = "main"
///
/// [content]
/// root = "content"
/// presets = ["blog", "shorts", "books"]
/// default_section = "blog"
///
/// [publish]
/// commit_message = "Add new blog post"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// The content repository to publish into.
    pub repository: RepositoryConfig,

    /// Content layout: root, preset sections, default destination.
    #[serde(default)]
    pub content: ContentConfig,

    /// Publish behavior.
    #[serde(default)]
    pub publish: PublishSettings,
}

impl PublishConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repository.validate()?;
        self.content.validate()?;
        self.publish.validate()?;
        Ok(())
    }
}

/// The target repository and branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Branch all posts are written to (default: "main").
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl RepositoryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_empty() || self.owner.contains('/') {
            return Err(ConfigError::InvalidValue(format!(
                "invalid repository owner '{}'",
                self.owner
            )));
        }
        if self.repo.is_empty() || self.repo.contains('/') {
            return Err(ConfigError::InvalidValue(format!(
                "invalid repository name '{}'",
                self.repo
            )));
        }
        if self.branch.is_empty() || self.branch.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "invalid branch '{}'",
                self.branch
            )));
        }
        Ok(())
    }
}

/// Content layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory the preset sections live under.
    pub root: String,

    /// Section names offered as destination presets.
    pub presets: Vec<String>,

    /// Section used when the destination input is empty.
    pub default_section: String,
}

impl ContentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for preset in &self.presets {
            if preset.is_empty()
                || preset == "."
                || preset == ".."
                || preset.contains('/')
            {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid preset section '{}'",
                    preset
                )));
            }
        }
        if self.default_section.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_section cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "content".to_string(),
            presets: vec![
                "blog".to_string(),
                "shorts".to_string(),
                "books".to_string(),
            ],
            default_section: "blog".to_string(),
        }
    }
}

/// Publish behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    /// Commit message used for every post write.
    pub commit_message: String,

    /// Upper bound on a whole publish attempt, in seconds.
    pub timeout_secs: u64,
}

impl PublishSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.commit_message.is_empty() {
            return Err(ConfigError::InvalidValue(
                "commit_message cannot be empty".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            commit_message: "Add new blog post".to_string(),
            timeout_secs: 30,
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}
