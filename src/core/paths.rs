//! core::paths
//!
//! Destination resolution for repository content paths.
//!
//! # Design
//!
//! All repository paths are routed through [`PathResolver`] so that one
//! place owns normalization and rejection rules. No code outside this
//! module should concatenate path segments by hand.
//!
//! A destination comes from one of two sources:
//! - a **preset** section name (e.g. "blog", "shorts", "books") resolved
//!   under the configured content root
//! - **free-form input**, normalized to a repo-relative path
//!
//! Normalization strips leading and trailing separators and collapses
//! empty segments; `.` and `..` segments are rejected. Empty input falls
//! back to the configured default section rather than failing.
//!
//! # Example
//!
//! ```
//! use postforge::core::paths::{DestinationChoice, PathResolver};
//!
//! let presets = vec!["blog".to_string(), "shorts".to_string()];
//! let resolver = PathResolver::new("content", &presets, "blog").unwrap();
//!
//! let a = resolver.resolve(&DestinationChoice::custom("/content/blog/")).unwrap();
//! let b = resolver.resolve(&DestinationChoice::custom("content/blog")).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.path(), "content/blog");
//! ```

use thiserror::Error;

use crate::core::config::ContentConfig;
use crate::core::types::Filename;

/// Errors from destination resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path segment is empty after trimming or is a dot segment.
    #[error("path segment '{0}' is not allowed")]
    InvalidSegment(String),

    /// The chosen preset is not in the configured list.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// The user's destination choice, as supplied by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationChoice {
    /// A section from the configured preset list, resolved under the root.
    Preset(String),
    /// Free-form repo-relative path input.
    Custom(String),
}

impl DestinationChoice {
    /// Shorthand for a preset selection.
    pub fn preset(name: impl Into<String>) -> Self {
        DestinationChoice::Preset(name.into())
    }

    /// Shorthand for free-form input.
    pub fn custom(path: impl Into<String>) -> Self {
        DestinationChoice::Custom(path.into())
    }
}

/// A normalized repository directory for published posts.
///
/// Invariant: every segment is non-empty and free of separators and dot
/// segments. The destination is fixed once a publish attempt starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    segments: Vec<String>,
}

impl Destination {
    /// The repo-relative directory path, `/`-joined, no leading or
    /// trailing separator.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// The final store key for a post: `<path>/<filename>.md`.
    pub fn join(&self, filename: &Filename) -> String {
        if self.segments.is_empty() {
            format!("{}.md", filename)
        } else {
            format!("{}/{}.md", self.path(), filename)
        }
    }
}

/// Turns a destination choice into a canonical repository path.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Root segments presets resolve under.
    root: Vec<String>,
    /// Allowed preset section names.
    presets: Vec<String>,
    /// Fallback destination for empty custom input.
    default: Vec<String>,
}

impl PathResolver {
    /// Create a resolver.
    ///
    /// `root` is the directory presets live under (may itself be a
    /// multi-segment path), `presets` the allowed section names, and
    /// `default_section` the section used when custom input is empty.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if the root, a preset name, or the default
    /// section fails segment validation.
    pub fn new(
        root: &str,
        presets: &[String],
        default_section: &str,
    ) -> Result<Self, PathError> {
        let root_segments = normalize(root)?;
        for preset in presets {
            validate_segment(preset)?;
        }

        let mut default = root_segments.clone();
        default.extend(normalize(default_section)?);

        Ok(Self {
            root: root_segments,
            presets: presets.to_vec(),
            default,
        })
    }

    /// Create a resolver from the content configuration.
    pub fn from_config(config: &ContentConfig) -> Result<Self, PathError> {
        Self::new(&config.root, &config.presets, &config.default_section)
    }

    /// Resolve a destination choice to a canonical destination.
    ///
    /// # Errors
    ///
    /// - `UnknownPreset` if a preset name is not in the configured list
    /// - `InvalidSegment` if free-form input contains `.` or `..` segments
    pub fn resolve(&self, choice: &DestinationChoice) -> Result<Destination, PathError> {
        match choice {
            DestinationChoice::Preset(name) => {
                if !self.presets.iter().any(|p| p == name) {
                    return Err(PathError::UnknownPreset(name.clone()));
                }
                let mut segments = self.root.clone();
                segments.push(name.clone());
                Ok(Destination { segments })
            }
            DestinationChoice::Custom(input) => {
                let segments = normalize(input)?;
                if segments.is_empty() {
                    return Ok(Destination {
                        segments: self.default.clone(),
                    });
                }
                Ok(Destination { segments })
            }
        }
    }
}

/// Split on `/`, dropping empty segments and rejecting dot segments.
fn normalize(input: &str) -> Result<Vec<String>, PathError> {
    let mut segments = Vec::new();
    for segment in input.split('/') {
        if segment.is_empty() {
            continue;
        }
        validate_segment(segment)?;
        segments.push(segment.to_string());
    }
    Ok(segments)
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(PathError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}
