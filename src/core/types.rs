//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Filename`] - Validated post filename (no extension)
//! - [`DraftId`] - Identity of a draft instance
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use postforge::core::types::Filename;
//!
//! let name = Filename::new("hello-world").unwrap();
//! assert_eq!(name.as_str(), "hello-world");
//!
//! // Invalid constructions fail at creation time
//! assert!(Filename::new("").is_err());
//! assert!(Filename::new("nested/post").is_err());
//! ```

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid filename: {0}")]
    InvalidFilename(String),
}

/// A validated post filename, without the `.md` extension.
///
/// Filenames must be usable as the final segment of a repository path:
/// - Cannot be empty
/// - Cannot contain `/` or `\`
/// - Cannot be `.` or `..`
/// - Cannot contain ASCII control characters
///
/// The draft stores the filename as a raw `String` while the user edits it;
/// the orchestrator validates it into a `Filename` at publish time.
///
/// # Example
///
/// ```
/// use postforge::core::types::Filename;
///
/// let name = Filename::new("first-post").unwrap();
/// assert_eq!(name.to_string(), "first-post");
///
/// assert!(Filename::new("..").is_err());
/// assert!(Filename::new("a\\b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filename(String);

impl Filename {
    /// Create a new validated filename.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidFilename` if the name is empty, contains
    /// path separators or control characters, or is a dot segment.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidFilename(
                "filename cannot be empty".into(),
            ));
        }

        if name == "." || name == ".." {
            return Err(TypeError::InvalidFilename(format!(
                "filename cannot be '{}'",
                name
            )));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(TypeError::InvalidFilename(
                "filename cannot contain path separators".into(),
            ));
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidFilename(
                "filename cannot contain control characters".into(),
            ));
        }

        Ok(())
    }

    /// Get the filename as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Filename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity of a draft instance.
///
/// Assigned once when the draft is created and preserved by `Clone`, so a
/// cloned draft is the *same* draft for in-flight accounting. The publish
/// orchestrator keys its at-most-one-in-flight guard on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftId(Uuid);

impl DraftId {
    /// Generate a fresh draft identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
