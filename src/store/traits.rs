//! store::traits
//!
//! ContentStore trait definition for the remote content repository.
//!
//! # Design
//!
//! The trait is async because store operations involve network I/O. It
//! deliberately mirrors the remote API's shape: files are base64-encoded
//! blobs addressed by path and branch, versioned by an opaque content hash
//! that acts as an optimistic-concurrency token. A write must present the
//! current hash to overwrite an existing file.
//!
//! Implementations perform no caching: the workflow fetches a fresh
//! [`RemoteFileRef`] immediately before each write because the remote
//! state may have changed between attempts.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from content store operations.
///
/// These map to the common failure modes of a hosted Git-forge API.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The supplied version token is stale; someone else wrote concurrently.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// The store's current identity for an existing file.
///
/// `sha` is the version marker required to overwrite the file; a fresh one
/// must be obtained by lookup before every write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    /// Repo-relative file path.
    pub path: String,
    /// Branch the file lives on.
    pub branch: String,
    /// Opaque content hash / version token.
    pub sha: String,
}

/// A full-content write of one file.
///
/// `sha` must be present when overwriting an existing file and absent when
/// creating a new one; the store rejects stale or missing tokens.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Repo-relative file path.
    pub path: String,
    /// Target branch.
    pub branch: String,
    /// File content, base64-encoded (the only encoding the write endpoint accepts).
    pub content_base64: String,
    /// Human-readable commit message.
    pub message: String,
    /// Version token of the file being replaced, if any.
    pub sha: Option<String>,
}

/// The ContentStore trait for the remote content repository.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, StoreError>`. Callers should handle:
/// - `AuthFailed`: Surface to the user; the token needs attention
/// - `Conflict`: Re-run the whole lookup-then-write pipeline
/// - `RateLimited`: Back off; the store does not retry
/// - `ApiError` / `NetworkError`: Display the message
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Get the store name (e.g., "github", "mock").
    fn name(&self) -> &'static str;

    /// Fetch the current identity of a file, or `None` if it does not exist.
    ///
    /// Absence is an expected outcome, not an error; `Err` means the
    /// lookup itself failed and the caller must not guess either way.
    async fn lookup(&self, path: &str, branch: &str)
        -> Result<Option<RemoteFileRef>, StoreError>;

    /// Atomically replace (or create) one file's full content.
    ///
    /// Returns the written file's new identity.
    ///
    /// # Errors
    ///
    /// - `Conflict` if `request.sha` does not match the store's current
    ///   version of the file
    /// - `AuthFailed` / `RateLimited` / `ApiError` / `NetworkError` per the
    ///   store's response
    async fn write(&self, request: WriteRequest) -> Result<RemoteFileRef, StoreError>;
}
