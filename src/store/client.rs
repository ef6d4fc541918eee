//! store::client
//!
//! The create-or-update publish pipeline.
//!
//! # Protocol
//!
//! Per attempt, strictly in order:
//!
//! 1. **Lookup** the file's current identity on the target branch. Absent
//!    means Create; present means Update with the returned version token;
//!    a failed lookup aborts the attempt - the client never guesses.
//! 2. **Encode** the rendered document as base64 of its UTF-8 bytes, the
//!    only encoding the write endpoint accepts.
//! 3. **Write** once: encoded content, the fixed commit message, the
//!    branch, and - only when updating - the token from step 1.
//! 4. **Classify**: success becomes [`WriteKind::Created`] or
//!    [`WriteKind::Updated`] per step 1; a stale token becomes
//!    [`ClientError::Conflict`], distinct from other failures so a caller
//!    can re-run the whole pipeline rather than treat it as permanent.
//!
//! Exactly one read and, unless the read failed, exactly one write per
//! attempt. No caching, no retries, no partial writes.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

use super::traits::{ContentStore, StoreError, WriteRequest};

/// Which branch of the create-or-update protocol a successful write took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// The file did not exist; it was created.
    Created,
    /// The file existed; it was replaced.
    Updated,
}

/// Errors from the publish pipeline, split by phase.
///
/// `Lookup` guarantees no write was issued. `Conflict` means the version
/// token went stale between lookup and write; a retry must re-run the
/// whole pipeline, never re-issue the write with the stale token.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("lookup failed: {0}")]
    Lookup(StoreError),

    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("write failed: {0}")]
    Write(StoreError),
}

/// Executes the create-or-update protocol against a content store.
///
/// The store is injected, so tests substitute the in-memory mock and the
/// orchestrator never depends on a concrete implementation.
pub struct PublishClient {
    store: Arc<dyn ContentStore>,
    branch: String,
    message: String,
}

impl PublishClient {
    /// Create a client writing to `branch` with the fixed commit `message`.
    pub fn new(
        store: Arc<dyn ContentStore>,
        branch: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            store,
            branch: branch.into(),
            message: message.into(),
        }
    }

    /// The branch all writes target.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Publish one document's full content at `path`.
    ///
    /// # Errors
    ///
    /// - `ClientError::Lookup` if the read failed; nothing was written
    /// - `ClientError::Conflict` if the file changed between lookup and write
    /// - `ClientError::Write` for any other write failure
    pub async fn put_document(&self, path: &str, document: &str) -> Result<WriteKind, ClientError> {
        let existing = self
            .store
            .lookup(path, &self.branch)
            .await
            .map_err(ClientError::Lookup)?;
        debug!(
            store = self.store.name(),
            path,
            exists = existing.is_some(),
            "content lookup complete"
        );

        let sha = existing.as_ref().map(|file| file.sha.clone());
        let request = WriteRequest {
            path: path.to_string(),
            branch: self.branch.clone(),
            content_base64: STANDARD.encode(document.as_bytes()),
            message: self.message.clone(),
            sha,
        };

        match self.store.write(request).await {
            Ok(written) => {
                debug!(path = %written.path, sha = %written.sha, "content written");
                Ok(if existing.is_some() {
                    WriteKind::Updated
                } else {
                    WriteKind::Created
                })
            }
            Err(StoreError::Conflict(message)) => Err(ClientError::Conflict(message)),
            Err(err) => Err(ClientError::Write(err)),
        }
    }
}
