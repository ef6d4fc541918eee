//! publish
//!
//! Orchestrates the publish lifecycle: Gate -> Resolve -> Render -> Write.
//!
//! # Architecture
//!
//! [`Publisher`] is the single entry point the UI layer calls. Every
//! attempt follows a uniform lifecycle:
//!
//! 1. **Gate**: claim the per-draft in-flight slot, re-check readiness,
//!    validate the filename
//! 2. **Resolve**: turn the destination choice into a canonical store key
//! 3. **Render**: serialize the draft deterministically
//! 4. **Write**: run the client's lookup-then-write pipeline under a
//!    bounded timeout
//!
//! Steps 1-3 are local; a draft that fails them never reaches the network.
//!
//! # Invariants
//!
//! - At most one attempt is in flight per draft; a second `publish` call
//!   for the same draft is refused with `AlreadyInProgress`, not queued
//! - The store key is fixed before the pipeline starts and never mutated
//! - The orchestrator performs no retries: retrying a Create blindly could
//!   double-publish under ambiguous network failures, so retry policy
//!   belongs to the caller and must re-run the whole pipeline
//!
//! # Cancellation
//!
//! Dropping the returned future abandons the attempt. The in-flight slot
//! is released by an RAII guard, so a torn-down caller never wedges its
//! draft; whatever the store did in the meantime stands.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::PublishConfig;
use crate::core::document::{render, Draft, RenderError};
use crate::core::paths::{DestinationChoice, PathError, PathResolver};
use crate::core::readiness::Readiness;
use crate::core::types::{DraftId, Filename, TypeError};
use crate::store::{ClientError, ContentStore, PublishClient, StoreError, WriteKind};

/// A successful publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The file did not exist and was created at `path`.
    Created { path: String },
    /// The file existed and was replaced at `path`.
    Updated { path: String },
}

impl PublishOutcome {
    /// The store key the post was written to.
    pub fn path(&self) -> &str {
        match self {
            PublishOutcome::Created { path } | PublishOutcome::Updated { path } => path,
        }
    }
}

/// Everything that can stop a publish attempt.
///
/// The first five variants are local and detected before any network
/// call; they require the user to change input and are never retried
/// automatically. The rest surface the store's answer verbatim.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The draft's title or filename is still empty.
    #[error("draft is not ready to publish")]
    NotReady,

    /// The filename cannot be a repository path segment.
    #[error("{0}")]
    InvalidFilename(#[from] TypeError),

    /// The destination choice was rejected by the resolver.
    #[error("invalid destination: {0}")]
    InvalidPath(#[from] PathError),

    /// The title or author cannot be represented in front matter.
    #[error("cannot render document: {0}")]
    Render(#[from] RenderError),

    /// A publish for this draft is already in flight.
    #[error("a publish for this draft is already in progress")]
    AlreadyInProgress,

    /// The pre-write lookup failed; nothing was written.
    #[error("lookup failed: {0}")]
    LookupFailed(StoreError),

    /// The remote file changed between lookup and write. Reported
    /// distinctly so the caller can offer "reload and retry".
    #[error("remote file changed since lookup: {0}")]
    Conflict(String),

    /// The write was rejected by the store.
    #[error("write failed: {0}")]
    WriteFailed(StoreError),

    /// The whole attempt exceeded the configured bound.
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ClientError> for PublishError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Lookup(e) => PublishError::LookupFailed(e),
            ClientError::Conflict(message) => PublishError::Conflict(message),
            ClientError::Write(e) => PublishError::WriteFailed(e),
        }
    }
}

/// The publish orchestrator.
///
/// Holds no draft state of its own; drafts are owned by the UI layer and
/// passed in per call. Distinct drafts may publish concurrently.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use postforge::core::config::PublishConfig;
/// use postforge::core::paths::DestinationChoice;
/// use postforge::publish::Publisher;
/// use postforge::store::github::GitHubContentStore;
///
/// let config = PublishConfig::load()?;
/// let store = Arc::new(GitHubContentStore::new(token, "linxz-coder", "zola-basic"));
/// let publisher = Publisher::new(store, &config)?;
///
/// let outcome = publisher.publish(&draft, &DestinationChoice::preset("blog")).await?;
/// println!("published to {}", outcome.path());
/// ```
pub struct Publisher {
    resolver: PathResolver,
    client: PublishClient,
    timeout: Duration,
    in_flight: Mutex<HashSet<DraftId>>,
}

impl Publisher {
    /// Create a publisher over `store`, configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if the configured content layout does not
    /// resolve (validation normally catches this at config load).
    pub fn new(store: Arc<dyn ContentStore>, config: &PublishConfig) -> Result<Self, PathError> {
        let resolver = PathResolver::from_config(&config.content)?;
        let client = PublishClient::new(
            store,
            config.repository.branch.clone(),
            config.publish.commit_message.clone(),
        );
        Ok(Self::from_parts(
            resolver,
            client,
            Duration::from_secs(config.publish.timeout_secs),
        ))
    }

    /// Assemble a publisher from already-built parts.
    pub fn from_parts(resolver: PathResolver, client: PublishClient, timeout: Duration) -> Self {
        Self {
            resolver,
            client,
            timeout,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Publish a draft to the chosen destination.
    ///
    /// Runs the full lifecycle and returns the classified outcome
    /// unchanged; see [`PublishError`] for the failure taxonomy.
    pub async fn publish(
        &self,
        draft: &Draft,
        choice: &DestinationChoice,
    ) -> Result<PublishOutcome, PublishError> {
        let _slot = self.claim(draft.id())?;

        if !Readiness::of(draft).is_ready() {
            return Err(PublishError::NotReady);
        }
        let filename = Filename::new(draft.filename.clone())?;
        let destination = self.resolver.resolve(choice)?;
        let path = destination.join(&filename);
        let document = render(draft)?;

        info!(draft = %draft.id(), %path, "publishing draft");

        let attempt = self.client.put_document(&path, &document);
        let result = match tokio::time::timeout(self.timeout, attempt).await {
            Err(_) => Err(PublishError::Timeout(self.timeout)),
            Ok(Err(err)) => Err(PublishError::from(err)),
            Ok(Ok(WriteKind::Created)) => Ok(PublishOutcome::Created { path }),
            Ok(Ok(WriteKind::Updated)) => Ok(PublishOutcome::Updated { path }),
        };

        match &result {
            Ok(outcome) => info!(draft = %draft.id(), path = outcome.path(), "publish complete"),
            Err(err) => warn!(draft = %draft.id(), error = %err, "publish failed"),
        }
        result
    }

    /// Claim the in-flight slot for a draft.
    fn claim(&self, id: DraftId) -> Result<InFlightSlot<'_>, PublishError> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(id) {
            return Err(PublishError::AlreadyInProgress);
        }
        Ok(InFlightSlot {
            set: &self.in_flight,
            id,
        })
    }
}

/// RAII release of a draft's in-flight slot.
struct InFlightSlot<'a> {
    set: &'a Mutex<HashSet<DraftId>>,
    id: DraftId,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.id);
        }
    }
}
