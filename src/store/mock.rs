//! store::mock
//!
//! Mock content store implementation for deterministic testing.
//!
//! # Design
//!
//! The mock store keeps files in memory, enforces the same version-token
//! rules as the real store, and allows configuring failure scenarios and
//! artificial latency. Every call is recorded so tests can assert on the
//! exact operation sequence (e.g., that a refused publish issued no
//! network call at all).
//!
//! # Example
//!
//! ```
//! use postforge::store::mock::MockContentStore;
//! use postforge::store::ContentStore;
//!
//! # tokio_test::block_on(async {
//! let store = MockContentStore::new();
//!
//! assert!(store.lookup("content/blog/hello.md", "main").await.unwrap().is_none());
//!
//! let seeded = store.seed_file("content/blog/hello.md", "main", "old body");
//! let found = store.lookup("content/blog/hello.md", "main").await.unwrap();
//! assert_eq!(found, Some(seeded));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use super::traits::{ContentStore, RemoteFileRef, StoreError, WriteRequest};

/// Mock content store for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockContentStore {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockStoreInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockStoreInner {
    /// Stored files keyed by (branch, path).
    files: HashMap<(String, String), StoredFile>,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
    /// Artificial per-call latency.
    latency: Option<Duration>,
}

/// A file held by the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Decoded file content.
    pub content: Vec<u8>,
    /// Current version token.
    pub sha: String,
    /// Commit message of the last write.
    pub message: String,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail lookup with the given error.
    Lookup(StoreError),
    /// Fail write with the given error.
    Write(StoreError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone)]
pub enum MockOperation {
    Lookup {
        path: String,
        branch: String,
    },
    Write {
        path: String,
        branch: String,
        sha: Option<String>,
        message: String,
    },
}

impl MockContentStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockStoreInner {
                files: HashMap::new(),
                fail_on: None,
                operations: Vec::new(),
                latency: None,
            })),
        }
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use postforge::store::mock::{FailOn, MockContentStore};
    /// use postforge::store::StoreError;
    ///
    /// let store = MockContentStore::new()
    ///     .fail_on(FailOn::Lookup(StoreError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Delay every call by `latency`, for in-flight and timeout tests.
    pub fn with_latency(self, latency: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.latency = Some(latency);
        }
        self
    }

    /// Place a file in the store directly, bypassing the write protocol.
    ///
    /// Returns the ref a lookup would report for it.
    pub fn seed_file(&self, path: &str, branch: &str, content: &str) -> RemoteFileRef {
        let sha = content_sha(content.as_bytes());
        let mut inner = self.inner.lock().unwrap();
        inner.files.insert(
            (branch.to_string(), path.to_string()),
            StoredFile {
                content: content.as_bytes().to_vec(),
                sha: sha.clone(),
                message: String::new(),
            },
        );
        RemoteFileRef {
            path: path.to_string(),
            branch: branch.to_string(),
            sha,
        }
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying the store was called correctly.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get a stored file (for test verification).
    pub fn file(&self, path: &str, branch: &str) -> Option<StoredFile> {
        let inner = self.inner.lock().unwrap();
        inner
            .files
            .get(&(branch.to_string(), path.to_string()))
            .cloned()
    }

    /// Get the count of stored files.
    pub fn file_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.files.len()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Sleep for the configured latency, if any.
    async fn apply_latency(&self) {
        let latency = {
            let inner = self.inner.lock().unwrap();
            inner.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<StoreError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::Lookup(e)) if expected == "lookup" => Some(e.clone()),
            Some(FailOn::Write(e)) if expected == "write" => Some(e.clone()),
            _ => None,
        }
    }
}

impl Default for MockContentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic version token: hex SHA-256 of the content bytes.
fn content_sha(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

#[async_trait]
impl ContentStore for MockContentStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn lookup(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFileRef>, StoreError> {
        self.record(MockOperation::Lookup {
            path: path.to_string(),
            branch: branch.to_string(),
        });

        self.apply_latency().await;

        if let Some(err) = self.check_fail("lookup") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner
            .files
            .get(&(branch.to_string(), path.to_string()))
            .map(|file| RemoteFileRef {
                path: path.to_string(),
                branch: branch.to_string(),
                sha: file.sha.clone(),
            }))
    }

    async fn write(&self, request: WriteRequest) -> Result<RemoteFileRef, StoreError> {
        self.record(MockOperation::Write {
            path: request.path.clone(),
            branch: request.branch.clone(),
            sha: request.sha.clone(),
            message: request.message.clone(),
        });

        self.apply_latency().await;

        if let Some(err) = self.check_fail("write") {
            return Err(err);
        }

        let content = STANDARD
            .decode(&request.content_base64)
            .map_err(|e| StoreError::ApiError {
                status: 422,
                message: format!("content is not valid base64: {}", e),
            })?;

        let mut inner = self.inner.lock().unwrap();
        let key = (request.branch.clone(), request.path.clone());

        // Enforce the same optimistic-concurrency rules as the real store.
        match (inner.files.get(&key), &request.sha) {
            (Some(existing), Some(sha)) if *sha != existing.sha => {
                return Err(StoreError::Conflict(format!(
                    "{} is at {} but expected {}",
                    request.path, existing.sha, sha
                )));
            }
            (Some(_), None) => {
                return Err(StoreError::Conflict(format!(
                    "{} already exists and no sha was supplied",
                    request.path
                )));
            }
            (None, Some(sha)) => {
                return Err(StoreError::Conflict(format!(
                    "{} does not exist but sha {} was supplied",
                    request.path, sha
                )));
            }
            _ => {}
        }

        let sha = content_sha(&content);
        inner.files.insert(
            key,
            StoredFile {
                content,
                sha: sha.clone(),
                message: request.message,
            },
        );

        Ok(RemoteFileRef {
            path: request.path,
            branch: request.branch,
            sha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(content: &str) -> String {
        STANDARD.encode(content.as_bytes())
    }

    fn write_request(path: &str, content: &str, sha: Option<&str>) -> WriteRequest {
        WriteRequest {
            path: path.to_string(),
            branch: "main".to_string(),
            content_base64: encoded(content),
            message: "Add new blog post".to_string(),
            sha: sha.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn lookup_absent_returns_none() {
        let store = MockContentStore::new();
        let found = store.lookup("content/blog/hello.md", "main").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn write_then_lookup_roundtrips() {
        let store = MockContentStore::new();

        let written = store
            .write(write_request("content/blog/hello.md", "Hi there", None))
            .await
            .unwrap();

        let found = store
            .lookup("content/blog/hello.md", "main")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, written);

        let file = store.file("content/blog/hello.md", "main").unwrap();
        assert_eq!(file.content, b"Hi there");
        assert_eq!(file.message, "Add new blog post");
    }

    #[tokio::test]
    async fn branches_are_independent() {
        let store = MockContentStore::new();
        store.seed_file("content/blog/hello.md", "main", "Hi");

        let found = store.lookup("content/blog/hello.md", "draft").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_with_current_sha_succeeds() {
        let store = MockContentStore::new();
        let seeded = store.seed_file("content/blog/hello.md", "main", "old");

        let written = store
            .write(write_request(
                "content/blog/hello.md",
                "new",
                Some(&seeded.sha),
            ))
            .await
            .unwrap();

        assert_ne!(written.sha, seeded.sha);
        let file = store.file("content/blog/hello.md", "main").unwrap();
        assert_eq!(file.content, b"new");
    }

    #[tokio::test]
    async fn stale_sha_conflicts() {
        let store = MockContentStore::new();
        store.seed_file("content/blog/hello.md", "main", "old");

        let result = store
            .write(write_request(
                "content/blog/hello.md",
                "new",
                Some("deadbeef"),
            ))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn overwrite_without_sha_conflicts() {
        let store = MockContentStore::new();
        store.seed_file("content/blog/hello.md", "main", "old");

        let result = store
            .write(write_request("content/blog/hello.md", "new", None))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_with_sha_conflicts() {
        let store = MockContentStore::new();

        let result = store
            .write(write_request("content/blog/hello.md", "new", Some("abc")))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn invalid_base64_rejected() {
        let store = MockContentStore::new();

        let result = store
            .write(WriteRequest {
                path: "content/blog/hello.md".to_string(),
                branch: "main".to_string(),
                content_base64: "not base64!!!".to_string(),
                message: "Add new blog post".to_string(),
                sha: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(StoreError::ApiError { status: 422, .. })
        ));
    }

    #[tokio::test]
    async fn fail_on_lookup() {
        let store =
            MockContentStore::new().fail_on(FailOn::Lookup(StoreError::RateLimited));

        let result = store.lookup("content/blog/hello.md", "main").await;
        assert!(matches!(result, Err(StoreError::RateLimited)));
    }

    #[tokio::test]
    async fn fail_on_write_leaves_lookup_working() {
        let store = MockContentStore::new().fail_on(FailOn::Write(StoreError::ApiError {
            status: 500,
            message: "boom".into(),
        }));

        assert!(store.lookup("x.md", "main").await.unwrap().is_none());
        let result = store.write(write_request("x.md", "body", None)).await;
        assert!(matches!(result, Err(StoreError::ApiError { .. })));
    }

    #[tokio::test]
    async fn operations_recorded_in_order() {
        let store = MockContentStore::new();

        store.lookup("content/blog/hello.md", "main").await.unwrap();
        store
            .write(write_request("content/blog/hello.md", "Hi", None))
            .await
            .unwrap();

        let ops = store.operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], MockOperation::Lookup { .. }));
        assert!(
            matches!(&ops[1], MockOperation::Write { sha, .. } if sha.is_none())
        );
    }

    #[tokio::test]
    async fn sha_is_deterministic_for_content() {
        let store = MockContentStore::new();
        let a = store.seed_file("a.md", "main", "same");
        let b = store.seed_file("b.md", "main", "same");
        assert_eq!(a.sha, b.sha);
    }

    #[test]
    fn store_name() {
        let store = MockContentStore::new();
        assert_eq!(store.name(), "mock");
        assert_eq!(store.file_count(), 0);
    }
}
