//! store::github
//!
//! GitHub content store implementation over the repository contents API.
//!
//! # Design
//!
//! One endpoint pair covers the whole protocol:
//! - `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` for lookup
//!   (404 means the file does not exist yet)
//! - `PUT /repos/{owner}/{repo}/contents/{path}` for the atomic write,
//!   carrying the base64 content, commit message, branch, and - when
//!   overwriting - the `sha` version token from the lookup
//!
//! A 409 on the write means the token went stale between lookup and write
//! and surfaces as [`StoreError::Conflict`].
//!
//! # Authentication
//!
//! A bearer token is supplied at construction. The core never stores or
//! refreshes credentials; the embedding app owns the token's lifecycle.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! `StoreError::RateLimited` when limits are hit and does not retry
//! (caller's responsibility).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{ContentStore, RemoteFileRef, StoreError, WriteRequest};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "postforge";

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// GitHub content store implementation.
///
/// # Example
///
/// ```ignore
/// use postforge::store::github::GitHubContentStore;
/// use postforge::store::ContentStore;
///
/// let store = GitHubContentStore::new(token, "linxz-coder", "zola-basic");
/// let existing = store.lookup("content/blog/hello.md", "main").await?;
/// ```
pub struct GitHubContentStore {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token supplied by the embedding app
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubContentStore")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubContentStore {
    /// Create a new GitHub content store.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token or GitHub App token
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a GitHub content store with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations, or to point the store
    /// at a local test server.
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into(),
        }
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| StoreError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Build URL for a contents endpoint.
    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, StoreError> {
        // Try to get the error message from the body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => StoreError::AuthFailed("invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                StoreError::AuthFailed(format!("permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::CONFLICT => StoreError::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited,
            _ if status.is_server_error() => StoreError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => StoreError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn lookup(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFileRef>, StoreError> {
        let url = self.contents_url(path);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[("ref", branch)])
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();

        // Absence is an expected outcome, not an error.
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status.is_success() {
            let entry: GitHubContentEntry =
                response.json().await.map_err(|e| StoreError::ApiError {
                    status: status.as_u16(),
                    message: format!("failed to parse response: {}", e),
                })?;
            Ok(Some(RemoteFileRef {
                path: path.to_string(),
                branch: branch.to_string(),
                sha: entry.sha,
            }))
        } else {
            self.handle_error_response(response, status).await
        }
    }

    async fn write(&self, request: WriteRequest) -> Result<RemoteFileRef, StoreError> {
        let url = self.contents_url(&request.path);

        let body = WriteBody {
            message: &request.message,
            content: &request.content_base64,
            branch: &request.branch,
            sha: request.sha.as_deref(),
        };

        let response = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let written: GitHubWriteResponse =
                response.json().await.map_err(|e| StoreError::ApiError {
                    status: status.as_u16(),
                    message: format!("failed to parse response: {}", e),
                })?;
            Ok(RemoteFileRef {
                path: request.path,
                branch: request.branch,
                sha: written.content.sha,
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for the contents write endpoint.
#[derive(Serialize)]
struct WriteBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub content entry (subset; unused fields are not parsed).
#[derive(Deserialize)]
struct GitHubContentEntry {
    sha: String,
}

/// GitHub contents write response format.
#[derive(Deserialize)]
struct GitHubWriteResponse {
    content: GitHubContentEntry,
}
