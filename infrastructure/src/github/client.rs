//! GitHub REST API client backing the review tools.

use crate::retry::{with_backoff, Retryable};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use warden_domain::cap_chars;

/// Diff payload ceiling, in characters.
pub const DIFF_CHAR_CEILING: usize = 120_000;

/// File content payload ceiling, in characters.
pub const FILE_CHAR_CEILING: usize = 80_000;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const API_VERSION: &str = "2022-11-28";

/// Errors from the code host
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("Invalid GitHub client configuration: {0}")]
    Configuration(String),

    #[error("GitHub API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("GitHub API unavailable ({status}) for {url}")]
    Unavailable { status: u16, url: String },

    #[error("GitHub request timed out: {0}")]
    Timeout(String),

    #[error("GitHub transport error: {0}")]
    Transport(String),
}

impl Retryable for GithubError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            GithubError::Unavailable { .. } | GithubError::Timeout(_)
        )
    }
}

/// One changed file in a pull request, with its change counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
}

/// Read-only GitHub REST client.
///
/// All requests carry the bearer credential; constructing the client
/// requires one, so the missing-token case is caught by the
/// configuration layer before any network call.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(
        token: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GithubError::Configuration("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(USER_AGENT, HeaderValue::from_static("diffwarden/0.1"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GithubError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the unified diff for a pull request, truncated at
    /// [`DIFF_CHAR_CEILING`] characters.
    pub async fn fetch_pr_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, GithubError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}", self.base_url);
        debug!(%url, "fetching PR diff");
        let diff = with_backoff("fetch_pr_diff", || {
            self.get_text(&url, DIFF_MEDIA_TYPE, &[])
        })
        .await?;
        Ok(cap_chars(&diff, DIFF_CHAR_CEILING, "diff"))
    }

    /// List files changed in a pull request with add/delete/change counts.
    pub async fn list_changed_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, GithubError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/pulls/{number}/files",
            self.base_url
        );
        debug!(%url, "listing changed files");
        let body = with_backoff("list_changed_files", || {
            self.get_text(&url, JSON_MEDIA_TYPE, &[("per_page", "100")])
        })
        .await?;
        let files: Vec<ChangedFile> = serde_json::from_str(&body)
            .map_err(|e| GithubError::Transport(format!("malformed file listing: {e}")))?;
        serde_json::to_string_pretty(&files)
            .map_err(|e| GithubError::Transport(format!("failed to serialize file listing: {e}")))
    }

    /// Read raw file content at a git ref, truncated at
    /// [`FILE_CHAR_CEILING`] characters.
    pub async fn read_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GithubError> {
        let url = format!("{}/repos/{owner}/{repo}/contents/{path}", self.base_url);
        debug!(%url, %git_ref, "reading file content");
        let query = [("ref", git_ref)];
        let content = with_backoff("read_file", || {
            self.get_text(&url, RAW_MEDIA_TYPE, &query)
        })
        .await?;
        Ok(cap_chars(&content, FILE_CHAR_CEILING, "file"))
    }

    async fn get_text(
        &self,
        url: &str,
        accept: &str,
        query: &[(&str, &str)],
    ) -> Result<String, GithubError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, accept)
            .query(query)
            .send()
            .await
            .map_err(|e| Self::map_transport(url, e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Self::classify_status(status, url));
        }
        response.text().await.map_err(|e| Self::map_transport(url, e))
    }

    fn map_transport(url: &str, error: reqwest::Error) -> GithubError {
        if error.is_timeout() {
            GithubError::Timeout(url.to_string())
        } else {
            GithubError::Transport(error.to_string())
        }
    }

    fn classify_status(status: u16, url: &str) -> GithubError {
        match status {
            429 | 500..=599 => GithubError::Unavailable {
                status,
                url: url.to_string(),
            },
            _ => GithubError::Status {
                status,
                url: url.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> GithubClient {
        GithubClient::new("test-token", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_pr_diff_sends_credential_and_media_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", DIFF_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff --git a/x b/x\n"))
            .expect(1)
            .mount(&server)
            .await;

        let diff = client(&server)
            .await
            .fetch_pr_diff("acme", "widgets", 42)
            .await
            .unwrap();
        assert_eq!(diff, "diff --git a/x b/x\n");
    }

    #[tokio::test]
    async fn test_diff_over_ceiling_is_truncated_with_marker() {
        let server = MockServer::start().await;
        let body = "a".repeat(DIFF_CHAR_CEILING + 1);
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let diff = client(&server)
            .await
            .fetch_pr_diff("acme", "widgets", 42)
            .await
            .unwrap();
        assert!(diff.starts_with(&"a".repeat(DIFF_CHAR_CEILING)));
        assert!(diff.contains(&format!("[diff truncated at {DIFF_CHAR_CEILING} chars]")));
        // Exactly the ceiling survives ahead of the marker.
        let kept = diff.split("\n\n... [").next().unwrap();
        assert_eq!(kept.chars().count(), DIFF_CHAR_CEILING);
    }

    #[tokio::test]
    async fn test_diff_at_ceiling_is_unmodified() {
        let server = MockServer::start().await;
        let body = "a".repeat(DIFF_CHAR_CEILING);
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .mount(&server)
            .await;

        let diff = client(&server)
            .await
            .fetch_pr_diff("acme", "widgets", 42)
            .await
            .unwrap();
        assert_eq!(diff, body);
    }

    #[tokio::test]
    async fn test_list_changed_files_reshapes_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42/files"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"filename": "src/a.py", "status": "modified",
                     "additions": 3, "deletions": 1, "changes": 4,
                     "sha": "abc", "blob_url": "ignored"}]"#,
            ))
            .mount(&server)
            .await;

        let listing = client(&server)
            .await
            .list_changed_files("acme", "widgets", 42)
            .await
            .unwrap();
        let files: Vec<ChangedFile> = serde_json::from_str(&listing).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "src/a.py");
        assert_eq!(files[0].changes, 4);
    }

    #[tokio::test]
    async fn test_read_file_passes_ref_and_truncates() {
        let server = MockServer::start().await;
        let body = "b".repeat(FILE_CHAR_CEILING + 10);
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/src/a.py"))
            .and(query_param("ref", "feature-branch"))
            .and(header("Accept", RAW_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let content = client(&server)
            .await
            .read_file("acme", "widgets", "src/a.py", "feature-branch")
            .await
            .unwrap();
        assert!(content.contains(&format!("[file truncated at {FILE_CHAR_CEILING} chars]")));
    }

    #[tokio::test]
    async fn test_client_error_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch_pr_diff("acme", "widgets", 42)
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_errors_get_bounded_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch_pr_diff("acme", "widgets", 42)
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::Unavailable { status: 502, .. }));
    }
}
