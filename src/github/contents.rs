// src/github/contents.rs
// =============================================================================
// Client for the GitHub Contents API:
//
//   GET /repos/{owner}/{repo}/contents/{path}?ref={branch}
//
// The API answers with a JSON array when the path is a directory and with a
// single JSON object when it is a file. Both come back from here as a Vec.
//
// Every request:
// - carries `Authorization: Bearer <token>` when a token was supplied
// - is retried on timeouts/connection failures with exponential backoff
// - is never retried on an HTTP error status (404, 403, 500, ...)
// =============================================================================

use super::retry::{with_retry, RequestFailure};
use super::{GithubError, RepoLocation};
use crate::config::{CancelFlag, HttpConfig};
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

// Kind of a directory child as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// symlink, submodule, ... (never collected or expanded)
    #[serde(other)]
    Other,
}

// One child of a directory, exactly as the API returns it (fields we use only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

// Directory listings are arrays, file lookups are a single object
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Many(Vec<DirectoryEntry>),
    One(DirectoryEntry),
}

impl From<ContentsResponse> for Vec<DirectoryEntry> {
    fn from(response: ContentsResponse) -> Self {
        match response {
            ContentsResponse::Many(entries) => entries,
            ContentsResponse::One(entry) => vec![entry],
        }
    }
}

pub struct ContentsClient {
    client: Client,
    config: HttpConfig,
    token: Option<SecretString>,
    cancel: CancelFlag,
}

impl ContentsClient {
    // Builds a client; `token` is kept only for the lifetime of this value
    pub fn new(config: HttpConfig, token: Option<SecretString>) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GithubError::Unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(ContentsClient {
            client,
            config,
            token,
            cancel: CancelFlag::default(),
        })
    }

    // Requests in flight (and retry waits) end with Cancelled once `cancel` is raised
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // Lists the immediate children of `location.path` on `location.branch`
    pub async fn list(&self, location: &RepoLocation) -> Result<Vec<DirectoryEntry>, GithubError> {
        let url = self.contents_url(location)?;

        with_retry(&self.config, &self.cancel, &location.path, || {
            tracing::debug!(%url, "requesting contents");
            self.request_once(&url, &location.path)
        })
        .await
    }

    async fn request_once(&self, url: &Url, path: &str) -> Result<Vec<DirectoryEntry>, RequestFailure> {
        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(RequestFailure::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestFailure::Fatal(GithubError::from_status(status, path, &body)));
        }

        let parsed: ContentsResponse = response.json().await.map_err(|e| {
            if GithubError::is_transient(&e) {
                RequestFailure::Transient(e)
            } else {
                RequestFailure::Fatal(GithubError::Unexpected(format!(
                    "could not decode contents of '{}': {}",
                    path, e
                )))
            }
        })?;

        Ok(parsed.into())
    }

    // {api_base}/repos/{owner}/{repo}/contents/{path...}?ref={branch}
    fn contents_url(&self, location: &RepoLocation) -> Result<Url, GithubError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| GithubError::invalid_url(&self.config.api_base, e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| GithubError::invalid_url(&self.config.api_base, "cannot be used as an API base"))?
            .pop_if_empty()
            .extend(["repos", location.owner.as_str(), location.repo.as_str(), "contents"])
            .extend(location.path.split('/').filter(|s| !s.is_empty()));

        url.query_pairs_mut().append_pair("ref", &location.branch);
        Ok(url)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is #[serde(untagged)]?
//    - serde tries each variant in order until one deserializes
//    - An array matches Many, a single object matches One
//
// 2. Why SecretString for the token?
//    - Its Debug output is redacted, so the token never leaks into logs
//    - expose_secret() makes every place that reads it easy to find
// -----------------------------------------------------------------------------
