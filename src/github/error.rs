// src/github/error.rs
// =============================================================================
// Error types for talking to the GitHub Contents API and walking a repo tree.
//
// The binary turns these into user-facing messages (see main.rs); inside the
// library they propagate unchanged with `?`.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    /// The input was not a usable GitHub directory URL (or owner/repo were missing)
    #[error("invalid GitHub URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The API answered 404 for this path
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// 401/403/429: bad or missing credentials, or the rate limit was hit
    #[error("access forbidden or rate-limited (HTTP {status}); supply or verify a GitHub access token")]
    ForbiddenOrRateLimited { status: u16 },

    /// Timeout or connection failure, after all retry attempts were used
    #[error("network error after {attempts} attempt(s): {source}")]
    TransientNetwork {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The walk needed more directory listings than the configured budget
    #[error("request budget exhausted: more than {limit} directories would be listed")]
    RequestBudgetExceeded { limit: usize },

    #[error("cancelled")]
    Cancelled,

    /// Writing a downloaded file failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Anything else, surfaced verbatim
    #[error("unexpected GitHub API error: {0}")]
    Unexpected(String),
}

impl GithubError {
    pub fn invalid_url(input: &str, reason: impl Into<String>) -> Self {
        GithubError::InvalidUrl {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    // Maps a non-success HTTP status to the matching variant
    pub(crate) fn from_status(status: StatusCode, path: &str, body: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => GithubError::NotFound {
                path: path.to_string(),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                GithubError::ForbiddenOrRateLimited {
                    status: status.as_u16(),
                }
            }
            other => {
                let excerpt: String = body.chars().take(200).collect();
                GithubError::Unexpected(format!("HTTP {} for '{}': {}", other.as_u16(), path, excerpt))
            }
        }
    }

    // Only timeouts and connection failures are worth another attempt
    pub(crate) fn is_transient(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}
