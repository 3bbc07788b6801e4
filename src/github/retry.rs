// src/github/retry.rs
// =============================================================================
// Bounded retry shared by API listings and file downloads.
//
// - Only transient failures (timeouts, connection errors) are retried
// - The wait doubles after every failed attempt (HttpConfig::backoff_for)
// - Each attempt and each wait races against the cancel flag
// =============================================================================

use super::GithubError;
use crate::config::{CancelFlag, HttpConfig};
use std::future::Future;

// Splits request errors into "try again" and "give up"
pub(crate) enum RequestFailure {
    Transient(reqwest::Error),
    Fatal(GithubError),
}

impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        if GithubError::is_transient(&error) {
            RequestFailure::Transient(error)
        } else {
            RequestFailure::Fatal(GithubError::Unexpected(error.to_string()))
        }
    }
}

impl From<GithubError> for RequestFailure {
    fn from(error: GithubError) -> Self {
        RequestFailure::Fatal(error)
    }
}

// Runs `attempt` until it succeeds, fails for good, or the flag is raised
//
// `what` only labels the log lines.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &HttpConfig,
    cancel: &CancelFlag,
    what: &str,
    mut attempt: F,
) -> Result<T, GithubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestFailure>>,
{
    let mut tries = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(GithubError::Cancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GithubError::Cancelled),
            outcome = attempt() => outcome,
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(RequestFailure::Fatal(e)) => return Err(e),
            Err(RequestFailure::Transient(source)) if tries >= config.max_attempts => {
                return Err(GithubError::TransientNetwork {
                    attempts: tries,
                    source,
                })
            }
            Err(RequestFailure::Transient(e)) => {
                let delay = config.backoff_for(tries);
                tracing::warn!(
                    what,
                    attempt = tries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient network error, retrying"
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(GithubError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                tries += 1;
            }
        }
    }
}
