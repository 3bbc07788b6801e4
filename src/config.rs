// src/config.rs
// =============================================================================
// Runtime settings for the HTTP client and the directory walker.
//
// There is no config file: values come from command-line flags (see cli.rs)
// and fall back to the defaults below.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_DIRS: usize = 1000;

// Settings shared by every request the Contents client makes
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Root of the REST API, e.g. https://api.github.com
    pub api_base: String,
    pub timeout: Duration,
    pub download_timeout: Duration,
    /// Total tries per request, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt
    pub backoff: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            user_agent: format!("ppt-browser/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    // Delay to wait after `attempt` failed (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }
}

// Limits for one recursive walk
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Maximum number of directory listings one walk may request
    pub max_dirs: usize,
    /// Directories deeper than this (start path = depth 0) are not listed
    pub max_depth: Option<usize>,
    pub cancel: CancelFlag,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            max_dirs: DEFAULT_MAX_DIRS,
            max_depth: None,
            cancel: CancelFlag::default(),
        }
    }
}

// Cheap-to-clone flag shared by the walker, the API client and downloads
//
// Loops poll is_cancelled() between steps; in-flight requests and backoff
// sleeps race against cancelled() so Ctrl-C never waits for a timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<CancelState>);

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    // Resolves once cancel() has been called (immediately if it already was)
    pub async fn cancelled(&self) {
        loop {
            let notified = self.0.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a cancel() in between is not missed
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let config = HttpConfig {
            backoff: Duration::from_millis(100),
            ..Default::default()
        };
        assert_eq!(config.backoff_for(1), Duration::from_millis(100));
        assert_eq!(config.backoff_for(2), Duration::from_millis(200));
        assert_eq!(config.backoff_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::default();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_wakes_waiters() {
        let flag = CancelFlag::default();
        let waiter = flag.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        flag.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake up")
            .unwrap();
        // Already cancelled: returns straight away
        flag.cancelled().await;
    }
}
