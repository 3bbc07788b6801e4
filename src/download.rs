// src/download.rs
// =============================================================================
// Fetching the bytes behind a FileRecord and building preview links.
//
// Downloads are a plain GET of `download_url` (no Authorization header) and
// are streamed to disk chunk by chunk, so large decks never sit in memory.
// Files land at `<out_dir>/<record.path>`, which keeps same-named decks from
// different directories apart.
//
// Bytes go to `<target>.part` first and are renamed into place only once the
// whole body is on disk; a failed or cancelled download leaves nothing behind.
// Transient failures are retried like API requests (see github/retry.rs).
// =============================================================================

use crate::config::{CancelFlag, HttpConfig};
use crate::github::{with_retry, GithubError, RequestFailure};
use crate::walk::FileRecord;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

const PREVIEW_SERVICE: &str = "https://view.officeapps.live.com/op/view.aspx";

// Link to an online viewer for the file at `download_url`
pub fn preview_url(download_url: &str) -> Option<String> {
    Url::parse_with_params(PREVIEW_SERVICE, &[("src", download_url)])
        .ok()
        .map(String::from)
}

pub struct Downloader {
    client: Client,
    config: HttpConfig,
    out_dir: PathBuf,
    cancel: CancelFlag,
}

impl Downloader {
    pub fn new(config: &HttpConfig, out_dir: impl Into<PathBuf>) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(config.download_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GithubError::Unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Downloader {
            client,
            config: config.clone(),
            out_dir: out_dir.into(),
            cancel: CancelFlag::default(),
        })
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    // Downloads one file; returns where it was written and how many bytes
    //
    // Ok(None) means the record has no download URL (nothing to fetch).
    pub async fn download(&self, record: &FileRecord) -> Result<Option<(PathBuf, u64)>, GithubError> {
        let Some(url) = record.download_url.as_deref() else {
            tracing::warn!(path = %record.path, "no download URL, skipping");
            return Ok(None);
        };

        let target = self.target_path(&record.path)?;
        let mut part_name = target.clone().into_os_string();
        part_name.push(".part");
        let part = PathBuf::from(part_name);

        let result = with_retry(&self.config, &self.cancel, &record.path, || {
            self.fetch_to(url, &part, &record.path)
        })
        .await;

        let written = match result {
            Ok(written) => written,
            Err(e) => {
                // Nothing may exist yet; a missing .part file is fine here
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&part, &target)
            .await
            .map_err(|source| io_error(&target, source))?;

        tracing::debug!(path = %target.display(), bytes = written, "downloaded");
        Ok(Some((target, written)))
    }

    // One attempt: GET `url` and stream the body into `part`
    async fn fetch_to(&self, url: &str, part: &Path, repo_path: &str) -> Result<u64, RequestFailure> {
        let io_err = |source| RequestFailure::Fatal(io_error(part, source));

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::from_status(status, repo_path, &body).into());
        }

        if let Some(parent) = part.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let mut file = tokio::fs::File::create(part).await.map_err(io_err)?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_err)?;

        Ok(written)
    }

    // Joins a repo path onto out_dir, refusing anything that could escape it
    fn target_path(&self, repo_path: &str) -> Result<PathBuf, GithubError> {
        let relative = Path::new(repo_path);
        let safe = relative.components().count() > 0
            && relative.components().all(|c| matches!(c, Component::Normal(_)));

        if !safe {
            return Err(GithubError::Unexpected(format!(
                "refusing to write outside the output directory: '{}'",
                repo_path
            )));
        }
        Ok(self.out_dir.join(relative))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GithubError {
    GithubError::Io {
        path: path.display().to_string(),
        source,
    }
}
