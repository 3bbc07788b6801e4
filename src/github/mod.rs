// src/github/mod.rs
// =============================================================================
// Everything that knows about GitHub:
// - url: parsing github.com directory URLs into a RepoLocation
// - contents: the Contents API client (auth, retries, status mapping)
// - error: the error taxonomy shared by the whole crate
// - retry: bounded retry with backoff, abandoned on cancel
// =============================================================================

mod contents;
mod error;
mod retry;
mod url;

pub use contents::{ContentsClient, DirectoryEntry, EntryKind};
pub use error::GithubError;
pub(crate) use retry::{with_retry, RequestFailure};
pub use self::url::{resolve_location, LocationOverrides, RepoLocation};
