// src/walk/mod.rs
// =============================================================================
// Listing PowerPoint files in a repository directory.
//
// Two modes:
// - list_directory: one request, only the directory itself
// - walk_directory: follows subdirectories (see stack.rs)
//
// Both apply the same extension filter (see filter.rs).
// =============================================================================

mod filter;
mod stack;

pub use filter::FileRecord;

use filter::filter_ppt_files;
pub use stack::walk_directory;

use crate::github::{ContentsClient, GithubError, RepoLocation};

// Lists matching files directly inside `location`, never descending
//
// Entries come back in the order the API returned them.
pub async fn list_directory(
    client: &ContentsClient,
    location: &RepoLocation,
) -> Result<Vec<FileRecord>, GithubError> {
    let entries = client.list(location).await?;
    Ok(filter_ppt_files(entries))
}

// Gives walk results a stable order
pub fn sort_by_path(records: &mut [FileRecord]) {
    records.sort_by(|a, b| a.path.cmp(&b.path));
}
