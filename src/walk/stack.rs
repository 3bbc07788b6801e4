// src/walk/stack.rs
// =============================================================================
// Recursive listing: walks a remote directory tree with an explicit stack.
//
// How it works:
// 1. Push the start path onto the stack
// 2. Pop a path and list it through the Contents API
// 3. Push every subdirectory we have not seen yet; keep matching files
// 4. Repeat until the stack is empty
//
// The stack is LIFO, so results come back in reverse-discovery order rather
// than alphabetical or strict depth-first order. Callers that need a stable
// order sort afterwards (see sort_by_path).
//
// Limits:
// - at most `max_dirs` listings per walk (RequestBudgetExceeded otherwise)
// - optional `max_depth`: deeper directories are not listed
// - the cancel flag is checked before every listing
// =============================================================================

use super::filter::{is_ppt_entry, FileRecord};
use crate::config::WalkConfig;
use crate::github::{ContentsClient, EntryKind, GithubError, RepoLocation};
use std::collections::HashSet;

// A directory waiting on the stack
#[derive(Debug, Clone)]
struct StackItem {
    path: String,
    depth: usize, // 0 for the start path
}

// Collects every PowerPoint file at or below `start.path`
//
// A 404 on the start path is fatal; a 404 on a directory found during the
// walk (deleted in the meantime, for instance) is skipped. Any other error
// aborts the whole walk.
pub async fn walk_directory(
    client: &ContentsClient,
    start: &RepoLocation,
    config: &WalkConfig,
) -> Result<Vec<FileRecord>, GithubError> {
    let mut stack = vec![StackItem {
        path: start.path.clone(),
        depth: 0,
    }];

    // Paths already pushed; a directory listed twice is walked once
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(start.path.clone());

    let mut collected = Vec::new();
    let mut listed = 0usize;

    while let Some(item) = stack.pop() {
        if config.cancel.is_cancelled() {
            return Err(GithubError::Cancelled);
        }

        if listed >= config.max_dirs {
            return Err(GithubError::RequestBudgetExceeded {
                limit: config.max_dirs,
            });
        }
        listed += 1;

        let entries = match client.list(&start.with_path(&item.path)).await {
            Ok(entries) => entries,
            Err(GithubError::NotFound { path }) if item.depth > 0 => {
                tracing::warn!(%path, "directory disappeared during walk, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(path = %item.path, depth = item.depth, entries = entries.len(), "listed directory");

        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    let depth = item.depth + 1;
                    if config.max_depth.is_some_and(|max| depth > max) {
                        tracing::debug!(path = %entry.path, depth, "beyond max depth, not descending");
                        continue;
                    }
                    if visited.insert(entry.path.clone()) {
                        stack.push(StackItem {
                            path: entry.path,
                            depth,
                        });
                    }
                }
                EntryKind::File if is_ppt_entry(&entry) => collected.push(FileRecord::from(entry)),
                _ => {}
            }
        }
    }

    Ok(collected)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Vec instead of VecDeque?
//    - push() and pop() both work on the end of a Vec, which makes it a stack
//    - A stack is all we need; visiting order does not change the result set
//
// 2. Why does HashSet::insert decide whether to push?
//    - insert() returns false when the value was already present
//    - So one call both checks and marks a directory as visited
//
// 3. What does `if item.depth > 0` in the match guard do?
//    - The guard only lets the NotFound arm match for subdirectories
//    - A 404 on the start path falls through to `Err(e) => return Err(e)`
// -----------------------------------------------------------------------------
