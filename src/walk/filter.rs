// src/walk/filter.rs
// =============================================================================
// Decides which directory entries are PowerPoint files and turns them into
// FileRecords, the only thing the listing operations hand back.
// =============================================================================

use crate::github::{DirectoryEntry, EntryKind};
use serde::Serialize;

/// Extensions that count as PowerPoint files (compared lowercase).
pub const PPT_EXTENSIONS: [&str; 7] = [".ppt", ".pptx", ".pptm", ".pot", ".potx", ".pps", ".ppsx"];

// A matching file, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub download_url: Option<String>,
    pub html_url: Option<String>,
}

impl From<DirectoryEntry> for FileRecord {
    fn from(entry: DirectoryEntry) -> Self {
        FileRecord {
            name: entry.name,
            path: entry.path,
            size: entry.size,
            download_url: entry.download_url,
            html_url: entry.html_url,
        }
    }
}

// True when `name` ends with one of PPT_EXTENSIONS, ignoring case
pub fn is_ppt_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    PPT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

// Keeps file entries with a PowerPoint extension, in the order the API returned them
pub fn filter_ppt_files(entries: Vec<DirectoryEntry>) -> Vec<FileRecord> {
    entries
        .into_iter()
        .filter(is_ppt_entry)
        .map(FileRecord::from)
        .collect()
}

pub(crate) fn is_ppt_entry(entry: &DirectoryEntry) -> bool {
    entry.kind == EntryKind::File && is_ppt_name(&entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntryKind, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            kind,
            name: name.to_string(),
            path: format!("slides/{}", name),
            size: 1,
            download_url: None,
            html_url: None,
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        assert!(is_ppt_name("deck.pptx"));
        assert!(is_ppt_name("DECK.PPTX"));
        assert!(is_ppt_name("Template.PoTx"));
        assert!(is_ppt_name("show.pps"));
    }

    #[test]
    fn test_rejects_non_suffix_matches() {
        assert!(!is_ppt_name("deck.pptxx"));
        assert!(!is_ppt_name("deck.txt"));
        assert!(!is_ppt_name("ppt"));
        assert!(!is_ppt_name("deck.ppt.bak"));
    }

    #[test]
    fn test_every_extension_is_accepted() {
        for ext in PPT_EXTENSIONS {
            assert!(is_ppt_name(&format!("file{}", ext)), "{} should match", ext);
        }
    }

    #[test]
    fn test_filter_keeps_order_and_drops_dirs() {
        let entries = vec![
            entry(EntryKind::File, "b.pptx"),
            entry(EntryKind::Dir, "archive.ppt"),
            entry(EntryKind::File, "notes.md"),
            entry(EntryKind::File, "a.PPT"),
            entry(EntryKind::Other, "linked.pptx"),
        ];

        let names: Vec<_> = filter_ppt_files(entries).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b.pptx", "a.PPT"]);
    }
}
