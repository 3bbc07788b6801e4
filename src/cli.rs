// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   ppt-browser list https://github.com/owner/repo/tree/main/slides --recursive
//   ppt-browser download https://github.com/owner/repo -r --out-dir ./decks
//
// Both subcommands share the same location and walk options (SourceArgs).
// =============================================================================

use crate::config::{
    CancelFlag, HttpConfig, WalkConfig, DEFAULT_API_BASE, DEFAULT_DOWNLOAD_TIMEOUT_SECS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DIRS, DEFAULT_TIMEOUT_SECS,
};
use crate::github::LocationOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "ppt-browser",
    version,
    about = "List and download PowerPoint files from a GitHub repository directory",
    long_about = "ppt-browser lists .ppt/.pptx/.pptm/.pot/.potx/.pps/.ppsx files in a GitHub \
                  repository directory (optionally walking subdirectories) and can download them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List PowerPoint files in a repository directory
    ///
    /// Example: ppt-browser list https://github.com/owner/repo/tree/main/slides
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Also print a link to an online preview of each file
        #[arg(long)]
        preview: bool,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Download every listed PowerPoint file into a local directory
    ///
    /// Repository paths are kept, so slides/a.pptx ends up at <out-dir>/slides/a.pptx
    Download {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory to write the files into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Timeout per file download, in seconds
        #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT_SECS)]
        download_timeout: u64,
    },
}

// Where to look and how far to walk
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// GitHub directory URL (e.g. https://github.com/owner/repo/tree/branch/path)
    pub url: Option<String>,

    /// Repository owner (user or org); overrides the URL
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name; overrides the URL
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch, tag or commit; overrides the URL (default: main)
    #[arg(long)]
    pub branch: Option<String>,

    /// Path inside the repository; overrides the URL (default: root)
    #[arg(long)]
    pub path: Option<String>,

    /// GitHub personal access token, for private repos or higher rate limits
    #[arg(long)]
    pub token: Option<String>,

    /// Search subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    /// Sort results by path (walk order otherwise)
    #[arg(long)]
    pub sort: bool,

    /// Maximum number of directories one recursive walk may list
    #[arg(long, default_value_t = DEFAULT_MAX_DIRS)]
    pub max_dirs: usize,

    /// Do not descend more than this many levels below the start directory
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Timeout per API request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts per API request on timeouts or connection failures
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,

    /// REST API root (for GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl SourceArgs {
    pub fn overrides(&self) -> LocationOverrides {
        LocationOverrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            path: self.path.clone(),
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout),
            max_attempts: self.retries,
            ..Default::default()
        }
    }

    pub fn walk_config(&self, cancel: CancelFlag) -> WalkConfig {
        WalkConfig {
            max_dirs: self.max_dirs,
            max_depth: self.max_depth,
            cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["ppt-browser", "list", "https://github.com/octo/demo"]);
        let Commands::List { source, preview, json } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(source.url.as_deref(), Some("https://github.com/octo/demo"));
        assert!(!source.recursive && !preview && !json);

        let http = source.http_config();
        assert_eq!(http.api_base, DEFAULT_API_BASE);
        assert_eq!(http.timeout, Duration::from_secs(30));
        assert_eq!(http.max_attempts, 3);
        assert_eq!(source.walk_config(CancelFlag::default()).max_dirs, 1000);
    }

    #[test]
    fn test_download_with_fields() {
        let cli = Cli::parse_from([
            "ppt-browser", "download", "--owner", "octo", "--repo", "demo", "-r", "-o", "out",
            "--max-depth", "2",
        ]);
        let Commands::Download { source, out_dir, .. } = cli.command else {
            panic!("expected download");
        };
        assert!(source.url.is_none());
        assert!(source.recursive);
        assert_eq!(out_dir, PathBuf::from("out"));
        assert_eq!(source.overrides().owner.as_deref(), Some("octo"));
        assert_eq!(source.walk_config(CancelFlag::default()).max_depth, Some(2));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let result = Cli::try_parse_from(["ppt-browser", "list", "--retries", "0", "x"]);
        assert!(result.is_err());
    }
}
