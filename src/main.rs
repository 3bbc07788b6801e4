// src/main.rs
// =============================================================================
// Entry point of the ppt-browser CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Resolve the repository location (URL and/or explicit fields)
// 3. List matching files, one level or recursively
// 4. Print them (table or JSON) or download them
// 5. Exit with 0 = files found, 1 = nothing matched, 2 = error
// =============================================================================

mod cli;
mod config;
mod download;
mod github;
mod walk;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, SourceArgs};
use config::CancelFlag;
use github::{ContentsClient, GithubError};
use secrecy::SecretString;
use std::path::Path;
use std::time::Duration;
use walk::FileRecord;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", describe_error(&e));
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr; RUST_LOG=debug shows every API request
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Ctrl-C aborts listings, retry waits and downloads in flight
    let cancel = CancelFlag::default();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match cli.command {
        Commands::List {
            source,
            preview,
            json,
        } => handle_list(&source, preview, json, cancel).await,
        Commands::Download {
            source,
            out_dir,
            download_timeout,
        } => handle_download(&source, &out_dir, download_timeout, cancel).await,
    }
}

// Resolves the location and collects matching FileRecords
//
// The client is handed back so downloads can reuse its settings.
async fn collect_files(
    source: &SourceArgs,
    cancel: CancelFlag,
    quiet: bool,
) -> Result<(ContentsClient, Vec<FileRecord>)> {
    let location = github::resolve_location(source.url.as_deref(), &source.overrides())?;

    let token = source
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_string()));
    let client = ContentsClient::new(source.http_config(), token)?.with_cancel(cancel.clone());

    if !quiet {
        println!("🔍 Listing {}", location);
        if !client.is_authenticated() {
            println!("   (no token: unauthenticated rate limits apply)");
        }
    }

    let mut files = if source.recursive {
        walk::walk_directory(&client, &location, &source.walk_config(cancel)).await?
    } else {
        walk::list_directory(&client, &location).await?
    };

    if source.sort {
        walk::sort_by_path(&mut files);
    }

    Ok((client, files))
}

// Handles the 'list' subcommand
async fn handle_list(source: &SourceArgs, preview: bool, json: bool, cancel: CancelFlag) -> Result<i32> {
    let (_, files) = collect_files(source, cancel, json).await?;

    if json {
        print_json(&files, preview)?;
    } else if files.is_empty() {
        println!("⚠️  No PowerPoint files found in the specified directory");
    } else {
        println!("📄 Found {} PowerPoint file(s)\n", files.len());
        print_table(&files, preview);
    }

    Ok(if files.is_empty() { 1 } else { 0 })
}

// Handles the 'download' subcommand
async fn handle_download(
    source: &SourceArgs,
    out_dir: &Path,
    download_timeout: u64,
    cancel: CancelFlag,
) -> Result<i32> {
    let (client, files) = collect_files(source, cancel.clone(), false).await?;

    if files.is_empty() {
        println!("⚠️  No PowerPoint files found in the specified directory");
        return Ok(1);
    }

    println!("📄 Found {} PowerPoint file(s), downloading to {}\n", files.len(), out_dir.display());

    let mut http = client.config().clone();
    http.download_timeout = Duration::from_secs(download_timeout);
    let downloader = download::Downloader::new(&http, out_dir)?.with_cancel(cancel.clone());

    let mut downloaded = 0usize;
    let mut failed = 0usize;
    for file in &files {
        if cancel.is_cancelled() {
            return Err(GithubError::Cancelled.into());
        }

        match downloader.download(file).await {
            Ok(Some((target, bytes))) => {
                println!("   ✅ {} ({}) -> {}", file.path, format_size(bytes), target.display());
                downloaded += 1;
            }
            Ok(None) => {
                println!("   ⚠️  {}: no direct download URL available", file.path);
                failed += 1;
            }
            Err(GithubError::Cancelled) => return Err(GithubError::Cancelled.into()),
            Err(e) => {
                println!("   ❌ {}: {}", file.path, e);
                failed += 1;
            }
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Downloaded: {}", downloaded);
    println!("   ❌ Failed: {}", failed);

    Ok(if failed > 0 { 2 } else { 0 })
}

fn print_json(files: &[FileRecord], preview: bool) -> Result<()> {
    let output = if preview {
        let with_preview: Vec<_> = files
            .iter()
            .map(|f| -> Result<serde_json::Value, serde_json::Error> {
                let mut value = serde_json::to_value(f)?;
                value["preview_url"] = f
                    .download_url
                    .as_deref()
                    .and_then(download::preview_url)
                    .into();
                Ok(value)
            })
            .collect::<Result<_, serde_json::Error>>()?;
        serde_json::to_string_pretty(&with_preview)?
    } else {
        serde_json::to_string_pretty(files)?
    };
    println!("{}", output);
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(files: &[FileRecord], preview: bool) {
    println!("{:<40} {:>12}  {:<50}", "NAME", "SIZE", "PATH");
    println!("{}", "=".repeat(104));

    for file in files {
        println!(
            "{:<40} {:>12}  {:<50}",
            truncate(&file.name, 40),
            format_size(file.size),
            file.path
        );
        if let Some(html) = &file.html_url {
            println!("{:<40} view:     {}", "", html);
        }
        if preview {
            if let Some(link) = file.download_url.as_deref().and_then(download::preview_url) {
                println!("{:<40} preview:  {}", "", link);
            }
        }
    }

    let total: u64 = files.iter().map(|f| f.size).sum();
    println!();
    println!("📊 {} file(s), {} total", files.len(), format_size(total));
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// 1234567 -> "1,234,567 bytes"
fn format_size(bytes: u64) -> String {
    let digits = bytes.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{} bytes", out)
}

// Turns library errors into the message a user should see
fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<GithubError>() {
        Some(GithubError::NotFound { .. }) => {
            "Repository or path not found. Check the owner, repo, branch and path.".to_string()
        }
        Some(GithubError::ForbiddenOrRateLimited { status }) => format!(
            "Access forbidden or rate-limited by the GitHub API (HTTP {}). \
             Pass a personal access token with --token, or check the one you passed.",
            status
        ),
        Some(GithubError::InvalidUrl { .. }) => format!(
            "{}\nExpected a URL like https://github.com/owner/repo/tree/main/path/to/dir",
            error
        ),
        Some(GithubError::RequestBudgetExceeded { limit }) => format!(
            "The directory tree is larger than the request budget ({} directories). \
             Raise it with --max-dirs or narrow the start path.",
            limit
        ),
        Some(GithubError::Cancelled) => "Interrupted; partial downloads were removed.".to_string(),
        _ => error.to_string(),
    }
}
