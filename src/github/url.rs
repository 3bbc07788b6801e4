// src/github/url.rs
// =============================================================================
// Turns a GitHub directory URL into a RepoLocation (owner, repo, branch, path).
//
// Accepted shapes:
//   https://github.com/owner/repo
//   https://github.com/owner/repo/tree/branch
//   https://github.com/owner/repo/tree/branch/path/to/dir
//   github.com/owner/repo            (scheme is optional)
//
// Anything after owner/repo is only interpreted when the third segment is
// literally "tree"; otherwise the branch stays "main" and the path is empty.
//
// Browsers show spaces and non-ASCII names percent-encoded, so segments are
// decoded here; the API client encodes them again when building requests.
// =============================================================================

use super::GithubError;
use percent_encoding::percent_decode_str;
use url::Url;

pub const DEFAULT_BRANCH: &str = "main";

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

// A resolved owner/repo/branch/path tuple identifying one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path inside the repository, "" for the root
    pub path: String,
}

impl RepoLocation {
    pub fn new(owner: &str, repo: &str, branch: &str, path: &str) -> Self {
        RepoLocation {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            path: path.trim_matches('/').to_string(),
        }
    }

    // Same repository and branch, different directory
    pub fn with_path(&self, path: &str) -> Self {
        RepoLocation::new(&self.owner, &self.repo, &self.branch, path)
    }
}

impl std::fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}:/{}", self.owner, self.repo, self.branch, self.path)
    }
}

// Parses a GitHub directory URL
//
// Returns InvalidUrl when the host is not github.com / www.github.com or when
// fewer than two path segments (owner, repo) are present.
pub fn parse_github_dir_url(input: &str) -> Result<RepoLocation, GithubError> {
    let trimmed = input.trim();

    // Allow "github.com/owner/repo" without a scheme
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme)
        .map_err(|e| GithubError::invalid_url(input, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GithubError::invalid_url(
            input,
            format!("scheme '{}' is not http or https", parsed.scheme()),
        ));
    }

    let host = parsed.host_str().unwrap_or_default();
    if !GITHUB_HOSTS.contains(&host) {
        return Err(GithubError::invalid_url(
            input,
            format!("host '{}' is not github.com", host),
        ));
    }

    let parts: Vec<String> = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .map(|s| decode_segment(input, s))
        .collect::<Result<_, _>>()?;

    if parts.len() < 2 {
        return Err(GithubError::invalid_url(
            input,
            "expected at least /owner/repo in the URL path",
        ));
    }

    let owner = &parts[0];
    let repo = parts[1].trim_end_matches(".git");
    let mut branch = DEFAULT_BRANCH;
    let mut path = String::new();

    if parts.len() >= 3 && parts[2] == "tree" {
        if let Some(b) = parts.get(3) {
            branch = b.as_str();
        }
        if parts.len() >= 5 {
            path = parts[4..].join("/");
        }
    }

    Ok(RepoLocation::new(owner, repo, branch, &path))
}

fn decode_segment(input: &str, segment: &str) -> Result<String, GithubError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| GithubError::invalid_url(input, format!("bad escape in '{}': {}", segment, e)))
}

// Explicit owner/repo/branch/path values that win over whatever the URL says
#[derive(Debug, Clone, Default)]
pub struct LocationOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub path: Option<String>,
}

// Builds the location to list from an optional URL plus explicit fields
//
// Blank override values count as "not given". Without a URL, owner and repo
// must both be supplied.
pub fn resolve_location(
    url: Option<&str>,
    overrides: &LocationOverrides,
) -> Result<RepoLocation, GithubError> {
    let base = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(u) => Some(parse_github_dir_url(u)?),
        None => None,
    };

    let pick = |explicit: &Option<String>, parsed: Option<&String>| -> Option<String> {
        explicit
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| parsed.cloned())
    };

    let owner = pick(&overrides.owner, base.as_ref().map(|b| &b.owner));
    let repo = pick(&overrides.repo, base.as_ref().map(|b| &b.repo));
    let branch = pick(&overrides.branch, base.as_ref().map(|b| &b.branch))
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let path = pick(&overrides.path, base.as_ref().map(|b| &b.path)).unwrap_or_default();

    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok(RepoLocation::new(&owner, &repo, &branch, &path)),
        _ => Err(GithubError::invalid_url(
            url.unwrap_or(""),
            "provide at minimum the repository owner and repo name (or a valid GitHub URL)",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_tree_url() {
        let loc = parse_github_dir_url("https://github.com/octo/demo/tree/dev/slides/2024/q1").unwrap();
        assert_eq!(loc.owner, "octo");
        assert_eq!(loc.repo, "demo");
        assert_eq!(loc.branch, "dev");
        assert_eq!(loc.path, "slides/2024/q1");
    }

    #[test]
    fn test_parse_repo_root_defaults() {
        let loc = parse_github_dir_url("https://github.com/owner/repo").unwrap();
        assert_eq!(loc, RepoLocation::new("owner", "repo", "main", ""));
    }

    #[test]
    fn test_parse_tree_without_path() {
        let loc = parse_github_dir_url("https://www.github.com/owner/repo/tree/release").unwrap();
        assert_eq!(loc.branch, "release");
        assert_eq!(loc.path, "");
    }

    #[test]
    fn test_segments_after_repo_ignored_without_tree() {
        let loc = parse_github_dir_url("https://github.com/owner/repo/blob/dev/deck.pptx").unwrap();
        assert_eq!(loc.branch, "main");
        assert_eq!(loc.path, "");
    }

    #[test]
    fn test_parse_without_scheme_and_git_suffix() {
        let loc = parse_github_dir_url("github.com/user/repo.git").unwrap();
        assert_eq!(loc.owner, "user");
        assert_eq!(loc.repo, "repo");
    }

    #[test]
    fn test_parse_decodes_escaped_segments() {
        let loc = parse_github_dir_url("https://github.com/octo/demo/tree/feature%2Fx/Lecture%20Slides/caf%C3%A9").unwrap();
        assert_eq!(loc.branch, "feature/x");
        assert_eq!(loc.path, "Lecture Slides/café");
    }

    #[test]
    fn test_parse_rejects_invalid_utf8_escape() {
        let err = parse_github_dir_url("https://github.com/octo/demo/tree/main/%FF").unwrap_err();
        assert!(matches!(err, GithubError::InvalidUrl { .. }));
    }

    #[test]
    fn test_parse_rejects_non_http_schemes() {
        assert!(parse_github_dir_url("ftp://github.com/octo/demo").is_err());
        assert!(parse_github_dir_url("http://github.com/octo/demo").is_ok());
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        let err = parse_github_dir_url("https://gitlab.com/user/repo").unwrap_err();
        assert!(matches!(err, GithubError::InvalidUrl { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert!(parse_github_dir_url("https://github.com/only-owner").is_err());
        assert!(parse_github_dir_url("https://github.com/").is_err());
    }

    #[test]
    fn test_overrides_win_over_url() {
        let overrides = LocationOverrides {
            branch: Some(" dev ".to_string()),
            path: Some("decks".to_string()),
            ..Default::default()
        };
        let loc = resolve_location(Some("https://github.com/octo/demo/tree/main/old"), &overrides).unwrap();
        assert_eq!(loc, RepoLocation::new("octo", "demo", "dev", "decks"));
    }

    #[test]
    fn test_fields_without_url() {
        let overrides = LocationOverrides {
            owner: Some("octo".to_string()),
            repo: Some("demo".to_string()),
            branch: Some("".to_string()),
            ..Default::default()
        };
        let loc = resolve_location(None, &overrides).unwrap();
        assert_eq!(loc, RepoLocation::new("octo", "demo", "main", ""));
    }

    #[test]
    fn test_missing_owner_and_repo() {
        let result = resolve_location(None, &LocationOverrides::default());
        assert!(matches!(result, Err(GithubError::InvalidUrl { .. })));
    }
}
