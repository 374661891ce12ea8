pub mod repository;

pub use repository::GitRepository;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Where the package's sources live in version control, used to build
/// source links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Browsable `https://` form of the remote.
    pub remote: String,
    pub default_branch: String,
    /// Slash-separated path from the repository root to the working
    /// directory; empty at the root.
    pub path_from_root: String,
}

/// Manual values that take precedence over detected repository metadata.
///
/// Keys are kebab-case (`remote`, `default-branch`, `path-from-root`);
/// `url`, `path` and the snake or camel case branch keys are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RepoOverrides {
    #[serde(alias = "url")]
    pub remote: Option<String>,
    #[serde(alias = "default_branch", alias = "defaultBranch")]
    pub default_branch: Option<String>,
    #[serde(alias = "path", alias = "path_from_root")]
    pub path_from_root: Option<String>,
}

impl RepoOverrides {
    pub fn is_empty(&self) -> bool {
        self.remote.is_none() && self.default_branch.is_none() && self.path_from_root.is_none()
    }
}

impl Repo {
    /// Detect the repository enclosing `work_dir` and apply `overrides` on
    /// top. Source links are relative to `work_dir`, so the repository and
    /// the path from its root are both taken from there.
    ///
    /// Detection misses are not errors: when no repository or remote is
    /// found, the result is built from the overrides alone, and `None` is
    /// returned when they do not name a remote either.
    pub fn resolve(work_dir: &Path, overrides: &RepoOverrides) -> Option<Self> {
        let detected = match GitRepository::discover(work_dir) {
            Ok(repo) => Some(repo.metadata(work_dir)),
            Err(e) => {
                tracing::debug!("no repository metadata: {e}");
                None
            }
        };

        let remote = overrides
            .remote
            .clone()
            .or_else(|| detected.as_ref().and_then(|d| d.remote.clone()))?;
        let default_branch = overrides
            .default_branch
            .clone()
            .or_else(|| detected.as_ref().and_then(|d| d.default_branch.clone()))
            .unwrap_or_else(|| "main".to_string());
        let path_from_root = overrides
            .path_from_root
            .clone()
            .or_else(|| detected.as_ref().map(|d| d.path_from_root.clone()))
            .unwrap_or_default();

        Some(Self {
            remote: normalize_remote(&remote),
            default_branch,
            path_from_root: path_from_root.trim_matches('/').to_string(),
        })
    }
}

static SCP_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@([^:/]+):(.+?)(?:\.git)?/?$").expect("invalid regex")
});

static URL_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ssh|git|https?)://(?:[^@/]+@)?([^/:]+)(?::\d+)?/(.+?)(?:\.git)?/?$")
        .expect("invalid regex")
});

/// Rewrite a git remote into its browsable `https://` form:
/// `git@host:owner/repo.git` and `ssh://git@host/owner/repo.git` both
/// become `https://host/owner/repo`.
pub fn normalize_remote(remote: &str) -> String {
    if let Some(c) = SCP_REMOTE.captures(remote) {
        return format!("https://{}/{}", &c[1], &c[2]);
    }
    if let Some(c) = URL_REMOTE.captures(remote) {
        return format!("https://{}/{}", &c[1], &c[2]);
    }
    remote.trim_end_matches('/').to_string()
}
