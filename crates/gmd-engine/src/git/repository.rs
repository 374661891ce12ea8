use std::path::Path;

use gmd_core::{Error, Result};

use crate::import_path;

/// Repository facts read from git, before overrides are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedRepo {
    pub remote: Option<String>,
    pub default_branch: Option<String>,
    pub path_from_root: String,
}

/// A wrapper around `gix::Repository` exposing the little metadata the
/// documentation needs.
pub struct GitRepository {
    inner: gix::Repository,
}

impl GitRepository {
    /// Discover the repository containing `path` by walking up from it.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(|e| {
            Error::Git(format!("no repository at or above {}: {}", path.display(), e))
        })?;

        Ok(Self { inner: repo })
    }

    /// Get the working directory path of the repository.
    ///
    /// Returns the working tree directory if available, otherwise falls back
    /// to the `.git` directory itself.
    pub fn path(&self) -> &Path {
        self.inner
            .workdir()
            .unwrap_or_else(|| self.inner.git_dir())
    }

    /// URL of the default fetch remote, if one is configured.
    pub fn remote_url(&self) -> Option<String> {
        let remote = self
            .inner
            .find_default_remote(gix::remote::Direction::Fetch)?
            .ok()?;
        let url = remote.url(gix::remote::Direction::Fetch)?;
        Some(url.to_bstring().to_string())
    }

    /// Short name of the branch HEAD points at; `None` when detached.
    pub fn head_branch(&self) -> Option<String> {
        let name = self.inner.head_name().ok()??;
        Some(name.shorten().to_string())
    }

    /// Collect remote, branch, and the path from the repository root to
    /// `work_dir`.
    pub fn metadata(&self, work_dir: &Path) -> DetectedRepo {
        let root = import_path::clean(self.path());
        let path_from_root = import_path::clean(work_dir)
            .strip_prefix(&root)
            .map(import_path::to_slash)
            .unwrap_or_default();

        DetectedRepo {
            remote: self.remote_url(),
            default_branch: self.head_branch(),
            path_from_root,
        }
    }
}
