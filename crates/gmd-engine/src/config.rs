use std::path::{Path, PathBuf};

use gmd_core::{Error, Result};

use crate::git::{Repo, RepoOverrides};
use crate::import_path;

/// Settings shared by a package and every entity created from it.
///
/// Built once when the package is constructed. Children receive a copy
/// from [`Config::inc`] with a deeper heading level; nothing mutates a
/// `Config` after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    level: usize,
    work_dir: PathBuf,
    pkg_dir: PathBuf,
    file_filter: Option<String>,
    override_import: Option<String>,
    repo: Option<Repo>,
}

impl Config {
    /// A root configuration at heading level 1.
    pub fn new(work_dir: impl Into<PathBuf>, pkg_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: 1,
            work_dir: work_dir.into(),
            pkg_dir: pkg_dir.into(),
            file_filter: None,
            override_import: None,
            repo: None,
        }
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Set the file filter. The path is lexically cleaned so it compares
    /// equal to the cleaned build file paths.
    pub fn with_file_filter(mut self, file: Option<String>) -> Self {
        self.file_filter =
            file.map(|f| import_path::clean(Path::new(&f)).to_string_lossy().into_owned());
        self
    }

    pub fn with_override_import(mut self, import_path: Option<String>) -> Self {
        self.override_import = import_path;
        self
    }

    pub fn with_repo(mut self, repo: Option<Repo>) -> Self {
        self.repo = repo;
        self
    }

    /// A copy of this configuration `step` heading levels deeper.
    pub fn inc(&self, step: usize) -> Self {
        Self {
            level: self.level + step,
            ..self.clone()
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn pkg_dir(&self) -> &Path {
        &self.pkg_dir
    }

    pub fn file_filter(&self) -> Option<&str> {
        self.file_filter.as_deref()
    }

    pub fn override_import(&self) -> Option<&str> {
        self.override_import.as_deref()
    }

    pub fn repo(&self) -> Option<&Repo> {
        self.repo.as_ref()
    }
}

/// Options for [`crate::docs::Package::from_build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageOptions {
    include_unexported: bool,
    file_filter: Option<String>,
    override_import: Option<String>,
    repository_overrides: RepoOverrides,
}

impl PackageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep unexported symbols in the documentation.
    pub fn with_unexported_included(mut self) -> Self {
        self.include_unexported = true;
        self
    }

    /// Only document symbols declared in `file` (a path as the package's
    /// files are named, i.e. the package directory joined with the file
    /// name).
    pub fn with_file_filter(mut self, file: impl Into<String>) -> Self {
        self.file_filter = Some(file.into());
        self
    }

    /// Show `import_path` instead of the resolved import path.
    pub fn with_override_import(mut self, import_path: impl Into<String>) -> Self {
        self.override_import = Some(import_path.into());
        self
    }

    pub fn with_repository_overrides(mut self, overrides: RepoOverrides) -> Self {
        self.repository_overrides = overrides;
        self
    }

    pub fn include_unexported(&self) -> bool {
        self.include_unexported
    }

    pub fn file_filter(&self) -> Option<&str> {
        self.file_filter.as_deref()
    }

    pub fn override_import(&self) -> Option<&str> {
        self.override_import.as_deref()
    }

    pub fn repository_overrides(&self) -> &RepoOverrides {
        &self.repository_overrides
    }

    /// Reject option values that can never produce valid documentation.
    pub fn validate(&self) -> Result<()> {
        if self.override_import.as_deref().is_some_and(str::is_empty) {
            return Err(Error::InvalidInput("import path override is empty".into()));
        }
        if self.file_filter.as_deref().is_some_and(str::is_empty) {
            return Err(Error::InvalidInput("file filter is empty".into()));
        }
        Ok(())
    }
}
