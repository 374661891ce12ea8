use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gmd_engine::import_path::{self, EntryKind};
use gmd_engine::RepoOverrides;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = ".gmd.toml";

/// Settings read from `.gmd.toml`. Command-line flags take precedence.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub include_unexported: bool,
    pub import: Option<String>,
    pub repository: RepoOverrides,
}

impl Config {
    /// The config file for a package in `dir`: the nearest `.gmd.toml` in
    /// `dir` or one of its parents.
    pub fn find(dir: &Path, work_dir: &Path) -> Option<PathBuf> {
        import_path::find_file_in_parent(
            &import_path::absolute(dir, work_dir),
            CONFIG_FILE,
            EntryKind::File,
        )
    }

    /// Load `explicit` if given, otherwise the discovered file, otherwise
    /// defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path, work_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::find(dir, work_dir) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        tracing::debug!(path = %path.display(), "loading config");

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
