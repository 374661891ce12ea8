use std::path::{Path, PathBuf};

use gmd_core::{Position, Span};
use serde::Serialize;

use crate::config::Config;
use crate::git::Repo;
use crate::import_path;

/// Where a construct is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
    /// The file path exactly as the file was read.
    pub filepath: String,
    pub work_dir: PathBuf,
    pub repo: Option<Repo>,
}

impl Location {
    pub fn new(cfg: &Config, file_path: &Path, span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
            filepath: file_path.to_string_lossy().into_owned(),
            work_dir: cfg.work_dir().to_path_buf(),
            repo: cfg.repo().cloned(),
        }
    }

    /// Slash-separated path of the file relative to the working directory,
    /// or the path as read when it lies outside it.
    pub fn relative_path(&self) -> String {
        let path = Path::new(&self.filepath);
        let abs = import_path::absolute(path, &self.work_dir);
        match abs.strip_prefix(import_path::clean(&self.work_dir)) {
            Ok(rel) => import_path::to_slash(rel),
            Err(_) => self.filepath.clone(),
        }
    }

    /// Link to the declaration in the repository browser, when the
    /// repository is known.
    pub fn url(&self) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let mut parts = vec![
            repo.remote.trim_end_matches('/').to_string(),
            "blob".to_string(),
            repo.default_branch.clone(),
        ];
        if !repo.path_from_root.is_empty() {
            parts.push(repo.path_from_root.clone());
        }
        parts.push(self.relative_path());
        Some(format!("{}#L{}", parts.join("/"), self.start.line))
    }
}
