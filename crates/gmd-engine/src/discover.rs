use gmd_core::Result;
use std::path::{Path, PathBuf};

use crate::import_path;

/// The build-relevant contents of one source directory: which files make up
/// the package and which hold its tests and examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPackage {
    pub dir: PathBuf,
    /// Import path as computed by the build system; `"."` for a plain
    /// local directory.
    pub import_path: String,
    pub go_files: Vec<String>,
    pub test_go_files: Vec<String>,
}

impl BuildPackage {
    /// Scan `dir` for Go sources. Files starting with `_` or `.` and files
    /// constrained with `ignore` are left out, as the Go toolchain does.
    pub fn import_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let mut go_files = Vec::new();
        let mut test_go_files = Vec::new();

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_go_source(&name) {
                continue;
            }
            let header = std::fs::read_to_string(entry.path())?;
            if is_ignored(&header) {
                tracing::debug!(file = %name, "skipping file constrained with ignore");
                continue;
            }

            if name.ends_with("_test.go") {
                test_go_files.push(name);
            } else {
                go_files.push(name);
            }
        }

        go_files.sort();
        test_go_files.sort();

        tracing::debug!(
            dir = %dir.display(),
            files = go_files.len(),
            tests = test_go_files.len(),
            "collected build files"
        );

        Ok(Self {
            dir,
            import_path: ".".to_string(),
            go_files,
            test_go_files,
        })
    }

    /// Replace the build-computed import path.
    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = import_path.into();
        self
    }

    /// File-membership predicate: `true` for the package's build files.
    pub fn is_build_file(&self, name: &str) -> bool {
        self.go_files.iter().any(|f| f == name)
    }

    /// Build file paths: the directory joined with each name, lexically
    /// cleaned (`./pkg` + `a.go` gives `pkg/a.go`).
    pub fn go_file_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.go_files.iter().map(|f| self.file_path(f))
    }

    pub fn test_file_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.test_go_files.iter().map(|f| self.file_path(f))
    }

    fn file_path(&self, name: &str) -> PathBuf {
        import_path::clean(&self.dir.join(name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_go_source(name: &str) -> bool {
    name.ends_with(".go") && !name.starts_with('_') && !name.starts_with('.')
}

/// Whether the constraint lines before the package clause exclude the file
/// from every build (`//go:build ignore` or `// +build ignore`).
fn is_ignored(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            break;
        }
        let expr = line
            .strip_prefix("//go:build ")
            .or_else(|| line.strip_prefix("// +build "));
        if let Some(expr) = expr {
            if expr.split_whitespace().any(|t| t == "ignore") {
                return true;
            }
        }
    }
    false
}
