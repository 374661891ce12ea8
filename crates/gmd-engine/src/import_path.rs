//! Canonical import path resolution.
//!
//! The import path shown to readers comes from the first source that
//! provides one: an explicit override, the package's import comment, the
//! nearest `go.mod` (only for local `"."` paths), and finally the path the
//! build system computed.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use gmd_core::{Error, Result};
use regex::Regex;

/// Name of the module manifest searched for above a package directory.
pub const MODULE_MANIFEST: &str = "go.mod";

/// Import path the build system reports for a directory outside any
/// module or workspace.
pub const LOCAL_IMPORT_PATH: &str = ".";

/// A `module` directive on any line of the manifest, not only the first
/// token of the file.
static MODULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*module\s+(\S+)").expect("invalid regex"));

/// Everything the resolver chooses from for one package.
#[derive(Debug, Clone, Copy)]
pub struct ImportSources<'a> {
    pub override_import: Option<&'a str>,
    pub import_comment: Option<&'a str>,
    pub raw: &'a str,
}

/// Resolve the import path of the package in `dir`. Relative directories
/// are taken relative to `work_dir`.
pub fn resolve(dir: &Path, work_dir: &Path, sources: ImportSources<'_>) -> Result<String> {
    let resolved = if let Some(path) = sources.override_import {
        tracing::debug!(import_path = %path, "using import path override");
        path.to_string()
    } else if let Some(path) = sources.import_comment {
        tracing::debug!(import_path = %path, "using import comment");
        path.to_string()
    } else if sources.raw == LOCAL_IMPORT_PATH {
        match find_import_path(&absolute(dir, work_dir)) {
            Some(path) => path,
            None => {
                tracing::debug!(dir = %dir.display(), "no module found, keeping local import path");
                sources.raw.to_string()
            }
        }
    } else {
        sources.raw.to_string()
    };

    if resolved.is_empty() {
        return Err(Error::InvalidInput(format!(
            "empty import path for {}",
            dir.display()
        )));
    }
    Ok(resolved)
}

/// Build an import path for `dir` from the nearest enclosing `go.mod`:
/// the declared module name joined with the directory's path below the
/// manifest. `None` when there is no readable manifest with a module line.
pub fn find_import_path(dir: &Path) -> Option<String> {
    let manifest = find_file_in_parent(dir, MODULE_MANIFEST, EntryKind::File)?;
    let contents = std::fs::read_to_string(&manifest)
        .inspect_err(|e| tracing::debug!(path = %manifest.display(), "unreadable manifest: {e}"))
        .ok()?;
    let module = module_name(&contents)?;

    let relative = dir.strip_prefix(manifest.parent()?).ok()?;
    let relative = to_slash(relative);

    let path = if relative.is_empty() {
        module
    } else {
        format!("{}/{relative}", module.trim_end_matches('/'))
    };
    tracing::debug!(import_path = %path, manifest = %manifest.display(), "resolved import path from module");
    Some(path)
}

/// Whether [`find_file_in_parent`] looks for a regular file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Look for `name` in `dir` and each of its ancestors, nearest first. The
/// walk ends when stepping to the parent no longer changes the path.
pub fn find_file_in_parent(dir: &Path, name: &str, kind: EntryKind) -> Option<PathBuf> {
    let mut current = dir.to_path_buf();
    loop {
        let candidate = current.join(name);
        if let Ok(meta) = std::fs::metadata(&candidate) {
            let matches = match kind {
                EntryKind::File => meta.is_file(),
                EntryKind::Dir => meta.is_dir(),
            };
            if matches {
                return Some(candidate);
            }
        }

        let next = current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.clone());
        if next == current {
            return None;
        }
        current = next;
    }
}

/// Module name from the first `module <name>` line of a manifest.
pub fn module_name(contents: &str) -> Option<String> {
    let caps = MODULE_LINE.captures(contents)?;
    let name = caps[1].trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

/// `dir` made absolute against `work_dir` and lexically cleaned.
pub fn absolute(dir: &Path, work_dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        clean(dir)
    } else {
        clean(&work_dir.join(dir))
    }
}

/// Lexical path cleaning: drops `.` components and folds `..` into the
/// preceding component.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Forward-slash form of a relative path; empty for the current directory.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
