use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse package: {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no source-code package in directory {}", .0.display())]
    NoPackage(PathBuf),

    #[error("multiple packages in directory {}: {}", .dir.display(), .names.join(", "))]
    MultiplePackages { dir: PathBuf, names: Vec<String> },

    #[error("failed to determine working directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
