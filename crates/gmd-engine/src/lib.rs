//! Documentation engine for Go packages.
//!
//! [`BuildPackage::import_dir`] selects a directory's build and test files,
//! [`Package::from_build`] parses them into an immutable documentation
//! model, and the [`Package`] queries expose its constants, variables,
//! functions, types and examples, optionally restricted to one file.

pub mod config;
pub mod discover;
pub mod docs;
pub mod filter;
pub mod git;
pub mod import_path;
pub mod parser;
pub mod reader;

pub use config::{Config, PackageOptions};
pub use discover::BuildPackage;
pub use docs::{Block, Doc, Example, Func, Location, Package, Type, Value};
pub use git::{Repo, RepoOverrides};
pub use reader::{DocPackage, TypeDoc};
