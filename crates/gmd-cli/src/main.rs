mod config;
mod outline;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gmd_engine::{BuildPackage, Package, PackageOptions, RepoOverrides};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::report::PackageReport;

#[derive(Parser)]
#[command(name = "gmd", about = "Extract documentation from a Go package", version)]
struct Cli {
    /// Package directory (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Include unexported symbols
    #[arg(short = 'u', long)]
    include_unexported: bool,

    /// Only document symbols declared in this file
    #[arg(short, long)]
    file: Option<String>,

    /// Import path to show instead of the detected one
    #[arg(long = "import")]
    import: Option<String>,

    /// Repository URL used for source links
    #[arg(long = "repository.url")]
    repository_url: Option<String>,

    /// Default branch used for source links
    #[arg(long = "repository.default-branch")]
    repository_default_branch: Option<String>,

    /// Path from the repository root to the working directory
    #[arg(long = "repository.path")]
    repository_path: Option<String>,

    /// Config file (defaults to the nearest .gmd.toml)
    #[arg(long, env = "GMD_CONFIG")]
    config: Option<PathBuf>,

    /// Print a plain outline instead of JSON
    #[arg(long)]
    outline: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn repository_overrides(&self, file: RepoOverrides) -> RepoOverrides {
        RepoOverrides {
            remote: self.repository_url.clone().or(file.remote),
            default_branch: self.repository_default_branch.clone().or(file.default_branch),
            path_from_root: self.repository_path.clone().or(file.path_from_root),
        }
    }
}

/// A bare file name names a file in the package directory; anything with a
/// directory part is used as given.
fn file_filter(dir: &Path, file: &str) -> String {
    let has_dir = Path::new(file)
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if has_dir {
        file.to_string()
    } else {
        dir.join(file).to_string_lossy().into_owned()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gmd_cli=info,gmd_engine=info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let work_dir = std::env::current_dir().context("failed to determine working directory")?;
    let dir = cli.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let file_config = Config::load(cli.config.as_deref(), &dir, &work_dir)?;

    let mut options = PackageOptions::new()
        .with_repository_overrides(cli.repository_overrides(file_config.repository));
    if cli.include_unexported || file_config.include_unexported {
        options = options.with_unexported_included();
    }
    if let Some(import) = cli.import.clone().or(file_config.import) {
        options = options.with_override_import(import);
    }
    if let Some(file) = &cli.file {
        options = options.with_file_filter(file_filter(&dir, file));
    }

    let build = BuildPackage::import_dir(&dir)
        .with_context(|| format!("failed to read package directory {}", dir.display()))?;
    let pkg = Package::from_build(&build, &options)
        .with_context(|| format!("failed to document package in {}", dir.display()))?;
    tracing::debug!(package = %pkg.name(), import_path = %pkg.import_path(), "documented package");

    if cli.outline {
        print!("{}", outline::render(&pkg));
    } else {
        let report = PackageReport::from(&pkg);
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    }

    Ok(())
}
