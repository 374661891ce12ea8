pub mod go_parser;

pub use go_parser::GoParser;

use gmd_core::{FileAnalysis, Result};
use std::path::Path;

/// Trait implemented by a source-language parser.
///
/// The rest of the engine only sees the declarations, comments and examples
/// a parser reports; grammar details stay behind this seam.
pub trait SourceParser: Send + Sync {
    /// File extensions this parser handles (without leading dot).
    fn extensions(&self) -> &[&str];

    /// Parse one file and return every top-level declaration it holds.
    fn parse_file(&self, source: &[u8], file_path: &Path) -> Result<FileAnalysis>;

    /// Return `true` if the file extension is handled by this parser.
    fn supports_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions().contains(&ext))
            .unwrap_or(false)
    }
}
