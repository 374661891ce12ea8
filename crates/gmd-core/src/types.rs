use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Report whether a Go identifier is exported, i.e. starts with an
/// upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

// ── Position ──

/// 1-based line and byte column within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

// ── Values ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Const,
    Var,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Const => "const",
            Self::Var => "var",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "const" => Ok(Self::Const),
            "var" => Ok(Self::Var),
            other => Err(format!("unknown ValueKind: {other}")),
        }
    }
}

/// One `name1, name2 T = v1, v2` line of a const or var declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<String>,
    /// Base name of the declared type, when it is a package-local identifier.
    pub type_name: Option<String>,
    pub has_values: bool,
    pub text: String,
}

/// A top-level `const` or `var` declaration, grouped or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueDecl {
    pub kind: ValueKind,
    pub doc: Option<String>,
    pub specs: Vec<ValueSpec>,
    pub grouped: bool,
    pub text: String,
    pub file_path: PathBuf,
    pub span: Span,
}

impl ValueDecl {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs
            .iter()
            .flat_map(|s| s.names.iter().map(String::as_str))
    }
}

// ── Functions ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: Option<String>,
    /// Base type name with pointer and type arguments removed.
    pub type_name: String,
    pub pointer: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub doc: Option<String>,
    pub receiver: Option<Receiver>,
    pub type_params: Vec<String>,
    /// Base names of package-local result types, one entry per result field.
    pub result_types: Vec<String>,
    /// Declaration text without the body.
    pub signature: String,
    pub file_path: PathBuf,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

// ── Types ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub doc: Option<String>,
    pub text: String,
    /// Declaration text with unexported fields and methods removed, when
    /// that differs from `text`.
    pub exported_text: Option<String>,
    pub file_path: PathBuf,
    pub span: Span,
}

// ── Examples ──

/// A runnable `func ExampleXxx()` found in a test file. `name` is the part
/// after the `Example` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleDecl {
    pub name: String,
    pub doc: Option<String>,
    pub code: String,
    pub output: Option<String>,
    pub unordered: bool,
    pub file_path: PathBuf,
    pub span: Span,
}

// ── File Analysis (parser output) ──

#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    pub file_path: PathBuf,
    pub package_name: String,
    pub package_doc: Option<String>,
    pub import_comment: Option<String>,
    pub values: Vec<ValueDecl>,
    pub funcs: Vec<FuncDecl>,
    pub types: Vec<TypeDecl>,
    pub examples: Vec<ExampleDecl>,
}
