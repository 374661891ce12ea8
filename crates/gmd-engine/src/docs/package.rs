use std::path::{Path, PathBuf};
use std::sync::Arc;

use gmd_core::{Error, ExampleDecl, FileAnalysis, Result};

use super::comment::{summary, Doc};
use super::example::Example;
use super::func::Func;
use super::ty::Type;
use super::value::Value;
use crate::config::{Config, PackageOptions};
use crate::discover::BuildPackage;
use crate::filter;
use crate::git::Repo;
use crate::import_path::{self, ImportSources};
use crate::parser::{GoParser, SourceParser};
use crate::reader::DocPackage;

/// Documentation for one Go package.
///
/// Construction parses every build file once. After that a `Package` is
/// read-only: each query re-applies the configured file filter to the
/// package's declarations and returns fresh entities borrowing from it.
#[derive(Debug, Clone)]
pub struct Package {
    cfg: Config,
    doc: Arc<DocPackage>,
    examples: Arc<[ExampleDecl]>,
    import_path: String,
}

impl Package {
    /// Wrap an already assembled package.
    pub fn new(
        cfg: Config,
        doc: DocPackage,
        examples: Vec<ExampleDecl>,
        import_path: impl Into<String>,
    ) -> Self {
        Self {
            cfg,
            doc: Arc::new(doc),
            examples: examples.into(),
            import_path: import_path.into(),
        }
    }

    /// Build documentation for `build` relative to the process's current
    /// working directory.
    pub fn from_build(build: &BuildPackage, options: &PackageOptions) -> Result<Self> {
        let work_dir = std::env::current_dir().map_err(Error::WorkDir)?;
        Self::from_build_in(build, options, &work_dir)
    }

    /// Like [`Package::from_build`] with an explicit working directory.
    pub fn from_build_in(
        build: &BuildPackage,
        options: &PackageOptions,
        work_dir: &Path,
    ) -> Result<Self> {
        options.validate()?;

        let repo = Repo::resolve(work_dir, options.repository_overrides());

        let cfg = Config::new(work_dir, build.dir())
            .with_file_filter(options.file_filter().map(str::to_string))
            .with_override_import(options.override_import().map(str::to_string))
            .with_repo(repo);

        let parser = GoParser::new();
        let files = parse_all(&parser, build.go_file_paths(), work_dir)?;
        let mut doc = DocPackage::from_files(build.dir(), files)?;
        if !options.include_unexported() {
            doc = doc.exports_only();
        }

        let import_path = import_path::resolve(
            build.dir(),
            work_dir,
            ImportSources {
                override_import: options.override_import(),
                import_comment: doc.import_comment.as_deref(),
                raw: &build.import_path,
            },
        )?;

        let mut examples: Vec<ExampleDecl> = parse_all(&parser, build.test_file_paths(), work_dir)?
            .into_iter()
            .flat_map(|f| f.examples)
            .collect();
        examples.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            package = %doc.name,
            import_path = %import_path,
            files = doc.filenames.len(),
            examples = examples.len(),
            "package documentation assembled"
        );

        Ok(Self::new(cfg, doc, examples, import_path))
    }

    pub fn name(&self) -> &str {
        &self.doc.name
    }

    /// Last element of the package directory.
    pub fn dirname(&self) -> String {
        self.cfg
            .pkg_dir()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.cfg.pkg_dir().to_string_lossy().into_owned())
    }

    pub fn dir(&self) -> &Path {
        self.cfg.pkg_dir()
    }

    pub fn level(&self) -> usize {
        self.cfg.level()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Files the package was built from, in name order.
    pub fn filenames(&self) -> &[PathBuf] {
        &self.doc.filenames
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// The package's import statement, e.g. `import "example.com/m/sub"`.
    pub fn import(&self) -> String {
        format!("import \"{}\"", self.import_path)
    }

    pub fn summary(&self) -> String {
        summary(&self.doc.doc)
    }

    /// Package documentation. Empty when a file filter other than
    /// `doc.go` is set.
    pub fn doc(&self) -> Doc {
        let doc = Doc::new(&self.cfg.inc(2), &self.doc.doc);
        if filter::is_doc_file(self.cfg.file_filter()) {
            doc
        } else {
            doc.emptied()
        }
    }

    pub fn consts(&self) -> Vec<Value<'_>> {
        filter::in_file(
            self.doc.consts.iter().map(|v| Value::new(self.cfg.inc(1), v)),
            self.cfg.file_filter(),
        )
    }

    pub fn vars(&self) -> Vec<Value<'_>> {
        filter::in_file(
            self.doc.vars.iter().map(|v| Value::new(self.cfg.inc(1), v)),
            self.cfg.file_filter(),
        )
    }

    /// Functions not associated with any type.
    pub fn funcs(&self) -> Vec<Func<'_>> {
        filter::in_file(
            self.doc
                .funcs
                .iter()
                .map(|f| Func::new(self.cfg.inc(1), f, &self.examples)),
            self.cfg.file_filter(),
        )
    }

    pub fn types(&self) -> Vec<Type<'_>> {
        filter::in_file(
            self.doc
                .types
                .iter()
                .map(|t| Type::new(self.cfg.inc(1), t, &self.examples)),
            self.cfg.file_filter(),
        )
    }

    /// Package-level examples: the unnamed example and those named with a
    /// leading underscore, shown without it. Other names belong to symbols
    /// and never appear here.
    pub fn examples(&self) -> Vec<Example<'_>> {
        if !filter::is_doc_file(self.cfg.file_filter()) {
            return Vec::new();
        }

        self.examples
            .iter()
            .filter_map(|ex| {
                let name = if ex.name.is_empty() {
                    ""
                } else {
                    ex.name.strip_prefix('_')?
                };
                Some(Example::new(self.cfg.inc(1), name, ex))
            })
            .collect()
    }
}

fn parse_all(
    parser: &GoParser,
    paths: impl Iterator<Item = PathBuf>,
    work_dir: &Path,
) -> Result<Vec<FileAnalysis>> {
    let mut files = Vec::new();
    for path in paths {
        if !parser.supports_file(&path) {
            continue;
        }
        let source = std::fs::read(import_path::absolute(&path, work_dir)).map_err(|source| {
            Error::Read {
                path: path.clone(),
                source,
            }
        })?;
        files.push(parser.parse_file(&source, &path)?);
    }
    Ok(files)
}
