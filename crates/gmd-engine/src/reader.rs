use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use gmd_core::{
    is_exported, Error, FileAnalysis, FuncDecl, Result, TypeDecl, ValueDecl, ValueKind,
};

/// Share of a value group's specs that must name the same type before the
/// group is listed under that type.
const TYPED_VALUE_THRESHOLD: f64 = 0.75;

/// A type together with the declarations associated with it.
#[derive(Debug, Clone)]
pub struct TypeDoc {
    pub decl: TypeDecl,
    pub consts: Vec<ValueDecl>,
    pub vars: Vec<ValueDecl>,
    /// Functions returning exactly one value of this type.
    pub funcs: Vec<FuncDecl>,
    pub methods: Vec<FuncDecl>,
}

/// Flat declaration lists in source order, before association.
#[derive(Debug, Clone, Default)]
struct Decls {
    values: Vec<ValueDecl>,
    funcs: Vec<FuncDecl>,
    types: Vec<TypeDecl>,
}

/// Documentation view over the parsed files of one package.
///
/// Files are read in name order and declarations keep their source order.
/// The view is immutable; visibility suppression produces a new view with
/// [`DocPackage::exports_only`].
#[derive(Debug, Clone)]
pub struct DocPackage {
    pub name: String,
    pub dir: PathBuf,
    pub import_comment: Option<String>,
    pub doc: String,
    pub filenames: Vec<PathBuf>,
    pub consts: Vec<ValueDecl>,
    pub vars: Vec<ValueDecl>,
    pub funcs: Vec<FuncDecl>,
    pub types: Vec<TypeDoc>,
    decls: Decls,
}

impl DocPackage {
    /// Assemble the package from its parsed build files. Fails unless the
    /// files declare exactly one package name.
    pub fn from_files(dir: &Path, mut files: Vec<FileAnalysis>) -> Result<Self> {
        files.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        let names: BTreeSet<&str> = files.iter().map(|f| f.package_name.as_str()).collect();
        let name = match names.len() {
            0 => return Err(Error::NoPackage(dir.to_path_buf())),
            1 => names.into_iter().next().unwrap_or_default().to_string(),
            _ => {
                return Err(Error::MultiplePackages {
                    dir: dir.to_path_buf(),
                    names: names.into_iter().map(str::to_string).collect(),
                })
            }
        };

        let mut doc = Vec::new();
        let mut import_comment = None;
        let mut filenames = Vec::with_capacity(files.len());
        let mut decls = Decls::default();

        for file in files {
            if let Some(text) = file.package_doc {
                doc.push(text);
            }
            if import_comment.is_none() {
                import_comment = file.import_comment;
            }
            filenames.push(file.file_path);
            decls.values.extend(file.values);
            decls.funcs.extend(file.funcs);
            decls.types.extend(file.types);
        }

        Ok(Self::assemble(
            name,
            dir.to_path_buf(),
            import_comment,
            doc.join("\n\n"),
            filenames,
            decls,
        ))
    }

    /// A new view holding only exported declarations. Unexported struct
    /// fields and interface methods are removed from type declarations, and
    /// associations are recomputed against the remaining types.
    pub fn exports_only(&self) -> Self {
        let values = self
            .decls
            .values
            .iter()
            .filter_map(exported_value)
            .collect();

        let funcs = self
            .decls
            .funcs
            .iter()
            .filter(|f| {
                is_exported(&f.name)
                    && f.receiver
                        .as_ref()
                        .map_or(true, |r| is_exported(&r.type_name))
            })
            .cloned()
            .collect();

        let types = self
            .decls
            .types
            .iter()
            .filter(|t| is_exported(&t.name))
            .map(|t| {
                let mut t = t.clone();
                if let Some(text) = t.exported_text.take() {
                    t.text = text;
                }
                t
            })
            .collect();

        Self::assemble(
            self.name.clone(),
            self.dir.clone(),
            self.import_comment.clone(),
            self.doc.clone(),
            self.filenames.clone(),
            Decls {
                values,
                funcs,
                types,
            },
        )
    }

    fn assemble(
        name: String,
        dir: PathBuf,
        import_comment: Option<String>,
        doc: String,
        filenames: Vec<PathBuf>,
        decls: Decls,
    ) -> Self {
        let mut types: Vec<TypeDoc> = decls
            .types
            .iter()
            .map(|decl| TypeDoc {
                decl: decl.clone(),
                consts: Vec::new(),
                vars: Vec::new(),
                funcs: Vec::new(),
                methods: Vec::new(),
            })
            .collect();
        let index: HashMap<String, usize> = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.decl.name.clone(), i))
            .collect();

        let mut consts = Vec::new();
        let mut vars = Vec::new();
        for value in &decls.values {
            let owner = dominant_type(value).and_then(|t| index.get(t).copied());
            match (owner, value.kind) {
                (Some(i), ValueKind::Const) => types[i].consts.push(value.clone()),
                (Some(i), ValueKind::Var) => types[i].vars.push(value.clone()),
                (None, ValueKind::Const) => consts.push(value.clone()),
                (None, ValueKind::Var) => vars.push(value.clone()),
            }
        }

        let mut funcs = Vec::new();
        for func in &decls.funcs {
            if let Some(recv) = &func.receiver {
                match index.get(&recv.type_name) {
                    Some(&i) => types[i].methods.push(func.clone()),
                    None => tracing::debug!(
                        method = %func.name,
                        receiver = %recv.type_name,
                        "dropping method of undeclared type"
                    ),
                }
                continue;
            }

            let owners: Vec<usize> = func
                .result_types
                .iter()
                .filter_map(|t| index.get(t).copied())
                .collect();
            match owners.as_slice() {
                [i] => types[*i].funcs.push(func.clone()),
                _ => funcs.push(func.clone()),
            }
        }

        Self {
            name,
            dir,
            import_comment,
            doc,
            filenames,
            consts,
            vars,
            funcs,
            types,
            decls,
        }
    }
}

/// The type most specs of a value group are declared with, if one type
/// dominates. Untyped consts without values repeat the previous spec's type
/// (the `iota` pattern).
fn dominant_type(value: &ValueDecl) -> Option<&str> {
    let mut dom: Option<&str> = None;
    let mut freq = 0usize;
    let mut prev: Option<&str> = None;

    for spec in &value.specs {
        let name = match (&spec.type_name, value.kind) {
            (Some(t), _) => Some(t.as_str()),
            (None, ValueKind::Const) if !spec.has_values => prev,
            _ => None,
        };
        if let Some(n) = name {
            if dom.is_some_and(|d| d != n) {
                return None;
            }
            dom = Some(n);
            freq += 1;
        }
        prev = name;
    }

    let needed = (value.specs.len() as f64 * TYPED_VALUE_THRESHOLD) as usize;
    dom.filter(|_| freq >= needed)
}

/// The exported part of a value group, or `None` when nothing is exported.
fn exported_value(value: &ValueDecl) -> Option<ValueDecl> {
    let mut value = value.clone();
    let before: usize = value.specs.iter().map(|s| s.names.len()).sum();

    for spec in &mut value.specs {
        spec.names.retain(|n| is_exported(n));
    }
    value.specs.retain(|s| !s.names.is_empty());
    if value.specs.is_empty() {
        return None;
    }

    let after: usize = value.specs.iter().map(|s| s.names.len()).sum();
    if after != before {
        value.text = if value.grouped {
            let body: Vec<String> = value.specs.iter().map(|s| format!("\t{}", s.text)).collect();
            format!("{} (\n{}\n)", value.kind, body.join("\n"))
        } else {
            format!("{} {}", value.kind, value.specs[0].text)
        };
    }
    Some(value)
}
