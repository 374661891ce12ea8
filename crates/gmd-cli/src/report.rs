//! Serializable snapshot of a package's documentation.

use gmd_core::{Position, ValueKind};
use gmd_engine::filter::Located;
use gmd_engine::{Doc, Example, Func, Location, Package, Type, Value};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PackageReport {
    pub name: String,
    pub dirname: String,
    pub import_path: String,
    pub import: String,
    pub level: usize,
    pub summary: String,
    pub doc: Doc,
    pub consts: Vec<ValueReport>,
    pub vars: Vec<ValueReport>,
    pub funcs: Vec<FuncReport>,
    pub types: Vec<TypeReport>,
    pub examples: Vec<ExampleReport>,
}

#[derive(Debug, Serialize)]
pub struct LocationReport {
    pub filepath: String,
    pub start: Position,
    pub end: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValueReport {
    pub kind: ValueKind,
    pub names: Vec<String>,
    pub level: usize,
    pub summary: String,
    pub doc: Doc,
    pub decl: String,
    pub location: LocationReport,
}

#[derive(Debug, Serialize)]
pub struct FuncReport {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub level: usize,
    pub summary: String,
    pub doc: Doc,
    pub signature: String,
    pub location: LocationReport,
    pub examples: Vec<ExampleReport>,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub title: String,
    pub level: usize,
    pub summary: String,
    pub doc: Doc,
    pub decl: String,
    pub location: LocationReport,
    pub consts: Vec<ValueReport>,
    pub vars: Vec<ValueReport>,
    pub funcs: Vec<FuncReport>,
    pub methods: Vec<FuncReport>,
    pub examples: Vec<ExampleReport>,
}

#[derive(Debug, Serialize)]
pub struct ExampleReport {
    pub name: String,
    pub title: String,
    pub level: usize,
    pub summary: String,
    pub doc: Doc,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub unordered: bool,
    pub location: LocationReport,
}

impl From<&Package> for PackageReport {
    fn from(pkg: &Package) -> Self {
        Self {
            name: pkg.name().to_string(),
            dirname: pkg.dirname(),
            import_path: pkg.import_path().to_string(),
            import: pkg.import(),
            level: pkg.level(),
            summary: pkg.summary(),
            doc: pkg.doc(),
            consts: pkg.consts().iter().map(ValueReport::from).collect(),
            vars: pkg.vars().iter().map(ValueReport::from).collect(),
            funcs: pkg.funcs().iter().map(FuncReport::from).collect(),
            types: pkg.types().iter().map(TypeReport::from).collect(),
            examples: pkg.examples().iter().map(ExampleReport::from).collect(),
        }
    }
}

impl From<Location> for LocationReport {
    fn from(loc: Location) -> Self {
        Self {
            url: loc.url(),
            filepath: loc.filepath,
            start: loc.start,
            end: loc.end,
        }
    }
}

impl From<&Value<'_>> for ValueReport {
    fn from(value: &Value<'_>) -> Self {
        Self {
            kind: value.kind(),
            names: value.names().into_iter().map(str::to_string).collect(),
            level: value.level(),
            summary: value.summary(),
            doc: value.doc(),
            decl: value.decl().to_string(),
            location: value.location().into(),
        }
    }
}

impl From<&Func<'_>> for FuncReport {
    fn from(func: &Func<'_>) -> Self {
        Self {
            name: func.name().to_string(),
            title: func.title(),
            receiver: func.receiver().map(str::to_string),
            level: func.level(),
            summary: func.summary(),
            doc: func.doc(),
            signature: func.signature().to_string(),
            location: func.location().into(),
            examples: func.examples().iter().map(ExampleReport::from).collect(),
        }
    }
}

impl From<&Type<'_>> for TypeReport {
    fn from(ty: &Type<'_>) -> Self {
        Self {
            name: ty.name().to_string(),
            title: ty.title(),
            level: ty.level(),
            summary: ty.summary(),
            doc: ty.doc(),
            decl: ty.decl().to_string(),
            location: ty.location().into(),
            consts: ty.consts().iter().map(ValueReport::from).collect(),
            vars: ty.vars().iter().map(ValueReport::from).collect(),
            funcs: ty.funcs().iter().map(FuncReport::from).collect(),
            methods: ty.methods().iter().map(FuncReport::from).collect(),
            examples: ty.examples().iter().map(ExampleReport::from).collect(),
        }
    }
}

impl From<&Example<'_>> for ExampleReport {
    fn from(ex: &Example<'_>) -> Self {
        Self {
            name: ex.name().to_string(),
            title: ex.title(),
            level: ex.level(),
            summary: ex.summary(),
            doc: ex.doc(),
            code: ex.code().to_string(),
            output: ex.output().map(str::to_string),
            unordered: ex.is_unordered(),
            location: ex.location().into(),
        }
    }
}
