use gmd_core::ExampleDecl;

use super::comment::{summary, Doc};
use super::example::{symbol_examples, Example};
use super::func::Func;
use super::location::Location;
use super::value::Value;
use crate::config::Config;
use crate::filter::Located;
use crate::reader::TypeDoc;

/// A documented type with the constants, variables, constructors and
/// methods associated with it.
#[derive(Debug, Clone)]
pub struct Type<'a> {
    cfg: Config,
    doc: &'a TypeDoc,
    examples: &'a [ExampleDecl],
}

impl<'a> Type<'a> {
    pub fn new(cfg: Config, doc: &'a TypeDoc, examples: &'a [ExampleDecl]) -> Self {
        Self { cfg, doc, examples }
    }

    pub fn name(&self) -> &'a str {
        &self.doc.decl.name
    }

    pub fn level(&self) -> usize {
        self.cfg.level()
    }

    pub fn title(&self) -> String {
        format!("type {}", self.doc.decl.name)
    }

    pub fn summary(&self) -> String {
        summary(self.doc.decl.doc.as_deref().unwrap_or_default())
    }

    pub fn doc(&self) -> Doc {
        Doc::new(&self.cfg.inc(1), self.doc.decl.doc.as_deref().unwrap_or_default())
    }

    /// Source text of the type declaration.
    pub fn decl(&self) -> &'a str {
        &self.doc.decl.text
    }

    pub fn consts(&self) -> Vec<Value<'a>> {
        self.doc
            .consts
            .iter()
            .map(|v| Value::new(self.cfg.inc(1), v))
            .collect()
    }

    pub fn vars(&self) -> Vec<Value<'a>> {
        self.doc
            .vars
            .iter()
            .map(|v| Value::new(self.cfg.inc(1), v))
            .collect()
    }

    /// Functions returning this type.
    pub fn funcs(&self) -> Vec<Func<'a>> {
        self.doc
            .funcs
            .iter()
            .map(|f| Func::new(self.cfg.inc(1), f, self.examples))
            .collect()
    }

    pub fn methods(&self) -> Vec<Func<'a>> {
        self.doc
            .methods
            .iter()
            .map(|f| Func::new(self.cfg.inc(1), f, self.examples))
            .collect()
    }

    pub fn examples(&self) -> Vec<Example<'a>> {
        symbol_examples(&self.cfg, self.name(), self.examples)
    }
}

impl Located for Type<'_> {
    fn location(&self) -> Location {
        Location::new(&self.cfg, &self.doc.decl.file_path, self.doc.decl.span)
    }
}
