use gmd_core::{ExampleDecl, FuncDecl};

use super::comment::{summary, Doc};
use super::example::{symbol_examples, Example};
use super::location::Location;
use crate::config::Config;
use crate::filter::Located;

/// A documented function or method.
#[derive(Debug, Clone)]
pub struct Func<'a> {
    cfg: Config,
    decl: &'a FuncDecl,
    examples: &'a [ExampleDecl],
}

impl<'a> Func<'a> {
    pub fn new(cfg: Config, decl: &'a FuncDecl, examples: &'a [ExampleDecl]) -> Self {
        Self {
            cfg,
            decl,
            examples,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.decl.name
    }

    pub fn level(&self) -> usize {
        self.cfg.level()
    }

    /// `func Name` or `func (T) Name` for a method.
    pub fn title(&self) -> String {
        match self.receiver() {
            Some(recv) => format!("func ({recv}) {}", self.decl.name),
            None => format!("func {}", self.decl.name),
        }
    }

    /// Receiver type as written, e.g. `*Widget`.
    pub fn receiver(&self) -> Option<&'a str> {
        self.decl.receiver.as_ref().map(|r| r.text.as_str())
    }

    pub fn summary(&self) -> String {
        summary(self.decl.doc.as_deref().unwrap_or_default())
    }

    pub fn doc(&self) -> Doc {
        Doc::new(&self.cfg.inc(1), self.decl.doc.as_deref().unwrap_or_default())
    }

    /// Declaration text without the body.
    pub fn signature(&self) -> &'a str {
        &self.decl.signature
    }

    /// Name examples use to target this function: `Name`, or
    /// `Type_Method` for a method.
    pub fn example_key(&self) -> String {
        match &self.decl.receiver {
            Some(recv) => format!("{}_{}", recv.type_name, self.decl.name),
            None => self.decl.name.clone(),
        }
    }

    pub fn examples(&self) -> Vec<Example<'a>> {
        symbol_examples(&self.cfg, &self.example_key(), self.examples)
    }
}

impl Located for Func<'_> {
    fn location(&self) -> Location {
        Location::new(&self.cfg, &self.decl.file_path, self.decl.span)
    }
}
