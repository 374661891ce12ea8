use gmd_core::{ValueDecl, ValueKind};

use super::comment::{summary, Doc};
use super::location::Location;
use crate::config::Config;
use crate::filter::Located;

/// A documented `const` or `var` declaration, possibly a group.
#[derive(Debug, Clone)]
pub struct Value<'a> {
    cfg: Config,
    decl: &'a ValueDecl,
}

impl<'a> Value<'a> {
    pub fn new(cfg: Config, decl: &'a ValueDecl) -> Self {
        Self { cfg, decl }
    }

    pub fn kind(&self) -> ValueKind {
        self.decl.kind
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.decl.names().collect()
    }

    pub fn level(&self) -> usize {
        self.cfg.level()
    }

    pub fn summary(&self) -> String {
        summary(self.decl.doc.as_deref().unwrap_or_default())
    }

    pub fn doc(&self) -> Doc {
        Doc::new(&self.cfg.inc(1), self.decl.doc.as_deref().unwrap_or_default())
    }

    /// Source text of the declaration.
    pub fn decl(&self) -> &'a str {
        &self.decl.text
    }
}

impl Located for Value<'_> {
    fn location(&self) -> Location {
        Location::new(&self.cfg, &self.decl.file_path, self.decl.span)
    }
}
