use gmd_core::ExampleDecl;

use super::comment::{summary, Doc};
use super::location::Location;
use crate::config::Config;
use crate::filter::Located;

/// A runnable example, named by what follows its target in the function
/// name (`ExampleFoo_bar` shown under `Foo` is named `bar`).
#[derive(Debug, Clone)]
pub struct Example<'a> {
    cfg: Config,
    name: String,
    decl: &'a ExampleDecl,
}

impl<'a> Example<'a> {
    pub fn new(cfg: Config, name: impl Into<String>, decl: &'a ExampleDecl) -> Self {
        Self {
            cfg,
            name: name.into(),
            decl,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Example`, or `Example (Some Name)` for a named example.
    pub fn title(&self) -> String {
        if self.name.is_empty() {
            return "Example".to_string();
        }
        let words: Vec<String> = self
            .name
            .split('_')
            .filter(|w| !w.is_empty())
            .map(capitalize)
            .collect();
        format!("Example ({})", words.join(" "))
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

    pub fn code(&self) -> &str {
        &self.decl.code
    }

    pub fn output(&self) -> Option<&str> {
        self.decl.output.as_deref()
    }

    pub fn has_output(&self) -> bool {
        self.decl.output.as_deref().is_some_and(|o| !o.is_empty())
    }

    pub fn is_unordered(&self) -> bool {
        self.decl.unordered
    }
}

impl Located for Example<'_> {
    fn location(&self) -> Location {
        Location::new(&self.cfg, &self.decl.file_path, self.decl.span)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Examples that belong to the symbol whose example key is `key`: exactly
/// `key`, or `key_suffix` where the suffix starts with a lower-case letter.
pub(crate) fn symbol_examples<'a>(
    cfg: &Config,
    key: &str,
    examples: &'a [ExampleDecl],
) -> Vec<Example<'a>> {
    examples
        .iter()
        .filter_map(|ex| {
            let suffix = if ex.name == key {
                ""
            } else {
                ex.name
                    .strip_prefix(key)?
                    .strip_prefix('_')
                    .filter(|s| s.chars().next().is_some_and(char::is_lowercase))?
            };
            Some(Example::new(cfg.inc(1), suffix, ex))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmd_core::Span;
    use std::path::PathBuf;

    fn decl(name: &str) -> ExampleDecl {
        ExampleDecl {
            name: name.into(),
            doc: Some("Shows the basics. Then more.".into()),
            code: "fmt.Println(1)".into(),
            output: Some("1".into()),
            unordered: false,
            file_path: PathBuf::from("pkg/example_test.go"),
            span: Span::default(),
        }
    }

    #[test]
    fn test_title() {
        let cfg = Config::new("/work", "pkg");
        let d = decl("");
        assert_eq!(Example::new(cfg.clone(), "", &d).title(), "Example");
        assert_eq!(
            Example::new(cfg, "with_options", &d).title(),
            "Example (With Options)"
        );
    }

    #[test]
    fn test_symbol_examples_matching() {
        let cfg = Config::new("/work", "pkg");
        let decls = vec![
            decl("New"),
            decl("New_withConfig"),
            decl("New_Other"),
            decl("NewWidget"),
            decl("Widget_Run"),
        ];
        let found = symbol_examples(&cfg, "New", &decls);
        let names: Vec<&str> = found.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["", "withConfig"]);
        assert!(found.iter().all(|e| e.level() == 2));

        let method = symbol_examples(&cfg, "Widget_Run", &decls);
        assert_eq!(method.len(), 1);
    }

    #[test]
    fn test_accessors() {
        let cfg = Config::new("/work", "pkg");
        let d = decl("");
        let ex = Example::new(cfg, "", &d);
        assert_eq!(ex.summary(), "Shows the basics.");
        assert_eq!(ex.code(), "fmt.Println(1)");
        assert!(ex.has_output());
        assert_eq!(ex.location().filepath, "pkg/example_test.go");
    }
}
