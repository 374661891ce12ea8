use gmd_core::{Error, ValueKind};
use gmd_engine::parser::{GoParser, SourceParser};
use std::path::Path;

#[test]
fn test_extract_package_clause_and_declarations() {
    let parser = GoParser::new();
    let source = br#"// Package widget builds widgets.
package widget // import "example.com/widget"

// Size is a widget size.
type Size int

const (
	Small Size = iota
	Large
)

// New creates a widget.
func New() *Widget { return &Widget{} }

// Widget does work.
type Widget struct {
	Name string
	id   int
}

// Run runs it.
func (w *Widget) Run() error { return nil }
"#;
    let analysis = parser
        .parse_file(source, Path::new("pkg/widget.go"))
        .unwrap();

    assert_eq!(analysis.package_name, "widget");
    assert_eq!(
        analysis.package_doc.as_deref(),
        Some("Package widget builds widgets.")
    );
    assert_eq!(analysis.import_comment.as_deref(), Some("example.com/widget"));

    let funcs: Vec<&str> = analysis.funcs.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(funcs, vec!["New", "Run"]);
    assert_eq!(analysis.funcs[0].result_types, vec!["Widget"]);
    assert_eq!(analysis.funcs[0].signature, "func New() *Widget");
    assert_eq!(analysis.funcs[0].doc.as_deref(), Some("New creates a widget."));

    let recv = analysis.funcs[1].receiver.as_ref().unwrap();
    assert_eq!(recv.type_name, "Widget");
    assert!(recv.pointer);
    assert_eq!(recv.text, "*Widget");

    let types: Vec<&str> = analysis.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(types, vec!["Size", "Widget"]);
    assert_eq!(analysis.types[0].text, "type Size int");
    assert!(analysis.types[0].exported_text.is_none());
}

#[test]
fn test_exported_text_hides_unexported_fields() {
    let parser = GoParser::new();
    let source = br#"package widget

type Widget struct {
	Name string
	id   int
}
"#;
    let analysis = parser.parse_file(source, Path::new("widget.go")).unwrap();
    let exported = analysis.types[0].exported_text.as_deref().unwrap();
    assert!(exported.contains("Name string"));
    assert!(!exported.contains("id   int"));
    assert!(exported.contains("// contains filtered or unexported fields"));
    assert!(analysis.types[0].text.contains("id   int"));
}

#[test]
fn test_extract_value_groups() {
    let parser = GoParser::new();
    let source = br#"package widget

type Size int

// Sizes.
const (
	Small Size = iota
	Large
)

var Default = 3
"#;
    let analysis = parser.parse_file(source, Path::new("widget.go")).unwrap();
    assert_eq!(analysis.values.len(), 2);

    let group = &analysis.values[0];
    assert_eq!(group.kind, ValueKind::Const);
    assert!(group.grouped);
    assert_eq!(group.doc.as_deref(), Some("Sizes."));
    assert_eq!(group.names().collect::<Vec<_>>(), vec!["Small", "Large"]);
    assert_eq!(group.specs[0].type_name.as_deref(), Some("Size"));
    assert!(group.specs[0].has_values);
    assert_eq!(group.specs[1].type_name, None);
    assert!(!group.specs[1].has_values);

    let single = &analysis.values[1];
    assert_eq!(single.kind, ValueKind::Var);
    assert!(!single.grouped);
    assert_eq!(single.text, "var Default = 3");
}

#[test]
fn test_extract_examples_from_test_files() {
    let parser = GoParser::new();
    let source = br#"package widget_test

import "fmt"

// This shows New.
func ExampleNew() {
	w := widget.New()
	fmt.Println(w.Name)
	// Output:
	// hello
}

func Example_second() {
	fmt.Println("a")
	fmt.Println("b")
	// Unordered output:
	// b
	// a
}

func Examplelower() {}

func TestSomething(t *testing.T) {}
"#;
    let analysis = parser
        .parse_file(source, Path::new("widget_test.go"))
        .unwrap();

    let names: Vec<&str> = analysis.examples.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["New", "_second"]);

    let first = &analysis.examples[0];
    assert_eq!(first.doc.as_deref(), Some("This shows New."));
    assert_eq!(first.code, "w := widget.New()\nfmt.Println(w.Name)");
    assert_eq!(first.output.as_deref(), Some("hello"));
    assert!(!first.unordered);

    let second = &analysis.examples[1];
    assert!(second.unordered);
    assert_eq!(second.output.as_deref(), Some("b\na"));
}

#[test]
fn test_examples_ignored_outside_test_files() {
    let parser = GoParser::new();
    let source = b"package widget\n\nfunc ExampleNew() {}\n";
    let analysis = parser.parse_file(source, Path::new("widget.go")).unwrap();
    assert!(analysis.examples.is_empty());
    assert_eq!(analysis.funcs[0].name, "ExampleNew");
}

#[test]
fn test_syntax_error_is_parse_error() {
    let parser = GoParser::new();
    let err = parser
        .parse_file(b"package x\n\nfunc (\n", Path::new("bad.go"))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { ref path, .. } if path == Path::new("bad.go")));
}

#[test]
fn test_missing_package_clause_is_parse_error() {
    let parser = GoParser::new();
    let err = parser
        .parse_file(b"func F() {}\n", Path::new("nopkg.go"))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_supports_go_files_only() {
    let parser = GoParser::new();
    assert!(parser.supports_file(Path::new("a/b.go")));
    assert!(!parser.supports_file(Path::new("a/b.rs")));
}
