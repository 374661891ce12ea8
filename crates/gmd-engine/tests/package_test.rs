use gmd_core::{is_exported, Error};
use gmd_engine::filter::Located;
use gmd_engine::{Block, BuildPackage, Package, PackageOptions};
use std::fs;
use std::path::{Path, PathBuf};

const DOC_GO: &str = r#"// Package widget builds widgets.
//
// It has several parts.
package widget
"#;

const WIDGET_GO: &str = r#"package widget

// Size is a widget size.
type Size int

// Sizes.
const (
	Small Size = iota
	Large
)

// MaxWidgets limits things.
const MaxWidgets = 10

var registry = map[string]int{}

// Widget does work.
type Widget struct {
	Name string
	id   int
}

// New creates a widget.
func New(name string) *Widget { return &Widget{Name: name} }

// Run runs it.
func (w *Widget) Run() error { return nil }

func (w *Widget) reset() {}

func helper() {}

type internal struct{}
"#;

const UTIL_GO: &str = r#"package widget

// Version reports the version.
func Version() string { return "1" }
"#;

const EXAMPLE_TEST_GO: &str = r#"package widget_test

import "fmt"

func Example() {
	fmt.Println("pkg")
	// Output: pkg
}

func Example_basics() {
	fmt.Println("basics")
}

func ExampleVersion() {
	fmt.Println(widget.Version())
	// Output: 1
}

func ExampleWidget_Run() {}

func ExampleNew_named() {}
"#;

struct Fixture {
    _root: tempfile::TempDir,
    work_dir: PathBuf,
    pkg_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let work_dir = root.path().to_path_buf();
        let pkg_dir = work_dir.join("widget");
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(work_dir.join("go.mod"), "module example.com/m\n").unwrap();
        fs::write(pkg_dir.join("doc.go"), DOC_GO).unwrap();
        fs::write(pkg_dir.join("widget.go"), WIDGET_GO).unwrap();
        fs::write(pkg_dir.join("util.go"), UTIL_GO).unwrap();
        fs::write(pkg_dir.join("example_test.go"), EXAMPLE_TEST_GO).unwrap();
        Self {
            _root: root,
            work_dir,
            pkg_dir,
        }
    }

    fn file(&self, name: &str) -> String {
        self.pkg_dir.join(name).to_string_lossy().into_owned()
    }

    fn package(&self, options: PackageOptions) -> Package {
        let build = BuildPackage::import_dir(&self.pkg_dir).unwrap();
        Package::from_build_in(&build, &options, &self.work_dir).unwrap()
    }
}

fn names<T, F: Fn(&T) -> String>(items: &[T], f: F) -> Vec<String> {
    items.iter().map(f).collect()
}

#[test]
fn test_package_accessors() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new());

    assert_eq!(pkg.name(), "widget");
    assert_eq!(pkg.dirname(), "widget");
    assert_eq!(pkg.dir(), fx.pkg_dir.as_path());
    assert_eq!(pkg.level(), 1);
    assert_eq!(pkg.import_path(), "example.com/m/widget");
    assert_eq!(pkg.import(), "import \"example.com/m/widget\"");
    assert_eq!(pkg.summary(), "Package widget builds widgets.");
    assert_eq!(pkg.filenames().len(), 3);

    let doc = pkg.doc();
    assert_eq!(doc.level(), 3);
    assert_eq!(
        doc.blocks(),
        &[
            Block::Paragraph {
                text: "Package widget builds widgets.".into()
            },
            Block::Paragraph {
                text: "It has several parts.".into()
            },
        ]
    );
}

#[test]
fn test_exported_only_association() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new());

    let consts = pkg.consts();
    assert_eq!(names(&consts, |v| v.names().join(",")), vec!["MaxWidgets"]);
    assert!(consts.iter().all(|v| v.level() == 2));
    assert!(pkg.vars().is_empty());
    assert_eq!(names(&pkg.funcs(), |f| f.name().to_string()), vec!["Version"]);

    let types = pkg.types();
    assert_eq!(
        names(&types, |t| t.name().to_string()),
        vec!["Size", "Widget"]
    );

    let size = &types[0];
    assert_eq!(
        names(&size.consts(), |v| v.names().join(",")),
        vec!["Small,Large"]
    );
    assert_eq!(size.consts()[0].level(), 3);

    let widget = &types[1];
    assert_eq!(widget.title(), "type Widget");
    assert_eq!(names(&widget.funcs(), |f| f.name().to_string()), vec!["New"]);
    assert_eq!(names(&widget.methods(), |f| f.name().to_string()), vec!["Run"]);
    assert_eq!(widget.methods()[0].title(), "func (*Widget) Run");
    assert!(widget
        .decl()
        .contains("// contains filtered or unexported fields"));
    assert!(!widget.decl().contains("id   int"));
}

#[test]
fn test_exported_only_has_no_unexported_names() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new());

    let mut all = Vec::new();
    for v in pkg.consts().iter().chain(pkg.vars().iter()) {
        all.extend(v.names().into_iter().map(str::to_string));
    }
    all.extend(pkg.funcs().iter().map(|f| f.name().to_string()));
    for t in pkg.types() {
        all.push(t.name().to_string());
        all.extend(t.funcs().iter().map(|f| f.name().to_string()));
        all.extend(t.methods().iter().map(|f| f.name().to_string()));
        for v in t.consts().iter().chain(t.vars().iter()) {
            all.extend(v.names().into_iter().map(str::to_string));
        }
    }
    assert!(!all.is_empty());
    assert!(all.iter().all(|n| is_exported(n)), "unexported in {all:?}");
}

#[test]
fn test_include_unexported() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new().with_unexported_included());

    assert_eq!(
        names(&pkg.vars(), |v| v.names().join(",")),
        vec!["registry"]
    );
    assert_eq!(
        names(&pkg.funcs(), |f| f.name().to_string()),
        vec!["Version", "helper"]
    );
    let types = pkg.types();
    assert_eq!(
        names(&types, |t| t.name().to_string()),
        vec!["Size", "Widget", "internal"]
    );
    assert_eq!(
        names(&types[1].methods(), |f| f.name().to_string()),
        vec!["Run", "reset"]
    );
    assert!(types[1].decl().contains("id   int"));
}

#[test]
fn test_package_examples() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new());

    let examples = pkg.examples();
    assert_eq!(
        names(&examples, |e| e.name().to_string()),
        vec!["", "basics"]
    );
    assert_eq!(examples[0].title(), "Example");
    assert_eq!(examples[0].output(), Some("pkg"));
    assert_eq!(examples[1].title(), "Example (Basics)");
    assert!(!examples[1].has_output());
    assert!(examples.iter().all(|e| e.level() == 2));
}

#[test]
fn test_symbol_examples() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new());

    let funcs = pkg.funcs();
    assert_eq!(
        names(&funcs[0].examples(), |e| e.name().to_string()),
        vec![""]
    );

    let types = pkg.types();
    let methods = types[1].methods();
    assert_eq!(methods[0].example_key(), "Widget_Run");
    assert_eq!(methods[0].examples().len(), 1);
    let factories = types[1].funcs();
    assert_eq!(
        names(&factories[0].examples(), |e| e.name().to_string()),
        vec!["named"]
    );
}

#[test]
fn test_file_filter_limits_every_category() {
    let fx = Fixture::new();
    let filter = fx.file("widget.go");
    let pkg = fx.package(PackageOptions::new().with_file_filter(filter.clone()));

    let mut locations = Vec::new();
    locations.extend(pkg.consts().iter().map(|v| v.location()));
    locations.extend(pkg.vars().iter().map(|v| v.location()));
    locations.extend(pkg.funcs().iter().map(|f| f.location()));
    locations.extend(pkg.types().iter().map(|t| t.location()));

    assert!(!locations.is_empty());
    assert!(locations.iter().all(|l| l.filepath == filter));
    assert!(pkg.funcs().is_empty());
    assert!(pkg.doc().is_empty());
    assert!(pkg.examples().is_empty());
}

#[test]
fn test_file_filter_on_doc_file() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new().with_file_filter(fx.file("doc.go")));

    assert!(pkg.consts().is_empty());
    assert!(pkg.funcs().is_empty());
    assert!(pkg.types().is_empty());
    assert!(!pkg.doc().is_empty());
    assert_eq!(pkg.examples().len(), 2);
}

#[test]
fn test_file_filter_on_other_file() {
    let fx = Fixture::new();
    let filter = fx.file("util.go");
    let pkg = fx.package(PackageOptions::new().with_file_filter(filter.clone()));

    assert_eq!(names(&pkg.funcs(), |f| f.name().to_string()), vec!["Version"]);
    assert_eq!(pkg.funcs()[0].location().filepath, filter);
    assert!(pkg.types().is_empty());
    assert!(pkg.doc().is_empty());
    assert_eq!(pkg.doc().level(), 3);
    assert!(pkg.examples().is_empty());
}

#[test]
fn test_locations_name_build_files() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new().with_unexported_included());
    let build = BuildPackage::import_dir(&fx.pkg_dir).unwrap();
    let files: Vec<String> = build
        .go_file_paths()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let types = pkg.types();
    for t in &types {
        assert!(files.contains(&t.location().filepath));
        for m in t.methods() {
            assert!(files.contains(&m.location().filepath));
        }
    }
    for f in pkg.funcs() {
        assert!(files.contains(&f.location().filepath));
    }
    let methods = types[1].methods();
    assert_eq!(methods[0].location().start.line, 27);
}

#[test]
fn test_queries_are_idempotent() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new().with_file_filter(fx.file("widget.go")));

    let first = names(&pkg.types(), |t| t.name().to_string());
    let second = names(&pkg.types(), |t| t.name().to_string());
    assert_eq!(first, second);
    assert_eq!(
        names(&pkg.consts(), |v| v.decl().to_string()),
        names(&pkg.consts(), |v| v.decl().to_string())
    );
    assert_eq!(pkg.doc(), pkg.doc());
}

#[test]
fn test_override_import() {
    let fx = Fixture::new();
    let pkg = fx.package(PackageOptions::new().with_override_import("custom/widget"));
    assert_eq!(pkg.import_path(), "custom/widget");
}

#[test]
fn test_import_comment_wins_over_manifest() {
    let fx = Fixture::new();
    fs::write(
        fx.pkg_dir.join("doc.go"),
        "// Package widget builds widgets.\npackage widget // import \"example.com/vanity\"\n",
    )
    .unwrap();
    let pkg = fx.package(PackageOptions::new());
    assert_eq!(pkg.import_path(), "example.com/vanity");
}

#[test]
fn test_empty_override_rejected() {
    let fx = Fixture::new();
    let build = BuildPackage::import_dir(&fx.pkg_dir).unwrap();
    let err = Package::from_build_in(
        &build,
        &PackageOptions::new().with_override_import(""),
        &fx.work_dir,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_no_package() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("only_test.go"), "package x\n").unwrap();
    let build = BuildPackage::import_dir(dir.path()).unwrap();
    let err = Package::from_build_in(&build, &PackageOptions::new(), dir.path()).unwrap_err();
    assert!(matches!(err, Error::NoPackage(_)));
}

#[test]
fn test_multiple_packages() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.go"), "package a\n").unwrap();
    fs::write(dir.path().join("b.go"), "package b\n").unwrap();
    let build = BuildPackage::import_dir(dir.path()).unwrap();
    let err = Package::from_build_in(&build, &PackageOptions::new(), dir.path()).unwrap_err();
    match err {
        Error::MultiplePackages { names, .. } => assert_eq!(names, vec!["a", "b"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.go"), "package a\n\nfunc (\n").unwrap();
    let build = BuildPackage::import_dir(dir.path()).unwrap();
    let err = Package::from_build_in(&build, &PackageOptions::new(), dir.path()).unwrap_err();
    assert!(matches!(err, Error::Parse { ref path, .. } if path == &dir.path().join("a.go")));
}

#[test]
fn test_relative_package_dir() {
    let fx = Fixture::new();
    let build = BuildPackage {
        dir: PathBuf::from("widget"),
        import_path: ".".into(),
        go_files: vec!["doc.go".into(), "util.go".into(), "widget.go".into()],
        test_go_files: vec![],
    };
    let options = PackageOptions::new().with_file_filter("widget/util.go");
    let pkg = Package::from_build_in(&build, &options, &fx.work_dir).unwrap();
    assert_eq!(pkg.import_path(), "example.com/m/widget");
    assert_eq!(pkg.dir(), Path::new("widget"));
    let funcs = pkg.funcs();
    assert_eq!(funcs[0].location().filepath, "widget/util.go");
    assert_eq!(funcs[0].location().relative_path(), "widget/util.go");
}

#[test]
fn test_dot_relative_package_dir() {
    let fx = Fixture::new();
    let build = BuildPackage {
        dir: PathBuf::from("./widget"),
        import_path: ".".into(),
        go_files: vec!["doc.go".into(), "util.go".into(), "widget.go".into()],
        test_go_files: vec!["example_test.go".into()],
    };

    for filter in ["widget/util.go", "./widget/util.go"] {
        let options = PackageOptions::new().with_file_filter(filter);
        let pkg = Package::from_build_in(&build, &options, &fx.work_dir).unwrap();
        let funcs = pkg.funcs();
        assert_eq!(funcs.len(), 1, "filter {filter}");
        assert_eq!(funcs[0].location().filepath, "widget/util.go");
        assert!(pkg.types().is_empty());
    }

    let pkg = Package::from_build_in(&build, &PackageOptions::new(), &fx.work_dir).unwrap();
    assert_eq!(pkg.import_path(), "example.com/m/widget");
    let types = pkg.types();
    assert_eq!(types[0].location().filepath, "widget/widget.go");
}

#[test]
fn test_code_block_with_wide_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.go"),
        "package a\n\n// Run does things.\n//\n//\t\tfoo()\n//\t\u{3000}bar()\nfunc Run() {}\n",
    )
    .unwrap();
    let build = BuildPackage::import_dir(dir.path()).unwrap();
    let pkg = Package::from_build_in(&build, &PackageOptions::new(), dir.path()).unwrap();
    let funcs = pkg.funcs();
    let doc = funcs[0].doc();
    assert!(doc.blocks().contains(&Block::Code {
        text: "\tfoo()\n\u{3000}bar()".into()
    }));
}

#[test]
fn test_package_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Package>();
}
