use super::SourceParser;
use gmd_core::{
    is_exported, Error, ExampleDecl, FileAnalysis, FuncDecl, Position, Receiver, Result, Span,
    TypeDecl, ValueDecl, ValueKind, ValueSpec,
};
use regex::Regex;
use std::path::Path;
use tree_sitter::{Node, Parser};

const PREDECLARED_TYPES: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Go parser backed by tree-sitter.
///
/// Extracts the package clause, its documentation and import comment, every
/// top-level const/var/func/type declaration, and (for `_test.go` files) the
/// runnable examples.
pub struct GoParser {
    import_comment: Regex,
    output_prefix: Regex,
}

impl GoParser {
    pub fn new() -> Self {
        Self {
            import_comment: Regex::new(r#"^(?://|/\*)\s*import\s+"([^"]+)""#)
                .expect("invalid regex"),
            output_prefix: Regex::new(r"(?i)^[[:space:]]*(unordered )?output:")
                .expect("invalid regex"),
        }
    }

    /// Create a configured tree-sitter parser for Go.
    fn create_parser(file_path: &Path) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| parse_error(file_path, format!("failed to load Go grammar: {e}")))?;
        Ok(parser)
    }

    /// Parse source text into a tree-sitter tree, rejecting syntax errors.
    fn parse_tree(src: &str, file_path: &Path) -> Result<tree_sitter::Tree> {
        let mut parser = Self::create_parser(file_path)?;
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| parse_error(file_path, "tree-sitter parse returned None"))?;

        if tree.root_node().has_error() {
            let at = first_error(&tree.root_node())
                .map(|n| position(n.start_position()))
                .unwrap_or_default();
            return Err(parse_error(file_path, format!("syntax error at {at}")));
        }
        Ok(tree)
    }

    fn import_comment(&self, clause: &Node, src: &str) -> Option<String> {
        let next = clause.next_sibling()?;
        if next.kind() != "comment" || next.start_position().row != clause.end_position().row {
            return None;
        }
        self.import_comment
            .captures(node_text(&next, src))
            .map(|c| c[1].to_string())
    }

    fn func_decl(node: &Node, src: &str, file_path: &Path) -> Option<FuncDecl> {
        let name = node_text(&node.child_by_field_name("name")?, src).to_string();

        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|r| receiver(&r, src));

        let type_params = node
            .child_by_field_name("type_parameters")
            .map(|tp| type_param_names(&tp, src))
            .unwrap_or_default();

        let result_types = node
            .child_by_field_name("result")
            .map(|r| result_type_names(&r, src, &type_params))
            .unwrap_or_default();

        let signature = match node.child_by_field_name("body") {
            Some(body) => src[node.start_byte()..body.start_byte()].trim_end().to_string(),
            None => node_text(node, src).to_string(),
        };

        Some(FuncDecl {
            name,
            doc: doc_comments(node, src),
            receiver,
            type_params,
            result_types,
            signature,
            file_path: file_path.to_path_buf(),
            span: span(node),
        })
    }

    fn value_decl(node: &Node, src: &str, file_path: &Path, kind: ValueKind) -> Option<ValueDecl> {
        let spec_kind = match kind {
            ValueKind::Const => "const_spec",
            ValueKind::Var => "var_spec",
        };

        let mut spec_nodes = Vec::new();
        collect_kind(node, spec_kind, &mut spec_nodes);

        let specs: Vec<ValueSpec> = spec_nodes
            .iter()
            .map(|spec| {
                let mut cursor = spec.walk();
                let names = spec
                    .children_by_field_name("name", &mut cursor)
                    .map(|n| node_text(&n, src).to_string())
                    .collect();
                ValueSpec {
                    names,
                    type_name: spec
                        .child_by_field_name("type")
                        .and_then(|t| base_type_name(&t, src)),
                    has_values: spec.child_by_field_name("value").is_some(),
                    text: node_text(spec, src).to_string(),
                }
            })
            .collect();

        if specs.is_empty() {
            return None;
        }

        Some(ValueDecl {
            kind,
            doc: doc_comments(node, src),
            specs,
            grouped: has_paren(node),
            text: node_text(node, src).to_string(),
            file_path: file_path.to_path_buf(),
            span: span(node),
        })
    }

    /// A grouped `type ( ... )` declaration yields one `TypeDecl` per spec,
    /// each falling back to the group's comment when it has none of its own.
    fn type_decls(node: &Node, src: &str, file_path: &Path) -> Vec<TypeDecl> {
        let decl_doc = doc_comments(node, src);
        let mut cursor = node.walk();
        let specs: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "type_spec" | "type_alias"))
            .collect();
        let grouped = has_paren(node);

        specs
            .iter()
            .filter_map(|spec| {
                let name = node_text(&spec.child_by_field_name("name")?, src).to_string();
                let doc = if grouped {
                    doc_comments(spec, src).or_else(|| decl_doc.clone())
                } else {
                    decl_doc.clone()
                };
                Some(TypeDecl {
                    name,
                    doc,
                    text: format!("type {}", node_text(spec, src)),
                    exported_text: exported_type_text(spec, src).map(|t| format!("type {t}")),
                    file_path: file_path.to_path_buf(),
                    span: if grouped { span(spec) } else { span(node) },
                })
            })
            .collect()
    }

    /// Build an example from `func ExampleXxx()`. Functions with parameters,
    /// results, or type parameters, and names like `Examplefoo`, are not
    /// examples.
    fn example_decl(&self, node: &Node, src: &str, file_path: &Path) -> Option<ExampleDecl> {
        let name = node_text(&node.child_by_field_name("name")?, src);
        let suffix = name.strip_prefix("Example")?;
        if suffix.chars().next().is_some_and(char::is_lowercase) {
            return None;
        }
        if node.child_by_field_name("parameters")?.named_child_count() != 0
            || node.child_by_field_name("result").is_some()
            || node.child_by_field_name("type_parameters").is_some()
        {
            return None;
        }
        let body = node.child_by_field_name("body")?;

        let mut comments = Vec::new();
        collect_kind(&body, "comment", &mut comments);
        let group = trailing_group(&comments);

        let mut output = None;
        let mut unordered = false;
        let mut code_end = body.end_byte().saturating_sub(1);
        let mut code_resume = code_end;

        if let Some((first, last)) = group {
            let raw: Vec<&str> = comments[first..=last]
                .iter()
                .map(|c| node_text(c, src))
                .collect();
            let text = comment_text(&raw).unwrap_or_default();
            if let Some(caps) = self.output_prefix.captures(&text) {
                unordered = caps.get(1).is_some();
                let rest = &text[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
                let rest = rest.trim_start_matches(' ');
                let rest = rest.strip_prefix('\n').unwrap_or(rest);
                output = Some(rest.trim_end().to_string());
                code_end = comments[first].start_byte();
                code_resume = comments[last].end_byte();
            }
        }

        let inner_start = body.start_byte() + 1;
        let block_end = body.end_byte().saturating_sub(1);
        let mut code = String::new();
        if code_end > inner_start {
            code.push_str(&src[inner_start..code_end]);
        }
        if code_resume < block_end {
            code.push_str(&src[code_resume..block_end]);
        }

        Some(ExampleDecl {
            name: suffix.to_string(),
            doc: doc_comments(node, src),
            code: dedent(&code),
            output,
            unordered,
            file_path: file_path.to_path_buf(),
            span: span(node),
        })
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for GoParser {
    fn extensions(&self) -> &[&str] {
        &["go"]
    }

    fn parse_file(&self, source: &[u8], file_path: &Path) -> Result<FileAnalysis> {
        let src = std::str::from_utf8(source)
            .map_err(|e| parse_error(file_path, format!("invalid UTF-8: {e}")))?;

        let tree = Self::parse_tree(src, file_path)?;
        let root = tree.root_node();
        let is_test = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"));

        let mut analysis = FileAnalysis {
            file_path: file_path.to_path_buf(),
            ..Default::default()
        };
        let mut saw_package = false;

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    let mut inner = node.walk();
                    let name = node
                        .named_children(&mut inner)
                        .find(|c| c.kind() == "package_identifier")
                        .map(|c| node_text(&c, src).to_string())
                        .unwrap_or_default();
                    analysis.package_name = name;
                    analysis.package_doc = doc_comments(&node, src);
                    analysis.import_comment = self.import_comment(&node, src);
                    saw_package = true;
                }
                "function_declaration" | "method_declaration" => {
                    if is_test && node.kind() == "function_declaration" {
                        if let Some(example) = self.example_decl(&node, src, file_path) {
                            analysis.examples.push(example);
                            continue;
                        }
                    }
                    if let Some(func) = Self::func_decl(&node, src, file_path) {
                        analysis.funcs.push(func);
                    }
                }
                "const_declaration" => {
                    analysis
                        .values
                        .extend(Self::value_decl(&node, src, file_path, ValueKind::Const));
                }
                "var_declaration" => {
                    analysis
                        .values
                        .extend(Self::value_decl(&node, src, file_path, ValueKind::Var));
                }
                "type_declaration" => {
                    analysis
                        .types
                        .extend(Self::type_decls(&node, src, file_path));
                }
                _ => {}
            }
        }

        if !saw_package || analysis.package_name.is_empty() {
            return Err(parse_error(file_path, "expected 'package' clause"));
        }

        Ok(analysis)
    }
}

// ── Tree helpers ──

fn parse_error(file_path: &Path, message: impl Into<String>) -> Error {
    Error::Parse {
        path: file_path.to_path_buf(),
        message: message.into(),
    }
}

fn node_text<'s>(node: &Node, src: &'s str) -> &'s str {
    &src[node.start_byte()..node.end_byte()]
}

fn position(point: tree_sitter::Point) -> Position {
    Position::new(point.row as u32 + 1, point.column as u32 + 1)
}

fn span(node: &Node) -> Span {
    Span {
        start: position(node.start_position()),
        end: position(node.end_position()),
    }
}

fn first_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children
        .iter()
        .filter(|c| c.has_error())
        .find_map(first_error)
}

/// Collect every descendant of `node` with the given kind, in source order.
fn collect_kind<'t>(node: &Node<'t>, kind: &str, out: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    for child in children {
        if child.kind() == kind {
            out.push(child);
        } else {
            collect_kind(&child, kind, out);
        }
    }
}

/// Whether a declaration uses the parenthesized group form.
fn has_paren(node: &Node) -> bool {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if child.kind() == "(" {
            return true;
        }
        if child.kind().ends_with("_spec_list") {
            let mut inner = child.walk();
            if child.children(&mut inner).any(|g| g.kind() == "(") {
                return true;
            }
        }
    }
    false
}

// ── Types ──

/// Base name of a local type expression: `T`, `*T`, `T[U]` all give `T`.
/// Qualified (imported) types have no local base name.
fn base_type_name(node: &Node, src: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(node_text(node, src).to_string()),
        "pointer_type" | "parenthesized_type" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next()?;
            base_type_name(&inner, src)
        }
        "generic_type" => base_type_name(&node.child_by_field_name("type")?, src),
        _ => None,
    }
}

fn receiver(params: &Node, src: &str) -> Option<Receiver> {
    let mut cursor = params.walk();
    let param = params
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;

    Some(Receiver {
        name: param
            .child_by_field_name("name")
            .map(|n| node_text(&n, src).to_string()),
        type_name: base_type_name(&ty, src)?,
        pointer: ty.kind() == "pointer_type",
        text: node_text(&ty, src).to_string(),
    })
}

fn type_param_names(list: &Node, src: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = list.walk();
    let decls: Vec<Node> = list.named_children(&mut cursor).collect();
    for decl in decls {
        let mut inner = decl.walk();
        names.extend(
            decl.children_by_field_name("name", &mut inner)
                .map(|n| node_text(&n, src).to_string()),
        );
    }
    names
}

/// Local result type names, one per result field. Slices and arrays of a
/// type count as that type; predeclared types and type parameters never do.
fn result_type_names(result: &Node, src: &str, type_params: &[String]) -> Vec<String> {
    let type_nodes: Vec<Node> = if result.kind() == "parameter_list" {
        let mut cursor = result.walk();
        let params: Vec<Node> = result.named_children(&mut cursor).collect();
        params
            .iter()
            .filter_map(|p| p.child_by_field_name("type"))
            .collect()
    } else {
        vec![*result]
    };

    type_nodes
        .iter()
        .filter_map(|t| {
            let t = match t.kind() {
                "slice_type" | "array_type" => t.child_by_field_name("element")?,
                _ => *t,
            };
            base_type_name(&t, src)
        })
        .filter(|n| !PREDECLARED_TYPES.contains(&n.as_str()) && !type_params.contains(n))
        .collect()
}

/// Declaration text of a struct or interface type with unexported members
/// removed. `None` when nothing is removed or the layout cannot be edited
/// line by line.
fn exported_type_text(spec: &Node, src: &str) -> Option<String> {
    let ty = spec.child_by_field_name("type")?;
    let (list, note) = match ty.kind() {
        "struct_type" => {
            let mut cursor = ty.walk();
            let list = ty
                .named_children(&mut cursor)
                .find(|c| c.kind() == "field_declaration_list")?;
            (list, "fields")
        }
        "interface_type" => (ty, "methods"),
        _ => return None,
    };

    let mut cursor = list.walk();
    let members: Vec<Node> = list.named_children(&mut cursor).collect();
    let open_row = list.start_position().row;
    let close_row = list.end_position().row;

    let mut ranges = Vec::new();
    for member in &members {
        let hidden = match member.kind() {
            "field_declaration" => {
                let mut inner = member.walk();
                let names: Vec<String> = member
                    .children_by_field_name("name", &mut inner)
                    .map(|n| node_text(&n, src).to_string())
                    .collect();
                if names.is_empty() {
                    member
                        .child_by_field_name("type")
                        .and_then(|t| embedded_name(&t, src))
                        .is_some_and(|n| !is_exported(&n))
                } else {
                    names.iter().all(|n| !is_exported(n))
                }
            }
            "method_elem" | "method_spec" => member
                .child_by_field_name("name")
                .is_some_and(|n| !is_exported(node_text(&n, src))),
            _ => false,
        };
        if !hidden {
            continue;
        }
        if member.start_position().row <= open_row || member.end_position().row >= close_row {
            return None;
        }
        ranges.push(line_range(src, member.start_byte(), member.end_byte()));

        let mut prev = member.prev_sibling();
        let mut row = member.start_position().row;
        while let Some(p) = prev {
            if p.kind() != "comment" || p.end_position().row + 1 != row || p.start_position().row <= open_row {
                break;
            }
            ranges.push(line_range(src, p.start_byte(), p.end_byte()));
            row = p.start_position().row;
            prev = p.prev_sibling();
        }
    }

    if ranges.is_empty() {
        return None;
    }
    ranges.sort_unstable();

    let close = list.end_byte() - 1;
    let close_line = line_start(src, close);
    let indent = &src[close_line..close];

    let mut out = String::new();
    let mut at = spec.start_byte();
    for (start, end) in ranges {
        if start > at {
            out.push_str(&src[at..start]);
        }
        at = at.max(end);
    }
    if close_line > at {
        out.push_str(&src[at..close_line]);
    }
    out.push_str(&format!("{indent}\t// contains filtered or unexported {note}\n"));
    out.push_str(&src[close_line..spec.end_byte()]);
    Some(out)
}

fn embedded_name(ty: &Node, src: &str) -> Option<String> {
    match ty.kind() {
        "qualified_type" => ty
            .child_by_field_name("name")
            .map(|n| node_text(&n, src).to_string()),
        _ => base_type_name(ty, src),
    }
}

fn line_start(src: &str, at: usize) -> usize {
    src[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte range covering the whole lines spanned by `start..end`, including
/// the final newline.
fn line_range(src: &str, start: usize, end: usize) -> (usize, usize) {
    let line_end = src[end..]
        .find('\n')
        .map(|i| end + i + 1)
        .unwrap_or(src.len());
    (line_start(src, start), line_end)
}

// ── Comments ──

/// Collect the comment group directly above a declaration. Comments that
/// trail code on the previous line do not belong to the group.
fn doc_comments(node: &Node, src: &str) -> Option<String> {
    let mut comments = Vec::new();
    let mut row = node.start_position().row;
    let mut sibling = node.prev_sibling();

    while let Some(prev) = sibling {
        if prev.kind() != "comment" || prev.end_position().row + 1 != row {
            break;
        }
        let trailing = prev.prev_sibling().is_some_and(|p| {
            p.kind() != "comment" && p.end_position().row == prev.start_position().row
        });
        if trailing {
            break;
        }
        comments.push(node_text(&prev, src));
        row = prev.start_position().row;
        sibling = prev.prev_sibling();
    }

    comments.reverse();
    comment_text(&comments)
}

/// Indices of the last run of comments on consecutive lines.
fn trailing_group(comments: &[Node]) -> Option<(usize, usize)> {
    let last = comments.len().checked_sub(1)?;
    let mut first = last;
    while first > 0 && comments[first - 1].end_position().row + 1 == comments[first].start_position().row {
        first -= 1;
    }
    Some((first, last))
}

/// Compiler directives such as `//go:build` or `//line` are not documentation.
fn is_directive(text: &str) -> bool {
    if ["line ", "extern ", "export "].iter().any(|p| text.starts_with(p)) {
        return true;
    }
    let Some(colon) = text.find(':') else {
        return false;
    };
    let (head, tail) = (&text[..colon], &text[colon + 1..]);
    !head.is_empty()
        && head.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && tail
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Text of a comment group: markers stripped, trailing whitespace removed,
/// leading and trailing blank lines dropped, inner blank runs collapsed.
pub(crate) fn comment_text(comments: &[&str]) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in comments {
        let body = if let Some(rest) = raw.strip_prefix("//") {
            if is_directive(rest) {
                continue;
            }
            rest.strip_prefix(' ').unwrap_or(rest)
        } else if let Some(rest) = raw.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            raw
        };
        lines.extend(body.lines().map(|l| l.trim_end().to_string()));
    }

    let mut out: Vec<String> = Vec::new();
    for line in lines {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    if out.is_empty() {
        None
    } else {
        Some(out.join("\n"))
    }
}

/// Remove the space and tab indentation shared by every non-blank line,
/// plus leading and trailing blank lines. Other whitespace is content.
pub(crate) fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let indent = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let body: Vec<&str> = lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { "" })
        .collect();
    let start = body.iter().position(|l| !l.is_empty()).unwrap_or(body.len());
    let end = body.iter().rposition(|l| !l.is_empty()).map(|i| i + 1).unwrap_or(start);
    body[start..end].join("\n")
}
