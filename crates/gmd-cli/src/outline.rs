use std::fmt::Write;

use colored::Colorize;
use gmd_engine::filter::Located;
use gmd_engine::{Example, Func, Package, Type, Value};

/// Plain-text outline of a package: one line per symbol, indented by
/// heading level.
pub fn render(pkg: &Package) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "package".bold(), pkg.name().bold());
    let _ = writeln!(out, "{}", pkg.import());
    let summary = pkg.summary();
    if !summary.is_empty() {
        let _ = writeln!(out, "\n{summary}");
    }

    section(&mut out, "Constants", pkg.consts().iter().map(value_line));
    section(&mut out, "Variables", pkg.vars().iter().map(value_line));
    section(&mut out, "Functions", pkg.funcs().iter().flat_map(func_lines));
    section(&mut out, "Types", pkg.types().iter().flat_map(type_lines));
    section(&mut out, "Examples", pkg.examples().iter().map(example_line));
    out
}

fn section(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title.underline());
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level.saturating_sub(2))
}

fn at(loc: &impl Located) -> String {
    let loc = loc.location();
    format!("{}:{}", loc.relative_path(), loc.start.line)
        .dimmed()
        .to_string()
}

fn value_line(value: &Value<'_>) -> String {
    format!(
        "{}{} {}  {}",
        indent(value.level()),
        value.kind(),
        value.names().join(", "),
        at(value)
    )
}

fn func_lines(func: &Func<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{}  {}",
        indent(func.level()),
        func.title(),
        at(func)
    )];
    lines.extend(func.examples().iter().map(example_line));
    lines
}

fn type_lines(ty: &Type<'_>) -> Vec<String> {
    let mut lines = vec![format!("{}{}  {}", indent(ty.level()), ty.title(), at(ty))];
    lines.extend(ty.consts().iter().map(value_line));
    lines.extend(ty.vars().iter().map(value_line));
    lines.extend(ty.funcs().iter().flat_map(func_lines));
    lines.extend(ty.methods().iter().flat_map(func_lines));
    lines.extend(ty.examples().iter().map(example_line));
    lines
}

fn example_line(ex: &Example<'_>) -> String {
    format!("{}{}  {}", indent(ex.level()), ex.title(), at(ex))
}
