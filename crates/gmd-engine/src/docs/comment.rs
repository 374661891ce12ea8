use serde::Serialize;

use crate::config::Config;
use crate::parser::go_parser::dedent;

/// One structural element of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    Header { level: usize, text: String },
    Code { text: String },
    List { ordered: bool, items: Vec<String> },
}

/// The structured contents of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doc {
    level: usize,
    blocks: Vec<Block>,
}

impl Doc {
    /// Split comment text into blocks. Blank lines separate paragraphs,
    /// indented spans are code unless they start with a list marker, and a
    /// lone `# Title` line is a header at the config's level.
    pub fn new(cfg: &Config, text: &str) -> Self {
        Self {
            level: cfg.level(),
            blocks: parse_blocks(text, cfg.level()),
        }
    }

    /// The same doc with its content dropped.
    pub fn emptied(mut self) -> Self {
        self.blocks.clear();
        self
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Recognize `- item`, `* item`, `+ item`, `• item` and `1. item` / `1) item`.
fn list_marker(line: &str) -> Option<(bool, &str)> {
    for bullet in ["- ", "* ", "+ ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some((false, rest.trim()));
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(|item| (true, item.trim()))
}

fn parse_blocks(text: &str, level: usize) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) {
            i += 1;
            continue;
        }

        if is_indented(line) {
            if let Some((ordered, first)) = list_marker(line.trim_start()) {
                let mut items = vec![first.to_string()];
                i += 1;
                while i < lines.len() {
                    let next = lines[i];
                    if is_blank(next) {
                        let continues = lines
                            .get(i + 1)
                            .filter(|l| is_indented(l))
                            .and_then(|l| list_marker(l.trim_start()))
                            .is_some_and(|(o, _)| o == ordered);
                        if !continues {
                            break;
                        }
                    } else if !is_indented(next) {
                        break;
                    } else if let Some((_, item)) = list_marker(next.trim_start()) {
                        items.push(item.to_string());
                    } else if let Some(last) = items.last_mut() {
                        last.push(' ');
                        last.push_str(next.trim());
                    }
                    i += 1;
                }
                blocks.push(Block::List { ordered, items });
            } else {
                let start = i;
                let mut end = i;
                while i < lines.len() && (is_indented(lines[i]) || is_blank(lines[i])) {
                    if !is_blank(lines[i]) {
                        end = i + 1;
                    }
                    i += 1;
                }
                i = end;
                blocks.push(Block::Code {
                    text: dedent(&lines[start..end].join("\n")),
                });
            }
            continue;
        }

        let alone = (i == 0 || is_blank(lines[i - 1])) && lines.get(i + 1).map_or(true, |l| is_blank(l));
        if let Some(title) = line.strip_prefix("# ").filter(|_| alone) {
            blocks.push(Block::Header {
                level,
                text: title.trim().to_string(),
            });
            i += 1;
            continue;
        }

        let mut parts = Vec::new();
        while i < lines.len() && !is_blank(lines[i]) && !is_indented(lines[i]) {
            parts.push(lines[i].trim());
            i += 1;
        }
        blocks.push(Block::Paragraph {
            text: parts.join(" "),
        });
    }

    blocks
}

/// First sentence of the first paragraph of a comment, with whitespace
/// collapsed. Copyright and authorship notices have no summary.
pub fn summary(text: &str) -> String {
    let paragraph: Vec<&str> = text
        .lines()
        .skip_while(|l| is_blank(l))
        .take_while(|l| !is_blank(l))
        .collect();
    let collapsed = paragraph
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let lower = collapsed.to_lowercase();
    if ["copyright", "all rights", "author"]
        .iter()
        .any(|p| lower.starts_with(p))
    {
        return String::new();
    }

    first_sentence(&collapsed).to_string()
}

/// A sentence ends at a period followed by a space, unless the period
/// follows a lone capital letter (an initial such as "J. Smith").
fn first_sentence(s: &str) -> &str {
    let (mut ppp, mut pp, mut p) = (' ', ' ', ' ');
    for (i, q) in s.char_indices() {
        if q == ' ' && p == '.' && (!pp.is_ascii_uppercase() || ppp.is_ascii_uppercase()) {
            return &s[..i];
        }
        if p == '。' || p == '．' {
            return &s[..i];
        }
        (ppp, pp, p) = (pp, p, q);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::new("/work", "/work/pkg").with_level(3)
    }

    #[test]
    fn test_paragraphs_and_code() {
        let doc = Doc::new(
            &cfg(),
            "Package widget builds widgets.\nIt is fast.\n\n\tw := widget.New()\n\tw.Run()\n\nThe end.",
        );
        assert_eq!(
            doc.blocks(),
            &[
                Block::Paragraph {
                    text: "Package widget builds widgets. It is fast.".into()
                },
                Block::Code {
                    text: "w := widget.New()\nw.Run()".into()
                },
                Block::Paragraph {
                    text: "The end.".into()
                },
            ]
        );
    }

    #[test]
    fn test_header_uses_config_level() {
        let doc = Doc::new(&cfg(), "Intro.\n\n# Usage\n\nCall it.");
        assert_eq!(
            doc.blocks()[1],
            Block::Header {
                level: 3,
                text: "Usage".into()
            }
        );
    }

    #[test]
    fn test_hash_inside_paragraph_is_text() {
        let doc = Doc::new(&cfg(), "Intro\n# not a header");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn test_lists() {
        let doc = Doc::new(&cfg(), "Steps:\n\n  1. first\n  2. second\n     continued\n\n  - loose");
        assert_eq!(
            doc.blocks()[1],
            Block::List {
                ordered: true,
                items: vec!["first".into(), "second continued".into()]
            }
        );
        assert_eq!(
            doc.blocks()[2],
            Block::List {
                ordered: false,
                items: vec!["loose".into()]
            }
        );
    }

    #[test]
    fn test_emptied_keeps_level() {
        let doc = Doc::new(&cfg(), "Something.").emptied();
        assert!(doc.is_empty());
        assert_eq!(doc.level(), 3);
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary("Package x does things. More here."), "Package x does things.");
        assert_eq!(summary("Written by J. Smith. Really."), "Written by J. Smith.");
        assert_eq!(summary("First line\ncontinues. Second."), "First line continues.");
        assert_eq!(summary("No period"), "No period");
        assert_eq!(summary("Copyright 2024 Acme. All rights reserved."), "");
        assert_eq!(summary(""), "");
    }
}
