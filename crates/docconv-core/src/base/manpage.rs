/*
 * manpage.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in man page (troff) converter.

use std::fmt::Write;

use super::{body, is_known_node, section_level};
use crate::converter::NodeConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::node::RenderNode;

#[derive(Debug, Clone, Default)]
pub struct ManPageConverter;

impl ManPageConverter {
    pub fn new() -> Self {
        Self
    }

    fn document(node: &RenderNode<'_>) -> String {
        let title = node
            .title
            .as_deref()
            .map(|t| escape_troff(&t.to_uppercase()))
            .unwrap_or_default();
        let volnum = node.attr("manvolnum").unwrap_or_else(|| "1".to_string());
        let mut out = String::from("'\\\" t\n");
        let _ = write!(out, ".TH \"{}\" \"{}\"", title, escape_troff(&volnum));
        if let Some(date) = node.attr("date") {
            let _ = write!(out, " \"{}\"", escape_troff(&date));
        }
        out.push_str("\n.ie \\n(.g .ds Aq \\(aq\n.el       .ds Aq '\n.nh\n.ad l\n");
        out.push_str(&node.content);
        out
    }

    fn section(node: &RenderNode<'_>) -> String {
        let title = node.title.as_deref().unwrap_or_default();
        let heading = if section_level(node.attr("level")) == 1 {
            format!(".SH \"{}\"", escape_troff(&title.to_uppercase()))
        } else {
            format!(".SS \"{}\"", escape_troff(title))
        };
        format!("{}\n{}", heading, node.content)
    }

    fn verbatim(node: &RenderNode<'_>) -> String {
        let text = node
            .text
            .as_deref()
            .map(escape_troff_lines)
            .unwrap_or_default();
        format!(
            "{}.sp\n.if n .RS 4\n.nf\n.fam C\n{}\n.fam\n.fi\n.if n .RE",
            title_line(node),
            text
        )
    }

    fn list_item(node: &RenderNode<'_>) -> String {
        let marker = node
            .attr("marker")
            .map(|m| format!("\"{}\" 4", escape_troff(&m)))
            .unwrap_or_else(|| "\\(bu 2".to_string());
        let mut out = format!(".sp\n.RS 4\n.IP {}\n", marker);
        if let Some(text) = &node.text {
            let _ = writeln!(out, "{}", escape_troff_lines(text));
        }
        if !node.content.is_empty() {
            let _ = writeln!(out, "{}", node.content);
        }
        out.push_str(".RE");
        out
    }

    fn admonition(node: &RenderNode<'_>) -> String {
        let name = node.attr("name").unwrap_or_else(|| "note".to_string());
        format!(
            ".if n .sp\n.RS 4\n.B {}\n.br\n{}\n.RE",
            escape_troff(&name.to_uppercase()),
            body(node.text.as_deref(), &node.content, escape_troff_lines)
        )
    }

    fn table(node: &RenderNode<'_>) -> String {
        let cols = node
            .children
            .first()
            .map(|row| row.children.len())
            .unwrap_or(1)
            .max(1);
        let format = vec!["lt"; cols].join(" ");
        format!(
            "{}.TS\nallbox tab(|);\n{}.\n{}\n.TE\n.sp",
            title_line(node),
            format,
            node.content
        )
    }

    /// Joins cells into one tbl row: each cell is a `T{ ... T}` text block
    /// and a row must read `T}|T{` between cells.
    fn table_row(node: &RenderNode<'_>) -> String {
        node.content.replace("T}\nT{", "T}|T{")
    }

    fn table_cell(node: &RenderNode<'_>) -> String {
        format!(
            "T{{\n{}\nT}}",
            body(node.text.as_deref(), &node.content, escape_troff_lines)
        )
    }
}

impl NodeConverter for ManPageConverter {
    fn backend(&self) -> &str {
        "manpage"
    }

    fn handles(&self, node_name: &str) -> bool {
        is_known_node(node_name)
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        let node_name = transform.unwrap_or(node.node_name());
        let output = match node_name {
            "document" => Self::document(node),
            "preamble" => node.content.clone(),
            "section" => Self::section(node),
            "paragraph" => format!(
                "{}.sp\n{}",
                title_line(node),
                body(node.text.as_deref(), &node.content, escape_troff_lines)
            ),
            "listing" | "literal" => Self::verbatim(node),
            "admonition" => Self::admonition(node),
            "quote" => {
                let mut out = format!(
                    ".RS 3\n.ll -.6i\n{}\n.br\n.RE\n.ll",
                    body(node.text.as_deref(), &node.content, escape_troff_lines)
                );
                if let Some(attribution) = node.attr("attribution") {
                    let _ = write!(
                        out,
                        "\n.RS 5\n.ll -.10i\n\\(em {}\n.RE\n.ll",
                        escape_troff(&attribution)
                    );
                }
                out
            }
            "ulist" | "olist" => format!("{}{}", title_line(node), node.content),
            "list_item" => Self::list_item(node),
            "table" => Self::table(node),
            "table_row" => Self::table_row(node),
            "table_cell" => Self::table_cell(node),
            "image" => {
                let label = node
                    .attr("alt")
                    .or_else(|| node.attr("target"))
                    .unwrap_or_default();
                format!(".sp\n[{}]", escape_troff(&label))
            }
            "thematic_break" => ".sp\n.ce\n\\l'\\n(.lu*25u/100u\\(ap'".to_string(),
            "page_break" => ".bp".to_string(),
            "text" => body(node.text.as_deref(), &node.content, escape_troff_lines),
            _ => {
                return Err(ConvertError::UnsupportedNode {
                    backend: self.backend().to_string(),
                    node_name: node_name.to_string(),
                });
            }
        };
        Ok(output)
    }
}

/// Bold block title line, or nothing.
fn title_line(node: &RenderNode<'_>) -> String {
    match &node.title {
        Some(title) => format!(".sp\n.B {}\n.br\n", escape_troff(title)),
        None => String::new(),
    }
}

/// Escape troff special characters within a line.
fn escape_troff(s: &str) -> String {
    s.replace('\\', "\\(rs").replace('-', "\\-")
}

/// Escape text that may span lines: lines starting with a control
/// character are protected with a zero-width `\&`.
fn escape_troff_lines(s: &str) -> String {
    s.lines()
        .map(|line| {
            let escaped = escape_troff(line);
            if escaped.starts_with('.') || escaped.starts_with('\'') {
                format!("\\&{}", escaped)
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
