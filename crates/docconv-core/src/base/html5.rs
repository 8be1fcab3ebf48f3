/*
 * html5.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in HTML5 converter.

use std::fmt::Write;

use super::{body, escape_markup, is_known_node, section_level};
use crate::converter::NodeConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::node::RenderNode;

#[derive(Debug, Clone, Default)]
pub struct Html5Converter;

impl Html5Converter {
    pub fn new() -> Self {
        Self
    }

    fn id_attr(node: &RenderNode<'_>) -> String {
        match &node.id {
            Some(id) => format!(" id=\"{}\"", escape_markup(id)),
            None => String::new(),
        }
    }

    fn title_div(node: &RenderNode<'_>) -> String {
        match &node.title {
            Some(title) => format!("<div class=\"title\">{}</div>\n", escape_markup(title)),
            None => String::new(),
        }
    }

    fn document(node: &RenderNode<'_>) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        if let Some(title) = &node.title {
            let _ = writeln!(out, "<title>{}</title>", escape_markup(title));
        }
        out.push_str("</head>\n<body>\n");
        if let Some(title) = &node.title {
            let _ = writeln!(out, "<h1>{}</h1>", escape_markup(title));
        }
        let _ = write!(out, "{}\n</body>\n</html>", node.content);
        out
    }

    fn section(node: &RenderNode<'_>) -> String {
        let level = section_level(node.attr("level"));
        let title = node.title.as_deref().map(escape_markup).unwrap_or_default();
        format!(
            "<div class=\"sect{level}\">\n<h{h}{id}>{title}</h{h}>\n{content}\n</div>",
            h = level + 1,
            id = Self::id_attr(node),
            content = node.content,
        )
    }

    fn verbatim(node: &RenderNode<'_>, block_class: &str) -> String {
        let text = node.text.as_deref().map(escape_markup).unwrap_or_default();
        let pre = match node.attr("language") {
            Some(lang) => {
                let lang = escape_markup(&lang);
                format!(
                    "<pre class=\"highlight\"><code class=\"language-{lang}\" data-lang=\"{lang}\">{text}</code></pre>"
                )
            }
            None => format!("<pre>{}</pre>", text),
        };
        format!(
            "<div{id} class=\"{block_class}\">\n{title}<div class=\"content\">\n{pre}\n</div>\n</div>",
            id = Self::id_attr(node),
            title = Self::title_div(node),
        )
    }

    fn admonition(node: &RenderNode<'_>) -> String {
        let name = node.attr("name").unwrap_or_else(|| "note".to_string());
        let label = capitalize(&name);
        format!(
            "<div{id} class=\"admonitionblock {name}\">\n<table>\n<tr>\n<td class=\"icon\">\n<div class=\"title\">{label}</div>\n</td>\n<td class=\"content\">\n{title}{body}\n</td>\n</tr>\n</table>\n</div>",
            id = Self::id_attr(node),
            name = escape_markup(&name),
            label = escape_markup(&label),
            title = Self::title_div(node),
            body = body(node.text.as_deref(), &node.content, escape_markup),
        )
    }

    fn quote(node: &RenderNode<'_>) -> String {
        let mut out = format!(
            "<div{} class=\"quoteblock\">\n{}<blockquote>\n{}\n</blockquote>",
            Self::id_attr(node),
            Self::title_div(node),
            body(node.text.as_deref(), &node.content, escape_markup),
        );
        if let Some(attribution) = node.attr("attribution") {
            let _ = write!(
                out,
                "\n<div class=\"attribution\">\n&#8212; {}\n</div>",
                escape_markup(&attribution)
            );
        }
        out.push_str("\n</div>");
        out
    }

    fn list(node: &RenderNode<'_>, tag: &str) -> String {
        let class = if tag == "ol" { "olist arabic" } else { "ulist" };
        let list_class = if tag == "ol" { " class=\"arabic\"" } else { "" };
        format!(
            "<div{id} class=\"{class}\">\n{title}<{tag}{list_class}>\n{content}\n</{tag}>\n</div>",
            id = Self::id_attr(node),
            title = Self::title_div(node),
            content = node.content,
        )
    }

    fn list_item(node: &RenderNode<'_>) -> String {
        let mut out = String::from("<li>\n");
        if let Some(text) = &node.text {
            let _ = writeln!(out, "<p>{}</p>", escape_markup(text));
        }
        if !node.content.is_empty() {
            let _ = writeln!(out, "{}", node.content);
        }
        out.push_str("</li>");
        out
    }

    fn table(node: &RenderNode<'_>) -> String {
        let caption = match &node.title {
            Some(title) => format!(
                "<caption class=\"title\">{}</caption>\n",
                escape_markup(title)
            ),
            None => String::new(),
        };
        format!(
            "<table{id} class=\"tableblock frame-all grid-all stretch\">\n{caption}<tbody>\n{content}\n</tbody>\n</table>",
            id = Self::id_attr(node),
            content = node.content,
        )
    }

    fn table_cell(node: &RenderNode<'_>) -> String {
        let tag = if is_true(node, "header") { "th" } else { "td" };
        format!(
            "<{tag} class=\"tableblock halign-left valign-top\">{}</{tag}>",
            body(node.text.as_deref(), &node.content, escape_markup)
        )
    }

    fn image(node: &RenderNode<'_>) -> String {
        let target = node.attr("target").unwrap_or_default();
        let alt = node.attr("alt").unwrap_or_else(|| default_alt(&target));
        format!(
            "<div{id} class=\"imageblock\">\n<div class=\"content\">\n<img src=\"{src}\" alt=\"{alt}\">\n</div>\n{title}</div>",
            id = Self::id_attr(node),
            src = escape_markup(&target),
            alt = escape_markup(&alt),
            title = Self::title_div(node),
        )
    }
}

impl NodeConverter for Html5Converter {
    fn backend(&self) -> &str {
        "html5"
    }

    fn handles(&self, node_name: &str) -> bool {
        is_known_node(node_name)
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        let node_name = transform.unwrap_or(node.node_name());
        let output = match node_name {
            "document" => Self::document(node),
            "preamble" => format!(
                "<div id=\"preamble\">\n<div class=\"sectionbody\">\n{}\n</div>\n</div>",
                node.content
            ),
            "section" => Self::section(node),
            "paragraph" => format!(
                "<div{} class=\"paragraph\">\n{}<p>{}</p>\n</div>",
                Self::id_attr(node),
                Self::title_div(node),
                body(node.text.as_deref(), &node.content, escape_markup)
            ),
            "listing" => Self::verbatim(node, "listingblock"),
            "literal" => Self::verbatim(node, "literalblock"),
            "admonition" => Self::admonition(node),
            "quote" => Self::quote(node),
            "ulist" => Self::list(node, "ul"),
            "olist" => Self::list(node, "ol"),
            "list_item" => Self::list_item(node),
            "table" => Self::table(node),
            "table_row" => format!("<tr>\n{}\n</tr>", node.content),
            "table_cell" => Self::table_cell(node),
            "image" => Self::image(node),
            "thematic_break" => "<hr>".to_string(),
            "page_break" => "<div style=\"page-break-after: always;\"></div>".to_string(),
            "text" => body(node.text.as_deref(), &node.content, escape_markup),
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

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_true(node: &RenderNode<'_>, name: &str) -> bool {
    matches!(node.attr(name).as_deref(), Some("true") | Some(""))
}

/// Alt text derived from an image target: file stem with separators as spaces.
fn default_alt(target: &str) -> String {
    std::path::Path::new(target)
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use pretty_assertions::assert_eq;

    fn convert(node: &Node, content: &str) -> String {
        Html5Converter::new()
            .convert(&RenderNode::new(node, content), None)
            .unwrap()
    }

    #[test]
    fn test_paragraph_escapes_text() {
        let node = Node::new("paragraph").with_text("Fish & chips");
        assert_eq!(
            convert(&node, ""),
            "<div class=\"paragraph\">\n<p>Fish &amp; chips</p>\n</div>"
        );
    }

    #[test]
    fn test_section_heading_level() {
        let node = Node::new("section")
            .with_id("_usage")
            .with_title("Usage")
            .with_attribute("level", 2);
        assert_eq!(
            convert(&node, "<p>x</p>"),
            "<div class=\"sect2\">\n<h3 id=\"_usage\">Usage</h3>\n<p>x</p>\n</div>"
        );
    }

    #[test]
    fn test_listing_with_language() {
        let node = Node::new("listing")
            .with_text("fn main() {}")
            .with_attribute("language", "rust");
        assert_eq!(
            convert(&node, ""),
            "<div class=\"listingblock\">\n<div class=\"content\">\n<pre class=\"highlight\"><code class=\"language-rust\" data-lang=\"rust\">fn main() {}</code></pre>\n</div>\n</div>"
        );
    }

    #[test]
    fn test_table() {
        let node = Node::new("table");
        let output = convert(&node, "<tr>\n<td class=\"tableblock halign-left valign-top\">a</td>\n</tr>");
        assert!(output.starts_with("<table class=\"tableblock"));
        assert!(output.contains("<tbody>\n<tr>"));
    }

    #[test]
    fn test_header_cell() {
        let node = Node::new("table_cell")
            .with_text("Name")
            .with_attribute("header", true);
        assert_eq!(
            convert(&node, ""),
            "<th class=\"tableblock halign-left valign-top\">Name</th>"
        );
    }

    #[test]
    fn test_image_default_alt() {
        let node = Node::new("image").with_attribute("target", "images/sunset-beach.png");
        assert!(convert(&node, "").contains("alt=\"sunset beach\""));
    }

    #[test]
    fn test_admonition_label() {
        let node = Node::new("admonition")
            .with_attribute("name", "warning")
            .with_text("Hot");
        let output = convert(&node, "");
        assert!(output.contains("class=\"admonitionblock warning\""));
        assert!(output.contains("<div class=\"title\">Warning</div>"));
    }

    #[test]
    fn test_unknown_node() {
        let node = Node::new("sidebar");
        let result = Html5Converter::new().convert(&RenderNode::leaf(&node), None);
        assert!(matches!(
            result,
            Err(ConvertError::UnsupportedNode { ref node_name, .. }) if node_name == "sidebar"
        ));
    }
}
