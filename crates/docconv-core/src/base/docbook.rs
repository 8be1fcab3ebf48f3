/*
 * docbook.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in DocBook converters (DocBook 5 and DocBook 4.5).
//!
//! The two versions share element names; they differ in the document
//! prologue, the document info element, and how ids are written.

use std::fmt::Write;

use super::{body, escape_markup, is_known_node};
use crate::converter::NodeConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::node::RenderNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocBookVersion {
    /// DocBook 5.0 (`docbook5`)
    V5,
    /// DocBook 4.5 (`docbook45`)
    V45,
}

#[derive(Debug, Clone)]
pub struct DocBookConverter {
    version: DocBookVersion,
}

impl DocBookConverter {
    pub fn new(version: DocBookVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> DocBookVersion {
        self.version
    }

    fn id_attr(&self, node: &RenderNode<'_>) -> String {
        let name = match self.version {
            DocBookVersion::V5 => "xml:id",
            DocBookVersion::V45 => "id",
        };
        match &node.id {
            Some(id) => format!(" {}=\"{}\"", name, escape_markup(id)),
            None => String::new(),
        }
    }

    fn title_element(node: &RenderNode<'_>) -> String {
        match &node.title {
            Some(title) => format!("<title>{}</title>\n", escape_markup(title)),
            None => String::new(),
        }
    }

    fn document(&self, node: &RenderNode<'_>) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let lang = node.attr("lang").unwrap_or_else(|| "en".to_string());
        let info = match self.version {
            DocBookVersion::V5 => {
                let _ = writeln!(
                    out,
                    "<article xmlns=\"http://docbook.org/ns/docbook\" xmlns:xl=\"http://www.w3.org/1999/xlink\" version=\"5.0\" xml:lang=\"{}\">",
                    escape_markup(&lang)
                );
                "info"
            }
            DocBookVersion::V45 => {
                out.push_str("<!DOCTYPE article PUBLIC \"-//OASIS//DTD DocBook XML V4.5//EN\" \"http://www.oasis-open.org/docbook/xml/4.5/docbookx.dtd\">\n");
                let _ = writeln!(out, "<article lang=\"{}\">", escape_markup(&lang));
                "articleinfo"
            }
        };
        if let Some(title) = &node.title {
            let _ = writeln!(
                out,
                "<{info}>\n<title>{}</title>\n</{info}>",
                escape_markup(title)
            );
        }
        let _ = write!(out, "{}\n</article>", node.content);
        out
    }

    fn paragraph(node: &RenderNode<'_>) -> String {
        let text = body(node.text.as_deref(), &node.content, escape_markup);
        match &node.title {
            Some(title) => format!(
                "<formalpara>\n<title>{}</title>\n<para>{}</para>\n</formalpara>",
                escape_markup(title),
                text
            ),
            None => format!("<simpara>{}</simpara>", text),
        }
    }

    fn listing(&self, node: &RenderNode<'_>) -> String {
        let text = node.text.as_deref().map(escape_markup).unwrap_or_default();
        let listing = match node.attr("language") {
            Some(lang) => format!(
                "<programlisting{} language=\"{}\" linenumbering=\"unnumbered\">{}</programlisting>",
                self.id_attr(node),
                escape_markup(&lang),
                text
            ),
            None => format!("<screen{}>{}</screen>", self.id_attr(node), text),
        };
        self.formal(node, listing)
    }

    /// Wrap `inner` in a `<formalpara>` when the node has a title.
    fn formal(&self, node: &RenderNode<'_>, inner: String) -> String {
        match &node.title {
            Some(title) => format!(
                "<formalpara>\n<title>{}</title>\n<para>\n{}\n</para>\n</formalpara>",
                escape_markup(title),
                inner
            ),
            None => inner,
        }
    }

    fn admonition(&self, node: &RenderNode<'_>) -> String {
        let name = node.attr("name").unwrap_or_else(|| "note".to_string());
        let tag = match name.as_str() {
            "tip" | "important" | "warning" | "caution" => name.as_str(),
            _ => "note",
        };
        let text = body(node.text.as_deref(), &node.content, escape_markup);
        let inner = if node.content.is_empty() {
            format!("<simpara>{}</simpara>", text)
        } else {
            text
        };
        format!(
            "<{tag}{id}>\n{title}{inner}\n</{tag}>",
            id = self.id_attr(node),
            title = Self::title_element(node),
        )
    }

    fn quote(&self, node: &RenderNode<'_>) -> String {
        let mut out = format!("<blockquote{}>\n", self.id_attr(node));
        out.push_str(&Self::title_element(node));
        if let Some(attribution) = node.attr("attribution") {
            let _ = writeln!(
                out,
                "<attribution>\n{}\n</attribution>",
                escape_markup(&attribution)
            );
        }
        let text = body(node.text.as_deref(), &node.content, escape_markup);
        if node.content.is_empty() {
            let _ = write!(out, "<simpara>{}</simpara>", text);
        } else {
            out.push_str(&text);
        }
        out.push_str("\n</blockquote>");
        out
    }

    fn list(&self, node: &RenderNode<'_>, ordered: bool) -> String {
        let open = if ordered {
            "orderedlist numeration=\"arabic\""
        } else {
            "itemizedlist"
        };
        let close = if ordered { "orderedlist" } else { "itemizedlist" };
        format!(
            "<{open}{id}>\n{title}{content}\n</{close}>",
            id = self.id_attr(node),
            title = Self::title_element(node),
            content = node.content,
        )
    }

    fn list_item(node: &RenderNode<'_>) -> String {
        let mut out = String::from("<listitem>\n");
        if let Some(text) = &node.text {
            let _ = writeln!(out, "<simpara>{}</simpara>", escape_markup(text));
        }
        if !node.content.is_empty() {
            let _ = writeln!(out, "{}", node.content);
        }
        out.push_str("</listitem>");
        out
    }

    fn table(&self, node: &RenderNode<'_>) -> String {
        let cols = node
            .attr("cols")
            .or_else(|| {
                node.children
                    .first()
                    .map(|row| row.children.len().max(1).to_string())
            })
            .unwrap_or_else(|| "1".to_string());
        let (open, close) = match &node.title {
            Some(_) => ("table", "table"),
            None => ("informaltable", "informaltable"),
        };
        format!(
            "<{open}{id} frame=\"all\" rowsep=\"1\" colsep=\"1\">\n{title}<tgroup cols=\"{cols}\">\n<tbody>\n{content}\n</tbody>\n</tgroup>\n</{close}>",
            id = self.id_attr(node),
            title = Self::title_element(node),
            cols = escape_markup(&cols),
            content = node.content,
        )
    }

    fn image(&self, node: &RenderNode<'_>) -> String {
        let target = node.attr("target").unwrap_or_default();
        let mut media = format!(
            "<mediaobject>\n<imageobject>\n<imagedata fileref=\"{}\"/>\n</imageobject>\n",
            escape_markup(&target)
        );
        if let Some(alt) = node.attr("alt") {
            let _ = writeln!(
                media,
                "<textobject><phrase>{}</phrase></textobject>",
                escape_markup(&alt)
            );
        }
        media.push_str("</mediaobject>");

        match &node.title {
            Some(title) => format!(
                "<figure{}>\n<title>{}</title>\n{}\n</figure>",
                self.id_attr(node),
                escape_markup(title),
                media
            ),
            None => format!(
                "<informalfigure{}>\n{}\n</informalfigure>",
                self.id_attr(node),
                media
            ),
        }
    }
}

impl NodeConverter for DocBookConverter {
    fn backend(&self) -> &str {
        match self.version {
            DocBookVersion::V5 => "docbook5",
            DocBookVersion::V45 => "docbook45",
        }
    }

    fn handles(&self, node_name: &str) -> bool {
        is_known_node(node_name)
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        let node_name = transform.unwrap_or(node.node_name());
        let output = match node_name {
            "document" => self.document(node),
            "preamble" => format!("<preface>\n<title></title>\n{}\n</preface>", node.content),
            "section" => format!(
                "<section{}>\n{}{}\n</section>",
                self.id_attr(node),
                Self::title_element(node),
                node.content
            ),
            "paragraph" => Self::paragraph(node),
            "listing" => self.listing(node),
            "literal" => {
                let text = node.text.as_deref().map(escape_markup).unwrap_or_default();
                let literal = format!(
                    "<literallayout{} class=\"monospaced\">{}</literallayout>",
                    self.id_attr(node),
                    text
                );
                self.formal(node, literal)
            }
            "admonition" => self.admonition(node),
            "quote" => self.quote(node),
            "ulist" => self.list(node, false),
            "olist" => self.list(node, true),
            "list_item" => Self::list_item(node),
            "table" => self.table(node),
            "table_row" => format!("<row>\n{}\n</row>", node.content),
            "table_cell" => format!(
                "<entry>{}</entry>",
                body(node.text.as_deref(), &node.content, escape_markup)
            ),
            "image" => self.image(node),
            "thematic_break" => "<simpara><?asciidoc-hr?></simpara>".to_string(),
            "page_break" => "<simpara><?asciidoc-pagebreak?></simpara>".to_string(),
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
