/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in converters.
//!
//! Each built-in backend renders a fixed set of node kinds:
//!
//! | node            | meaning                                   |
//! |-----------------|-------------------------------------------|
//! | `document`      | document root; `title` is the doc title   |
//! | `preamble`      | content before the first section          |
//! | `section`       | `level` attribute (default 1)             |
//! | `paragraph`     | `text` and/or converted children          |
//! | `listing`       | verbatim source; `language` attribute     |
//! | `literal`       | verbatim text                             |
//! | `admonition`    | `name` attribute (note, tip, warning, ..) |
//! | `quote`         | `attribution` attribute                   |
//! | `ulist`/`olist` | lists of `list_item`                      |
//! | `list_item`     | `text` and nested content                 |
//! | `table`         | rows of `table_row`                       |
//! | `table_row`     | cells of `table_cell`; `header` attribute |
//! | `table_cell`    | cell text and content                     |
//! | `image`         | `target` and `alt` attributes             |
//! | `thematic_break`, `page_break`, `text`                      |
//!
//! Nodes outside this set fail with [`crate::ConvertError::UnsupportedNode`].

mod docbook;
mod html5;
mod manpage;

use std::sync::Arc;

pub use docbook::{DocBookConverter, DocBookVersion};
pub use html5::Html5Converter;
pub use manpage::ManPageConverter;

use crate::backend::Backend;
use crate::converter::NodeConverter;

/// Node kinds every built-in converter handles.
pub const NODE_KINDS: &[&str] = &[
    "document",
    "preamble",
    "section",
    "paragraph",
    "listing",
    "literal",
    "admonition",
    "quote",
    "ulist",
    "olist",
    "list_item",
    "table",
    "table_row",
    "table_cell",
    "image",
    "thematic_break",
    "page_break",
    "text",
];

pub(crate) fn is_known_node(node_name: &str) -> bool {
    NODE_KINDS.contains(&node_name)
}

/// Constructor for the built-in converter of `backend`, if there is one.
pub fn builtin_constructor(backend: &Backend) -> Option<fn() -> Arc<dyn NodeConverter>> {
    let constructor: fn() -> Arc<dyn NodeConverter> = match backend {
        Backend::Html5 => html5,
        Backend::Docbook5 => docbook5,
        Backend::Docbook45 => docbook45,
        Backend::Manpage => manpage,
        Backend::Revealjs | Backend::Custom(_) => return None,
    };
    Some(constructor)
}

fn html5() -> Arc<dyn NodeConverter> {
    Arc::new(Html5Converter::new())
}

fn docbook5() -> Arc<dyn NodeConverter> {
    Arc::new(DocBookConverter::new(DocBookVersion::V5))
}

fn docbook45() -> Arc<dyn NodeConverter> {
    Arc::new(DocBookConverter::new(DocBookVersion::V45))
}

fn manpage() -> Arc<dyn NodeConverter> {
    Arc::new(ManPageConverter::new())
}

/// Escape text for HTML and XML output.
pub(crate) fn escape_markup(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escaped node text followed by the converted children.
pub(crate) fn body(text: Option<&str>, content: &str, escape: fn(&str) -> String) -> String {
    match (text.map(escape), content.is_empty()) {
        (Some(text), true) => text,
        (Some(text), false) => format!("{}\n{}", text, content),
        (None, _) => content.to_string(),
    }
}

/// Section level from the `level` attribute, clamped to 1..=5.
pub(crate) fn section_level(level: Option<String>) -> usize {
    level
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_body() {
        assert_eq!(body(Some("a<b"), "", escape_markup), "a&lt;b");
        assert_eq!(body(Some("a"), "<p>b</p>", escape_markup), "a\n<p>b</p>");
        assert_eq!(body(None, "<p>b</p>", escape_markup), "<p>b</p>");
    }

    #[test]
    fn test_section_level() {
        assert_eq!(section_level(None), 1);
        assert_eq!(section_level(Some("3".to_string())), 3);
        assert_eq!(section_level(Some("9".to_string())), 5);
        assert_eq!(section_level(Some("x".to_string())), 1);
    }

    #[test]
    fn test_builtin_backends_have_constructors() {
        for backend in &Backend::BUILTIN {
            let converter = builtin_constructor(backend).unwrap()();
            assert_eq!(converter.backend(), backend.as_str());
            assert!(converter.handles("paragraph"));
        }
        assert!(builtin_constructor(&Backend::Revealjs).is_none());
        assert!(builtin_constructor(&Backend::from("slides")).is_none());
    }
}
