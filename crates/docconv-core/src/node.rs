/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document nodes as seen by converters.
//!
//! Nodes are produced by an external parser and are read-only here. A
//! converter never walks the tree itself: [`crate::DocumentConverter`]
//! converts children first and hands the parent a [`RenderNode`] carrying
//! the already-rendered `content`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of the parsed document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable name identifying the node kind (e.g. `paragraph`, `section`).
    pub node_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Literal text carried by leaf nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            id: None,
            title: None,
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute as a string.
    ///
    /// Numbers and booleans are rendered through their JSON form, so
    /// `level: 2` reads back as `"2"`.
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.attributes.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// A node paired with the rendered output of its children.
///
/// Serializes as the node's own fields plus `content`, which is what
/// templates see as `node`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderNode<'a> {
    #[serde(flatten)]
    pub node: &'a Node,

    /// Converted children, joined by newlines. Empty for leaf nodes.
    pub content: String,
}

impl<'a> RenderNode<'a> {
    pub fn new(node: &'a Node, content: impl Into<String>) -> Self {
        Self {
            node,
            content: content.into(),
        }
    }

    /// A node with no converted children, for converting one node in isolation.
    pub fn leaf(node: &'a Node) -> Self {
        Self::new(node, String::new())
    }

    pub fn node_name(&self) -> &str {
        &self.node.node_name
    }
}

impl std::ops::Deref for RenderNode<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}
