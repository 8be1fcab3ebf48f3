/*
 * converter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The converter capability.
//!
//! Every converter in a graph (built-in, template, composite, or one a
//! caller registers) implements [`NodeConverter`].

use crate::error::{ConvertError, ConvertResult};
use crate::node::RenderNode;

/// Converts document nodes into output markup for one backend.
pub trait NodeConverter: Send + Sync {
    /// Backend this converter produces output for.
    fn backend(&self) -> &str;

    /// Whether this converter can convert nodes named `node_name`.
    fn handles(&self, node_name: &str) -> bool;

    /// Convert `node`.
    ///
    /// `transform` replaces the node's own name when choosing how to
    /// convert it.
    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String>;

    /// Convert `node` if this converter handles it, `Ok(None)` otherwise.
    ///
    /// Converters that find out whether they handle a node by doing the
    /// work (such as template lookup) override this to decide and convert
    /// in one step.
    fn try_convert(
        &self,
        node: &RenderNode<'_>,
        transform: Option<&str>,
    ) -> ConvertResult<Option<String>> {
        if self.handles(transform.unwrap_or(node.node_name())) {
            self.convert(node, transform).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Stand-in for a backend that has no converter.
///
/// Construction never fails; every conversion does.
#[derive(Debug, Clone)]
pub struct UnsupportedBackend {
    backend: String,
}

impl UnsupportedBackend {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }
}

impl NodeConverter for UnsupportedBackend {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn handles(&self, _node_name: &str) -> bool {
        false
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        Err(ConvertError::Configuration {
            backend: self.backend.clone(),
            node_name: transform.unwrap_or(node.node_name()).to_string(),
        })
    }
}
