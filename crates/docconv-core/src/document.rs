/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Whole-document conversion.
//!
//! Walks a node tree depth-first and converts every node with one converter
//! graph. Children are converted before their parent; their output, joined
//! by newlines, becomes the parent's `content`. The first failure aborts
//! the document.

use std::sync::Arc;

use crate::converter::NodeConverter;
use crate::error::ConvertResult;
use crate::node::{Node, RenderNode};

/// Converts node trees with a fixed converter graph.
#[derive(Clone)]
pub struct DocumentConverter {
    converter: Arc<dyn NodeConverter>,
}

impl DocumentConverter {
    pub fn new(converter: Arc<dyn NodeConverter>) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &Arc<dyn NodeConverter> {
        &self.converter
    }

    pub fn backend(&self) -> &str {
        self.converter.backend()
    }

    /// Convert `root` and everything below it.
    pub fn convert(&self, root: &Node) -> ConvertResult<String> {
        let content = root
            .children
            .iter()
            .map(|child| self.convert(child))
            .collect::<ConvertResult<Vec<_>>>()?
            .join("\n");

        let output = self.converter.convert(&RenderNode::new(root, content), None);
        if let Err(e) = &output {
            tracing::debug!(
                node = %root.node_name,
                backend = self.converter.backend(),
                error = %e,
                "Node conversion failed"
            );
        }
        output
    }
}

impl std::fmt::Debug for DocumentConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentConverter")
            .field("backend", &self.converter.backend())
            .finish()
    }
}
