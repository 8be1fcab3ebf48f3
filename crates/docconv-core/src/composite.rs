/*
 * composite.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Composite converter: template overrides in front of a built-in converter.

use std::sync::Arc;

use crate::converter::NodeConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::node::RenderNode;

/// Tries the override converter first and falls back to the base converter.
///
/// Exactly one of the two converts any given node. The base may be absent
/// (a backend without a built-in converter), in which case nodes the
/// override does not handle fail with [`ConvertError::Configuration`].
#[derive(Clone)]
pub struct CompositeConverter {
    backend: String,
    overrides: Arc<dyn NodeConverter>,
    base: Option<Arc<dyn NodeConverter>>,
}

impl CompositeConverter {
    pub fn new(
        backend: impl Into<String>,
        overrides: Arc<dyn NodeConverter>,
        base: Option<Arc<dyn NodeConverter>>,
    ) -> Self {
        Self {
            backend: backend.into(),
            overrides,
            base,
        }
    }

    pub fn overrides(&self) -> &Arc<dyn NodeConverter> {
        &self.overrides
    }

    pub fn base(&self) -> Option<&Arc<dyn NodeConverter>> {
        self.base.as_ref()
    }
}

impl std::fmt::Debug for CompositeConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeConverter")
            .field("backend", &self.backend)
            .field("base", &self.base.as_ref().map(|b| b.backend().to_string()))
            .finish_non_exhaustive()
    }
}

impl NodeConverter for CompositeConverter {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn handles(&self, node_name: &str) -> bool {
        self.overrides.handles(node_name)
            || self.base.as_ref().is_some_and(|base| base.handles(node_name))
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        let node_name = transform.unwrap_or(node.node_name());

        if let Some(output) = self.overrides.try_convert(node, transform)? {
            tracing::debug!(node = node_name, "Converted with template override");
            return Ok(output);
        }

        match &self.base {
            Some(base) => base.convert(node, transform),
            None => Err(ConvertError::Configuration {
                backend: self.backend.clone(),
                node_name: node_name.to_string(),
            }),
        }
    }
}
