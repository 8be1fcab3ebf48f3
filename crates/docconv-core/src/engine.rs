/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template engine seam.
//!
//! The template converter does not know any template syntax. It hands the
//! resolved source to a [`TemplateEngine`] and renders the result against a
//! JSON context. [`TeraEngine`] is the engine used by default.

use std::error::Error as _;
use std::sync::Arc;

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::EngineError;

/// A template syntax and its compiler.
pub trait TemplateEngine: Send + Sync {
    /// Engine name, also used as the optional nesting directory.
    fn name(&self) -> &str;

    /// File extension of templates for this engine (without leading dot).
    fn extension(&self) -> &str;

    /// Compile template source.
    ///
    /// `name` identifies the template in diagnostics.
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>, EngineError>;
}

/// A compiled template, ready to render any number of contexts.
pub trait CompiledTemplate: Send + Sync {
    fn render(&self, context: &Value) -> Result<String, EngineError>;
}

/// Template engine backed by [Tera](https://keats.github.io/tera/).
#[derive(Debug, Clone, Default)]
pub struct TeraEngine {
    autoescape: bool,
}

impl TeraEngine {
    pub const NAME: &'static str = "tera";

    pub fn new() -> Self {
        Self::default()
    }

    /// Escape HTML in every interpolated value unless marked `| safe`.
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }
}

impl TemplateEngine for TeraEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn extension(&self) -> &str {
        "tera"
    }

    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>, EngineError> {
        let mut tera = Tera::default();
        if self.autoescape {
            // Every name ends with the empty suffix
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
        tera.add_raw_template(name, source)
            .map_err(|e| EngineError::Compile {
                message: error_chain(&e),
            })?;

        Ok(Box::new(TeraTemplate {
            tera,
            name: name.to_string(),
        }))
    }
}

struct TeraTemplate {
    tera: Tera,
    name: String,
}

impl CompiledTemplate for TeraTemplate {
    fn render(&self, context: &Value) -> Result<String, EngineError> {
        let context = Context::from_value(context.clone()).map_err(|e| EngineError::Render {
            message: error_chain(&e),
        })?;
        self.tera
            .render(&self.name, &context)
            .map_err(|e| EngineError::Render {
                message: error_chain(&e),
            })
    }
}

/// Tera keeps the useful detail (line, column, missing variable) in the
/// source chain rather than the top-level message.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Look up an engine by name.
///
/// Returns `None` for names no engine is registered under.
pub fn engine_by_name(name: &str, autoescape: bool) -> Option<Arc<dyn TemplateEngine>> {
    match name {
        TeraEngine::NAME => Some(Arc::new(TeraEngine::new().with_autoescape(autoescape))),
        _ => None,
    }
}

/// Names accepted by [`engine_by_name`].
pub fn available_engines() -> &'static [&'static str] {
    &[TeraEngine::NAME]
}
