/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node converter pipeline for docconv.
//!
//! Converts a parsed document tree into output markup, one node at a time.
//! For each backend the [`ConverterFactory`] builds a converter graph:
//!
//! - a built-in converter ([`Html5Converter`], [`DocBookConverter`],
//!   [`ManPageConverter`]) when no template directories are configured;
//! - a [`CompositeConverter`] that tries a [`TemplateConverter`] first and
//!   falls back to the built-in when template directories are configured;
//! - or a converter the caller registered for the backend.
//!
//! Templates are plain files named after node kinds, looked up by the
//! [`TemplateResolver`] under `<dir>/[<engine>/][<backend>/]<node>.<ext>`.
//!
//! # Example
//!
//! ```ignore
//! use docconv_core::{ConverterFactory, ConverterOptions, DocumentConverter, Node};
//!
//! let factory = ConverterFactory::default();
//! let converter = factory.create(
//!     "html5",
//!     ConverterOptions::new().with_template_dirs("./templates"),
//! )?;
//!
//! let doc = Node::new("document")
//!     .with_title("Hello")
//!     .with_child(Node::new("paragraph").with_text("World"));
//! let html = DocumentConverter::new(converter).convert(&doc)?;
//! ```

pub mod backend;
pub mod base;
pub mod composite;
pub mod converter;
pub mod document;
pub mod engine;
pub mod environment;
pub mod error;
pub mod factory;
pub mod node;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod template;

// Re-export commonly used types
pub use backend::Backend;
pub use base::{DocBookConverter, DocBookVersion, Html5Converter, ManPageConverter};
pub use composite::CompositeConverter;
pub use converter::{NodeConverter, UnsupportedBackend};
pub use document::DocumentConverter;
pub use engine::{CompiledTemplate, TemplateEngine, TeraEngine};
pub use environment::{HostEnvironment, HostPlatform, resolve_environment_defaults};
pub use error::{ConvertError, ConvertResult, EngineError, FactoryError, ResolveError};
pub use factory::ConverterFactory;
pub use node::{Node, RenderNode};
pub use options::{ConverterOptions, TemplateDirs};
pub use registry::{ConverterRegistry, Registration};
pub use resolver::{ResolvedTemplate, TemplateResolver};
pub use template::TemplateConverter;
