/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for docconv-core

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while searching template directories.
///
/// A missing template is not an error; only reads that fail for some other
/// reason end up here.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error reported by a template engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine rejected the template source.
    #[error("{message}")]
    Compile { message: String },

    /// The compiled template failed while rendering a context.
    #[error("{message}")]
    Render { message: String },
}

/// Error raised while converting a single node.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Could not find a custom template to handle transform: {node_name} (backend: {backend})")]
    TemplateNotFound { node_name: String, backend: String },

    #[error(
        "Failed to compile template for {node_name} (backend: {backend}, {}): {message}",
        path.display()
    )]
    TemplateCompile {
        node_name: String,
        backend: String,
        path: PathBuf,
        message: String,
    },

    #[error(
        "Failed to render template for {node_name} (backend: {backend}, {}): {message}",
        path.display()
    )]
    Render {
        node_name: String,
        backend: String,
        path: PathBuf,
        message: String,
    },

    #[error("No converter available for backend '{backend}' to handle {node_name}")]
    Configuration { backend: String, node_name: String },

    #[error("The {backend} converter does not support node '{node_name}'")]
    UnsupportedNode { backend: String, node_name: String },

    #[error("Failed to look up template for {node_name} (backend: {backend}): {source}")]
    Resolve {
        node_name: String,
        backend: String,
        #[source]
        source: ResolveError,
    },
}

/// Error raised by [`crate::ConverterFactory::create`].
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Unknown template engine '{name}' (available: {available})")]
    UnknownEngine { name: String, available: String },
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
