/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template resolution.
//!
//! Finds the template file for a node kind in an ordered list of template
//! directories. Each directory may nest templates by engine and by backend:
//!
//! ```text
//! <dir>/<engine>/<backend>/<node>.<ext>
//! <dir>/<engine>/<node>.<ext>
//! <dir>/<backend>/<node>.<ext>
//! <dir>/<node>.<ext>
//! ```
//!
//! Directories are searched in order and the first one with a match wins.
//! Within a directory the more deeply nested location is tried first.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;

/// A template file found for a node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub node_name: String,
    pub path: PathBuf,
    pub source: String,
}

/// Searches template directories for node templates.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    dirs: Vec<PathBuf>,
    engine: String,
    backend: String,
    extension: String,
}

impl TemplateResolver {
    /// Create a resolver.
    ///
    /// Relative `dirs` are resolved against `base_dir`. The directory list is
    /// fixed for the resolver's lifetime.
    pub fn new(
        dirs: &[PathBuf],
        base_dir: &Path,
        engine: impl Into<String>,
        backend: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let dirs = dirs
            .iter()
            .map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    base_dir.join(dir)
                }
            })
            .collect();

        Self {
            dirs,
            engine: engine.into(),
            backend: backend.into(),
            extension: extension.into(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Directories to probe inside one template directory, most specific first.
    ///
    /// Only nesting levels that exist on disk are included. A template
    /// directory that is missing yields nothing.
    fn search_dirs(&self, template_dir: &Path) -> Vec<PathBuf> {
        if !template_dir.is_dir() {
            return Vec::new();
        }

        let engine_dir = template_dir.join(&self.engine);
        let has_engine_dir = !self.engine.is_empty() && engine_dir.is_dir();

        let mut dirs = Vec::with_capacity(4);
        if has_engine_dir {
            let engine_backend_dir = engine_dir.join(&self.backend);
            if engine_backend_dir.is_dir() {
                dirs.push(engine_backend_dir);
            }
        }
        if has_engine_dir {
            dirs.push(engine_dir);
        }
        let backend_dir = template_dir.join(&self.backend);
        if backend_dir.is_dir() {
            dirs.push(backend_dir);
        }
        dirs.push(template_dir.to_path_buf());
        dirs
    }

    fn file_name(&self, node_name: &str) -> String {
        if self.extension.is_empty() {
            node_name.to_string()
        } else {
            format!("{}.{}", node_name, self.extension)
        }
    }

    /// Every path that [`resolve`](Self::resolve) would try for `node_name`,
    /// in the order it would try them.
    ///
    /// A node name that is not a single plain path component (`a/b`, `..`)
    /// has no candidates.
    pub fn candidates(&self, node_name: &str) -> Vec<PathBuf> {
        if !is_plain_name(node_name) {
            tracing::debug!(node = node_name, "Node name is not a valid template name");
            return Vec::new();
        }
        let file_name = self.file_name(node_name);
        self.dirs
            .iter()
            .flat_map(|dir| self.search_dirs(dir))
            .map(|dir| dir.join(&file_name))
            .collect()
    }

    /// Find the template for `node_name`.
    ///
    /// Returns `Ok(None)` when no directory has one. Read failures other
    /// than a missing file are returned as errors.
    pub fn resolve(&self, node_name: &str) -> Result<Option<ResolvedTemplate>, ResolveError> {
        for path in self.candidates(node_name) {
            if path.is_dir() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(source) => {
                    tracing::debug!(node = node_name, path = %path.display(), "Resolved template");
                    return Ok(Some(ResolvedTemplate {
                        node_name: node_name.to_string(),
                        path,
                        source,
                    }));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ResolveError::Read { path, source }),
            }
        }

        tracing::debug!(node = node_name, backend = %self.backend, "No template found");
        Ok(None)
    }
}

fn is_plain_name(node_name: &str) -> bool {
    if node_name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(node_name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
