/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template converter: node conversion through user-supplied templates.
 */

//! Template converter.
//!
//! Converts a node by resolving a template for its kind, compiling it with
//! the configured [`TemplateEngine`], and rendering it against a context of
//! the form:
//!
//! ```text
//! { "node": { "node_name": ..., "attributes": ..., "content": ..., ... },
//!   "backend": "html5" }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::converter::NodeConverter;
use crate::engine::{CompiledTemplate, TemplateEngine};
use crate::error::{ConvertError, ConvertResult, EngineError, ResolveError};
use crate::node::RenderNode;
use crate::resolver::{ResolvedTemplate, TemplateResolver};

/// A resolved template together with the outcome of compiling it.
struct LoadedTemplate {
    template: Arc<ResolvedTemplate>,
    compiled: Result<Box<dyn CompiledTemplate>, EngineError>,
}

type TemplateCache = Mutex<HashMap<String, Option<Arc<LoadedTemplate>>>>;

/// Converter backed by template files.
pub struct TemplateConverter {
    backend: String,
    engine: Arc<dyn TemplateEngine>,
    resolver: TemplateResolver,
    cache: Option<TemplateCache>,
}

impl TemplateConverter {
    /// Create a template converter for `backend` over `template_dirs`.
    ///
    /// Relative directories resolve against `base_dir`.
    pub fn new(
        backend: impl Into<String>,
        template_dirs: &[std::path::PathBuf],
        base_dir: &Path,
        engine: Arc<dyn TemplateEngine>,
    ) -> Self {
        let backend = backend.into();
        let resolver = TemplateResolver::new(
            template_dirs,
            base_dir,
            engine.name(),
            backend.as_str(),
            engine.extension(),
        );
        Self {
            backend,
            engine,
            resolver,
            cache: None,
        }
    }

    /// Remember compiled templates per node kind, including misses and
    /// compile failures.
    ///
    /// Only sound while the template directories do not change.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(HashMap::new()));
        self
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Find the template for `node_name`.
    ///
    /// Without a cache this only reads the file; nothing is compiled.
    pub fn resolve_template(
        &self,
        node_name: &str,
    ) -> Result<Option<Arc<ResolvedTemplate>>, ResolveError> {
        if self.cache.is_none() {
            return Ok(self.resolver.resolve(node_name)?.map(Arc::new));
        }
        Ok(self
            .load(node_name)?
            .map(|loaded| Arc::clone(&loaded.template)))
    }

    fn load(&self, node_name: &str) -> Result<Option<Arc<LoadedTemplate>>, ResolveError> {
        let Some(cache) = &self.cache else {
            return Ok(self.resolver.resolve(node_name)?.map(|t| self.compile(t)));
        };

        // A poisoned cache only means another thread panicked mid-insert;
        // the map itself is still usable.
        let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = cache.get(node_name) {
            return Ok(hit.clone());
        }
        let loaded = self.resolver.resolve(node_name)?.map(|t| self.compile(t));
        cache.insert(node_name.to_string(), loaded.clone());
        Ok(loaded)
    }

    fn compile(&self, template: ResolvedTemplate) -> Arc<LoadedTemplate> {
        let compiled = self
            .engine
            .compile(&template.path.to_string_lossy(), &template.source);
        Arc::new(LoadedTemplate {
            template: Arc::new(template),
            compiled,
        })
    }
}

impl std::fmt::Debug for TemplateConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateConverter")
            .field("backend", &self.backend)
            .field("engine", &self.engine.name())
            .field("dirs", &self.resolver.dirs())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl NodeConverter for TemplateConverter {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn handles(&self, node_name: &str) -> bool {
        match self.resolve_template(node_name) {
            Ok(template) => template.is_some(),
            Err(e) => {
                // Claim the node so convert reports the error instead of
                // silently falling back to the built-in rendering.
                tracing::warn!(node = node_name, error = %e, "Template lookup failed");
                true
            }
        }
    }

    fn convert(&self, node: &RenderNode<'_>, transform: Option<&str>) -> ConvertResult<String> {
        self.try_convert(node, transform)?
            .ok_or_else(|| ConvertError::TemplateNotFound {
                node_name: transform.unwrap_or(node.node_name()).to_string(),
                backend: self.backend.clone(),
            })
    }

    fn try_convert(
        &self,
        node: &RenderNode<'_>,
        transform: Option<&str>,
    ) -> ConvertResult<Option<String>> {
        let node_name = transform.unwrap_or(node.node_name());
        let loaded = self
            .load(node_name)
            .map_err(|source| ConvertError::Resolve {
                node_name: node_name.to_string(),
                backend: self.backend.clone(),
                source,
            })?;
        let Some(loaded) = loaded else {
            return Ok(None);
        };
        let path = &loaded.template.path;

        let compiled = loaded
            .compiled
            .as_ref()
            .map_err(|e| ConvertError::TemplateCompile {
                node_name: node_name.to_string(),
                backend: self.backend.clone(),
                path: path.clone(),
                message: e.to_string(),
            })?;

        let render_error = |e: EngineError| ConvertError::Render {
            node_name: node_name.to_string(),
            backend: self.backend.clone(),
            path: path.clone(),
            message: e.to_string(),
        };
        let node_value = serde_json::to_value(node).map_err(|e| {
            render_error(EngineError::Render {
                message: e.to_string(),
            })
        })?;
        let context = json!({ "node": node_value, "backend": self.backend });

        compiled.render(&context).map(Some).map_err(render_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TeraEngine;
    use crate::node::Node;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn converter(dirs: &[PathBuf]) -> TemplateConverter {
        TemplateConverter::new("html5", dirs, Path::new("."), Arc::new(TeraEngine::new()))
    }

    #[test]
    fn test_handles_only_resolvable_nodes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), "<p>{{ node.content }}</p>").unwrap();
        let converter = converter(&[tmp.path().to_path_buf()]);

        assert!(converter.handles("paragraph"));
        assert!(!converter.handles("table"));
    }

    #[test]
    fn test_convert_renders_node_context() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("section.tera"),
            "<section id=\"{{ node.id }}\" data-backend=\"{{ backend }}\"><h2>{{ node.title }}</h2>\n{{ node.content }}</section>",
        )
        .unwrap();
        let node = Node::new("section").with_id("intro").with_title("Intro");

        let output = converter(&[tmp.path().to_path_buf()])
            .convert(&RenderNode::new(&node, "<p>Body</p>"), None)
            .unwrap();
        assert_eq!(
            output,
            "<section id=\"intro\" data-backend=\"html5\"><h2>Intro</h2>\n<p>Body</p></section>"
        );
    }

    #[test]
    fn test_transform_selects_template() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("sidebar.tera"), "aside:{{ node.node_name }}").unwrap();
        let node = Node::new("paragraph");

        let output = converter(&[tmp.path().to_path_buf()])
            .convert(&RenderNode::leaf(&node), Some("sidebar"))
            .unwrap();
        assert_eq!(output, "aside:paragraph");
    }

    #[test]
    fn test_template_not_found() {
        let node = Node::new("table");
        let result = converter(&[]).convert(&RenderNode::leaf(&node), None);

        match result {
            Err(ConvertError::TemplateNotFound { node_name, backend }) => {
                assert_eq!(node_name, "table");
                assert_eq!(backend, "html5");
            }
            other => panic!("Expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_error_names_node_and_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("paragraph.tera");
        fs::write(&path, "{% for x in %}").unwrap();
        let node = Node::new("paragraph");

        let result = converter(&[tmp.path().to_path_buf()]).convert(&RenderNode::leaf(&node), None);
        match result {
            Err(ConvertError::TemplateCompile {
                node_name,
                backend,
                path: error_path,
                ..
            }) => {
                assert_eq!(node_name, "paragraph");
                assert_eq!(backend, "html5");
                assert_eq!(error_path, path);
            }
            other => panic!("Expected TemplateCompile, got {:?}", other),
        }
    }

    #[test]
    fn test_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("image.tera"), "{{ node.attributes.target }}").unwrap();
        let node = Node::new("image");

        let result = converter(&[tmp.path().to_path_buf()]).convert(&RenderNode::leaf(&node), None);
        assert!(matches!(result, Err(ConvertError::Render { .. })));
    }

    #[test]
    fn test_without_cache_sees_new_templates() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = converter(&[tmp.path().to_path_buf()]);
        assert!(!converter.handles("paragraph"));

        fs::write(tmp.path().join("paragraph.tera"), "p").unwrap();
        assert!(converter.handles("paragraph"));
    }

    #[test]
    fn test_cache_remembers_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = converter(&[tmp.path().to_path_buf()]).with_cache();
        assert!(!converter.handles("paragraph"));

        fs::write(tmp.path().join("paragraph.tera"), "p").unwrap();
        assert!(!converter.handles("paragraph"));
    }

    #[test]
    fn test_cache_returns_same_template() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), "p").unwrap();
        let converter = converter(&[tmp.path().to_path_buf()]).with_cache();

        let first = converter.resolve_template("paragraph").unwrap().unwrap();
        let second = converter.resolve_template("paragraph").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    /// Engine that counts compilations and delegates to tera.
    struct CountingEngine {
        inner: TeraEngine,
        compiled: AtomicUsize,
    }

    impl TemplateEngine for CountingEngine {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn extension(&self) -> &str {
            self.inner.extension()
        }

        fn compile(
            &self,
            name: &str,
            source: &str,
        ) -> Result<Box<dyn CompiledTemplate>, EngineError> {
            self.compiled.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(name, source)
        }
    }

    fn counting_converter(dir: &Path) -> (TemplateConverter, Arc<CountingEngine>) {
        let engine = Arc::new(CountingEngine {
            inner: TeraEngine::new(),
            compiled: AtomicUsize::new(0),
        });
        let converter =
            TemplateConverter::new("html5", &[dir.to_path_buf()], Path::new("."), engine.clone());
        (converter, engine)
    }

    #[test]
    fn test_cache_compiles_each_template_once() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), "<p>{{ node.text }}</p>").unwrap();
        let (converter, engine) = counting_converter(tmp.path());
        let converter = converter.with_cache();

        for text in ["a", "b", "c"] {
            let node = Node::new("paragraph").with_text(text);
            let output = converter.convert(&RenderNode::leaf(&node), None).unwrap();
            assert_eq!(output, format!("<p>{}</p>", text));
        }
        assert_eq!(engine.compiled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_keeps_compile_failure() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), "{% if %}").unwrap();
        let (converter, engine) = counting_converter(tmp.path());
        let converter = converter.with_cache();

        let node = Node::new("paragraph");
        for _ in 0..2 {
            assert!(matches!(
                converter.convert(&RenderNode::leaf(&node), None),
                Err(ConvertError::TemplateCompile { .. })
            ));
        }
        assert_eq!(engine.compiled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_without_cache_compiles_per_conversion() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), "p").unwrap();
        let (converter, engine) = counting_converter(tmp.path());

        let node = Node::new("paragraph");
        converter.convert(&RenderNode::leaf(&node), None).unwrap();
        converter.convert(&RenderNode::leaf(&node), None).unwrap();
        assert!(converter.handles("paragraph"));
        // handles only reads the file
        assert_eq!(engine.compiled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_try_convert_declines_missing_template() {
        let tmp = tempfile::tempdir().unwrap();
        let (converter, engine) = counting_converter(tmp.path());

        let node = Node::new("table");
        assert!(
            converter
                .try_convert(&RenderNode::leaf(&node), None)
                .unwrap()
                .is_none()
        );
        assert_eq!(engine.compiled.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_read_error_names_node_and_backend() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("paragraph.tera"), [0xff, 0xfe, 0x00]).unwrap();
        let converter = converter(&[tmp.path().to_path_buf()]);

        // Unreadable templates are claimed rather than falling back
        assert!(converter.handles("paragraph"));
        let node = Node::new("paragraph");
        let err = converter
            .convert(&RenderNode::leaf(&node), None)
            .unwrap_err();
        match &err {
            ConvertError::Resolve {
                node_name, backend, ..
            } => {
                assert_eq!(node_name, "paragraph");
                assert_eq!(backend, "html5");
            }
            other => panic!("Expected Resolve, got {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("paragraph"), "{}", message);
        assert!(message.contains("html5"), "{}", message);
    }
}
