/*
 * factory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Converter graph construction.
 */

//! Converter factory.
//!
//! [`ConverterFactory::create`] builds the converter graph for a backend:
//!
//! 1. a converter registered for the backend, if any;
//! 2. otherwise the built-in converter for the backend (built on first use);
//! 3. when template directories are configured, a [`CompositeConverter`]
//!    putting a [`TemplateConverter`] in front of the built-in.
//!
//! The graph is meant to be built once and reused for every node.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::backend::Backend;
use crate::base::builtin_constructor;
use crate::composite::CompositeConverter;
use crate::converter::{NodeConverter, UnsupportedBackend};
use crate::engine::{available_engines, engine_by_name};
use crate::environment::{HostEnvironment, resolve_environment_defaults};
use crate::error::FactoryError;
use crate::options::ConverterOptions;
use crate::registry::ConverterRegistry;
use crate::template::TemplateConverter;

/// Builds converter graphs.
pub struct ConverterFactory {
    registry: ConverterRegistry,
    environment: HostEnvironment,
    builtins: HashMap<Backend, OnceCell<Arc<dyn NodeConverter>>>,
}

impl std::fmt::Debug for ConverterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let constructed: Vec<&str> = self
            .builtins
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(backend, _)| backend.as_str())
            .collect();
        f.debug_struct("ConverterFactory")
            .field("registry", &self.registry)
            .field("environment", &self.environment)
            .field("constructed", &constructed)
            .finish()
    }
}

impl Default for ConverterFactory {
    fn default() -> Self {
        Self::new(HostEnvironment::default())
    }
}

impl ConverterFactory {
    pub fn new(environment: HostEnvironment) -> Self {
        let builtins = Backend::BUILTIN
            .into_iter()
            .map(|backend| (backend, OnceCell::new()))
            .collect();
        Self {
            registry: ConverterRegistry::new(),
            environment,
            builtins,
        }
    }

    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.registry
    }

    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    /// The built-in converter for `backend`, constructed on first request.
    pub fn builtin(&self, backend: &Backend) -> Option<Arc<dyn NodeConverter>> {
        let cell = self.builtins.get(backend)?;
        let constructor = builtin_constructor(backend)?;
        Some(Arc::clone(cell.get_or_init(|| {
            tracing::debug!(backend = %backend, "Constructing built-in converter");
            constructor()
        })))
    }

    /// Build the converter graph for `backend`.
    ///
    /// Never validates node coverage: a backend without a built-in converter
    /// still yields a converter, which fails at conversion time for nodes
    /// no template handles.
    pub fn create(
        &self,
        backend: &str,
        options: ConverterOptions,
    ) -> Result<Arc<dyn NodeConverter>, FactoryError> {
        if let Some(registration) = self.registry.get(backend) {
            tracing::debug!(backend, "Using registered converter");
            return Ok(registration.instantiate(backend, &options));
        }

        // Aliases such as "html" resolve and nest under the canonical name
        let backend_id = Backend::from(backend);
        let backend = backend_id.as_str();
        let base = self.builtin(&backend_id);

        let options = resolve_environment_defaults(&backend_id, options, &self.environment);

        let Some(template_dirs) = options.template_dirs.as_ref() else {
            if let Some(base) = base {
                return Ok(base);
            }
            let unsupported: Arc<dyn NodeConverter> = Arc::new(UnsupportedBackend::new(backend));
            return Ok(unsupported);
        };

        let engine = engine_by_name(&options.template_engine, options.autoescape).ok_or_else(|| {
            FactoryError::UnknownEngine {
                name: options.template_engine.clone(),
                available: available_engines().join(", "),
            }
        })?;

        let base_dir = match &options.base_dir {
            Some(dir) => self.environment.resolve_path(dir),
            None => self.environment.working_dir.clone(),
        };
        let mut templates =
            TemplateConverter::new(backend, template_dirs.as_slice(), &base_dir, engine);
        if options.template_cache {
            templates = templates.with_cache();
        }
        tracing::debug!(
            backend,
            dirs = ?templates.resolver().dirs(),
            engine = templates.engine_name(),
            "Template overrides enabled"
        );

        let composite: Arc<dyn NodeConverter> =
            Arc::new(CompositeConverter::new(backend, Arc::new(templates), base));
        Ok(composite)
    }
}
