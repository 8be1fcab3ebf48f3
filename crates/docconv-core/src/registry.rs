/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Caller-registered converters.
//!
//! A registration takes precedence over everything the factory would
//! otherwise build for that backend, including template overrides.

use std::collections::HashMap;
use std::sync::Arc;

use crate::converter::NodeConverter;
use crate::options::ConverterOptions;

/// Builds a converter for `(backend, options)`.
pub type ConverterConstructor =
    Arc<dyn Fn(&str, &ConverterOptions) -> Arc<dyn NodeConverter> + Send + Sync>;

/// A registered converter.
#[derive(Clone)]
pub enum Registration {
    /// Returned as-is for every request.
    Instance(Arc<dyn NodeConverter>),
    /// Invoked for every request.
    Constructor(ConverterConstructor),
}

impl Registration {
    pub fn instantiate(&self, backend: &str, options: &ConverterOptions) -> Arc<dyn NodeConverter> {
        match self {
            Registration::Instance(converter) => Arc::clone(converter),
            Registration::Constructor(construct) => construct(backend, options),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Registration::Instance(converter) => {
                f.debug_tuple("Instance").field(&converter.backend()).finish()
            }
            Registration::Constructor(_) => f.write_str("Constructor"),
        }
    }
}

/// Backend name to registration.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    entries: HashMap<String, Registration>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter instance for `backend`, replacing any previous one.
    pub fn register(&mut self, backend: impl Into<String>, converter: Arc<dyn NodeConverter>) -> &mut Self {
        self.entries
            .insert(backend.into(), Registration::Instance(converter));
        self
    }

    /// Register a constructor for `backend`, replacing any previous one.
    pub fn register_constructor<F>(&mut self, backend: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&str, &ConverterOptions) -> Arc<dyn NodeConverter> + Send + Sync + 'static,
    {
        self.entries.insert(
            backend.into(),
            Registration::Constructor(Arc::new(constructor)),
        );
        self
    }

    pub fn get(&self, backend: &str) -> Option<&Registration> {
        self.entries.get(backend)
    }

    pub fn unregister(&mut self, backend: &str) -> Option<Registration> {
        self.entries.remove(backend)
    }

    pub fn backends(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::UnsupportedBackend;

    #[test]
    fn test_instance_is_shared() {
        let converter: Arc<dyn NodeConverter> = Arc::new(UnsupportedBackend::new("custom"));
        let mut registry = ConverterRegistry::new();
        registry.register("custom", Arc::clone(&converter));

        let resolved = registry
            .get("custom")
            .unwrap()
            .instantiate("custom", &ConverterOptions::new());
        assert!(Arc::ptr_eq(&resolved, &converter));
    }

    #[test]
    fn test_constructor_receives_backend() {
        let mut registry = ConverterRegistry::new();
        registry.register_constructor("custom", |backend, _options| {
            Arc::new(UnsupportedBackend::new(format!("{}-built", backend)))
        });

        let converter = registry
            .get("custom")
            .unwrap()
            .instantiate("custom", &ConverterOptions::new());
        assert_eq!(converter.backend(), "custom-built");
    }

    #[test]
    fn test_unregister() {
        let mut registry = ConverterRegistry::new();
        registry.register("custom", Arc::new(UnsupportedBackend::new("custom")));
        assert!(registry.unregister("custom").is_some());
        assert!(registry.get("custom").is_none());
        assert_eq!(registry.backends().count(), 0);
    }
}
