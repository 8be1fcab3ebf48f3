/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Converter options.
//!
//! Options arrive from the CLI or from a config file, so they deserialize
//! with kebab-case keys. `template-dirs` accepts either a single path or a
//! list of paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::TeraEngine;

/// Template directories, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TemplateDirsRepr", into = "Vec<PathBuf>")]
pub struct TemplateDirs(Vec<PathBuf>);

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateDirsRepr {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl From<TemplateDirsRepr> for TemplateDirs {
    fn from(repr: TemplateDirsRepr) -> Self {
        match repr {
            TemplateDirsRepr::One(dir) => TemplateDirs(vec![dir]),
            TemplateDirsRepr::Many(dirs) => TemplateDirs(dirs),
        }
    }
}

impl From<TemplateDirs> for Vec<PathBuf> {
    fn from(dirs: TemplateDirs) -> Self {
        dirs.0
    }
}

impl TemplateDirs {
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        TemplateDirs(dirs.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<PathBuf> for TemplateDirs {
    fn from(dir: PathBuf) -> Self {
        TemplateDirs(vec![dir])
    }
}

impl From<&str> for TemplateDirs {
    fn from(dir: &str) -> Self {
        TemplateDirs(vec![PathBuf::from(dir)])
    }
}

impl From<Vec<PathBuf>> for TemplateDirs {
    fn from(dirs: Vec<PathBuf>) -> Self {
        TemplateDirs(dirs)
    }
}

/// Options passed to [`crate::ConverterFactory::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConverterOptions {
    /// Directories searched for template overrides. `None` means no
    /// template layer is constructed at all.
    pub template_dirs: Option<TemplateDirs>,

    /// Name of the template engine.
    pub template_engine: String,

    /// Memoize resolved templates per node kind for the converter's lifetime.
    pub template_cache: bool,

    /// Directory that relative template directories are resolved against.
    /// Defaults to the host working directory.
    pub base_dir: Option<PathBuf>,

    /// Escape HTML in interpolated template values.
    pub autoescape: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            template_dirs: None,
            template_engine: TeraEngine::NAME.to_string(),
            template_cache: false,
            base_dir: None,
            autoescape: false,
        }
    }
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template_dirs(mut self, dirs: impl Into<TemplateDirs>) -> Self {
        self.template_dirs = Some(dirs.into());
        self
    }

    pub fn with_template_engine(mut self, engine: impl Into<String>) -> Self {
        self.template_engine = engine.into();
        self
    }

    pub fn with_template_cache(mut self, enabled: bool) -> Self {
        self.template_cache = enabled;
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_autoescape(mut self, enabled: bool) -> Self {
        self.autoescape = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_dirs_from_single_string() {
        let options: ConverterOptions =
            serde_json::from_value(json!({ "template-dirs": "./custom" })).unwrap();
        assert_eq!(
            options.template_dirs,
            Some(TemplateDirs::new(["./custom"]))
        );
    }

    #[test]
    fn test_template_dirs_from_list() {
        let options: ConverterOptions = serde_json::from_value(
            json!({ "template-dirs": ["./custom", "./fallback"], "template-cache": true }),
        )
        .unwrap();
        let dirs = options.template_dirs.unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs.as_slice()[1], PathBuf::from("./fallback"));
        assert!(options.template_cache);
    }

    #[test]
    fn test_defaults() {
        let options: ConverterOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, ConverterOptions::default());
        assert_eq!(options.template_engine, "tera");
        assert!(options.template_dirs.is_none());
    }

    #[test]
    fn test_from_toml() {
        let options: ConverterOptions = toml::from_str(
            r#"
template-dirs = ["templates"]
autoescape = true
"#,
        )
        .unwrap();
        assert!(options.autoescape);
        assert_eq!(options.template_dirs, Some(TemplateDirs::new(["templates"])));
    }
}
