/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * CLI configuration loading
 */

//! Converter settings from a TOML file and command-line flags.
//!
//! ```toml
//! backend = "html5"
//! template-dirs = ["./custom", "./fallback"]
//! template-engine = "tera"
//! template-cache = true
//! ```
//!
//! Relative paths in the file resolve against the file's directory.
//! Command-line flags override file values; `-T` directories replace the
//! file's list instead of extending it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docconv_core::{ConverterOptions, TemplateDirs};
use serde::Deserialize;

use crate::ConverterArgs;

pub const DEFAULT_BACKEND: &str = "html5";

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    pub backend: Option<String>,
    #[serde(flatten)]
    pub converter: ConverterOptions,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: CliConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.converter.template_dirs = config
            .converter
            .template_dirs
            .take()
            .map(|dirs| TemplateDirs::new(dirs.as_slice().iter().map(|dir| anchor(config_dir, dir))));
        config.converter.base_dir = config
            .converter
            .base_dir
            .take()
            .map(|dir| anchor(config_dir, &dir));
        Ok(config)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Backend and options for one run.
#[derive(Debug)]
pub struct Settings {
    pub backend: String,
    pub options: ConverterOptions,
}

/// Merge the config file (if any) with command-line flags.
pub fn load(args: &ConverterArgs) -> Result<Settings> {
    let config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    Ok(merge(config, args))
}

fn merge(config: CliConfig, args: &ConverterArgs) -> Settings {
    let mut options = config.converter;
    if !args.template_dirs.is_empty() {
        options.template_dirs = Some(TemplateDirs::new(args.template_dirs.iter().cloned()));
    }
    if let Some(engine) = &args.template_engine {
        options.template_engine = engine.clone();
    }
    options.template_cache |= args.template_cache;
    options.autoescape |= args.autoescape;

    let backend = args
        .backend
        .clone()
        .or(config.backend)
        .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

    tracing::debug!(backend = %backend, options = ?options, "Loaded converter settings");
    Settings { backend, options }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_config() {
        let settings = load(&ConverterArgs::default()).unwrap();
        assert_eq!(settings.backend, "html5");
        assert!(settings.options.template_dirs.is_none());
        assert_eq!(settings.options.template_engine, "tera");
    }

    #[test]
    fn test_config_paths_resolve_against_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("docconv.toml");
        std::fs::write(
            &path,
            "backend = \"docbook5\"\ntemplate-dirs = \"templates\"\ntemplate-cache = true\n",
        )
        .unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.backend.as_deref(), Some("docbook5"));
        assert!(config.converter.template_cache);
        assert_eq!(
            config.converter.template_dirs,
            Some(TemplateDirs::new([tmp.path().join("templates")]))
        );
    }

    #[test]
    fn test_flags_override_file() {
        let config = CliConfig {
            backend: Some("docbook5".to_string()),
            converter: ConverterOptions::new()
                .with_template_dirs("/from/file")
                .with_template_engine("tera"),
        };
        let args = ConverterArgs {
            backend: Some("manpage".to_string()),
            template_dirs: vec![PathBuf::from("a"), PathBuf::from("b")],
            autoescape: true,
            ..Default::default()
        };

        let settings = merge(config, &args);
        assert_eq!(settings.backend, "manpage");
        assert_eq!(
            settings.options.template_dirs,
            Some(TemplateDirs::new(["a", "b"]))
        );
        assert!(settings.options.autoescape);
    }

    #[test]
    fn test_invalid_config_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "template-cache = \"sometimes\"").unwrap();

        let err = CliConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
