/*
 * environment.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Host environment descriptor and environment-dependent option defaults.
 */

//! Host environment.
//!
//! Some defaults depend on where the converter runs. Rather than reading
//! process state from inside the factory, callers describe the host with a
//! [`HostEnvironment`] and the factory consults it once, in
//! [`resolve_environment_defaults`].

use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::options::{ConverterOptions, TemplateDirs};

/// Environment variable read by [`HostEnvironment::detect`].
pub const HOST_PLATFORM_ENV: &str = "DOCCONV_HOST_PLATFORM";

/// Template directory installed by the reveal.js converter package.
pub const REVEALJS_TEMPLATES_PATH: &str = "node_modules/asciidoctor-reveal.js/templates";

/// Kind of host the converter runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostPlatform {
    /// Standalone native process
    #[default]
    Native,
    /// Node.js
    Node,
    /// Node.js inside Electron
    NodeElectron,
    /// Web browser (no filesystem)
    Browser,
}

impl HostPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostPlatform::Native => "native",
            HostPlatform::Node => "node",
            HostPlatform::NodeElectron => "node-electron",
            HostPlatform::Browser => "browser",
        }
    }

    /// Check if this host has a Node.js module tree next to the working directory
    pub fn is_node(&self) -> bool {
        matches!(self, HostPlatform::Node | HostPlatform::NodeElectron)
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for HostPlatform {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "native" => Ok(HostPlatform::Native),
            "node" => Ok(HostPlatform::Node),
            "node-electron" | "electron" => Ok(HostPlatform::NodeElectron),
            "browser" => Ok(HostPlatform::Browser),
            _ => Err(format!("Unknown host platform: {}", s)),
        }
    }
}

/// Description of the host the converter graph is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub platform: HostPlatform,
    /// Directory relative paths resolve against.
    pub working_dir: PathBuf,
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            platform: HostPlatform::Native,
            working_dir: PathBuf::from("."),
        }
    }
}

impl HostEnvironment {
    pub fn new(platform: HostPlatform, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            working_dir: working_dir.into(),
        }
    }

    /// Describe the current process.
    ///
    /// The platform comes from `DOCCONV_HOST_PLATFORM`; an unset or
    /// unrecognized value means [`HostPlatform::Native`].
    pub fn detect() -> Self {
        let platform = match std::env::var(HOST_PLATFORM_ENV) {
            Ok(value) => HostPlatform::try_from(value.as_str()).unwrap_or_else(|e| {
                tracing::warn!("{}; assuming native", e);
                HostPlatform::Native
            }),
            Err(_) => HostPlatform::Native,
        };
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            platform,
            working_dir,
        }
    }

    /// Resolve `path` against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Fill in options whose defaults depend on the host.
///
/// Currently this only covers the reveal.js templates: on Node hosts, when
/// no template directories were given and the reveal.js template package is
/// installed, its template directory becomes the default.
pub fn resolve_environment_defaults(
    backend: &Backend,
    mut options: ConverterOptions,
    env: &HostEnvironment,
) -> ConverterOptions {
    if *backend == Backend::Revealjs && env.platform.is_node() && options.template_dirs.is_none() {
        let templates = env.resolve_path(Path::new(REVEALJS_TEMPLATES_PATH));
        if templates.is_dir() {
            tracing::debug!(dir = %templates.display(), "Using installed reveal.js templates");
            options.template_dirs = Some(TemplateDirs::from(templates));
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_env_with_revealjs() -> (tempfile::TempDir, HostEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(REVEALJS_TEMPLATES_PATH)).unwrap();
        let env = HostEnvironment::new(HostPlatform::Node, dir.path());
        (dir, env)
    }

    #[test]
    fn test_revealjs_templates_injected_on_node() {
        let (dir, env) = node_env_with_revealjs();
        let options = resolve_environment_defaults(&Backend::Revealjs, ConverterOptions::new(), &env);

        assert_eq!(
            options.template_dirs,
            Some(TemplateDirs::from(dir.path().join(REVEALJS_TEMPLATES_PATH)))
        );
    }

    #[test]
    fn test_explicit_template_dirs_are_kept() {
        let (_dir, env) = node_env_with_revealjs();
        let options = ConverterOptions::new().with_template_dirs("mine");
        let options = resolve_environment_defaults(&Backend::Revealjs, options, &env);

        assert_eq!(options.template_dirs, Some(TemplateDirs::from("mine")));
    }

    #[test]
    fn test_no_injection_on_native_host() {
        let (dir, _) = node_env_with_revealjs();
        let env = HostEnvironment::new(HostPlatform::Native, dir.path());
        let options = resolve_environment_defaults(&Backend::Revealjs, ConverterOptions::new(), &env);

        assert!(options.template_dirs.is_none());
    }

    #[test]
    fn test_no_injection_for_other_backends() {
        let (_dir, env) = node_env_with_revealjs();
        let options = resolve_environment_defaults(&Backend::Html5, ConverterOptions::new(), &env);

        assert!(options.template_dirs.is_none());
    }

    #[test]
    fn test_no_injection_when_package_missing() {
        let dir = tempfile::tempdir().unwrap();
        let env = HostEnvironment::new(HostPlatform::NodeElectron, dir.path());
        let options = resolve_environment_defaults(&Backend::Revealjs, ConverterOptions::new(), &env);

        assert!(options.template_dirs.is_none());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!(HostPlatform::try_from("Node"), Ok(HostPlatform::Node));
        assert_eq!(
            HostPlatform::try_from("node-electron"),
            Ok(HostPlatform::NodeElectron)
        );
        assert!(HostPlatform::try_from("deno").is_err());
    }
}
