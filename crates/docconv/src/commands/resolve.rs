/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolve command implementation
 */

//! Resolve command implementation.
//!
//! Reports which template a node kind resolves to under the current
//! settings, and with `--explain` every path that was probed.

use anyhow::{Context, Result};

use docconv_core::engine::{available_engines, engine_by_name};
use docconv_core::{Backend, HostEnvironment, TemplateResolver, resolve_environment_defaults};

use crate::ConverterArgs;
use crate::config;

/// Arguments for the resolve command
#[derive(Debug)]
pub struct ResolveArgs {
    pub node_name: String,
    pub explain: bool,
    pub converter: ConverterArgs,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let settings = config::load(&args.converter)?;
    let env = HostEnvironment::detect();
    let backend = Backend::from(settings.backend.as_str());
    let options = resolve_environment_defaults(&backend, settings.options, &env);

    let Some(template_dirs) = options.template_dirs.as_ref() else {
        println!(
            "{}: no template directories configured; built-in {} converter",
            args.node_name, backend
        );
        return Ok(());
    };

    let engine = engine_by_name(&options.template_engine, options.autoescape).with_context(|| {
        format!(
            "Unknown template engine '{}' (available: {})",
            options.template_engine,
            available_engines().join(", ")
        )
    })?;
    let base_dir = match &options.base_dir {
        Some(dir) => env.resolve_path(dir),
        None => env.working_dir.clone(),
    };
    let resolver = TemplateResolver::new(
        template_dirs.as_slice(),
        &base_dir,
        engine.name(),
        backend.as_str(),
        engine.extension(),
    );

    if args.explain {
        for candidate in resolver.candidates(&args.node_name) {
            let mark = if candidate.is_file() { "*" } else { " " };
            println!("{} {}", mark, candidate.display());
        }
    }

    match resolver
        .resolve(&args.node_name)
        .with_context(|| format!("Failed to resolve template for {}", args.node_name))?
    {
        Some(template) => println!("{}: {}", args.node_name, template.path.display()),
        None if backend.is_builtin() => println!(
            "{}: no template; built-in {} converter",
            args.node_name, backend
        ),
        None => println!("{}: no template; not convertible", args.node_name),
    }
    Ok(())
}
