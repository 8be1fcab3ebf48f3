/*
 * backends.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Backends command implementation
 */

//! Lists built-in backends, template engines, and node kinds.

use anyhow::Result;

use docconv_core::Backend;
use docconv_core::base::NODE_KINDS;
use docconv_core::engine::available_engines;

/// Execute the backends command
pub fn execute() -> Result<()> {
    println!("Built-in backends:");
    for backend in Backend::BUILTIN {
        println!("  {}", backend);
    }
    println!("  {} (templates only)", Backend::Revealjs);

    println!("Template engines:");
    for engine in available_engines() {
        println!("  {}", engine);
    }

    println!("Node kinds:");
    for kind in NODE_KINDS {
        println!("  {}", kind);
    }
    Ok(())
}
