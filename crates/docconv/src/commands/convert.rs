/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Convert command implementation
 */

//! Convert command implementation.
//!
//! Reads a JSON node tree, builds the converter graph for the selected
//! backend once, and converts the whole tree with it.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use docconv_core::{ConverterFactory, DocumentConverter, HostEnvironment, Node};

use crate::ConverterArgs;
use crate::config;

/// Arguments for the convert command
#[derive(Debug)]
pub struct ConvertArgs {
    /// Input JSON file, or `-` for stdin
    pub input: String,
    /// Output file path (stdout when absent)
    pub output: Option<PathBuf>,
    pub converter: ConverterArgs,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let settings = config::load(&args.converter)?;

    let source = read_input(&args.input)?;
    let root: Node = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse node tree from {}", args.input))?;

    let factory = ConverterFactory::new(HostEnvironment::detect());
    let converter = factory
        .create(&settings.backend, settings.options)
        .with_context(|| format!("Failed to set up the {} converter", settings.backend))?;
    debug!(backend = converter.backend(), "Converter ready");

    let output = DocumentConverter::new(converter)
        .convert(&root)
        .with_context(|| format!("Failed to convert {}", args.input))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Output: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", output).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read node tree from stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}
