//! docconv CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "docconv")]
#[command(version)]
#[command(about = "Convert document node trees to output markup", long_about = None)]
struct Cli {
    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Converter options shared by the commands that build a converter
#[derive(clap::Args, Debug, Default)]
pub struct ConverterArgs {
    /// TOML file with the backend and converter options
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output backend (html5, docbook5, docbook45, manpage, or a custom name)
    #[arg(short = 'b', long)]
    pub backend: Option<String>,

    /// Template directory; may be repeated, earlier directories take precedence
    #[arg(short = 'T', long = "template-dir")]
    pub template_dirs: Vec<PathBuf>,

    /// Template engine name
    #[arg(short = 'E', long)]
    pub template_engine: Option<String>,

    /// Cache resolved templates for the whole run
    #[arg(long)]
    pub template_cache: bool,

    /// Escape HTML in interpolated template values
    #[arg(long)]
    pub autoescape: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON node tree
    Convert {
        /// Input JSON file ('-' for stdin)
        input: String,

        /// Write output to FILE (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        converter: ConverterArgs,
    },

    /// Show which template a node kind resolves to
    Resolve {
        /// Node kind (e.g. paragraph)
        node_name: String,

        /// List every candidate path in search order
        #[arg(long)]
        explain: bool,

        #[command(flatten)]
        converter: ConverterArgs,
    },

    /// List built-in backends and template engines
    Backends,
}

fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "docconv=error,docconv_core=error",
        (false, 0) => "docconv=info,docconv_core=warn",
        (false, 1) => "docconv=debug,docconv_core=debug",
        (false, _) => "docconv=trace,docconv_core=trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose, cli.quiet).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            converter,
        } => commands::convert::execute(commands::convert::ConvertArgs {
            input,
            output,
            converter,
        }),
        Commands::Resolve {
            node_name,
            explain,
            converter,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            node_name,
            explain,
            converter,
        }),
        Commands::Backends => commands::backends::execute(),
    }
}
