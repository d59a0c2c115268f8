//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use eo_build::output::OutputConfig;

/// EO Build - Assemble EO programs into optimized XMIR
#[derive(Parser, Debug)]
#[command(name = "eo-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register the EO sources in the catalog
    Register(commands::register::RegisterArgs),

    /// Register, parse, optimize, discover and pull until nothing changes
    Assemble(commands::assemble::AssembleArgs),

    /// Build the native inserts of the optimized documents
    Binarize(commands::binarize::BinarizeArgs),

    /// Print the pinned commit hash of an objectionary tag
    Hash(commands::hash::HashArgs),

    /// Show the state of the catalogs
    Status(commands::status::StatusArgs),

    /// List the project dependencies that take part in the build
    Deps(commands::deps::DepsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        OutputConfig::from_env_and_flag(&self.color).apply();
        init_logging(&self.log_level);

        match self.command {
            Commands::Register(args) => commands::register::execute(args),
            Commands::Assemble(args) => commands::assemble::execute(args),
            Commands::Binarize(args) => commands::binarize::execute(args),
            Commands::Hash(args) => commands::hash::execute(args),
            Commands::Status(args) => commands::status::execute(args),
            Commands::Deps(args) => commands::deps::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route the `log` facade to stderr. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
