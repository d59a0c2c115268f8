//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `eo-build` command-line tool, one file per command.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and runs the
//!   command, calling into the `eo_build` library for the actual work.
//!
//! The arguments every project-aware command shares live in
//! [`ProjectArgs`].

pub mod assemble;
pub mod binarize;
pub mod completions;
pub mod deps;
pub mod hash;
pub mod register;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eo_build::config::{self, BuildConfig};
use eo_build::defaults;
use eo_build::hash::{FileTable, RemoteTags, TableSource};

/// Arguments locating the project and its caches
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the eo.yaml configuration file
    #[arg(short, long, value_name = "PATH", env = "EO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding objectionary checkouts
    #[arg(long, value_name = "PATH", env = "EO_CACHE")]
    pub cache_root: Option<PathBuf>,
}

impl ProjectArgs {
    /// Load the configuration: the given file, else `eo.yaml` in the current
    /// directory, else the defaults rooted at the current directory.
    pub fn load(&self) -> Result<BuildConfig> {
        if let Some(path) = &self.config {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            return Ok(config::from_file(path)?);
        }
        let cwd = std::env::current_dir().context("Can't determine the current directory")?;
        let local = cwd.join(defaults::CONFIG_FILE);
        if local.exists() {
            Ok(config::from_file(&local)?)
        } else {
            Ok(BuildConfig::rooted_at(&cwd))
        }
    }

    pub fn cache_root(&self) -> PathBuf {
        self.cache_root
            .clone()
            .unwrap_or_else(defaults::default_cache_root)
    }
}

/// Where the commit hash table comes from for this configuration.
pub fn table_source(config: &BuildConfig) -> Box<dyn TableSource> {
    match &config.hashes {
        Some(path) => Box::new(FileTable(path.clone())),
        None => Box::new(RemoteTags {
            url: config.objectionary.url.clone(),
        }),
    }
}
