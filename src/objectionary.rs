//! # Remote Object Store
//!
//! The objectionary is the remote store holding the sources of every
//! published EO object. This module defines the `Objectionary` trait, the
//! only thing Pull knows about the store, and `GitObjectionary`, the default
//! implementation backed by a Git repository.
//!
//! ## Design
//!
//! `GitObjectionary` is built around two traits, so the Git side can be
//! swapped out in tests:
//!
//! - **`GitOperations`**: cloning a repository at a ref.
//! - **`Objectionary`**: fetching the source text of one object.
//!
//! The repository is shallow-cloned once per ref into the cache root; the
//! source of `org.eolang.io.stdout` is then read from
//! `objects/org/eolang/io/stdout.eo` inside that checkout. A versioned name
//! (`org.eolang.io.stdout|0.28.10`) is read from the checkout of its tag,
//! every other name from the checkout of the configured default ref.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::path::{place, split_version};

/// Fetches the source text of an object by its fully-qualified name.
pub trait Objectionary {
    fn fetch(&self, name: &str) -> Result<String>;
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones a repository at a specific Git reference (branch or tag).
    fn clone_shallow(&self, url: &str, ref_name: &str, target_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_shallow(&self, url: &str, ref_name: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_shallow(url, ref_name, target_dir)
    }
}

/// An objectionary stored in a Git repository.
pub struct GitObjectionary {
    url: String,
    default_ref: String,
    cache_root: PathBuf,
    git: Box<dyn GitOperations>,
}

impl GitObjectionary {
    /// Directory inside the repository holding the object sources.
    pub const OBJECTS: &'static str = "objects";

    pub fn new(url: &str, default_ref: &str, cache_root: PathBuf) -> Self {
        Self::with_operations(url, default_ref, cache_root, Box::new(DefaultGitOperations))
    }

    /// Creates a `GitObjectionary` with custom `GitOperations`.
    pub fn with_operations(
        url: &str,
        default_ref: &str,
        cache_root: PathBuf,
        git: Box<dyn GitOperations>,
    ) -> Self {
        Self {
            url: url.to_string(),
            default_ref: default_ref.to_string(),
            cache_root,
            git,
        }
    }

    /// The local checkout for `ref_name`, cloned on first use.
    fn checkout(&self, ref_name: &str) -> Result<PathBuf> {
        let dir = crate::git::checkout_path(&self.cache_root, &self.url, ref_name);
        if !dir.is_dir() {
            info!("Cloning objectionary {}@{}", self.url, ref_name);
            self.git.clone_shallow(&self.url, ref_name, &dir)?;
        }
        Ok(dir)
    }
}

impl Objectionary for GitObjectionary {
    fn fetch(&self, name: &str) -> Result<String> {
        let (base, version) = split_version(name);
        let checkout = self.checkout(version.unwrap_or(&self.default_ref))?;
        let file = place(base, &checkout.join(Self::OBJECTS), "eo");
        fs::read_to_string(&file).map_err(|e| Error::Fetch {
            name: name.to_string(),
            message: format!("{} is not readable: {}", file.display(), e),
        })
    }
}
