//! # Native Inserts
//!
//! EO programs may embed Rust code through `org.eolang.rust` objects. The
//! Binarize stage collects those inserts into one Cargo library and builds
//! it; at run time the functions are looked up by the locator of the insert
//! that produced them.
//!
//! - [`cargo`]: the `Cargo.toml` of the generated library.
//! - [`build`]: running the native toolchain as a cancellable subprocess.
//! - [`registry`]: locator to function dispatch.

pub mod build;
pub mod cargo;
pub mod registry;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns `true` if the file was written. Leaving unchanged files alone
/// keeps their modification times, so the native toolchain doesn't rebuild
/// anything it doesn't have to.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write '{}': {}", path.display(), e),
    })?;
    Ok(true)
}
