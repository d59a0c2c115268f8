//! Default values for eo-build configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the project configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = "eo.yaml";

/// Repository holding the sources of published objects.
pub const OBJECTIONARY_URL: &str = "https://github.com/objectionary/home.git";

/// Ref of the objectionary used for names without a version.
pub const OBJECTIONARY_REF: &str = "master";

/// Returns the default cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/eo-build` (XDG Base Directory)
/// - macOS: `~/Library/Caches/eo-build`
/// - Windows: `{FOLDERID_LocalAppData}\eo-build`
///
/// Falls back to `.eo-build-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `EO_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".eo-build-cache"))
        .join("eo-build")
}
