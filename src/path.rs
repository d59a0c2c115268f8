//! Name-to-path mapping shared by every stage
//!
//! Register, parse, Optimize, Discover and Pull must all agree byte-for-byte
//! on where the files of an object live. Everything here is a pure function
//! of the fully-qualified object name, so two stages computing the path of the
//! same name always land on the same file.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Separator between an object name and its version, as in
/// `org.eolang.io.stdout|0.28.10`.
pub const VERSION_DELIMITER: char = '|';

/// Split `name|version` into its parts.
pub fn split_version(name: &str) -> (&str, Option<&str>) {
    match name.split_once(VERSION_DELIMITER) {
        Some((base, version)) => (base, Some(version)),
        None => (name, None),
    }
}

/// Make sure [`place`] keeps `name` inside its directory.
///
/// Names come from documents, so a `base` or `ver` holding a path separator
/// (`../../etc`, `/tmp`) or a version of `.` or `..` is refused.
pub fn check_place(name: &str) -> Result<()> {
    let (base, version) = split_version(name);
    let separator = |s: &str| s.contains(['/', '\\']);
    let bad_version =
        version.is_some_and(|v| v.is_empty() || v == "." || v == ".." || separator(v));
    if separator(base) || bad_version {
        return Err(Error::Configuration {
            message: format!(
                "Object name '{}' doesn't map to a file inside the build",
                name
            ),
            hint: Some("Names and versions can't hold '/' or '\\', nor be '.' or '..'".to_string()),
        });
    }
    Ok(())
}

/// Compute the place of an object inside a directory.
///
/// `org.eolang.io.stdout` maps to `<dir>/org/eolang/io/stdout.<ext>`; a
/// versioned name `org.eolang.io.stdout|0.28.10` maps to
/// `<dir>/0.28.10/org/eolang/io/stdout.<ext>`.
///
/// An empty component (as in `org.example..hidden`, the id of a
/// `.hidden.eo` file registered without strict names) keeps the leading dot
/// of the following component, so the mapping reverses `relative_id`.
pub fn place(name: &str, dir: &Path, ext: &str) -> PathBuf {
    let (base, version) = split_version(name);
    let mut path = dir.to_path_buf();
    if let Some(version) = version {
        path.push(version);
    }
    let mut parts = Vec::new();
    let mut dotted = false;
    for part in base.split('.') {
        if part.is_empty() {
            dotted = true;
            continue;
        }
        if dotted {
            parts.push(format!(".{}", part));
            dotted = false;
        } else {
            parts.push(part.to_string());
        }
    }
    if let Some((last, dirs)) = parts.split_last() {
        for part in dirs {
            path.push(part);
        }
        path.push(format!("{}.{}", last, ext));
    }
    path
}

/// Compute the object id of a file from its path relative to the sources
/// directory: directory components joined with dots, extension dropped.
pub fn relative_id(relative: &Path, ext: &str) -> String {
    let suffix = format!(".{}", ext);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let mut id = Vec::with_capacity(parts.len());
    if let Some((last, dirs)) = parts.split_last() {
        id.extend(dirs.iter().cloned());
        id.push(last.strip_suffix(&suffix).unwrap_or(last).to_string());
    }
    id.join(".")
}

/// Turn a directory path into a prefix usable as a Rust identifier.
///
/// The path is lowercased and every character outside `[a-z0-9]` becomes
/// `x`, so `/tmp/Build-1/target` turns into `xtmpxbuildx1xtarget`.
pub fn native_prefix(path: &Path) -> String {
    path.to_string_lossy()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                'x'
            }
        })
        .collect()
}

/// Render a path relative to the current directory, for log messages.
pub fn rel(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
