//! Register: put every local source file into the catalog.
//!
//! The sources directory is walked in file name order. A file is taken if
//! it matches one of the include globs and none of the exclude globs. Its id
//! is the relative path with `/` replaced by `.` and the extension dropped,
//! so `org/example/app.eo` becomes `org.example.app`.
//!
//! With strict names (the default), a file name may only hold lowercase
//! letters, digits and hyphens; anything else stops the build.

use std::path::Path;

use glob::Pattern;
use log::{debug, info};
use regex::Regex;
use walkdir::WalkDir;

use super::status;
use crate::catalog::Catalogs;
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::path::relative_id;

/// Extension of EO source files.
pub const EXT: &str = "eo";

/// Execute Register, returning the number of files registered.
pub fn execute(config: &BuildConfig, catalogs: &mut Catalogs) -> Result<usize> {
    let sources = &config.sources;
    if !sources.is_dir() {
        return Err(Error::Configuration {
            message: format!("Sources directory '{}' doesn't exist", sources.display()),
            hint: Some("Set 'sources:' in eo.yaml".to_string()),
        });
    }
    let include = patterns(&config.include)?;
    let exclude = patterns(&config.exclude)?;
    let strict = Regex::new("^[a-z0-9-]+$")?;

    let mut count = 0;
    for entry in WalkDir::new(sources).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", sources.display(), e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file = entry.path();
        let relative = file.strip_prefix(sources).map_err(|e| Error::Filesystem {
            message: format!("'{}' is outside of sources: {}", file.display(), e),
        })?;
        if !selected(relative, &include, &exclude) {
            debug!("Skipping {}", relative.display());
            continue;
        }
        if config.strict_names {
            check_name(file, &strict)?;
        }
        let id = relative_id(relative, EXT);
        catalogs.foreign.add(&id)?;
        catalogs.foreign.update(&id, |tojo| {
            tojo.source = Some(file.to_path_buf());
            if tojo.status.is_none() {
                tojo.status = Some(status::REGISTERED.to_string());
            }
        })?;
        if config.with_versions {
            catalogs.external.add(&id)?;
            catalogs.external.update(&id, |tojo| {
                tojo.source = Some(file.to_path_buf());
                tojo.status = Some(status::EXPORTED.to_string());
                if !config.project.version.is_empty() {
                    tojo.version = Some(config.project.version.clone());
                }
            })?;
        }
        debug!("Registered {} as '{}'", relative.display(), id);
        count += 1;
    }
    info!(
        "Registered {} EO source(s) from {}",
        count,
        crate::path::rel(sources)
    );
    Ok(count)
}

fn patterns(globs: &[String]) -> Result<Vec<Pattern>> {
    globs
        .iter()
        .map(|g| Pattern::new(g).map_err(Error::from))
        .collect()
}

fn selected(relative: &Path, include: &[Pattern], exclude: &[Pattern]) -> bool {
    include.iter().any(|p| p.matches_path(relative))
        && !exclude.iter().any(|p| p.matches_path(relative))
}

fn check_name(file: &Path, strict: &Regex) -> Result<()> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(&format!(".{}", EXT))
        .unwrap_or(name.as_str());
    if strict.is_match(stem) {
        Ok(())
    } else {
        Err(Error::Configuration {
            message: format!("Incorrect name found: '{}'", name),
            hint: Some(
                "EO file names may only contain lowercase letters, digits and '-'; \
                 set 'strict-names: false' to allow anything"
                    .to_string(),
            ),
        })
    }
}
