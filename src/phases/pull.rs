//! Pull: fetch the sources of the objects the build refers to.
//!
//! ## Process
//!
//! 1.  **Collect**: the foreign names of every optimized document in the
//!     catalog. A document that can't be read is logged and left out.
//!
//! 2.  **Resolve**: for each name, in order:
//!     - a name with a local source is skipped;
//!     - a versioned name gets its pinned hash, before anything is written;
//!     - the source goes to `04-pull/<place>.eo` and a provenance log to
//!       `<protocols>/<place>.log`;
//!     - unless overwriting, an existing source is kept, and an existing log
//!       without a source stops the name with a warning;
//!     - otherwise the source is fetched and written, then its log.
//!
//! 3.  **Record**: the source, version and pinned hash go into the catalog
//!     and the new source is parsed. A name the catalog already records as
//!     pulled from the same file is left alone unless it was just fetched.
//!
//! A versioned name (`org.eolang.io.stdout|0.28.10`) is pinned to the short
//! hash of its tag; the commit hash table is loaded the first time such a
//! name shows up and never for a build without one.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};

use super::parse::{self, Parser};
use super::{status, PULL_DIR};
use crate::cache::TableCache;
use crate::catalog::Catalog;
use crate::config::BuildConfig;
use crate::document::Xmir;
use crate::error::{Error, Result};
use crate::hash::{CommitHashes, TableSource};
use crate::objectionary::Objectionary;
use crate::path::{check_place, place, split_version};

/// Everything Pull talks to outside of the catalog.
pub struct Remote<'a> {
    pub objectionary: &'a dyn Objectionary,
    pub parser: &'a dyn Parser,
    pub cache: &'a TableCache,
    pub table: &'a dyn TableSource,
}

/// Execute Pull, returning the number of sources fetched.
pub fn execute(config: &BuildConfig, catalog: &mut Catalog, remote: &Remote<'_>) -> Result<usize> {
    let names = collect(catalog);
    let mut hashes: Option<CommitHashes> = None;
    let mut fetched = 0;
    for name in &names {
        if let Ok(tojo) = catalog.get(name) {
            if tojo.source.is_some() && !tojo.pulled {
                debug!("'{}' is a local object, not pulling", name);
                continue;
            }
        }
        check_place(name)?;
        let (_, version) = split_version(name);
        let hash = match version {
            Some(tag) => {
                if hashes.is_none() {
                    hashes = Some(CommitHashes::load(remote.cache, remote.table)?);
                }
                match hashes.as_ref() {
                    Some(table) => Some(table.get(tag)?),
                    None => None,
                }
            }
            None => None,
        };
        let source = place(name, &config.target.join(PULL_DIR), "eo");
        let log = place(name, &config.protocols, "log");
        let mut fresh = false;
        if source.exists() && !config.overwrite {
            debug!("'{}' already pulled into {}", name, source.display());
        } else if log.exists() && !config.overwrite {
            warn!(
                "'{}' has a provenance log {} but no source, not pulling it again; \
                 use overwrite to repair",
                name,
                log.display()
            );
            continue;
        } else {
            let text = remote.objectionary.fetch(name)?;
            write(&source, &text)?;
            write(
                &log,
                &format!(
                    "file: {}\ntime: {}\n",
                    source.display(),
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
                ),
            )?;
            fetched += 1;
            fresh = true;
            debug!("Pulled '{}' into {}", name, source.display());
        }
        let recorded = catalog
            .get(name)
            .map(|t| t.pulled && t.source.as_deref() == Some(source.as_path()))
            .unwrap_or(false);
        if recorded && !fresh {
            continue;
        }

        catalog.add(name)?;
        let tojo = catalog.update(name, |t| {
            t.source = Some(source.clone());
            t.pulled = true;
            t.version = version.map(str::to_string);
            t.hash = hash.clone();
            t.status = Some(status::PULLED.to_string());
        })?;
        if tojo.xmir.is_none() {
            parse::parse_one(config, catalog, remote.parser, name)?;
        }
    }
    if fetched > 0 {
        info!("Pulled {} object(s) from the objectionary", fetched);
    }
    Ok(fetched)
}

/// Every foreign name of every optimized document in the catalog.
fn collect(catalog: &Catalog) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for tojo in catalog.all() {
        let Some(optimized) = tojo.optimized.as_deref() else {
            continue;
        };
        match Xmir::load(optimized) {
            Ok(doc) => names.extend(doc.foreign_names()),
            Err(e) => warn!("Skipping '{}': {}", tojo.id, e),
        }
    }
    names
}

fn write(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text).map_err(|e| Error::Filesystem {
        message: format!("Failed to write '{}': {}", path.display(), e),
    })
}
