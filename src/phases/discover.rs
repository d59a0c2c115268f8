//! Discover: find the objects optimized documents refer to.
//!
//! Every tojo not yet discovered is scanned once. The names its optimized
//! document refers to (see [`Xmir::foreign_names`]) become tojos of their
//! own, remembering the document they were first seen in. Nothing here
//! recurses: the new names get sources from Pull, and the next cycle
//! discovers what those refer to.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};

use super::status;
use crate::catalog::Catalog;
use crate::document::Xmir;
use crate::error::Result;

/// Execute Discover, returning the number of new names added.
pub fn execute(catalog: &mut Catalog) -> Result<usize> {
    let mut added = 0;
    for tojo in catalog.not_discovered() {
        let Some(optimized) = tojo.optimized.clone() else {
            debug!("'{}' isn't optimized yet, not discovering", tojo.id);
            continue;
        };
        let names = names(&optimized)?;
        for name in &names {
            if !catalog.contains(name) {
                catalog.add(name)?;
                added += 1;
            }
            catalog.update(name, |t| {
                if t.discovered_at.is_none() {
                    t.discovered_at = Some(optimized.clone());
                }
            })?;
        }
        catalog.update(&tojo.id, |t| {
            t.discovered = Some(names.len());
            t.status = Some(status::DISCOVERED.to_string());
        })?;
        debug!("Found {} name(s) in '{}'", names.len(), tojo.id);
    }
    if added > 0 {
        info!("Discovered {} new object(s)", added);
    }
    Ok(added)
}

/// The foreign names of an optimized document.
pub fn names(optimized: &Path) -> Result<BTreeSet<String>> {
    Ok(Xmir::load(optimized)?.foreign_names())
}
