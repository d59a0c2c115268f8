//! Optimize: run the optimize passes over every parsed document.
//!
//! ## Process
//!
//! 1.  **Select**: every tojo with a parsed document and no optimized one.
//!
//! 2.  **Rewrite**: documents are processed in parallel. Each pass reads the
//!     output of the previous one; its result is saved under
//!     `02-steps/<place>/<NN>-<pass>.xml` for inspection and never read back.
//!     A document whose `03-optimize/<place>.xmir` already exists is not
//!     touched at all.
//!
//! 3.  **Record**: the catalog is updated once all documents are done, one
//!     tojo at a time.

use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use super::{status, OPTIMIZE_DIR, STEPS_DIR};
use crate::catalog::Catalog;
use crate::document::Xmir;
use crate::error::Result;
use crate::passes::{step_file, PASSES};
use crate::path::place;

/// Execute Optimize, returning the number of documents recorded.
pub fn execute(target: &Path, catalog: &mut Catalog) -> Result<usize> {
    let pending: Vec<(String, PathBuf)> = catalog
        .all()
        .filter(|t| t.optimized.is_none())
        .filter_map(|t| t.xmir.clone().map(|xmir| (t.id.clone(), xmir)))
        .collect();
    let done: Vec<(String, PathBuf)> = pending
        .par_iter()
        .map(|(id, xmir)| optimize_one(target, id, xmir).map(|path| (id.clone(), path)))
        .collect::<Result<Vec<_>>>()?;
    for (id, path) in &done {
        catalog.update(id, |tojo| {
            tojo.optimized = Some(path.clone());
            tojo.status = Some(status::OPTIMIZED.to_string());
        })?;
    }
    if !done.is_empty() {
        info!("Optimized {} XMIR document(s)", done.len());
    }
    Ok(done.len())
}

/// Optimize one document, returning the path of the result.
pub fn optimize_one(target: &Path, id: &str, xmir: &Path) -> Result<PathBuf> {
    let dest = place(id, &target.join(OPTIMIZE_DIR), "xmir");
    if dest.exists() {
        debug!("'{}' is already optimized in {}", id, dest.display());
        return Ok(dest);
    }
    let steps = place(id, &target.join(STEPS_DIR), "xmir").with_extension("");
    let mut doc = Xmir::load(xmir)?;
    for (index, pass) in PASSES.iter().enumerate() {
        (pass.apply)(&mut doc)?;
        doc.save(&steps.join(step_file(index, pass)))?;
    }
    doc.save(&dest)?;
    debug!("Optimized '{}' into {}", id, dest.display());
    Ok(dest)
}
