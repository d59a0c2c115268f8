//! # Optimize Passes
//!
//! The optimized form of a document is produced by a fixed, ordered list of
//! structural rewrites. Each pass takes the output of the previous one:
//!
//! 1. `globals-to-abstracts`: top-level objects that are neither references
//!    nor abstract become abstract declarations; `global` markers go away.
//! 2. `remove-refs`: stale `ref` attributes are stripped.
//! 3. `abstracts-float-up`: nested abstract declarations move up to the
//!    `objects` level under the name `outer$inner`, leaving a reference
//!    behind.
//! 4. `remove-levels`: `level` markers are dropped.
//! 5. `add-refs`: references to declarations in scope get `ref="<line>"`.
//! 6. `fix-missed-names`: unqualified names still unresolved are assumed to
//!    live in `org.eolang`.
//! 7. `broken-refs`: every `ref` must point at the line of some object.
//!
//! The passes are pure functions of the tree; the stage that runs them is
//! `phases::optimize`.

mod float;
mod refs;

use crate::document::Xmir;
use crate::error::Result;

pub use float::abstracts_float_up;
pub use refs::{add_refs, broken_refs, fix_missed_names};

/// One named rewrite of a document.
#[derive(Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    pub apply: fn(&mut Xmir) -> Result<()>,
}

/// Every pass, in the order they run.
pub const PASSES: [Pass; 7] = [
    Pass {
        name: "globals-to-abstracts",
        apply: globals_to_abstracts,
    },
    Pass {
        name: "remove-refs",
        apply: remove_refs,
    },
    Pass {
        name: "abstracts-float-up",
        apply: abstracts_float_up,
    },
    Pass {
        name: "remove-levels",
        apply: remove_levels,
    },
    Pass {
        name: "add-refs",
        apply: add_refs,
    },
    Pass {
        name: "fix-missed-names",
        apply: fix_missed_names,
    },
    Pass {
        name: "broken-refs",
        apply: broken_refs,
    },
];

/// File name of the intermediate result of the pass at `index`,
/// e.g. `03-abstracts-float-up.xml`.
pub fn step_file(index: usize, pass: &Pass) -> String {
    format!("{:02}-{}.xml", index + 1, pass.name)
}

pub fn globals_to_abstracts(doc: &mut Xmir) -> Result<()> {
    for node in doc.top_objects() {
        if !doc.has_attr(node, "base") && !doc.has_attr(node, "abstract") {
            doc.set_attr(node, "abstract", "");
        }
    }
    for node in doc.all_objects() {
        doc.remove_attr(node, "global");
    }
    Ok(())
}

pub fn remove_refs(doc: &mut Xmir) -> Result<()> {
    strip(doc, "ref");
    Ok(())
}

pub fn remove_levels(doc: &mut Xmir) -> Result<()> {
    strip(doc, "level");
    Ok(())
}

fn strip(doc: &mut Xmir, key: &str) {
    for node in doc.all_objects() {
        doc.remove_attr(node, key);
    }
}
