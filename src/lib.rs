//! # EO Build Library
//!
//! This library provides the build pipeline for EO programs: it turns a
//! directory of `.eo` sources into optimized XMIR documents, fetching every
//! object the program refers to from the objectionary along the way, and
//! builds the native inserts the program carries. It is designed to be used
//! by the `eo-build` command-line tool but works just as well embedded.
//!
//! ## Quick Example
//!
//! ```
//! use eo_build::document::Xmir;
//! use eo_build::passes::PASSES;
//!
//! let mut doc = Xmir::parse(
//!     r#"<program><objects>
//!          <o name="app" line="1"><o base="stdout" line="2"/></o>
//!        </objects></program>"#,
//!     "app.xmir",
//! )
//! .unwrap();
//! for pass in PASSES.iter() {
//!     (pass.apply)(&mut doc).unwrap();
//! }
//! assert!(doc.foreign_names().contains("org.eolang.stdout"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Catalog (`catalog`)**: The persistent build state, one record (tojo)
//!   per object, in a Foreign and an External instance.
//! - **Documents (`document`, `passes`)**: XMIR trees and the ordered passes
//!   that normalize them.
//! - **Phases (`phases`)**: Register, Parse, Optimize, Discover, Pull and
//!   Binarize, plus the orchestrator that cycles them.
//! - **Objectionary (`objectionary`, `git`, `hash`, `cache`)**: Fetching
//!   object sources from the remote store and pinning versions to commits.
//! - **Native inserts (`native`)**: The generated Cargo library, its build
//!   and the dispatch table of its functions.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::assemble`:
//!
//! 1.  **Register**: Put every local source file into the catalog.
//! 2.  **Parse**: Turn sources into XMIR with the external parser.
//! 3.  **Optimize**: Normalize every parsed document.
//! 4.  **Discover**: Find the names documents refer to but don't define.
//! 5.  **Pull**: Fetch the sources of those names.
//!
//! Steps 2-5 repeat until the catalog stops changing.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod deps;
pub mod document;
pub mod error;
pub mod git;
pub mod hash;
pub mod native;
pub mod objectionary;
pub mod output;
pub mod passes;
pub mod path;
pub mod phases;

#[cfg(test)]
mod path_proptest;
