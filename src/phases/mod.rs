//! Implementation of the stages of an EO build.
//!
//! ## Overview
//!
//! An assembly follows these stages:
//! 1. Register - Put every local source file into the catalog
//! 2. Parse - Turn sources into XMIR documents with the external parser
//! 3. Optimize - Normalize every parsed document with the optimize passes
//! 4. Discover - Find the objects the documents refer to but don't define
//! 5. Pull - Fetch the sources of those objects from the objectionary
//!
//! Stages 2-5 repeat until a cycle changes nothing, since every pulled
//! source may refer to more objects. Binarize runs separately, over the
//! optimized documents, to build the native inserts.
//!
//! Every stage reads the catalog as it stood on entry and records what it
//! did before returning, so an interrupted build resumes where it stopped.

pub mod binarize;
pub mod discover;
pub mod optimize;
pub mod orchestrator;
pub mod parse;
pub mod pull;
pub mod register;

/// Parsed documents, inside the target directory.
pub const PARSE_DIR: &str = "01-parse";

/// Intermediate results of every optimize pass.
pub const STEPS_DIR: &str = "02-steps";

/// Optimized documents.
pub const OPTIMIZE_DIR: &str = "03-optimize";

/// Sources fetched from the objectionary.
pub const PULL_DIR: &str = "04-pull";

/// Status values each stage leaves on the tojos it touched.
pub mod status {
    pub const REGISTERED: &str = "registered";
    pub const EXPORTED: &str = "exported";
    pub const PARSED: &str = "parsed";
    pub const OPTIMIZED: &str = "optimized";
    pub const DISCOVERED: &str = "discovered";
    pub const PULLED: &str = "pulled";
}
