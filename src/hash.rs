//! # Commit Hash Table
//!
//! Versioned object names (`org.eolang.io.stdout|0.28.10`) are pinned to a
//! specific revision of the objectionary. The commit hash table maps every
//! release tag to the short (7-character) hash of the commit it points to.
//!
//! The table text is a list of `<full-hash> <tag>` rows. It is loaded at most
//! once per process through a [`TableCache`] passed in by the caller, then
//! parsed into a map whose values are lazily narrowed and memoized:
//!
//! ```
//! use eo_build::hash::CommitHashes;
//!
//! let hashes = CommitHashes::from_table("abcdef0123456789 0.23.15").unwrap();
//! assert_eq!(hashes.get("0.23.15").unwrap(), "abcdef0");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::cache::TableCache;
use crate::error::{Error, Result};

/// Length of a short commit hash.
pub const SHORT_HASH: usize = 7;

/// A commit hash that may need computing.
pub trait CommitHash: Send + Sync {
    fn value(&self) -> Result<String>;
}

/// A hash known upfront.
#[derive(Debug, Clone)]
pub struct ChConstant(pub String);

impl CommitHash for ChConstant {
    fn value(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Narrows a hash to its 7-character prefix.
///
/// Anything shorter than 7 characters is rejected.
#[derive(Debug, Clone)]
pub struct ChNarrow<H>(pub H);

impl<H: CommitHash> CommitHash for ChNarrow<H> {
    fn value(&self) -> Result<String> {
        let full = self.0.value()?;
        let short: String = full.chars().take(SHORT_HASH).collect();
        if short.chars().count() != SHORT_HASH {
            return Err(Error::InvalidHash {
                hash: full,
                message: format!("expected at least {} characters", SHORT_HASH),
            });
        }
        Ok(short)
    }
}

/// Memoizes the first successful value of the wrapped hash.
#[derive(Debug)]
pub struct ChCached<H> {
    origin: H,
    cached: OnceLock<String>,
}

impl<H> ChCached<H> {
    pub fn new(origin: H) -> Self {
        Self {
            origin,
            cached: OnceLock::new(),
        }
    }
}

impl<H: CommitHash> CommitHash for ChCached<H> {
    fn value(&self) -> Result<String> {
        if let Some(value) = self.cached.get() {
            return Ok(value.clone());
        }
        let value = self.origin.value()?;
        Ok(self.cached.get_or_init(|| value).clone())
    }
}

/// Where the table text comes from.
pub trait TableSource {
    fn text(&self) -> Result<String>;
}

/// A table stored in a local file.
#[derive(Debug, Clone)]
pub struct FileTable(pub PathBuf);

impl TableSource for FileTable {
    fn text(&self) -> Result<String> {
        fs::read_to_string(&self.0).map_err(|e| Error::Configuration {
            message: format!(
                "Can't read commit hash table '{}': {}",
                self.0.display(),
                e
            ),
            hint: None,
        })
    }
}

/// The tags of a remote repository, listed with `git ls-remote --tags`.
#[derive(Debug, Clone)]
pub struct RemoteTags {
    pub url: String,
}

impl TableSource for RemoteTags {
    fn text(&self) -> Result<String> {
        crate::git::list_tag_hashes(&self.url)
    }
}

/// Tag to short hash lookup.
pub struct CommitHashes {
    hashes: HashMap<String, ChCached<ChNarrow<ChConstant>>>,
}

impl CommitHashes {
    /// Parse `<hash> <tag>` rows. Blank lines are ignored; a row without a
    /// tag is a configuration error.
    pub fn from_table(table: &str) -> Result<Self> {
        let mut hashes = HashMap::new();
        for line in table.lines().filter(|l| !l.trim().is_empty()) {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(hash), Some(tag)) => {
                    hashes.insert(
                        tag.to_string(),
                        ChCached::new(ChNarrow(ChConstant(hash.to_string()))),
                    );
                }
                _ => {
                    return Err(Error::Configuration {
                        message: format!("Malformed commit hash row: '{}'", line),
                        hint: Some("Each row must be '<hash> <tag>'".to_string()),
                    })
                }
            }
        }
        Ok(Self { hashes })
    }

    /// Build the table from text loaded through `cache`.
    ///
    /// Only the first call on a given cache touches `source`; every later
    /// construction reuses the cached text.
    pub fn load(cache: &TableCache, source: &dyn TableSource) -> Result<Self> {
        let text = cache.get_or_load(|| source.text())?;
        Self::from_table(&text)
    }

    /// The short hash of a tag.
    pub fn get(&self, tag: &str) -> Result<String> {
        self.hashes
            .get(tag)
            .ok_or_else(|| Error::UnknownTag {
                tag: tag.to_string(),
            })?
            .value()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
