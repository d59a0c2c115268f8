//! # Build-State Catalog
//!
//! The catalog is a persistent record store tracking the lifecycle of every
//! object the build knows about. Each record (a "tojo") is keyed by the
//! fully-qualified object name and carries the paths produced by each stage,
//! the discovered marker, the pinned version and hash, and a free-form status.
//!
//! There are two catalogs with the same schema:
//!
//! - **Foreign**: the local build state, always populated.
//! - **External**: the published-dependency view, populated only when the
//!   project exports its objects (`with-versions`).
//!
//! Records are created on first registration or first discovery and updated
//! in place afterwards; they are never deleted. Every mutation is persisted
//! synchronously: the rows are written to a temporary sibling file that is
//! then renamed over the catalog, so an abrupt stop leaves either the old or
//! the new state on disk, never a torn file.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One tracked object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tojo {
    /// Fully-qualified name, immutable once assigned.
    pub id: String,
    /// The `.eo` source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// The parsed XMIR document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xmir: Option<PathBuf>,
    /// The optimized XMIR document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized: Option<PathBuf>,
    /// The document this name was first discovered in.
    #[serde(default, rename = "discovered-at", skip_serializing_if = "Option::is_none")]
    pub discovered_at: Option<PathBuf>,
    /// Number of foreign names found in this object, once discovered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered: Option<usize>,
    /// Whether the source was fetched from the objectionary.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pulled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Tojo {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// The optimized document, or `NotProcessed` if Optimize hasn't run yet.
    pub fn optimized(&self) -> Result<&Path> {
        self.optimized
            .as_deref()
            .ok_or_else(|| Error::NotProcessed {
                id: self.id.clone(),
                stage: "optimize".to_string(),
            })
    }

    /// The source file, or `NotProcessed` if neither Register nor Pull
    /// provided one yet.
    pub fn source(&self) -> Result<&Path> {
        self.source.as_deref().ok_or_else(|| Error::NotProcessed {
            id: self.id.clone(),
            stage: "pull".to_string(),
        })
    }
}

/// A persistent, append/update-only store of tojos.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    rows: BTreeMap<String, Tojo>,
}

impl Catalog {
    /// Open the catalog stored at `path`, or start an empty one if the file
    /// doesn't exist yet. Nothing is written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let tojos: Vec<Tojo> = serde_json::from_str(&text)?;
            tojos.into_iter().map(|t| (t.id.clone(), t)).collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, rows })
    }

    /// The file backing this catalog.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the record with this id, creating it if it doesn't exist.
    pub fn add(&mut self, id: &str) -> Result<Tojo> {
        if let Some(tojo) = self.rows.get(id) {
            return Ok(tojo.clone());
        }
        let tojo = Tojo::new(id);
        self.rows.insert(id.to_string(), tojo.clone());
        self.persist()?;
        debug!("Added '{}' to {}", id, self.path.display());
        Ok(tojo)
    }

    pub fn get(&self, id: &str) -> Result<&Tojo> {
        self.rows.get(id).ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Apply `change` to an existing record and persist the result.
    ///
    /// The id can't be changed; the catalog is written only when the record
    /// actually changed.
    pub fn update<F>(&mut self, id: &str, change: F) -> Result<Tojo>
    where
        F: FnOnce(&mut Tojo),
    {
        let tojo = self
            .rows
            .get_mut(id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        let before = tojo.clone();
        change(tojo);
        tojo.id = before.id.clone();
        let after = tojo.clone();
        if after != before {
            self.persist()?;
        }
        Ok(after)
    }

    /// Every record that doesn't carry the discovered marker yet.
    pub fn not_discovered(&self) -> Vec<Tojo> {
        self.rows
            .values()
            .filter(|t| t.discovered.is_none())
            .cloned()
            .collect()
    }

    /// Every record, ordered by id.
    pub fn all(&self) -> impl Iterator<Item = &Tojo> {
        self.rows.values()
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// An aggregate of every record's visible state.
    ///
    /// Two digests are equal only if no record was added or changed in
    /// between, which is how the orchestrator detects a cycle that did
    /// nothing.
    pub fn status_digest(&self) -> String {
        let mut hasher = DefaultHasher::new();
        for tojo in self.rows.values() {
            tojo.hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let rows: Vec<&Tojo> = self.rows.values().collect();
        let json = serde_json::to_string_pretty(&rows)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(|e| Error::Filesystem {
            message: format!("Failed to write catalog '{}': {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::Filesystem {
            message: format!("Failed to replace catalog '{}': {}", self.path.display(), e),
        })?;
        Ok(())
    }
}

/// The Foreign and External catalogs of one build.
#[derive(Debug)]
pub struct Catalogs {
    pub foreign: Catalog,
    pub external: Catalog,
}

impl Catalogs {
    /// File name of the Foreign catalog inside the build directory.
    pub const FOREIGN: &'static str = "eo-foreign.json";

    /// File name of the External catalog inside the build directory.
    pub const EXTERNAL: &'static str = "eo-external.json";

    /// Open both catalogs stored in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self {
            foreign: Catalog::open(dir.join(Self::FOREIGN))?,
            external: Catalog::open(dir.join(Self::EXTERNAL))?,
        })
    }
}
