//! Process-scoped caching of the commit hash table text

use std::sync::{Arc, Mutex};

use log::debug;

use crate::error::{Error, Result};

/// A single memoized slot holding the text of the commit hash table.
///
/// The slot is filled by the first successful load and never refreshed for
/// the lifetime of the object. Clones share the slot, so one cache created
/// at startup and passed by reference into every constructor gives exactly
/// one load per process.
#[derive(Debug, Clone, Default)]
pub struct TableCache {
    slot: Arc<Mutex<Option<String>>>,
}

impl TableCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached text, or load and cache it if not present.
    ///
    /// A failed load leaves the slot empty, so the next call tries again.
    pub fn get_or_load<F>(&self, loader: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let mut slot = self.slot.lock().map_err(|_| Error::LockPoisoned {
            context: "commit hash table cache".to_string(),
        })?;
        if let Some(text) = slot.as_ref() {
            return Ok(text.clone());
        }
        let text = loader()?;
        debug!("Commit hash table loaded, {} bytes", text.len());
        *slot = Some(text.clone());
        Ok(text)
    }

    /// Whether the table text was loaded already
    pub fn is_loaded(&self) -> Result<bool> {
        let slot = self.slot.lock().map_err(|_| Error::LockPoisoned {
            context: "commit hash table cache".to_string(),
        })?;
        Ok(slot.is_some())
    }

    /// Forget the cached text.
    #[cfg(test)]
    pub fn reset(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}
