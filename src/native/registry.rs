//! Dispatch from insert locators to native functions.
//!
//! Binarize writes `names.json`, mapping the locator of every insert to the
//! name of the function generated for it. Functions are registered by name
//! up front; a call resolves locator to name to function, with no reflection
//! involved.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Signature of every native function: raw input bytes in, a reply out.
pub type NativeFn = fn(&[u8]) -> Vec<u8>;

/// A decoded reply of a native function.
///
/// The first byte tells what follows: `1` an `f64`, `2` an `i64`, both
/// big-endian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Float(f64),
    Int(i64),
}

impl Reply {
    pub fn decode(locator: &str, bytes: &[u8]) -> Result<Self> {
        let invalid = |message: &str| Error::NativeReply {
            locator: locator.to_string(),
            message: message.to_string(),
        };
        let (determinant, content) = bytes
            .split_first()
            .ok_or_else(|| invalid("empty reply"))?;
        match *determinant {
            0 => Err(invalid("returning an object is not supported")),
            1 => {
                let raw: [u8; 8] = content
                    .try_into()
                    .map_err(|_| invalid("a float must take 8 bytes"))?;
                Ok(Reply::Float(f64::from_be_bytes(raw)))
            }
            2 => {
                let raw: [u8; 8] = content
                    .try_into()
                    .map_err(|_| invalid("an integer must take 8 bytes"))?;
                Ok(Reply::Int(i64::from_be_bytes(raw)))
            }
            _ => Err(invalid("returning strings and raw bytes is not supported")),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let (determinant, raw) = match self {
            Reply::Float(value) => (1u8, value.to_be_bytes()),
            Reply::Int(value) => (2u8, value.to_be_bytes()),
        };
        let mut bytes = Vec::with_capacity(9);
        bytes.push(determinant);
        bytes.extend_from_slice(&raw);
        bytes
    }
}

#[derive(Default)]
pub struct NativeRegistry {
    names: BTreeMap<String, String>,
    functions: HashMap<String, NativeFn>,
}

impl NativeRegistry {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self {
            names,
            functions: HashMap::new(),
        }
    }

    /// Read the locator table written by Binarize.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Configuration {
            message: format!("Can't read native names '{}': {}", path.display(), e),
            hint: Some("Run 'eo-build binarize' first".to_string()),
        })?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }

    pub fn register(&mut self, name: &str, function: NativeFn) -> &mut Self {
        self.functions.insert(name.to_string(), function);
        self
    }

    /// The function generated for the insert at `locator`.
    pub fn resolve(&self, locator: &str) -> Result<NativeFn> {
        self.names
            .get(locator)
            .and_then(|name| self.functions.get(name))
            .copied()
            .ok_or_else(|| Error::NativeNotFound {
                locator: locator.to_string(),
            })
    }

    pub fn call(&self, locator: &str, input: &[u8]) -> Result<Reply> {
        let function = self.resolve(locator)?;
        Reply::decode(locator, &function(input))
    }
}
