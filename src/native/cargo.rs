//! The `Cargo.toml` of the generated native library.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Dependencies every native library starts with.
pub const BASELINE: [(&str, &str); 1] = [("jni", "0.21.1")];

#[derive(Debug, Clone, Serialize)]
struct Package {
    name: String,
    version: String,
    edition: String,
}

#[derive(Debug, Clone, Serialize)]
struct Lib {
    #[serde(rename = "crate-type")]
    crate_type: Vec<String>,
}

/// A Cargo manifest for a `cdylib` crate.
#[derive(Debug, Clone, Serialize)]
pub struct CargoProject {
    package: Package,
    lib: Lib,
    dependencies: BTreeMap<String, String>,
}

impl CargoProject {
    pub fn new(name: &str) -> Self {
        Self {
            package: Package {
                name: name.to_string(),
                version: "0.1.0".to_string(),
                edition: "2021".to_string(),
            },
            lib: Lib {
                crate_type: vec!["cdylib".to_string()],
            },
            dependencies: BASELINE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Add a dependency. A crate that is already listed keeps its version.
    pub fn add(&mut self, krate: &str, version: &str) {
        self.dependencies
            .entry(krate.to_string())
            .or_insert_with(|| version.to_string());
    }

    pub fn dependency(&self, krate: &str) -> Option<&str> {
        self.dependencies.get(krate).map(String::as_str)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write the manifest, leaving an identical file untouched.
    pub fn save(&self, path: &Path) -> Result<bool> {
        super::write_if_changed(path, &self.to_toml()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_layout() {
        let mut cargo = CargoProject::new("common");
        cargo.add("rand", "0.5.5");
        let text = cargo.to_toml().unwrap();
        assert!(text.contains("[package]"));
        assert!(text.contains("name = \"common\""));
        assert!(text.contains("edition = \"2021\""));
        let lib = text.find("[lib]").unwrap();
        assert!(text[lib..].contains("crate-type = [\"cdylib\"]"));
        let deps = text.find("[dependencies]").unwrap();
        assert!(text[deps..].contains("jni = \"0.21.1\""));
        assert!(text[deps..].contains("rand = \"0.5.5\""));
    }

    #[test]
    fn test_first_writer_wins() {
        let mut cargo = CargoProject::new("common");
        cargo.add("rand", "0.5.5");
        cargo.add("rand", "0.8.0");
        cargo.add("jni", "0.1.0");
        assert_eq!(cargo.dependency("rand"), Some("0.5.5"));
        assert_eq!(cargo.dependency("jni"), Some("0.21.1"));
    }

    #[test]
    fn test_manifest_parses_back() {
        let text = CargoProject::new("common").to_toml().unwrap();
        let value: toml::Value = toml::from_str(&text).unwrap();
        assert_eq!(value["package"]["version"].as_str(), Some("0.1.0"));
    }
}
