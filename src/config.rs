//! # Configuration Schema and Parsing
//!
//! This module defines `BuildConfig`, the data structure behind the `eo.yaml`
//! project file, and the logic for parsing and validating it. Every key is
//! optional; an empty file (or no file at all) yields the defaults below.
//!
//! ```yaml
//! sources: src/main/eo        # where the .eo programs live
//! target: target/eo           # where every stage writes its output
//! protocols: target/eo-protocols
//! strict-names: true          # only [a-z0-9-] in file names
//! with-versions: false        # also register objects in the External catalog
//! overwrite: false            # pull again even if the source is present
//! include: ["**/*.eo"]
//! exclude: []
//! max-cycles: 16
//! parser: ["eo-parse"]        # external parser, reads EO, prints XMIR
//! cargo: cargo                # native toolchain used by binarize
//! hashes: tags.txt            # local commit hash table (remote tags if absent)
//! objectionary:
//!   url: https://github.com/objectionary/home.git
//!   ref: master
//! project: { group: org.example, artifact: app, version: 0.0.1 }
//! dependencies:
//!   - { group: org.eolang, artifact: eo-runtime, version: 0.29.0 }
//! ```
//!
//! Relative paths are resolved against the directory of the configuration
//! file by [`from_file`], and against the current directory by [`parse`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::deps::{Coordinates, Dependency};
use crate::error::{Error, Result};

/// Where the object store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectionaryConfig {
    /// URL of the Git repository holding the objects.
    #[serde(default = "default_objectionary_url")]
    pub url: String,
    /// Ref used for names without an explicit version.
    #[serde(default = "default_objectionary_ref", rename = "ref")]
    pub r#ref: String,
}

impl Default for ObjectionaryConfig {
    fn default() -> Self {
        Self {
            url: default_objectionary_url(),
            r#ref: default_objectionary_ref(),
        }
    }
}

/// The complete project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default = "default_sources")]
    pub sources: PathBuf,
    #[serde(default = "default_target")]
    pub target: PathBuf,
    /// One provenance log per pulled object lives here.
    #[serde(default = "default_protocols")]
    pub protocols: PathBuf,
    /// Reject source files whose names aren't lowercase letters, digits and
    /// hyphens.
    #[serde(default = "default_true")]
    pub strict_names: bool,
    /// Register objects in the External catalog too.
    #[serde(default)]
    pub with_versions: bool,
    /// Pull again even if the source or the provenance log exists.
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Upper bound on parse/optimize/discover/pull cycles.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
    /// Command line of the external parser.
    #[serde(default = "default_parser")]
    pub parser: Vec<String>,
    /// Program used to build native inserts.
    #[serde(default = "default_cargo")]
    pub cargo: String,
    /// Local commit hash table; the objectionary tags are listed when absent.
    #[serde(default)]
    pub hashes: Option<PathBuf>,
    #[serde(default)]
    pub objectionary: ObjectionaryConfig,
    #[serde(default)]
    pub project: Coordinates,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            target: default_target(),
            protocols: default_protocols(),
            strict_names: true,
            with_versions: false,
            overwrite: false,
            include: default_include(),
            exclude: Vec::new(),
            max_cycles: default_max_cycles(),
            parser: default_parser(),
            cargo: default_cargo(),
            hashes: None,
            objectionary: ObjectionaryConfig::default(),
            project: Coordinates::default(),
            dependencies: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// A default configuration rooted at `dir`.
    pub fn rooted_at(dir: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_against(dir);
        config
    }

    /// Make every relative path absolute against `dir`.
    pub fn resolve_against(&mut self, dir: &Path) {
        for path in [&mut self.sources, &mut self.target, &mut self.protocols] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        if let Some(hashes) = self.hashes.as_mut() {
            if hashes.is_relative() {
                *hashes = dir.join(&*hashes);
            }
        }
    }

    /// Check values serde can't check on its own.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.objectionary.url)?;
        if self.parser.is_empty() {
            return Err(Error::Configuration {
                message: "The parser command line is empty".to_string(),
                hint: Some("Set 'parser: [\"eo-parse\"]' in eo.yaml".to_string()),
            });
        }
        if self.max_cycles == 0 {
            return Err(Error::Configuration {
                message: "'max-cycles' must be positive".to_string(),
                hint: None,
            });
        }
        if !self.project.version.is_empty() {
            semver::Version::parse(&self.project.version)?;
        }
        for pattern in self.include.iter().chain(self.exclude.iter()) {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }
}

/// Parses a YAML string into a `BuildConfig`.
pub fn parse(yaml_content: &str) -> Result<BuildConfig> {
    let blank = yaml_content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    let config: BuildConfig = if blank {
        BuildConfig::default()
    } else {
        serde_yaml::from_str(yaml_content).map_err(|e| Error::Configuration {
            message: format!("Invalid eo.yaml: {}", e),
            hint: None,
        })?
    };
    config.validate()?;
    Ok(config)
}

/// Load the configuration from a file, resolving relative paths against the
/// file's directory.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
        message: format!("Can't read configuration '{}': {}", path.display(), e),
        hint: None,
    })?;
    let mut config = parse(&content)?;
    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    config.resolve_against(&base);
    Ok(config)
}

fn default_sources() -> PathBuf {
    PathBuf::from("src/main/eo")
}

fn default_target() -> PathBuf {
    PathBuf::from("target/eo")
}

fn default_protocols() -> PathBuf {
    PathBuf::from("target/eo-protocols")
}

fn default_true() -> bool {
    true
}

fn default_include() -> Vec<String> {
    vec!["**/*.eo".to_string()]
}

fn default_max_cycles() -> usize {
    16
}

fn default_parser() -> Vec<String> {
    vec!["eo-parse".to_string()]
}

fn default_cargo() -> String {
    "cargo".to_string()
}

fn default_objectionary_url() -> String {
    defaults::OBJECTIONARY_URL.to_string()
}

fn default_objectionary_ref() -> String {
    defaults::OBJECTIONARY_REF.to_string()
}
