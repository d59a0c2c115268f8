//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_config(configs::MINIMAL)
//!         .with_source("app.eo", &programs::calling(&["org.eolang.io.stdout"]));
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::programs;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// `eo.yaml` snippets.
#[allow(dead_code)]
pub mod configs {
    /// Everything at its default, sources under `src/main/eo`.
    pub const MINIMAL: &str = "# eo-build\n";

    /// Sources kept next to the config file.
    pub const FLAT: &str = "sources: eo\n";

    /// A local commit hash table.
    pub const WITH_HASHES: &str = "hashes: tags.txt\n";

    /// Project coordinates and a mix of dependencies.
    pub const WITH_DEPENDENCIES: &str = r#"
project:
  group: org.example
  artifact: app
  version: 1.0.0
dependencies:
  - { group: org.eolang, artifact: eo-runtime, version: 0.29.0 }
  - { group: org.eolang, artifact: eo-collections, version: 0.1.0 }
  - { group: junit, artifact: junit, version: 4.13.2, scope: test }
  - { group: org.example, artifact: app, version: 0.9.0 }
"#;

    /// Unknown keys are rejected.
    pub const UNKNOWN_KEY: &str = "colour: blue\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "sources: [unclosed\n";
}

/// XMIR documents standing in for parsed EO programs.
#[allow(dead_code)]
pub mod programs {
    /// A program with one abstract object `app` that refers to `bases`.
    pub fn calling(bases: &[&str]) -> String {
        let inner: String = bases
            .iter()
            .enumerate()
            .map(|(i, b)| format!("<o base=\"{}\" line=\"{}\" pos=\"2\"/>", b, i + 2))
            .collect();
        format!(
            "<program name=\"app\"><objects><o abstract=\"\" name=\"app\" line=\"1\" pos=\"0\">{}</o></objects></program>",
            inner
        )
    }

    /// A program that refers to nothing.
    pub const EMPTY: &str = "<program name=\"empty\"><objects/></program>";
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary project directory with an optional `eo.yaml`.
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config(configs::MINIMAL)
///     .with_source("app.eo", "[] > app");
///
/// fixture.command().arg("register").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add an `eo.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("eo.yaml", content)
    }

    /// Add an EO source under the default sources directory.
    pub fn with_source(self, relative: &str, content: &str) -> Self {
        self.with_file(&format!("src/main/eo/{}", relative), content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("eo.yaml")
    }

    /// The default target directory.
    pub fn target(&self) -> PathBuf {
        self.temp_dir.path().join("target/eo")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("eo-build");
        cmd.current_dir(self.path())
            .env_remove("EO_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::MINIMAL);
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_fixture_with_source() {
        let fixture = TestFixture::new().with_source("org/example/app.eo", "[] > app");
        assert!(fixture.path().join("src/main/eo/org/example/app.eo").exists());
    }

    #[test]
    fn test_configs_parse() {
        for config in [
            configs::MINIMAL,
            configs::FLAT,
            configs::WITH_HASHES,
            configs::WITH_DEPENDENCIES,
        ] {
            eo_build::config::parse(config).expect("Config should parse");
        }
        assert!(eo_build::config::parse(configs::UNKNOWN_KEY).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        assert!(eo_build::config::parse(configs::INVALID_YAML).is_err());
    }
}
