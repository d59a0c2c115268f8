//! Project dependencies and the filters applied to them.
//!
//! A filter is a named predicate; [`resolve`] keeps a dependency only if
//! every filter accepts it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Group and artifact of the project itself, plus its version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub artifact: String,
    #[serde(default)]
    pub version: String,
}

/// A library the project depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_scope() -> String {
    "compile".to_string()
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} ({})",
            self.group, self.artifact, self.version, self.scope
        )
    }
}

/// A named test over a dependency.
pub struct Filter {
    pub name: &'static str,
    test: Box<dyn Fn(&Dependency) -> bool>,
}

impl Filter {
    pub fn accepts(&self, dependency: &Dependency) -> bool {
        (self.test)(dependency)
    }
}

/// Rejects the EO runtime, which is always provided.
pub fn not_runtime() -> Filter {
    Filter {
        name: "not-runtime",
        test: Box::new(|d| !(d.group == "org.eolang" && d.artifact == "eo-runtime")),
    }
}

/// Rejects anything whose scope mentions `test`.
pub fn not_testing() -> Filter {
    Filter {
        name: "not-testing",
        test: Box::new(|d| !d.scope.contains("test")),
    }
}

/// Rejects the project depending on itself.
pub fn not_same(project: &Coordinates) -> Filter {
    let group = project.group.clone();
    let artifact = project.artifact.clone();
    Filter {
        name: "not-same",
        test: Box::new(move |d| !(d.group == group && d.artifact == artifact)),
    }
}

/// The default filter list for a project.
pub fn filters(project: &Coordinates) -> Vec<Filter> {
    vec![not_runtime(), not_testing(), not_same(project)]
}

/// Keep the dependencies every filter accepts, in their original order.
pub fn resolve(dependencies: &[Dependency], filters: &[Filter]) -> Vec<Dependency> {
    dependencies
        .iter()
        .filter(|d| filters.iter().all(|f| f.accepts(d)))
        .cloned()
        .collect()
}
