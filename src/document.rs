//! # XMIR Documents
//!
//! XMIR is the XML rendition of an EO program. Every stage after parsing
//! reads one of these documents from disk, works on the tree and writes a
//! new file; nothing is ever edited in place.
//!
//! ```xml
//! <program name="org.example.app">
//!   <objects>
//!     <o abstract="" name="app" line="1" pos="0">
//!       <o base="stdout" line="2" pos="2"/>
//!     </o>
//!   </objects>
//! </program>
//! ```
//!
//! Object elements (`<o>`) carry `base` (the name they refer to), `ref`
//! (the line of the declaration, once resolved), and optionally `ver`,
//! `vararg`, `name`, `abstract`, `line`, `pos`, `level` and `loc`.
//!
//! [`Xmir`] wraps an `xot` tree and exposes the handful of operations the
//! optimize passes, Discover, Pull and Binarize need.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

use xot::{Node, Xot};

use crate::error::{Error, Result};
use crate::path::VERSION_DELIMITER;

/// Tuple object every `vararg` application depends on.
pub const TUPLE: &str = "org.eolang.tuple";

/// Base of native inserts.
pub const RUST: &str = "org.eolang.rust";

/// Bases that refer to the object itself or its surroundings rather than
/// to another object.
const REFLEXIVE: [&str; 5] = ["Q", "^", "$", "&", "@"];

/// A test applied to an `<o>` element.
pub type Predicate = fn(&Xmir, Node) -> bool;

/// Every element matching all of these refers to another object by name.
pub const FOREIGN: [(&str, Predicate); 3] = [
    ("has-base", has_base),
    ("not-reflexive", not_reflexive),
    ("not-resolved", not_resolved),
];

fn has_base(doc: &Xmir, node: Node) -> bool {
    doc.attr(node, "base").is_some()
}

fn not_reflexive(doc: &Xmir, node: Node) -> bool {
    doc.attr(node, "base")
        .map(|base| !is_reflexive(base))
        .unwrap_or(false)
}

/// Whether `base` is a method call (`.plus`) or one of the special names.
pub fn is_reflexive(base: &str) -> bool {
    base.starts_with('.') || REFLEXIVE.contains(&base)
}

fn not_resolved(doc: &Xmir, node: Node) -> bool {
    doc.attr(node, "ref").is_none()
}

/// A native code insert found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    /// Stable locator of the insert in the source.
    pub locator: String,
    /// The Rust code of the insert.
    pub code: String,
    /// `crate:version` pairs the code depends on.
    pub dependencies: Vec<(String, String)>,
}

/// An XMIR document held in memory.
pub struct Xmir {
    xot: Xot,
    root: Node,
    label: String,
}

impl fmt::Debug for Xmir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xmir")
            .field("label", &self.label)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Xmir {
    /// Parse XMIR text. `label` names the document in error messages.
    pub fn parse(text: &str, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let mut xot = Xot::new();
        let root = xot.parse(text).map_err(|e| Error::Document {
            path: label.clone(),
            message: e.to_string(),
        })?;
        let doc = Self { xot, root, label };
        doc.program()?;
        Ok(doc)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Document {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path.display().to_string())
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, xml).map_err(|e| Error::Filesystem {
            message: format!("Failed to write '{}': {}", path.display(), e),
        })
    }

    pub fn to_xml(&self) -> Result<String> {
        self.xot.to_string(self.root).map_err(|e| self.broken(e))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The `<program>` element.
    pub fn program(&self) -> Result<Node> {
        self.xot.document_element(self.root).map_err(|e| self.broken(e))
    }

    /// The `name` of the program, falling back to the label.
    pub fn name(&self) -> String {
        self.program()
            .ok()
            .and_then(|p| self.attr(p, "name"))
            .unwrap_or(self.label.as_str())
            .to_string()
    }

    /// The `<objects>` element, if the program has one.
    pub fn objects(&self) -> Option<Node> {
        let program = self.program().ok()?;
        self.xot
            .children(program)
            .find(|&child| self.is_element_named(child, "objects"))
    }

    /// The `<o>` children of `<objects>`.
    pub fn top_objects(&self) -> Vec<Node> {
        self.objects()
            .map(|objects| self.child_objects(objects))
            .unwrap_or_default()
    }

    /// Every `<o>` element in document order.
    pub fn all_objects(&self) -> Vec<Node> {
        self.xot
            .descendants(self.root)
            .filter(|&node| self.is_o(node))
            .collect()
    }

    /// The `<o>` children of `node`.
    pub fn child_objects(&self, node: Node) -> Vec<Node> {
        self.xot
            .children(node)
            .filter(|&child| self.is_o(child))
            .collect()
    }

    /// The enclosing `<o>` of `node`, if any.
    pub fn parent_o(&self, node: Node) -> Option<Node> {
        self.xot.parent(node).filter(|&parent| self.is_o(parent))
    }

    pub fn is_o(&self, node: Node) -> bool {
        self.is_element_named(node, "o")
    }

    pub fn attr(&self, node: Node, key: &str) -> Option<&str> {
        let name = self.xot.name(key)?;
        self.xot.get_attribute(node, name)
    }

    pub fn has_attr(&self, node: Node, key: &str) -> bool {
        self.attr(node, key).is_some()
    }

    pub fn set_attr(&mut self, node: Node, key: &str, value: &str) {
        let name = self.xot.add_name(key);
        self.xot.set_attribute(node, name, value);
    }

    pub fn remove_attr(&mut self, node: Node, key: &str) {
        if let Some(name) = self.xot.name(key) {
            self.xot.remove_attribute(node, name);
        }
    }

    /// A new detached `<o>` element.
    pub fn new_o(&mut self) -> Node {
        let name = self.xot.add_name("o");
        self.xot.new_element(name)
    }

    pub fn append(&mut self, parent: Node, child: Node) -> Result<()> {
        self.xot.append(parent, child).map_err(|e| self.broken(e))
    }

    pub fn detach(&mut self, node: Node) -> Result<()> {
        self.xot.detach(node).map_err(|e| self.broken(e))
    }

    pub fn insert_before(&mut self, reference: Node, node: Node) -> Result<()> {
        self.xot
            .insert_before(reference, node)
            .map_err(|e| self.broken(e))
    }

    /// All text inside `node`, concatenated.
    pub fn text(&self, node: Node) -> String {
        self.xot
            .descendants(node)
            .filter_map(|n| self.xot.text_str(n))
            .collect()
    }

    /// Names of the objects this document refers to but doesn't define.
    ///
    /// A name with a `ver` attribute becomes `name|ver`. Any `vararg`
    /// application adds the tuple object.
    pub fn foreign_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self
            .all_objects()
            .into_iter()
            .filter(|&node| FOREIGN.iter().all(|(_, test)| test(self, node)))
            .filter_map(|node| {
                let base = self.attr(node, "base")?;
                let name = match self.attr(node, "ver") {
                    Some(ver) if !ver.is_empty() => {
                        format!("{}{}{}", base, VERSION_DELIMITER, ver)
                    }
                    _ => base.to_string(),
                };
                Some(name)
            })
            .filter(|name| !name.is_empty())
            .collect();
        if self.has_vararg() {
            names.insert(TUPLE.to_string());
        }
        names
    }

    pub fn has_vararg(&self) -> bool {
        self.all_objects()
            .into_iter()
            .any(|node| self.has_attr(node, "vararg"))
    }

    /// Native inserts, in document order.
    ///
    /// The first child of an insert holds the code; the optional second one
    /// lists dependencies as `crate:version` strings.
    pub fn inserts(&self) -> Result<Vec<Insert>> {
        let mut inserts = Vec::new();
        for node in self.all_objects() {
            if self.attr(node, "base") != Some(RUST) {
                continue;
            }
            let children = self.child_objects(node);
            let code = children.first().map(|&c| self.text(c)).ok_or_else(|| {
                Error::Document {
                    path: self.label.clone(),
                    message: format!("Native insert at line {} has no code", self.line(node)),
                }
            })?;
            let mut dependencies = Vec::new();
            if let Some(&list) = children.get(1) {
                for dep in self.child_objects(list) {
                    let text = self.text(dep);
                    let (krate, version) =
                        text.trim().split_once(':').ok_or_else(|| Error::Document {
                            path: self.label.clone(),
                            message: format!(
                                "Native dependency '{}' must be 'crate:version'",
                                text.trim()
                            ),
                        })?;
                    dependencies.push((krate.to_string(), version.to_string()));
                }
            }
            let locator = match self.attr(node, "loc") {
                Some(loc) => loc.to_string(),
                None => format!("{}:{}", self.name(), self.line(node)),
            };
            inserts.push(Insert {
                locator,
                code,
                dependencies,
            });
        }
        Ok(inserts)
    }

    fn line(&self, node: Node) -> &str {
        self.attr(node, "line").unwrap_or("0")
    }

    fn is_element_named(&self, node: Node, local: &str) -> bool {
        match (self.xot.element(node), self.xot.name(local)) {
            (Some(element), Some(name)) => element.name() == name,
            _ => false,
        }
    }

    fn broken(&self, e: impl Display) -> Error {
        Error::Document {
            path: self.label.clone(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = r#"<program name="org.example.app">
  <objects>
    <o abstract="" name="app" line="1" pos="0">
      <o base="stdout" line="2" pos="2"/>
      <o base="org.eolang.txt.sprintf" ver="0.28.10" line="3" pos="2"/>
      <o base="$" line="4" pos="2"/>
      <o base=".plus" line="5" pos="2"/>
      <o base="x" ref="1" line="6" pos="2"/>
      <o base="" line="7" pos="2"/>
    </o>
  </objects>
</program>"#;

    #[test]
    fn test_foreign_names() {
        let doc = Xmir::parse(APP, "app.xmir").unwrap();
        let names: Vec<String> = doc.foreign_names().into_iter().collect();
        assert_eq!(
            names,
            vec![
                "org.eolang.txt.sprintf|0.28.10".to_string(),
                "stdout".to_string()
            ]
        );
    }

    #[test]
    fn test_vararg_adds_tuple() {
        let doc = Xmir::parse(
            r#"<program><objects><o base="org.eolang.io.stdout" vararg=""/></objects></program>"#,
            "v.xmir",
        )
        .unwrap();
        assert!(doc.has_vararg());
        assert!(doc.foreign_names().contains(TUPLE));
    }

    #[test]
    fn test_broken_xml() {
        let err = Xmir::parse("<program>", "broken.xmir").unwrap_err();
        assert!(matches!(err, Error::Document { path, .. } if path == "broken.xmir"));
    }

    #[test]
    fn test_debug_names_the_document() {
        let doc = Xmir::parse(APP, "app.xmir").unwrap();
        assert!(format!("{:?}", doc).contains("app.xmir"));
        assert!(format!("{:?}", Xmir::parse("<program/>", "ok.xmir")).starts_with("Ok(Xmir"));
    }

    #[test]
    fn test_attribute_editing() {
        let mut doc = Xmir::parse(APP, "app.xmir").unwrap();
        let app = doc.top_objects()[0];
        doc.set_attr(app, "level", "1");
        assert_eq!(doc.attr(app, "level"), Some("1"));
        doc.remove_attr(app, "level");
        assert!(!doc.has_attr(app, "level"));
        doc.remove_attr(app, "never-there");
    }

    #[test]
    fn test_structure_navigation() {
        let doc = Xmir::parse(APP, "app.xmir").unwrap();
        assert_eq!(doc.name(), "org.example.app");
        let top = doc.top_objects();
        assert_eq!(top.len(), 1);
        let children = doc.child_objects(top[0]);
        assert_eq!(children.len(), 6);
        assert_eq!(doc.parent_o(children[0]), Some(top[0]));
        assert_eq!(doc.parent_o(top[0]), None);
        assert_eq!(doc.all_objects().len(), 7);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("a/b/app.xmir");
        let doc = Xmir::parse(APP, "app.xmir").unwrap();
        doc.save(&path).unwrap();
        let loaded = Xmir::load(&path).unwrap();
        assert_eq!(loaded.foreign_names(), doc.foreign_names());
    }

    #[test]
    fn test_inserts() {
        let doc = Xmir::parse(
            r#"<program name="org.example.native"><objects>
  <o abstract="" name="native" line="1">
    <o base="org.eolang.rust" line="2" pos="4">
      <o base="string" data="string">pub fn foo() -> i32 { 42 }</o>
      <o base="array">
        <o base="string" data="string">rand:0.5.5</o>
      </o>
    </o>
    <o base="org.eolang.rust" loc="Φ.org.example.native.φ" line="9">
      <o base="string" data="string">pub fn bar() {}</o>
    </o>
  </o>
</objects></program>"#,
            "native.xmir",
        )
        .unwrap();
        let inserts = doc.inserts().unwrap();
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[0].locator, "org.example.native:2");
        assert!(inserts[0].code.contains("pub fn foo() -> i32"));
        assert_eq!(
            inserts[0].dependencies,
            vec![("rand".to_string(), "0.5.5".to_string())]
        );
        assert_eq!(inserts[1].locator, "Φ.org.example.native.φ");
        assert!(inserts[1].dependencies.is_empty());
    }

    #[test]
    fn test_insert_with_bad_dependency() {
        let doc = Xmir::parse(
            r#"<program><objects><o base="org.eolang.rust" line="3">
<o base="string">fn x() {}</o><o base="array"><o base="string">rand</o></o>
</o></objects></program>"#,
            "bad.xmir",
        )
        .unwrap();
        assert!(doc.inserts().is_err());
    }
}
