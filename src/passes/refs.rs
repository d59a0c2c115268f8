use std::collections::BTreeSet;

use xot::Node;

use crate::document::{is_reflexive, Xmir};
use crate::error::{Error, Result};

/// Package unqualified names are assumed to live in.
pub const DEFAULT_PACKAGE: &str = "org.eolang";

/// Mark every reference to a declaration in scope with the line of that
/// declaration.
///
/// The enclosing objects are searched from the innermost outwards for a
/// named child matching the base, then the top-level objects. The element
/// itself never counts, nor does a declaration without a line.
pub fn add_refs(doc: &mut Xmir) -> Result<()> {
    let mut found: Vec<(Node, String)> = Vec::new();
    for node in doc.all_objects() {
        let Some(base) = doc.attr(node, "base") else {
            continue;
        };
        if let Some(line) = declaration(doc, node, base) {
            found.push((node, line));
        }
    }
    for (node, line) in found {
        doc.set_attr(node, "ref", &line);
    }
    Ok(())
}

fn declaration(doc: &Xmir, node: Node, base: &str) -> Option<String> {
    let matches = |candidate: &Node| {
        *candidate != node
            && doc.attr(*candidate, "name") == Some(base)
            && doc.has_attr(*candidate, "line")
    };
    let mut scope = doc.parent_o(node);
    while let Some(enclosing) = scope {
        if let Some(hit) = doc.child_objects(enclosing).iter().find(|c| matches(c)) {
            return doc.attr(*hit, "line").map(str::to_string);
        }
        scope = doc.parent_o(enclosing);
    }
    doc.top_objects()
        .iter()
        .find(|c| matches(c))
        .and_then(|hit| doc.attr(*hit, "line"))
        .map(str::to_string)
}

/// Qualify every unresolved, undotted, non-reflexive base with the default
/// package.
pub fn fix_missed_names(doc: &mut Xmir) -> Result<()> {
    let mut missed: Vec<(Node, String)> = Vec::new();
    for node in doc.all_objects() {
        if doc.has_attr(node, "ref") {
            continue;
        }
        if let Some(base) = doc.attr(node, "base") {
            if !base.is_empty() && !base.contains('.') && !is_reflexive(base) {
                missed.push((node, format!("{}.{}", DEFAULT_PACKAGE, base)));
            }
        }
    }
    for (node, base) in missed {
        doc.set_attr(node, "base", &base);
    }
    Ok(())
}

/// Fail if any `ref` doesn't match the `line` of some object.
pub fn broken_refs(doc: &mut Xmir) -> Result<()> {
    let objects = doc.all_objects();
    let lines: BTreeSet<&str> = objects
        .iter()
        .filter_map(|&node| doc.attr(node, "line"))
        .collect();
    let broken: Vec<&str> = objects
        .iter()
        .filter_map(|&node| doc.attr(node, "ref"))
        .filter(|r| !lines.contains(r))
        .collect();
    if broken.is_empty() {
        Ok(())
    } else {
        Err(Error::BrokenRefs {
            document: doc.label().to_string(),
            refs: broken.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(objects: &str) -> Xmir {
        Xmir::parse(
            &format!("<program><objects>{}</objects></program>", objects),
            "refs.xmir",
        )
        .unwrap()
    }

    fn bases_and_refs(doc: &Xmir) -> Vec<(String, Option<String>)> {
        doc.all_objects()
            .into_iter()
            .filter_map(|n| {
                let base = doc.attr(n, "base")?.to_string();
                Some((base, doc.attr(n, "ref").map(str::to_string)))
            })
            .collect()
    }

    #[test]
    fn test_add_refs_to_enclosing_and_top_level() {
        let mut doc = doc(
            r#"<o abstract="" name="main" line="1">
  <o name="x" line="2"/>
  <o base="x" line="3"/>
  <o base="helper" line="4"/>
  <o base="stdout" line="5"/>
</o>
<o abstract="" name="helper" line="7"/>"#,
        );
        add_refs(&mut doc).unwrap();
        assert_eq!(
            bases_and_refs(&doc),
            vec![
                ("x".to_string(), Some("2".to_string())),
                ("helper".to_string(), Some("7".to_string())),
                ("stdout".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_add_refs_prefers_inner_scope() {
        let mut doc = doc(
            r#"<o abstract="" name="x" line="1">
  <o name="x" line="2"/>
  <o base="x" line="3"/>
</o>"#,
        );
        add_refs(&mut doc).unwrap();
        assert_eq!(bases_and_refs(&doc)[0].1.as_deref(), Some("2"));
    }

    #[test]
    fn test_add_refs_skips_self_and_lineless() {
        let mut doc = doc(r#"<o base="me" name="me" line="1"/><o name="ghost"/><o base="ghost" line="2"/>"#);
        add_refs(&mut doc).unwrap();
        assert!(bases_and_refs(&doc).iter().all(|(_, r)| r.is_none()));
    }

    #[test]
    fn test_fix_missed_names() {
        let mut doc = doc(
            r#"<o base="stdout" line="1"/><o base="org.example.x" line="2"/><o base=".plus" line="3"/><o base="^" line="4"/><o base="y" ref="1" line="5"/>"#,
        );
        fix_missed_names(&mut doc).unwrap();
        let bases: Vec<String> = bases_and_refs(&doc).into_iter().map(|(b, _)| b).collect();
        assert_eq!(
            bases,
            vec!["org.eolang.stdout", "org.example.x", ".plus", "^", "y"]
        );
    }

    #[test]
    fn test_broken_refs() {
        let mut ok = doc(r#"<o name="a" line="1"/><o base="a" ref="1" line="2"/>"#);
        assert!(broken_refs(&mut ok).is_ok());
        let mut broken = doc(r#"<o name="a" line="1"/><o base="a" ref="42" line="2"/>"#);
        let err = broken_refs(&mut broken).unwrap_err();
        assert!(matches!(err, Error::BrokenRefs { refs, .. } if refs == "42"));
    }
}
