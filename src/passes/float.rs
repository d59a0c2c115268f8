use xot::Node;

use crate::document::Xmir;
use crate::error::{Error, Result};

/// Separator between the names of an abstract object and its ancestors
/// once it floats up.
pub const SCOPE_DELIMITER: char = '$';

/// Move every nested abstract declaration to the `objects` level.
///
/// The deepest declarations move first, so a declaration nested three
/// levels down ends up as `a$b$c` and `a$b` follows it. The original place
/// keeps `<o base="a$b$c" name="c"/>` with the same `line` and `pos`.
pub fn abstracts_float_up(doc: &mut Xmir) -> Result<()> {
    let objects = doc.objects().ok_or_else(|| Error::Document {
        path: doc.label().to_string(),
        message: "No <objects> element".to_string(),
    })?;
    let mut nested: Vec<(usize, Node)> = doc
        .all_objects()
        .into_iter()
        .filter(|&node| doc.has_attr(node, "abstract") && doc.parent_o(node).is_some())
        .map(|node| (depth(doc, node), node))
        .collect();
    nested.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, node) in nested {
        let own = own_name(doc, node);
        let mut chain = vec![own.clone()];
        let mut current = doc.parent_o(node);
        while let Some(parent) = current {
            chain.push(own_name(doc, parent));
            current = doc.parent_o(parent);
        }
        chain.reverse();
        let full = chain.join(&SCOPE_DELIMITER.to_string());

        let reference = doc.new_o();
        doc.set_attr(reference, "base", &full);
        if doc.has_attr(node, "name") {
            doc.set_attr(reference, "name", &own);
        }
        for key in ["line", "pos"] {
            if let Some(value) = doc.attr(node, key).map(str::to_string) {
                doc.set_attr(reference, key, &value);
            }
        }
        doc.insert_before(node, reference)?;
        doc.detach(node)?;
        doc.set_attr(node, "name", &full);
        doc.append(objects, node)?;
    }
    Ok(())
}

fn depth(doc: &Xmir, node: Node) -> usize {
    let mut depth = 0;
    let mut current = doc.parent_o(node);
    while let Some(parent) = current {
        depth += 1;
        current = doc.parent_o(parent);
    }
    depth
}

/// The name of an object, or `α<index>` for an anonymous one, where the
/// index is its position among the objects of its parent.
fn own_name(doc: &Xmir, node: Node) -> String {
    if let Some(name) = doc.attr(node, "name") {
        return name.to_string();
    }
    let index = doc
        .parent_o(node)
        .map(|parent| {
            doc.child_objects(parent)
                .iter()
                .position(|&n| n == node)
                .unwrap_or(0)
        })
        .unwrap_or(0);
    format!("α{}", index)
}
