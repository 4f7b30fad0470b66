//! # Element Queries
//!
//! Classification and navigation helpers over the live tree, plus the
//! schema-constrained insertion entry point.

use crate::resolver::{resolve, InsertPoint};
use crate::{classify, Anchor, Command, EditError, ElementKind, SchemaTable};
use fb2_dom::{NodeId, Tree};
use tracing::warn;

/// Flattened list of structural children of `container`, in document order.
///
/// Inline wrapper nodes (anything that is neither a classed `div` nor an
/// `img`) are descended into rather than listed, so wrapper nesting does not
/// hide structural children from the resolver.
pub fn structural_children(tree: &Tree, container: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_into(tree, container, &mut out);
    out
}

fn collect_into(tree: &Tree, node: NodeId, out: &mut Vec<NodeId>) {
    for child in tree.children(node) {
        let Some(tag) = tree.tag_name(child) else {
            continue; // text node
        };
        if tag.eq_ignore_ascii_case("div") {
            if tree.attribute(child, "class").is_some() {
                out.push(child);
            } else {
                collect_into(tree, child, out);
            }
        } else if tag.eq_ignore_ascii_case("img") {
            out.push(child);
        } else {
            collect_into(tree, child, out);
        }
    }
}

pub fn is_kind(tree: &Tree, id: NodeId, kind: ElementKind) -> bool {
    classify(tree, id) == Some(kind)
}

/// Whether any structural child of `container` has the given kind.
pub fn has_child_of_kind(tree: &Tree, container: NodeId, kind: ElementKind) -> bool {
    structural_children(tree, container)
        .iter()
        .any(|&child| is_kind(tree, child, kind))
}

pub fn is_body(tree: &Tree, id: NodeId) -> bool {
    is_kind(tree, id, ElementKind::Body)
}

pub fn is_section(tree: &Tree, id: NodeId) -> bool {
    is_kind(tree, id, ElementKind::Section)
}

pub fn is_title(tree: &Tree, id: NodeId) -> bool {
    is_kind(tree, id, ElementKind::Title)
}

pub fn is_stanza(tree: &Tree, id: NodeId) -> bool {
    is_kind(tree, id, ElementKind::Stanza)
}

/// Whether the first structural child of `id` is a title.
pub fn has_title(tree: &Tree, id: NodeId) -> bool {
    structural_children(tree, id)
        .first()
        .is_some_and(|&child| is_title(tree, child))
}

/// Build a [`Command::Insert`] placing a new child of `kind` inside
/// `container` at the schema-resolved position.
///
/// The element is created detached; applying the returned command attaches
/// it. On refusal (no schema, kind not allowed) nothing is created and the
/// tree is untouched.
pub fn insert_inside(
    table: &SchemaTable,
    tree: &mut Tree,
    container: NodeId,
    kind: ElementKind,
) -> Result<Command, EditError> {
    let point = match resolve(table, tree, container, kind) {
        Ok(point) => point,
        Err(err) => {
            warn!(%err, %kind, "structural insertion refused");
            return Err(err);
        }
    };
    let element = new_node_for(tree, kind);
    let anchor = match point {
        InsertPoint::Prepend => Anchor::FirstChildOf(container),
        InsertPoint::After(sibling) => Anchor::After(sibling),
    };
    Ok(Command::Insert { element, anchor })
}

fn new_node_for(tree: &mut Tree, kind: ElementKind) -> NodeId {
    match kind {
        ElementKind::Image => tree.new_element("img"),
        ElementKind::Wildcard => tree.new_element("p"),
        kind => tree.new_element_with_attr("div", "class", kind.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementKind::*;

    fn classed(tree: &mut Tree, parent: NodeId, class: &str) -> NodeId {
        let node = tree.new_element_with_attr("div", "class", class);
        tree.append_inside(parent, node).unwrap();
        node
    }

    #[test]
    fn test_structural_children_flatten_wrappers() {
        let mut tree = Tree::new();
        let section = tree.new_element_with_attr("div", "class", "section");
        let title = classed(&mut tree, section, "title");

        // structural children hidden inside inline wrappers
        let wrapper = tree.new_element("span");
        tree.append_inside(section, wrapper).unwrap();
        let image = tree.new_element("img");
        tree.append_inside(wrapper, image).unwrap();
        let nested_div = tree.new_element("div"); // no class: wrapper too
        tree.append_inside(wrapper, nested_div).unwrap();
        let cite = classed(&mut tree, nested_div, "cite");

        let text = tree.new_text("stray text");
        tree.append_inside(section, text).unwrap();

        assert_eq!(
            structural_children(&tree, section),
            vec![title, image, cite]
        );
    }

    #[test]
    fn test_classification_helpers() {
        let mut tree = Tree::new();
        let body = tree.new_element_with_attr("div", "class", "body");
        let section = classed(&mut tree, body, "section");
        let title = classed(&mut tree, section, "title");

        assert!(is_body(&tree, body));
        assert!(is_section(&tree, section));
        assert!(is_title(&tree, title));
        assert!(!is_stanza(&tree, title));
        assert!(has_title(&tree, section));
        assert!(!has_title(&tree, body));
        assert!(has_child_of_kind(&tree, body, Section));
        assert!(!has_child_of_kind(&tree, body, Poem));
    }

    #[test]
    fn test_insert_inside_refusal_leaves_tree_untouched() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let root = tree.new_element("html");
        let section = classed(&mut tree, root, "section");
        classed(&mut tree, section, "title");
        let before = tree.outline(root);

        // stanza is not legal inside section
        let err = insert_inside(&table, &mut tree, section, Stanza).unwrap_err();
        assert!(matches!(err, EditError::KindMiss { .. }));
        assert_eq!(tree.outline(root), before);

        // title has no schema at all
        let title = structural_children(&tree, section)[0];
        let err = insert_inside(&table, &mut tree, title, Epigraph).unwrap_err();
        assert_eq!(err, EditError::SchemaMiss(Title));
        assert_eq!(tree.outline(root), before);
    }

    #[test]
    fn test_insert_inside_builds_detached_element() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let root = tree.new_element("html");
        let section = classed(&mut tree, root, "section");

        let command = insert_inside(&table, &mut tree, section, Title).unwrap();
        let Command::Insert { element, anchor } = command else {
            panic!("expected insert command");
        };
        assert!(tree.is_detached(element));
        assert!(is_title(&tree, element));
        assert_eq!(anchor, Anchor::FirstChildOf(section));
    }
}
