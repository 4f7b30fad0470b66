//! # Insertion Point Resolver
//!
//! Given a container and a desired child kind, find where among the
//! existing children a new child of that kind belongs so that children stay
//! in schema order. Pure query; never mutates.

use crate::element::structural_children;
use crate::{classify, EditError, ElementKind, SchemaTable};
use fb2_dom::{NodeId, Tree};

/// Where the new child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// First child of the container.
    Prepend,

    /// Immediately after this existing child.
    After(NodeId),
}

/// Resolve the insertion point for a new child of `kind` inside `container`.
///
/// Scans the container's structural children in document order and stops at
/// the first child whose schema rank is strictly greater than the new
/// kind's rank. Children whose rank cannot be determined never block
/// placement; the scan continues past them.
pub fn resolve(
    table: &SchemaTable,
    tree: &Tree,
    container: NodeId,
    kind: ElementKind,
) -> Result<InsertPoint, EditError> {
    let container_kind = classify(tree, container).unwrap_or(ElementKind::Wildcard);
    let schema = table
        .lookup(container_kind)
        .ok_or(EditError::SchemaMiss(container_kind))?;
    let rank = schema.request_rank(kind).ok_or(EditError::KindMiss {
        container: container_kind,
        kind,
    })?;

    let mut point = InsertPoint::Prepend;
    for child in structural_children(tree, container) {
        match classify(tree, child).and_then(|k| schema.child_rank(k)) {
            Some(child_rank) if child_rank > rank => break,
            _ => point = InsertPoint::After(child),
        }
    }
    Ok(point)
}
