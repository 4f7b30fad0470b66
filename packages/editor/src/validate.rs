//! Schema-derived cardinality checks.
//!
//! The schema table already carries min/max counts per child kind; this
//! module compares them against a container's live children so hosts can
//! flag structurally invalid documents (a poem without a stanza, a section
//! with two titles).

use crate::element::structural_children;
use crate::{classify, ElementKind, SchemaTable};
use fb2_dom::{NodeId, Tree};
use std::collections::HashMap;

/// A child-kind count outside its schema bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityViolation {
    pub kind: ElementKind,
    pub count: usize,
    pub min: u32,
    /// 0 = unbounded.
    pub max: u32,
}

/// Check a container's structural children against its schema cardinality.
///
/// Containers without a schema have nothing to violate and yield no
/// findings. Wildcard slots are never counted.
pub fn validate_container(
    table: &SchemaTable,
    tree: &Tree,
    container: NodeId,
) -> Vec<CardinalityViolation> {
    let Some(kind) = classify(tree, container) else {
        return Vec::new();
    };
    let Some(schema) = table.lookup(kind) else {
        return Vec::new();
    };

    let mut counts: HashMap<ElementKind, usize> = HashMap::new();
    for child in structural_children(tree, container) {
        if let Some(child_kind) = classify(tree, child) {
            *counts.entry(child_kind).or_default() += 1;
        }
    }

    schema
        .specs()
        .iter()
        .filter(|spec| spec.kind != ElementKind::Wildcard)
        .filter_map(|spec| {
            let count = counts.get(&spec.kind).copied().unwrap_or(0);
            let below = (count as u32) < spec.min;
            let above = spec.max != 0 && (count as u32) > spec.max;
            (below || above).then_some(CardinalityViolation {
                kind: spec.kind,
                count,
                min: spec.min,
                max: spec.max,
            })
        })
        .collect()
}
