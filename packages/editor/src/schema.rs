//! # Schema Table
//!
//! Which child kinds a container admits, in what order, with what
//! cardinality. Built once, immutable, passed by reference: there is no
//! global singleton; every resolver call receives the table explicitly.

use crate::ElementKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One allowed child kind in a container, with cardinality bounds.
///
/// `max == 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSpec {
    pub kind: ElementKind,
    pub min: u32,
    pub max: u32,
}

impl KindSpec {
    pub fn new(kind: ElementKind, min: u32, max: u32) -> Self {
        Self { kind, min, max }
    }

    /// At most one occurrence.
    pub fn one(kind: ElementKind) -> Self {
        Self::new(kind, 0, 1)
    }

    /// Any number of occurrences.
    pub fn many(kind: ElementKind) -> Self {
        Self::new(kind, 0, 0)
    }

    /// At least one occurrence, no upper bound.
    pub fn required(kind: ElementKind) -> Self {
        Self::new(kind, 1, 0)
    }

    /// The free-content slot: any kind not otherwise listed.
    pub fn wildcard() -> Self {
        Self::many(ElementKind::Wildcard)
    }
}

/// Ordered child-kind sequence for one container.
///
/// The order is the canonical child order enforced on insertion. At most one
/// wildcard slot may appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSchema {
    specs: Vec<KindSpec>,
}

impl ContainerSchema {
    pub fn new(specs: Vec<KindSpec>) -> Self {
        debug_assert!(
            specs
                .iter()
                .filter(|s| s.kind == ElementKind::Wildcard)
                .count()
                <= 1
        );
        Self { specs }
    }

    pub fn specs(&self) -> &[KindSpec] {
        &self.specs
    }

    /// Rank of an explicitly requested kind. A request for a kind the
    /// schema does not name fails; it must not fall back to the wildcard
    /// slot.
    pub fn request_rank(&self, kind: ElementKind) -> Option<usize> {
        self.specs.iter().position(|s| s.kind == kind)
    }

    /// Rank used to order an existing child: its named slot, or the
    /// wildcard slot for kinds not named, or `None` if the schema has no
    /// wildcard slot either (such children are inert for ordering).
    pub fn child_rank(&self, kind: ElementKind) -> Option<usize> {
        self.request_rank(kind)
            .or_else(|| self.request_rank(ElementKind::Wildcard))
    }
}

/// Mapping from container kind to its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaTable {
    schemas: HashMap<ElementKind, ContainerSchema>,
}

impl SchemaTable {
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// The FictionBook container schemas.
    pub fn standard() -> Self {
        use ElementKind::*;
        let mut table = Self::empty();

        table.register(
            Body,
            ContainerSchema::new(vec![
                KindSpec::one(Image),
                KindSpec::one(Title),
                KindSpec::many(Epigraph),
                KindSpec::wildcard(),
            ]),
        );

        table.register(
            Section,
            ContainerSchema::new(vec![
                KindSpec::one(Title),
                KindSpec::many(Epigraph),
                KindSpec::one(Image),
                KindSpec::one(Annotation),
                KindSpec::wildcard(),
            ]),
        );

        table.register(
            Poem,
            ContainerSchema::new(vec![
                KindSpec::one(Title),
                KindSpec::many(Epigraph),
                KindSpec::required(Stanza),
                KindSpec::wildcard(),
                KindSpec::many(TextAuthor),
                KindSpec::one(Date),
            ]),
        );

        table.register(
            Stanza,
            ContainerSchema::new(vec![
                KindSpec::one(Title),
                KindSpec::one(Subtitle),
                KindSpec::wildcard(),
            ]),
        );

        table.register(
            Epigraph,
            ContainerSchema::new(vec![KindSpec::wildcard(), KindSpec::many(TextAuthor)]),
        );

        table.register(
            Cite,
            ContainerSchema::new(vec![KindSpec::wildcard(), KindSpec::many(TextAuthor)]),
        );

        table
    }

    pub fn register(&mut self, container: ElementKind, schema: ContainerSchema) {
        self.schemas.insert(container, schema);
    }

    /// Pure, total lookup: containers without a schema yield `None`.
    pub fn lookup(&self, container: ElementKind) -> Option<&ContainerSchema> {
        self.schemas.get(&container)
    }
}
