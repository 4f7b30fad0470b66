//! Error types for the editor

use crate::ElementKind;
use fb2_dom::DomError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("no schema registered for container kind `{0}`")]
    SchemaMiss(ElementKind),

    #[error("kind `{kind}` is not allowed inside `{container}`")]
    KindMiss {
        container: ElementKind,
        kind: ElementKind,
    },

    #[error("captured reference no longer matches the live tree")]
    StaleReference,

    #[error("element has no previous sibling")]
    NoPreviousSibling,

    #[error("element has no parent at this level")]
    NoParent,

    #[error("tree error: {0}")]
    Dom(#[from] DomError),
}
