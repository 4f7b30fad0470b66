//! Error types for tree surgery

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    #[error("stale node id: the node has been removed from the arena")]
    Stale,

    #[error("node is already attached to the tree")]
    AlreadyAttached,

    #[error("node is detached from the tree")]
    Detached,

    #[error("node has no parent")]
    NoParent,

    #[error("attaching here would create a cycle")]
    WouldCycle,

    #[error("node is not an element")]
    NotAnElement,
}
