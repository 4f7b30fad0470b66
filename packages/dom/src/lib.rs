//! # fb2-dom
//!
//! Generational-arena document tree for FictionBook-style markup.
//!
//! The tree owns every node; the rest of the workspace only holds [`NodeId`]
//! handles. Ids carry a generation, so a handle to a removed node is
//! detectably stale instead of dangling. Detaching a subtree
//! ([`Tree::take_from_document`]) keeps it alive with the same id, which is
//! what lets edit commands reattach it byte-for-byte on undo.
//!
//! ## Navigation
//!
//! All navigation queries return `Option<NodeId>`: `None` is the legal
//! "null handle" (past the end of a sibling list, the root's parent, a stale
//! id) and chains safely.

mod arena;
mod error;

pub use arena::{NodeData, NodeId, Tree};
pub use error::DomError;
