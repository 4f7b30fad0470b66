//! # fb2-editor
//!
//! Schema-constrained structural editing for FictionBook-style documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ fb2-dom: generational arena, node surgery   │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ fb2-editor                                  │
//! │  - SchemaTable: legal child kinds + order   │
//! │  - resolve: insertion point for a new kind  │
//! │  - Command: reversible structural edits     │
//! │  - History: strict undo/redo stack          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Schema decides placement**: every insertion goes through the
//!    resolver, so children stay in canonical order
//! 2. **Commands are the only mutators**: each captures enough context at
//!    construction to apply and revert in O(1)
//! 3. **Fail closed**: a command whose captured context no longer matches
//!    the live tree refuses to run instead of corrupting it
//! 4. **Refusal is a no-op**: a rejected edit leaves the tree untouched and
//!    nothing on the history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fb2_editor::{insert_inside, ElementKind, History, SchemaTable, Tree};
//!
//! let table = SchemaTable::standard();
//! let mut tree = Tree::new();
//! let mut history = History::new();
//!
//! // section is a div.section already attached somewhere in `tree`
//! let cmd = insert_inside(&table, &mut tree, section, ElementKind::Title)?;
//! history.apply(&mut tree, cmd)?;
//!
//! history.undo(&mut tree)?;
//! history.redo(&mut tree)?;
//! ```

mod commands;
mod element;
mod errors;
mod history;
mod kind;
mod resolver;
mod schema;
mod validate;

pub use commands::{Anchor, Command};
pub use element::{
    has_child_of_kind, has_title, insert_inside, is_body, is_kind, is_section, is_stanza,
    is_title, structural_children,
};
pub use errors::EditError;
pub use history::History;
pub use kind::{classify, ElementKind};
pub use resolver::{resolve, InsertPoint};
pub use schema::{ContainerSchema, KindSpec, SchemaTable};
pub use validate::{validate_container, CardinalityViolation};

// Re-export common types for convenience
pub use fb2_dom::{DomError, NodeData, NodeId, Tree};
