//! # Edit Commands
//!
//! Reversible structural edits. Each command captures its anchoring context
//! at construction and performs exactly one detach + one reattach per
//! apply/revert, so undo never has to re-derive state.
//!
//! ## Command Semantics
//!
//! ### Insert / Delete
//! - Anchor is the previous sibling at capture time, or the parent with
//!   first-child placement when there is none
//! - Insert.apply and Delete.revert report the element for the host to
//!   focus; selection itself stays host-side
//!
//! ### MoveUp
//! - Swaps the element with its previous sibling
//!
//! ### MoveLeft / MoveRight
//! - Outdent: element becomes its parent's next sibling
//! - Indent: element becomes the last child of its previous sibling
//!
//! ## Staleness
//!
//! Apply and revert re-check the captured adjacency against the live tree
//! before touching anything. If an unrelated edit has invalidated it, the
//! command fails with [`EditError::StaleReference`] and the tree is left
//! untouched.

use crate::EditError;
use fb2_dom::{NodeId, Tree};
use serde::{Deserialize, Serialize};

/// Captured placement of an element: after a sibling, or as the first child
/// of a parent when it had no previous sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    After(NodeId),
    FirstChildOf(NodeId),
}

impl Anchor {
    /// Capture the current placement of an attached element.
    fn capture(tree: &Tree, element: NodeId) -> Result<Anchor, EditError> {
        if let Some(prev) = tree.prev_sibling(element) {
            Ok(Anchor::After(prev))
        } else {
            tree.parent(element)
                .map(Anchor::FirstChildOf)
                .ok_or(EditError::NoParent)
        }
    }
}

/// A reversible structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Attach a detached element at the captured anchor.
    Insert { element: NodeId, anchor: Anchor },

    /// Detach an element, remembering where it was.
    Delete { element: NodeId, anchor: Anchor },

    /// Swap an element with its previous sibling.
    MoveUp { element: NodeId, prev: NodeId },

    /// Un-nest an element to become its parent's next sibling.
    MoveLeft {
        element: NodeId,
        prev: Option<NodeId>,
        parent: NodeId,
    },

    /// Nest an element as the last child of its previous sibling.
    MoveRight { element: NodeId, prev: NodeId },
}

impl Command {
    /// Capture a delete of an attached element.
    pub fn delete(tree: &Tree, element: NodeId) -> Result<Self, EditError> {
        if !tree.contains(element) || tree.is_detached(element) {
            return Err(EditError::StaleReference);
        }
        let anchor = Anchor::capture(tree, element)?;
        Ok(Command::Delete { element, anchor })
    }

    /// Capture a move-up. Refused when there is no previous sibling to swap
    /// with.
    pub fn move_up(tree: &Tree, element: NodeId) -> Result<Self, EditError> {
        let prev = tree
            .prev_sibling(element)
            .ok_or(EditError::NoPreviousSibling)?;
        Ok(Command::MoveUp { element, prev })
    }

    /// Capture a move-left (outdent). Refused when the element's parent is
    /// itself a root: there is no outer level to un-nest into.
    pub fn move_left(tree: &Tree, element: NodeId) -> Result<Self, EditError> {
        let parent = tree.parent(element).ok_or(EditError::NoParent)?;
        if tree.parent(parent).is_none() {
            return Err(EditError::NoParent);
        }
        Ok(Command::MoveLeft {
            element,
            prev: tree.prev_sibling(element),
            parent,
        })
    }

    /// Capture a move-right (indent). Refused when there is no previous
    /// sibling to become the new parent.
    pub fn move_right(tree: &Tree, element: NodeId) -> Result<Self, EditError> {
        let prev = tree
            .prev_sibling(element)
            .ok_or(EditError::NoPreviousSibling)?;
        Ok(Command::MoveRight { element, prev })
    }

    /// Debug name of the command kind.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Delete { .. } => "delete",
            Command::MoveUp { .. } => "move-up",
            Command::MoveLeft { .. } => "move-left",
            Command::MoveRight { .. } => "move-right",
        }
    }

    /// Apply the command. Returns the element the host should focus, if
    /// any. Checks run before any mutation; on error the tree is untouched.
    pub fn apply(&self, tree: &mut Tree) -> Result<Option<NodeId>, EditError> {
        match *self {
            Command::Insert { element, anchor } => {
                if !tree.contains(element) || !tree.is_detached(element) {
                    return Err(EditError::StaleReference);
                }
                attach_at(tree, element, anchor)?;
                Ok(Some(element))
            }
            Command::Delete { element, anchor } => {
                verify_at(tree, element, anchor)?;
                tree.take_from_document(element)?;
                Ok(None)
            }
            Command::MoveUp { element, prev } => {
                if tree.prev_sibling(element) != Some(prev) {
                    return Err(EditError::StaleReference);
                }
                tree.take_from_document(element)?;
                tree.prepend_outside(prev, element)?;
                Ok(None)
            }
            Command::MoveLeft {
                element,
                prev,
                parent,
            } => {
                if tree.parent(element) != Some(parent)
                    || tree.prev_sibling(element) != prev
                    || tree.parent(parent).is_none()
                {
                    return Err(EditError::StaleReference);
                }
                tree.take_from_document(element)?;
                tree.append_outside(parent, element)?;
                Ok(None)
            }
            Command::MoveRight { element, prev } => {
                if tree.prev_sibling(element) != Some(prev) {
                    return Err(EditError::StaleReference);
                }
                tree.take_from_document(element)?;
                tree.append_inside(prev, element)?;
                Ok(None)
            }
        }
    }

    /// Exactly reverse a previously applied command.
    pub fn revert(&self, tree: &mut Tree) -> Result<Option<NodeId>, EditError> {
        match *self {
            Command::Insert { element, anchor } => {
                verify_at(tree, element, anchor)?;
                tree.take_from_document(element)?;
                Ok(None)
            }
            Command::Delete { element, anchor } => {
                if !tree.contains(element) || !tree.is_detached(element) {
                    return Err(EditError::StaleReference);
                }
                attach_at(tree, element, anchor)?;
                Ok(Some(element))
            }
            Command::MoveUp { element, prev } => {
                if tree.next_sibling(element) != Some(prev) {
                    return Err(EditError::StaleReference);
                }
                tree.take_from_document(element)?;
                tree.append_outside(prev, element)?;
                Ok(None)
            }
            Command::MoveLeft {
                element,
                prev,
                parent,
            } => {
                if tree.prev_sibling(element) != Some(parent) {
                    return Err(EditError::StaleReference);
                }
                // The reattachment sibling must still sit inside the
                // captured parent, or the element would land in whatever
                // container it moved to since.
                if let Some(prev) = prev {
                    if tree.parent(prev) != Some(parent) {
                        return Err(EditError::StaleReference);
                    }
                }
                tree.take_from_document(element)?;
                match prev {
                    Some(prev) => tree.append_outside(prev, element)?,
                    None => tree.prepend_inside(parent, element)?,
                }
                Ok(None)
            }
            Command::MoveRight { element, prev } => {
                if tree.parent(element) != Some(prev) || tree.next_sibling(element).is_some() {
                    return Err(EditError::StaleReference);
                }
                // prev itself must still be attached somewhere, or there is
                // no sibling level to restore the element to.
                if tree.parent(prev).is_none() {
                    return Err(EditError::StaleReference);
                }
                tree.take_from_document(element)?;
                tree.append_outside(prev, element)?;
                Ok(None)
            }
        }
    }
}

fn attach_at(tree: &mut Tree, element: NodeId, anchor: Anchor) -> Result<(), EditError> {
    match anchor {
        Anchor::After(sibling) => tree.append_outside(sibling, element)?,
        Anchor::FirstChildOf(parent) => tree.prepend_inside(parent, element)?,
    }
    Ok(())
}

/// Check that `element` currently sits exactly where `anchor` says.
fn verify_at(tree: &Tree, element: NodeId, anchor: Anchor) -> Result<(), EditError> {
    if !tree.contains(element) {
        return Err(EditError::StaleReference);
    }
    let in_place = match anchor {
        Anchor::After(sibling) => tree.prev_sibling(element) == Some(sibling),
        Anchor::FirstChildOf(parent) => {
            tree.parent(element) == Some(parent) && tree.prev_sibling(element).is_none()
        }
    };
    if in_place {
        Ok(())
    } else {
        Err(EditError::StaleReference)
    }
}
