//! # Undo/Redo History
//!
//! Linear command history with strict stack discipline.
//!
//! ## Design
//!
//! - A command is pushed only after its apply succeeds
//! - Undo pops and reverts the most recent command, moving it to redo
//! - Redo reapplies the most recently undone command
//! - New commands clear the redo stack
//! - A failed revert/reapply leaves the command on its stack and the tree
//!   untouched

use crate::{Command, EditError};
use fb2_dom::{NodeId, Tree};
use tracing::debug;

/// Undo/redo stack for structural edits.
#[derive(Debug)]
pub struct History {
    /// Applied commands, most recent last.
    undo_stack: Vec<Command>,

    /// Undone commands, most recent last.
    redo_stack: Vec<Command>,

    /// Maximum number of undo levels (0 = unlimited).
    max_levels: usize,

    /// Element the host should focus after the last operation.
    selection: Option<NodeId>,
}

impl History {
    /// Create a history with the default limit of 100 undo levels.
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            selection: None,
        }
    }

    /// Apply a command and record it for undo.
    ///
    /// On failure nothing is recorded and the tree is untouched.
    pub fn apply(&mut self, tree: &mut Tree, command: Command) -> Result<(), EditError> {
        self.selection = command.apply(tree)?;
        debug!(command = command.name(), "applied edit command");

        self.undo_stack.push(command);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the future
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent command. `Ok(false)` when there is nothing to
    /// undo.
    pub fn undo(&mut self, tree: &mut Tree) -> Result<bool, EditError> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        match command.revert(tree) {
            Ok(selected) => {
                debug!(command = command.name(), "reverted edit command");
                self.selection = selected;
                self.redo_stack.push(command);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Redo the most recently undone command. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&mut self, tree: &mut Tree) -> Result<bool, EditError> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match command.apply(tree) {
            Ok(selected) => {
                debug!(command = command.name(), "reapplied edit command");
                self.selection = selected;
                self.undo_stack.push(command);
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Element the host should focus after the last apply/undo/redo.
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.selection = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{insert_inside, ElementKind, SchemaTable};

    fn section_in_tree(tree: &mut Tree) -> NodeId {
        let root = tree.new_element("html");
        let section = tree.new_element_with_attr("div", "class", "section");
        tree.append_inside(root, section).unwrap();
        section
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.selection(), None);
    }

    #[test]
    fn test_apply_undo_redo_cycle() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let section = section_in_tree(&mut tree);

        let command = insert_inside(&table, &mut tree, section, ElementKind::Title).unwrap();
        let mut history = History::new();
        history.apply(&mut tree, command).unwrap();

        let title = tree.first_child(section).unwrap();
        assert_eq!(history.selection(), Some(title));
        assert_eq!(history.undo_levels(), 1);

        assert!(history.undo(&mut tree).unwrap());
        assert_eq!(tree.first_child(section), None);
        assert_eq!(history.redo_levels(), 1);

        assert!(history.redo(&mut tree).unwrap());
        assert_eq!(tree.first_child(section), Some(title));
        assert_eq!(history.selection(), Some(title));
    }

    #[test]
    fn test_undo_empty_returns_false() {
        let mut tree = Tree::new();
        let mut history = History::new();
        assert!(!history.undo(&mut tree).unwrap());
        assert!(!history.redo(&mut tree).unwrap());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let section = section_in_tree(&mut tree);
        let mut history = History::new();

        let first = insert_inside(&table, &mut tree, section, ElementKind::Title).unwrap();
        history.apply(&mut tree, first).unwrap();
        history.undo(&mut tree).unwrap();
        assert_eq!(history.redo_levels(), 1);

        let second = insert_inside(&table, &mut tree, section, ElementKind::Epigraph).unwrap();
        history.apply(&mut tree, second).unwrap();
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let section = section_in_tree(&mut tree);
        let mut history = History::with_max_levels(2);

        for _ in 0..3 {
            let command =
                insert_inside(&table, &mut tree, section, ElementKind::Epigraph).unwrap();
            history.apply(&mut tree, command).unwrap();
        }
        assert_eq!(history.undo_levels(), 2);
    }

    #[test]
    fn test_failed_apply_records_nothing() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let section = section_in_tree(&mut tree);
        let mut history = History::new();

        let command = insert_inside(&table, &mut tree, section, ElementKind::Title).unwrap();
        history.apply(&mut tree, command).unwrap();

        // applying the same insert again is stale: the element is attached
        let err = history.apply(&mut tree, command).unwrap_err();
        assert_eq!(err, EditError::StaleReference);
        assert_eq!(history.undo_levels(), 1);
    }

    #[test]
    fn test_failed_undo_keeps_command() {
        let mut tree = Tree::new();
        let table = SchemaTable::standard();
        let section = section_in_tree(&mut tree);
        let mut history = History::new();

        let command = insert_inside(&table, &mut tree, section, ElementKind::Title).unwrap();
        history.apply(&mut tree, command).unwrap();

        // displace the title behind the history's back
        let filler = tree.new_element_with_attr("div", "class", "epigraph");
        tree.prepend_inside(section, filler).unwrap();

        assert_eq!(history.undo(&mut tree), Err(EditError::StaleReference));
        assert_eq!(history.undo_levels(), 1);
        assert!(!history.can_redo());
    }
}
