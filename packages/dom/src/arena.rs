//! # Node Arena
//!
//! Slot-based storage for document nodes with generation tracking.
//!
//! ## Design
//!
//! - Nodes live in a `Vec` of slots; freed slots are recycled
//! - Every recycle bumps the slot generation, invalidating old ids
//! - Sibling/child relationships are doubly-linked id fields, so attach and
//!   detach are O(1) link surgery that never touches subtree contents
//! - A detached subtree stays allocated; only [`Tree::remove`] frees it

use crate::DomError;
use serde::{Deserialize, Serialize};

/// Opaque handle to one node in a [`Tree`].
///
/// Copyable and cheap. A `NodeId` outlives detach/reattach cycles but not
/// [`Tree::remove`]; after removal [`Tree::contains`] reports `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    /// Markup element with a tag name and attributes in document order.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },

    /// Inline text content.
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The document tree.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element node.
    pub fn new_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.into(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached element node with a single attribute.
    pub fn new_element_with_attr(
        &mut self,
        tag: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.into(),
            attrs: vec![(name.into(), value.into())],
        })
    }

    /// Create a detached text node.
    pub fn new_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(data));
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(Node::new(data)),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn require(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::Stale)
    }

    // All links are maintained pairwise, so a live id always has a node.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id).expect("live node id")
    }

    /// Whether `id` still refers to a node in the arena (attached or not).
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Whether `id` is live but not attached to any parent.
    pub fn is_detached(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.parent.is_none())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    /// Tag name of an element node; `None` for text nodes and stale ids.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Attribute value by exact name; `None` if absent or not an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let name = name.into();
        let value = value.into();
        match &mut self.get_mut(id).ok_or(DomError::Stale)?.data {
            NodeData::Element { attrs, .. } => {
                if let Some(entry) = attrs.iter_mut().find(|(n, _)| *n == name) {
                    entry.1 = value;
                } else {
                    attrs.push((name, value));
                }
                Ok(())
            }
            NodeData::Text(_) => Err(DomError::NotAnElement),
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Iterate the direct children of `id` in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.first_child(id);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_sibling(current);
            Some(current)
        })
    }

    fn check_attachable(&self, node: NodeId, anchor: NodeId) -> Result<(), DomError> {
        let n = self.require(node)?;
        self.require(anchor)?;
        if n.parent.is_some() {
            return Err(DomError::AlreadyAttached);
        }
        // Reattaching an ancestor below one of its own descendants would
        // orphan the loop from the rest of the tree.
        let mut cursor = Some(anchor);
        while let Some(current) = cursor {
            if current == node {
                return Err(DomError::WouldCycle);
            }
            cursor = self.parent(current);
        }
        Ok(())
    }

    /// Attach a detached `node` as the first child of `parent`.
    pub fn prepend_inside(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.check_attachable(node, parent)?;
        let old_first = self.require(parent)?.first_child;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = None;
            n.next_sibling = old_first;
        }
        match old_first {
            Some(first) => self.node_mut(first).prev_sibling = Some(node),
            None => self.node_mut(parent).last_child = Some(node),
        }
        self.node_mut(parent).first_child = Some(node);
        Ok(())
    }

    /// Attach a detached `node` as the last child of `parent`.
    pub fn append_inside(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.check_attachable(node, parent)?;
        let old_last = self.require(parent)?.last_child;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = old_last;
            n.next_sibling = None;
        }
        match old_last {
            Some(last) => self.node_mut(last).next_sibling = Some(node),
            None => self.node_mut(parent).first_child = Some(node),
        }
        self.node_mut(parent).last_child = Some(node);
        Ok(())
    }

    /// Attach a detached `node` immediately before `sibling`.
    pub fn prepend_outside(&mut self, sibling: NodeId, node: NodeId) -> Result<(), DomError> {
        self.check_attachable(node, sibling)?;
        let s = self.require(sibling)?;
        let parent = s.parent.ok_or(DomError::NoParent)?;
        let prev = s.prev_sibling;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = Some(sibling);
        }
        self.node_mut(sibling).prev_sibling = Some(node);
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(node),
            None => self.node_mut(parent).first_child = Some(node),
        }
        Ok(())
    }

    /// Attach a detached `node` immediately after `sibling`.
    pub fn append_outside(&mut self, sibling: NodeId, node: NodeId) -> Result<(), DomError> {
        self.check_attachable(node, sibling)?;
        let s = self.require(sibling)?;
        let parent = s.parent.ok_or(DomError::NoParent)?;
        let next = s.next_sibling;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = Some(sibling);
            n.next_sibling = next;
        }
        self.node_mut(sibling).next_sibling = Some(node);
        match next {
            Some(next) => self.node_mut(next).prev_sibling = Some(node),
            None => self.node_mut(parent).last_child = Some(node),
        }
        Ok(())
    }

    /// Detach `node` from its parent, keeping the whole subtree alive.
    ///
    /// The returned id is the same as `node`; reattaching it restores the
    /// subtree contents unchanged.
    pub fn take_from_document(&mut self, node: NodeId) -> Result<NodeId, DomError> {
        let n = self.require(node)?;
        let parent = n.parent.ok_or(DomError::Detached)?;
        let prev = n.prev_sibling;
        let next = n.next_sibling;
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let n = self.node_mut(node);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
        Ok(node)
    }

    /// Free a detached subtree. All ids into it become stale.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.is_detached(node) {
            return match self.get(node) {
                Some(_) => Err(DomError::AlreadyAttached),
                None => Err(DomError::Stale),
            };
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            let slot = &mut self.slots[id.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
        Ok(())
    }

    /// Compact structural rendering of a subtree, for assertions and logs.
    ///
    /// Elements render as `tag` or `tag.class`, children in parentheses,
    /// text nodes as quoted strings.
    pub fn outline(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return "<stale>".to_string();
        };
        let mut out = String::new();
        match &node.data {
            NodeData::Element { tag, attrs } => {
                out.push_str(tag);
                if let Some((_, class)) = attrs.iter().find(|(n, _)| n == "class") {
                    out.push('.');
                    out.push_str(class);
                }
                let children: Vec<String> =
                    self.children(id).map(|c| self.outline(c)).collect();
                if !children.is_empty() {
                    out.push('(');
                    out.push_str(&children.join(","));
                    out.push(')');
                }
            }
            NodeData::Text(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
        }
        out
    }
}
