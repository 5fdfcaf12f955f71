// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node storage, hierarchy mutation, accessors.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Size, Vec2};
use trellis_signal::Signal;
use trellis_text::{Clipboard, MemoryClipboard, MonospaceMeasure, TextMeasure};

use crate::attributes::{AttrKey, AttrType, Attributes};
use crate::content::{Content, TextField};
use crate::error::TreeError;
use crate::signals::{NodeSignals, ParentChanged};
use crate::types::{Dim2, LocalNode, NodeFlags, NodeId};

/// The scene tree.
///
/// Nodes live in a generational arena; a [`NodeId`] of a removed node is
/// stale and every accessor treats it as absent. The tree owns a root
/// container node sized to the drawing surface. Nodes attached (directly or
/// transitively) to the root container are painted, updated and hit tested;
/// detached nodes keep their state but are inert.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use trellis_tree::{Dim2, LocalNode, Tree};
///
/// let mut tree = Tree::new(Size::new(200.0, 100.0));
/// let root = tree.root();
///
/// // Half the container's width, 10 units in from the left.
/// let panel = tree
///     .insert(
///         root,
///         LocalNode {
///             position: Dim2::absolute(10.0, 0.0),
///             size: Dim2::new((0.0, 20.0).into(), (0.5, 0.0).into()),
///             ..LocalNode::default()
///         },
///     )
///     .unwrap();
///
/// assert_eq!(tree.layout_rect(panel), Some(Rect::new(10.0, 0.0, 110.0, 20.0)));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    container_size: Size,
    pub(crate) focused: Option<NodeId>,
    pub(crate) measure: Rc<dyn TextMeasure>,
    pub(crate) clipboard: Box<dyn Clipboard>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("container_size", &self.container_size)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) local: LocalNode,
    pub(crate) canvas_position: Vec2,
    pub(crate) goal_canvas_position: Vec2,
    pub(crate) attributes: Attributes,
    pub(crate) signals: NodeSignals,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            canvas_position: Vec2::ZERO,
            goal_canvas_position: Vec2::ZERO,
            attributes: Attributes::default(),
            signals: NodeSignals::default(),
        }
    }
}

impl Tree {
    /// Create a tree whose root container covers `container_size`.
    ///
    /// Text is measured with [`MonospaceMeasure`] and the clipboard is private
    /// to the tree until replaced with [`Tree::set_measure`] and
    /// [`Tree::set_clipboard`].
    pub fn new(container_size: Size) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            container_size,
            focused: None,
            measure: Rc::new(MonospaceMeasure::default()),
            clipboard: Box::new(MemoryClipboard::new()),
        };
        tree.root = tree.create(LocalNode {
            size: Dim2::FULL,
            ..LocalNode::default()
        });
        tree
    }

    /// The root container. Top-level nodes are its children.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Size of the root container (the drawing surface).
    pub fn container_size(&self) -> Size {
        self.container_size
    }

    /// Resize the root container.
    pub fn set_container_size(&mut self, size: Size) {
        self.container_size = size;
    }

    /// Text measurement used for layout, caret placement and painting.
    pub fn measure(&self) -> Rc<dyn TextMeasure> {
        Rc::clone(&self.measure)
    }

    /// Replace the text measurement.
    pub fn set_measure(&mut self, measure: Rc<dyn TextMeasure>) {
        self.measure = measure;
    }

    /// Replace the clipboard used by text fields.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    /// The clipboard used by text fields.
    pub fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        &mut *self.clipboard
    }

    /// Create a detached node.
    pub fn create(&mut self, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a node and attach it as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, local: LocalNode) -> Result<NodeId, TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::StaleNode(parent));
        }
        let id = self.create(local);
        self.attach(id, parent)?;
        Ok(id)
    }

    /// Attach `child` as the last child of `parent`, detaching it from its
    /// current parent first.
    ///
    /// Fails without touching the tree if either node is stale, if `child`
    /// is the root container, or if `parent` is `child` or one of its
    /// descendants.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), TreeError> {
        if !self.is_alive(child) {
            return Err(TreeError::StaleNode(child));
        }
        if !self.is_alive(parent) {
            return Err(TreeError::StaleNode(parent));
        }
        if child == self.root {
            return Err(TreeError::RootContainer);
        }
        if self.is_in_subtree(parent, child) {
            return Err(TreeError::Cycle { child, parent });
        }
        let old = self.node(child).parent;
        if old == Some(parent) {
            // Re-attaching moves the node to the end of its siblings.
            self.node_mut(parent).children.retain(|c| *c != child);
            self.node_mut(parent).children.push(child);
            return Ok(());
        }
        if let Some(old_parent) = old {
            self.unlink_parent(child, old_parent);
        }
        self.link_parent(child, parent);
        tracing::debug!(?child, ?parent, ?old, "attach");
        self.after_reparent(child, old, Some(parent));
        Ok(())
    }

    /// Detach `id` from its parent. A detached subtree is neither painted
    /// nor hit tested. Detaching a node without a parent does nothing.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::StaleNode(id));
        }
        if id == self.root {
            return Err(TreeError::RootContainer);
        }
        let Some(old) = self.node(id).parent else {
            return Ok(());
        };
        self.unlink_parent(id, old);
        tracing::debug!(node = ?id, parent = ?old, "detach");
        self.after_reparent(id, Some(old), None);
        Ok(())
    }

    /// Remove a node and its subtree. Their identifiers become stale.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::StaleNode(id));
        }
        if id == self.root {
            return Err(TreeError::RootContainer);
        }
        if self.focused.is_some_and(|f| self.is_in_subtree(f, id)) {
            self.blur_text();
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        tracing::debug!(node = ?id, "remove");
        self.free_subtree(id);
        Ok(())
    }

    /// Deep copy of a subtree: configuration, scroll state, attributes and
    /// content of every node, without signal listeners. The copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::StaleNode(id));
        }
        if id == self.root {
            return Err(TreeError::RootContainer);
        }
        Ok(self.clone_recursive(id))
    }

    fn clone_recursive(&mut self, id: NodeId) -> NodeId {
        let (mut local, canvas, goal, attributes, children) = {
            let n = self.node(id);
            (
                n.local.clone(),
                n.canvas_position,
                n.goal_canvas_position,
                n.attributes.clone(),
                n.children.clone(),
            )
        };
        if let Content::TextField(field) = &mut local.content {
            field.editor.blur();
        }
        let copy = self.create(local);
        {
            let n = self.node_mut(copy);
            n.canvas_position = canvas;
            n.goal_canvas_position = goal;
            n.attributes = attributes;
        }
        for child in children {
            let child_copy = self.clone_recursive(child);
            self.link_parent(child_copy, copy);
        }
        copy
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is the root container or one of its descendants.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.is_in_subtree(id, self.root)
    }

    /// Returns true if `id` is `ancestor` or one of its descendants.
    pub fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    /// Number of live nodes, including the root container.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Always `false`: the root container is a node.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the parent of a node if live, or `None` for detached nodes,
    /// the root container, or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Get the children of a node in insertion order, or an empty slice if
    /// the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Children ordered for painting: ascending z-index, insertion order
    /// among equal z-indices. Hit testing uses the reverse of this order.
    pub fn paint_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self.children_of(id).to_vec();
        children.sort_by_key(|c| self.node(*c).local.z_index);
        children
    }

    /// The node's configuration.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// The node's configuration, mutably.
    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut LocalNode> {
        self.node_opt_mut(id).map(|n| &mut n.local)
    }

    /// The node's content.
    pub fn content(&self, id: NodeId) -> Option<&Content> {
        self.local(id).map(|l| &l.content)
    }

    /// The node's content, mutably.
    pub fn content_mut(&mut self, id: NodeId) -> Option<&mut Content> {
        self.local_mut(id).map(|l| &mut l.content)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.local(id).map(|l| l.flags)
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(l) = self.local_mut(id) {
            l.flags = flags;
        }
    }

    /// Returns `true` if the node's own visibility flag is set.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    /// Show or hide a node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(l) = self.local_mut(id) {
            l.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Returns the z-index of a node if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.local(id).map(|l| l.z_index)
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(l) = self.local_mut(id) {
            l.z_index = z;
        }
    }

    /// Sum of the z-indices of the node and its ancestors.
    ///
    /// Informational: painting and hit testing order siblings by their own
    /// z-index and paint a subtree above its parent.
    pub fn effective_z_index(&self, id: NodeId) -> Option<i32> {
        if !self.is_alive(id) {
            return None;
        }
        let mut z = 0_i32;
        let mut current = Some(id);
        while let Some(n) = current {
            if n != self.root {
                z = z.saturating_add(self.node(n).local.z_index);
            }
            current = self.node(n).parent;
        }
        Some(z)
    }

    /// The node's attribute bag.
    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.node_opt(id).map(|n| &n.attributes)
    }

    /// Store an attribute on a node.
    pub fn set_attr<T: AttrType>(&mut self, id: NodeId, key: AttrKey<T>, value: T) {
        if let Some(n) = self.node_opt_mut(id) {
            n.attributes.set(key, value);
        }
    }

    /// Read an attribute of a node.
    pub fn attr<T: AttrType>(&self, id: NodeId, key: AttrKey<T>) -> Option<T> {
        self.attributes(id).and_then(|a| a.get(key))
    }

    /// Remove an attribute from a node.
    pub fn remove_attr<T: AttrType>(&mut self, id: NodeId, key: AttrKey<T>) -> Option<T> {
        self.node_opt_mut(id).and_then(|n| n.attributes.remove(key))
    }

    /// The node's signal channels, for adding and removing listeners.
    pub fn signals_mut(&mut self, id: NodeId) -> Option<&mut NodeSignals> {
        self.node_opt_mut(id).map(|n| &mut n.signals)
    }

    /// Trigger one of a node's tree channels.
    ///
    /// The listener list is snapshotted first, so listeners may mutate the
    /// tree (including removing this node). Does nothing for stale ids.
    pub fn trigger<T>(
        &mut self,
        id: NodeId,
        select: impl FnOnce(&mut NodeSignals) -> &mut Signal<Self, T>,
        payload: &T,
    ) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let snapshot = select(&mut node.signals).snapshot();
        if !snapshot.is_empty() {
            snapshot.run(self, payload);
        }
    }

    /// Current scroll offset applied to the node's children.
    pub fn canvas_position(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.canvas_position)
    }

    /// Scroll offset the node is easing toward.
    pub fn goal_canvas_position(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.goal_canvas_position)
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// A node's text field together with the clipboard, borrowed disjointly.
    pub(crate) fn field_and_clipboard(
        &mut self,
        id: NodeId,
    ) -> Option<(&mut TextField, &mut dyn Clipboard)> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        let field = n.local.content.as_text_field_mut()?;
        Some((field, &mut *self.clipboard))
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn after_reparent(&mut self, id: NodeId, old: Option<NodeId>, new: Option<NodeId>) {
        if let Some(f) = self.focused
            && self.is_in_subtree(f, id)
            && !self.is_attached(id)
        {
            self.blur_text();
        }
        self.trigger(
            id,
            |s| &mut s.parent_changed,
            &ParentChanged { node: id, old, new },
        );
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}
