// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node signal channels and their payloads.

use alloc::string::String;

use kurbo::{Point, Rect, Vec2};
use trellis_signal::Signal;

use crate::surface::Surface;
use crate::tree::Tree;
use crate::types::NodeId;

/// Identifier of a pointer (a mouse, or one touch contact).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// Payload of the pointer-down, pointer-up, enter, leave and move channels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// The node the listener is attached to.
    pub node: NodeId,
    /// The pointer.
    pub pointer: PointerId,
    /// Pointer position in surface coordinates.
    pub position: Point,
    /// Movement since the previous dispatched sample.
    pub delta: Vec2,
}

/// Payload of the scroll channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    /// The node the listener is attached to.
    pub node: NodeId,
    /// The pointer.
    pub pointer: PointerId,
    /// Pointer position in surface coordinates.
    pub position: Point,
    /// Wheel delta accumulated since the previous dispatch.
    pub delta: Vec2,
}

/// Payload of the parent-changed channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParentChanged {
    /// The node that moved.
    pub node: NodeId,
    /// Previous parent.
    pub old: Option<NodeId>,
    /// New parent.
    pub new: Option<NodeId>,
}

/// Payload of the paint channels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintEvent {
    /// The node being painted.
    pub node: NodeId,
    /// The node's resolved rectangle in the surface's current coordinates.
    pub rect: Rect,
}

/// Signal whose listeners receive the tree.
pub type TreeSignal<T> = Signal<Tree, T>;

/// Signal whose listeners receive the drawing surface.
pub type PaintSignal = Signal<dyn Surface, PaintEvent>;

/// Every event channel of a node.
///
/// Listeners on tree channels may mutate the tree, including the node that
/// owns the channel.
#[derive(Debug, Default)]
pub struct NodeSignals {
    /// A pointer was pressed over the node.
    pub pointer_down: TreeSignal<PointerEvent>,
    /// A pointer that went down over the node was released over it.
    pub pointer_up: TreeSignal<PointerEvent>,
    /// A pointer moved onto the node.
    pub enter: TreeSignal<PointerEvent>,
    /// A pointer moved off the node, or the node stopped being hittable.
    pub leave: TreeSignal<PointerEvent>,
    /// A pointer moved while over the node.
    pub pointer_move: TreeSignal<PointerEvent>,
    /// A wheel delta arrived while over the node.
    pub scroll: TreeSignal<ScrollEvent>,
    /// The node was attached, detached or re-parented.
    pub parent_changed: TreeSignal<ParentChanged>,
    /// Per-frame tick, after the node's children.
    pub update: TreeSignal<f64>,
    /// After the node painted itself.
    pub paint: PaintSignal,
    /// Before the node's children paint, inside its child clip.
    pub pre_child_paint: PaintSignal,
    /// After the node's children painted, inside its child clip.
    pub post_child_paint: PaintSignal,
    /// The text field took focus.
    pub focus: TreeSignal<NodeId>,
    /// The text field lost focus.
    pub blur: TreeSignal<NodeId>,
    /// The text field's text changed through input.
    pub change: TreeSignal<String>,
    /// Enter in a single-line text field.
    pub submit: TreeSignal<String>,
}
