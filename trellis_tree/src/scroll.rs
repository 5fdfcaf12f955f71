// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame update and scroll offsets.

use kurbo::Vec2;

use crate::content::Content;
use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};

/// Fraction of the remaining distance to the goal covered per update tick.
pub const SCROLL_EASING: f64 = 0.25;

/// Distance below which an easing scroll offset snaps onto its goal.
const SNAP_DISTANCE: f64 = 0.01;

impl Tree {
    /// Advance one frame.
    ///
    /// Visits the attached visible nodes, children before their parent: each
    /// node eases its scroll offset toward its goal, advances its caret
    /// blink, then fires `update`. Children are snapshotted in paint order, so
    /// listeners may attach or remove nodes.
    pub fn update(&mut self, dt: f64) {
        for child in self.paint_order(self.root()) {
            self.update_node(child, dt);
        }
    }

    fn update_node(&mut self, id: NodeId, dt: f64) {
        if !self.is_visible(id) {
            return;
        }
        for child in self.paint_order(id) {
            self.update_node(child, dt);
        }
        // A child's listener may have removed this node.
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let goal = node.goal_canvas_position;
        node.canvas_position = if node.local.flags.contains(NodeFlags::SMOOTH_SCROLL) {
            let next = node.canvas_position + (goal - node.canvas_position) * SCROLL_EASING;
            if (goal - next).hypot() < SNAP_DISTANCE {
                goal
            } else {
                next
            }
        } else {
            goal
        };
        if let Content::TextField(field) = &mut node.local.content {
            field.editor.tick(dt);
        }
        self.trigger(id, |s| &mut s.update, &dt);
    }

    /// Scroll by a wheel delta: the content moves against the delta on each
    /// axis the node scrolls along, clamped to its extent.
    ///
    /// Returns `false` (and does nothing) for stale or non-scrollable nodes.
    pub fn scroll_by(&mut self, id: NodeId, delta: Vec2) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        let flags = node.local.flags;
        if !flags.is_scrollable() {
            return false;
        }
        let mut goal = node.goal_canvas_position;
        if flags.contains(NodeFlags::SCROLL_X) {
            goal.x -= delta.x;
        }
        if flags.contains(NodeFlags::SCROLL_Y) {
            goal.y -= delta.y;
        }
        node.goal_canvas_position = clamp_offset(goal, node.local.canvas_size);
        true
    }

    /// Set the scroll goal (and with `immediate` the current offset too),
    /// clamped to `[-canvas_size, 0]` per axis.
    ///
    /// Returns `false` for stale or non-scrollable nodes.
    pub fn set_scroll(&mut self, id: NodeId, offset: Vec2, immediate: bool) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if !node.local.flags.is_scrollable() {
            return false;
        }
        let offset = clamp_offset(offset, node.local.canvas_size);
        node.goal_canvas_position = offset;
        if immediate {
            node.canvas_position = offset;
        }
        true
    }
}

/// Clamp a scroll offset to `[-extent, 0]` on each axis.
pub(crate) fn clamp_offset(offset: Vec2, extent: Vec2) -> Vec2 {
    let axis = |v: f64, e: f64| v.max(-e.max(0.0)).min(0.0);
    Vec2::new(axis(offset.x, extent.x), axis(offset.y, extent.y))
}
