// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout resolution and the on-screen rule shared by painting and hit testing.
//!
//! A node's rectangle resolves against its parent's rectangle (or the root
//! container for top-level and detached nodes):
//!
//! - `size = size.absolute + parent_size * size.scale`
//! - `origin = parent_origin + position.absolute + parent_size * position.scale - pivot * size`
//!
//! Sizes are never clamped: a negative size yields a degenerate rectangle,
//! which is neither painted nor hittable.
//!
//! The *layout* rectangle ignores scrolling. The *screen* rectangle adds the
//! scroll offsets (`canvas_position`) of every ancestor.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};
use crate::util::overlaps;

/// Accumulated ancestor state while walking down the tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Sum of the scroll offsets of every ancestor.
    pub offset: Vec2,
    /// Screen-space intersection of the container bounds and every
    /// clipping ancestor's rectangle.
    pub clip: Rect,
}

impl Frame {
    /// Screen rectangle of a node whose layout rectangle is `layout`.
    pub fn screen_rect(&self, layout: Rect) -> Rect {
        layout + self.offset
    }

    /// The on-screen rule: the screen rectangle overlaps the clip with
    /// positive area. Callers are responsible for visibility of the node and
    /// its ancestors.
    pub fn shows(&self, layout: Rect) -> bool {
        overlaps(self.screen_rect(layout), self.clip)
    }

    /// Returns `true` if `point` lies inside both the node's screen rectangle
    /// and the clip.
    pub fn contains(&self, layout: Rect, point: Point) -> bool {
        self.screen_rect(layout).contains(point) && self.clip.contains(point)
    }
}

impl Tree {
    /// The root container's rectangle.
    pub fn container_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.container_size())
    }

    /// Frame for the root container's children.
    pub fn root_frame(&self) -> Frame {
        Frame {
            offset: Vec2::ZERO,
            clip: self.container_rect(),
        }
    }

    /// Frame for the children of `id`, given its layout rectangle and its own frame.
    pub fn child_frame(&self, id: NodeId, layout: Rect, frame: Frame) -> Frame {
        let Some(node) = self.node_opt(id) else {
            return frame;
        };
        let clip = if node.local.flags.contains(NodeFlags::CLIP_CHILDREN) {
            frame.clip.intersect(frame.screen_rect(layout))
        } else {
            frame.clip
        };
        Frame {
            offset: frame.offset + node.canvas_position,
            clip,
        }
    }

    /// Resolve `id` against a parent rectangle. `None` for stale ids.
    pub fn resolve_rect_in(&self, id: NodeId, parent: Rect) -> Option<Rect> {
        let local = &self.node_opt(id)?.local;
        let parent_size = parent.size();
        let size = local.size.resolve(parent_size);
        let offset = local.position.resolve(parent_size);
        let x = parent.x0 + offset.x - local.pivot.x * size.x;
        let y = parent.y0 + offset.y - local.pivot.y * size.y;
        Some(Rect::new(x, y, x + size.x, y + size.y))
    }

    /// Layout rectangle of a node: its resolved position and size through
    /// the whole ancestor chain, without scroll offsets.
    pub fn layout_rect(&self, id: NodeId) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        let chain = self.chain(id);
        let mut rect = self.container_rect();
        for n in chain {
            rect = self.resolve_rect_in(n, rect)?;
        }
        Some(rect)
    }

    /// Resolved position (top-left corner) in surface coordinates, without
    /// scroll offsets.
    pub fn resolve_position(&self, id: NodeId) -> Option<Point> {
        self.layout_rect(id).map(|r| r.origin())
    }

    /// Resolved size. May be negative.
    pub fn resolve_size(&self, id: NodeId) -> Option<Size> {
        self.layout_rect(id)
            .map(|r| Size::new(r.x1 - r.x0, r.y1 - r.y0))
    }

    /// Screen rectangle: the layout rectangle moved by every ancestor's
    /// scroll offset.
    pub fn screen_rect(&self, id: NodeId) -> Option<Rect> {
        let rect = self.layout_rect(id)?;
        let mut offset = Vec2::ZERO;
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            offset += self.node(p).canvas_position;
            current = self.parent_of(p);
        }
        Some(rect + offset)
    }

    /// Layout rectangle and frame of an attached node, or `None` if it is
    /// detached or it or any ancestor is hidden or off screen.
    ///
    /// This applies exactly the rule the painter and the hit test apply while
    /// walking the tree.
    pub fn placement(&self, id: NodeId) -> Option<(Rect, Frame)> {
        if !self.is_attached(id) || id == self.root() {
            return None;
        }
        let chain = self.chain(id);
        let mut frame = self.root_frame();
        let mut parent_rect = self.container_rect();
        let last = chain.len() - 1;
        for (i, n) in chain.into_iter().enumerate() {
            if !self.is_visible(n) {
                return None;
            }
            let rect = self.resolve_rect_in(n, parent_rect)?;
            if !frame.shows(rect) {
                return None;
            }
            if i == last {
                return Some((rect, frame));
            }
            frame = self.child_frame(n, rect, frame);
            parent_rect = rect;
        }
        None
    }

    /// Returns `true` if the node would be painted this frame.
    pub fn is_on_screen(&self, id: NodeId) -> bool {
        self.placement(id).is_some()
    }

    /// Ancestor chain below the root container, top-most first, ending at `id`.
    fn chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(n) = current {
            if n == self.root() {
                break;
            }
            chain.push(n);
            current = self.parent_of(n);
        }
        chain.reverse();
        chain
    }
}
