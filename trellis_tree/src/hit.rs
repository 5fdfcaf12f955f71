// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing and modal scoping.
//!
//! The hit test walks the tree in paint order with the same [`Frame`] logic the
//! painter uses, so a node is hittable exactly when it is painted. Among the
//! candidates containing the point, the one painted last wins.
//!
//! Rotation and paint scale are not applied: hits use the axis-aligned
//! resolved rectangle.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::content::Content;
use crate::layout::Frame;
use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};

/// Filter applied to hit candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Flags a candidate must have.
    pub required: NodeFlags,
    /// Restrict candidates to this node's subtree.
    pub scope: Option<NodeId>,
}

impl QueryFilter {
    /// Accept every candidate.
    pub const fn new() -> Self {
        Self {
            required: NodeFlags::empty(),
            scope: None,
        }
    }

    /// Require the clickable flag.
    #[must_use]
    pub const fn clickable(mut self) -> Self {
        self.required = self.required.union(NodeFlags::CLICKABLE);
        self
    }

    /// Restrict candidates to the subtree rooted at `root`.
    #[must_use]
    pub const fn scope(mut self, root: NodeId) -> Self {
        self.scope = Some(root);
        self
    }

    /// Returns `true` if `id` passes the filter.
    pub fn matches(&self, tree: &Tree, id: NodeId) -> bool {
        tree.flags(id).is_some_and(|f| f.contains(self.required))
            && self.scope.is_none_or(|s| tree.is_in_subtree(id, s))
    }
}

/// Result of a hit test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The topmost candidate under the point.
    pub node: NodeId,
    /// Top-level node to `node`, inclusive.
    pub path: Vec<NodeId>,
}

impl Tree {
    /// Returns `true` if the node takes part in hit testing: it is clickable,
    /// has a background, scrolls, or holds a text field.
    pub fn is_hit_candidate(&self, id: NodeId) -> bool {
        self.local(id).is_some_and(|l| {
            l.flags.contains(NodeFlags::CLICKABLE)
                || l.style.background.is_some_and(|c| !c.is_transparent())
                || l.flags.is_scrollable()
                || matches!(l.content, Content::TextField(_))
        })
    }

    /// Topmost hit candidate containing `point` (surface coordinates).
    pub fn hit_test_point(&self, point: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best = None;
        let mut path = Vec::new();
        let frame = self.root_frame();
        let container = self.container_rect();
        for child in self.paint_order(self.root()) {
            self.hit_walk(child, container, frame, point, &filter, &mut path, &mut best);
        }
        best.map(|path: Vec<NodeId>| Hit {
            node: path[path.len() - 1],
            path,
        })
    }

    fn hit_walk(
        &self,
        id: NodeId,
        parent: Rect,
        frame: Frame,
        point: Point,
        filter: &QueryFilter,
        path: &mut Vec<NodeId>,
        best: &mut Option<Vec<NodeId>>,
    ) {
        if !self.is_visible(id) {
            return;
        }
        let Some(rect) = self.resolve_rect_in(id, parent) else {
            return;
        };
        if !frame.shows(rect) {
            return;
        }
        path.push(id);
        if self.is_hit_candidate(id) && filter.matches(self, id) && frame.contains(rect, point) {
            *best = Some(path.clone());
        }
        let inner = self.child_frame(id, rect, frame);
        for child in self.paint_order(id) {
            self.hit_walk(child, rect, inner, point, filter, path, best);
        }
        path.pop();
    }

    /// The modal node painted last among visible attached modal nodes.
    ///
    /// While one exists, only its subtree is interactive.
    pub fn active_modal(&self) -> Option<NodeId> {
        let mut found = None;
        let mut stack: Vec<NodeId> = self.paint_order(self.root());
        stack.reverse();
        // Pre-order, paint order: pop from the back of a reversed list.
        while let Some(id) = stack.pop() {
            if !self.is_visible(id) {
                continue;
            }
            if self.flags(id).is_some_and(|f| f.contains(NodeFlags::MODAL)) {
                found = Some(id);
            }
            let mut children = self.paint_order(id);
            children.reverse();
            stack.extend(children);
        }
        found
    }

    /// Returns `true` if the node or any ancestor is flagged modal.
    pub fn belongs_to_modal(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.flags(n).is_some_and(|f| f.contains(NodeFlags::MODAL)) {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    /// The filter interactive queries use right now: clickable-or-not as
    /// given, scoped to the active modal if there is one.
    pub fn interactive_filter(&self, filter: QueryFilter) -> QueryFilter {
        match self.active_modal() {
            Some(modal) => filter.scope(modal),
            None => filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    use crate::style::{Color, Style};
    use crate::types::{Dim2, LocalNode};

    fn rect_node(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
        LocalNode {
            position: Dim2::absolute(x, y),
            size: Dim2::absolute(w, h),
            flags: NodeFlags::default() | NodeFlags::CLICKABLE,
            ..LocalNode::default()
        }
    }

    #[test]
    fn higher_z_sibling_wins_regardless_of_insertion() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let root = t.root();
        let high = t
            .insert(
                root,
                LocalNode {
                    z_index: 5,
                    ..rect_node(0.0, 0.0, 50.0, 50.0)
                },
            )
            .unwrap();
        let _low = t.insert(root, rect_node(0.0, 0.0, 50.0, 50.0)).unwrap();
        let hit = t.hit_test_point(Point::new(10.0, 10.0), QueryFilter::new());
        assert_eq!(hit.map(|h| h.node), Some(high));
    }

    #[test]
    fn child_beats_parent_and_path_is_root_first() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let root = t.root();
        let a = t.insert(root, rect_node(0.0, 0.0, 80.0, 80.0)).unwrap();
        let b = t.insert(a, rect_node(10.0, 10.0, 20.0, 20.0)).unwrap();
        let hit = t.hit_test_point(Point::new(15.0, 15.0), QueryFilter::new()).unwrap();
        assert_eq!(hit.node, b);
        assert_eq!(hit.path, [a, b]);
        let hit = t.hit_test_point(Point::new(50.0, 50.0), QueryFilter::new()).unwrap();
        assert_eq!(hit.node, a);
    }

    #[test]
    fn plain_boxes_are_not_candidates() {
        let mut t = Tree::new(Size::new(100.0, 100.0));
        let root = t.root();
        let plain = t
            .insert(
                root,
                LocalNode {
                    size: Dim2::absolute(50.0, 50.0),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        assert!(t.hit_test_point(Point::new(5.0, 5.0), QueryFilter::new()).is_none());
        t.local_mut(plain).unwrap().style = Style::default().with_background(Color::WHITE);
        assert!(t.hit_test_point(Point::new(5.0, 5.0), QueryFilter::new()).is_some());
        assert!(
            t.hit_test_point(Point::new(5.0, 5.0), QueryFilter::new().clickable())
                .is_none(),
            "background alone is not clickable"
        );
    }

    #[test]
    fn clipped_children_are_unhittable_outside_clip() {
        let mut t = Tree::new(Size::new(200.0, 200.0));
        let root = t.root();
        let clip = t
            .insert(
                root,
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::CLIP_CHILDREN,
                    ..rect_node(0.0, 0.0, 50.0, 50.0)
                },
            )
            .unwrap();
        let child = t.insert(clip, rect_node(40.0, 40.0, 40.0, 40.0)).unwrap();
        let inside = t.hit_test_point(Point::new(45.0, 45.0), QueryFilter::new()).unwrap();
        assert_eq!(inside.node, child);
        assert!(t.hit_test_point(Point::new(60.0, 60.0), QueryFilter::new()).is_none());
    }

    #[test]
    fn scrolled_children_hit_at_screen_position() {
        let mut t = Tree::new(Size::new(200.0, 200.0));
        let root = t.root();
        let list = t
            .insert(
                root,
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::SCROLL_Y | NodeFlags::CLIP_CHILDREN,
                    canvas_size: Vec2::new(0.0, 100.0),
                    ..rect_node(0.0, 0.0, 100.0, 100.0)
                },
            )
            .unwrap();
        let row = t.insert(list, rect_node(0.0, 120.0, 100.0, 20.0)).unwrap();
        t.set_scroll(list, Vec2::new(0.0, -100.0), true);
        let hit = t.hit_test_point(Point::new(10.0, 25.0), QueryFilter::new()).unwrap();
        assert_eq!(hit.node, row);
    }

    #[test]
    fn modal_scopes_interactive_queries() {
        let mut t = Tree::new(Size::new(200.0, 200.0));
        let root = t.root();
        let button = t.insert(root, rect_node(0.0, 0.0, 50.0, 50.0)).unwrap();
        let dialog = t
            .insert(
                root,
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::MODAL,
                    ..rect_node(100.0, 100.0, 50.0, 50.0)
                },
            )
            .unwrap();
        let ok = t.insert(dialog, rect_node(5.0, 5.0, 10.0, 10.0)).unwrap();

        assert_eq!(t.active_modal(), Some(dialog));
        assert!(t.belongs_to_modal(ok) && !t.belongs_to_modal(button));
        let filter = t.interactive_filter(QueryFilter::new().clickable());
        assert!(t.hit_test_point(Point::new(10.0, 10.0), filter).is_none());
        assert_eq!(
            t.hit_test_point(Point::new(107.0, 107.0), filter).map(|h| h.node),
            Some(ok)
        );

        t.set_visible(dialog, false);
        assert_eq!(t.active_modal(), None);
        let filter = t.interactive_filter(QueryFilter::new().clickable());
        assert_eq!(
            t.hit_test_point(Point::new(10.0, 10.0), filter).map(|h| h.node),
            Some(button)
        );
    }
}
