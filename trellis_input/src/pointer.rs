// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer samples and per-pointer state.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use trellis_tree::{NodeId, PointerId};

/// How a pointer's lifetime is managed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Persistent: tracked from its first sample until removed explicitly.
    Mouse,
    /// Created on first contact and dropped after release.
    Touch,
}

/// One raw sample from a pointer source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Which pointer.
    pub id: PointerId,
    /// Mouse or touch.
    pub kind: PointerKind,
    /// Position in surface coordinates.
    pub position: Point,
    /// Whether the pointer is pressed.
    pub pressed: bool,
    /// Wheel delta carried by this sample.
    pub scroll_delta: Vec2,
}

impl PointerSample {
    /// The default mouse pointer.
    pub const MOUSE: PointerId = PointerId(0);

    /// A sample of the default mouse pointer.
    pub fn mouse(position: Point, pressed: bool) -> Self {
        Self {
            id: Self::MOUSE,
            kind: PointerKind::Mouse,
            position,
            pressed,
            scroll_delta: Vec2::ZERO,
        }
    }

    /// A sample of touch contact `id`.
    pub fn touch(id: u64, position: Point, pressed: bool) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            position,
            pressed,
            scroll_delta: Vec2::ZERO,
        }
    }

    /// With a wheel delta.
    #[must_use]
    pub fn with_scroll(mut self, delta: Vec2) -> Self {
        self.scroll_delta = delta;
        self
    }
}

/// Node set of one pointer; most paths are shallow.
pub(crate) type NodeSet = SmallVec<[NodeId; 8]>;

/// State of one pointer between dispatches.
#[derive(Clone, Debug)]
pub(crate) struct Pointer {
    pub(crate) kind: PointerKind,
    pub(crate) position: Point,
    pub(crate) pressed: bool,
    /// A press arrived since the last dispatch, even if already released.
    pub(crate) pending_press: bool,
    /// Wheel deltas accumulated since the last dispatch.
    pub(crate) scroll: Vec2,
    /// Position and press state at the last dispatch.
    pub(crate) last_position: Option<Point>,
    pub(crate) last_pressed: bool,
    /// Pressed over these nodes and not yet released.
    pub(crate) held: NodeSet,
    /// Currently over these nodes.
    pub(crate) inside: NodeSet,
    /// Node whose scrollbar thumb is being dragged.
    pub(crate) drag: Option<NodeId>,
}

impl Pointer {
    pub(crate) fn new(kind: PointerKind, position: Point) -> Self {
        Self {
            kind,
            position,
            pressed: false,
            pending_press: false,
            scroll: Vec2::ZERO,
            last_position: None,
            last_pressed: false,
            held: NodeSet::new(),
            inside: NodeSet::new(),
            drag: None,
        }
    }

    /// Fold a sample into the pending state.
    pub(crate) fn apply(&mut self, sample: &PointerSample) {
        if sample.pressed && !self.pressed {
            self.pending_press = true;
        }
        self.position = sample.position;
        self.pressed = sample.pressed;
        self.scroll += sample.scroll_delta;
    }

    /// Movement since the last dispatch.
    pub(crate) fn delta(&self) -> Vec2 {
        self.last_position
            .map_or(Vec2::ZERO, |last| self.position - last)
    }

    /// Record the current sample as dispatched.
    pub(crate) fn commit(&mut self) {
        self.last_position = Some(self.position);
        self.last_pressed = self.pressed;
        self.pending_press = false;
        self.scroll = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_between_dispatches_is_remembered() {
        let mut p = Pointer::new(PointerKind::Mouse, Point::ZERO);
        p.apply(&PointerSample::mouse(Point::new(1.0, 1.0), true));
        p.apply(&PointerSample::mouse(Point::new(2.0, 1.0), false));
        assert!(p.pending_press, "tap inside one frame keeps its press");
        assert!(!p.pressed);
        p.commit();
        assert!(!p.pending_press);
    }

    #[test]
    fn scroll_accumulates_until_commit() {
        let mut p = Pointer::new(PointerKind::Mouse, Point::ZERO);
        let s = PointerSample::mouse(Point::ZERO, false).with_scroll(Vec2::new(0.0, 3.0));
        p.apply(&s);
        p.apply(&s);
        assert_eq!(p.scroll, Vec2::new(0.0, 6.0));
        p.commit();
        assert_eq!(p.scroll, Vec2::ZERO);
    }

    #[test]
    fn delta_is_relative_to_last_dispatch() {
        let mut p = Pointer::new(PointerKind::Mouse, Point::ZERO);
        p.apply(&PointerSample::mouse(Point::new(5.0, 5.0), false));
        assert_eq!(p.delta(), Vec2::ZERO, "no previous dispatch");
        p.commit();
        p.apply(&PointerSample::mouse(Point::new(8.0, 9.0), false));
        assert_eq!(p.delta(), Vec2::new(3.0, 4.0));
    }
}
