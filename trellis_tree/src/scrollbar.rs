// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical scrollbar geometry, shared by the painter and the input dispatcher.

use kurbo::Rect;

use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};

/// Width of the scrollbar track.
pub const SCROLLBAR_WIDTH: f64 = 8.0;

/// Minimum thumb length.
pub const MIN_THUMB: f64 = 20.0;

/// Track and thumb of a vertical scrollbar, in the coordinates of the node's
/// rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scrollbar {
    /// Right-edge strip of the node.
    pub track: Rect,
    /// The draggable part.
    pub thumb: Rect,
    /// Scroll extent (`canvas_size.y`).
    pub content: f64,
}

impl Scrollbar {
    /// Geometry for a node occupying `rect` scrolled to `offset_y` over a
    /// scroll extent of `content`.
    ///
    /// Returns `None` when there is nothing to scroll or the rectangle is
    /// degenerate.
    pub fn vertical(rect: Rect, offset_y: f64, content: f64) -> Option<Self> {
        let visible = rect.height();
        if !(content > 0.0 && visible > 0.0 && rect.width() > 0.0) {
            return None;
        }
        let track = Rect::new(rect.x1 - SCROLLBAR_WIDTH, rect.y0, rect.x1, rect.y1);
        let length = (visible * visible / (visible + content))
            .max(MIN_THUMB)
            .min(visible);
        let t = (-offset_y / content).clamp(0.0, 1.0);
        let top = track.y0 + t * (visible - length);
        Some(Self {
            track,
            thumb: Rect::new(track.x0, top, track.x1, top + length),
            content,
        })
    }

    /// Scroll offset for a pointer at vertical position `y`, clamped to the
    /// track: the top of the track maps to `0`, the bottom to `-content`.
    pub fn offset_for_pointer(&self, y: f64) -> f64 {
        let h = self.track.height();
        if h <= 0.0 {
            return 0.0;
        }
        let t = ((y - self.track.y0) / h).clamp(0.0, 1.0);
        -t * self.content
    }
}

impl Tree {
    /// Scrollbar of a node in screen coordinates, if it shows one.
    ///
    /// A node shows a scrollbar when it has the scrollbar flag, scrolls
    /// vertically and has a positive vertical extent.
    pub fn scrollbar(&self, id: NodeId) -> Option<Scrollbar> {
        let local = self.local(id)?;
        if !local.flags.contains(NodeFlags::SCROLLBAR | NodeFlags::SCROLL_Y) {
            return None;
        }
        let rect = self.screen_rect(id)?;
        Scrollbar::vertical(
            rect,
            self.canvas_position(id)?.y,
            local.canvas_size.y,
        )
    }
}
