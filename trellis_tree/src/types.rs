// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, flags, and the per-node configuration.

use kurbo::{Size, Vec2};

use crate::content::Content;
use crate::style::Style;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility, interaction, clipping and scrolling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Node and its subtree are painted, updated and hit tested.
        const VISIBLE       = 0b0000_0000_0001;
        /// Node participates in hit testing even without a background.
        const CLICKABLE     = 0b0000_0000_0010;
        /// Children are clipped to this node's rectangle, for painting and hit testing.
        const CLIP_CHILDREN = 0b0000_0000_0100;
        /// Content scrolls horizontally.
        const SCROLL_X      = 0b0000_0000_1000;
        /// Content scrolls vertically.
        const SCROLL_Y      = 0b0000_0001_0000;
        /// While visible, only this node's subtree is interactive.
        const MODAL         = 0b0000_0010_0000;
        /// Scroll offset eases toward its goal instead of jumping.
        const SMOOTH_SCROLL = 0b0000_0100_0000;
        /// Paint (and allow dragging) a vertical scrollbar when scrollable.
        const SCROLLBAR     = 0b0000_1000_0000;
    }
}

impl NodeFlags {
    /// Returns `true` if the node scrolls along either axis.
    pub fn is_scrollable(self) -> bool {
        self.intersects(Self::SCROLL_X | Self::SCROLL_Y)
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::SMOOTH_SCROLL
    }
}

/// A hybrid coordinate: an absolute offset plus a fraction of the parent's size.
///
/// `Dim2::new((10, 0), (0.5, 0))` reads as "10 units past half of the parent width".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dim2 {
    /// Offset in surface units.
    pub absolute: Vec2,
    /// Fraction of the parent's resolved size, per axis.
    pub scale: Vec2,
}

impl Dim2 {
    /// Zero in both parts.
    pub const ZERO: Self = Self::new(Vec2::ZERO, Vec2::ZERO);
    /// The full parent size.
    pub const FULL: Self = Self::new(Vec2::ZERO, Vec2::new(1.0, 1.0));

    /// Create a hybrid value.
    pub const fn new(absolute: Vec2, scale: Vec2) -> Self {
        Self { absolute, scale }
    }

    /// Absolute only.
    pub const fn absolute(x: f64, y: f64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO)
    }

    /// Parent fraction only.
    pub const fn scale(x: f64, y: f64) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(x, y))
    }

    /// Resolve against the parent's size: `absolute + parent * scale`.
    pub fn resolve(self, parent: Size) -> Vec2 {
        Vec2::new(
            self.absolute.x + parent.width * self.scale.x,
            self.absolute.y + parent.height * self.scale.y,
        )
    }
}

/// Configuration of a node: transform, style, flags, z-order, scroll extent and content.
///
/// Fields left at their [`Default`] give a visible, non-interactive, transparent
/// node at the parent's origin with zero size.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Position relative to the parent's resolved rectangle.
    pub position: Dim2,
    /// Size, partly relative to the parent's resolved size.
    pub size: Dim2,
    /// Anchor as a fraction of the node's own size, subtracted from its position.
    pub pivot: Vec2,
    /// Paint rotation in radians, around the pivot point.
    pub rotation: f64,
    /// Paint scale, around the pivot point. Not applied to hit testing.
    pub scale: Vec2,
    /// Paint style.
    pub style: Style,
    /// Visibility and interaction flags.
    pub flags: NodeFlags,
    /// Order among siblings. Higher paints on top.
    pub z_index: i32,
    /// Total scrollable extent of the content.
    pub canvas_size: Vec2,
    /// What the node draws inside its rectangle.
    pub content: Content,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            position: Dim2::ZERO,
            size: Dim2::ZERO,
            pivot: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            style: Style::default(),
            flags: NodeFlags::default(),
            z_index: 0,
            canvas_size: Vec2::ZERO,
            content: Content::Empty,
        }
    }
}
