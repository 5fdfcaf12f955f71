// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Tree: the retained-mode scene tree of the Trellis UI engine.
//!
//! - Represents a hierarchy of nodes with hybrid absolute/relative placement,
//!   paint style, z-order, clipping, scrolling and per-node signal channels.
//! - Paints itself onto any [`Surface`] and answers point hit tests, both
//!   under one shared on-screen rule.
//! - Hosts editable text fields with a single focused field per tree.
//!
//! ## Layout model
//!
//! Every node is placed with [`Dim2`] values: an absolute offset plus a
//! fraction of the parent's resolved size. The pivot shifts the node by a
//! fraction of its own size. Top-level nodes (and detached nodes) resolve
//! against the root container, which covers the drawing surface.
//!
//! Layout is recomputed on demand from the ancestor chain; there is no commit
//! step and no cached world state to invalidate.
//!
//! ## Ordering
//!
//! Siblings paint in ascending z-index, ties in insertion order, and every
//! subtree paints after its parent. Hit testing picks the candidate painted
//! last. [`Tree::effective_z_index`] reports the z-index accumulated over the
//! ancestor chain for callers who need it, but does not drive ordering.
//!
//! ## API overview
//!
//! - [`Tree`]: node storage, hierarchy mutation, per-frame [`Tree::update`]
//!   and [`Tree::render`].
//! - [`LocalNode`]: per-node configuration; unspecified fields fall back to
//!   [`Default`] (visible, opaque, not clickable, z-index 0).
//! - [`NodeFlags`]: visibility, clickability, clipping, scrolling, modality.
//! - [`Content`]: what a node draws (text, a text field, an image).
//! - [`NodeSignals`]: per-node event channels.
//! - [`Attributes`] with [`AttrKey`]: typed, string-keyed tags.
//! - [`Surface`] and [`RecordingSurface`]: the drawing contract and a headless
//!   implementation.
//!
//! Key operations:
//! - [`Tree::insert`], [`Tree::attach`], [`Tree::detach`], [`Tree::remove`],
//!   [`Tree::clone_subtree`].
//! - [`Tree::layout_rect`], [`Tree::screen_rect`], [`Tree::is_on_screen`].
//! - [`Tree::hit_test_point`] with a [`QueryFilter`], and
//!   [`Tree::active_modal`].
//! - [`Tree::scroll_by`], [`Tree::set_scroll`], [`Tree::scrollbar`].
//! - [`Tree::focus_text`], [`Tree::blur_text`], [`Tree::key_focused`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_tree::{
//!     Color, Dim2, LocalNode, NodeFlags, QueryFilter, RecordingSurface, Style, Tree,
//! };
//!
//! let mut tree = Tree::new(Size::new(320.0, 240.0));
//! let button = tree
//!     .insert(
//!         tree.root(),
//!         LocalNode {
//!             // Centered: half the container, minus half of its own size.
//!             position: Dim2::scale(0.5, 0.5),
//!             pivot: (0.5, 0.5).into(),
//!             size: Dim2::absolute(80.0, 24.0),
//!             style: Style::default().with_background(Color::rgb(40, 120, 220)),
//!             flags: NodeFlags::default() | NodeFlags::CLICKABLE,
//!             ..LocalNode::default()
//!         },
//!     )
//!     .unwrap();
//!
//! let hit = tree.hit_test_point(Point::new(160.0, 120.0), QueryFilter::new().clickable());
//! assert_eq!(hit.map(|h| h.node), Some(button));
//!
//! tree.update(1.0 / 60.0);
//! let mut surface = RecordingSurface::default();
//! tree.render(&mut surface);
//! assert_eq!(surface.fills().count(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod asset;
mod attributes;
mod content;
mod error;
mod focus;
mod hit;
mod layout;
mod render;
mod scroll;
mod scrollbar;
mod signals;
mod style;
mod surface;
mod tree;
mod types;
mod util;

pub use asset::{Asset, Image, ImageAsset, StaticAsset};
pub use attributes::{AttrKey, AttrType, AttrValue, Attributes};
pub use content::{Content, ImageContent, TextContent, TextField};
pub use error::TreeError;
pub use hit::{Hit, QueryFilter};
pub use layout::Frame;
pub use scroll::SCROLL_EASING;
pub use scrollbar::{MIN_THUMB, SCROLLBAR_WIDTH, Scrollbar};
pub use signals::{
    NodeSignals, PaintEvent, PaintSignal, ParentChanged, PointerEvent, PointerId, ScrollEvent,
    TreeSignal,
};
pub use style::{Border, Color, Shadow, Style};
pub use surface::{DrawCommand, Recorded, RecordingSurface, Surface};
pub use tree::Tree;
pub use types::{Dim2, LocalNode, NodeFlags, NodeId};
pub use util::overlaps;

pub use trellis_signal::{ListenerId, Signal};
