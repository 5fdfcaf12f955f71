// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Input: multi-pointer input dispatch for a Trellis scene tree.
//!
//! A pointer source feeds [`PointerSample`]s (mouse or touch) into an
//! [`InputDispatcher`]; each [`InputDispatcher::dispatch`] turns the queued
//! state into node signals on a [`trellis_tree::Tree`]:
//!
//! - per pointer, the nodes it is *inside* (the hit path) and the nodes it
//!   *holds* (pressed over and not yet released);
//! - `pointer_down` on the press edge, `pointer_up` on release over a held
//!   node, `enter`/`leave`/`pointer_move`/`scroll` from the hit path;
//! - modal scoping: while a modal node is visible, only its subtree reacts;
//! - text fields: a press focuses the field and places the caret, dragging
//!   extends the selection, a press elsewhere blurs it;
//! - scrollbar thumbs can be dragged, and wheel deltas scroll the innermost
//!   scrollable node under the pointer.
//!
//! Dispatch is idempotent: dispatching again without a new sample fires
//! nothing. The returned [`DispatchReport`] tells the host which cursor to
//! show and which sounds to play.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_input::{CursorShape, InputDispatcher, PointerSample};
//! use trellis_tree::{Dim2, LocalNode, NodeFlags, Tree};
//!
//! let mut tree = Tree::new(Size::new(100.0, 100.0));
//! let button = tree
//!     .insert(
//!         tree.root(),
//!         LocalNode {
//!             size: Dim2::absolute(40.0, 20.0),
//!             flags: NodeFlags::default() | NodeFlags::CLICKABLE,
//!             ..LocalNode::default()
//!         },
//!     )
//!     .unwrap();
//! tree.signals_mut(button)
//!     .unwrap()
//!     .pointer_up
//!     .listen(|_, ev| assert_eq!(ev.position, Point::new(5.0, 5.0)));
//!
//! let mut input = InputDispatcher::new();
//! input.pointer_sample(PointerSample::mouse(Point::new(5.0, 5.0), true));
//! assert_eq!(input.dispatch(&mut tree).cursor, CursorShape::Pointer);
//! input.pointer_sample(PointerSample::mouse(Point::new(5.0, 5.0), false));
//! input.dispatch(&mut tree);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dispatcher;
mod pointer;

pub use dispatcher::{CursorShape, DispatchReport, InputDispatcher, UiSound};
pub use pointer::{PointerKind, PointerSample};
