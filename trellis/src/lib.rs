// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis: a retained-mode 2D UI engine.
//!
//! This crate ties the pieces together:
//!
//! - [`trellis_tree`]: the scene tree, layout, hit testing, painting, focus.
//! - [`trellis_input`]: multi-pointer dispatch into node signals.
//! - [`trellis_text`]: wrapping, alignment and the text editor.
//! - [`trellis_signal`]: the listener lists nodes expose.
//!
//! [`Ui`] owns a [`Tree`] and an [`InputDispatcher`] and drives one frame:
//! queue input, [`Ui::update`], then [`Ui::render`].
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis::{
//!     Color, Content, CursorShape, Dim2, LocalNode, NodeFlags, PointerSample,
//!     RecordingSurface, Style, TextStyle, Ui,
//! };
//!
//! let mut ui = Ui::new(Size::new(200.0, 100.0));
//! let label = ui
//!     .tree
//!     .insert(
//!         ui.tree.root(),
//!         LocalNode {
//!             size: Dim2::absolute(120.0, 30.0),
//!             style: Style::default().with_background(Color::rgb(30, 30, 30)),
//!             flags: NodeFlags::default() | NodeFlags::CLICKABLE,
//!             content: Content::text("Hello", TextStyle::default(), Color::WHITE),
//!             ..LocalNode::default()
//!         },
//!     )
//!     .unwrap();
//!
//! ui.pointer_sample(PointerSample::mouse(Point::new(10.0, 10.0), false));
//! let report = ui.update(1.0 / 60.0);
//! assert_eq!(report.cursor, CursorShape::Pointer);
//!
//! let mut surface = RecordingSurface::default();
//! ui.render(&mut surface);
//! assert!(surface.texts().any(|t| t == "Hello"));
//! # let _ = label;
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ui;

pub use ui::Ui;

pub use trellis_input::{
    CursorShape, DispatchReport, InputDispatcher, PointerKind, PointerSample, UiSound,
};
pub use trellis_signal::{ListenerId, Signal};
pub use trellis_text::{
    Clipboard, EditOutcome, Font, HAlign, Key, KeyInput, MemoryClipboard, Modifiers,
    MonospaceMeasure, TextEditor, TextMeasure, TextStyle, VAlign,
};
pub use trellis_tree::{
    Asset, AttrKey, AttrType, AttrValue, Attributes, Border, Color, Content, Dim2, DrawCommand,
    Frame, Hit, Image, ImageAsset, ImageContent, LocalNode, NodeFlags, NodeId, NodeSignals,
    PaintEvent, PointerEvent, PointerId, QueryFilter, Recorded, RecordingSurface, ScrollEvent,
    Shadow, StaticAsset, Style, Surface, TextContent, TextField, Tree, TreeError,
};

pub use kurbo;
pub use trellis_input;
pub use trellis_signal;
pub use trellis_text;
pub use trellis_tree;
