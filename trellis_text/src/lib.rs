// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Text: text shaping and editing primitives for the Trellis UI engine.
//!
//! - [`wrap`] performs greedy word wrapping against a width budget, splitting any
//!   word that is wider than the budget on its own into fragments that fit.
//! - [`split_lines`] is the non-wrapping counterpart: it only breaks on `\n`.
//! - [`TextLayout`] places the lines of a text block inside a box, resolving
//!   horizontal/vertical alignment and padding, and maps between pixel
//!   positions and character indices (caret placement, selection rectangles).
//! - [`TextEditor`] is the editable text controller: caret, selection, key
//!   handling, clipboard operations and a maximum length.
//!
//! Measurement is abstracted behind [`TextMeasure`] so that the same code runs
//! against a real font backend or a fixed-advance stand-in such as
//! [`MonospaceMeasure`].
//!
//! ```
//! use trellis_text::wrap;
//!
//! // 10 px per character, 35 px budget.
//! let lines = wrap("abcdefgh", 35.0, |s: &str| s.chars().count() as f64 * 10.0);
//! let text: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
//! assert_eq!(text, ["abc", "def", "gh"]);
//! ```
//!
//! Character positions are always expressed as `char` indices, never byte offsets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod editor;
mod font;
mod layout;
mod wrap;

pub use editor::{
    CARET_BLINK_PERIOD, Clipboard, EditOutcome, Key, KeyInput, MemoryClipboard, Modifiers,
    TextEditor,
};
pub use font::{DEFAULT_EM_ADVANCE, Font, MonospaceMeasure, TextMeasure};
pub use layout::{HAlign, TextBlock, TextLayout, TextStyle, VAlign};
pub use wrap::{Line, split_lines, split_word, wrap};

/// Byte offset of the `index`-th char of `text` (or `text.len()` past the end).
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}
