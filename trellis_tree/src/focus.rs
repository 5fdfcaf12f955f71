// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focused text field.
//!
//! At most one text field per tree holds focus. Focusing a field blurs the
//! previous holder first, so its `blur` signal always fires before the new
//! holder's `focus` signal.

use alloc::string::String;

use kurbo::Point;
use trellis_text::{EditOutcome, KeyInput};

use crate::content::Content;
use crate::tree::Tree;
use crate::types::NodeId;

impl Tree {
    /// The text field holding focus, if any.
    pub fn focused_text(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.is_alive(*id))
    }

    /// Give focus to a text field.
    ///
    /// Returns `false` (and changes nothing) if `id` is stale, detached or not
    /// a text field. Focusing the current holder does nothing.
    pub fn focus_text(&mut self, id: NodeId) -> bool {
        if !self.is_attached(id)
            || self.content(id).and_then(Content::as_text_field).is_none()
        {
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }
        self.blur_text();
        // A blur listener may have removed or detached the new holder.
        if !self.is_attached(id) {
            return false;
        }
        let Some(field) = self.content_mut(id).and_then(Content::as_text_field_mut) else {
            return false;
        };
        field.editor.focus();
        self.focused = Some(id);
        tracing::debug!(node = ?id, "focus text");
        self.trigger(id, |s| &mut s.focus, &id);
        true
    }

    /// Drop focus. Returns the node that held it.
    pub fn blur_text(&mut self) -> Option<NodeId> {
        let id = self.focused.take()?;
        if let Some(field) = self.content_mut(id).and_then(Content::as_text_field_mut) {
            field.editor.blur();
        }
        tracing::debug!(node = ?id, "blur text");
        self.trigger(id, |s| &mut s.blur, &id);
        Some(id)
    }

    /// Route a key press to the focused text field.
    ///
    /// Text changes fire the field's `change` signal. Enter in a single-line
    /// field fires `submit` and drops focus; Escape drops focus.
    pub fn key_focused(&mut self, input: KeyInput) -> EditOutcome {
        let Some(id) = self.focused_text() else {
            return EditOutcome::Ignored;
        };
        let Some((field, clipboard)) = self.field_and_clipboard(id) else {
            return EditOutcome::Ignored;
        };
        let outcome = field.editor.handle_key(input, clipboard);
        match &outcome {
            EditOutcome::Changed => {
                let text = String::from(field.editor.text());
                self.trigger(id, |s| &mut s.change, &text);
            }
            EditOutcome::Submitted(text) => {
                self.trigger(id, |s| &mut s.submit, text);
                self.blur_text();
            }
            EditOutcome::Blurred => {
                self.blur_text();
            }
            EditOutcome::Ignored | EditOutcome::Moved | EditOutcome::Copied => {}
        }
        outcome
    }

    /// Move the caret of a text field to the character under `point`
    /// (surface coordinates). With `extend` the selection grows from its
    /// anchor instead of collapsing.
    ///
    /// Returns `false` if `id` is not a live text field.
    pub fn place_caret(&mut self, id: NodeId, point: Point, extend: bool) -> bool {
        let Some(rect) = self.screen_rect(id) else {
            return false;
        };
        let measure = self.measure();
        let Some(field) = self.content_mut(id).and_then(Content::as_text_field_mut) else {
            return false;
        };
        let layout = field.layout(rect.size(), &*measure);
        let local = Point::ORIGIN + (point - rect.origin());
        let index = layout.index_at(local, &*measure);
        if extend {
            field.editor.extend_selection(index);
        } else {
            field.editor.begin_selection(index);
        }
        true
    }
}
