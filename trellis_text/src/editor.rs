// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable text controller: caret, selection, key handling and clipboard.

use alloc::string::String;
use alloc::vec::Vec;

use crate::byte_offset;

/// Length of one caret blink cycle in seconds. The caret shows during the
/// first half of each cycle.
pub const CARET_BLINK_PERIOD: f64 = 1.0;

/// A key relevant to text editing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Delete before the caret.
    Backspace,
    /// Delete after the caret.
    Delete,
    /// Caret one char left.
    Left,
    /// Caret one char right.
    Right,
    /// Caret to the start of the line.
    Home,
    /// Caret to the end of the line.
    End,
    /// Line break or submit.
    Enter,
    /// Leave the field.
    Escape,
}

/// Modifier state accompanying a key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Extend the selection while moving.
    pub shift: bool,
    /// Operate on whole words (Ctrl on most platforms, Alt on macOS).
    pub word: bool,
    /// Shortcut modifier (Ctrl, or Cmd on macOS).
    pub command: bool,
}

/// A key press with its modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key with no modifiers.
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                shift: false,
                word: false,
                command: false,
            },
        }
    }

    /// With shift held.
    #[must_use]
    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// With the word modifier held.
    #[must_use]
    pub const fn word(mut self) -> Self {
        self.modifiers.word = true;
        self
    }

    /// With the shortcut modifier held.
    #[must_use]
    pub const fn command(mut self) -> Self {
        self.modifiers.command = true;
        self
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// What a key press did to the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing happened.
    Ignored,
    /// The caret or selection moved; the text is unchanged.
    Moved,
    /// The text changed.
    Changed,
    /// The selection was written to the clipboard.
    Copied,
    /// Enter in a single-line field. Carries the text; the editor is blurred.
    Submitted(String),
    /// Escape; the editor is blurred.
    Blurred,
}

/// Clipboard collaborator used by copy, cut and paste.
pub trait Clipboard {
    /// Current clipboard text, if any.
    fn read(&mut self) -> Option<String>;
    /// Replace the clipboard text.
    fn write(&mut self, text: &str);
}

/// A clipboard that lives in memory, private to one owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// An empty clipboard.
    pub const fn new() -> Self {
        Self { contents: None }
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn write(&mut self, text: &str) {
        self.contents = Some(text.into());
    }
}

/// State of one editable text field.
///
/// Positions are char indices. The selection is the ordered range between the
/// anchor (where a selection began) and the caret, so extending from the
/// anchor works in either direction. A collapsed selection has
/// `anchor == caret`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEditor {
    text: String,
    caret: usize,
    anchor: usize,
    max_length: Option<usize>,
    multiline: bool,
    editable: bool,
    focused: bool,
    blink: f64,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextEditor {
    /// A single-line, editable, unfocused editor holding `text`, caret at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let mut editor = Self {
            text: String::new(),
            caret: 0,
            anchor: 0,
            max_length: None,
            multiline: false,
            editable: true,
            focused: false,
            blink: 0.0,
        };
        editor.set_text(text);
        editor.caret = editor.char_len();
        editor.anchor = editor.caret;
        editor
    }

    /// Limit the text to `max` chars. The current text is truncated.
    #[must_use]
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        let text = core::mem::take(&mut self.text);
        self.set_text(text);
        self
    }

    /// Allow line breaks.
    #[must_use]
    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Allow key input to change the text.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Replace the text, applying line-break normalization and the length
    /// limit. Caret and anchor are clamped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = self.normalize(&text, self.max_length.unwrap_or(usize::MAX));
        let len = self.char_len();
        self.caret = self.caret.min(len);
        self.anchor = self.anchor.min(len);
    }

    /// Maximum length in chars, if limited.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether line breaks are allowed.
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Whether key input may change the text.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Whether the editor has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Caret position.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Ordered selection range `[start, end)`.
    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.caret), self.anchor.max(self.caret))
    }

    /// Whether the selection is non-empty.
    pub fn has_selection(&self) -> bool {
        self.anchor != self.caret
    }

    /// The selected text.
    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection();
        &self.text[byte_offset(&self.text, start)..byte_offset(&self.text, end)]
    }

    /// Take focus and restart the caret blink.
    pub fn focus(&mut self) {
        self.focused = true;
        self.blink = 0.0;
    }

    /// Drop focus, collapsing the selection at the caret.
    pub fn blur(&mut self) {
        self.focused = false;
        self.anchor = self.caret;
    }

    /// Advance the caret blink timer.
    pub fn tick(&mut self, dt: f64) {
        if self.focused {
            self.blink = (self.blink + dt) % CARET_BLINK_PERIOD;
        }
    }

    /// Whether the caret is in the visible half of its blink cycle.
    pub fn caret_visible(&self) -> bool {
        self.focused && self.blink < CARET_BLINK_PERIOD / 2.0
    }

    /// Place the caret and the selection anchor at `index`.
    pub fn begin_selection(&mut self, index: usize) {
        self.move_to(index, false);
    }

    /// Move the caret to `index`, keeping the anchor.
    pub fn extend_selection(&mut self, index: usize) {
        self.move_to(index, true);
    }

    /// Select the whole text.
    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.caret = self.char_len();
    }

    /// Move the caret to `index` (clamped). With `extend` the anchor stays put.
    pub fn move_to(&mut self, index: usize, extend: bool) {
        self.caret = index.min(self.char_len());
        if !extend {
            self.anchor = self.caret;
        }
        self.blink = 0.0;
    }

    /// Insert `text` at the caret, replacing the selection.
    ///
    /// Control characters are dropped; in single-line mode line breaks become
    /// spaces. The insertion is truncated to what the length limit allows.
    /// Returns `true` if the text changed.
    pub fn insert(&mut self, text: &str) -> bool {
        if !self.editable {
            return false;
        }
        let (start, end) = self.selection();
        let remaining = self
            .max_length
            .map_or(usize::MAX, |max| max.saturating_sub(self.char_len() - (end - start)));
        let incoming = self.normalize(text, remaining);
        if incoming.is_empty() && start == end {
            return false;
        }
        let range = byte_offset(&self.text, start)..byte_offset(&self.text, end);
        self.text.replace_range(range, &incoming);
        self.caret = start + incoming.chars().count();
        self.anchor = self.caret;
        self.blink = 0.0;
        true
    }

    /// Delete the selection. Returns `true` if there was one.
    pub fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        self.insert("")
    }

    /// Backspace: delete the selection, or the char before the caret, or with
    /// `word` everything back to the previous space boundary.
    pub fn delete_backward(&mut self, word: bool) -> bool {
        if !self.editable {
            return false;
        }
        if self.has_selection() {
            return self.delete_selection();
        }
        if self.caret == 0 {
            return false;
        }
        let target = if word {
            let chars: Vec<char> = self.text.chars().collect();
            let mut i = self.caret;
            while i > 0 && chars[i - 1] == ' ' {
                i -= 1;
            }
            while i > 0 && chars[i - 1] != ' ' {
                i -= 1;
            }
            i
        } else {
            self.caret - 1
        };
        self.anchor = target;
        self.insert("")
    }

    /// Delete: delete the selection, or the char after the caret, or with
    /// `word` everything up to the next space boundary.
    pub fn delete_forward(&mut self, word: bool) -> bool {
        if !self.editable {
            return false;
        }
        if self.has_selection() {
            return self.delete_selection();
        }
        let len = self.char_len();
        if self.caret >= len {
            return false;
        }
        let target = if word {
            let chars: Vec<char> = self.text.chars().collect();
            let mut i = self.caret;
            while i < len && chars[i] == ' ' {
                i += 1;
            }
            while i < len && chars[i] != ' ' {
                i += 1;
            }
            i
        } else {
            self.caret + 1
        };
        self.anchor = target;
        self.insert("")
    }

    /// Write the selection to `clipboard`. Returns `false` if nothing is selected.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        if !self.has_selection() {
            return false;
        }
        clipboard.write(self.selected_text());
        true
    }

    /// Copy, then delete the selection. Returns `true` if the text changed.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        self.editable && self.copy(clipboard) && self.delete_selection()
    }

    /// Insert the clipboard text (subject to the length limit).
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        match clipboard.read() {
            Some(text) => self.insert(&text),
            None => false,
        }
    }

    /// Handle a key press. Keys are ignored unless the editor is focused and
    /// editable.
    pub fn handle_key(&mut self, input: KeyInput, clipboard: &mut dyn Clipboard) -> EditOutcome {
        if !self.focused || !self.editable {
            return EditOutcome::Ignored;
        }
        let m = input.modifiers;
        let changed = |c: bool| {
            if c {
                EditOutcome::Changed
            } else {
                EditOutcome::Ignored
            }
        };
        match input.key {
            Key::Char(c) if m.command => match c.to_ascii_lowercase() {
                'a' => {
                    self.select_all();
                    EditOutcome::Moved
                }
                'c' if self.copy(clipboard) => EditOutcome::Copied,
                'x' => changed(self.cut(clipboard)),
                'v' => changed(self.paste(clipboard)),
                _ => EditOutcome::Ignored,
            },
            Key::Char(c) if c.is_control() => EditOutcome::Ignored,
            Key::Char(c) => {
                let mut buf = [0_u8; 4];
                changed(self.insert(c.encode_utf8(&mut buf)))
            }
            Key::Backspace => changed(self.delete_backward(m.word)),
            Key::Delete => changed(self.delete_forward(m.word)),
            Key::Left => {
                if self.has_selection() && !m.shift {
                    let (start, _) = self.selection();
                    self.move_to(start, false);
                } else {
                    self.move_to(self.caret.saturating_sub(1), m.shift);
                }
                EditOutcome::Moved
            }
            Key::Right => {
                if self.has_selection() && !m.shift {
                    let (_, end) = self.selection();
                    self.move_to(end, false);
                } else {
                    self.move_to(self.caret + 1, m.shift);
                }
                EditOutcome::Moved
            }
            Key::Home => {
                self.move_to(self.line_start(), m.shift);
                EditOutcome::Moved
            }
            Key::End => {
                self.move_to(self.line_end(), m.shift);
                EditOutcome::Moved
            }
            Key::Enter if self.multiline => changed(self.insert("\n")),
            Key::Enter => {
                self.blur();
                EditOutcome::Submitted(self.text.clone())
            }
            Key::Escape => {
                self.blur();
                EditOutcome::Blurred
            }
        }
    }

    fn line_start(&self) -> usize {
        let before = &self.text[..byte_offset(&self.text, self.caret)];
        before
            .rfind('\n')
            .map_or(0, |b| before[..=b].chars().count())
    }

    fn line_end(&self) -> usize {
        let from = byte_offset(&self.text, self.caret);
        self.text[from..]
            .find('\n')
            .map_or(self.char_len(), |b| self.caret + self.text[from..from + b].chars().count())
    }

    fn normalize(&self, text: &str, limit: usize) -> String {
        text.chars()
            .filter_map(|c| match c {
                '\r' if self.multiline => None,
                '\n' | '\r' if !self.multiline => Some(' '),
                '\n' => Some('\n'),
                c if c.is_control() => None,
                c => Some(c),
            })
            .take(limit)
            .collect()
    }
}
