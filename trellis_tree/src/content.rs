// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a node draws inside its rectangle.
//!
//! [`Content`] is a closed set of node kinds. Each kind clones itself, so a
//! cloned subtree keeps the concrete kind of every node.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use kurbo::Size;
use trellis_text::{TextBlock, TextEditor, TextLayout, TextMeasure, TextStyle};

use crate::asset::{Image, ImageAsset};
use crate::style::Color;

/// The kind-specific payload of a node.
#[derive(Clone, Debug, Default)]
pub enum Content {
    /// Plain box.
    #[default]
    Empty,
    /// Static text.
    Text(TextContent),
    /// Editable text.
    TextField(TextField),
    /// Image from an asset collaborator.
    Image(ImageContent),
}

impl Content {
    /// Static text content.
    pub fn text(text: impl Into<String>, style: TextStyle, color: Color) -> Self {
        Self::Text(TextContent::new(text, style, color))
    }

    /// Returns the text field, if this is one.
    pub fn as_text_field(&self) -> Option<&TextField> {
        match self {
            Self::TextField(field) => Some(field),
            _ => None,
        }
    }

    /// Returns the text field mutably, if this is one.
    pub fn as_text_field_mut(&mut self) -> Option<&mut TextField> {
        match self {
            Self::TextField(field) => Some(field),
            _ => None,
        }
    }

    /// Short name of the node kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::TextField(_) => "text_field",
            Self::Image(_) => "image",
        }
    }
}

/// Static, optionally wrapped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    /// Source text, style and cached layout.
    pub block: TextBlock,
    /// Fill color of the glyphs.
    pub color: Color,
}

impl TextContent {
    /// Create text content.
    pub fn new(text: impl Into<String>, style: TextStyle, color: Color) -> Self {
        Self {
            block: TextBlock::new(text, style),
            color,
        }
    }

    /// Layout for a box of `size`, cached until text, style or size change.
    pub fn layout(&mut self, size: Size, measure: &dyn TextMeasure) -> &TextLayout {
        self.block.layout(size, measure)
    }
}

/// An editable text field: the editor state plus how it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct TextField {
    /// Caret, selection and text.
    pub editor: TextEditor,
    /// How the text is set.
    pub style: TextStyle,
    /// Glyph color.
    pub text_color: Color,
    /// Shown while the text is empty.
    pub placeholder: String,
    /// Placeholder glyph color.
    pub placeholder_color: Color,
    /// Selection highlight.
    pub selection_color: Color,
    /// Caret fill.
    pub caret_color: Color,
}

impl TextField {
    /// A field around `editor` with default colors and text style.
    pub fn new(editor: TextEditor) -> Self {
        Self {
            editor,
            style: TextStyle::default(),
            text_color: Color::BLACK,
            placeholder: String::new(),
            placeholder_color: Color::rgb(150, 150, 150),
            selection_color: Color::rgba(80, 140, 255, 110),
            caret_color: Color::BLACK,
        }
    }

    /// With placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// With a text style.
    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Layout of the current text in a box of `size`.
    ///
    /// Multiline fields wrap at the box width; single-line fields never wrap.
    pub fn layout(&self, size: Size, measure: &dyn TextMeasure) -> TextLayout {
        let mut style = self.style.clone();
        style.wrap = self.editor.is_multiline() && style.wrap;
        TextLayout::new(self.editor.text(), &style, size, measure)
    }
}

/// An image painted to fill the node's rectangle once loaded.
#[derive(Clone)]
pub struct ImageContent {
    /// The asset collaborator.
    pub asset: ImageAsset,
}

impl ImageContent {
    /// Wrap an asset handle.
    pub fn new(asset: ImageAsset) -> Self {
        Self { asset }
    }

    /// The image if its asset has loaded.
    pub fn image(&self) -> Option<Image> {
        self.asset.get().copied()
    }
}

impl fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageContent")
            .field("loaded", &self.asset.is_loaded())
            .field("shared", &Rc::strong_count(&self.asset))
            .finish()
    }
}
