// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font description and the text measurement contract.

use alloc::string::String;

/// Advance of one character in [`MonospaceMeasure::default`], as a fraction of the font size.
pub const DEFAULT_EM_ADVANCE: f64 = 0.6;

/// A font selection: family name and pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name understood by the drawing backend.
    pub family: String,
    /// Size in surface units.
    pub size: f64,
}

impl Font {
    /// Create a font description.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Same family at a different size.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 16.0)
    }
}

/// Measures the advance width of a run of text.
///
/// Implemented by drawing backends (see the surface contract in `trellis_tree`)
/// and by stand-ins used for headless layout.
pub trait TextMeasure {
    /// Width of `text` in surface units when set in `font`.
    fn measure(&self, text: &str, font: &Font) -> f64;
}

/// Fixed-advance measurement: every `char` is `font.size * em_advance` wide.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance per character as a fraction of the font size.
    pub em_advance: f64,
}

impl MonospaceMeasure {
    /// Create a measure with the given per-character advance (in ems).
    pub const fn new(em_advance: f64) -> Self {
        Self { em_advance }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(DEFAULT_EM_ADVANCE)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font: &Font) -> f64 {
        let count = text.chars().count() as f64;
        count * font.size * self.em_advance
    }
}
