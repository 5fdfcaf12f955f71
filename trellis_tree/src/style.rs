// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint style: colors, background, border, corner radius, shadow, opacity.

use kurbo::Vec2;

/// Straight (non-premultiplied) RGBA color, 8 bits per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Color from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color from `0xRRGGBBAA`.
    pub const fn hex(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes();
        Self::rgba(r, g, b, a)
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Returns `true` if painting this color has no effect.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// A stroke around the node's rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Border {
    /// Stroke width.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

/// A drop shadow cast by the node's background.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color.
    pub color: Color,
    /// Blur radius.
    pub blur: f64,
    /// Offset from the node.
    pub offset: Vec2,
}

/// How a node paints its own rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Style {
    /// Opacity of the node and its subtree, multiplied down the tree.
    pub opacity: f64,
    /// Background fill. `None` paints nothing and does not make the node hittable.
    pub background: Option<Color>,
    /// Border stroke.
    pub border: Option<Border>,
    /// Corner radius of background, border and child clip.
    pub corner_radius: f64,
    /// Drop shadow applied while painting the background.
    pub shadow: Option<Shadow>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            background: None,
            border: None,
            corner_radius: 0.0,
            shadow: None,
        }
    }
}

impl Style {
    /// With a background fill.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// With a border.
    #[must_use]
    pub fn with_border(mut self, width: f64, color: Color) -> Self {
        self.border = Some(Border { width, color });
        self
    }

    /// With rounded corners.
    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }
}
