// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placing wrapped lines inside a box, and mapping between pixels and char indices.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect, Size};

use crate::font::{Font, TextMeasure};
use crate::wrap::{Line, split_lines, wrap};

/// Horizontal alignment of each line inside the text box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    /// Flush against the left padding.
    #[default]
    Left,
    /// Centered in the full box width.
    Center,
    /// Flush against the right padding.
    Right,
}

/// Vertical alignment of the block of lines inside the text box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    /// Below the top padding.
    #[default]
    Top,
    /// Centered in the full box height.
    Center,
    /// Above the bottom padding.
    Bottom,
}

/// How a text block is set.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font used for every line.
    pub font: Font,
    /// Extra space between lines, added to the font size.
    pub line_height: f64,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
    /// Padding between the box edges and the text.
    pub padding: Insets,
    /// Wrap at the box width. When `false` only explicit line breaks split the
    /// text, and lines are placed at the fixed top-left padding offset
    /// regardless of alignment.
    pub wrap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: Font::default(),
            line_height: 4.0,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            padding: Insets::ZERO,
            wrap: true,
        }
    }
}

impl TextStyle {
    /// Vertical distance between the tops of consecutive lines.
    pub fn line_advance(&self) -> f64 {
        self.font.size + self.line_height
    }
}

/// Lines of a text block positioned inside a box of a given size.
///
/// Coordinates are local to the box: `(0, 0)` is its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    lines: Vec<Line>,
    origins: Vec<Point>,
    font: Font,
    advance: f64,
}

impl TextLayout {
    /// Lay out `text` inside a box of `size`.
    pub fn new(text: &str, style: &TextStyle, size: Size, measure: &dyn TextMeasure) -> Self {
        let font = &style.font;
        let advance = style.line_advance();
        let measure_fn = |s: &str| measure.measure(s, font);
        let padding = style.padding;

        if !style.wrap {
            let lines = split_lines(text, measure_fn);
            let origins = (0..lines.len())
                .map(|i| Point::new(padding.x0, padding.y0 + advance * i as f64))
                .collect();
            return Self {
                lines,
                origins,
                font: font.clone(),
                advance,
            };
        }

        let max_width = size.width - padding.x0 - padding.x1;
        let lines = wrap(text, max_width, measure_fn);
        let block_height = advance * lines.len() as f64;
        let top = match style.v_align {
            VAlign::Top => padding.y0,
            VAlign::Center => {
                padding.y0 + (size.height - padding.y0 - padding.y1 - block_height) / 2.0
            }
            VAlign::Bottom => size.height - block_height - padding.y1,
        };
        let origins = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let x = match style.h_align {
                    HAlign::Left => padding.x0,
                    HAlign::Center => padding.x0 + (max_width - line.width) / 2.0,
                    HAlign::Right => size.width - line.width - padding.x1,
                };
                Point::new(x, top + advance * i as f64)
            })
            .collect();
        Self {
            lines,
            origins,
            font: font.clone(),
            advance,
        }
    }

    /// The laid-out lines, top to bottom.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Top-left corner of line `i`'s box, or `None` if out of range.
    pub fn line_origin(&self, i: usize) -> Option<Point> {
        self.origins.get(i).copied()
    }

    /// Vertical distance between line tops.
    pub fn line_advance(&self) -> f64 {
        self.advance
    }

    /// Total height of the block: `line_advance * line_count`.
    pub fn block_height(&self) -> f64 {
        self.advance * self.lines.len() as f64
    }

    /// Index of the line whose vertical band contains `y`.
    ///
    /// Points above the first line map to the first line and points below the
    /// last line map to the last line.
    pub fn line_at_y(&self, y: f64) -> usize {
        for (i, origin) in self.origins.iter().enumerate() {
            if y < origin.y + self.advance {
                return i;
            }
        }
        self.lines.len().saturating_sub(1)
    }

    /// Char index under `point` (box-local).
    ///
    /// Characters of the chosen line are scanned left to right, accumulating
    /// their widths, until `point.x` falls inside a glyph's span. Points past
    /// the end of the line map to the line end.
    pub fn index_at(&self, point: Point, measure: &dyn TextMeasure) -> usize {
        let i = self.line_at_y(point.y);
        let (Some(line), Some(origin)) = (self.lines.get(i), self.origins.get(i)) else {
            return 0;
        };
        let mut acc = origin.x;
        let mut buf = [0_u8; 4];
        for (col, c) in line.text.chars().enumerate() {
            let w = measure.measure(c.encode_utf8(&mut buf), &self.font);
            if point.x < acc + w {
                return line.start + col;
            }
            acc += w;
        }
        line.end()
    }

    /// Index of the line that shows the caret at char `index`.
    fn line_of(&self, index: usize) -> usize {
        self.lines
            .iter()
            .rposition(|l| l.start <= index)
            .unwrap_or(0)
    }

    fn x_of(&self, line: usize, index: usize, measure: &dyn TextMeasure) -> f64 {
        let (Some(l), Some(origin)) = (self.lines.get(line), self.origins.get(line)) else {
            return 0.0;
        };
        let col = index.saturating_sub(l.start).min(l.char_len());
        let prefix: String = l.text.chars().take(col).collect();
        origin.x + measure.measure(&prefix, &self.font)
    }

    /// Top of the caret for char `index` (box-local). The caret is
    /// `font.size` tall.
    pub fn caret_point(&self, index: usize, measure: &dyn TextMeasure) -> Point {
        let line = self.line_of(index);
        let y = self.origins.get(line).map_or(0.0, |o| o.y);
        Point::new(self.x_of(line, index, measure), y)
    }

    /// Highlight rectangles covering chars `start..end`, one per line touched.
    pub fn selection_rects(&self, start: usize, end: usize, measure: &dyn TextMeasure) -> Vec<Rect> {
        let mut rects = Vec::new();
        if start >= end {
            return rects;
        }
        for (i, line) in self.lines.iter().enumerate() {
            let s = start.max(line.start);
            let e = end.min(line.end());
            if s >= e {
                continue;
            }
            let y = self.origins[i].y;
            rects.push(Rect::new(
                self.x_of(i, s, measure),
                y,
                self.x_of(i, e, measure),
                y + self.advance,
            ));
        }
        rects
    }
}

/// A text source with its style and a cached layout.
///
/// The layout is recomputed only when the text, the style or the box size
/// changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    text: String,
    style: TextStyle,
    cached: Option<(Size, TextLayout)>,
}

impl TextBlock {
    /// Create a block with the given text and style.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            cached: None,
        }
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.cached = None;
        }
    }

    /// The style.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Replace the style.
    pub fn set_style(&mut self, style: TextStyle) {
        if style != self.style {
            self.style = style;
            self.cached = None;
        }
    }

    /// Layout for a box of `size`, reusing the cached one when still valid.
    pub fn layout(&mut self, size: Size, measure: &dyn TextMeasure) -> &TextLayout {
        if self.cached.as_ref().is_some_and(|(s, _)| *s != size) {
            self.cached = None;
        }
        let (_, layout) = self
            .cached
            .get_or_insert_with(|| (size, TextLayout::new(&self.text, &self.style, size, measure)));
        layout
    }

    /// Whether a layout is cached.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceMeasure;

    // 10 px per char at size 10.
    const MONO: MonospaceMeasure = MonospaceMeasure::new(1.0);

    fn style() -> TextStyle {
        TextStyle {
            font: Font::new("mono", 10.0),
            line_height: 2.0,
            ..TextStyle::default()
        }
    }

    #[test]
    fn left_top_with_padding() {
        let mut s = style();
        s.padding = Insets::new(5.0, 3.0, 5.0, 3.0);
        let layout = TextLayout::new("aa bb cc", &s, Size::new(60.0, 100.0), &MONO);
        let text: Vec<&str> = layout.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, ["aa bb", "cc"], "wraps at width minus padding");
        assert_eq!(layout.line_origin(0), Some(Point::new(5.0, 3.0)));
        assert_eq!(layout.line_origin(1), Some(Point::new(5.0, 15.0)));
        assert_eq!(layout.block_height(), 24.0);
    }

    #[test]
    fn centered_and_bottom() {
        let mut s = style();
        s.h_align = HAlign::Center;
        s.v_align = VAlign::Center;
        let layout = TextLayout::new("abcd", &s, Size::new(100.0, 50.0), &MONO);
        assert_eq!(layout.line_origin(0), Some(Point::new(30.0, 19.0)));

        s.h_align = HAlign::Right;
        s.v_align = VAlign::Bottom;
        s.padding = Insets::new(0.0, 0.0, 4.0, 2.0);
        let layout = TextLayout::new("abcd", &s, Size::new(100.0, 50.0), &MONO);
        assert_eq!(layout.line_origin(0), Some(Point::new(56.0, 36.0)));
    }

    #[test]
    fn center_stays_inside_uneven_padding() {
        let mut s = style();
        s.h_align = HAlign::Center;
        s.v_align = VAlign::Center;
        s.padding = Insets::new(10.0, 6.0, 30.0, 2.0);
        let layout = TextLayout::new("abcd", &s, Size::new(100.0, 50.0), &MONO);
        // 60 x 42 padded area starting at (10, 6); the line is 40 x 12.
        assert_eq!(layout.line_origin(0), Some(Point::new(20.0, 21.0)));
    }

    #[test]
    fn no_wrap_uses_fixed_offset() {
        let mut s = style();
        s.wrap = false;
        s.h_align = HAlign::Right;
        s.v_align = VAlign::Bottom;
        s.padding = Insets::new(7.0, 9.0, 0.0, 0.0);
        let layout = TextLayout::new("a long line\nx", &s, Size::new(20.0, 20.0), &MONO);
        assert_eq!(layout.lines().len(), 2, "only explicit breaks split");
        assert_eq!(layout.line_origin(0), Some(Point::new(7.0, 9.0)));
        assert_eq!(layout.line_origin(1), Some(Point::new(7.0, 21.0)));
    }

    #[test]
    fn index_at_scans_glyph_spans() {
        let layout = TextLayout::new("abc def", &style(), Size::new(40.0, 100.0), &MONO);
        // Lines: "abc" (0..3) and "def" (4..7).
        assert_eq!(layout.index_at(Point::new(0.0, 0.0), &MONO), 0);
        assert_eq!(layout.index_at(Point::new(15.0, 5.0), &MONO), 1);
        assert_eq!(layout.index_at(Point::new(200.0, 5.0), &MONO), 3);
        assert_eq!(layout.index_at(Point::new(25.0, 13.0), &MONO), 6);
        assert_eq!(layout.index_at(Point::new(0.0, 500.0), &MONO), 4);
    }

    #[test]
    fn caret_and_selection_geometry() {
        let layout = TextLayout::new("abc def", &style(), Size::new(40.0, 100.0), &MONO);
        assert_eq!(layout.caret_point(2, &MONO), Point::new(20.0, 0.0));
        assert_eq!(layout.caret_point(5, &MONO), Point::new(10.0, 12.0));
        let rects = layout.selection_rects(1, 6, &MONO);
        assert_eq!(
            rects,
            [Rect::new(10.0, 0.0, 30.0, 12.0), Rect::new(0.0, 12.0, 20.0, 24.0)]
        );
        assert!(layout.selection_rects(3, 3, &MONO).is_empty());
    }

    #[test]
    fn block_caches_until_inputs_change() {
        let mut block = TextBlock::new("hello", style());
        let size = Size::new(200.0, 20.0);
        assert_eq!(block.layout(size, &MONO).lines().len(), 1);
        assert!(block.is_cached());
        block.set_text("hello");
        assert!(block.is_cached(), "same text keeps the cache");
        block.set_text("hello world");
        assert!(!block.is_cached());
        assert_eq!(block.layout(Size::new(60.0, 20.0), &MONO).lines().len(), 2);
        assert_eq!(block.layout(size, &MONO).lines().len(), 1, "resize relayouts");
    }
}
