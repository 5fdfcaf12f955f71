// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing-surface contract, and a recording implementation.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Point, Rect, Shape, Vec2};
use trellis_text::{Font, MonospaceMeasure, TextMeasure};

use crate::asset::Image;
use crate::style::{Color, Shadow};
use crate::util::{overlaps, transform_rect_bbox};

/// A 2D immediate-mode raster target.
///
/// State (transform, clip, global alpha, shadow) is saved and restored as a
/// stack. Transforms compose with the current one. Text metrics come from the
/// [`TextMeasure`] supertrait.
pub trait Surface: TextMeasure {
    /// Push the current state.
    fn save(&mut self);
    /// Pop to the last saved state.
    fn restore(&mut self);
    /// Translate the current transform.
    fn translate(&mut self, offset: Vec2);
    /// Rotate the current transform, in radians.
    fn rotate(&mut self, radians: f64);
    /// Scale the current transform.
    fn scale(&mut self, factor: Vec2);
    /// Set the alpha applied to everything drawn until the next restore.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Set or clear the shadow applied to fills.
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    /// Fill a path.
    fn fill_path(&mut self, path: &BezPath, color: Color);
    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);
    /// Intersect the clip with a path.
    fn clip(&mut self, path: &BezPath);
    /// Draw one line of text. `origin` is the top-left of the line box.
    fn fill_text(&mut self, text: &str, origin: Point, font: &Font, color: Color);
    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, image: &Image, rect: Rect);
}

/// One recorded drawing operation, in device coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A filled path; `bounds` is its device-space bounding box.
    Fill {
        /// Bounding box.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// A stroked path.
    Stroke {
        /// Bounding box of the path (not the stroke outline).
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// A line of text.
    Text {
        /// The text.
        text: String,
        /// Device-space top-left of the line box.
        origin: Point,
        /// Glyph color.
        color: Color,
    },
    /// An image.
    Image {
        /// The image.
        image: Image,
        /// Device-space bounding box of the destination.
        bounds: Rect,
    },
}

/// A command with the state it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    /// The operation.
    pub command: DrawCommand,
    /// Device-space bounding box of the clip, if any.
    pub clip: Option<Rect>,
    /// Global alpha.
    pub alpha: f64,
    /// Active shadow.
    pub shadow: Option<Shadow>,
}

impl Recorded {
    /// Returns `true` if the clip leaves any part of the command's bounds visible.
    pub fn is_visible(&self) -> bool {
        let Some(clip) = self.clip else {
            return true;
        };
        match &self.command {
            DrawCommand::Fill { bounds, .. }
            | DrawCommand::Stroke { bounds, .. }
            | DrawCommand::Image { bounds, .. } => overlaps(*bounds, clip),
            DrawCommand::Text { origin, .. } => clip.contains(*origin),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct State {
    transform: Affine,
    clip: Option<Rect>,
    alpha: f64,
    shadow: Option<Shadow>,
}

/// A [`Surface`] that records commands instead of rasterizing.
///
/// Clips are tracked as device-space bounding boxes. Text is measured with a
/// [`MonospaceMeasure`].
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    commands: Vec<Recorded>,
    state: State,
    stack: Vec<State>,
    measure: MonospaceMeasure,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(MonospaceMeasure::default())
    }
}

impl RecordingSurface {
    /// An empty recording that measures text with `measure`.
    pub fn new(measure: MonospaceMeasure) -> Self {
        Self {
            commands: Vec::new(),
            state: State {
                transform: Affine::IDENTITY,
                clip: None,
                alpha: 1.0,
                shadow: None,
            },
            stack: Vec::new(),
            measure,
        }
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[Recorded] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recording empty.
    pub fn take(&mut self) -> Vec<Recorded> {
        core::mem::take(&mut self.commands)
    }

    /// Device-space bounds and colors of every fill, in order.
    pub fn fills(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|r| match r.command {
            DrawCommand::Fill { bounds, color } => Some((bounds, color)),
            _ => None,
        })
    }

    /// Every line of text drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|r| match &r.command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Current save depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn record(&mut self, command: DrawCommand) {
        self.commands.push(Recorded {
            command,
            clip: self.state.clip,
            alpha: self.state.alpha,
            shadow: self.state.shadow,
        });
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&self, text: &str, font: &Font) -> f64 {
        self.measure.measure(text, font)
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform *= Affine::translate(offset);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    fn scale(&mut self, factor: Vec2) {
        self.state.transform *= Affine::scale_non_uniform(factor.x, factor.y);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let bounds = transform_rect_bbox(self.state.transform, path.bounding_box());
        self.record(DrawCommand::Fill { bounds, color });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        let bounds = transform_rect_bbox(self.state.transform, path.bounding_box());
        self.record(DrawCommand::Stroke {
            bounds,
            color,
            width,
        });
    }

    fn clip(&mut self, path: &BezPath) {
        let bounds = transform_rect_bbox(self.state.transform, path.bounding_box());
        self.state.clip = Some(match self.state.clip {
            Some(c) => c.intersect(bounds),
            None => bounds,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, _font: &Font, color: Color) {
        let origin = self.state.transform * origin;
        self.record(DrawCommand::Text {
            text: text.into(),
            origin,
            color,
        });
    }

    fn draw_image(&mut self, image: &Image, rect: Rect) {
        let bounds = transform_rect_bbox(self.state.transform, rect);
        self.record(DrawCommand::Image {
            image: *image,
            bounds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_stack_restores_transform_and_clip() {
        let mut s = RecordingSurface::default();
        s.save();
        s.translate(Vec2::new(10.0, 20.0));
        s.clip(&Rect::new(0.0, 0.0, 5.0, 5.0).to_path(0.1));
        s.fill_path(&Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1), Color::BLACK);
        s.restore();
        s.fill_path(&Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1), Color::WHITE);

        let cmds = s.commands();
        assert_eq!(cmds[0].clip, Some(Rect::new(10.0, 20.0, 15.0, 25.0)));
        assert_eq!(
            cmds[0].command,
            DrawCommand::Fill {
                bounds: Rect::new(10.0, 20.0, 11.0, 21.0),
                color: Color::BLACK
            }
        );
        assert_eq!(cmds[1].clip, None, "restore drops the clip");
        assert_eq!(s.depth(), 0);
    }
}
