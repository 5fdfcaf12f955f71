// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame driver: one tree, one input dispatcher.

use kurbo::Size;
use trellis_input::{DispatchReport, InputDispatcher, PointerSample};
use trellis_text::{EditOutcome, KeyInput};
use trellis_tree::{Surface, Tree};

/// A scene tree with its input dispatcher.
///
/// Each frame the host feeds pointer samples and key presses, then calls
/// [`Ui::update`] and [`Ui::render`] in that order.
#[derive(Debug, Default)]
pub struct Ui {
    /// The scene.
    pub tree: Tree,
    /// Pointer and key routing.
    pub input: InputDispatcher,
}

impl Ui {
    /// A UI whose root container covers `size`.
    pub fn new(size: Size) -> Self {
        Self {
            tree: Tree::new(size),
            input: InputDispatcher::new(),
        }
    }

    /// Resize the root container, for example when the window resizes.
    pub fn resize(&mut self, size: Size) {
        if size != self.tree.container_size() {
            tracing::debug!(?size, "resize");
            self.tree.set_container_size(size);
        }
    }

    /// Queue a pointer sample for the next update.
    pub fn pointer_sample(&mut self, sample: PointerSample) {
        self.input.pointer_sample(sample);
    }

    /// Route a key press to the focused text field.
    pub fn key(&mut self, input: KeyInput) -> EditOutcome {
        self.input.key(&mut self.tree, input)
    }

    /// Dispatch queued input, then advance the tree by `dt` seconds.
    pub fn update(&mut self, dt: f64) -> DispatchReport {
        let report = self.input.dispatch(&mut self.tree);
        self.tree.update(dt);
        report
    }

    /// Paint the tree.
    pub fn render(&mut self, surface: &mut (dyn Surface + 'static)) {
        self.tree.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    use kurbo::{Point, Vec2};
    use trellis_tree::{Color, Dim2, LocalNode, NodeFlags, RecordingSurface, Style};

    #[test]
    fn update_dispatches_before_ticking() {
        let mut ui = Ui::new(Size::new(100.0, 100.0));
        let list = ui
            .tree
            .insert(
                ui.tree.root(),
                LocalNode {
                    size: Dim2::absolute(100.0, 100.0),
                    flags: NodeFlags::default() | NodeFlags::SCROLL_Y,
                    canvas_size: Vec2::new(0.0, 400.0),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        ui.pointer_sample(
            PointerSample::mouse(Point::new(50.0, 50.0), false).with_scroll(Vec2::new(0.0, 40.0)),
        );
        ui.update(1.0 / 60.0);
        // The wheel moved the goal and the same tick eased toward it.
        assert_eq!(ui.tree.goal_canvas_position(list), Some(Vec2::new(0.0, -40.0)));
        assert_eq!(ui.tree.canvas_position(list), Some(Vec2::new(0.0, -10.0)));
    }

    #[test]
    fn resize_changes_relative_layout() {
        let mut ui = Ui::new(Size::new(100.0, 100.0));
        let half = ui
            .tree
            .insert(
                ui.tree.root(),
                LocalNode {
                    size: Dim2::scale(0.5, 1.0),
                    style: Style::default().with_background(Color::WHITE),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        ui.resize(Size::new(300.0, 100.0));
        assert_eq!(ui.tree.resolve_size(half), Some(Size::new(150.0, 100.0)));

        let painted = Rc::new(Cell::new(0));
        let sink = Rc::clone(&painted);
        ui.tree
            .signals_mut(half)
            .unwrap()
            .paint
            .listen(move |_, _| sink.set(sink.get() + 1));
        let mut surface = RecordingSurface::default();
        ui.render(&mut surface);
        assert_eq!(painted.get(), 1);
    }
}
