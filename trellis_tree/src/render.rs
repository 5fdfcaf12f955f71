// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint pass.
//!
//! Nodes paint in the same order and under the same on-screen rule as hit
//! testing: siblings by ascending z-index, a subtree after its parent, and a
//! node that is hidden or outside the container and every clipping ancestor
//! is skipped together with its subtree.
//!
//! Per node:
//!
//! 1. Push the node transform (rotation and scale around the pivot point) and
//!    multiply the global alpha by its opacity.
//! 2. Background with the drop shadow, then the border.
//! 3. Content: text lines, a text field with selection and caret, or a loaded
//!    image.
//! 4. Fire `paint`.
//! 5. Push the child clip when clipping, fire `pre_child_paint`, translate by
//!    the scroll offset, paint the children, fire `post_child_paint`.
//! 6. Paint the scrollbar, outside the child clip.

use kurbo::{Point, Rect, Vec2};
use trellis_text::{Font, TextLayout};

use crate::content::{Content, TextField};
use crate::layout::Frame;
use crate::scrollbar::Scrollbar;
use crate::signals::PaintEvent;
use crate::style::Color;
use crate::surface::Surface;
use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};
use crate::util::rect_path;

/// Width of the text caret.
const CARET_WIDTH: f64 = 1.0;

const SCROLLBAR_TRACK: Color = Color::rgba(0, 0, 0, 40);
const SCROLLBAR_THUMB: Color = Color::rgba(0, 0, 0, 120);

impl Tree {
    /// Paint every attached, visible, on-screen node onto `surface`.
    ///
    /// Text is measured with the surface's own metrics. Paint listeners
    /// receive the surface and cannot mutate the tree.
    pub fn render(&mut self, surface: &mut (dyn Surface + 'static)) {
        let frame = self.root_frame();
        let container = self.container_rect();
        let mut painted = 0_usize;
        for child in self.paint_order(self.root()) {
            self.render_node(child, container, frame, 1.0, surface, &mut painted);
        }
        tracing::trace!(painted, "render");
    }

    fn render_node(
        &mut self,
        id: NodeId,
        parent: Rect,
        frame: Frame,
        alpha: f64,
        surface: &mut (dyn Surface + 'static),
        painted: &mut usize,
    ) {
        if !self.is_visible(id) {
            return;
        }
        let Some(rect) = self.resolve_rect_in(id, parent) else {
            return;
        };
        if !frame.shows(rect) {
            return;
        }
        *painted += 1;

        let node = self.node_mut(id);
        let local = &node.local;
        let style = local.style;
        let flags = local.flags;
        let alpha = alpha * style.opacity;
        let canvas = node.canvas_position;
        let canvas_size = local.canvas_size;

        surface.save();
        surface.set_global_alpha(alpha);
        if local.rotation != 0.0 || local.scale != Vec2::new(1.0, 1.0) {
            let size = rect.size();
            let pivot = rect.origin() + Vec2::new(local.pivot.x * size.width, local.pivot.y * size.height);
            surface.translate(pivot.to_vec2());
            surface.rotate(local.rotation);
            surface.scale(local.scale);
            surface.translate(-pivot.to_vec2());
        }

        let shape = rect_path(rect, style.corner_radius);
        if let Some(background) = style.background {
            surface.set_shadow(style.shadow);
            surface.fill_path(&shape, background);
            surface.set_shadow(None);
        }
        if let Some(border) = style.border
            && border.width > 0.0
        {
            surface.stroke_path(&shape, border.color, border.width);
        }

        paint_content(&mut node.local.content, rect, surface);

        let event = PaintEvent { node: id, rect };
        let snapshot = node.signals.paint.snapshot();
        snapshot.run(surface, &event);

        surface.save();
        if flags.contains(NodeFlags::CLIP_CHILDREN) {
            surface.clip(&shape);
        }
        let snapshot = self.node_mut(id).signals.pre_child_paint.snapshot();
        snapshot.run(surface, &event);

        surface.save();
        surface.translate(canvas);
        let inner = self.child_frame(id, rect, frame);
        for child in self.paint_order(id) {
            self.render_node(child, rect, inner, alpha, surface, painted);
        }
        surface.restore();

        let snapshot = self.node_mut(id).signals.post_child_paint.snapshot();
        snapshot.run(surface, &event);
        surface.restore();

        if flags.contains(NodeFlags::SCROLLBAR | NodeFlags::SCROLL_Y)
            && let Some(bar) = Scrollbar::vertical(rect, canvas.y, canvas_size.y)
        {
            let radius = bar.track.width() / 2.0;
            surface.fill_path(&rect_path(bar.track, radius), SCROLLBAR_TRACK);
            surface.fill_path(&rect_path(bar.thumb, radius), SCROLLBAR_THUMB);
        }
        surface.restore();
    }
}

fn paint_content(content: &mut Content, rect: Rect, surface: &mut dyn Surface) {
    let origin = rect.origin().to_vec2();
    match content {
        Content::Empty => {}
        Content::Text(text) => {
            let color = text.color;
            let font = text.block.style().font.clone();
            let layout = text.layout(rect.size(), &*surface);
            paint_lines(layout, origin, &font, color, surface);
        }
        Content::TextField(field) => paint_field(field, rect, surface),
        Content::Image(image) => {
            if let Some(pixels) = image.image() {
                surface.draw_image(&pixels, rect);
            }
        }
    }
}

fn paint_field(field: &TextField, rect: Rect, surface: &mut dyn Surface) {
    let origin = rect.origin().to_vec2();
    let font = &field.style.font;
    let layout = field.layout(rect.size(), &*surface);
    let editor = &field.editor;

    if editor.is_focused() && editor.has_selection() {
        let (start, end) = editor.selection();
        for r in layout.selection_rects(start, end, &*surface) {
            surface.fill_path(&rect_path(r + origin, 0.0), field.selection_color);
        }
    }

    if editor.text().is_empty() && !field.placeholder.is_empty() {
        let placeholder = TextLayout::new(
            &field.placeholder,
            &field.style,
            rect.size(),
            &*surface,
        );
        paint_lines(&placeholder, origin, font, field.placeholder_color, surface);
    } else {
        paint_lines(&layout, origin, font, field.text_color, surface);
    }

    if editor.caret_visible() {
        let top = layout.caret_point(editor.caret(), &*surface) + origin;
        let caret = Rect::new(top.x, top.y, top.x + CARET_WIDTH, top.y + font.size);
        surface.fill_path(&rect_path(caret, 0.0), field.caret_color);
    }
}

fn paint_lines(
    layout: &TextLayout,
    origin: Vec2,
    font: &Font,
    color: Color,
    surface: &mut dyn Surface,
) {
    for (i, line) in layout.lines().iter().enumerate() {
        if line.text.is_empty() {
            continue;
        }
        let at = layout.line_origin(i).unwrap_or(Point::ORIGIN) + origin;
        surface.fill_text(&line.text, at, font, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Size;
    use trellis_text::{TextEditor, TextStyle};

    use crate::asset::{Image, StaticAsset};
    use crate::content::ImageContent;
    use crate::style::{Shadow, Style};
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::types::{Dim2, LocalNode};

    fn filled(x: f64, y: f64, w: f64, h: f64, color: Color) -> LocalNode {
        LocalNode {
            position: Dim2::absolute(x, y),
            size: Dim2::absolute(w, h),
            style: Style::default().with_background(color),
            ..LocalNode::default()
        }
    }

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn paints_in_z_order_parent_first() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let root = tree.root();
        let top = tree
            .insert(
                root,
                LocalNode {
                    z_index: 1,
                    ..filled(0.0, 0.0, 10.0, 10.0, RED)
                },
            )
            .unwrap();
        tree.insert(root, filled(0.0, 0.0, 10.0, 10.0, GREEN)).unwrap();
        tree.insert(top, filled(1.0, 1.0, 2.0, 2.0, BLUE)).unwrap();

        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let colors: Vec<Color> = s.fills().map(|(_, c)| c).collect();
        assert_eq!(colors, [GREEN, RED, BLUE]);
        assert_eq!(s.depth(), 0, "balanced save/restore");
    }

    #[test]
    fn off_screen_and_hidden_subtrees_are_skipped() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let root = tree.root();
        let away = tree.insert(root, filled(500.0, 0.0, 10.0, 10.0, RED)).unwrap();
        // The child would be on screen, but its parent is not.
        tree.insert(away, filled(-500.0, 0.0, 10.0, 10.0, GREEN)).unwrap();
        let hidden = tree.insert(root, filled(0.0, 0.0, 10.0, 10.0, BLUE)).unwrap();
        tree.set_visible(hidden, false);
        tree.insert(root, filled(0.0, 0.0, -10.0, 10.0, BLUE)).unwrap();
        let loose = tree.create(filled(0.0, 0.0, 10.0, 10.0, RED));
        assert!(!tree.is_attached(loose));

        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        assert_eq!(s.fills().count(), 0);
    }

    #[test]
    fn children_are_clipped_and_scrolled() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let list = tree
            .insert(
                root,
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::CLIP_CHILDREN | NodeFlags::SCROLL_Y,
                    canvas_size: Vec2::new(0.0, 100.0),
                    ..filled(10.0, 10.0, 50.0, 50.0, RED)
                },
            )
            .unwrap();
        tree.insert(list, filled(0.0, 40.0, 50.0, 20.0, GREEN)).unwrap();
        tree.set_scroll(list, Vec2::new(0.0, -30.0), true);

        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let cmds = s.commands();
        let row = cmds
            .iter()
            .find(|r| matches!(r.command, DrawCommand::Fill { color, .. } if color == GREEN))
            .unwrap();
        assert_eq!(
            row.command,
            DrawCommand::Fill {
                bounds: Rect::new(10.0, 20.0, 60.0, 40.0),
                color: GREEN
            }
        );
        assert_eq!(row.clip, Some(Rect::new(10.0, 10.0, 60.0, 60.0)));
    }

    #[test]
    fn opacity_multiplies_down_the_tree() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let root = tree.root();
        let mut half = filled(0.0, 0.0, 50.0, 50.0, RED);
        half.style.opacity = 0.5;
        let a = tree.insert(root, half.clone()).unwrap();
        tree.insert(a, half).unwrap();
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let alphas: Vec<f64> = s.commands().iter().map(|r| r.alpha).collect();
        assert_eq!(alphas, [0.5, 0.25]);
    }

    #[test]
    fn pivot_rotation_keeps_center() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let root = tree.root();
        tree.insert(
            root,
            LocalNode {
                pivot: Vec2::new(0.5, 0.5),
                rotation: core::f64::consts::FRAC_PI_2,
                ..filled(50.0, 50.0, 20.0, 10.0, RED)
            },
        )
        .unwrap();
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let (bounds, _) = s.fills().next().unwrap();
        assert!((bounds.center().x - 50.0).abs() < 1e-9);
        assert!((bounds.center().y - 50.0).abs() < 1e-9);
        assert!((bounds.width() - 10.0).abs() < 1e-9, "rotated a quarter turn");
    }

    #[test]
    fn text_lines_and_placeholder() {
        let mut tree = Tree::new(Size::new(400.0, 400.0));
        let root = tree.root();
        tree.insert(
            root,
            LocalNode {
                size: Dim2::absolute(300.0, 100.0),
                content: Content::text("one\ntwo", TextStyle::default(), Color::BLACK),
                ..LocalNode::default()
            },
        )
        .unwrap();
        tree.insert(
            root,
            LocalNode {
                position: Dim2::absolute(0.0, 200.0),
                size: Dim2::absolute(300.0, 30.0),
                content: Content::TextField(
                    TextField::new(TextEditor::new("")).with_placeholder("name"),
                ),
                ..LocalNode::default()
            },
        )
        .unwrap();
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let texts: Vec<&str> = s.texts().collect();
        assert_eq!(texts, ["one", "two", "name"]);
    }

    #[test]
    fn focused_field_draws_caret() {
        let mut tree = Tree::new(Size::new(400.0, 400.0));
        let root = tree.root();
        let f = tree
            .insert(
                root,
                LocalNode {
                    size: Dim2::absolute(300.0, 30.0),
                    content: Content::TextField(TextField::new(TextEditor::new("ab"))),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        tree.focus_text(f);
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let (caret, color) = s.fills().last().unwrap();
        assert_eq!(color, Color::BLACK);
        assert!((caret.x0 - 2.0 * 16.0 * 0.6).abs() < 1e-9, "caret after the text");
    }

    #[test]
    fn image_paints_once_loaded() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let asset = Rc::new(StaticAsset::<Image>::pending());
        tree.insert(
            tree.root(),
            LocalNode {
                size: Dim2::absolute(10.0, 10.0),
                content: Content::Image(ImageContent::new(asset.clone())),
                ..LocalNode::default()
            },
        )
        .unwrap();

        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        assert!(s.commands().is_empty());

        let pixels = Image {
            id: 7,
            width: 10,
            height: 10,
        };
        asset.resolve(pixels);
        tree.render(&mut s);
        assert_eq!(
            s.commands()[0].command,
            DrawCommand::Image {
                image: pixels,
                bounds: Rect::new(0.0, 0.0, 10.0, 10.0)
            }
        );
    }

    #[test]
    fn paint_signals_bracket_children() {
        let mut tree = Tree::new(Size::new(100.0, 100.0));
        let root = tree.root();
        let a = tree.insert(root, filled(0.0, 0.0, 50.0, 50.0, RED)).unwrap();
        let b = tree.insert(a, filled(0.0, 0.0, 5.0, 5.0, GREEN)).unwrap();
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        for (id, name) in [(a, "a"), (b, "b")] {
            let s = tree.signals_mut(id).unwrap();
            let sink = Rc::clone(&log);
            s.paint
                .listen(move |_, _| sink.borrow_mut().push(alloc::format!("{name}.paint")));
            let sink = Rc::clone(&log);
            s.pre_child_paint
                .listen(move |_, _| sink.borrow_mut().push(alloc::format!("{name}.pre")));
            let sink = Rc::clone(&log);
            s.post_child_paint
                .listen(move |_, _| sink.borrow_mut().push(alloc::format!("{name}.post")));
        }
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        assert_eq!(
            log.borrow().as_slice(),
            ["a.paint", "a.pre", "b.paint", "b.pre", "b.post", "a.post"]
        );
    }

    #[test]
    fn scrollbar_paints_track_and_thumb() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        tree.insert(
            tree.root(),
            LocalNode {
                flags: NodeFlags::default() | NodeFlags::SCROLL_Y | NodeFlags::SCROLLBAR,
                canvas_size: Vec2::new(0.0, 100.0),
                ..filled(0.0, 0.0, 100.0, 100.0, RED)
            },
        )
        .unwrap();
        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let fills: Vec<(Rect, Color)> = s.fills().collect();
        assert_eq!(fills.len(), 3);
        let near = |a: Rect, b: Rect| {
            (a.x0 - b.x0).abs() < 1e-6
                && (a.y0 - b.y0).abs() < 1e-6
                && (a.x1 - b.x1).abs() < 1e-6
                && (a.y1 - b.y1).abs() < 1e-6
        };
        assert_eq!(fills[1].1, SCROLLBAR_TRACK);
        assert!(near(fills[1].0, Rect::new(92.0, 0.0, 100.0, 100.0)), "track");
        assert_eq!(fills[2].1, SCROLLBAR_THUMB);
        assert!(near(fills[2].0, Rect::new(92.0, 0.0, 100.0, 50.0)), "thumb");
    }

    #[test]
    fn shadow_border_and_rounded_clip() {
        let shadow = Shadow {
            color: Color::rgba(0, 0, 0, 80),
            blur: 6.0,
            offset: Vec2::new(2.0, 3.0),
        };
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let card = tree
            .insert(
                tree.root(),
                LocalNode {
                    style: Style {
                        shadow: Some(shadow),
                        ..Style::default()
                            .with_background(RED)
                            .with_border(2.0, BLUE)
                            .with_corner_radius(8.0)
                    },
                    flags: NodeFlags::default() | NodeFlags::CLIP_CHILDREN,
                    ..filled(20.0, 30.0, 100.0, 60.0, RED)
                },
            )
            .unwrap();
        tree.insert(card, filled(0.0, 0.0, 200.0, 200.0, GREEN)).unwrap();

        let mut s = RecordingSurface::default();
        tree.render(&mut s);
        let cmds = s.commands();
        let card_rect = Rect::new(20.0, 30.0, 120.0, 90.0);
        let near = |a: Rect, b: Rect| {
            (a.x0 - b.x0).abs() < 1e-6
                && (a.y0 - b.y0).abs() < 1e-6
                && (a.x1 - b.x1).abs() < 1e-6
                && (a.y1 - b.y1).abs() < 1e-6
        };

        let DrawCommand::Fill { bounds, color } = cmds[0].command else {
            panic!("background first, got {:?}", cmds[0].command);
        };
        assert_eq!(color, RED);
        assert!(near(bounds, card_rect), "rounded background keeps the node bounds");
        assert_eq!(cmds[0].shadow, Some(shadow), "background casts the shadow");
        assert!(
            cmds[1..].iter().all(|c| c.shadow.is_none()),
            "only the background carries the shadow"
        );

        let DrawCommand::Stroke {
            bounds,
            color,
            width,
        } = cmds[1].command
        else {
            panic!("border after background, got {:?}", cmds[1].command);
        };
        assert_eq!((color, width), (BLUE, 2.0));
        assert!(near(bounds, card_rect), "border follows the node shape");

        let child = cmds
            .iter()
            .find(|c| matches!(c.command, DrawCommand::Fill { color, .. } if color == GREEN))
            .expect("child painted");
        assert!(
            child.clip.is_some_and(|clip| near(clip, card_rect)),
            "rounded clip bounds match the node, got {:?}",
            child.clip
        );
    }
}
