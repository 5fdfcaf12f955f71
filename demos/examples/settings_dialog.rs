// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrolling list, a modal dialog and a text field, driven headlessly.
//!
//! This example shows how to:
//! - build a tree with hybrid placement and a scrollbar,
//! - open a modal dialog from a button's `pointer_up`,
//! - type into a focused text field and react to `submit`,
//! - render frames onto a `RecordingSurface`.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example settings_dialog`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use trellis::{
    Color, Content, Dim2, HAlign, Key, KeyInput, LocalNode, NodeFlags, NodeId, PointerSample,
    RecordingSurface, Style, TextEditor, TextField, TextStyle, Tree, Ui, VAlign,
};
use tracing_subscriber::EnvFilter;

const ROWS: usize = 20;
const ROW_HEIGHT: f64 = 32.0;

fn label(text: &str) -> Content {
    Content::text(
        text,
        TextStyle {
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            ..TextStyle::default()
        },
        Color::BLACK,
    )
}

/// A clickable, centered-text button.
fn button(tree: &mut Tree, parent: NodeId, position: Dim2, text: &str) -> NodeId {
    tree.insert(
        parent,
        LocalNode {
            position,
            size: Dim2::absolute(120.0, 32.0),
            style: Style::default()
                .with_background(Color::rgb(220, 220, 230))
                .with_corner_radius(4.0),
            flags: NodeFlags::default() | NodeFlags::CLICKABLE,
            content: label(text),
            ..LocalNode::default()
        },
    )
    .expect("parent is alive")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut ui = Ui::new(Size::new(400.0, 300.0));
    ui.input.set_sound_on_click(true);
    let root = ui.tree.root();

    // Left: a list taller than its viewport.
    let list = ui
        .tree
        .insert(
            root,
            LocalNode {
                size: Dim2::new(Vec2::ZERO, Vec2::new(0.5, 1.0)),
                style: Style::default().with_background(Color::WHITE),
                flags: NodeFlags::default()
                    | NodeFlags::CLIP_CHILDREN
                    | NodeFlags::SCROLL_Y
                    | NodeFlags::SCROLLBAR,
                canvas_size: Vec2::new(0.0, ROWS as f64 * ROW_HEIGHT - 300.0),
                ..LocalNode::default()
            },
        )
        .expect("root is alive");
    for i in 0..ROWS {
        let shade = if i % 2 == 0 { 245 } else { 235 };
        ui.tree
            .insert(
                list,
                LocalNode {
                    position: Dim2::absolute(0.0, i as f64 * ROW_HEIGHT),
                    size: Dim2::new(Vec2::new(0.0, ROW_HEIGHT), Vec2::new(1.0, 0.0)),
                    style: Style::default().with_background(Color::rgb(shade, shade, shade)),
                    content: label(&format!("Row {i}")),
                    ..LocalNode::default()
                },
            )
            .expect("list is alive");
    }

    // Right: a button that opens the dialog.
    let open = button(
        &mut ui.tree,
        root,
        Dim2::new(Vec2::new(20.0, 20.0), Vec2::new(0.5, 0.0)),
        "Rename",
    );

    // The dialog: centered, modal, hidden until opened.
    let dialog = ui
        .tree
        .insert(
            root,
            LocalNode {
                position: Dim2::scale(0.5, 0.5),
                pivot: (0.5, 0.5).into(),
                size: Dim2::absolute(260.0, 120.0),
                z_index: 10,
                style: Style::default()
                    .with_background(Color::rgb(250, 250, 255))
                    .with_border(1.0, Color::rgb(90, 90, 120)),
                flags: (NodeFlags::default() | NodeFlags::MODAL) - NodeFlags::VISIBLE,
                ..LocalNode::default()
            },
        )
        .expect("root is alive");
    let field = ui
        .tree
        .insert(
            dialog,
            LocalNode {
                position: Dim2::absolute(20.0, 20.0),
                size: Dim2::new(Vec2::new(-40.0, 28.0), Vec2::new(1.0, 0.0)),
                style: Style::default().with_border(1.0, Color::rgb(160, 160, 160)),
                content: Content::TextField(
                    TextField::new(TextEditor::new("").with_max_length(24))
                        .with_placeholder("New name"),
                ),
                ..LocalNode::default()
            },
        )
        .expect("dialog is alive");

    let submitted = Rc::new(RefCell::new(Vec::new()));
    ui.tree
        .signals_mut(open)
        .expect("button is alive")
        .pointer_up
        .listen(move |tree, _| {
            tracing::info!("opening dialog");
            tree.set_visible(dialog, true);
        });
    let names = Rc::clone(&submitted);
    ui.tree
        .signals_mut(field)
        .expect("field is alive")
        .submit
        .listen(move |tree, text| {
            tracing::info!(%text, "renamed");
            names.borrow_mut().push(text.clone());
            tree.set_visible(dialog, false);
        });

    let mut surface = RecordingSurface::default();
    let mut frame = |ui: &mut Ui, sample: Option<PointerSample>| {
        if let Some(sample) = sample {
            ui.pointer_sample(sample);
        }
        let report = ui.update(1.0 / 60.0);
        surface.take();
        ui.render(&mut surface);
        tracing::debug!(
            cursor = ?report.cursor,
            sounds = report.sounds.len(),
            commands = surface.commands().len(),
            "frame"
        );
    };

    // Wheel over the list for a few frames.
    frame(
        &mut ui,
        Some(PointerSample::mouse(Point::new(100.0, 150.0), false).with_scroll(Vec2::new(0.0, 120.0))),
    );
    for _ in 0..10 {
        frame(&mut ui, None);
    }
    tracing::info!(offset = ?ui.tree.canvas_position(list), "list scrolled");

    // Click the button.
    let at_button = Point::new(240.0, 30.0);
    frame(&mut ui, Some(PointerSample::mouse(at_button, true)));
    frame(&mut ui, Some(PointerSample::mouse(at_button, false)));

    // Clicks outside the dialog no longer reach the list.
    frame(&mut ui, Some(PointerSample::mouse(Point::new(10.0, 10.0), true)));
    frame(&mut ui, Some(PointerSample::mouse(Point::new(10.0, 10.0), false)));

    // Focus the field and type.
    let at_field = Point::new(200.0, 134.0);
    frame(&mut ui, Some(PointerSample::mouse(at_field, true)));
    frame(&mut ui, Some(PointerSample::mouse(at_field, false)));
    for c in "Trellis".chars() {
        ui.key(KeyInput::new(Key::Char(c)));
    }
    ui.key(KeyInput::new(Key::Enter));
    frame(&mut ui, None);

    tracing::info!(
        names = ?submitted.borrow(),
        dialog_visible = ui.tree.is_visible(dialog),
        "done"
    );
}
