// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input dispatcher: turns pointer samples into node signals.
//!
//! Each dispatch hit tests every active pointer once, scoped to the active
//! modal, and compares the resulting path (top-level node to target) with the
//! pointer's `inside` and `held` sets:
//!
//! - press edge: nodes on the path become held and get `pointer_down`;
//! - nodes newly on the path get `enter`, nodes that left it get `leave`;
//! - movement fires `pointer_move`, a wheel delta fires `scroll` on the path
//!   and scrolls the innermost scrollable node;
//! - release: held nodes still on the path get `pointer_up`, and the held set
//!   is cleared either way.
//!
//! Signals fire outermost first along the path. State is committed after the
//! dispatch, so dispatching again without a new sample fires nothing.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use trellis_text::{EditOutcome, KeyInput};
use trellis_tree::{
    Content, NodeFlags, NodeId, PointerEvent, PointerId, QueryFilter, ScrollEvent, Tree,
};

use crate::pointer::{NodeSet, Pointer, PointerKind, PointerSample};

/// Cursor shape requested by the dispatcher.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CursorShape {
    /// Nothing interactive under the pointer.
    #[default]
    Default,
    /// Over a clickable node.
    Pointer,
    /// Over a text field.
    Text,
    /// Dragging a scrollbar thumb.
    Grab,
}

/// Sound effects the application may play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UiSound {
    /// A clickable node was clicked.
    Click,
}

/// What a dispatch asks of the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The cursor to show. With several pointers, the most specific shape wins.
    pub cursor: CursorShape,
    /// Sounds to play, in order.
    pub sounds: SmallVec<[UiSound; 2]>,
}

/// Routes pointer samples and key presses into a [`Tree`].
#[derive(Clone, Debug, Default)]
pub struct InputDispatcher {
    pointers: BTreeMap<PointerId, Pointer>,
    sound_on_click: bool,
    modal: Option<NodeId>,
}

impl InputDispatcher {
    /// A dispatcher with no pointers and click sounds disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request [`UiSound::Click`] when a clickable node receives `pointer_up`.
    pub fn set_sound_on_click(&mut self, enabled: bool) {
        self.sound_on_click = enabled;
    }

    /// Whether click sounds are requested.
    pub fn sound_on_click(&self) -> bool {
        self.sound_on_click
    }

    /// Queue a sample. It takes effect at the next [`InputDispatcher::dispatch`].
    ///
    /// A touch sample that is not pressed and has no tracked contact is
    /// ignored: touch pointers exist only between contact and release.
    pub fn pointer_sample(&mut self, sample: PointerSample) {
        if sample.kind == PointerKind::Touch
            && !sample.pressed
            && !self.pointers.contains_key(&sample.id)
        {
            return;
        }
        self.pointers
            .entry(sample.id)
            .or_insert_with(|| Pointer::new(sample.kind, sample.position))
            .apply(&sample);
    }

    /// Number of tracked pointers.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Nodes `pointer` is currently over, outermost first.
    pub fn inside(&self, pointer: PointerId) -> &[NodeId] {
        self.pointers
            .get(&pointer)
            .map(|p| p.inside.as_slice())
            .unwrap_or_default()
    }

    /// Nodes `pointer` pressed and has not released yet.
    pub fn held(&self, pointer: PointerId) -> &[NodeId] {
        self.pointers
            .get(&pointer)
            .map(|p| p.held.as_slice())
            .unwrap_or_default()
    }

    /// Stop tracking a pointer (for example the mouse leaving the window).
    /// Nodes it was over receive `leave`.
    pub fn remove_pointer(&mut self, tree: &mut Tree, id: PointerId) {
        if let Some(p) = self.pointers.remove(&id) {
            release_all(tree, id, &p);
        }
    }

    /// Process every queued sample against `tree`.
    pub fn dispatch(&mut self, tree: &mut Tree) -> DispatchReport {
        let mut report = DispatchReport::default();
        let modal = tree.active_modal();
        if modal != self.modal {
            tracing::debug!(?modal, previous = ?self.modal, "modal changed");
            self.modal = modal;
        }
        let filter = tree.interactive_filter(QueryFilter::new());
        let ids: Vec<PointerId> = self.pointers.keys().copied().collect();
        for id in ids {
            let Some(p) = self.pointers.get_mut(&id) else {
                continue;
            };
            let cursor = dispatch_pointer(tree, id, p, filter, self.sound_on_click, &mut report);
            report.cursor = report.cursor.max(cursor);
            if p.kind == PointerKind::Touch && !p.pressed {
                tracing::trace!(pointer = ?id, "touch released");
                if let Some(p) = self.pointers.remove(&id) {
                    release_all(tree, id, &p);
                }
            }
        }
        report
    }

    /// Route a key press to the focused text field.
    pub fn key(&mut self, tree: &mut Tree, input: KeyInput) -> EditOutcome {
        tree.key_focused(input)
    }
}

fn event(node: NodeId, pointer: PointerId, position: Point, delta: Vec2) -> PointerEvent {
    PointerEvent {
        node,
        pointer,
        position,
        delta,
    }
}

fn release_all(tree: &mut Tree, id: PointerId, p: &Pointer) {
    for &node in p.inside.iter().rev() {
        tree.trigger(node, |s| &mut s.leave, &event(node, id, p.position, Vec2::ZERO));
    }
}

fn is_text_field(tree: &Tree, id: NodeId) -> bool {
    matches!(tree.content(id), Some(Content::TextField(_)))
}

fn dispatch_pointer(
    tree: &mut Tree,
    id: PointerId,
    p: &mut Pointer,
    filter: QueryFilter,
    sound_on_click: bool,
    report: &mut DispatchReport,
) -> CursorShape {
    let position = p.position;
    let delta = p.delta();
    let moved = delta != Vec2::ZERO;
    // Side effects of a fresh press (blur, scrollbar drag, caret) use the edge;
    // holding a node only needs the pointer to be down over it.
    let press = p.pending_press || (p.pressed && !p.last_pressed);
    let down = p.pressed || p.pending_press;
    let release = !p.pressed && (p.last_pressed || p.pending_press);
    let scroll = p.scroll;

    if let Some(node) = p.drag
        && moved
    {
        drag_to(tree, node, position.y);
    }

    let path: NodeSet = tree
        .hit_test_point(position, filter)
        .map(|h| NodeSet::from_vec(h.path))
        .unwrap_or_default();
    let target = path.last().copied();
    tracing::trace!(pointer = ?id, ?target, press, release, "dispatch");

    if press {
        if let Some(focused) = tree.focused_text()
            && target.is_none_or(|t| !tree.is_in_subtree(t, focused))
        {
            tree.blur_text();
        }
        for &node in path.iter().rev() {
            if let Some(bar) = tree.scrollbar(node)
                && bar.thumb.contains(position)
            {
                tracing::debug!(pointer = ?id, ?node, "scroll drag start");
                p.drag = Some(node);
                break;
            }
        }
    }

    for &node in &path {
        let ev = event(node, id, position, delta);
        if down && !p.held.contains(&node) {
            p.held.push(node);
            tree.trigger(node, |s| &mut s.pointer_down, &ev);
        }
        if !p.inside.contains(&node) {
            p.inside.push(node);
            tree.trigger(node, |s| &mut s.enter, &ev);
        }
        if moved {
            tree.trigger(node, |s| &mut s.pointer_move, &ev);
        }
        if scroll != Vec2::ZERO {
            let ev = ScrollEvent {
                node,
                pointer: id,
                position,
                delta: scroll,
            };
            tree.trigger(node, |s| &mut s.scroll, &ev);
        }
    }

    if press
        && p.drag.is_none()
        && let Some(t) = target
        && is_text_field(tree, t)
        && tree.focus_text(t)
    {
        tree.place_caret(t, position, false);
    } else if moved && p.pressed && p.drag.is_none() {
        for &node in &p.held {
            if tree.focused_text() == Some(node) {
                tree.place_caret(node, position, true);
            }
        }
    }

    if scroll != Vec2::ZERO
        && let Some(&node) = path
            .iter()
            .rev()
            .find(|n| tree.flags(**n).is_some_and(NodeFlags::is_scrollable))
    {
        tree.scroll_by(node, scroll);
    }

    let left: NodeSet = p
        .inside
        .iter()
        .copied()
        .filter(|n| !path.contains(n))
        .collect();
    p.inside.retain(|n| path.contains(n));
    for &node in left.iter().rev() {
        tree.trigger(node, |s| &mut s.leave, &event(node, id, position, delta));
    }

    if release {
        let held = core::mem::take(&mut p.held);
        for &node in held.iter().rev() {
            if !path.contains(&node) {
                continue;
            }
            tree.trigger(node, |s| &mut s.pointer_up, &event(node, id, position, delta));
            if sound_on_click && tree.flags(node).is_some_and(|f| f.contains(NodeFlags::CLICKABLE)) {
                report.sounds.push(UiSound::Click);
            }
        }
        if let Some(node) = p.drag.take() {
            tracing::debug!(pointer = ?id, ?node, "scroll drag end");
        }
    }

    p.commit();

    if p.drag.is_some() {
        CursorShape::Grab
    } else if target.is_some_and(|t| is_text_field(tree, t)) {
        CursorShape::Text
    } else if path
        .iter()
        .any(|n| tree.flags(*n).is_some_and(|f| f.contains(NodeFlags::CLICKABLE)))
    {
        CursorShape::Pointer
    } else {
        CursorShape::Default
    }
}

/// Map a pointer's vertical position onto the dragged node's scroll offset.
fn drag_to(tree: &mut Tree, node: NodeId, y: f64) {
    let Some(bar) = tree.scrollbar(node) else {
        return;
    };
    let x = tree.canvas_position(node).map_or(0.0, |c| c.x);
    tree.set_scroll(node, Vec2::new(x, bar.offset_for_pointer(y)), true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::RefCell;

    use kurbo::Size;
    use trellis_text::{Key, TextEditor};
    use trellis_tree::{Dim2, LocalNode, TextField};

    type Log = Rc<RefCell<Vec<String>>>;

    fn button(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
        LocalNode {
            position: Dim2::absolute(x, y),
            size: Dim2::absolute(w, h),
            flags: NodeFlags::default() | NodeFlags::CLICKABLE,
            ..LocalNode::default()
        }
    }

    /// Record every pointer channel of `id` into `log` as `"name.channel"`.
    fn record(tree: &mut Tree, id: NodeId, name: &'static str, log: &Log) {
        let s = tree.signals_mut(id).unwrap();
        let channels: [(&'static str, &mut trellis_tree::TreeSignal<PointerEvent>); 5] = [
            ("down", &mut s.pointer_down),
            ("up", &mut s.pointer_up),
            ("enter", &mut s.enter),
            ("leave", &mut s.leave),
            ("move", &mut s.pointer_move),
        ];
        for (channel, signal) in channels {
            let sink = Rc::clone(log);
            signal.listen(move |_, _| sink.borrow_mut().push(alloc::format!("{name}.{channel}")));
        }
        let sink = Rc::clone(log);
        s.scroll
            .listen(move |_, _| sink.borrow_mut().push(alloc::format!("{name}.scroll")));
    }

    fn mouse(
        d: &mut InputDispatcher,
        tree: &mut Tree,
        x: f64,
        y: f64,
        pressed: bool,
    ) -> DispatchReport {
        d.pointer_sample(PointerSample::mouse(Point::new(x, y), pressed));
        d.dispatch(tree)
    }

    fn take(log: &Log) -> Vec<String> {
        core::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn overlapping_siblings_only_top_gets_down() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let low = tree.insert(root, button(0.0, 0.0, 100.0, 100.0)).unwrap();
        let high = tree
            .insert(
                root,
                LocalNode {
                    z_index: 5,
                    ..button(0.0, 0.0, 100.0, 100.0)
                },
            )
            .unwrap();
        let log = Log::default();
        record(&mut tree, low, "low", &log);
        record(&mut tree, high, "high", &log);

        let mut d = InputDispatcher::new();
        mouse(&mut d, &mut tree, 50.0, 50.0, true);
        let events = take(&log);
        assert!(events.contains(&"high.down".into()));
        assert!(!events.iter().any(|e| e.starts_with("low")), "{events:?}");
    }

    #[test]
    fn release_outside_clears_held_without_up() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let b = tree.insert(tree.root(), button(0.0, 0.0, 50.0, 50.0)).unwrap();
        let log = Log::default();
        record(&mut tree, b, "b", &log);

        let mut d = InputDispatcher::new();
        mouse(&mut d, &mut tree, 10.0, 10.0, true);
        assert_eq!(d.held(PointerSample::MOUSE), &[b]);
        mouse(&mut d, &mut tree, 150.0, 150.0, false);
        assert_eq!(take(&log), ["b.down", "b.enter", "b.leave"]);
        assert!(d.held(PointerSample::MOUSE).is_empty());

        // Coming back and releasing again does not resurrect the press.
        mouse(&mut d, &mut tree, 10.0, 10.0, false);
        assert_eq!(take(&log), ["b.enter", "b.move"]);
    }

    #[test]
    fn pressed_drag_onto_node_holds_it() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let b = tree.insert(tree.root(), button(100.0, 100.0, 50.0, 50.0)).unwrap();
        let log = Log::default();
        record(&mut tree, b, "b", &log);

        let mut d = InputDispatcher::new();
        mouse(&mut d, &mut tree, 10.0, 10.0, true);
        assert!(d.held(PointerSample::MOUSE).is_empty(), "pressed over nothing");
        mouse(&mut d, &mut tree, 120.0, 120.0, true);
        d.dispatch(&mut tree);
        assert_eq!(d.held(PointerSample::MOUSE), &[b]);
        assert_eq!(take(&log), ["b.down", "b.enter", "b.move"]);

        mouse(&mut d, &mut tree, 120.0, 120.0, false);
        assert_eq!(take(&log), ["b.up"], "one up for the single down");
        assert!(d.held(PointerSample::MOUSE).is_empty());
    }

    #[test]
    fn click_fires_up_and_requests_sound() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let b = tree.insert(tree.root(), button(0.0, 0.0, 50.0, 50.0)).unwrap();
        let log = Log::default();
        record(&mut tree, b, "b", &log);

        let mut d = InputDispatcher::new();
        d.set_sound_on_click(true);
        let report = mouse(&mut d, &mut tree, 10.0, 10.0, true);
        assert_eq!(report.cursor, CursorShape::Pointer);
        assert!(report.sounds.is_empty());
        let report = mouse(&mut d, &mut tree, 10.0, 10.0, false);
        assert_eq!(report.sounds.as_slice(), [UiSound::Click]);
        assert_eq!(take(&log), ["b.down", "b.enter", "b.up"]);
    }

    #[test]
    fn redispatch_without_sample_fires_nothing() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let b = tree.insert(tree.root(), button(0.0, 0.0, 50.0, 50.0)).unwrap();
        let log = Log::default();
        record(&mut tree, b, "b", &log);

        let mut d = InputDispatcher::new();
        d.pointer_sample(
            PointerSample::mouse(Point::new(10.0, 10.0), true).with_scroll(Vec2::new(0.0, 4.0)),
        );
        d.dispatch(&mut tree);
        assert_eq!(take(&log), ["b.down", "b.enter", "b.scroll"]);
        d.dispatch(&mut tree);
        d.dispatch(&mut tree);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn enter_and_leave_follow_the_path() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let outer = tree.insert(root, button(0.0, 0.0, 100.0, 100.0)).unwrap();
        let inner = tree.insert(outer, button(10.0, 10.0, 20.0, 20.0)).unwrap();
        let log = Log::default();
        record(&mut tree, outer, "outer", &log);
        record(&mut tree, inner, "inner", &log);

        let mut d = InputDispatcher::new();
        mouse(&mut d, &mut tree, 15.0, 15.0, false);
        assert_eq!(take(&log), ["outer.enter", "inner.enter"]);
        assert_eq!(d.inside(PointerSample::MOUSE), &[outer, inner]);
        mouse(&mut d, &mut tree, 50.0, 50.0, false);
        assert_eq!(take(&log), ["outer.move", "inner.leave"]);

        // Hiding a node makes it leave without any pointer movement.
        tree.set_visible(outer, false);
        d.dispatch(&mut tree);
        assert_eq!(take(&log), ["outer.leave"]);
    }

    #[test]
    fn modal_blocks_everything_outside() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let behind = tree.insert(root, button(0.0, 0.0, 200.0, 200.0)).unwrap();
        let dialog = tree
            .insert(
                root,
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::CLICKABLE | NodeFlags::MODAL,
                    ..button(50.0, 50.0, 50.0, 50.0)
                },
            )
            .unwrap();
        let log = Log::default();
        record(&mut tree, behind, "behind", &log);
        record(&mut tree, dialog, "dialog", &log);

        let mut d = InputDispatcher::new();
        let report = mouse(&mut d, &mut tree, 10.0, 10.0, true);
        assert!(take(&log).is_empty(), "outside the modal nothing reacts");
        assert_eq!(report.cursor, CursorShape::Default);
        mouse(&mut d, &mut tree, 10.0, 10.0, false);

        mouse(&mut d, &mut tree, 60.0, 60.0, true);
        assert_eq!(take(&log), ["dialog.down", "dialog.enter", "dialog.move"]);

        tree.remove(dialog).unwrap();
        mouse(&mut d, &mut tree, 10.0, 10.0, false);
        assert_eq!(take(&log), ["behind.enter", "behind.move"]);
    }

    #[test]
    fn wheel_scrolls_innermost_scrollable() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let scroll = NodeFlags::default() | NodeFlags::SCROLL_Y;
        let outer = tree
            .insert(
                root,
                LocalNode {
                    flags: scroll,
                    canvas_size: Vec2::new(0.0, 500.0),
                    ..button(0.0, 0.0, 200.0, 200.0)
                },
            )
            .unwrap();
        let inner = tree
            .insert(
                outer,
                LocalNode {
                    flags: scroll,
                    canvas_size: Vec2::new(0.0, 500.0),
                    ..button(0.0, 0.0, 100.0, 100.0)
                },
            )
            .unwrap();

        let mut d = InputDispatcher::new();
        d.pointer_sample(
            PointerSample::mouse(Point::new(10.0, 10.0), false).with_scroll(Vec2::new(0.0, 30.0)),
        );
        d.dispatch(&mut tree);
        assert_eq!(tree.goal_canvas_position(inner), Some(Vec2::new(0.0, -30.0)));
        assert_eq!(tree.goal_canvas_position(outer), Some(Vec2::ZERO));
    }

    #[test]
    fn dragging_scrollbar_thumb_scrolls_immediately() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let list = tree
            .insert(
                tree.root(),
                LocalNode {
                    flags: NodeFlags::default() | NodeFlags::SCROLL_Y | NodeFlags::SCROLLBAR,
                    canvas_size: Vec2::new(0.0, 100.0),
                    ..button(0.0, 0.0, 100.0, 100.0)
                },
            )
            .unwrap();

        let mut d = InputDispatcher::new();
        let report = mouse(&mut d, &mut tree, 96.0, 10.0, true);
        assert_eq!(report.cursor, CursorShape::Grab);
        mouse(&mut d, &mut tree, 96.0, 50.0, true);
        assert_eq!(tree.canvas_position(list), Some(Vec2::new(0.0, -50.0)));
        assert_eq!(tree.goal_canvas_position(list), Some(Vec2::new(0.0, -50.0)));
        mouse(&mut d, &mut tree, 96.0, 500.0, true);
        assert_eq!(tree.canvas_position(list), Some(Vec2::new(0.0, -100.0)), "clamped");
        let report = mouse(&mut d, &mut tree, 96.0, 500.0, false);
        assert_ne!(report.cursor, CursorShape::Grab, "release ends the drag");
    }

    #[test]
    fn pressing_a_field_focuses_it_and_elsewhere_blurs() {
        let mut tree = Tree::new(Size::new(400.0, 200.0));
        let root = tree.root();
        let field = tree
            .insert(
                root,
                LocalNode {
                    size: Dim2::absolute(300.0, 30.0),
                    content: Content::TextField(TextField::new(TextEditor::new("hello"))),
                    ..LocalNode::default()
                },
            )
            .unwrap();
        let other = tree.insert(root, button(0.0, 100.0, 50.0, 50.0)).unwrap();

        let mut d = InputDispatcher::new();
        let glyph = 16.0 * 0.6;
        let report = mouse(&mut d, &mut tree, 1.0 * glyph + 1.0, 10.0, true);
        assert_eq!(report.cursor, CursorShape::Text);
        assert_eq!(tree.focused_text(), Some(field));
        // Drag to extend the selection.
        mouse(&mut d, &mut tree, 3.0 * glyph + 1.0, 10.0, true);
        mouse(&mut d, &mut tree, 3.0 * glyph + 1.0, 10.0, false);
        let editor = &tree.content(field).unwrap().as_text_field().unwrap().editor;
        assert_eq!(editor.selection(), (1, 3));

        assert_eq!(d.key(&mut tree, Key::Char('X').into()), EditOutcome::Changed);
        let editor = &tree.content(field).unwrap().as_text_field().unwrap().editor;
        assert_eq!(editor.text(), "hXlo");

        mouse(&mut d, &mut tree, 10.0, 110.0, true);
        assert_eq!(tree.focused_text(), None, "pressing {other:?} blurs the field");
    }

    #[test]
    fn touch_pointers_live_from_contact_to_release() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let b = tree.insert(tree.root(), button(0.0, 0.0, 50.0, 50.0)).unwrap();
        let log = Log::default();
        record(&mut tree, b, "b", &log);

        let mut d = InputDispatcher::new();
        d.pointer_sample(PointerSample::touch(7, Point::new(10.0, 10.0), false));
        assert_eq!(d.pointer_count(), 0, "hovering touch is ignored");

        // Tap inside a single frame.
        d.pointer_sample(PointerSample::touch(7, Point::new(10.0, 10.0), true));
        d.pointer_sample(PointerSample::touch(7, Point::new(10.0, 10.0), false));
        d.dispatch(&mut tree);
        assert_eq!(take(&log), ["b.down", "b.enter", "b.up", "b.leave"]);
        assert_eq!(d.pointer_count(), 0);
    }

    #[test]
    fn listener_removing_its_node_mid_dispatch() {
        let mut tree = Tree::new(Size::new(200.0, 200.0));
        let root = tree.root();
        let outer = tree.insert(root, button(0.0, 0.0, 100.0, 100.0)).unwrap();
        let inner = tree.insert(outer, button(0.0, 0.0, 50.0, 50.0)).unwrap();
        tree.signals_mut(outer)
            .unwrap()
            .pointer_down
            .listen(move |tree, _| {
                tree.remove(inner).unwrap();
            });
        let mut d = InputDispatcher::new();
        mouse(&mut d, &mut tree, 10.0, 10.0, true);
        assert!(!tree.is_alive(inner));
        mouse(&mut d, &mut tree, 10.0, 10.0, false);
        assert_eq!(d.inside(PointerSample::MOUSE), &[outer]);
    }
}
