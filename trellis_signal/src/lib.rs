// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Signal: first-class event channels for scene-graph nodes.
//!
//! A [`Signal<C, T>`] holds any number of listeners. Each listener receives a
//! mutable context `C` (for example the scene tree, or a drawing surface) and
//! a shared payload `T`.
//!
//! - [`Signal::listen`] registers a persistent listener and returns its [`ListenerId`].
//! - [`Signal::listen_once`] registers a listener that is removed before its first run.
//! - [`Signal::unlisten`] removes a listener by id.
//! - [`Signal::trigger`] runs every listener in registration order.
//!
//! ## Mutation during dispatch
//!
//! Triggering works on a [`Snapshot`] of the listener list. Listeners are
//! reference counted, so the owner of the signal may be mutated (or the signal
//! itself may gain and lose listeners) while the snapshot runs. Listeners added
//! during a trigger run on the next trigger; listeners removed during a trigger
//! still run in the current one.
//!
//! When the signal lives inside the context it is triggered with (a node signal
//! stored in the tree the listeners receive), take the snapshot first with
//! [`Signal::snapshot`], release the borrow, then call [`Snapshot::run`].
//!
//! ```
//! use trellis_signal::Signal;
//!
//! let mut clicks: Signal<u32, &'static str> = Signal::new();
//! clicks.listen(|count, _| *count += 1);
//! clicks.listen_once(|count, _| *count += 10);
//!
//! let mut count = 0;
//! clicks.trigger(&mut count, &"button");
//! clicks.trigger(&mut count, &"button");
//! assert_eq!(count, 12);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Identifier of a listener within one [`Signal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Listener<C: ?Sized, T> {
    id: ListenerId,
    once: bool,
    callback: Rc<RefCell<dyn FnMut(&mut C, &T)>>,
}

/// An observable event channel.
///
/// `C` is the context handed to listeners by mutable reference and may be
/// unsized (for example `dyn Surface`). `T` is the payload.
pub struct Signal<C: ?Sized, T> {
    listeners: Vec<Listener<C, T>>,
    next_id: u64,
}

impl<C: ?Sized, T> fmt::Debug for Signal<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<C: ?Sized, T> Default for Signal<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized, T> Signal<C, T> {
    /// Create a signal with no listeners.
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener that runs on every trigger.
    pub fn listen(&mut self, f: impl FnMut(&mut C, &T) + 'static) -> ListenerId {
        self.push(f, false)
    }

    /// Register a listener that runs on the next trigger only.
    pub fn listen_once(&mut self, f: impl FnMut(&mut C, &T) + 'static) -> ListenerId {
        self.push(f, true)
    }

    /// Remove a listener. Returns `false` if it was not registered (or a
    /// one-shot listener already ran).
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Take a snapshot of the current listeners for a trigger.
    ///
    /// One-shot listeners are removed from the signal here, so they run at
    /// most once even if the signal is triggered again from inside a listener.
    pub fn snapshot(&mut self) -> Snapshot<C, T> {
        let callbacks = self.listeners.iter().map(|l| Rc::clone(&l.callback)).collect();
        self.listeners.retain(|l| !l.once);
        Snapshot { callbacks }
    }

    /// Run all listeners with `ctx` and `payload`.
    pub fn trigger(&mut self, ctx: &mut C, payload: &T) {
        self.snapshot().run(ctx, payload);
    }

    fn push(&mut self, f: impl FnMut(&mut C, &T) + 'static, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let callback: Rc<RefCell<dyn FnMut(&mut C, &T)>> = Rc::new(RefCell::new(f));
        self.listeners.push(Listener { id, once, callback });
        id
    }
}

/// Listeners captured by [`Signal::snapshot`], ready to run.
pub struct Snapshot<C: ?Sized, T> {
    callbacks: Vec<Rc<RefCell<dyn FnMut(&mut C, &T)>>>,
}

impl<C: ?Sized, T> fmt::Debug for Snapshot<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("listeners", &self.callbacks.len())
            .finish()
    }
}

impl<C: ?Sized, T> Snapshot<C, T> {
    /// Returns `true` if there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run the captured listeners in registration order.
    ///
    /// A listener that is already running further up the stack (the signal was
    /// re-triggered from inside it) is skipped.
    pub fn run(self, ctx: &mut C, payload: &T) {
        for callback in self.callbacks {
            let Ok(mut f) = callback.try_borrow_mut() else {
                continue;
            };
            (&mut *f)(&mut *ctx, payload);
        }
    }
}
