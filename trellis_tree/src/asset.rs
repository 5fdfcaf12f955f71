// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asset collaborators.
//!
//! The tree only ever reads assets: it asks whether one is loaded and, if so,
//! paints it. Fetching, decoding and retrying belong to the collaborator. A
//! failed load simply stays unloaded.

use alloc::rc::Rc;
use core::cell::OnceCell;

/// An externally loaded resource.
pub trait Asset {
    /// The loaded resource.
    type Resource;

    /// Returns `true` once the resource is available.
    fn is_loaded(&self) -> bool;

    /// Start loading. Idempotent: calling it again while loading or after
    /// loading has no further effect.
    fn load(&self);

    /// The resource, if loaded.
    fn get(&self) -> Option<&Self::Resource>;
}

/// Opaque handle to decoded pixels, interpreted by the drawing backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Image {
    /// Backend-defined identifier.
    pub id: u64,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Shared image asset as stored in node content.
pub type ImageAsset = Rc<dyn Asset<Resource = Image>>;

/// An asset whose resource is supplied directly.
///
/// Starts unloaded when built with [`StaticAsset::pending`]; [`StaticAsset::resolve`]
/// plays the part of a finished fetch.
#[derive(Debug)]
pub struct StaticAsset<T> {
    value: OnceCell<T>,
}

impl<T> StaticAsset<T> {
    /// An asset that is already loaded.
    pub fn ready(value: T) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(value);
        Self { value: cell }
    }

    /// An asset that has not been loaded yet.
    pub const fn pending() -> Self {
        Self {
            value: OnceCell::new(),
        }
    }

    /// Supply the resource. Ignored if already loaded.
    pub fn resolve(&self, value: T) {
        let _ = self.value.set(value);
    }
}

impl<T> Asset for StaticAsset<T> {
    type Resource = T;

    fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }

    fn load(&self) {}

    fn get(&self) -> Option<&T> {
        self.value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_until_resolved() {
        let asset = StaticAsset::pending();
        asset.load();
        assert!(!asset.is_loaded());
        asset.resolve(7_u8);
        asset.resolve(9_u8);
        assert_eq!(asset.get(), Some(&7), "first resolution wins");
    }
}
