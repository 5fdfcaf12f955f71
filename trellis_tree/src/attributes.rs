// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node attribute bag with typed keys.
//!
//! Application code tags nodes with named values (for example "this cell
//! represents color X") without extending the node type. Call sites agree on
//! names and types through shared [`AttrKey`] constants:
//!
//! ```
//! use trellis_tree::{AttrKey, Attributes};
//!
//! const SWATCH_INDEX: AttrKey<i64> = AttrKey::new("swatch_index");
//!
//! let mut attrs = Attributes::default();
//! attrs.set(SWATCH_INDEX, 3);
//! assert_eq!(attrs.get(SWATCH_INDEX), Some(3));
//! ```

use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

use hashbrown::HashMap;

use crate::style::Color;

/// A stored attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// Color.
    Color(Color),
}

/// Types that can be stored in an [`Attributes`] bag.
pub trait AttrType: Sized {
    /// Wrap the value.
    fn into_value(self) -> AttrValue;
    /// Unwrap a value of the matching variant.
    fn from_value(value: &AttrValue) -> Option<Self>;
}

macro_rules! attr_type {
    ($ty:ty, $variant:ident) => {
        impl AttrType for $ty {
            fn into_value(self) -> AttrValue {
                AttrValue::$variant(self)
            }

            #[allow(clippy::clone_on_copy, reason = "Shared by copy and owned payloads.")]
            fn from_value(value: &AttrValue) -> Option<Self> {
                match value {
                    AttrValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

attr_type!(bool, Bool);
attr_type!(i64, Int);
attr_type!(f64, Float);
attr_type!(String, Str);
attr_type!(Color, Color);

/// A named, typed attribute key.
pub struct AttrKey<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> AttrKey<T> {
    /// Create a key.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    /// The key's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for AttrKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttrKey<T> {}

impl<T> fmt::Debug for AttrKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttrKey").field(&self.name).finish()
    }
}

/// Map from attribute names to values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    values: HashMap<&'static str, AttrValue>,
}

impl Attributes {
    /// Store a value, replacing any previous value under the same name.
    pub fn set<T: AttrType>(&mut self, key: AttrKey<T>, value: T) {
        self.values.insert(key.name, value.into_value());
    }

    /// Read a value. A value stored with a different type reads as `None`.
    pub fn get<T: AttrType>(&self, key: AttrKey<T>) -> Option<T> {
        self.values.get(key.name).and_then(T::from_value)
    }

    /// Remove a value, returning it if present.
    pub fn remove<T: AttrType>(&mut self, key: AttrKey<T>) -> Option<T> {
        self.values
            .remove(key.name)
            .and_then(|v| T::from_value(&v))
    }

    /// Untyped access by name.
    pub fn raw(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    /// Returns `true` if a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: AttrKey<String> = AttrKey::new("label");
    const LABEL_AS_INT: AttrKey<i64> = AttrKey::new("label");
    const TINT: AttrKey<Color> = AttrKey::new("tint");

    #[test]
    fn typed_roundtrip_and_mismatch() {
        let mut attrs = Attributes::default();
        attrs.set(LABEL, String::from("ok"));
        attrs.set(TINT, Color::rgb(1, 2, 3));
        assert_eq!(attrs.get(LABEL).as_deref(), Some("ok"));
        assert_eq!(attrs.get(LABEL_AS_INT), None, "type mismatch reads as None");
        assert!(attrs.contains("tint"));
        assert_eq!(attrs.remove(TINT), Some(Color::rgb(1, 2, 3)));
        assert_eq!(attrs.len(), 1);
    }
}
