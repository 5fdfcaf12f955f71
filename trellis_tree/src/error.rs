// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural errors raised by hierarchy mutation.

use crate::types::NodeId;

/// A rejected structural operation. The tree is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// `parent` is `child` itself or one of its descendants.
    #[error("attaching {child:?} under {parent:?} would make it its own ancestor")]
    Cycle {
        /// The node being attached.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
    /// The identifier refers to a removed node.
    #[error("{0:?} does not refer to a live node")]
    StaleNode(NodeId),
    /// The root container cannot be attached, detached, cloned or removed.
    #[error("the root container cannot be moved, cloned or removed")]
    RootContainer,
}
