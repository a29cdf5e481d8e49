// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child and attachment handle types.

use core::fmt;

/// A handle to a child of a [`Layer`](super::Layer).
///
/// Handles are issued by the parent from a counter and are never reused
/// within that parent, so a handle to a removed child reliably misses. A
/// handle is meaningless outside the layer that issued it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    /// Returns the raw handle value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// A handle to an attachment of a [`Layer`](super::Layer).
///
/// Same issuing rules as [`LayerId`], counted separately.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttachmentId(pub(crate) u32);

impl AttachmentId {
    /// Returns the raw handle value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttachmentId({})", self.0)
    }
}

/// Issues handles from a monotonically increasing counter.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HandleCounter(u32);

impl HandleCounter {
    /// Returns the next unused raw handle.
    ///
    /// # Panics
    ///
    /// Panics once `u32::MAX` handles have been issued.
    pub(crate) fn next(&mut self) -> u32 {
        let raw = self.0;
        assert!(raw < u32::MAX, "handle space of this layer is exhausted");
        self.0 += 1;
        raw
    }
}
