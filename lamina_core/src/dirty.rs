// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking flag sets.
//!
//! Each node of the tree carries a small flag set recording which of its
//! cached, derived values are stale. A flag is either clear (up to date) or
//! set (stale); it carries no record of *why* the value went stale.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`LayerDirt::TRANSFORM`] is set on a layer and on
//!   every descendant whenever a layout property changes, because a world
//!   transform depends on the whole ancestor chain.
//!
//! - **Local-only**: [`AttachmentDirt::MESH`] is set on one attachment
//!   when one of its fill properties changes, and on every attachment of a
//!   layer (but not of its descendants) when that layer's size changes.
//!
//! # Consumption
//!
//! Flags are set by mutators and cleared only by the render pass
//! ([`Layer::render`](crate::layer::Layer::render)) after the corresponding
//! value has been recomputed.

bitflags::bitflags! {
    /// Stale state of a [`Layer`](crate::layer::Layer).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LayerDirt: u8 {
        /// The world transform no longer matches the layer's properties or
        /// its ancestor chain.
        const TRANSFORM = 0b0000_0001;
    }
}

bitflags::bitflags! {
    /// Stale state of an [`Attachment`](crate::attachment::Attachment).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AttachmentDirt: u8 {
        /// The mesh no longer matches the fill or the owning layer's size.
        const MESH = 0b0000_0001;
    }
}

impl Default for LayerDirt {
    /// New layers start fully dirty.
    fn default() -> Self {
        Self::all()
    }
}

impl Default for AttachmentDirt {
    /// New attachments start fully dirty.
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fully_dirty() {
        assert!(LayerDirt::default().contains(LayerDirt::TRANSFORM));
        assert!(AttachmentDirt::default().contains(AttachmentDirt::MESH));
    }

    #[test]
    fn flags_set_and_clear_independently() {
        let mut dirt = LayerDirt::empty();
        dirt |= LayerDirt::TRANSFORM;
        assert!(dirt.contains(LayerDirt::TRANSFORM));
        dirt.remove(LayerDirt::TRANSFORM);
        assert!(dirt.is_empty());

        let mut mesh = AttachmentDirt::default();
        mesh.remove(AttachmentDirt::MESH);
        assert_eq!(mesh, AttachmentDirt::empty());
    }
}
