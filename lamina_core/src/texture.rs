// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque references to externally-owned textures.
//!
//! Textures are created, uploaded and destroyed outside this crate. A
//! [`TextureRef`] is only stored by texture attachments and handed to the
//! draw pass, which uses [`TextureRef::kind`] to pick a sampling program.

use core::fmt;

/// Identifies a texture owned by the graphics context.
///
/// The value is assigned by whoever creates the texture; core code passes it
/// through without interpreting it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextureId(pub u32);

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// Dimensionality of a texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// A single 2D image.
    #[default]
    Flat,
    /// A 2D array texture with `layers` elements, addressed by element index.
    Array {
        /// Number of elements in the array.
        layers: u32,
    },
}

/// A lightweight, copyable reference to an externally-owned texture.
///
/// The referenced texture must outlive every attachment that samples it;
/// that lifetime is the caller's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// The texture's identity in the graphics context.
    pub id: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Flat or array texture.
    pub kind: TextureKind,
}

impl TextureRef {
    /// Creates a reference to a flat 2D texture.
    #[must_use]
    pub const fn flat(id: TextureId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            kind: TextureKind::Flat,
        }
    }

    /// Creates a reference to a 2D array texture.
    #[must_use]
    pub const fn array(id: TextureId, width: u32, height: u32, layers: u32) -> Self {
        Self {
            id,
            width,
            height,
            kind: TextureKind::Array { layers },
        }
    }

    /// Returns whether this is an array texture.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, TextureKind::Array { .. })
    }
}
