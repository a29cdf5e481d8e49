// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plan: an ordered sequence of draw items for one frame.

use alloc::vec::Vec;

use lamina_core::attachment::AttachmentKind;
use lamina_core::layer::AttachmentId;
use lamina_core::texture::TextureRef;

/// Shader program an attachment is drawn with.
///
/// Each program reads the vertex attributes of one
/// [`VertexLayout`](lamina_core::mesh::VertexLayout); the two texture
/// programs differ only in their sampler type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Program {
    /// Per-vertex colour, no texture.
    Colour,
    /// Samples a flat 2D texture.
    Texture2d,
    /// Samples one element of a 2D array texture.
    Texture2dArray,
}

impl Program {
    /// Picks the program for an attachment fill.
    #[must_use]
    pub const fn for_kind(kind: &AttachmentKind) -> Self {
        match kind {
            AttachmentKind::Colour(_) => Self::Colour,
            AttachmentKind::Texture(fill) if fill.source.is_array() => Self::Texture2dArray,
            AttachmentKind::Texture(_) => Self::Texture2d,
        }
    }
}

/// A single draw call.
///
/// Borrows its mesh from the tree, so a plan must be consumed before the
/// tree is rendered again.
#[derive(Debug)]
pub struct DrawItem<'a, M> {
    /// Program to draw with.
    pub program: Program,
    /// Model matrix (column-major 4×4), the owning layer's world transform.
    pub model: [f32; 16],
    /// The attachment's mesh.
    pub mesh: &'a M,
    /// Texture to bind, for texture programs.
    pub texture: Option<TextureRef>,
    /// Depth of the owning layer below the drawn root.
    pub depth: u32,
    /// The attachment within its layer.
    pub attachment: AttachmentId,
}

impl<M> Clone for DrawItem<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for DrawItem<'_, M> {}

/// An ordered list of draw calls for a single frame.
#[derive(Debug)]
pub struct DrawPlan<'a, M> {
    /// Projection-view matrix (column-major 4×4) shared by every item.
    pub projection_view: [f32; 16],
    /// Draw items in back-to-front order.
    pub items: Vec<DrawItem<'a, M>>,
}

impl<M> DrawPlan<'_, M> {
    /// Creates an empty plan with the given projection-view matrix.
    #[must_use]
    pub fn new(projection_view: [f32; 16]) -> Self {
        Self {
            projection_view,
            items: Vec::new(),
        }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
