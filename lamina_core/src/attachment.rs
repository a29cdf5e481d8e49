// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable units owned by a layer.
//!
//! An [`Attachment`] is a quad covering its owning layer's full extent,
//! filled either with four corner colours ([`ColourFill`]) or with a region
//! of an externally-owned texture ([`TextureFill`]). It owns at most one
//! backend mesh, which is rebuilt during the render pass only while
//! [`AttachmentDirt::MESH`] is set.
//!
//! Quad corners are emitted in the order top-left, top-right, bottom-left,
//! bottom-right at `(0, 0)`, `(w, 0)`, `(0, h)`, `(w, h)` in layer-local
//! pixels, and indexed by [`QUAD_INDICES`].

use kurbo::Size;

use crate::backend::MeshBackend;
use crate::dirty::AttachmentDirt;
use crate::mesh::{ColourVertex, MeshData, QUAD_INDICES, TextureVertex, VertexLayout};
use crate::paint::{Rgba, Uv};
use crate::texture::TextureRef;

/// Per-corner colours of a colour attachment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColourFill {
    /// Colour at `(0, 0)`.
    pub top_left: Rgba,
    /// Colour at `(w, 0)`.
    pub top_right: Rgba,
    /// Colour at `(0, h)`.
    pub bottom_left: Rgba,
    /// Colour at `(w, h)`.
    pub bottom_right: Rgba,
}

impl ColourFill {
    /// Creates a fill from four corner colours.
    #[must_use]
    pub const fn new(top_left: Rgba, top_right: Rgba, bottom_left: Rgba, bottom_right: Rgba) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Creates a fill with the same colour at every corner.
    #[must_use]
    pub const fn solid(colour: Rgba) -> Self {
        Self::new(colour, colour, colour, colour)
    }

    /// Builds the four quad vertices for a layer of `size`.
    #[must_use]
    pub fn quad(&self, size: Size) -> [ColourVertex; 4] {
        let [tl, tr, bl, br] = corners(size);
        [
            ColourVertex {
                xyz: tl,
                rgba: self.top_left.to_array(),
            },
            ColourVertex {
                xyz: tr,
                rgba: self.top_right.to_array(),
            },
            ColourVertex {
                xyz: bl,
                rgba: self.bottom_left.to_array(),
            },
            ColourVertex {
                xyz: br,
                rgba: self.bottom_right.to_array(),
            },
        ]
    }
}

/// Texture region sampled by a texture attachment.
///
/// The UV rectangle uses a bottom-left origin, so the quad's top edge samples
/// `top_right.v` and its bottom edge samples `bottom_left.v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureFill {
    /// The sampled texture.
    pub source: TextureRef,
    /// Array element to sample; ignored by flat textures.
    pub source_index: u32,
    /// Bottom-left corner of the sampled region.
    pub bottom_left: Uv,
    /// Top-right corner of the sampled region.
    pub top_right: Uv,
}

impl TextureFill {
    /// Creates a fill sampling the whole of element 0 of `source`.
    #[must_use]
    pub const fn new(source: TextureRef) -> Self {
        Self {
            source,
            source_index: 0,
            bottom_left: Uv::BOTTOM_LEFT,
            top_right: Uv::TOP_RIGHT,
        }
    }

    /// Builds the four quad vertices for a layer of `size`.
    #[must_use]
    pub fn quad(&self, size: Size) -> [TextureVertex; 4] {
        let [tl, tr, bl, br] = corners(size);
        let (lo, hi) = (self.bottom_left, self.top_right);
        // Lossless for any index below 2^24, far beyond real array depths.
        let texture_index = self.source_index as f32;
        [
            TextureVertex {
                xyz: tl,
                uv: [lo.u, hi.v],
                texture_index,
            },
            TextureVertex {
                xyz: tr,
                uv: [hi.u, hi.v],
                texture_index,
            },
            TextureVertex {
                xyz: bl,
                uv: [lo.u, lo.v],
                texture_index,
            },
            TextureVertex {
                xyz: br,
                uv: [hi.u, lo.v],
                texture_index,
            },
        ]
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Vertex positions are single precision."
)]
fn corners(size: Size) -> [[f32; 3]; 4] {
    let (w, h) = (size.width as f32, size.height as f32);
    [[0.0, 0.0, 0.0], [w, 0.0, 0.0], [0.0, h, 0.0], [w, h, 0.0]]
}

/// What an attachment draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttachmentKind {
    /// Flat colours interpolated between the corners.
    Colour(ColourFill),
    /// A region of a texture.
    Texture(TextureFill),
}

impl AttachmentKind {
    /// Returns the vertex layout meshes of this kind use.
    #[must_use]
    pub const fn layout(&self) -> VertexLayout {
        match self {
            Self::Colour(_) => VertexLayout::Colour,
            Self::Texture(_) => VertexLayout::Texture,
        }
    }

    /// Returns the sampled texture, if this is a texture fill.
    #[must_use]
    pub const fn texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Colour(_) => None,
            Self::Texture(fill) => Some(&fill.source),
        }
    }
}

impl From<ColourFill> for AttachmentKind {
    fn from(fill: ColourFill) -> Self {
        Self::Colour(fill)
    }
}

impl From<TextureFill> for AttachmentKind {
    fn from(fill: TextureFill) -> Self {
        Self::Texture(fill)
    }
}

/// What a call to [`Attachment::render`] did to the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshUpdate {
    /// A previous mesh was handed back to the backend.
    pub released: bool,
    /// A new mesh was created.
    pub built: bool,
}

/// A drawable quad owned by a [`Layer`](crate::layer::Layer).
///
/// `M` is the mesh handle type of the [`MeshBackend`] the attachment renders
/// with. Dropping an attachment that still holds a mesh does not return the
/// mesh to the backend; call [`release`](Self::release) (or remove the
/// attachment through its layer) first.
#[derive(Debug)]
pub struct Attachment<M> {
    kind: AttachmentKind,
    dirt: AttachmentDirt,
    mesh: Option<M>,
}

impl<M> Attachment<M> {
    /// Creates an attachment with no mesh and [`AttachmentDirt::MESH`] set.
    #[must_use]
    pub fn new(kind: impl Into<AttachmentKind>) -> Self {
        Self {
            kind: kind.into(),
            dirt: AttachmentDirt::default(),
            mesh: None,
        }
    }

    /// Creates a colour attachment.
    #[must_use]
    pub fn colour(fill: ColourFill) -> Self {
        Self::new(fill)
    }

    /// Creates a texture attachment.
    #[must_use]
    pub fn texture(fill: TextureFill) -> Self {
        Self::new(fill)
    }

    /// Returns the fill.
    #[must_use]
    pub const fn kind(&self) -> &AttachmentKind {
        &self.kind
    }

    /// Returns the current dirty flags.
    #[must_use]
    pub const fn dirt(&self) -> AttachmentDirt {
        self.dirt
    }

    /// Returns the mesh built by the last render pass, if any.
    #[must_use]
    pub const fn mesh(&self) -> Option<&M> {
        self.mesh.as_ref()
    }

    /// Returns the sampled texture, if this is a texture attachment.
    #[must_use]
    pub const fn texture_source(&self) -> Option<&TextureRef> {
        self.kind.texture()
    }

    /// Replaces the whole fill, possibly switching kind.
    pub fn set_kind(&mut self, kind: impl Into<AttachmentKind>) {
        self.kind = kind.into();
        self.dirt |= AttachmentDirt::MESH;
    }

    /// Sets the top-left colour.
    ///
    /// # Panics
    ///
    /// Panics if this is not a colour attachment.
    pub fn set_top_left(&mut self, colour: Rgba) {
        self.colour_mut("set_top_left").top_left = colour;
    }

    /// Sets the top-right colour.
    ///
    /// # Panics
    ///
    /// Panics if this is not a colour attachment.
    pub fn set_top_right(&mut self, colour: Rgba) {
        self.colour_mut("set_top_right").top_right = colour;
    }

    /// Sets the bottom-left colour.
    ///
    /// # Panics
    ///
    /// Panics if this is not a colour attachment.
    pub fn set_bottom_left(&mut self, colour: Rgba) {
        self.colour_mut("set_bottom_left").bottom_left = colour;
    }

    /// Sets the bottom-right colour.
    ///
    /// # Panics
    ///
    /// Panics if this is not a colour attachment.
    pub fn set_bottom_right(&mut self, colour: Rgba) {
        self.colour_mut("set_bottom_right").bottom_right = colour;
    }

    /// Sets the sampled texture.
    ///
    /// The mesh does not depend on the texture, so this leaves
    /// [`AttachmentDirt::MESH`] untouched.
    ///
    /// # Panics
    ///
    /// Panics if this is not a texture attachment.
    pub fn set_source(&mut self, source: TextureRef) {
        match &mut self.kind {
            AttachmentKind::Texture(fill) => fill.source = source,
            AttachmentKind::Colour(_) => wrong_kind("set_source", "texture"),
        }
    }

    /// Sets the sampled array element.
    ///
    /// # Panics
    ///
    /// Panics if this is not a texture attachment.
    pub fn set_source_index(&mut self, index: u32) {
        self.texture_mut("set_source_index").source_index = index;
    }

    /// Sets the bottom-left corner of the sampled region.
    ///
    /// # Panics
    ///
    /// Panics if this is not a texture attachment.
    pub fn set_bottom_left_uv(&mut self, uv: Uv) {
        self.texture_mut("set_bottom_left_uv").bottom_left = uv;
    }

    /// Sets the top-right corner of the sampled region.
    ///
    /// # Panics
    ///
    /// Panics if this is not a texture attachment.
    pub fn set_top_right_uv(&mut self, uv: Uv) {
        self.texture_mut("set_top_right_uv").top_right = uv;
    }

    /// Marks the mesh stale, e.g. because the owning layer was resized.
    pub(crate) fn mark_mesh_dirty(&mut self) {
        self.dirt |= AttachmentDirt::MESH;
    }

    /// Rebuilds the mesh for a layer of `size` if [`AttachmentDirt::MESH`]
    /// is set, then clears the flag.
    ///
    /// The previous mesh, if any, is destroyed before the new one is created.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if mesh creation fails. The attachment is
    /// then left without a mesh and with [`AttachmentDirt::MESH`] still set,
    /// so a later pass retries.
    pub fn render<B>(&mut self, size: Size, backend: &mut B) -> Result<MeshUpdate, B::Error>
    where
        B: MeshBackend<Mesh = M>,
    {
        let mut update = MeshUpdate::default();
        if !self.dirt.contains(AttachmentDirt::MESH) {
            return Ok(update);
        }
        update.released = self.release(backend);
        let mesh = match &self.kind {
            AttachmentKind::Colour(fill) => {
                let vertices = fill.quad(size);
                backend.create_mesh(&MeshData::new(&vertices, &QUAD_INDICES))?
            }
            AttachmentKind::Texture(fill) => {
                let vertices = fill.quad(size);
                backend.create_mesh(&MeshData::new(&vertices, &QUAD_INDICES))?
            }
        };
        self.mesh = Some(mesh);
        update.built = true;
        self.dirt.remove(AttachmentDirt::MESH);
        Ok(update)
    }

    /// Hands the mesh back to the backend, returning whether there was one.
    ///
    /// Marks the attachment [`AttachmentDirt::MESH`], so the next render pass
    /// builds a fresh mesh.
    pub fn release<B>(&mut self, backend: &mut B) -> bool
    where
        B: MeshBackend<Mesh = M>,
    {
        self.dirt |= AttachmentDirt::MESH;
        match self.mesh.take() {
            Some(mesh) => {
                backend.destroy_mesh(mesh);
                true
            }
            None => false,
        }
    }

    fn colour_mut(&mut self, setter: &str) -> &mut ColourFill {
        let AttachmentKind::Colour(fill) = &mut self.kind else {
            wrong_kind(setter, "colour")
        };
        self.dirt |= AttachmentDirt::MESH;
        fill
    }

    fn texture_mut(&mut self, setter: &str) -> &mut TextureFill {
        let AttachmentKind::Texture(fill) = &mut self.kind else {
            wrong_kind(setter, "texture")
        };
        self.dirt |= AttachmentDirt::MESH;
        fill
    }
}

#[cold]
#[track_caller]
fn wrong_kind(setter: &str, expected: &str) -> ! {
    panic!("{setter} called on an attachment that is not a {expected} attachment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HeadlessBackend, HeadlessError};
    use crate::texture::TextureId;

    fn atlas() -> TextureRef {
        TextureRef::array(TextureId(7), 256, 256, 4)
    }

    #[test]
    fn new_attachment_is_dirty_without_mesh() {
        let a: Attachment<()> = Attachment::colour(ColourFill::solid(Rgba::WHITE));
        assert!(a.dirt().contains(AttachmentDirt::MESH));
        assert!(a.mesh().is_none());
        assert!(a.texture_source().is_none());
    }

    #[test]
    fn colour_quad_spans_size_with_corner_colours() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let fill = ColourFill::new(red, Rgba::WHITE, Rgba::BLACK, Rgba::TRANSPARENT);
        let q = fill.quad(Size::new(50.0, 20.0));
        assert_eq!(q[0].xyz, [0.0, 0.0, 0.0]);
        assert_eq!(q[1].xyz, [50.0, 0.0, 0.0]);
        assert_eq!(q[2].xyz, [0.0, 20.0, 0.0]);
        assert_eq!(q[3].xyz, [50.0, 20.0, 0.0]);
        assert_eq!(q[0].rgba, red.to_array());
        assert_eq!(q[3].rgba, [0.0; 4]);
    }

    #[test]
    fn texture_quad_flips_v_for_top_edge() {
        let fill = TextureFill {
            source: atlas(),
            source_index: 3,
            bottom_left: Uv::new(0.25, 0.5),
            top_right: Uv::new(0.75, 1.0),
        };
        let q = fill.quad(Size::new(10.0, 10.0));
        assert_eq!(q[0].uv, [0.25, 1.0]);
        assert_eq!(q[1].uv, [0.75, 1.0]);
        assert_eq!(q[2].uv, [0.25, 0.5]);
        assert_eq!(q[3].uv, [0.75, 0.5]);
        assert!(q.iter().all(|v| v.texture_index == 3.0));
    }

    #[test]
    fn render_builds_once_until_dirty_again() {
        let mut backend = HeadlessBackend::new();
        let mut a = Attachment::colour(ColourFill::solid(Rgba::WHITE));

        let first = a.render(Size::new(50.0, 50.0), &mut backend).unwrap();
        assert_eq!(
            first,
            MeshUpdate {
                released: false,
                built: true
            }
        );
        assert!(a.dirt().is_empty());
        let mesh = a.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &QUAD_INDICES);

        let again = a.render(Size::new(50.0, 50.0), &mut backend).unwrap();
        assert_eq!(again, MeshUpdate::default());
        assert_eq!(backend.created(), 1);

        a.set_top_left(Rgba::BLACK);
        let rebuilt = a.render(Size::new(50.0, 50.0), &mut backend).unwrap();
        assert!(rebuilt.released && rebuilt.built);
        assert_eq!(backend.created(), 2);
        assert_eq!(backend.live(), 1);
    }

    #[test]
    fn set_source_keeps_mesh_clean() {
        let mut backend = HeadlessBackend::new();
        let mut a = Attachment::texture(TextureFill::new(atlas()));
        a.render(Size::new(8.0, 8.0), &mut backend).unwrap();

        let other = TextureRef::flat(TextureId(9), 32, 32);
        a.set_source(other);
        assert!(a.dirt().is_empty());
        assert_eq!(a.texture_source(), Some(&other));

        a.set_source_index(2);
        assert!(a.dirt().contains(AttachmentDirt::MESH));
    }

    #[test]
    fn set_kind_switches_layout() {
        let mut backend = HeadlessBackend::new();
        let mut a = Attachment::colour(ColourFill::default());
        a.render(Size::new(4.0, 4.0), &mut backend).unwrap();

        a.set_kind(TextureFill::new(atlas()));
        a.render(Size::new(4.0, 4.0), &mut backend).unwrap();
        assert_eq!(a.mesh().unwrap().layout(), VertexLayout::Texture);
        assert_eq!(backend.live(), 1);
    }

    #[test]
    fn backend_failure_leaves_mesh_dirty() {
        let mut backend = HeadlessBackend::with_limit(0);
        let mut a = Attachment::colour(ColourFill::default());
        let err = a.render(Size::new(4.0, 4.0), &mut backend).unwrap_err();
        assert_eq!(err, HeadlessError::Exhausted { limit: 0 });
        assert!(a.mesh().is_none());
        assert!(a.dirt().contains(AttachmentDirt::MESH));
    }

    #[test]
    fn release_returns_mesh_once() {
        let mut backend = HeadlessBackend::new();
        let mut a = Attachment::colour(ColourFill::default());
        a.render(Size::new(4.0, 4.0), &mut backend).unwrap();
        assert!(a.release(&mut backend));
        assert!(!a.release(&mut backend));
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn released_attachment_is_rebuilt() {
        let mut backend = HeadlessBackend::new();
        let mut a = Attachment::colour(ColourFill::default());
        let size = Size::new(4.0, 4.0);
        a.render(size, &mut backend).unwrap();

        a.release(&mut backend);
        assert!(a.dirt().contains(AttachmentDirt::MESH));

        let update = a.render(size, &mut backend).unwrap();
        assert_eq!(
            update,
            MeshUpdate {
                released: false,
                built: true,
            }
        );
        assert!(a.mesh().is_some());
        assert!(a.dirt().is_empty());
    }

    #[test]
    #[should_panic(expected = "set_top_left called on an attachment that is not a colour attachment")]
    fn colour_setter_on_texture_panics() {
        let mut a: Attachment<()> = Attachment::texture(TextureFill::new(atlas()));
        a.set_top_left(Rgba::WHITE);
    }

    #[test]
    #[should_panic(expected = "set_top_right_uv called on an attachment that is not a texture attachment")]
    fn texture_setter_on_colour_panics() {
        let mut a: Attachment<()> = Attachment::colour(ColourFill::default());
        a.set_top_right_uv(Uv::TOP_RIGHT);
    }
}
