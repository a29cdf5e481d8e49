// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in the scene tree. Each layer has:
//!
//! - **Layout properties** set by the caller ([`LayerProperties`]): anchor,
//!   origin, position, size, scale, shear and rotation.
//! - **Cached render state** ([`RenderState`]) produced by
//!   [`render`](Layer::render): the parent's size and world transform as of
//!   the last pass, and the layer's own world transform.
//! - **Attachments** and **children**, each owned by value and kept in
//!   insertion order, which is also paint order. Both are addressed through
//!   per-parent handles ([`AttachmentId`], [`LayerId`]).
//!
//! There are no parent links. Everything a layer needs from its ancestors is
//! copied down into its render state during the top-down render pass.
//!
//! # Dirty tracking
//!
//! Setting any layout property marks [`LayerDirt::TRANSFORM`] on the layer
//! and every descendant, whether or not the value changed. Setting the size
//! additionally marks [`AttachmentDirt::MESH`](crate::dirty::AttachmentDirt::MESH)
//! on the layer's own attachments, since their quads span the layer.

mod id;
mod properties;
mod render;
mod traverse;

pub use id::{AttachmentId, LayerId};
pub use properties::{LayerProperties, RenderState};
pub use render::RenderChanges;
pub use traverse::{Attachments, Children, Walk};

use alloc::vec::Vec;
use kurbo::{Size, Vec2};

use self::id::HandleCounter;
use crate::attachment::{Attachment, ColourFill, TextureFill};
use crate::backend::MeshBackend;
use crate::dirty::LayerDirt;
use crate::transform::Transform3d;

/// A node of the scene tree.
///
/// `M` is the mesh handle type of the [`MeshBackend`] the tree renders with.
/// A layer owns its whole subtree. Tear a rendered tree down with
/// [`destroy`](Self::destroy), or [`release`](Self::release) it before
/// dropping: a plain drop has no backend to return meshes to.
#[derive(Debug)]
pub struct Layer<M> {
    properties: LayerProperties,
    dirt: LayerDirt,
    render_state: RenderState,
    attachments: Vec<Attachment<M>>,
    attachment_ids: Vec<AttachmentId>,
    next_attachment: HandleCounter,
    children: Vec<Self>,
    child_ids: Vec<LayerId>,
    next_child: HandleCounter,
}

impl<M> Layer<M> {
    /// Creates a root layer of `size` with default properties.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::from_properties(LayerProperties::with_size(size))
    }

    /// Creates a detached layer with the given properties.
    ///
    /// The layer starts with [`LayerDirt::TRANSFORM`] set and with no
    /// attachments or children.
    #[must_use]
    pub fn from_properties(properties: LayerProperties) -> Self {
        Self {
            properties,
            dirt: LayerDirt::default(),
            render_state: RenderState::default(),
            attachments: Vec::new(),
            attachment_ids: Vec::new(),
            next_attachment: HandleCounter::default(),
            children: Vec::new(),
            child_ids: Vec::new(),
            next_child: HandleCounter::default(),
        }
    }

    // -- Properties --------------------------------------------------------

    /// Returns the layout properties.
    #[must_use]
    pub const fn properties(&self) -> &LayerProperties {
        &self.properties
    }

    /// Returns the pixel extent.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.properties.size
    }

    /// Returns the current dirty flags.
    #[must_use]
    pub const fn dirt(&self) -> LayerDirt {
        self.dirt
    }

    /// Returns the state cached by the last render pass.
    #[must_use]
    pub const fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    /// Returns the world transform computed by the last render pass.
    ///
    /// Only current while [`LayerDirt::TRANSFORM`] is clear.
    #[must_use]
    pub const fn transform_world(&self) -> Transform3d {
        self.render_state.transform_world
    }

    /// Sets the anchor, normalized to the parent's size.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.properties.anchor = anchor;
        self.mark_transform_dirty();
    }

    /// Sets the origin, normalized to this layer's size.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.properties.origin = origin;
        self.mark_transform_dirty();
    }

    /// Sets the pixel offset from the anchor.
    pub fn set_position(&mut self, position: Vec2) {
        self.properties.position = position;
        self.mark_transform_dirty();
    }

    /// Sets the pixel extent.
    ///
    /// Also marks every direct attachment's mesh stale. Attachments of
    /// descendants are unaffected, since they span their own layers.
    pub fn set_size(&mut self, size: Size) {
        self.properties.size = size;
        self.mark_transform_dirty();
        for attachment in &mut self.attachments {
            attachment.mark_mesh_dirty();
        }
    }

    /// Sets the scale factors around the origin.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.properties.scale = scale;
        self.mark_transform_dirty();
    }

    /// Sets the shear factors.
    pub fn set_shear(&mut self, shear: Vec2) {
        self.properties.shear = shear;
        self.mark_transform_dirty();
    }

    /// Sets the clockwise rotation around the origin, in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.properties.rotation = degrees;
        self.mark_transform_dirty();
    }

    fn mark_transform_dirty(&mut self) {
        self.dirt |= LayerDirt::TRANSFORM;
        for child in &mut self.children {
            child.mark_transform_dirty();
        }
    }

    // -- Children ----------------------------------------------------------

    /// Appends a new child with the given properties and returns its handle.
    ///
    /// The child is painted after (on top of) all existing children.
    ///
    /// # Panics
    ///
    /// Panics if this layer has issued `u32::MAX` child handles.
    pub fn add_child(&mut self, properties: LayerProperties) -> LayerId {
        self.add_child_layer(Self::from_properties(properties))
    }

    /// Appends an existing subtree as the last child and returns its handle.
    ///
    /// The whole subtree is marked [`LayerDirt::TRANSFORM`], since its world
    /// transforms were computed against a different parent, if any.
    ///
    /// # Panics
    ///
    /// Panics if this layer has issued `u32::MAX` child handles.
    pub fn add_child_layer(&mut self, mut layer: Self) -> LayerId {
        let id = LayerId(self.next_child.next());
        layer.mark_transform_dirty();
        self.children.push(layer);
        self.child_ids.push(id);
        id
    }

    /// Removes a child, returning its subtree's meshes to `backend`.
    ///
    /// The remaining children keep their relative order.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name a current child of this layer. The tree
    /// is left unchanged in that case.
    pub fn remove_child<B>(&mut self, id: LayerId, backend: &mut B)
    where
        B: MeshBackend<Mesh = M>,
    {
        let Some(pos) = self.child_ids.iter().position(|&c| c == id) else {
            panic!("remove_child: {id:?} is not a child of this layer");
        };
        self.child_ids.remove(pos);
        let mut child = self.children.remove(pos);
        child.release(backend);
    }

    /// Returns the child named by `id`, if it is a current child.
    #[must_use]
    pub fn child(&self, id: LayerId) -> Option<&Self> {
        let pos = self.child_ids.iter().position(|&c| c == id)?;
        self.children.get(pos)
    }

    /// Returns the child named by `id` mutably, if it is a current child.
    #[must_use]
    pub fn child_mut(&mut self, id: LayerId) -> Option<&mut Self> {
        let pos = self.child_ids.iter().position(|&c| c == id)?;
        self.children.get_mut(pos)
    }

    /// Returns whether `id` names a current child.
    #[must_use]
    pub fn contains_child(&self, id: LayerId) -> bool {
        self.child_ids.contains(&id)
    }

    /// Returns the children with their handles, in paint order.
    #[must_use]
    pub fn children(&self) -> Children<'_, M> {
        Children::new(&self.child_ids, &self.children)
    }

    // -- Attachments -------------------------------------------------------

    /// Appends an attachment and returns its handle.
    ///
    /// The attachment is painted after (on top of) all existing attachments
    /// of this layer, and before any of its children.
    ///
    /// # Panics
    ///
    /// Panics if this layer has issued `u32::MAX` attachment handles.
    pub fn add_attachment(&mut self, attachment: Attachment<M>) -> AttachmentId {
        let id = AttachmentId(self.next_attachment.next());
        self.attachments.push(attachment);
        self.attachment_ids.push(id);
        id
    }

    /// Appends a colour attachment and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if this layer has issued `u32::MAX` attachment handles.
    pub fn add_attachment_colour(&mut self, fill: ColourFill) -> AttachmentId {
        self.add_attachment(Attachment::colour(fill))
    }

    /// Appends a texture attachment and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if this layer has issued `u32::MAX` attachment handles.
    pub fn add_attachment_texture(&mut self, fill: TextureFill) -> AttachmentId {
        self.add_attachment(Attachment::texture(fill))
    }

    /// Removes an attachment, returning its mesh to `backend`.
    ///
    /// The remaining attachments keep their relative order.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name a current attachment of this layer. The
    /// layer is left unchanged in that case.
    pub fn remove_attachment<B>(&mut self, id: AttachmentId, backend: &mut B)
    where
        B: MeshBackend<Mesh = M>,
    {
        let Some(pos) = self.attachment_ids.iter().position(|&a| a == id) else {
            panic!("remove_attachment: {id:?} is not an attachment of this layer");
        };
        self.attachment_ids.remove(pos);
        let mut attachment = self.attachments.remove(pos);
        attachment.release(backend);
    }

    /// Returns the attachment named by `id`, if it is current.
    #[must_use]
    pub fn attachment(&self, id: AttachmentId) -> Option<&Attachment<M>> {
        let pos = self.attachment_ids.iter().position(|&a| a == id)?;
        self.attachments.get(pos)
    }

    /// Returns the attachment named by `id` mutably, if it is current.
    #[must_use]
    pub fn attachment_mut(&mut self, id: AttachmentId) -> Option<&mut Attachment<M>> {
        let pos = self.attachment_ids.iter().position(|&a| a == id)?;
        self.attachments.get_mut(pos)
    }

    /// Returns whether `id` names a current attachment.
    #[must_use]
    pub fn contains_attachment(&self, id: AttachmentId) -> bool {
        self.attachment_ids.contains(&id)
    }

    /// Returns the attachments with their handles, in paint order.
    #[must_use]
    pub fn attachments(&self) -> Attachments<'_, M> {
        Attachments::new(&self.attachment_ids, &self.attachments)
    }

    // -- Teardown ----------------------------------------------------------

    /// Returns every mesh in this subtree to `backend` and returns how many
    /// there were.
    ///
    /// The tree itself is kept. Released attachments are marked stale, so a
    /// later [`render`](Self::render) rebuilds them.
    pub fn release<B>(&mut self, backend: &mut B) -> usize
    where
        B: MeshBackend<Mesh = M>,
    {
        let mut released = 0;
        for attachment in &mut self.attachments {
            released += usize::from(attachment.release(backend));
        }
        for child in &mut self.children {
            released += child.release(backend);
        }
        released
    }

    /// Destroys this layer and its subtree, returning every mesh to
    /// `backend` first. Returns how many meshes were released.
    pub fn destroy<B>(mut self, backend: &mut B) -> usize
    where
        B: MeshBackend<Mesh = M>,
    {
        self.release(backend)
    }
}
