// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for graphics integrations.
//!
//! The layer tree never talks to a graphics API directly. Everything that
//! allocates GPU memory goes through a [`MeshBackend`], which turns borrowed
//! [`MeshData`] into an owned, backend-specific mesh handle and takes that
//! handle back when the mesh is no longer needed.
//!
//! # Ownership
//!
//! Every handle returned by [`MeshBackend::create_mesh`] is owned by exactly
//! one attachment and handed back to [`MeshBackend::destroy_mesh`] exactly
//! once: either when the attachment rebuilds its mesh (the old handle is
//! destroyed before the new one is created) or when the attachment is
//! released. Handles dropped without being destroyed are leaked from the
//! backend's point of view.
//!
//! # Crate boundaries
//!
//! `lamina_core` owns the data model, the render pass and this contract
//! module. Backend crates such as `lamina_backend_wgpu` depend on
//! `lamina_core` and implement [`MeshBackend`]. [`HeadlessBackend`] is an
//! in-memory implementation for tests and tooling.

use alloc::vec::Vec;
use core::fmt;

use crate::mesh::{MeshData, Vertex, VertexLayout};

/// Creates and destroys GPU-resident meshes.
///
/// # Render loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(root: &mut Layer<B::Mesh>, backend: &mut B, target: &mut T) {
///     // Mutate: setters mark TRANSFORM and MESH bits.
///     root.child_mut(sprite).unwrap().set_position(Vec2::new(x, y));
///
///     // Render: rebuild dirty meshes and world transforms.
///     let changes = root.render(backend)?;
///
///     // Draw: issue one draw per attachment in paint order.
///     drawer.draw(root, target);
/// }
/// ```
pub trait MeshBackend {
    /// The backend's owned mesh handle.
    type Mesh;
    /// The error returned when a mesh cannot be created.
    type Error: core::error::Error;

    /// Uploads `data` and returns an owned handle to the resulting mesh.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the backend cannot allocate the mesh.
    fn create_mesh(&mut self, data: &MeshData<'_>) -> Result<Self::Mesh, Self::Error>;

    /// Releases a mesh previously returned by [`create_mesh`](Self::create_mesh).
    fn destroy_mesh(&mut self, mesh: Self::Mesh);
}

/// Error returned by [`HeadlessBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadlessError {
    /// The configured number of live meshes has been reached.
    Exhausted {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { limit } => {
                write!(f, "mesh limit of {limit} live meshes reached")
            }
        }
    }
}

impl core::error::Error for HeadlessError {}

/// A mesh held in memory by [`HeadlessBackend`].
///
/// Keeps a copy of the uploaded data so that tests and tooling can inspect
/// what the render pass produced.
#[derive(Debug, PartialEq)]
pub struct HeadlessMesh {
    id: u64,
    layout: VertexLayout,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl HeadlessMesh {
    /// Returns the creation-order id assigned by the backend.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the vertex layout.
    #[must_use]
    pub const fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// Returns the raw vertex values.
    #[must_use]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Returns the vertices as `V`, if `V` has this mesh's layout.
    #[must_use]
    pub fn typed_vertices<V: Vertex>(&self) -> Option<&[V]> {
        if V::LAYOUT != self.layout {
            return None;
        }
        bytemuck::try_cast_slice(&self.vertices).ok()
    }

    /// Returns the triangle indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// An in-memory [`MeshBackend`] that keeps creation accounting.
///
/// Optionally refuses to hold more than a fixed number of live meshes, which
/// simulates GPU memory exhaustion.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    created: usize,
    destroyed: usize,
    limit: Option<usize>,
}

impl HeadlessBackend {
    /// Creates a backend without a mesh limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            created: 0,
            destroyed: 0,
            limit: None,
        }
    }

    /// Creates a backend that fails once `limit` meshes are live.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            next_id: 0,
            created: 0,
            destroyed: 0,
            limit: Some(limit),
        }
    }

    /// Returns the number of meshes created so far.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }

    /// Returns the number of meshes destroyed so far.
    #[must_use]
    pub const fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Returns the number of meshes currently live.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.created - self.destroyed
    }
}

impl MeshBackend for HeadlessBackend {
    type Mesh = HeadlessMesh;
    type Error = HeadlessError;

    fn create_mesh(&mut self, data: &MeshData<'_>) -> Result<HeadlessMesh, HeadlessError> {
        if let Some(limit) = self.limit
            && self.live() >= limit
        {
            return Err(HeadlessError::Exhausted { limit });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        Ok(HeadlessMesh {
            id,
            layout: data.layout(),
            vertices: data.vertices().to_vec(),
            indices: data.indices().to_vec(),
        })
    }

    fn destroy_mesh(&mut self, mesh: HeadlessMesh) {
        assert!(
            mesh.id < self.next_id && self.live() > 0,
            "mesh {} was not created by this backend",
            mesh.id
        );
        self.destroyed += 1;
    }
}
