// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex layouts and mesh data handed to a [`MeshBackend`](crate::backend::MeshBackend).
//!
//! Every attachment mesh is an indexed quad in one of two fixed layouts. All
//! components are 32-bit floats, tightly packed, bound to fixed vertex
//! attribute locations:
//!
//! | location | component                | colour | texture |
//! |----------|--------------------------|--------|---------|
//! | 0        | xyz, pixels, top-left origin | ✓  | ✓       |
//! | 1        | rgba, normalized         | ✓      |         |
//! | 2        | uv, bottom-left origin   |        | ✓       |
//! | 3        | array texture element    |        | ✓       |
//!
//! The array element is present in every texture vertex, including those
//! sampling flat textures, so that the texture layout never varies.

use bytemuck::{Pod, Zeroable};

/// Vertex attribute location of the XYZ position.
pub const XYZ_ATTRIBUTE: u32 = 0;
/// Vertex attribute location of the RGBA colour.
pub const RGBA_ATTRIBUTE: u32 = 1;
/// Vertex attribute location of the UV texture coordinate.
pub const UV_ATTRIBUTE: u32 = 2;
/// Vertex attribute location of the array texture element index.
pub const TEXTURE_INDEX_ATTRIBUTE: u32 = 3;

/// Indices of the two triangles forming a quad whose corners are ordered
/// top-left, top-right, bottom-left, bottom-right.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

/// One component of a vertex, bound to one attribute location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexComponent {
    /// Attribute location the component binds to.
    pub attribute: u32,
    /// Number of `f32` values in the component.
    pub values: u32,
    /// Byte offset of the component within a vertex.
    pub offset: u32,
}

const COLOUR_COMPONENTS: [VertexComponent; 2] = [
    VertexComponent {
        attribute: XYZ_ATTRIBUTE,
        values: 3,
        offset: 0,
    },
    VertexComponent {
        attribute: RGBA_ATTRIBUTE,
        values: 4,
        offset: 12,
    },
];

const TEXTURE_COMPONENTS: [VertexComponent; 3] = [
    VertexComponent {
        attribute: XYZ_ATTRIBUTE,
        values: 3,
        offset: 0,
    },
    VertexComponent {
        attribute: UV_ATTRIBUTE,
        values: 2,
        offset: 12,
    },
    VertexComponent {
        attribute: TEXTURE_INDEX_ATTRIBUTE,
        values: 1,
        offset: 20,
    },
];

/// The two vertex layouts attachment meshes use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// Position and per-corner colour.
    Colour,
    /// Position, texture coordinate and array element.
    Texture,
}

impl VertexLayout {
    /// Returns the components of one vertex, in memory order.
    #[must_use]
    pub const fn components(self) -> &'static [VertexComponent] {
        match self {
            Self::Colour => &COLOUR_COMPONENTS,
            Self::Texture => &TEXTURE_COMPONENTS,
        }
    }

    /// Returns the number of `f32` values in one vertex.
    #[must_use]
    pub const fn floats_per_vertex(self) -> usize {
        match self {
            Self::Colour => 7,
            Self::Texture => 6,
        }
    }

    /// Returns the size of one vertex in bytes.
    #[must_use]
    pub const fn stride(self) -> usize {
        self.floats_per_vertex() * size_of::<f32>()
    }
}

/// A vertex type with a fixed [`VertexLayout`].
pub trait Vertex: Pod {
    /// The layout this vertex type is laid out in.
    const LAYOUT: VertexLayout;
}

/// A vertex of a colour attachment mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColourVertex {
    /// Position in pixels.
    pub xyz: [f32; 3],
    /// Straight-alpha colour.
    pub rgba: [f32; 4],
}

impl Vertex for ColourVertex {
    const LAYOUT: VertexLayout = VertexLayout::Colour;
}

/// A vertex of a texture attachment mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextureVertex {
    /// Position in pixels.
    pub xyz: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Array texture element, ignored for flat textures.
    pub texture_index: f32,
}

impl Vertex for TextureVertex {
    const LAYOUT: VertexLayout = VertexLayout::Texture;
}

const _: () = assert!(size_of::<ColourVertex>() == VertexLayout::Colour.stride());
const _: () = assert!(size_of::<TextureVertex>() == VertexLayout::Texture.stride());

/// Borrowed vertex and index data for one mesh.
///
/// Only constructible from typed vertices, so the vertex data always matches
/// its layout.
#[derive(Clone, Copy, Debug)]
pub struct MeshData<'a> {
    layout: VertexLayout,
    vertices: &'a [f32],
    indices: &'a [u32],
}

impl<'a> MeshData<'a> {
    /// Creates mesh data from typed vertices and triangle indices.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if an index is out of range or the index count
    /// is not a multiple of three.
    #[must_use]
    pub fn new<V: Vertex>(vertices: &'a [V], indices: &'a [u32]) -> Self {
        debug_assert!(
            indices.len() % 3 == 0,
            "index count {} does not form whole triangles",
            indices.len()
        );
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "index out of range for {} vertices",
            vertices.len()
        );
        Self {
            layout: V::LAYOUT,
            vertices: bytemuck::cast_slice(vertices),
            indices,
        }
    }

    /// Returns the vertex layout.
    #[must_use]
    pub const fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Returns the raw vertex values, `floats_per_vertex` per vertex.
    #[must_use]
    pub const fn vertices(&self) -> &'a [f32] {
        self.vertices
    }

    /// Returns the vertex data as bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }

    /// Returns the triangle indices.
    #[must_use]
    pub const fn indices(&self) -> &'a [u32] {
        self.indices
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// Reinterprets the vertex data as `V`, if `V` has this mesh's layout.
    #[must_use]
    pub fn typed_vertices<V: Vertex>(&self) -> Option<&'a [V]> {
        if V::LAYOUT != self.layout {
            return None;
        }
        bytemuck::try_cast_slice(self.vertices).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn components_fill_the_stride() {
        for layout in [VertexLayout::Colour, VertexLayout::Texture] {
            let floats: u32 = layout.components().iter().map(|c| c.values).sum();
            assert_eq!(floats as usize, layout.floats_per_vertex());
            let last = layout.components().last().unwrap();
            assert_eq!((last.offset + last.values * 4) as usize, layout.stride());
        }
    }

    #[test]
    fn texture_layout_always_carries_array_index() {
        let attrs: Vec<u32> = VertexLayout::Texture
            .components()
            .iter()
            .map(|c| c.attribute)
            .collect();
        assert_eq!(attrs, [XYZ_ATTRIBUTE, UV_ATTRIBUTE, TEXTURE_INDEX_ATTRIBUTE]);
    }

    #[test]
    fn mesh_data_keeps_layout_and_counts() {
        let vertices = [ColourVertex::default(); 4];
        let data = MeshData::new(&vertices, &QUAD_INDICES);
        assert_eq!(data.layout(), VertexLayout::Colour);
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.vertices().len(), 28);
        assert_eq!(data.vertex_bytes().len(), 4 * VertexLayout::Colour.stride());
        assert_eq!(data.indices(), &QUAD_INDICES);
    }

    #[test]
    fn typed_vertices_require_matching_layout() {
        let vertices = [TextureVertex {
            xyz: [1.0, 2.0, 0.0],
            uv: [0.5, 0.25],
            texture_index: 3.0,
        }; 4];
        let data = MeshData::new(&vertices, &QUAD_INDICES);
        assert!(data.typed_vertices::<ColourVertex>().is_none());
        let back = data.typed_vertices::<TextureVertex>().unwrap();
        assert_eq!(back, &vertices);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    #[cfg(debug_assertions)]
    fn out_of_range_index_is_rejected() {
        let vertices = [ColourVertex::default(); 3];
        let _ = MeshData::new(&vertices, &QUAD_INDICES);
    }
}
