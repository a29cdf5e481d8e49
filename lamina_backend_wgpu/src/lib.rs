// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! wgpu mesh backend for lamina.
//!
//! [`WgpuMeshBackend`] uploads each attachment mesh into its own vertex and
//! index buffer. Pipelines drawing these meshes describe their vertex input
//! with [`vertex_buffer_layout`], which binds every component to the fixed
//! attribute location declared in [`lamina_core::mesh`].
//!
//! ```rust,ignore
//! let mut backend = WgpuMeshBackend::new(device.clone(), queue.clone());
//! root.render(&mut backend)?;
//!
//! let mut pass = encoder.begin_render_pass(&descriptor);
//! for item in &drawer.plan(&root).items {
//!     pass.set_pipeline(&pipelines[item.program]);
//!     item.mesh.draw(&mut pass);
//! }
//! ```

use core::convert::Infallible;

use lamina_core::backend::MeshBackend;
use lamina_core::mesh::{
    MeshData, RGBA_ATTRIBUTE, TEXTURE_INDEX_ATTRIBUTE, UV_ATTRIBUTE, VertexLayout, XYZ_ATTRIBUTE,
};

const COLOUR_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: XYZ_ATTRIBUTE,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 12,
        shader_location: RGBA_ATTRIBUTE,
    },
];

const TEXTURE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: XYZ_ATTRIBUTE,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 12,
        shader_location: UV_ATTRIBUTE,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 20,
        shader_location: TEXTURE_INDEX_ATTRIBUTE,
    },
];

/// Returns the vertex buffer layout of meshes in `layout`.
#[must_use]
pub fn vertex_buffer_layout(layout: VertexLayout) -> wgpu::VertexBufferLayout<'static> {
    let attributes: &'static [wgpu::VertexAttribute] = match layout {
        VertexLayout::Colour => &COLOUR_ATTRIBUTES,
        VertexLayout::Texture => &TEXTURE_ATTRIBUTES,
    };
    wgpu::VertexBufferLayout {
        array_stride: layout.stride() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// A mesh uploaded to GPU buffers.
#[derive(Debug)]
pub struct WgpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    layout: VertexLayout,
}

impl WgpuMesh {
    /// Returns the vertex layout of the mesh.
    #[must_use]
    pub const fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Returns the number of indices.
    #[must_use]
    pub const fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Records an indexed draw of the whole mesh.
    ///
    /// The caller binds a pipeline whose vertex input is
    /// [`vertex_buffer_layout`] for [`layout`](Self::layout), plus its
    /// uniforms and textures.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates one vertex buffer and one index buffer per mesh.
///
/// wgpu reports allocation failures through the device's error scopes, so
/// [`create_mesh`](MeshBackend::create_mesh) itself never fails.
#[derive(Debug)]
pub struct WgpuMeshBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuMeshBackend {
    /// Creates a backend uploading through `queue` into buffers on `device`.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Returns the device buffers are created on.
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    fn upload(&self, label: &str, usage: wgpu::BufferUsages, bytes: &[u8]) -> wgpu::Buffer {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: bytes.len() as wgpu::BufferAddress,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue.write_buffer(&buffer, 0, bytes);
        buffer
    }
}

impl MeshBackend for WgpuMeshBackend {
    type Mesh = WgpuMesh;
    type Error = Infallible;

    fn create_mesh(&mut self, data: &MeshData<'_>) -> Result<WgpuMesh, Infallible> {
        let vertex_buffer = self.upload(
            "lamina vertices",
            wgpu::BufferUsages::VERTEX,
            data.vertex_bytes(),
        );
        let index_buffer = self.upload(
            "lamina indices",
            wgpu::BufferUsages::INDEX,
            bytemuck::cast_slice(data.indices()),
        );
        #[allow(
            clippy::cast_possible_truncation,
            reason = "quad meshes have six indices"
        )]
        let index_count = data.indices().len() as u32;
        Ok(WgpuMesh {
            vertex_buffer,
            index_buffer,
            index_count,
            layout: data.layout(),
        })
    }

    fn destroy_mesh(&mut self, mesh: WgpuMesh) {
        mesh.vertex_buffer.destroy();
        mesh.index_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_layouts_match_vertex_components() {
        for layout in [VertexLayout::Colour, VertexLayout::Texture] {
            let wgpu_layout = vertex_buffer_layout(layout);
            assert_eq!(wgpu_layout.array_stride, layout.stride() as u64);
            assert_eq!(wgpu_layout.step_mode, wgpu::VertexStepMode::Vertex);
            assert_eq!(
                wgpu_layout.attributes.len(),
                layout.components().len(),
                "{layout:?}"
            );
            for (attr, component) in wgpu_layout.attributes.iter().zip(layout.components()) {
                assert_eq!(attr.shader_location, component.attribute);
                assert_eq!(attr.offset, u64::from(component.offset));
                assert_eq!(attr.format.size(), u64::from(component.values) * 4);
            }
        }
    }
}
