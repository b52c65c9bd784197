//! Window-space screen quad shared by the trace and present passes.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

const INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl ScreenVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ScreenVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Quad corners covering `(0, 0)..size` in logical window coordinates.
pub fn quad_vertices(size: Vec2) -> [ScreenVertex; 4] {
    [
        ScreenVertex { position: [0.0, 0.0], uv: [0.0, 0.0] },
        ScreenVertex { position: [size.x, 0.0], uv: [1.0, 0.0] },
        ScreenVertex { position: [size.x, size.y], uv: [1.0, 1.0] },
        ScreenVertex { position: [0.0, size.y], uv: [0.0, 1.0] },
    ]
}

pub struct ScreenQuad {
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

impl ScreenQuad {
    pub fn new(device: &wgpu::Device, size: Vec2) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen-vertices"),
            contents: bytemuck::cast_slice(&quad_vertices(size)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen-indices"),
            contents: bytemuck::cast_slice(&INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: INDICES.len() as u32,
        }
    }

    /// Bind buffers and draw both triangles.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    pub fn destroy(&self) {
        self.vertices.destroy();
        self.indices.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_window() {
        let v = quad_vertices(Vec2::new(400.0, 300.0));
        assert_eq!(v[0].position, [0.0, 0.0]);
        assert_eq!(v[2].position, [400.0, 300.0]);
        assert_eq!(v[2].uv, [1.0, 1.0]);
        // both triangles share the 0-2 diagonal
        assert_eq!(&INDICES[..3], &[0, 1, 2]);
        assert_eq!(&INDICES[3..], &[0, 2, 3]);
    }
}
