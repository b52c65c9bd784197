//! Uniform blocks shared with the WGSL shaders.
//!
//! Layouts must match `shaders.rs` byte for byte.

use bytemuck::{Pod, Zeroable};

/// Maximum number of segments the trace shader can see in one frame.
pub const SHAPE_CAPACITY: usize = 512;

/// Fixed-size scene description uploaded every frame.
///
/// `vertices[i]` packs segment `i` as `(ax, ay, bx, by)`, `materials[i]` as
/// `(r, g, b, kind)`. The live count travels in [`FrameParams::shape_count`]
/// so the block stays at exactly 16 KiB, the smallest uniform binding limit
/// wgpu adapters report.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ShapeBlock {
    pub vertices: [[f32; 4]; SHAPE_CAPACITY],
    pub materials: [[f32; 4]; SHAPE_CAPACITY],
}

impl ShapeBlock {
    /// Heap-allocated zeroed block (16 KiB, too large for comfortable stack use).
    pub fn boxed() -> Box<Self> {
        bytemuck::zeroed_box()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-frame trace parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameParams {
    /// Window-space orthographic projection.
    pub projection: [[f32; 4]; 4],
    /// Accumulation target size in pixels.
    pub resolution: [f32; 2],
    /// Wall-clock seconds, used as the per-frame random seed.
    pub time: f32,
    /// Samples already accumulated in the buffer being read.
    pub sample_index: u32,
    pub rays_per_sample: u32,
    pub max_bounces: u32,
    /// Live entries in the [`ShapeBlock`].
    pub shape_count: u32,
    /// Weight of the new sample in the running average.
    pub blend_weight: f32,
}

/// Present pass parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PresentParams {
    pub projection: [[f32; 4]; 4],
    pub exposure: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}
