//! Trace pass: refines the radiance estimate into the accumulation pair.
//!
//! One full-screen draw per frame. The fragment shader reads the buffer
//! holding the newest estimate, blends in a fresh Monte-Carlo sample and
//! writes the result into the other buffer.

use glam::Mat4;

use super::params::{FrameParams, ShapeBlock};
use super::quad::{ScreenQuad, ScreenVertex};
use super::shaders::TRACE_SHADER;
use super::state::TraceState;
use super::targets::AccumulationTargets;

/// Sampling budget per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceQuality {
    pub rays_per_sample: u32,
    pub max_bounces: u32,
}

impl Default for TraceQuality {
    fn default() -> Self {
        Self { rays_per_sample: 16, max_bounces: 3 }
    }
}

impl TraceQuality {
    pub const MAX_RAYS: u32 = 64;
    pub const MAX_BOUNCES: u32 = 8;

    pub fn clamped(self) -> Self {
        Self {
            rays_per_sample: self.rays_per_sample.clamp(1, Self::MAX_RAYS),
            max_bounces: self.max_bounces.clamp(1, Self::MAX_BOUNCES),
        }
    }
}

/// Build the frame uniform for the next sample.
pub fn frame_params(
    state: &TraceState,
    projection: Mat4,
    size: (u32, u32),
    time: f32,
    quality: TraceQuality,
) -> FrameParams {
    FrameParams {
        projection: projection.to_cols_array_2d(),
        resolution: [size.0 as f32, size.1 as f32],
        time,
        sample_index: state.sample_index(),
        rays_per_sample: quality.rays_per_sample,
        max_bounces: quality.max_bounces,
        shape_count: state.shapes().len() as u32,
        blend_weight: state.accumulation().blend_weight(),
    }
}

pub struct TracePass {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    shapes_buffer: wgpu::Buffer,
    /// `bind_groups[i]` reads target `i` as history.
    bind_groups: [wgpu::BindGroup; 2],
    pub quality: TraceQuality,
}

impl TracePass {
    pub fn new(device: &wgpu::Device, targets: &AccumulationTargets, quality: TraceQuality) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trace_shader"),
            source: wgpu::ShaderSource::Wgsl(TRACE_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trace_bind_group_layout"),
            entries: &[
                // @binding(0) frame params
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // @binding(1) shape block
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // @binding(2) previous estimate
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trace_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trace_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ScreenVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: AccumulationTargets::FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trace_frame_params"),
            size: std::mem::size_of::<FrameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shapes_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trace_shape_block"),
            size: std::mem::size_of::<ShapeBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let make_bind_group = |read: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("trace_bind_group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: frame_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: shapes_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(targets.view(read)),
                    },
                ],
            })
        };
        let bind_groups = [make_bind_group(0), make_bind_group(1)];

        Self {
            pipeline,
            frame_buffer,
            shapes_buffer,
            bind_groups,
            quality: quality.clamped(),
        }
    }

    /// Upload this frame's inputs and record the trace draw.
    ///
    /// Does not advance the sample index; the caller does that once the pass
    /// is recorded.
    #[tracing::instrument(skip_all, fields(sample = state.sample_index(), shapes = state.shapes().len()))]
    pub fn execute(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        quad: &ScreenQuad,
        targets: &AccumulationTargets,
        state: &TraceState,
        projection: Mat4,
        time: f32,
    ) {
        let params = frame_params(state, projection, targets.size(), time, self.quality);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&params));
        queue.write_buffer(&self.shapes_buffer, 0, state.shapes().block().as_bytes());

        let accumulation = state.accumulation();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trace_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.view(accumulation.write_index()),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[accumulation.read_index()], &[]);
        quad.draw(&mut pass);
    }

    pub fn destroy(&self) {
        self.frame_buffer.destroy();
        self.shapes_buffer.destroy();
    }
}
