//! Frame driver for the trace/present pass pair.

use std::sync::Arc;

use glam::Mat4;

use super::present::PresentPass;
use super::quad::ScreenQuad;
use super::state::TraceState;
use super::targets::AccumulationTargets;
use super::trace::{TracePass, TraceQuality};
use crate::util::{logical_size, window_projection, Result};

/// Sizing and quality inputs fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Display scale (physical pixels per logical point).
    pub scale_factor: f32,
    pub quality: TraceQuality,
    pub exposure: f32,
    /// Format of the texture the present pass writes.
    pub output_format: wgpu::TextureFormat,
}

/// GPU resources and per-frame scheduling.
///
/// Targets are sized once; the window is not resized while running.
pub struct Renderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    quad: ScreenQuad,
    targets: AccumulationTargets,
    trace: TracePass,
    present: PresentPass,
    projection: Mat4,
}

impl Renderer {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, config: RendererConfig) -> Result<Self> {
        let targets = AccumulationTargets::new(&device, config.width, config.height)?;
        let quad = ScreenQuad::new(
            &device,
            logical_size(config.width, config.height, config.scale_factor),
        );
        let trace = TracePass::new(&device, &targets, config.quality);
        let present = PresentPass::new(&device, &targets, config.output_format, config.exposure);
        let projection = window_projection(config.width, config.height, config.scale_factor);

        tracing::info!(
            width = config.width,
            height = config.height,
            scale = config.scale_factor,
            rays = trace.quality.rays_per_sample,
            bounces = trace.quality.max_bounces,
            "renderer ready"
        );

        Ok(Self {
            device,
            queue,
            quad,
            targets,
            trace,
            present,
            projection,
        })
    }

    /// Trace one sample, advance, then present the fresh estimate to `output`.
    ///
    /// Submission is fire-and-forget; nothing here waits on the GPU.
    pub fn render_frame(&mut self, state: &mut TraceState, time: f32, output: &wgpu::TextureView) {
        let _span = tracing::info_span!("render_frame", sample = state.sample_index()).entered();

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        self.trace.execute(
            &self.queue,
            &mut encoder,
            &self.quad,
            &self.targets,
            state,
            self.projection,
            time,
        );
        state.advance();

        self.present.execute(
            &self.queue,
            &mut encoder,
            &self.quad,
            state.accumulation().current_index(),
            output,
            self.projection,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Release every GPU resource the renderer created.
    pub fn teardown(self) {
        self.trace.destroy();
        self.present.destroy();
        self.quad.destroy();
        self.targets.destroy();
        tracing::debug!("renderer released");
    }
}
