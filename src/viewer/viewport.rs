//! Traced image widget: owns the renderer and the egui-visible display texture

use std::sync::Arc;

use egui::{Color32, Painter, Rect};

use crate::render::{Renderer, RendererConfig, TraceQuality, TraceState};
use crate::util::Result;

/// Viewport state
pub struct Viewport {
    renderer: Option<Renderer>,
    texture_id: Option<egui::TextureId>,
    display: Option<DisplayTexture>,
}

struct DisplayTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            renderer: None,
            texture_id: None,
            display: None,
        }
    }

    /// Create the renderer and display texture on first use.
    ///
    /// `size` is in physical pixels. Later calls with a different size keep
    /// the first targets; the image is stretched instead.
    pub fn ensure(
        &mut self,
        render_state: &egui_wgpu::RenderState,
        size: (u32, u32),
        scale_factor: f32,
        quality: TraceQuality,
        exposure: f32,
    ) -> Result<()> {
        if let Some(current) = &self.display {
            if current.size != size {
                tracing::trace!(?size, targets = ?current.size, "viewport size differs from targets");
            }
            return Ok(());
        }

        let device = &render_state.device;
        let format = render_state.target_format;
        let (width, height) = size;

        let renderer = Renderer::new(
            Arc::new(device.clone()),
            Arc::new(render_state.queue.clone()),
            RendererConfig {
                width,
                height,
                scale_factor,
                quality,
                exposure,
                output_format: format,
            },
        )?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("display_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Register with egui
        let tex_id = render_state.renderer.write().register_native_texture(
            device,
            &view,
            wgpu::FilterMode::Nearest,
        );

        self.texture_id = Some(tex_id);
        self.display = Some(DisplayTexture { texture, view, size });
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Trace and present one frame into the display texture.
    pub fn render(&mut self, state: &mut TraceState, time: f32) {
        if let (Some(renderer), Some(display)) = (&mut self.renderer, &self.display) {
            renderer.render_frame(state, time, &display.view);
        }
    }

    pub fn paint(&self, painter: &Painter, rect: Rect) {
        match self.texture_id {
            Some(tex_id) => {
                painter.image(
                    tex_id,
                    rect,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 0.0, Color32::BLACK);
            }
        }
    }

    /// Free GPU resources. Without a render state the egui texture slot is left
    /// to the egui renderer, which is dropping anyway.
    pub fn release(&mut self, render_state: Option<&egui_wgpu::RenderState>) {
        if let (Some(rs), Some(id)) = (render_state, self.texture_id.take()) {
            rs.renderer.write().free_texture(&id);
        }
        if let Some(renderer) = self.renderer.take() {
            renderer.teardown();
        }
        if let Some(display) = self.display.take() {
            display.texture.destroy();
        }
    }
}
