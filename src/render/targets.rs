//! The accumulation buffer pair.

use crate::util::{Error, Result};

/// Two equally sized float color surfaces used in ping-pong fashion.
pub struct AccumulationTargets {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    size: (u32, u32),
}

impl AccumulationTargets {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

    /// Allocate both surfaces at `width x height` pixels.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        check_size(width, height, device.limits().max_texture_dimension_2d)?;

        let make = |label: &'static str| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        };
        let (t0, v0) = make("trace-target-0");
        let (t1, v1) = make("trace-target-1");

        tracing::info!(width, height, "allocated accumulation targets");
        Ok(Self {
            textures: [t0, t1],
            views: [v0, v1],
            size: (width, height),
        })
    }

    pub fn view(&self, index: usize) -> &wgpu::TextureView {
        &self.views[index % 2]
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Release both surfaces.
    pub fn destroy(&self) {
        for texture in &self.textures {
            texture.destroy();
        }
    }
}

fn check_size(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::resource(format!("empty render target {width}x{height}")));
    }
    if width > max_dimension || height > max_dimension {
        return Err(Error::resource(format!(
            "render target {width}x{height} exceeds device limit {max_dimension}"
        )));
    }
    Ok(())
}
