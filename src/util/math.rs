//! Math type re-exports and projection helpers.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Orthographic projection for window coordinate space.
///
/// Maps `(0, 0)` to the top-left corner and `(width, height)` (in logical
/// points, i.e. pixels divided by the display scale) to the bottom-right.
/// Depth range is wgpu's `0..1`.
pub fn window_projection(width: u32, height: u32, scale_factor: f32) -> Mat4 {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let w = width as f32 / scale;
    let h = height as f32 / scale;
    Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
}

/// Logical window size in points for a pixel size and display scale.
pub fn logical_size(width: u32, height: u32, scale_factor: f32) -> Vec2 {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    Vec2::new(width as f32 / scale, height as f32 / scale)
}
