//! Scene primitives consumed by the tracer: line segments with a material.

use glam::{Vec2, Vec3, Vec4};

/// Optical behaviour of a surface.
///
/// Discriminants are shared with the shader and the scene file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum MaterialKind {
    /// Scatters light uniformly over the facing hemisphere.
    #[default]
    Diffuse = 0,
    /// Mirror-like reflection.
    Reflective = 1,
    /// Light source.
    Emissive = 2,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [Self::Diffuse, Self::Reflective, Self::Emissive];

    /// Decode a raw discriminant.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Diffuse),
            1 => Some(Self::Reflective),
            2 => Some(Self::Emissive),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Short HUD label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Diffuse => "M: Diffuse",
            Self::Reflective => "M: Reflect",
            Self::Emissive => "M: Light",
        }
    }
}

/// Surface material: a kind plus an RGB color in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub kind: MaterialKind,
}

impl Material {
    pub const fn new(kind: MaterialKind, color: Vec3) -> Self {
        Self { color, kind }
    }

    pub const fn diffuse(color: Vec3) -> Self {
        Self::new(MaterialKind::Diffuse, color)
    }

    pub const fn reflective(color: Vec3) -> Self {
        Self::new(MaterialKind::Reflective, color)
    }

    pub const fn emissive(color: Vec3) -> Self {
        Self::new(MaterialKind::Emissive, color)
    }

    /// Pack as `(r, g, b, kind)` for the GPU parameter block.
    pub fn to_gpu(self) -> [f32; 4] {
        Vec4::new(self.color.x, self.color.y, self.color.z, self.kind.as_raw() as f32).to_array()
    }

    /// Unpack from the GPU parameter block layout.
    pub fn from_gpu(packed: [f32; 4]) -> Option<Self> {
        let kind = MaterialKind::from_raw(packed[3].round() as u32)?;
        Some(Self::new(kind, Vec3::new(packed[0], packed[1], packed[2])))
    }
}

impl Default for Material {
    /// White diffuse, the brush a fresh scene starts with.
    fn default() -> Self {
        Self::diffuse(Vec3::ONE)
    }
}

/// One tracer primitive: segment `a -> b` with a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub a: Vec2,
    pub b: Vec2,
    pub material: Material,
}

impl Shape {
    pub fn new(a: Vec2, b: Vec2, material: Material) -> Self {
        Self { a, b, material }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_raw_values() {
        for kind in MaterialKind::ALL {
            assert_eq!(MaterialKind::from_raw(kind.as_raw()), Some(kind));
        }
        assert_eq!(MaterialKind::Emissive.as_raw(), 2);
        assert_eq!(MaterialKind::from_raw(3), None);
    }

    #[test]
    fn test_gpu_packing() {
        let m = Material::reflective(Vec3::new(0.25, 0.5, 1.0));
        assert_eq!(m.to_gpu(), [0.25, 0.5, 1.0, 1.0]);
        assert_eq!(Material::from_gpu(m.to_gpu()), Some(m));
        assert_eq!(Material::from_gpu([0.0, 0.0, 0.0, 9.0]), None);
    }
}
