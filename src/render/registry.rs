//! Shape registry: the flattened segment list the tracer consumes each frame.
//!
//! The registry writes straight into the [`ShapeBlock`] uploaded to the GPU, so
//! the capacity check at [`ShapeRegistry::append`] is the only place the
//! fixed-size contract is enforced.

use glam::Vec2;

use super::params::{ShapeBlock, SHAPE_CAPACITY};
use super::shape::{Material, Shape};
use crate::util::{Error, Result};

/// Append-only, fixed-capacity ordered sequence of shapes valid for one frame.
#[derive(Clone)]
pub struct ShapeRegistry {
    count: usize,
    block: Box<ShapeBlock>,
}

impl ShapeRegistry {
    pub const CAPACITY: usize = SHAPE_CAPACITY;

    pub fn new() -> Self {
        Self { count: 0, block: ShapeBlock::boxed() }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Append segment `a -> b`. Fails once [`Self::CAPACITY`] shapes are held.
    pub fn append(&mut self, a: Vec2, b: Vec2, material: Material) -> Result<()> {
        let c = self.count;
        if c >= Self::CAPACITY {
            return Err(Error::CapacityExceeded { capacity: Self::CAPACITY });
        }
        self.block.vertices[c] = [a.x, a.y, b.x, b.y];
        self.block.materials[c] = material.to_gpu();
        self.count += 1;
        Ok(())
    }

    /// Shape at `index`, if registered.
    pub fn get(&self, index: usize) -> Option<Shape> {
        if index >= self.len() {
            return None;
        }
        let v = self.block.vertices[index];
        let material = Material::from_gpu(self.block.materials[index])?;
        Some(Shape::new(Vec2::new(v[0], v[1]), Vec2::new(v[2], v[3]), material))
    }

    /// Lazy, restartable traversal in registration order.
    pub fn iter(&self) -> Shapes<'_> {
        Shapes { registry: self, next: 0 }
    }

    /// Visit every shape as `(a, b, material)`.
    pub fn for_each(&self, mut visitor: impl FnMut(Vec2, Vec2, Material)) {
        for shape in self.iter() {
            visitor(shape.a, shape.b, shape.material);
        }
    }

    /// Device-side parameter block.
    pub fn block(&self) -> &ShapeBlock {
        &self.block
    }

    fn live_vertices(&self) -> &[[f32; 4]] {
        &self.block.vertices[..self.len()]
    }

    fn live_materials(&self) -> &[[f32; 4]] {
        &self.block.materials[..self.len()]
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal when the live prefixes match; stale entries past the count are ignored.
impl PartialEq for ShapeRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.live_vertices() == other.live_vertices()
            && self.live_materials() == other.live_materials()
    }
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over registered shapes.
#[derive(Clone)]
pub struct Shapes<'a> {
    registry: &'a ShapeRegistry,
    next: usize,
}

impl Iterator for Shapes<'_> {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        while self.next < self.registry.len() {
            let index = self.next;
            self.next += 1;
            if let Some(shape) = self.registry.get(index) {
                return Some(shape);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.registry.len().saturating_sub(self.next)))
    }
}
