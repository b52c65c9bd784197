//! Trace state: the live shape registry plus accumulation, and the rules for
//! when accumulated samples must be thrown away.

use glam::Vec2;

use super::accumulation::AccumulationState;
use super::registry::ShapeRegistry;
use super::shape::Material;
use crate::util::Result;

/// Scene input and sample history owned by the frame driver.
#[derive(Debug, Default)]
pub struct TraceState {
    shapes: ShapeRegistry,
    accumulation: AccumulationState,
}

impl TraceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    pub fn accumulation(&self) -> &AccumulationState {
        &self.accumulation
    }

    pub fn sample_index(&self) -> u32 {
        self.accumulation.sample_index()
    }

    /// Empty the registry. Invalidates accumulation.
    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.accumulation.reset();
    }

    /// Add one segment. Invalidates accumulation even when the append fails.
    pub fn append_shape(&mut self, a: Vec2, b: Vec2, material: Material) -> Result<()> {
        self.accumulation.reset();
        self.shapes.append(a, b, material)
    }

    /// Install a registry rebuilt from terrain this frame.
    ///
    /// A staged registry equal to the live one keeps accumulating; any
    /// difference in endpoints, materials or count resets it. Returns whether
    /// accumulation was invalidated.
    pub fn sync_shapes(&mut self, staged: ShapeRegistry) -> bool {
        if staged == self.shapes {
            return false;
        }
        tracing::debug!(
            old = self.shapes.len(),
            new = staged.len(),
            "scene geometry changed, resetting accumulation"
        );
        self.shapes = staged;
        self.accumulation.reset();
        true
    }

    /// Record one traced sample.
    pub fn advance(&mut self) {
        self.accumulation.advance();
    }

    /// Log every registered shape.
    pub fn dump(&self) {
        tracing::info!("{} shapes, {} samples", self.shapes.len(), self.sample_index());
        for line in self.dump_lines() {
            tracing::info!("{line}");
        }
    }

    /// One line per shape: `ax ay -> bx by, mat=kind`.
    pub fn dump_lines(&self) -> Vec<String> {
        self.shapes
            .iter()
            .map(|s| {
                format!(
                    "{:.6} {:.6} -> {:.6} {:.6}, mat={}",
                    s.a.x,
                    s.a.y,
                    s.b.x,
                    s.b.y,
                    s.material.kind.as_raw()
                )
            })
            .collect()
    }
}
