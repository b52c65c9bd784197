//! Authoritative terrain list, the current brush, and pointer placement.
//!
//! Terrain geometry lives in [`Physics`]; the world keeps only handles and
//! materials and re-derives tracer segments from physics every frame.

pub mod persist;

use glam::Vec2;
use smallvec::SmallVec;

use crate::physics::{check_polygon, Physics, TerrainHandle, Vertices, TERRAIN_MAX_VERTS};
use crate::render::{Material, ShapeRegistry};
use crate::util::Result;

pub use persist::{Scene, SceneSlot};

/// Terrain piece by value: outline plus material. Used for placement and files.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainData {
    pub vertices: Vertices,
    pub material: Material,
}

impl TerrainData {
    pub fn new(vertices: &[Vec2], material: Material) -> Self {
        Self {
            vertices: vertices.iter().copied().collect(),
            material,
        }
    }
}

/// Terrain piece by reference into the physics space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPiece {
    pub handle: TerrainHandle,
    pub material: Material,
}

#[derive(Debug, Default)]
pub struct World {
    /// Material given to the next placed piece.
    pub brush: Material,
    terrain: Vec<TerrainPiece>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terrain(&self) -> &[TerrainPiece] {
        &self.terrain
    }

    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Register `data` with physics and record it.
    pub fn append(&mut self, physics: &mut Physics, data: TerrainData) -> Result<()> {
        let handle = physics.append_static_polygon(&data.vertices)?;
        self.terrain.push(TerrainPiece {
            handle,
            material: data.material,
        });
        tracing::debug!(pieces = self.terrain.len(), kind = ?data.material.kind, "terrain placed");
        Ok(())
    }

    pub fn clear(&mut self, physics: &mut Physics) {
        physics.remove_all_static_polygons();
        self.terrain.clear();
    }

    /// Flatten terrain into tracer segments, edge `v[i] -> v[(i + 1) % n]` per piece.
    ///
    /// Fails once the segment count passes the registry capacity.
    pub fn stage_shapes(&self, physics: &Physics) -> Result<ShapeRegistry> {
        let mut registry = ShapeRegistry::new();
        for piece in &self.terrain {
            let Some(verts) = physics.query_vertices(piece.handle) else {
                continue;
            };
            let n = verts.len();
            for i in 0..n {
                registry.append(verts[i], verts[(i + 1) % n], piece.material)?;
            }
        }
        Ok(registry)
    }

    /// Current terrain by value, in placement order.
    pub fn snapshot(&self, physics: &Physics) -> Vec<TerrainData> {
        self.terrain
            .iter()
            .filter_map(|piece| {
                physics.query_vertices(piece.handle).map(|vertices| TerrainData {
                    vertices,
                    material: piece.material,
                })
            })
            .collect()
    }

    pub fn scene(&self, physics: &Physics) -> Scene {
        Scene {
            brush: self.brush,
            terrain: self.snapshot(physics),
        }
    }

    /// Replace the world with `scene`. A scene with an invalid piece is
    /// rejected whole and the current world is left as it was.
    pub fn restore(&mut self, physics: &mut Physics, scene: Scene) -> Result<()> {
        for data in &scene.terrain {
            check_polygon(&data.vertices)?;
        }
        self.clear(physics);
        self.brush = scene.brush;
        for data in scene.terrain {
            self.append(physics, data)?;
        }
        Ok(())
    }
}

/// Pending clicks for the next triangle.
#[derive(Debug, Default, Clone)]
pub struct Placement {
    pending: SmallVec<[Vec2; TERRAIN_MAX_VERTS]>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Vec2] {
        &self.pending
    }

    /// Record a click. The click that fills the polygon returns it with `brush`
    /// and starts a fresh one.
    pub fn push(&mut self, point: Vec2, brush: Material) -> Option<TerrainData> {
        self.pending.push(point);
        if self.pending.len() < TERRAIN_MAX_VERTS {
            return None;
        }
        let vertices = std::mem::take(&mut self.pending);
        Some(TerrainData {
            vertices,
            material: brush,
        })
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MaterialKind;
    use glam::Vec3;

    fn tri(offset: f32) -> [Vec2; 3] {
        [
            Vec2::new(offset, offset),
            Vec2::new(offset + 10.0, offset),
            Vec2::new(offset, offset + 10.0),
        ]
    }

    #[test]
    fn test_stage_emits_closed_edges() {
        let mut physics = Physics::default();
        let mut world = World::new();
        let material = Material::reflective(Vec3::new(0.5, 0.5, 0.5));
        world.append(&mut physics, TerrainData::new(&tri(0.0), material)).unwrap();

        let registry = world.stage_shapes(&physics).unwrap();
        let shapes: Vec<_> = registry.iter().collect();
        assert_eq!(shapes.len(), 3);
        let t = tri(0.0);
        assert_eq!((shapes[0].a, shapes[0].b), (t[0], t[1]));
        assert_eq!((shapes[1].a, shapes[1].b), (t[1], t[2]));
        assert_eq!((shapes[2].a, shapes[2].b), (t[2], t[0]));
        assert!(shapes.iter().all(|s| s.material == material));
    }

    #[test]
    fn test_stage_follows_terrain_order() {
        let mut physics = Physics::default();
        let mut world = World::new();
        world
            .append(&mut physics, TerrainData::new(&tri(0.0), Material::default()))
            .unwrap();
        world
            .append(&mut physics, TerrainData::new(&tri(50.0), Material::emissive(Vec3::X)))
            .unwrap();

        let registry = world.stage_shapes(&physics).unwrap();
        let kinds: Vec<_> = registry.iter().map(|s| s.material.kind).collect();
        assert_eq!(kinds[..3], [MaterialKind::Diffuse; 3]);
        assert_eq!(kinds[3..], [MaterialKind::Emissive; 3]);
    }

    #[test]
    fn test_clear_empties_world_and_physics() {
        let mut physics = Physics::default();
        let mut world = World::new();
        world
            .append(&mut physics, TerrainData::new(&tri(0.0), Material::default()))
            .unwrap();
        world.clear(&mut physics);
        assert!(world.is_empty());
        assert_eq!(physics.terrain_count(), 0);
        assert!(world.stage_shapes(&physics).unwrap().is_empty());
    }

    #[test]
    fn test_placement_closes_on_third_click() {
        let mut placement = Placement::new();
        let brush = Material::emissive(Vec3::new(1.0, 0.0, 0.0));
        assert!(placement.push(Vec2::new(1.0, 1.0), brush).is_none());
        assert!(placement.push(Vec2::new(2.0, 1.0), brush).is_none());
        assert_eq!(placement.pending().len(), 2);

        let data = placement.push(Vec2::new(1.0, 2.0), brush).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.material, brush);
        assert!(placement.pending().is_empty());
    }

    #[test]
    fn test_invalid_polygon_not_recorded() {
        let mut physics = Physics::default();
        let mut world = World::new();
        let data = TerrainData::new(&tri(0.0)[..2], Material::default());
        assert!(world.append(&mut physics, data).is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn test_rejected_restore_keeps_world() {
        let mut physics = Physics::default();
        let mut world = World::new();
        world
            .append(&mut physics, TerrainData::new(&tri(0.0), Material::default()))
            .unwrap();
        let before = world.scene(&physics);

        let scene = Scene {
            brush: Material::emissive(Vec3::ONE),
            terrain: vec![
                TerrainData::new(&tri(5.0), Material::default()),
                TerrainData::new(&tri(9.0)[..2], Material::default()),
            ],
        };
        let err = world.restore(&mut physics, scene).unwrap_err();
        assert!(matches!(err, crate::util::Error::InvalidPolygon { count: 2 }));
        assert_eq!(world.scene(&physics), before);
        assert_eq!(physics.terrain_count(), 1);
    }

    #[test]
    fn test_restore_replaces_scene() {
        let mut physics = Physics::default();
        let mut world = World::new();
        world
            .append(&mut physics, TerrainData::new(&tri(0.0), Material::default()))
            .unwrap();
        let scene = Scene {
            brush: Material::emissive(Vec3::ONE),
            terrain: vec![
                TerrainData::new(&tri(5.0), Material::reflective(Vec3::ONE)),
                TerrainData::new(&tri(20.0), Material::default()),
            ],
        };
        world.restore(&mut physics, scene.clone()).unwrap();
        assert_eq!(world.scene(&physics), scene);
        assert_eq!(physics.terrain_count(), 2);
    }
}
