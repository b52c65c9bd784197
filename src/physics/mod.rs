//! Rigid-body space holding terrain as fixed colliders.
//!
//! Terrain never moves once placed, so every piece is a parentless collider.
//! The space is still stepped each frame so dynamic bodies added later see
//! the same fixed clock.

use glam::Vec2;
use rapier2d::prelude::*;
use smallvec::SmallVec;

use crate::util::{Error, Result};

/// Vertex cap for a terrain polygon.
pub const TERRAIN_MAX_VERTS: usize = 3;

/// Polygon outline as returned by [`Physics::query_vertices`].
pub type Vertices = SmallVec<[Vec2; TERRAIN_MAX_VERTS]>;

/// Weak reference to a terrain collider.
///
/// Resolves through [`Physics::query_vertices`]; after
/// [`Physics::remove_all_static_polygons`] old handles resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerrainHandle(ColliderHandle);

/// Whether `vertices` can become a terrain collider.
pub fn check_polygon(vertices: &[Vec2]) -> Result<()> {
    if vertices.len() == TERRAIN_MAX_VERTS {
        Ok(())
    } else {
        Err(Error::InvalidPolygon { count: vertices.len() })
    }
}

pub struct Physics {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    terrain: Vec<ColliderHandle>,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, 10.0), 100)
    }
}

impl Physics {
    /// New space with `gravity` stepped at `hz` ticks per second.
    pub fn new(gravity: Vec2, hz: u32) -> Self {
        let hz = hz.max(1);
        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters {
                dt: 1.0 / hz as Real,
                ..IntegrationParameters::default()
            },
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: vector![gravity.x, gravity.y],
            terrain: Vec::new(),
        }
    }

    /// Fixed timestep in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn terrain_count(&self) -> usize {
        self.terrain.len()
    }

    /// Insert a fixed polygon collider.
    pub fn append_static_polygon(&mut self, vertices: &[Vec2]) -> Result<TerrainHandle> {
        check_polygon(vertices)?;
        let &[a, b, c] = vertices else {
            return Err(Error::InvalidPolygon { count: vertices.len() });
        };

        let collider = ColliderBuilder::triangle(point![a.x, a.y], point![b.x, b.y], point![c.x, c.y])
            .build();
        let handle = self.colliders.insert(collider);
        self.terrain.push(handle);

        tracing::trace!(?handle, "terrain collider added");
        Ok(TerrainHandle(handle))
    }

    /// Remove every terrain collider. Outstanding handles become stale.
    pub fn remove_all_static_polygons(&mut self) {
        let count = self.terrain.len();
        while let Some(handle) = self.terrain.pop() {
            self.colliders
                .remove(handle, &mut self.islands, &mut self.bodies, false);
        }
        tracing::debug!(count, "terrain colliders removed");
    }

    /// Current world-space outline of a terrain piece, in insertion order.
    pub fn query_vertices(&self, handle: TerrainHandle) -> Option<Vertices> {
        let collider = self.colliders.get(handle.0)?;
        let triangle = collider.shape().as_triangle()?;
        let position = collider.position();
        Some(
            [triangle.a, triangle.b, triangle.c]
                .into_iter()
                .map(|p| {
                    let p = position * p;
                    Vec2::new(p.x, p.y)
                })
                .collect(),
        )
    }

    /// Advance the simulation by one fixed tick.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> [Vec2; 3] {
        [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]
    }

    #[test]
    fn test_query_returns_inserted_vertices() {
        let mut physics = Physics::default();
        let handle = physics.append_static_polygon(&triangle()).unwrap();
        let verts = physics.query_vertices(handle).unwrap();
        assert_eq!(verts.as_slice(), &triangle());
    }

    #[test]
    fn test_vertices_survive_steps() {
        let mut physics = Physics::default();
        let handle = physics.append_static_polygon(&triangle()).unwrap();
        for _ in 0..20 {
            physics.step();
        }
        assert_eq!(physics.query_vertices(handle).unwrap().as_slice(), &triangle());
    }

    #[test]
    fn test_rejects_wrong_vertex_count() {
        let mut physics = Physics::default();
        let err = physics.append_static_polygon(&triangle()[..2]).unwrap_err();
        assert!(matches!(err, Error::InvalidPolygon { count: 2 }));
        let four = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!(physics.append_static_polygon(&four).is_err());
        assert_eq!(physics.terrain_count(), 0);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut physics = Physics::default();
        let handle = physics.append_static_polygon(&triangle()).unwrap();
        physics.remove_all_static_polygons();
        assert_eq!(physics.terrain_count(), 0);
        assert!(physics.query_vertices(handle).is_none());

        // A fresh insert must not revive the stale handle.
        let fresh = physics.append_static_polygon(&triangle()).unwrap();
        assert_ne!(fresh, handle);
        assert!(physics.query_vertices(handle).is_none());
    }

    #[test]
    fn test_timestep_from_rate() {
        let physics = Physics::new(Vec2::new(0.0, 10.0), 100);
        assert!((physics.timestep() - 0.01).abs() < 1e-6);
    }
}
