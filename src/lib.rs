//! # lumen2d
//!
//! Interactive 2D light-transport sandbox. Triangular terrain pieces are
//! drawn with the pointer, each with a diffuse, reflective or emissive
//! material, and a GPU tracer refines a global-illumination estimate over the
//! scene frame after frame.
//!
//! ## Modules
//!
//! - [`util`] - Errors, fatal-exit policy, projection helpers
//! - [`render`] - Shape registry, accumulation pair, trace and present passes
//! - [`physics`] - Rigid-body space holding terrain as fixed colliders
//! - [`world`] - Terrain list, brush, placement and the scene file format
//! - [`viewer`] - Window, HUD and overlay (enabled with the `viewer` feature)
//!
//! ## Example
//!
//! ```
//! use lumen2d::prelude::*;
//!
//! let mut physics = Physics::default();
//! let mut world = World::new();
//! let piece = TerrainData::new(
//!     &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
//!     Material::reflective(Vec3::ONE),
//! );
//! world.append(&mut physics, piece)?;
//!
//! let mut state = TraceState::new();
//! state.sync_shapes(world.stage_shapes(&physics)?);
//! assert_eq!(state.shapes().len(), 3);
//! # Ok::<(), lumen2d::Error>(())
//! ```

pub mod util;
pub mod render;
pub mod physics;
pub mod world;

// Sandbox window (optional, enabled with "viewer" feature)
#[cfg(feature = "viewer")]
pub mod viewer;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vec2, Vec3};
    pub use crate::render::{
        AccumulationState, Material, MaterialKind, Shape, ShapeRegistry, TraceState,
        SHAPE_CAPACITY,
    };
    pub use crate::physics::{Physics, TerrainHandle, TERRAIN_MAX_VERTS};
    pub use crate::world::{persist, Placement, Scene, SceneSlot, TerrainData, TerrainPiece, World};
}
