//! Progressive light-accumulation pipeline.
//!
//! ## Architecture
//! ```text
//! terrain → ShapeRegistry (CPU, ≤512 segments) → TraceState::sync_shapes
//!         → TracePass (reads buffer n % 2, writes the other) → advance()
//!         → PresentPass (tone map buffer current_index()) → egui overlay
//! ```
//!
//! The registry, accumulation bookkeeping and invalidation rules are plain
//! CPU code; the passes themselves need the `viewer` feature.

pub mod accumulation;
pub mod params;
pub mod registry;
pub mod shape;
pub mod state;

#[cfg(feature = "viewer")]
pub mod present;
#[cfg(feature = "viewer")]
pub mod quad;
#[cfg(feature = "viewer")]
mod renderer;
#[cfg(feature = "viewer")]
pub mod shaders;
#[cfg(feature = "viewer")]
pub mod targets;
#[cfg(feature = "viewer")]
pub mod trace;

pub use accumulation::AccumulationState;
pub use params::{FrameParams, ShapeBlock, SHAPE_CAPACITY};
pub use registry::ShapeRegistry;
pub use shape::{Material, MaterialKind, Shape};
pub use state::TraceState;

#[cfg(feature = "viewer")]
pub use renderer::{Renderer, RendererConfig};
#[cfg(feature = "viewer")]
pub use trace::TraceQuality;
