//! Error types for the light sandbox.

use thiserror::Error;

/// Main error type for scene, persistence and GPU setup operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The scene has more segments than the GPU parameter block can hold
    #[error("max shape count exceeded (capacity: {capacity})")]
    CapacityExceeded { capacity: usize },

    /// Terrain polygon with an unsupported vertex count
    #[error("terrain polygon must have exactly 3 vertices, got {count}")]
    InvalidPolygon { count: usize },

    /// Render targets or other device resources could not be created
    #[error("failed to acquire GPU resources: {0}")]
    ResourceAcquisition(String),

    /// Malformed record in a saved scene file
    #[error("invalid scene record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

}

impl Error {
    /// Create a resource acquisition error.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    /// Create an invalid record error.
    pub fn record(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord { index, reason: reason.into() }
    }
}

/// Result type alias for sandbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Report an unrecoverable error and terminate the process.
///
/// Capacity and resource failures are configuration limits, not transient
/// conditions, so there is nothing to retry.
pub fn fatal(err: &Error) -> ! {
    tracing::error!("fatal: {err}");
    eprintln!("{err}");
    std::process::exit(1);
}
