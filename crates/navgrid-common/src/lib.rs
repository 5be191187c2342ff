//! Common geometry and data structures shared by the surface rasterizer and the grid path finder

mod bounds;
mod math;
mod mesh;
mod vector;

pub use bounds::*;
pub use math::*;
pub use mesh::*;
pub use vector::*;

/// Represents a 3D position
pub type Vec3 = glam::Vec3;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for navgrid operations
pub type Result<T> = std::result::Result<T, Error>;
