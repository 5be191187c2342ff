//! Surface rasterization for grid path finding
//!
//! Turns arbitrary 3D surfaces into a square 2D traversability grid by casting
//! one vertical ray per cell, then builds an 8-connected graph over it. The
//! grid keeps each cell's picked world point so paths found on the graph can
//! be mapped back to 3D.

mod config;
mod graph;
mod grid;
mod rasterizer;
mod surface;

pub use config::{RasterConfig, DEFAULT_GRID_SIZE, DEFAULT_RAY_HEIGHT, DEFAULT_RAY_LENGTH};
pub use graph::{DiagonalMovement, Edge, Graph, GraphNode, NodeId};
pub use grid::{GridCoord, OccupancyGrid};
pub use rasterizer::SurfaceRasterizer;
pub use surface::{CastSurface, InstancedMeshSurface, MeshSurface, Scene, Surface, Transform};
