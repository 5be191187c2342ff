//! Configuration for a rasterization pass

use navgrid_common::truncate_size;
use serde::{Deserialize, Serialize};

/// Height above the combined surface bounds from which rays start
pub const DEFAULT_RAY_HEIGHT: f32 = 10.0;
/// Maximum ray travel distance
pub const DEFAULT_RAY_LENGTH: f32 = 100.0;
/// Grid resolution used by the editor for new configurations
pub const DEFAULT_GRID_SIZE: usize = 100;

/// Parameters for one rasterization pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Grid resolution; the grid is `grid_size × grid_size`
    pub grid_size: usize,
    /// Ray start height above the top of the combined bounds
    pub ray_height: Option<f32>,
    /// Maximum ray distance
    pub ray_length: Option<f32>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            ray_height: None,
            ray_length: None,
        }
    }
}

impl RasterConfig {
    /// Creates a configuration for a square grid of the given size.
    ///
    /// The size is truncated; negative or NaN sizes give an empty grid.
    pub fn new(size: f32) -> Self {
        Self {
            grid_size: truncate_size(size),
            ..Default::default()
        }
    }

    pub fn with_ray_height(mut self, ray_height: Option<f32>) -> Self {
        self.ray_height = ray_height;
        self
    }

    pub fn with_ray_length(mut self, ray_length: Option<f32>) -> Self {
        self.ray_length = ray_length;
        self
    }

    /// Effective ray height
    pub fn ray_height(&self) -> f32 {
        self.ray_height.unwrap_or(DEFAULT_RAY_HEIGHT)
    }

    /// Effective ray length
    pub fn ray_length(&self) -> f32 {
        self.ray_length.unwrap_or(DEFAULT_RAY_LENGTH)
    }
}
