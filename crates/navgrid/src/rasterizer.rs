//! Vertical ray-cast rasterization of surfaces into an occupancy grid
//!
//! Rays start above the combined bounds of all cast surfaces and point
//! straight down. Each grid cell gets one ray; the nearest hit across all
//! surfaces becomes the cell's sample.

use crate::config::RasterConfig;
use crate::grid::{GridCoord, OccupancyGrid};
use crate::surface::{CastSurface, Surface};
use glam::{DVec3, Vec3};
use navgrid_common::{AggregateBounds, Aabb, Ray};

/// Rasterizes cast surfaces into an [`OccupancyGrid`]
#[derive(Debug, Clone)]
pub struct SurfaceRasterizer {
    config: RasterConfig,
}

impl SurfaceRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Casts `grid_size²` rays against the given surfaces.
    ///
    /// Nodes without geometry are ignored. World matrices of the cast
    /// surfaces are refreshed first, so their cached bounds are current
    /// afterwards. An empty or geometry-less input yields an unoccupied grid.
    pub fn rasterize<'a, I>(&self, surfaces: I) -> OccupancyGrid
    where
        I: IntoIterator<Item = &'a mut Surface>,
    {
        let size = self.config.grid_size;
        let mut grid = OccupancyGrid::new(size);

        let mut targets: Vec<&mut dyn CastSurface> = surfaces
            .into_iter()
            .filter_map(Surface::as_cast_surface_mut)
            .collect();

        for target in targets.iter_mut() {
            target.refresh_world_matrix();
        }

        let boxes: Vec<Aabb> = targets.iter().filter_map(|t| t.world_bounds()).collect();

        let Some(aggregate) = AggregateBounds::from_boxes(&boxes) else {
            log::debug!("No cast surface with geometry, grid left empty");
            return grid;
        };

        // Origin and offsets are accumulated in f64 and narrowed per ray
        let extents = aggregate.bounds.extents().as_dvec3();
        let center = aggregate.center.as_dvec3();
        let origin = DVec3::new(
            center.x - extents.x * 0.5,
            f64::from(aggregate.bounds.max.y),
            center.z - extents.z * 0.5,
        );
        let ray_height = f64::from(self.config.ray_height());
        let ray_length = self.config.ray_length();

        log::debug!(
            "Rasterizing {} surfaces into {}x{} grid (origin {:?}, extents {:?})",
            targets.len(),
            size,
            size,
            origin,
            extents
        );

        for x in 0..size {
            for y in 0..size {
                let offset = DVec3::new(
                    (x as f64 / size as f64) * extents.x,
                    ray_height,
                    (y as f64 / size as f64) * extents.z,
                );
                let ray = Ray::downward((origin + offset).as_vec3(), ray_length);
                grid.record(GridCoord::new(x, y), pick(&targets, &ray));
            }
        }

        log::info!(
            "Rasterized {}x{} grid: {} of {} cells traversable",
            size,
            size,
            grid.occupied_count(),
            grid.len()
        );

        grid
    }
}

/// Nearest picked point along the ray across all targets
fn pick(targets: &[&mut dyn CastSurface], ray: &Ray) -> Option<Vec3> {
    targets
        .iter()
        .filter_map(|t| t.intersect_ray(ray))
        .min_by(f32::total_cmp)
        .map(|t| ray.at(t))
}
