//! Path queries against a rasterized surface grid

use crate::search::{astar, Heuristic, SearchOptions};
use crate::simplify::simplify_path;
use glam::Vec3;
use navgrid::{
    DiagonalMovement, Graph, GridCoord, OccupancyGrid, RasterConfig, Surface, SurfaceRasterizer,
};
use navgrid_common::{distance_squared, lerp};

/// Owns one occupancy grid and the graph built over it
#[derive(Debug, Clone)]
pub struct GridPathfinder {
    config: RasterConfig,
    grid: OccupancyGrid,
    graph: Graph,
}

impl GridPathfinder {
    /// Creates an unfilled pathfinder; `size` is truncated to the grid resolution
    pub fn new(size: f32) -> Self {
        Self::with_config(RasterConfig::new(size))
    }

    pub fn with_config(config: RasterConfig) -> Self {
        let grid = OccupancyGrid::new(config.grid_size);
        let graph = Graph::build(&grid, DiagonalMovement::Always);
        Self {
            config,
            grid,
            graph,
        }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Rasterizes the surfaces and rebuilds the graph from scratch.
    ///
    /// `None` overrides fall back to the default ray height and length.
    pub fn fill<'a, I>(&mut self, surfaces: I, ray_height: Option<f32>, ray_length: Option<f32>)
    where
        I: IntoIterator<Item = &'a mut Surface>,
    {
        self.config = self
            .config
            .with_ray_height(ray_height)
            .with_ray_length(ray_length);

        self.grid = SurfaceRasterizer::new(self.config).rasterize(surfaces);
        self.graph = Graph::build(&self.grid, DiagonalMovement::Always);
    }

    /// Finds a path between two world points.
    ///
    /// Both points must coincide in X and Z with a grid sample. The search
    /// runs from `to` back toward `from`, so when `from` is unreachable the
    /// path starts at the reachable cell closest to it and still ends at
    /// `to`. Heights are interpolated between `from.y` and `to.y` instead of
    /// taken from the samples.
    pub fn from_to(&self, from: Vec3, to: Vec3, optimize: bool) -> Option<Vec<Vec3>> {
        let Some(from_index) = self.sample_index(from) else {
            log::debug!("No grid sample at start point {:?}", from);
            return None;
        };
        let Some(to_index) = self.sample_index(to) else {
            log::debug!("No grid sample at end point {:?}", to);
            return None;
        };

        let (width, height) = (self.grid.width(), self.grid.height());
        let start = GridCoord::from_index(to_index, width, height);
        let goal = GridCoord::from_index(from_index, width, height);

        let options = SearchOptions::default()
            .with_heuristic(Heuristic::Octile)
            .with_closest(true);
        let nodes = astar(
            &self.graph,
            self.graph.node_id(start)?,
            self.graph.node_id(goal)?,
            &options,
        )?;

        if nodes.len() < 2 {
            return None;
        }

        let mut path: Vec<GridCoord> = nodes.iter().map(|&id| self.graph.node(id).coord).collect();
        if optimize {
            simplify_path(&mut path);
        }

        let mut points = path_to_points(&path, |coord| self.grid.sample_at(coord), from.y, to.y)?;
        points.reverse();
        Some(points)
    }

    /// Nearest sample to `point` by 3D distance, at the query's own height.
    ///
    /// Returns `None` when the grid holds no sample.
    pub fn find_nearest_point(&self, point: Vec3) -> Option<Vec3> {
        self.grid
            .samples()
            .iter()
            .flatten()
            .fold(None, |best: Option<(Vec3, f32)>, sample| {
                let d = distance_squared(sample, &point);
                match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((*sample, d)),
                }
            })
            .map(|(sample, _)| Vec3::new(sample.x, point.y, sample.z))
    }

    /// First sample index whose X and Z equal the point's exactly
    fn sample_index(&self, point: Vec3) -> Option<usize> {
        self.grid
            .samples()
            .iter()
            .position(|s| s.is_some_and(|s| s.x == point.x && s.z == point.z))
    }
}

/// Maps a cell path to world points.
///
/// Point `i` takes its X and Z from the cell sample and its height from
/// `lerp(from_y, to_y, i / path.len())`. Fails as a whole if any cell
/// lacks a sample.
pub fn path_to_points<F>(path: &[GridCoord], sample_of: F, from_y: f32, to_y: f32) -> Option<Vec<Vec3>>
where
    F: Fn(GridCoord) -> Option<Vec3>,
{
    let len = path.len() as f32;
    path.iter()
        .enumerate()
        .map(|(i, &coord)| {
            let sample = sample_of(coord)?;
            Some(Vec3::new(sample.x, lerp(from_y, to_y, i as f32 / len), sample.z))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgrid::MeshSurface;
    use navgrid_common::TriMesh;

    fn plane(name: &str, min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Surface {
        MeshSurface::new(name, TriMesh::quad_xz(min_x, min_z, max_x, max_z, 0.0)).into()
    }

    fn filled(size: f32, surfaces: &mut [Surface]) -> GridPathfinder {
        let mut pathfinder = GridPathfinder::new(size);
        pathfinder.fill(surfaces.iter_mut(), None, None);
        pathfinder
    }

    #[test]
    fn test_new_is_empty_and_queryable() {
        let pathfinder = GridPathfinder::new(10.0);
        assert_eq!(pathfinder.width(), 10);
        assert_eq!(pathfinder.grid().occupied_count(), 0);
        assert_eq!(pathfinder.from_to(Vec3::ZERO, Vec3::ONE, false), None);
        assert_eq!(pathfinder.find_nearest_point(Vec3::ZERO), None);
    }

    #[test]
    fn test_non_positive_size_gives_empty_grid() {
        for size in [0.0, -3.0, f32::NAN] {
            let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
            let pathfinder = filled(size, &mut surfaces);
            assert!(pathfinder.grid().is_empty());
            assert_eq!(pathfinder.from_to(Vec3::ZERO, Vec3::ONE, true), None);
        }
    }

    #[test]
    fn test_fill_rebuilds_wholesale() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let mut pathfinder = filled(4.0, &mut surfaces);
        assert_eq!(pathfinder.graph().walkable_count(), 16);

        let mut nothing: Vec<Surface> = Vec::new();
        pathfinder.fill(nothing.iter_mut(), None, None);
        assert_eq!(pathfinder.grid().occupied_count(), 0);
        assert_eq!(pathfinder.graph().walkable_count(), 0);
    }

    #[test]
    fn test_fill_keeps_ray_overrides() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let mut pathfinder = GridPathfinder::new(4.0);
        pathfinder.fill(surfaces.iter_mut(), Some(2.0), Some(1.0));
        assert_eq!(pathfinder.config().ray_height(), 2.0);
        assert_eq!(pathfinder.config().ray_length(), 1.0);
        assert_eq!(pathfinder.grid().occupied_count(), 0);
    }

    #[test]
    fn test_from_to_runs_from_start_to_end() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let pathfinder = filled(4.0, &mut surfaces);

        let from = Vec3::new(0.0, 0.0, 0.0);
        let to = Vec3::new(3.0, 0.0, 0.0);
        let path = pathfinder.from_to(from, to, false).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!((path[0].x, path[0].z), (0.0, 0.0));
        assert_eq!((path[3].x, path[3].z), (3.0, 0.0));

        let back = pathfinder.from_to(to, from, false).unwrap();
        assert_eq!((back[0].x, back[0].z), (3.0, 0.0));
        assert_eq!((back[3].x, back[3].z), (0.0, 0.0));
    }

    #[test]
    fn test_unresolved_endpoint() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let pathfinder = filled(4.0, &mut surfaces);
        assert_eq!(pathfinder.from_to(Vec3::new(0.5, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), false), None);
        assert_eq!(pathfinder.from_to(Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0), false), None);
    }

    #[test]
    fn test_same_cell_is_no_path() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let pathfinder = filled(4.0, &mut surfaces);
        let point = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(pathfinder.from_to(point, point, false), None);
    }

    #[test]
    fn test_optimize_removes_midpoints_from_far_end() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 8.0, 8.0)];
        let pathfinder = filled(8.0, &mut surfaces);
        let path = pathfinder
            .from_to(Vec3::new(0.0, 0.0, 2.0), Vec3::new(7.0, 0.0, 2.0), true)
            .unwrap();
        let xz: Vec<(f32, f32)> = path.iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(xz, vec![(0.0, 2.0), (4.0, 2.0), (6.0, 2.0), (7.0, 2.0)]);
    }

    #[test]
    fn test_path_to_points_interpolates_height() {
        let path = [GridCoord::new(0, 0), GridCoord::new(1, 0), GridCoord::new(2, 0)];
        let points =
            path_to_points(&path, |c| Some(Vec3::new(c.x as f32, -4.0, c.y as f32)), 0.0, 10.0).unwrap();
        for (i, point) in points.iter().enumerate() {
            assert!((point.y - lerp(0.0, 10.0, i as f32 / 3.0)).abs() < 1e-5);
            assert_eq!(point.x, i as f32);
        }
    }

    #[test]
    fn test_path_to_points_fails_on_missing_sample() {
        let path = [GridCoord::new(0, 0), GridCoord::new(1, 0)];
        let points = path_to_points(
            &path,
            |c| (c.x == 0).then_some(Vec3::ZERO),
            0.0,
            1.0,
        );
        assert_eq!(points, None);
    }

    #[test]
    fn test_find_nearest_point_uses_query_height() {
        let mut surfaces = vec![plane("plane", 0.0, 0.0, 4.0, 4.0)];
        let pathfinder = filled(4.0, &mut surfaces);
        let nearest = pathfinder.find_nearest_point(Vec3::new(2.2, 5.0, 0.9)).unwrap();
        assert_eq!(nearest, Vec3::new(2.0, 5.0, 1.0));
    }
}
