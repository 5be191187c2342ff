//! Grid path finding over rasterized surfaces
//!
//! [`GridPathfinder`] owns an occupancy grid and its graph. It maps world
//! points to cells, runs A* between them and turns the result back into
//! world waypoints, optionally simplified and wrapped into a keyframe track.
//!
//! ```
//! use glam::Vec3;
//! use navgrid::{MeshSurface, Surface};
//! use navgrid_common::TriMesh;
//! use navgrid_path::GridPathfinder;
//!
//! let mut surfaces: Vec<Surface> =
//!     vec![MeshSurface::new("ground", TriMesh::quad_xz(0.0, 0.0, 8.0, 8.0, 0.0)).into()];
//!
//! let mut pathfinder = GridPathfinder::new(8.0);
//! pathfinder.fill(surfaces.iter_mut(), None, None);
//!
//! // Midpoints are removed in place from the far end, leaving x = 0, 4, 6, 7
//! let path = pathfinder.from_to(Vec3::new(0.0, 0.0, 0.0), Vec3::new(7.0, 0.0, 0.0), true);
//! assert_eq!(path.map(|p| p.len()), Some(4));
//! ```

mod animation;
mod pathfinder;
mod record;
mod search;
mod simplify;

pub use animation::{
    create_animation, Keyframe, KeyframeTrack, LoopMode, DEFAULT_FRAMES_PER_SECOND,
    POSITION_PROPERTY,
};
pub use pathfinder::{path_to_points, GridPathfinder};
pub use record::{
    records_from_metadata, write_records_to_metadata, PathFinderRecord, DEFAULT_RECORD_NAME,
    METADATA_KEY,
};
pub use search::{astar, Heuristic, SearchOptions};
pub use simplify::{simplify_path, Waypoint};
