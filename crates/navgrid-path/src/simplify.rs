//! Removal of exactly interpolatable waypoints

use glam::Vec3;
use navgrid::GridCoord;

/// A path point that can tell whether it lies exactly halfway between two others
pub trait Waypoint: Copy + PartialEq {
    fn is_midpoint_of(&self, first: &Self, last: &Self) -> bool;
}

impl Waypoint for GridCoord {
    fn is_midpoint_of(&self, first: &Self, last: &Self) -> bool {
        first.x + last.x == 2 * self.x && first.y + last.y == 2 * self.y
    }
}

impl Waypoint for Vec3 {
    fn is_midpoint_of(&self, first: &Self, last: &Self) -> bool {
        (*first + *last) * 0.5 == *self
    }
}

/// Collapses redundant middle points in place.
///
/// Triples are visited from the end toward the start. At each index the
/// middle point is dropped while it coincides with both neighbors or sits
/// exactly at their midpoint, and at least three points remain from that
/// index. Equality is exact; near-collinear points are kept.
pub fn simplify_path<P: Waypoint>(path: &mut Vec<P>) {
    if path.len() < 3 {
        return;
    }

    for i in (0..=path.len() - 3).rev() {
        while i + 2 < path.len() {
            let (first, middle, last) = (path[i], path[i + 1], path[i + 2]);
            let degenerate = first == middle && middle == last;
            if degenerate || middle.is_midpoint_of(&first, &last) {
                path.remove(i + 1);
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(points: &[(usize, usize)]) -> Vec<GridCoord> {
        points.iter().map(|&(x, y)| GridCoord::new(x, y)).collect()
    }

    #[test]
    fn test_collapses_evenly_spaced_points() {
        let mut path = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 2.0),
        ];
        simplify_path(&mut path);
        assert_eq!(path, vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0)]);
    }

    #[test]
    fn test_keeps_non_collinear_points() {
        let mut path = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let before = path.clone();
        simplify_path(&mut path);
        assert_eq!(path, before);
    }

    #[test]
    fn test_straight_run_collapses_to_endpoints() {
        let mut path = coords(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        simplify_path(&mut path);
        assert_eq!(path, coords(&[(0, 0), (4, 0)]));
    }

    #[test]
    fn test_eight_point_run_keeps_chained_points() {
        // Only runs of 2^k + 1 points collapse to their endpoints
        let mut path = coords(&[(7, 0), (6, 0), (5, 0), (4, 0), (3, 0), (2, 0), (1, 0), (0, 0)]);
        simplify_path(&mut path);
        assert_eq!(path, coords(&[(7, 0), (6, 0), (4, 0), (0, 0)]));

        let mut forward: Vec<GridCoord> = (0..8).map(|x| GridCoord::new(x, 0)).collect();
        simplify_path(&mut forward);
        assert_eq!(forward, coords(&[(0, 0), (1, 0), (3, 0), (7, 0)]));
    }

    #[test]
    fn test_only_exact_midpoints_are_removed() {
        // (0,0) (1,0) (3,0): collinear but (1,0) is not the midpoint
        let mut path = coords(&[(0, 0), (1, 0), (3, 0)]);
        simplify_path(&mut path);
        assert_eq!(path, coords(&[(0, 0), (1, 0), (3, 0)]));
    }

    #[test]
    fn test_corner_is_kept() {
        let mut path = coords(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        simplify_path(&mut path);
        assert_eq!(path, coords(&[(0, 0), (2, 0), (2, 2)]));
    }

    #[test]
    fn test_coincident_points_collapse() {
        let mut path = vec![Vec3::ONE, Vec3::ONE, Vec3::ONE, Vec3::ONE];
        simplify_path(&mut path);
        assert_eq!(path, vec![Vec3::ONE, Vec3::ONE]);
    }

    #[test]
    fn test_short_paths_untouched() {
        let mut empty: Vec<GridCoord> = Vec::new();
        simplify_path(&mut empty);
        assert!(empty.is_empty());

        let mut pair = coords(&[(0, 0), (1, 1)]);
        simplify_path(&mut pair);
        assert_eq!(pair, coords(&[(0, 0), (1, 1)]));
    }
}
