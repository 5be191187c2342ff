//! Axis-aligned bounding boxes and multi-box aggregation

use crate::{vmax, vmin};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world or local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point cloud, or `None` if there are no points
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| {
            Self::new(vmin(&acc.min, p), vmax(&acc.max, p))
        }))
    }

    /// Midpoint of the box
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box along each axis
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Transforms the box corners and re-fits an axis-aligned box around them
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        // corners is never empty
        Self::from_points(corners.iter()).unwrap_or(*self)
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(vmin(&self.min, &other.min), vmax(&self.max, &other.max))
    }
}

/// Combined bounds of a set of surfaces
///
/// `center` is the arithmetic mean of each input box center, not the center
/// of `bounds`. The two only agree for a single box or symmetric layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateBounds {
    pub bounds: Aabb,
    pub center: Vec3,
}

impl AggregateBounds {
    /// Folds per-surface boxes into a combined box and an averaged center.
    ///
    /// Returns `None` for an empty input.
    pub fn from_boxes(boxes: &[Aabb]) -> Option<Self> {
        let (first, rest) = boxes.split_first()?;
        let (bounds, center_sum) = rest
            .iter()
            .fold((*first, first.center()), |(acc, sum), b| {
                (acc.union(b), sum + b.center())
            });

        Some(Self {
            bounds,
            center: center_sum / boxes.len() as f32,
        })
    }
}
