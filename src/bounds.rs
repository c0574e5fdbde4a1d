//! Axis-aligned bounding boxes of control polygons.

use num_traits::Float;

/// Classification of how two axis-aligned boxes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxOverlap {
    /// The overlap has positive area on both axes.
    Intersection,
    /// The boxes touch along an edge or at a corner; the overlap has
    /// zero area on at least one axis.
    Tangent,
    /// The boxes are strictly separated on at least one axis.
    Disjoint,
}

/// A planar axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2<F> {
    /// Minimum corner (smallest x and y values).
    pub min: [F; 2],
    /// Maximum corner (largest x and y values).
    pub max: [F; 2],
}

impl<F: Float> Aabb2<F> {
    /// Computes the box of a planar control polygon in column-major
    /// storage (length `2 * N`, at least one point).
    pub fn of_polygon(nodes: &[F]) -> Self {
        let mut min = [nodes[0], nodes[1]];
        let mut max = min;
        for point in nodes.chunks_exact(2).skip(1) {
            for axis in 0..2 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
        Self { min, max }
    }

    /// Classifies the overlap of two boxes.
    ///
    /// The zero-width comparisons are exact by design: a shared edge or
    /// corner is a touch, not a crossing, and must not be absorbed into
    /// either neighboring class by a tolerance.
    pub fn classify(&self, other: &Self) -> BoxOverlap {
        for axis in 0..2 {
            if self.max[axis] < other.min[axis] || other.max[axis] < self.min[axis] {
                return BoxOverlap::Disjoint;
            }
        }
        for axis in 0..2 {
            if self.max[axis] == other.min[axis] || other.max[axis] == self.min[axis] {
                return BoxOverlap::Tangent;
            }
        }
        BoxOverlap::Intersection
    }

    /// Returns `true` if the box contains the given point (boundary
    /// included).
    #[inline]
    pub fn contains(&self, point: [F; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

/// Returns `true` when `point` lies inside the axis-aligned box of an
/// n-dimensional control polygon (boundary included).
///
/// `nodes` is column-major with `dimension` coordinates per point;
/// `point` has `dimension` entries.
pub fn contains_nd<F: Float>(dimension: usize, nodes: &[F], point: &[F]) -> bool {
    for k in 0..dimension {
        let mut lo = nodes[k];
        let mut hi = nodes[k];
        for chunk in nodes.chunks_exact(dimension).skip(1) {
            lo = lo.min(chunk[k]);
            hi = hi.max(chunk[k]);
        }
        if point[k] < lo || point[k] > hi {
            return false;
        }
    }
    true
}
