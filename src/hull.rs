//! Convex hulls of control polygons.
//!
//! The intersector prunes candidate pairs whose control-polygon hulls do
//! not overlap; a Bézier curve lies inside the hull of its control
//! points, so disjoint hulls prove disjoint arcs. The collision test is
//! conservative: touching hulls count as overlapping.

use num_traits::Float;

/// Computes the convex hull of a point set with Andrew's monotone chain.
///
/// Returns the hull vertices in counter-clockwise order, implicitly
/// closed. Collinear inputs collapse to the two extreme points; one- and
/// two-point inputs are returned as-is.
pub fn convex_hull<F: Float>(points: &[[F; 2]]) -> Vec<[F; 2]> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut sorted: Vec<[F; 2]> = points.to_vec();
    sorted.sort_by(|a, b| {
        a[0].partial_cmp(&b[0])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a[1].partial_cmp(&b[1]).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lower: Vec<[F; 2]> = Vec::new();
    for &p in &sorted {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= F::zero()
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<[F; 2]> = Vec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= F::zero()
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Returns `true` if the convex hulls of the two point sets overlap or
/// touch.
pub fn hulls_collide<F: Float>(first: &[[F; 2]], second: &[[F; 2]]) -> bool {
    let hull1 = convex_hull(first);
    let hull2 = convex_hull(second);

    if hull1.iter().any(|&p| hull_contains(&hull2, p)) {
        return true;
    }
    if hull2.iter().any(|&p| hull_contains(&hull1, p)) {
        return true;
    }
    // Neither hull owns a vertex of the other; any remaining overlap
    // must cross edges.
    for i in 0..hull1.len() {
        let a0 = hull1[i];
        let a1 = hull1[(i + 1) % hull1.len()];
        for j in 0..hull2.len() {
            let b0 = hull2[j];
            let b1 = hull2[(j + 1) % hull2.len()];
            if segments_touch(a0, a1, b0, b1) {
                return true;
            }
        }
    }
    false
}

/// Tests whether a point lies inside a convex hull (boundary included).
///
/// Hulls of fewer than three vertices degrade to the point and segment
/// cases.
fn hull_contains<F: Float>(hull: &[[F; 2]], point: [F; 2]) -> bool {
    match hull.len() {
        0 => false,
        1 => hull[0][0] == point[0] && hull[0][1] == point[1],
        2 => on_segment(hull[0], hull[1], point),
        _ => hull.iter().enumerate().all(|(i, &a)| {
            let b = hull[(i + 1) % hull.len()];
            cross(a, b, point) >= F::zero()
        }),
    }
}

/// Segment intersection predicate counting endpoint touches and
/// collinear overlap as contact.
fn segments_touch<F: Float>(a0: [F; 2], a1: [F; 2], b0: [F; 2], b1: [F; 2]) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);

    if ((d1 > F::zero() && d2 < F::zero()) || (d1 < F::zero() && d2 > F::zero()))
        && ((d3 > F::zero() && d4 < F::zero()) || (d3 < F::zero() && d4 > F::zero()))
    {
        return true;
    }
    (d1 == F::zero() && on_segment(b0, b1, a0))
        || (d2 == F::zero() && on_segment(b0, b1, a1))
        || (d3 == F::zero() && on_segment(a0, a1, b0))
        || (d4 == F::zero() && on_segment(a0, a1, b1))
}

/// For a point known to be collinear with the segment, checks that it
/// falls within the segment's extent.
fn on_segment<F: Float>(start: [F; 2], end: [F; 2], point: [F; 2]) -> bool {
    if cross(start, end, point) != F::zero() {
        return false;
    }
    point[0] >= start[0].min(end[0])
        && point[0] <= start[0].max(end[0])
        && point[1] >= start[1].min(end[1])
        && point[1] <= start[1].max(end[1])
}

/// Cross product of OA and OB; positive when counter-clockwise.
#[inline]
fn cross<F: Float>(o: [F; 2], a: [F; 2], b: [F; 2]) -> F {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}
