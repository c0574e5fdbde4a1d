//! Point location on a curve by adaptive subdivision.

use crate::bounds::contains_nd;
use crate::curve::algebra::{evaluate_hodograph, evaluate_multi, subdivide_nodes};

/// Hard cap on bisection rounds; surviving intervals have width 2⁻²⁰.
const MAX_LOCATE_SUBDIVISIONS: usize = 20;

/// Standard-deviation cap on surviving parameters, 2⁻²⁰. A wider spread
/// means the query point sits on more than one arc of the curve.
const LOCATE_STD_CAP: f64 = 9.5367431640625e-7;

/// Where a query point sits relative to a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointLocation {
    /// The point lies on the curve at this parameter.
    OnCurve(f64),
    /// The point is provably not on the curve.
    Off,
    /// The point lies on multiple disjoint arcs of the curve, so no
    /// single parameter describes it.
    Ambiguous,
}

struct LocateCandidate {
    start: f64,
    end: f64,
    nodes: Vec<f64>,
}

/// Locates a point on a curve of any dimension.
///
/// Keeps a list of parameter intervals whose control-polygon bounding
/// boxes still contain the query point, bisecting each survivor per
/// round. After the rounds are exhausted the surviving interval
/// endpoints either cluster (their mean seeds one Newton step) or
/// spread out over several arcs ([`PointLocation::Ambiguous`]). An
/// empty survivor set proves the point is off the curve.
///
/// `nodes` is column-major with `dimension` coordinates per point;
/// `point` has `dimension` entries.
pub fn locate_point(dimension: usize, nodes: &[f64], point: &[f64]) -> PointLocation {
    let mut candidates = vec![LocateCandidate {
        start: 0.0,
        end: 1.0,
        nodes: nodes.to_vec(),
    }];
    let mut next = Vec::new();

    for _ in 0..MAX_LOCATE_SUBDIVISIONS {
        for candidate in candidates.drain(..) {
            if !contains_nd(dimension, &candidate.nodes, point) {
                continue;
            }
            let mid = 0.5 * (candidate.start + candidate.end);
            let (left, right) = subdivide_nodes(dimension, &candidate.nodes);
            next.push(LocateCandidate {
                start: candidate.start,
                end: mid,
                nodes: left,
            });
            next.push(LocateCandidate {
                start: mid,
                end: candidate.end,
                nodes: right,
            });
        }
        if next.is_empty() {
            return PointLocation::Off;
        }
        std::mem::swap(&mut candidates, &mut next);
    }

    // Statistics over every surviving interval endpoint.
    let count = (2 * candidates.len()) as f64;
    let mean = candidates
        .iter()
        .map(|c| c.start + c.end)
        .sum::<f64>()
        / count;
    let variance = candidates
        .iter()
        .map(|c| (c.start - mean).powi(2) + (c.end - mean).powi(2))
        .sum::<f64>()
        / count;
    if variance.sqrt() > LOCATE_STD_CAP {
        return PointLocation::Ambiguous;
    }
    // The survivors pin the parameter to within 2⁻²⁰, so the refined
    // value can stray past an endpoint only by rounding.
    let refined = newton_refine(dimension, nodes, point, mean).clamp(0.0, 1.0);
    PointLocation::OnCurve(refined)
}

/// One Newton step toward the parameter nearest to `point`.
///
/// Projects the residual onto the tangent:
/// `s + ⟨p - B(s), B′(s)⟩ / ⟨B′(s), B′(s)⟩`. At a stationary point the
/// tangent vanishes and the guess is returned unchanged; the comparison
/// with zero is exact on purpose.
pub fn newton_refine(dimension: usize, nodes: &[f64], point: &[f64], s: f64) -> f64 {
    let evaluated = evaluate_multi(dimension, nodes, &[s]);
    let derivative = evaluate_hodograph(dimension, nodes, s);
    let mut projection = 0.0;
    let mut tangent_norm_sq = 0.0;
    for k in 0..dimension {
        let delta = point[k] - evaluated[k];
        projection += delta * derivative[k];
        tangent_norm_sq += derivative[k] * derivative[k];
    }
    if tangent_norm_sq == 0.0 {
        return s;
    }
    s + projection / tangent_norm_sq
}
