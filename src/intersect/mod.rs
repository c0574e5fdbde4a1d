//! Pairwise curve intersection by adaptive subdivision.
//!
//! The engine walks two planar curves down in lock-step: candidate pairs
//! of arcs are pruned by bounding-box and convex-hull overlap, arcs that
//! are close enough to their chords stop subdividing, linear/linear
//! pairs are solved directly, and every accepted solution is polished by
//! Newton iteration against the original curves. Candidate storage is
//! double-buffered: one list is drained while the next round's pairs are
//! appended to the other, and the buffers swap roles between rounds.

mod coincident;
mod newton;

pub use newton::newton_refine_curve_intersect;

use crate::bounds::{Aabb2, BoxOverlap};
use crate::curve::subdivide_nodes;
use crate::error::IntersectError;
use crate::hull::hulls_collide;

/// Hard cap on subdivision rounds.
const MAX_INTERSECT_SUBDIVISIONS: usize = 20;

/// Candidate-pair cap; exceeding it signals near-coincident curves or a
/// non-simple configuration.
const MAX_CANDIDATES: usize = 64;

/// Chord-deviation bound below which an arc counts as linear, 2⁻³⁶
/// (scaled by the polygon's coordinate magnitude).
const LINEARIZATION_THRESHOLD: f64 = 1.4551915228366852e-11;

/// Parameters within 2⁻⁴⁴ outside [0, 1] are snapped onto the interval.
const WIGGLE: f64 = 5.684341886080802e-14;

/// Slack, 2⁻¹⁶, accepted on chord parameters before Newton polishing;
/// anything farther outside the unit interval is treated as a miss.
const CHORD_SLACK: f64 = 1.52587890625e-5;

/// Intersections closer than 2⁻²⁰ in both parameters are duplicates.
const PARAM_DEDUP: f64 = 9.5367431640625e-7;

/// Relative tolerance, 2⁻⁴⁰, for point and node-array comparisons.
const VECTOR_CLOSE_EPS: f64 = 9.094947017729282e-13;

/// The result of intersecting two curves.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersections {
    /// Parameter pairs `(s, t)` with `B₁(s) ≈ B₂(t)`, unique in
    /// parameter space.
    pub params: Vec<(f64, f64)>,
    /// When `true` the curves share an arc of a common curve and
    /// `params` holds exactly the start and end of that arc.
    pub coincident: bool,
}

/// An arc of one of the input curves.
#[derive(Debug, Clone)]
struct Subcurve {
    start: f64,
    end: f64,
    nodes: Vec<f64>,
    linearization_error: f64,
}

impl Subcurve {
    fn new(start: f64, end: f64, nodes: Vec<f64>) -> Self {
        let linearization_error = linearization_error(&nodes);
        Self {
            start,
            end,
            nodes,
            linearization_error,
        }
    }

    fn full(nodes: &[f64]) -> Self {
        Self::new(0.0, 1.0, nodes.to_vec())
    }

    fn is_linear(&self) -> bool {
        let scale = self
            .nodes
            .iter()
            .fold(0.0_f64, |acc, &x| acc.max(x.abs()))
            .max(1.0);
        self.linearization_error <= LINEARIZATION_THRESHOLD * scale
    }

    fn first_point(&self) -> [f64; 2] {
        [self.nodes[0], self.nodes[1]]
    }

    fn last_point(&self) -> [f64; 2] {
        let n = self.nodes.len();
        [self.nodes[n - 2], self.nodes[n - 1]]
    }

    fn midpoint_param(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Splits at the parameter midpoint, or stays whole once linear;
    /// a chord-like arc gains nothing from further halving.
    fn into_children(self) -> Vec<Subcurve> {
        if self.is_linear() {
            return vec![self];
        }
        let (left, right) = subdivide_nodes(2, &self.nodes);
        let mid = 0.5 * (self.start + self.end);
        vec![
            Subcurve::new(self.start, mid, left),
            Subcurve::new(mid, self.end, right),
        ]
    }
}

#[derive(Debug)]
struct CandidatePair {
    first: Subcurve,
    second: Subcurve,
}

/// The intersection engine.
///
/// Owns the two candidate buffers so their capacity is reused across
/// calls; buffers grow as needed and are never shrunk. The engine is a
/// plain value: callers that want to amortize allocations keep one
/// around, everyone else can build one per call. It must not be shared
/// across threads without external synchronization.
#[derive(Debug, Default)]
pub struct CurveIntersector {
    current: Vec<CandidatePair>,
    next: Vec<CandidatePair>,
}

impl CurveIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersects two planar curves given as column-major node arrays
    /// (`2 × N`, `N ≥ 2`).
    ///
    /// On success the returned parameter pairs satisfy
    /// `B₁(sᵢ) = B₂(tᵢ)` to double precision and are unique in
    /// parameter space; for non-coincident curves their count is
    /// bounded by the Bézout number `(N₁-1)(N₂-1)`.
    pub fn intersect(
        &mut self,
        first: &[f64],
        second: &[f64],
    ) -> Result<Intersections, IntersectError> {
        if let Some(result) = check_lines(first, second) {
            return Ok(result);
        }

        let mut intersections: Vec<(f64, f64)> = Vec::new();
        self.current.clear();
        self.next.clear();
        self.current.push(CandidatePair {
            first: Subcurve::full(first),
            second: Subcurve::full(second),
        });

        for _ in 0..MAX_INTERSECT_SUBDIVISIONS {
            self.one_round(first, second, &mut intersections)?;
            std::mem::swap(&mut self.current, &mut self.next);
            self.next.clear();

            if self.current.is_empty() {
                return Ok(Intersections {
                    params: intersections,
                    coincident: false,
                });
            }
            let count = self.current.len();
            if count > MAX_CANDIDATES {
                self.current.clear();
                if let Some(pairs) = coincident::coincident_parameters(first, second) {
                    return Ok(Intersections {
                        params: pairs.to_vec(),
                        coincident: true,
                    });
                }
                return Err(IntersectError::TooManyCandidates { count });
            }
        }
        self.current.clear();
        Err(IntersectError::NoConverge {
            rounds: MAX_INTERSECT_SUBDIVISIONS,
        })
    }

    fn one_round(
        &mut self,
        orig_first: &[f64],
        orig_second: &[f64],
        intersections: &mut Vec<(f64, f64)>,
    ) -> Result<(), IntersectError> {
        let Self { current, next } = self;
        for pair in current.drain(..) {
            let first_linear = pair.first.is_linear();
            let second_linear = pair.second.is_linear();
            let both_linear = first_linear && second_linear;

            // A linearized side is tested as its chord against the
            // other side's box; two chords go straight to the solver.
            let overlap = if both_linear {
                BoxOverlap::Intersection
            } else if first_linear {
                bbox_line_intersect(
                    &pair.second.nodes,
                    pair.first.first_point(),
                    pair.first.last_point(),
                )
            } else if second_linear {
                bbox_line_intersect(
                    &pair.first.nodes,
                    pair.second.first_point(),
                    pair.second.last_point(),
                )
            } else {
                Aabb2::of_polygon(&pair.first.nodes).classify(&Aabb2::of_polygon(&pair.second.nodes))
            };

            match overlap {
                BoxOverlap::Disjoint => continue,
                BoxOverlap::Tangent => {
                    // Boxes that only touch can only meet where the arcs
                    // end; match endpoints instead of subdividing further.
                    tangent_endpoint_matches(&pair.first, &pair.second, intersections);
                    continue;
                }
                BoxOverlap::Intersection => {}
            }

            if both_linear {
                from_linearized(
                    &pair.first,
                    &pair.second,
                    orig_first,
                    orig_second,
                    intersections,
                )?;
                continue;
            }

            if !hulls_collide(
                &polygon_points(&pair.first.nodes),
                &polygon_points(&pair.second.nodes),
            ) {
                continue;
            }

            let first_children = pair.first.into_children();
            let second_children = pair.second.into_children();
            for f in &first_children {
                for s in &second_children {
                    next.push(CandidatePair {
                        first: f.clone(),
                        second: s.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Chord-deviation bound of a planar control polygon.
///
/// The distance between a Bézier curve and the line through its
/// endpoints is bounded by `k(k-1)/8 · max‖Pᵢ₊₂ - 2Pᵢ₊₁ + Pᵢ‖`;
/// degree-one polygons are exactly their chord.
fn linearization_error(nodes: &[f64]) -> f64 {
    let num_nodes = nodes.len() / 2;
    let degree = num_nodes - 1;
    if degree < 2 {
        return 0.0;
    }
    let mut worst = 0.0_f64;
    for i in 0..num_nodes - 2 {
        let ddx = nodes[2 * (i + 2)] - 2.0 * nodes[2 * (i + 1)] + nodes[2 * i];
        let ddy = nodes[2 * (i + 2) + 1] - 2.0 * nodes[2 * (i + 1) + 1] + nodes[2 * i + 1];
        worst = worst.max(ddx.hypot(ddy));
    }
    0.125 * (degree * (degree - 1)) as f64 * worst
}

/// Solves `start0 + s·d0 = start1 + t·d1` for the two chord parameters.
/// Parallel chords (the cross product is exactly zero) have no unique
/// solution and yield `None`.
fn segment_intersection(
    start0: [f64; 2],
    end0: [f64; 2],
    start1: [f64; 2],
    end1: [f64; 2],
) -> Option<(f64, f64)> {
    let d0 = [end0[0] - start0[0], end0[1] - start0[1]];
    let d1 = [end1[0] - start1[0], end1[1] - start1[1]];
    let cross_d = d0[0] * d1[1] - d0[1] * d1[0];
    if cross_d == 0.0 {
        return None;
    }
    let dx = start1[0] - start0[0];
    let dy = start1[1] - start0[1];
    let s = (dx * d1[1] - dy * d1[0]) / cross_d;
    let t = (dx * d0[1] - dy * d0[0]) / cross_d;
    Some((s, t))
}

/// Both inputs are exact lines: solve them directly, including the
/// collinear-overlap case the subdivision machinery cannot express.
/// Returns `None` when either input actually curves.
fn check_lines(first: &[f64], second: &[f64]) -> Option<Intersections> {
    if linearization_error(first) != 0.0 || linearization_error(second) != 0.0 {
        return None;
    }
    let start0 = [first[0], first[1]];
    let end0 = [first[first.len() - 2], first[first.len() - 1]];
    let start1 = [second[0], second[1]];
    let end1 = [second[second.len() - 2], second[second.len() - 1]];

    Some(match segment_intersection(start0, end0, start1, end1) {
        Some((s, t)) => {
            let mut params = Vec::new();
            if let (Some(s), Some(t)) = (wiggle_interval(s), wiggle_interval(t)) {
                params.push((s, t));
            }
            Intersections {
                params,
                coincident: false,
            }
        }
        None => match parallel_lines_parameters(start0, end0, start1, end1) {
            Some(pairs) => Intersections {
                coincident: pairs.len() == 2,
                params: pairs,
            },
            None => Intersections {
                params: Vec::new(),
                coincident: false,
            },
        },
    })
}

/// Overlap parameters of two collinear segments.
///
/// Returns one pair for an endpoint touch, two pairs (the overlap arc's
/// ends) for a genuine shared segment, and `None` when the segments are
/// parallel-but-distinct or collinear-but-disjoint.
fn parallel_lines_parameters(
    start0: [f64; 2],
    end0: [f64; 2],
    start1: [f64; 2],
    end1: [f64; 2],
) -> Option<Vec<(f64, f64)>> {
    let d0 = [end0[0] - start0[0], end0[1] - start0[1]];
    let offset = [start1[0] - start0[0], start1[1] - start0[1]];
    if d0[0] * offset[1] - d0[1] * offset[0] != 0.0 {
        return None;
    }
    let norm_sq = d0[0] * d0[0] + d0[1] * d0[1];
    if norm_sq == 0.0 {
        return None;
    }
    let param_of = |p: [f64; 2]| ((p[0] - start0[0]) * d0[0] + (p[1] - start0[1]) * d0[1]) / norm_sq;
    let s_at_start1 = param_of(start1);
    let s_at_end1 = param_of(end1);
    let width = s_at_end1 - s_at_start1;
    if width == 0.0 {
        return None;
    }

    let lo = s_at_start1.min(s_at_end1).max(0.0);
    let hi = s_at_start1.max(s_at_end1).min(1.0);
    if lo > hi {
        return None;
    }
    let t_of = |s: f64| (s - s_at_start1) / width;
    if lo == hi {
        return Some(vec![(lo, t_of(lo))]);
    }
    Some(vec![(lo, t_of(lo)), (hi, t_of(hi))])
}

/// Both arcs are chords now: solve the 2×2 linear system, then polish
/// the solution by Newton against the original curves. Chords that miss
/// (or are parallel because of residual curvature) fall back to a
/// Newton search seeded at the arcs' parameter midpoints, guarded by a
/// convex-hull check.
fn from_linearized(
    first: &Subcurve,
    second: &Subcurve,
    orig_first: &[f64],
    orig_second: &[f64],
    intersections: &mut Vec<(f64, f64)>,
) -> Result<(), IntersectError> {
    let chord = segment_intersection(
        first.first_point(),
        first.last_point(),
        second.first_point(),
        second.last_point(),
    );

    let in_slack = |v: f64| (-CHORD_SLACK..=1.0 + CHORD_SLACK).contains(&v);
    let (seed_s, seed_t) = match chord {
        Some((s, t)) if in_slack(s) && in_slack(t) => (
            first.start + s * (first.end - first.start),
            second.start + t * (second.end - second.start),
        ),
        None if first.linearization_error == 0.0 && second.linearization_error == 0.0 => {
            // Two exact parallel segments cannot cross. (Collinear
            // overlap of full-line inputs is handled before subdivision
            // ever starts.)
            return Ok(());
        }
        _ => {
            if !hulls_collide(
                &polygon_points(&first.nodes),
                &polygon_points(&second.nodes),
            ) {
                return Ok(());
            }
            (first.midpoint_param(), second.midpoint_param())
        }
    };

    let (refined_s, refined_t) = newton::converge(seed_s, seed_t, orig_first, orig_second)?;
    if let (Some(s), Some(t)) = (wiggle_interval(refined_s), wiggle_interval(refined_t)) {
        add_intersection(s, t, intersections);
    }
    Ok(())
}

/// When two boxes merely touch, the arcs can only meet at their ends.
fn tangent_endpoint_matches(
    first: &Subcurve,
    second: &Subcurve,
    intersections: &mut Vec<(f64, f64)>,
) {
    let first_ends = [
        (first.start, first.first_point()),
        (first.end, first.last_point()),
    ];
    let second_ends = [
        (second.start, second.first_point()),
        (second.end, second.last_point()),
    ];
    for &(s, first_end) in &first_ends {
        for &(t, second_end) in &second_ends {
            if vectors_close(&first_end, &second_end) {
                add_intersection(s, t, intersections);
            }
        }
    }
}

/// Box-versus-chord classifier used once one side of a candidate is
/// linear. Containment of either chord endpoint or a crossing of any
/// box side counts as overlap; touching configurations are folded into
/// `Intersection` since the chord still has to be solved against the
/// other arc.
fn bbox_line_intersect(nodes: &[f64], line_start: [f64; 2], line_end: [f64; 2]) -> BoxOverlap {
    let bbox = Aabb2::of_polygon(nodes);
    if bbox.contains(line_start) || bbox.contains(line_end) {
        return BoxOverlap::Intersection;
    }
    let corners = [
        [bbox.min[0], bbox.min[1]],
        [bbox.max[0], bbox.min[1]],
        [bbox.max[0], bbox.max[1]],
        [bbox.min[0], bbox.max[1]],
    ];
    for i in 0..4 {
        let side_start = corners[i];
        let side_end = corners[(i + 1) % 4];
        if let Some((s, t)) = segment_intersection(line_start, line_end, side_start, side_end) {
            if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
                return BoxOverlap::Intersection;
            }
        }
    }
    BoxOverlap::Disjoint
}

fn polygon_points(nodes: &[f64]) -> Vec<[f64; 2]> {
    nodes.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
}

/// Snaps a parameter onto [0, 1] if it lies within the wiggle room,
/// rejects it otherwise.
pub(crate) fn wiggle_interval(value: f64) -> Option<f64> {
    if value < -WIGGLE || value > 1.0 + WIGGLE {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

/// Relative closeness of two equal-length coordinate vectors.
pub(crate) fn vectors_close(a: &[f64], b: &[f64]) -> bool {
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let size_a = norm(a);
    let size_b = norm(b);
    if size_a == 0.0 {
        return size_b <= VECTOR_CLOSE_EPS;
    }
    if size_b == 0.0 {
        return size_a <= VECTOR_CLOSE_EPS;
    }
    let diff: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt();
    diff <= VECTOR_CLOSE_EPS * size_a.min(size_b)
}

fn add_intersection(s: f64, t: f64, intersections: &mut Vec<(f64, f64)>) {
    let duplicate = intersections
        .iter()
        .any(|&(es, et)| (es - s).abs() < PARAM_DEDUP && (et - t).abs() < PARAM_DEDUP);
    if !duplicate {
        intersections.push((s, t));
    }
}
