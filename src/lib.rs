//! bezium - Numerical core for planar Bézier curves
//!
//! Evaluation, subdivision, specialization, and degree elevation of
//! Bézier curves of arbitrary degree, plus the two geometric searches
//! built on them: locating a point on a curve and intersecting a pair
//! of planar curves, both by adaptive subdivision with Newton
//! refinement.
//!
//! Control polygons are flat column-major `f64` slices (`d × N`, the
//! coordinate index varying fastest). The same operations are exported
//! unchanged as C-callable symbols in [`ffi`].

pub mod bounds;
pub mod curve;
pub mod error;
pub mod ffi;
pub mod hull;
pub mod intersect;

pub use bounds::{contains_nd, Aabb2, BoxOverlap};
pub use curve::{
    elevate_nodes, evaluate_curve_barycentric, evaluate_hodograph, evaluate_multi, locate_point,
    map_interval, newton_refine, specialize_curve, subdivide_nodes, PointLocation,
};
pub use error::IntersectError;
pub use intersect::{newton_refine_curve_intersect, CurveIntersector, Intersections};
