//! C-callable surface over flat column-major `f64` arrays.
//!
//! Every procedure here mirrors one core operation, with scalars passed
//! by pointer and arrays as raw column-major buffers, so the symbols
//! can be bound from C or any FFI-capable language. Statuses are small
//! integers; the locator reports through in-band sentinels (`-1.0` off
//! curve, `-2.0` ambiguous) to keep its single-output contract.
//!
//! The intersector's candidate workspace is kept per thread and reused
//! across calls; [`BEZ_free_curve_intersections_workspace`] releases it
//! explicitly.

use core::ffi::c_int;
use std::cell::RefCell;
use std::slice;

use crate::bounds::{Aabb2, BoxOverlap};
use crate::curve::{self, PointLocation};
use crate::error::IntersectError;
use crate::intersect::{self, CurveIntersector};

/// Operation completed.
pub const STATUS_SUCCESS: c_int = 0;
/// The output buffer is too small; `num_intersections` holds the
/// required size.
pub const STATUS_INSUFFICIENT_SPACE: c_int = 1;
/// Subdivision failed to reduce the curves to near-linear arcs.
pub const STATUS_NO_CONVERGE: c_int = 2;
/// The Newton step's Jacobian is singular.
pub const STATUS_SINGULAR: c_int = 3;
/// Newton iteration matched neither a simple nor a double root.
pub const STATUS_BAD_MULTIPLICITY: c_int = 4;

thread_local! {
    static WORKSPACE: RefCell<CurveIntersector> = RefCell::new(CurveIntersector::new());
}

fn status_of(error: IntersectError) -> c_int {
    match error {
        IntersectError::InsufficientSpace { .. } => STATUS_INSUFFICIENT_SPACE,
        IntersectError::NoConverge { .. } => STATUS_NO_CONVERGE,
        IntersectError::Singular => STATUS_SINGULAR,
        IntersectError::BadMultiplicity => STATUS_BAD_MULTIPLICITY,
        // The candidate count doubles as the status; it is >= 64 by
        // construction and so cannot collide with the named statuses.
        IntersectError::TooManyCandidates { count } => count as c_int,
    }
}

/// Evaluates a curve at `num_vals` barycentric weight pairs.
///
/// # Safety
///
/// `nodes` must hold `dimension * (degree + 1)` doubles, `lambda1` and
/// `lambda2` must hold `num_vals` doubles each, and `evaluated` must
/// have room for `dimension * num_vals` doubles.
#[no_mangle]
pub unsafe extern "C" fn evaluate_curve_barycentric(
    degree: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    num_vals: *const c_int,
    lambda1: *const f64,
    lambda2: *const f64,
    evaluated: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *degree as usize + 1;
    let num_vals = *num_vals as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let lambda1 = slice::from_raw_parts(lambda1, num_vals);
    let lambda2 = slice::from_raw_parts(lambda2, num_vals);
    let result = curve::evaluate_curve_barycentric(dimension, nodes, lambda1, lambda2);
    slice::from_raw_parts_mut(evaluated, result.len()).copy_from_slice(&result);
}

/// Evaluates a curve at `num_vals` parameters.
///
/// # Safety
///
/// `nodes` must hold `dimension * (degree + 1)` doubles, `s_vals` must
/// hold `num_vals` doubles, and `evaluated` must have room for
/// `dimension * num_vals` doubles.
#[no_mangle]
pub unsafe extern "C" fn evaluate_multi(
    degree: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    num_vals: *const c_int,
    s_vals: *const f64,
    evaluated: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *degree as usize + 1;
    let num_vals = *num_vals as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let s_vals = slice::from_raw_parts(s_vals, num_vals);
    let result = curve::evaluate_multi(dimension, nodes, s_vals);
    slice::from_raw_parts_mut(evaluated, result.len()).copy_from_slice(&result);
}

/// Reparameterizes a curve to `[start, end]` and remaps the parent
/// interval `[curve_start, curve_end]` onto the new endpoints.
///
/// # Safety
///
/// `nodes` must hold `dimension * (degree + 1)` doubles and `new_nodes`
/// must have room for the same count; the scalar pointers must be valid.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub unsafe extern "C" fn specialize_curve(
    degree: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    start: *const f64,
    end: *const f64,
    curve_start: *const f64,
    curve_end: *const f64,
    new_nodes: *mut f64,
    true_start: *mut f64,
    true_end: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *degree as usize + 1;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let result = curve::specialize_curve(dimension, nodes, *start, *end);
    slice::from_raw_parts_mut(new_nodes, result.len()).copy_from_slice(&result);
    let (mapped_start, mapped_end) = curve::map_interval((*curve_start, *curve_end), *start, *end);
    *true_start = mapped_start;
    *true_end = mapped_end;
}

/// Evaluates the hodograph at a single parameter.
///
/// # Safety
///
/// `nodes` must hold `dimension * (degree + 1)` doubles and `hodograph`
/// must have room for `dimension` doubles.
#[no_mangle]
pub unsafe extern "C" fn evaluate_hodograph(
    s: *const f64,
    degree: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    hodograph: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *degree as usize + 1;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let result = curve::evaluate_hodograph(dimension, nodes, *s);
    slice::from_raw_parts_mut(hodograph, result.len()).copy_from_slice(&result);
}

/// Splits a curve at the parameter midpoint.
///
/// # Safety
///
/// `nodes` must hold `dimension * num_nodes` doubles; `left_nodes` and
/// `right_nodes` must each have room for the same count.
#[no_mangle]
pub unsafe extern "C" fn subdivide_nodes(
    num_nodes: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    left_nodes: *mut f64,
    right_nodes: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *num_nodes as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let (left, right) = curve::subdivide_nodes(dimension, nodes);
    slice::from_raw_parts_mut(left_nodes, left.len()).copy_from_slice(&left);
    slice::from_raw_parts_mut(right_nodes, right.len()).copy_from_slice(&right);
}

/// One Newton step of the single-curve point refinement.
///
/// # Safety
///
/// `nodes` must hold `dimension * num_nodes` doubles, `point` must hold
/// `dimension` doubles, and the scalar pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn newton_refine(
    num_nodes: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    point: *const f64,
    s: *const f64,
    updated_s: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *num_nodes as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let point = slice::from_raw_parts(point, dimension);
    *updated_s = curve::newton_refine(dimension, nodes, point, *s);
}

/// Locates a point on a curve.
///
/// Writes the parameter into `s_approx`, `-1.0` when the point is not
/// on the curve, or `-2.0` when it sits on multiple disjoint arcs.
///
/// # Safety
///
/// `nodes` must hold `dimension * num_nodes` doubles, `point` must hold
/// `dimension` doubles, and `s_approx` must be valid for writing.
#[no_mangle]
pub unsafe extern "C" fn locate_point(
    num_nodes: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    point: *const f64,
    s_approx: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *num_nodes as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let point = slice::from_raw_parts(point, dimension);
    *s_approx = match curve::locate_point(dimension, nodes, point) {
        PointLocation::OnCurve(s) => s,
        PointLocation::Off => -1.0,
        PointLocation::Ambiguous => -2.0,
    };
}

/// Raises the degree by one.
///
/// # Safety
///
/// `nodes` must hold `dimension * num_nodes` doubles and `elevated`
/// must have room for `dimension * (num_nodes + 1)` doubles.
#[no_mangle]
pub unsafe extern "C" fn elevate_nodes(
    num_nodes: *const c_int,
    dimension: *const c_int,
    nodes: *const f64,
    elevated: *mut f64,
) {
    let dimension = *dimension as usize;
    let num_nodes = *num_nodes as usize;
    let nodes = slice::from_raw_parts(nodes, dimension * num_nodes);
    let result = curve::elevate_nodes(dimension, nodes);
    slice::from_raw_parts_mut(elevated, result.len()).copy_from_slice(&result);
}

/// Classifies the overlap of two planar control-polygon bounding boxes:
/// 0 intersection, 1 tangent, 2 disjoint.
///
/// # Safety
///
/// `nodes1` and `nodes2` must hold `2 * num_nodes1` and
/// `2 * num_nodes2` doubles; `enum_` must be valid for writing.
#[no_mangle]
pub unsafe extern "C" fn BEZ_bbox_intersect(
    num_nodes1: *const c_int,
    nodes1: *const f64,
    num_nodes2: *const c_int,
    nodes2: *const f64,
    enum_: *mut c_int,
) {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * *num_nodes1 as usize);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * *num_nodes2 as usize);
    let overlap = Aabb2::of_polygon(nodes1).classify(&Aabb2::of_polygon(nodes2));
    *enum_ = match overlap {
        BoxOverlap::Intersection => 0,
        BoxOverlap::Tangent => 1,
        BoxOverlap::Disjoint => 2,
    };
}

/// Intersects two planar curves.
///
/// On success the first `num_intersections` parameter pairs are written
/// column-major into `intersections` (`s` then `t` per pair). When the
/// provided `intersections_size` is too small, `num_intersections`
/// receives the required size, the status is
/// [`STATUS_INSUFFICIENT_SPACE`], and the buffer is untouched. A
/// candidate blow-up (64 or more surviving pairs) returns the candidate
/// count itself through `status`.
///
/// # Safety
///
/// `nodes1` and `nodes2` must hold `2 * num_nodes1` and
/// `2 * num_nodes2` doubles, `intersections` must have room for
/// `2 * intersections_size` doubles, and the scalar output pointers
/// must be valid for writing.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub unsafe extern "C" fn BEZ_curve_intersections(
    num_nodes1: *const c_int,
    nodes1: *const f64,
    num_nodes2: *const c_int,
    nodes2: *const f64,
    intersections_size: *const c_int,
    intersections: *mut f64,
    num_intersections: *mut c_int,
    coincident: *mut bool,
    status: *mut c_int,
) {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * *num_nodes1 as usize);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * *num_nodes2 as usize);
    let capacity = *intersections_size as usize;

    let outcome = WORKSPACE.with(|workspace| workspace.borrow_mut().intersect(nodes1, nodes2));
    match outcome {
        Ok(result) => {
            *num_intersections = result.params.len() as c_int;
            if result.params.len() > capacity {
                *status = STATUS_INSUFFICIENT_SPACE;
                return;
            }
            if !result.params.is_empty() {
                let buffer = slice::from_raw_parts_mut(intersections, 2 * result.params.len());
                for (i, &(s, t)) in result.params.iter().enumerate() {
                    buffer[2 * i] = s;
                    buffer[2 * i + 1] = t;
                }
            }
            *coincident = result.coincident;
            *status = STATUS_SUCCESS;
        }
        Err(error) => {
            *num_intersections = 0;
            *coincident = false;
            *status = status_of(error);
        }
    }
}

/// One Newton step on the curve-pair system `B₁(s) - B₂(t) = 0`.
///
/// # Safety
///
/// `nodes1` and `nodes2` must hold `2 * num_nodes1` and
/// `2 * num_nodes2` doubles; the scalar pointers must be valid.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub unsafe extern "C" fn BEZ_newton_refine_curve_intersect(
    s: *const f64,
    num_nodes1: *const c_int,
    nodes1: *const f64,
    t: *const f64,
    num_nodes2: *const c_int,
    nodes2: *const f64,
    new_s: *mut f64,
    new_t: *mut f64,
    status: *mut c_int,
) {
    let nodes1 = slice::from_raw_parts(nodes1, 2 * *num_nodes1 as usize);
    let nodes2 = slice::from_raw_parts(nodes2, 2 * *num_nodes2 as usize);
    match intersect::newton_refine_curve_intersect(*s, nodes1, *t, nodes2) {
        Ok((refined_s, refined_t)) => {
            *new_s = refined_s;
            *new_t = refined_t;
            *status = STATUS_SUCCESS;
        }
        Err(error) => *status = status_of(error),
    }
}

/// Releases the calling thread's intersection workspace.
#[no_mangle]
pub extern "C" fn BEZ_free_curve_intersections_workspace() {
    WORKSPACE.with(|workspace| {
        *workspace.borrow_mut() = CurveIntersector::new();
    });
}
