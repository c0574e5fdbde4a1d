//! Newton refinement of curve-pair intersections.
//!
//! Roots of `F(s, t) = B₁(s) - B₂(t)` are polished with the 2×2 Newton
//! step, and candidates produced by subdivision are driven to full
//! precision by [`converge`], which watches the update norms to tell a
//! simple root (quadratic convergence) from a double root (linear
//! convergence at rate ≈ ½) and switches to the accelerated step for
//! the latter.

use crate::curve::{evaluate_hodograph, evaluate_multi};
use crate::error::IntersectError;

/// Iteration budget for each convergence regime.
const MAX_NEWTON_ITERATIONS: usize = 10;

/// Update-norm threshold for convergence, 2⁻⁴⁵ (scaled by the parameter
/// magnitudes).
const NEWTON_CONVERGENCE: f64 = 2.842170943040401e-14;

/// An update shrinking by less than this factor counts as linear rather
/// than quadratic convergence.
const LINEAR_UPDATE_RATIO: f64 = 0.25;

/// The residual and Jacobian of `F(s, t) = B₁(s) - B₂(t)`.
fn system_at(s: f64, first: &[f64], t: f64, second: &[f64]) -> ([f64; 2], [f64; 4]) {
    let b1 = evaluate_multi(2, first, &[s]);
    let b2 = evaluate_multi(2, second, &[t]);
    let func = [b1[0] - b2[0], b1[1] - b2[1]];
    let d1 = evaluate_hodograph(2, first, s);
    let d2 = evaluate_hodograph(2, second, t);
    // Row-major [[B1'x, -B2'x], [B1'y, -B2'y]].
    let jacobian = [d1[0], -d2[0], d1[1], -d2[1]];
    (func, jacobian)
}

fn solve(func: [f64; 2], jacobian: [f64; 4]) -> Option<(f64, f64)> {
    let [j00, j01, j10, j11] = jacobian;
    let det = j00 * j11 - j01 * j10;
    if det == 0.0 {
        return None;
    }
    let delta_s = (-func[0] * j11 + func[1] * j01) / det;
    let delta_t = (func[0] * j10 - func[1] * j00) / det;
    Some((delta_s, delta_t))
}

/// One Newton step on the curve-pair system.
///
/// Returns the updated `(s, t)`. A Jacobian whose determinant vanishes
/// relative to machine precision (the curves' tangents are parallel at
/// the guess) is reported as [`IntersectError::Singular`]; an exact root
/// is returned unchanged without consulting the Jacobian.
pub fn newton_refine_curve_intersect(
    s: f64,
    first: &[f64],
    t: f64,
    second: &[f64],
) -> Result<(f64, f64), IntersectError> {
    let (func, jacobian) = system_at(s, first, t, second);
    if func[0] == 0.0 && func[1] == 0.0 {
        return Ok((s, t));
    }
    let [j00, j01, j10, j11] = jacobian;
    let det = j00 * j11 - j01 * j10;
    let scale = (j00 * j11).abs() + (j01 * j10).abs();
    if det.abs() <= f64::EPSILON * scale {
        return Err(IntersectError::Singular);
    }
    let delta_s = (-func[0] * j11 + func[1] * j01) / det;
    let delta_t = (func[0] * j10 - func[1] * j00) / det;
    Ok((s + delta_s, t + delta_t))
}

/// Drives a near-intersection to full precision.
///
/// Plain Newton first: a simple root converges quadratically well inside
/// the budget. If a majority of updates instead shrink at a linear rate
/// the root is non-simple, and the iteration restarts with the
/// multiplicity-two step (the update doubled), which restores quadratic
/// convergence at a double root. Exhausting both budgets is reported as
/// [`IntersectError::BadMultiplicity`].
pub(crate) fn converge(
    mut s: f64,
    mut t: f64,
    first: &[f64],
    second: &[f64],
) -> Result<(f64, f64), IntersectError> {
    let mut norm_prev: Option<f64> = None;
    let mut linear_updates = 0usize;

    for index in 0..MAX_NEWTON_ITERATIONS {
        let (func, jacobian) = system_at(s, first, t, second);
        if func[0] == 0.0 && func[1] == 0.0 {
            return Ok((s, t));
        }
        let (delta_s, delta_t) = match solve(func, jacobian) {
            Some(update) => update,
            None => return Err(IntersectError::Singular),
        };
        let norm_update = delta_s.hypot(delta_t);
        if let Some(prev) = norm_prev {
            if norm_update > LINEAR_UPDATE_RATIO * prev {
                linear_updates += 1;
            }
        }
        s += delta_s;
        t += delta_t;
        if norm_update <= NEWTON_CONVERGENCE * s.abs().max(t.abs()).max(1.0) {
            return Ok((s, t));
        }
        norm_prev = Some(norm_update);
        if index >= 4 && 3 * linear_updates >= 2 * (index + 1) {
            return converge_double_root(s, t, first, second);
        }
    }
    Err(IntersectError::BadMultiplicity)
}

fn converge_double_root(
    mut s: f64,
    mut t: f64,
    first: &[f64],
    second: &[f64],
) -> Result<(f64, f64), IntersectError> {
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let (func, jacobian) = system_at(s, first, t, second);
        if func[0] == 0.0 && func[1] == 0.0 {
            return Ok((s, t));
        }
        let (delta_s, delta_t) = match solve(func, jacobian) {
            Some(update) => update,
            None => return Err(IntersectError::Singular),
        };
        s += 2.0 * delta_s;
        t += 2.0 * delta_t;
        let norm_update = 2.0 * delta_s.hypot(delta_t);
        if norm_update <= NEWTON_CONVERGENCE * s.abs().max(t.abs()).max(1.0) {
            return Ok((s, t));
        }
    }
    Err(IntersectError::BadMultiplicity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_transversal_crossing() {
        // Two quadratic arches crossing near s = t ≈ 0.146.
        let first = vec![0.0, 0.0, 2.0, 4.0, 4.0, 0.0];
        let second = vec![0.0, 2.0, 2.0, -2.0, 4.0, 2.0];
        let seed = (0.14, 0.15);
        let (s, t) = newton_refine_curve_intersect(seed.0, &first, seed.1, &second).unwrap();
        let residual = |s: f64, t: f64| {
            let b1 = evaluate_multi(2, &first, &[s]);
            let b2 = evaluate_multi(2, &second, &[t]);
            (b1[0] - b2[0]).hypot(b1[1] - b2[1])
        };
        // One step from a close guess lands well under the seed error.
        assert!(residual(s, t) < 0.1 * residual(seed.0, seed.1));
    }

    #[test]
    fn test_refine_exact_root_unchanged() {
        let first = vec![0.0, 0.0, 1.0, 1.0];
        let second = vec![0.0, 1.0, 1.0, 0.0];
        let (s, t) = newton_refine_curve_intersect(0.5, &first, 0.5, &second).unwrap();
        assert_eq!((s, t), (0.5, 0.5));
    }

    #[test]
    fn test_refine_singular_jacobian() {
        // Identical lines: tangents are parallel everywhere.
        let first = vec![0.0, 0.0, 1.0, 1.0];
        let second = vec![0.0, 0.0, 1.0, 1.0];
        assert_eq!(
            newton_refine_curve_intersect(0.25, &first, 0.75, &second),
            Err(IntersectError::Singular)
        );
    }

    #[test]
    fn test_converge_simple_root() {
        let first = vec![0.0, 0.0, 2.0, 4.0, 4.0, 0.0];
        let second = vec![0.0, 2.0, 2.0, -2.0, 4.0, 2.0];
        let (s, t) = converge(0.2, 0.2, &first, &second).unwrap();
        let b1 = evaluate_multi(2, &first, &[s]);
        let b2 = evaluate_multi(2, &second, &[t]);
        assert!((b1[0] - b2[0]).hypot(b1[1] - b2[1]) <= 1e-12);
    }

    #[test]
    fn test_converge_double_root() {
        // A parabola tangent to a horizontal line at its apex: the root
        // (0.5, 0.5) has multiplicity two.
        let first = vec![0.0, 0.0, 0.5, 1.0, 1.0, 0.0];
        let second = vec![0.0, 0.5, 1.0, 0.5];
        let (s, t) = converge(0.4, 0.4, &first, &second).unwrap();
        assert!((s - 0.5).abs() <= 1e-7, "s = {s}");
        assert!((t - 0.5).abs() <= 1e-7, "t = {t}");
    }
}
