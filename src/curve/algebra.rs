//! Control-polygon algebra for Bézier curves of arbitrary degree.
//!
//! All functions operate on flat column-major node arrays: a curve with
//! `N` control points in `d` dimensions is a slice of length `d * N`
//! where point `i` occupies `nodes[i * d..(i + 1) * d]` (the coordinate
//! index varies fastest). Degree is always `N - 1`.

use num_traits::Float;

/// Evaluates a curve at `m` pairs of barycentric weights.
///
/// For each weight pair `(λ₁, λ₂)` this computes
/// `Σᵢ C(k, i) λ₁^(k-i) λ₂^i Pᵢ` by the generalized de Casteljau
/// recursion, accumulating `(result + binom · λ₂ⁱ · Pᵢ) · λ₁` with the
/// binomial coefficient updated multiplicatively per term. The
/// coefficient is held in floating point so high degrees neither
/// overflow nor recompute factorials.
///
/// Passing `λ₁ = 1 - s`, `λ₂ = s` evaluates the curve itself; other
/// weight pairs evaluate its homogeneous extension.
///
/// # Returns
///
/// A column-major `d × m` array of evaluated points.
pub fn evaluate_curve_barycentric<F: Float>(
    dimension: usize,
    nodes: &[F],
    lambda1: &[F],
    lambda2: &[F],
) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    let degree = num_nodes - 1;
    let mut evaluated = vec![F::zero(); dimension * lambda1.len()];

    for (j, out) in evaluated.chunks_exact_mut(dimension).enumerate() {
        let l1 = lambda1[j];
        let l2 = lambda2[j];

        for (k, value) in out.iter_mut().enumerate() {
            *value = l1 * nodes[k];
        }
        let mut binom = F::one();
        let mut lambda2_pow = F::one();
        for i in 1..degree {
            lambda2_pow = lambda2_pow * l2;
            binom = binom * F::from(degree - i + 1).unwrap() / F::from(i).unwrap();
            let scale = binom * lambda2_pow;
            for (k, value) in out.iter_mut().enumerate() {
                *value = (*value + scale * nodes[i * dimension + k]) * l1;
            }
        }
        let scale = l2 * lambda2_pow;
        for (k, value) in out.iter_mut().enumerate() {
            *value = *value + scale * nodes[degree * dimension + k];
        }
    }

    evaluated
}

/// Evaluates a curve at each parameter in `params`.
///
/// Thin wrapper over [`evaluate_curve_barycentric`] with `λ₁ = 1 - s`,
/// `λ₂ = s`.
pub fn evaluate_multi<F: Float>(dimension: usize, nodes: &[F], params: &[F]) -> Vec<F> {
    let lambda1: Vec<F> = params.iter().map(|&s| F::one() - s).collect();
    evaluate_curve_barycentric(dimension, nodes, &lambda1, params)
}

/// Evaluates the hodograph (derivative curve) at a single parameter.
///
/// The hodograph of a degree-`k` curve is the degree-`(k-1)` curve with
/// control points `k · (Pᵢ₊₁ - Pᵢ)`; this forms the first differences,
/// evaluates the reduced polygon at `s`, and scales by the degree.
pub fn evaluate_hodograph<F: Float>(dimension: usize, nodes: &[F], s: F) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    let degree = num_nodes - 1;
    let mut first_deriv = vec![F::zero(); dimension * degree];
    for i in 0..degree {
        for k in 0..dimension {
            first_deriv[i * dimension + k] =
                nodes[(i + 1) * dimension + k] - nodes[i * dimension + k];
        }
    }

    let mut evaluated = evaluate_multi(dimension, &first_deriv, &[s]);
    let scale = F::from(degree).unwrap();
    for value in &mut evaluated {
        *value = *value * scale;
    }
    evaluated
}

/// Splits a curve at the midpoint into two curves of the same degree.
///
/// The halves cover `[0, ½]` and `[½, 1]` of the parent and share one
/// control point: the last node of `left` equals the first node of
/// `right`. Lengths 2, 3, and 4 use closed-form dyadic formulas; longer
/// polygons go through the Pascal-row path.
pub fn subdivide_nodes<F: Float>(dimension: usize, nodes: &[F]) -> (Vec<F>, Vec<F>) {
    let num_nodes = nodes.len() / dimension;
    match num_nodes {
        2 => subdivide_linear(dimension, nodes),
        3 => subdivide_quadratic(dimension, nodes),
        4 => subdivide_cubic(dimension, nodes),
        _ => subdivide_generic(dimension, nodes),
    }
}

fn subdivide_linear<F: Float>(dimension: usize, nodes: &[F]) -> (Vec<F>, Vec<F>) {
    let half = F::from(0.5).unwrap();
    let mut left = nodes.to_vec();
    let mut right = nodes.to_vec();
    for k in 0..dimension {
        let mid = half * (nodes[k] + nodes[dimension + k]);
        left[dimension + k] = mid;
        right[k] = mid;
    }
    (left, right)
}

fn subdivide_quadratic<F: Float>(dimension: usize, nodes: &[F]) -> (Vec<F>, Vec<F>) {
    let half = F::from(0.5).unwrap();
    let fourth = F::from(0.25).unwrap();
    let two = F::from(2.0).unwrap();
    let mut left = nodes.to_vec();
    let mut right = nodes.to_vec();
    for k in 0..dimension {
        let p0 = nodes[k];
        let p1 = nodes[dimension + k];
        let p2 = nodes[2 * dimension + k];
        let mid = fourth * (p0 + two * p1 + p2);
        left[dimension + k] = half * (p0 + p1);
        left[2 * dimension + k] = mid;
        right[k] = mid;
        right[dimension + k] = half * (p1 + p2);
    }
    (left, right)
}

fn subdivide_cubic<F: Float>(dimension: usize, nodes: &[F]) -> (Vec<F>, Vec<F>) {
    let half = F::from(0.5).unwrap();
    let fourth = F::from(0.25).unwrap();
    let eighth = F::from(0.125).unwrap();
    let two = F::from(2.0).unwrap();
    let three = F::from(3.0).unwrap();
    let mut left = nodes.to_vec();
    let mut right = nodes.to_vec();
    for k in 0..dimension {
        let p0 = nodes[k];
        let p1 = nodes[dimension + k];
        let p2 = nodes[2 * dimension + k];
        let p3 = nodes[3 * dimension + k];
        let mid = eighth * (p0 + three * p1 + three * p2 + p3);
        left[dimension + k] = half * (p0 + p1);
        left[2 * dimension + k] = fourth * (p0 + two * p1 + p2);
        left[3 * dimension + k] = mid;
        right[k] = mid;
        right[dimension + k] = fourth * (p1 + two * p2 + p3);
        right[2 * dimension + k] = half * (p2 + p3);
    }
    (left, right)
}

fn subdivide_generic<F: Float>(dimension: usize, nodes: &[F]) -> (Vec<F>, Vec<F>) {
    let num_nodes = nodes.len() / dimension;
    let half = F::from(0.5).unwrap();
    let mut left = vec![F::zero(); nodes.len()];
    let mut right = vec![F::zero(); nodes.len()];

    // weights holds the current scaled Pascal row: 2⁻ⁱ C(i, j) after i
    // averaging steps. Row i is dotted into the polygon from the front
    // for the left half and from the back for the right half.
    let mut weights = vec![F::zero(); num_nodes];
    weights[0] = F::one();
    for i in 0..num_nodes {
        for k in 0..dimension {
            let mut front = F::zero();
            let mut back = F::zero();
            for (j, &w) in weights[..=i].iter().enumerate() {
                front = front + w * nodes[j * dimension + k];
                back = back + w * nodes[(num_nodes - 1 - j) * dimension + k];
            }
            left[i * dimension + k] = front;
            right[(num_nodes - 1 - i) * dimension + k] = back;
        }
        if i + 1 < num_nodes {
            for j in (1..=i + 1).rev() {
                let above = if j <= i { weights[j] } else { F::zero() };
                weights[j] = half * (weights[j - 1] + above);
            }
            weights[0] = half * weights[0];
        }
    }
    (left, right)
}

/// Reparameterizes a curve to the subinterval `[start, end]`.
///
/// Degrees 1 and 2 use closed forms (the linear blend and the quadratic
/// polar form); higher degrees use blossoming: every de Casteljau
/// reduction stage at `end` is saved, then stage `i` is fully reduced at
/// `start` to produce node `i`. This avoids any division, so degenerate
/// intervals (including `start > end`, which reverses orientation) are
/// handled uniformly.
pub fn specialize_curve<F: Float>(dimension: usize, nodes: &[F], start: F, end: F) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    match num_nodes {
        0 | 1 => nodes.to_vec(),
        2 => {
            let mut new_nodes = vec![F::zero(); nodes.len()];
            for k in 0..dimension {
                let p0 = nodes[k];
                let p1 = nodes[dimension + k];
                new_nodes[k] = (F::one() - start) * p0 + start * p1;
                new_nodes[dimension + k] = (F::one() - end) * p0 + end * p1;
            }
            new_nodes
        }
        3 => {
            // Polar form of a quadratic:
            // f(u, v) = (1-u)(1-v) P0 + ((1-u)v + u(1-v)) P1 + uv P2
            let blend = |u: F, v: F, p0: F, p1: F, p2: F| {
                (F::one() - u) * (F::one() - v) * p0
                    + ((F::one() - u) * v + u * (F::one() - v)) * p1
                    + u * v * p2
            };
            let mut new_nodes = vec![F::zero(); nodes.len()];
            for k in 0..dimension {
                let p0 = nodes[k];
                let p1 = nodes[dimension + k];
                let p2 = nodes[2 * dimension + k];
                new_nodes[k] = blend(start, start, p0, p1, p2);
                new_nodes[dimension + k] = blend(start, end, p0, p1, p2);
                new_nodes[2 * dimension + k] = blend(end, end, p0, p1, p2);
            }
            new_nodes
        }
        _ => specialize_generic(dimension, nodes, start, end),
    }
}

fn specialize_generic<F: Float>(dimension: usize, nodes: &[F], start: F, end: F) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    let minus_end = F::one() - end;
    let minus_start = F::one() - start;

    // First sweep: reduce at `end`, keeping every stage.
    let mut stages: Vec<Vec<F>> = Vec::with_capacity(num_nodes);
    stages.push(nodes.to_vec());
    for i in 1..num_nodes {
        let reduced = de_casteljau_round(dimension, &stages[i - 1], minus_end, end);
        stages.push(reduced);
    }

    // Second sweep: node i is stage i collapsed at `start`, which yields
    // the blossom value f(start^(k-i), end^i).
    let mut new_nodes = vec![F::zero(); nodes.len()];
    for (i, stage) in stages.iter().enumerate() {
        let mut reduced = stage.clone();
        while reduced.len() > dimension {
            reduced = de_casteljau_round(dimension, &reduced, minus_start, start);
        }
        new_nodes[i * dimension..(i + 1) * dimension].copy_from_slice(&reduced);
    }
    new_nodes
}

fn de_casteljau_round<F: Float>(dimension: usize, nodes: &[F], lambda1: F, lambda2: F) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    let mut reduced = vec![F::zero(); dimension * (num_nodes - 1)];
    for i in 0..num_nodes - 1 {
        for k in 0..dimension {
            reduced[i * dimension + k] =
                lambda1 * nodes[i * dimension + k] + lambda2 * nodes[(i + 1) * dimension + k];
        }
    }
    reduced
}

/// Maps a specialization onto a parent parameter interval.
///
/// Specializing an arc that already covers `interval = (a, b)` of some
/// root curve to the local subinterval `[start, end]` produces an arc
/// covering `(a + start·(b - a), a + end·(b - a))` of that root curve.
#[inline]
pub fn map_interval<F: Float>(interval: (F, F), start: F, end: F) -> (F, F) {
    let (a, b) = interval;
    let width = b - a;
    (a + start * width, a + end * width)
}

/// Raises the degree by one without changing the curve's point set.
///
/// `Q₀ = P₀`, `Q_N = P_{N-1}`, and `Qᵢ = (i Pᵢ₋₁ + (N-i) Pᵢ) / N` for
/// the interior nodes, where `N` is the current node count.
pub fn elevate_nodes<F: Float>(dimension: usize, nodes: &[F]) -> Vec<F> {
    let num_nodes = nodes.len() / dimension;
    let denominator = F::from(num_nodes).unwrap();
    let mut new_nodes = vec![F::zero(); dimension * (num_nodes + 1)];
    new_nodes[..dimension].copy_from_slice(&nodes[..dimension]);
    new_nodes[num_nodes * dimension..].copy_from_slice(&nodes[(num_nodes - 1) * dimension..]);
    for i in 1..num_nodes {
        let weight = F::from(i).unwrap();
        for k in 0..dimension {
            new_nodes[i * dimension + k] = (weight * nodes[(i - 1) * dimension + k]
                + (denominator - weight) * nodes[i * dimension + k])
                / denominator;
        }
    }
    new_nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // A cubic with no special symmetry, used throughout.
    fn cubic() -> Vec<f64> {
        vec![0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0]
    }

    #[test]
    fn test_evaluate_multi_endpoints() {
        let nodes = cubic();
        let evaluated = evaluate_multi(2, &nodes, &[0.0, 1.0]);
        assert_eq!(&evaluated[..2], &nodes[..2]);
        assert_eq!(&evaluated[2..], &nodes[6..]);
    }

    #[test]
    fn test_evaluate_multi_quadratic_midpoint() {
        let nodes = vec![0.0, 0.0, 1.0, 2.0, 2.0, 0.0];
        let evaluated = evaluate_multi(2, &nodes, &[0.5]);
        assert_relative_eq!(evaluated[0], 1.0, epsilon = 1e-15);
        assert_relative_eq!(evaluated[1], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_evaluate_barycentric_matches_multi() {
        let nodes = cubic();
        let params = [0.125, 0.375, 0.875];
        let lambda1: Vec<f64> = params.iter().map(|s| 1.0 - s).collect();
        let by_weights = evaluate_curve_barycentric(2, &nodes, &lambda1, &params);
        let by_params = evaluate_multi(2, &nodes, &params);
        for (a, b) in by_weights.iter().zip(by_params.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_evaluate_high_degree() {
        // Degree 9 on a straight line: B(s) must stay on the line and hit
        // the parameter linearly, independent of the binomial recurrence.
        let mut nodes = Vec::new();
        for i in 0..10 {
            nodes.push(i as f64);
            nodes.push(2.0 * i as f64);
        }
        let evaluated = evaluate_multi(2, &nodes, &[0.3]);
        assert_relative_eq!(evaluated[0], 2.7, epsilon = 1e-12);
        assert_relative_eq!(evaluated[1], 5.4, epsilon = 1e-12);
    }

    #[test]
    fn test_evaluate_3d() {
        let nodes = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let evaluated = evaluate_multi(3, &nodes, &[0.25]);
        assert_relative_eq!(evaluated[0], 0.25, epsilon = 1e-15);
        assert_relative_eq!(evaluated[1], 0.25, epsilon = 1e-15);
        assert_relative_eq!(evaluated[2], 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_hodograph_matches_finite_difference() {
        let nodes = cubic();
        let s = 0.4;
        let dt = 1e-7;
        let derivative = evaluate_hodograph(2, &nodes, s);
        let ahead = evaluate_multi(2, &nodes, &[s + dt]);
        let here = evaluate_multi(2, &nodes, &[s]);
        for k in 0..2 {
            let estimate = (ahead[k] - here[k]) / dt;
            assert_relative_eq!(derivative[k], estimate, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hodograph_degree_drop() {
        // Hodograph of a line is the constant k·(P1 - P0).
        let nodes = vec![1.0, 1.0, 4.0, 3.0];
        let derivative = evaluate_hodograph(2, &nodes, 0.7);
        assert_relative_eq!(derivative[0], 3.0, epsilon = 1e-15);
        assert_relative_eq!(derivative[1], 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_subdivide_shared_node() {
        let nodes = cubic();
        let (left, right) = subdivide_nodes(2, &nodes);
        assert_eq!(left.len(), nodes.len());
        assert_eq!(right.len(), nodes.len());
        // Shared node is the curve midpoint.
        assert_eq!(&left[6..], &right[..2]);
        assert_relative_eq!(left[6], 2.0, epsilon = 1e-15);
        assert_relative_eq!(left[7], 1.625, epsilon = 1e-15);
    }

    #[test]
    fn test_subdivide_halves_reproduce_curve() {
        let nodes = cubic();
        let (left, right) = subdivide_nodes(2, &nodes);
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let parent_lo = evaluate_multi(2, &nodes, &[0.5 * u]);
            let from_left = evaluate_multi(2, &left, &[u]);
            let parent_hi = evaluate_multi(2, &nodes, &[0.5 * (1.0 + u)]);
            let from_right = evaluate_multi(2, &right, &[u]);
            for k in 0..2 {
                assert_relative_eq!(parent_lo[k], from_left[k], epsilon = 1e-13);
                assert_relative_eq!(parent_hi[k], from_right[k], epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_subdivide_generic_matches_closed_form() {
        // Elevate a cubic to degree 5 so the generic path runs, then
        // compare against the closed-form split of the original.
        let nodes = cubic();
        let elevated = elevate_nodes(2, &elevate_nodes(2, &nodes));
        let (left, right) = subdivide_nodes(2, &elevated);
        assert_eq!(left.len(), 12);
        for i in 0..=8 {
            let u = i as f64 / 8.0;
            let parent = evaluate_multi(2, &nodes, &[0.5 * u]);
            let child = evaluate_multi(2, &left, &[u]);
            assert_relative_eq!(parent[0], child[0], epsilon = 1e-12);
            assert_relative_eq!(parent[1], child[1], epsilon = 1e-12);
        }
        let tail = evaluate_multi(2, &right, &[1.0]);
        assert_relative_eq!(tail[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(tail[1], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_subdivide_linear() {
        let nodes = vec![0.0, 0.0, 2.0, 4.0];
        let (left, right) = subdivide_nodes(2, &nodes);
        assert_eq!(left, vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(right, vec![1.0, 2.0, 2.0, 4.0]);
    }

    #[test]
    fn test_specialize_identity() {
        let nodes = cubic();
        let same = specialize_curve(2, &nodes, 0.0, 1.0);
        for (a, b) in same.iter().zip(nodes.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_specialize_matches_reparameterized_evaluation() {
        let nodes = cubic();
        let (start, end) = (0.25, 0.75);
        let special = specialize_curve(2, &nodes, start, end);
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let direct = evaluate_multi(2, &nodes, &[start + u * (end - start)]);
            let via_arc = evaluate_multi(2, &special, &[u]);
            assert_relative_eq!(direct[0], via_arc[0], epsilon = 1e-13);
            assert_relative_eq!(direct[1], via_arc[1], epsilon = 1e-13);
        }
    }

    #[test]
    fn test_specialize_generic_degree() {
        let nodes = cubic();
        let elevated = elevate_nodes(2, &elevate_nodes(2, &nodes));
        let special = specialize_curve(2, &elevated, 0.125, 0.625);
        for i in 0..=8 {
            let u = i as f64 / 8.0;
            let direct = evaluate_multi(2, &nodes, &[0.125 + u * 0.5]);
            let via_arc = evaluate_multi(2, &special, &[u]);
            assert_relative_eq!(direct[0], via_arc[0], epsilon = 1e-12);
            assert_relative_eq!(direct[1], via_arc[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_specialize_reversed_interval() {
        let nodes = vec![0.0, 0.0, 1.0, 2.0, 2.0, 0.0];
        let reversed = specialize_curve(2, &nodes, 1.0, 0.0);
        let forward = evaluate_multi(2, &nodes, &[0.75]);
        let backward = evaluate_multi(2, &reversed, &[0.25]);
        assert_relative_eq!(forward[0], backward[0], epsilon = 1e-14);
        assert_relative_eq!(forward[1], backward[1], epsilon = 1e-14);
    }

    #[test]
    fn test_map_interval() {
        let (true_start, true_end) = map_interval((0.5, 1.0), 0.25, 0.75);
        assert_relative_eq!(true_start, 0.625, epsilon = 1e-15);
        assert_relative_eq!(true_end, 0.875, epsilon = 1e-15);
    }

    #[test]
    fn test_elevate_preserves_curve() {
        let nodes = vec![0.0, 0.0, 1.0, 2.0, 2.0, 0.0];
        let elevated = elevate_nodes(2, &nodes);
        assert_eq!(elevated.len(), 8);
        for i in 0..=100 {
            let u = i as f64 / 100.0;
            let before = evaluate_multi(2, &nodes, &[u]);
            let after = evaluate_multi(2, &elevated, &[u]);
            for k in 0..2 {
                assert!((before[k] - after[k]).abs() <= 1e-12);
            }
        }
    }

    #[test]
    fn test_elevate_endpoints_fixed() {
        let nodes = cubic();
        let elevated = elevate_nodes(2, &nodes);
        assert_eq!(&elevated[..2], &nodes[..2]);
        assert_eq!(&elevated[8..], &nodes[6..]);
    }
}
