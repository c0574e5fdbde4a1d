//! Coincident-arc detection.
//!
//! When subdivision blows up instead of isolating crossings, the two
//! curves are suspected of sharing an arc of a common curve. Both are
//! elevated to a common degree, each curve's endpoints are located on
//! the other, and the candidate shared arc implied by the located
//! parameters is verified by specializing and comparing control nodes.

use crate::curve::{elevate_nodes, locate_point, specialize_curve, PointLocation};

use super::{vectors_close, wiggle_interval};

/// Returns the parameter pairs of the shared arc's endpoints, or `None`
/// when the curves are not coincident.
pub(crate) fn coincident_parameters(first: &[f64], second: &[f64]) -> Option<[(f64, f64); 2]> {
    let mut nodes1 = first.to_vec();
    let mut nodes2 = second.to_vec();
    while nodes1.len() < nodes2.len() {
        nodes1 = elevate_nodes(2, &nodes1);
    }
    while nodes2.len() < nodes1.len() {
        nodes2 = elevate_nodes(2, &nodes2);
    }
    let num_nodes = nodes1.len() / 2;

    let s_initial = locate_param(&nodes1, &nodes2[..2]);
    let s_final = locate_param(&nodes1, &nodes2[(num_nodes - 1) * 2..]);

    if let (Some(si), Some(sf)) = (s_initial, s_final) {
        // Both endpoints of the second curve sit on the first: if the
        // curves are coincident, the second is wholly contained.
        if si == sf {
            return None;
        }
        let specialized = specialize_curve(2, &nodes1, si, sf);
        return if vectors_close(&specialized, &nodes2) {
            Some([(si, 0.0), (sf, 1.0)])
        } else {
            None
        };
    }

    let t_initial = locate_param(&nodes2, &nodes1[..2]);
    let t_final = locate_param(&nodes2, &nodes1[(num_nodes - 1) * 2..]);

    if let (Some(ti), Some(tf)) = (t_initial, t_final) {
        if ti == tf {
            return None;
        }
        let specialized = specialize_curve(2, &nodes2, ti, tf);
        return if vectors_close(&specialized, &nodes1) {
            Some([(0.0, ti), (1.0, tf)])
        } else {
            None
        };
    }

    // A shared arc has two endpoints. With at most one parameter found
    // on each curve, the only remaining configurations pair one
    // endpoint of each curve; anything else cannot be coincident.
    match (s_initial, s_final, t_initial, t_final) {
        (Some(si), None, Some(ti), None) => {
            // Arc between the two start points, traversed in opposite
            // directions.
            if si == 0.0 || ti == 0.0 {
                return None;
            }
            let arc1 = specialize_curve(2, &nodes1, 0.0, si);
            let arc2 = specialize_curve(2, &nodes2, ti, 0.0);
            if vectors_close(&arc1, &arc2) {
                Some([(0.0, ti), (si, 0.0)])
            } else {
                None
            }
        }
        (Some(si), None, None, Some(tf)) => {
            // From the second curve's start to the first curve's end.
            if si == 1.0 || tf == 0.0 {
                return None;
            }
            let arc1 = specialize_curve(2, &nodes1, si, 1.0);
            let arc2 = specialize_curve(2, &nodes2, 0.0, tf);
            if vectors_close(&arc1, &arc2) {
                Some([(si, 0.0), (1.0, tf)])
            } else {
                None
            }
        }
        (None, Some(sf), Some(ti), None) => {
            // From the first curve's start to the second curve's end.
            if sf == 0.0 || ti == 1.0 {
                return None;
            }
            let arc1 = specialize_curve(2, &nodes1, 0.0, sf);
            let arc2 = specialize_curve(2, &nodes2, ti, 1.0);
            if vectors_close(&arc1, &arc2) {
                Some([(0.0, ti), (sf, 1.0)])
            } else {
                None
            }
        }
        (None, Some(sf), None, Some(tf)) => {
            // Arc between the two end points, traversed in opposite
            // directions.
            if sf == 1.0 || tf == 1.0 {
                return None;
            }
            let arc1 = specialize_curve(2, &nodes1, sf, 1.0);
            let arc2 = specialize_curve(2, &nodes2, 1.0, tf);
            if vectors_close(&arc1, &arc2) {
                Some([(sf, 1.0), (1.0, tf)])
            } else {
                None
            }
        }
        _ => None,
    }
}

fn locate_param(nodes: &[f64], point: &[f64]) -> Option<f64> {
    match locate_point(2, nodes, point) {
        PointLocation::OnCurve(s) => wiggle_interval(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::evaluate_multi;

    #[test]
    fn test_identical_quadratics() {
        let nodes = vec![0.0, 0.0, 2.0, 2.0, 4.0, 0.0];
        let pairs = coincident_parameters(&nodes, &nodes).unwrap();
        assert!(pairs[0].0.abs() <= 1e-9);
        assert!(pairs[0].1.abs() <= 1e-9);
        assert!((pairs[1].0 - 1.0).abs() <= 1e-9);
        assert!((pairs[1].1 - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn test_mixed_degree_coincident() {
        // A quadratic against its own degree-elevated form.
        let nodes = vec![0.0, 0.0, 2.0, 2.0, 4.0, 0.0];
        let elevated = elevate_nodes(2, &nodes);
        let pairs = coincident_parameters(&nodes, &elevated).unwrap();
        assert!(pairs[0].0.abs() <= 1e-9);
        assert!((pairs[1].0 - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn test_staggered_arcs() {
        // Arcs [0, 0.75] and [0.5, 1.25] of one parent quadratic: the
        // shared piece runs from the second arc's start to the first
        // arc's end.
        let parent = vec![0.0, 0.0, 2.0, 2.0, 4.0, 0.0];
        let first = specialize_curve(2, &parent, 0.0, 0.75);
        let second = specialize_curve(2, &parent, 0.5, 1.25);
        let pairs = coincident_parameters(&first, &second).unwrap();
        // second(0) sits at 2/3 of first; first(1) sits at 1/3 of second.
        assert!((pairs[0].0 - 2.0 / 3.0).abs() <= 1e-9);
        assert!(pairs[0].1.abs() <= 1e-9);
        assert!((pairs[1].0 - 1.0).abs() <= 1e-9);
        assert!((pairs[1].1 - 1.0 / 3.0).abs() <= 1e-9);
    }

    #[test]
    fn test_same_curve_family_disjoint_arcs() {
        // Arcs [0, 0.4] and [0.6, 1.0] share the parent but no points.
        let parent = vec![0.0, 0.0, 2.0, 2.0, 4.0, 0.0];
        let first = specialize_curve(2, &parent, 0.0, 0.4);
        let second = specialize_curve(2, &parent, 0.6, 1.0);
        assert_eq!(coincident_parameters(&first, &second), None);
    }

    #[test]
    fn test_not_coincident_crossing_curves() {
        let first = vec![0.0, 0.0, 2.0, 4.0, 4.0, 0.0];
        let second = vec![0.0, 2.0, 2.0, -2.0, 4.0, 2.0];
        assert_eq!(coincident_parameters(&first, &second), None);
    }

    #[test]
    fn test_verified_pairs_evaluate_equal() {
        let parent = vec![0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 4.0, 4.0];
        let arc = specialize_curve(2, &parent, 0.125, 0.875);
        let pairs = coincident_parameters(&parent, &arc).unwrap();
        for &(s, t) in &pairs {
            let p1 = evaluate_multi(2, &parent, &[s]);
            let p2 = evaluate_multi(2, &arc, &[t]);
            assert!((p1[0] - p2[0]).hypot(p1[1] - p2[1]) <= 1e-9);
        }
    }
}
