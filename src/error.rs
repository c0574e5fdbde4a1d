//! Error types for intersection operations.

use thiserror::Error;

/// Errors reported by the curve intersector and its Newton refinements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntersectError {
    /// The caller's output buffer cannot hold every intersection.
    #[error("output buffer too small: {required} intersections found")]
    InsufficientSpace {
        /// Number of slots the caller must provide on retry.
        required: usize,
    },

    /// Subdivision never reduced the candidate pairs to near-linear arcs.
    #[error("candidates not near-linear after {rounds} subdivision rounds")]
    NoConverge {
        /// Number of subdivision rounds attempted.
        rounds: usize,
    },

    /// The candidate set blew up combinatorially, a symptom of curves that
    /// are near-coincident or meet in a non-simple configuration.
    #[error("{count} candidate pairs still overlap after subdivision")]
    TooManyCandidates {
        /// Candidate pairs alive when the cap was hit.
        count: usize,
    },

    /// Newton iteration matched neither a simple-root nor a double-root
    /// convergence pattern within its iteration budget.
    #[error("newton refinement converged to neither a simple nor a double root")]
    BadMultiplicity,

    /// The 2x2 Jacobian of the curve-pair system is singular.
    #[error("singular jacobian in curve-pair newton step")]
    Singular,
}
