//! Control-polygon algebra and point location.

mod algebra;
mod locate;

pub use algebra::{
    elevate_nodes, evaluate_curve_barycentric, evaluate_hodograph, evaluate_multi, map_interval,
    specialize_curve, subdivide_nodes,
};
pub use locate::{locate_point, newton_refine, PointLocation};
