//! Curated internal API (UNSTABLE).
//!
//! One import path for the CLI and experiments. Breaking changes are allowed.

// Systems
pub use crate::hrep::cfg::{DEFAULT_TOL, FEAS_EPS};
pub use crate::hrep::{HRep, HrepError, Rhs};
// Elimination
pub use crate::fm::{
    eliminate, eliminate_label, project_onto, project_out, EliminationStats, FmCfg,
};
// Affine images
pub use crate::affine::{
    image, image_invertible, image_via_projection, AffineImageStats, AffineMap, ImagePath,
};
// Polar cones
pub use crate::polar::{polar_generators_from_hrep, polar_hrep_from_generators};
// 1-D read-back
pub use crate::interval::{interval_1d, Interval1};
// Rendering
pub use crate::viz::{
    render_svg, visualize, Boundary, EnumerationSolver, Facet, FeasibleMask, Figure, Planar,
    PlotCfg, PlotResult, Solid, VertexSolver, VizError,
};
// Random systems
pub use crate::sample::{random_bounded_system, sample_points, SystemToken};

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn curated_surface_covers_a_pipeline() {
        // square [-1, 1]^2, map (x, y) -> x + y, read back the interval
        let sys = random_bounded_system(2, 0, 1.0, SystemToken::new(1, 0));
        let map = AffineMap::linear(DMatrix::from_row_slice(1, 2, &[1.0, 1.0]));
        let (img, path) = image(&sys, &map, DEFAULT_TOL).unwrap();
        assert_eq!(path, ImagePath::Projection);
        let iv = img.interval(DEFAULT_TOL).unwrap();
        assert!((iv.lo + 2.0).abs() < 1e-12 && (iv.hi - 2.0).abs() < 1e-12);
    }
}
