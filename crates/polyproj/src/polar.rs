//! Polar cones by duality (no elimination involved).
//!
//! For `K = cone(G)` (columns of `G` generate `K`):
//!   `K° = {y | yᵀg <= 0 for all generators g} = {y | Gᵀ y <= 0}`.
//! For `K = {x | A x <= 0}`:
//!   `K° = cone(Aᵀ)`.
//! Both hold exactly, so `(K°)° = K` is a transpose identity.
//!
//! Precondition (not checked): inputs describe cones through the origin. A
//! polyhedron with a non-zero offset `b` must not be passed as `A`.

use nalgebra::{DMatrix, DVector};

use crate::hrep::HRep;

/// H-representation of the polar of `cone(G)`: `A = Gᵀ`, `b = 0`.
///
/// `G` is n×r; the result has r rows in n variables.
pub fn polar_hrep_from_generators(g: &DMatrix<f64>) -> HRep {
    let a = g.transpose();
    let b = DVector::zeros(a.nrows());
    let labels = (0..a.ncols()).collect();
    HRep::from_parts(a, b, labels)
}

/// Generators of the polar of `{x | A x <= 0}`: `G = Aᵀ` (columns are rays).
pub fn polar_generators_from_hrep(a: &DMatrix<f64>) -> DMatrix<f64> {
    a.transpose()
}
