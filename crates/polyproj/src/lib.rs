//! Polyhedral projection and affine images in H-representation.
//!
//! Modules
//! - `hrep`: the `HRep` container (`A x <= b` with column labels), tolerances.
//! - `fm`: Fourier–Motzkin elimination and multi-variable projection.
//! - `affine`: images of polyhedra under affine maps (two paths).
//! - `polar`: polar cones by transpose.
//! - `interval`: reading a 1-D system back as an interval.
//! - `viz`: plot-ready figures for 2-D and 3-D systems, SVG output.
//! - `sample`: reproducible random systems for tests, benches, and demos.
//!
//! API Policy
//! - Internal crate; breaking changes are fine when they improve clarity.
//! - `api` is the curated surface; `prelude` covers the common imports.

pub mod affine;
pub mod api;
pub mod fm;
pub mod hrep;
pub mod interval;
pub mod polar;
pub mod sample;
mod util;
pub mod viz;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use hrep::{HRep, HrepError, Rhs};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::affine::{image, image_invertible, image_via_projection, AffineMap, ImagePath};
    pub use crate::fm::{eliminate, eliminate_label, project_onto, project_out, FmCfg};
    pub use crate::hrep::cfg::{DEFAULT_TOL, FEAS_EPS};
    pub use crate::hrep::{HRep, HrepError, Rhs};
    pub use crate::interval::Interval1;
    pub use nalgebra::{DMatrix, DVector};
}
