//! H-representations (`A x <= b`) as strongly-typed dense systems.
//!
//! Purpose
//! - One owned container (`HRep`) shared by elimination, affine images, polar
//!   cones, the 1-D interval reader, and rendering.
//! - Shapes are validated once, at construction; downstream code never
//!   reshapes or guesses layouts.
//!
//! Conventions
//! - Rows are inequalities `a_i·x <= b_i`; no normalization is imposed.
//! - Columns carry original-variable labels (see `HRep::labels`).
//! - Tolerances default to the constants in `cfg`.

pub mod cfg;
mod error;
mod types;

pub use error::HrepError;
pub use types::{HRep, Rhs};

#[cfg(test)]
mod tests;
