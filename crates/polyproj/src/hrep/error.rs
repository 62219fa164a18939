//! Precondition failures for H-representation operations.

use std::fmt;

/// Errors surfaced by construction and transformation of linear systems.
///
/// All variants are local precondition violations; nothing here signals an
/// empty feasible set (that is a valid, representable output).
#[derive(Clone, Debug, PartialEq)]
pub enum HrepError {
    /// Matrix/vector dimensions inconsistent with the operation.
    Shape {
        what: &'static str,
        expected: String,
        found: String,
    },
    /// Column index outside `[0, dim)`.
    IndexOutOfRange { index: usize, dim: usize },
    /// No surviving column carries this original-variable label.
    UnknownLabel { label: usize },
    /// Label list contains the same label twice.
    DuplicateLabel { label: usize },
    /// `|det(M)|` at or below tolerance on the invertible affine path.
    SingularMap { det: f64, tol: f64 },
}

impl HrepError {
    pub(crate) fn shape(
        what: &'static str,
        expected: impl fmt::Display,
        found: impl fmt::Display,
    ) -> Self {
        Self::Shape {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl fmt::Display for HrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HrepError::Shape {
                what,
                expected,
                found,
            } => write!(f, "{what} must have shape {expected}, got {found}"),
            HrepError::IndexOutOfRange { index, dim } => {
                if *dim == 0 {
                    write!(f, "index {index} out of range: system has no variables")
                } else {
                    write!(f, "index {index} out of range: must be in [0, {}]", dim - 1)
                }
            }
            HrepError::UnknownLabel { label } => {
                write!(f, "no surviving variable carries label {label}")
            }
            HrepError::DuplicateLabel { label } => write!(f, "label {label} appears twice"),
            HrepError::SingularMap { det, tol } => write!(
                f,
                "map matrix appears singular (|det| = {:e} <= {tol:e}); use the projection-based affine image instead",
                det.abs()
            ),
        }
    }
}

impl std::error::Error for HrepError {}
