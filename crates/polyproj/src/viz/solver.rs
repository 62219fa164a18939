//! Vertex computation as an injected capability.
//!
//! Rendering only needs “exact vertices of a full-dimensional polyhedron,
//! or nothing”. Callers can supply any `VertexSolver` (an LP + hull backend,
//! a fake in tests); `EnumerationSolver` is the dependency-free default.

use nalgebra::{DMatrix, DVector};

use crate::hrep::cfg::{DEFAULT_TOL, FEAS_EPS};
use crate::hrep::HRep;
use crate::util::{centroid, combinations, dedup_points_in_place};

/// Single-operation vertex capability.
pub trait VertexSolver {
    /// Vertices of `sys` if it is full-dimensional and vertices exist; `None`
    /// otherwise (empty, lower-dimensional, or undecidable by this solver).
    fn solve(&self, sys: &HRep) -> Option<Vec<DVector<f64>>>;
}

/// Vertex enumeration over all n-subsets of constraints.
///
/// Complexity: O(C(m, n)·n³). Acceptable for the small systems rendered here.
#[derive(Clone, Copy, Debug)]
pub struct EnumerationSolver {
    /// Subsets with `|det| <= eps_det` are skipped.
    pub eps_det: f64,
    /// Feasibility slack for candidate points and dedup radius.
    pub eps_feas: f64,
    /// Minimum normalized slack of the vertex centroid on every row.
    pub eps_interior: f64,
}

impl Default for EnumerationSolver {
    fn default() -> Self {
        Self {
            eps_det: DEFAULT_TOL,
            eps_feas: FEAS_EPS,
            eps_interior: 1e-9,
        }
    }
}

impl VertexSolver for EnumerationSolver {
    fn solve(&self, sys: &HRep) -> Option<Vec<DVector<f64>>> {
        let (m, n) = (sys.nrows(), sys.dim());
        if n == 0 || m < n {
            return None;
        }
        let mut verts = Vec::new();
        for comb in combinations(m, n) {
            let a = DMatrix::from_fn(n, n, |r, c| sys.a()[(comb[r], c)]);
            let rhs = DVector::from_fn(n, |r, _| sys.b()[comb[r]]);
            let lu = a.lu();
            if lu.determinant().abs() <= self.eps_det {
                continue;
            }
            let Some(x) = lu.solve(&rhs) else {
                continue;
            };
            if sys.contains_eps(&x, self.eps_feas) {
                verts.push(x);
            }
        }
        dedup_points_in_place(&mut verts, self.eps_feas);

        // Full-dimensional iff the vertex centroid has strict slack everywhere.
        let c = centroid(&verts)?;
        let slack = sys.slack(&c);
        for i in 0..m {
            let norm = sys.a().row(i).norm();
            if norm <= self.eps_det {
                if slack[i] < -self.eps_feas {
                    return None;
                }
                continue;
            }
            if slack[i] / norm <= self.eps_interior {
                return None;
            }
        }
        tracing::debug!(n, m, vertices = verts.len(), "enumerated vertices");
        Some(verts)
    }
}
