//! Affine images `{M x + t | A x <= b}` of H-represented polyhedra.
//!
//! Two paths
//! - `image_invertible`: square, non-singular `M`. Substitute
//!   `x = M^{-1}(y - t)` to get `(A M^{-1}) y <= b + (A M^{-1}) t`. Exact
//!   algebra, no row growth; prefer it whenever it applies.
//! - `image_via_projection`: any `M` (p×n). Lift to `(x, y)` with
//!   `A x <= b`, `-M x + y <= t`, `M x - y <= -t` (so `y = M x + t`), then
//!   eliminate every `x` label with Fourier–Motzkin.
//!
//! `image` picks the invertible path when it can and falls back otherwise.

use nalgebra::{DMatrix, DVector};

use crate::fm::{project_out, EliminationStats, FmCfg};
use crate::hrep::{HRep, HrepError, Rhs};

/// Affine map `y = M x + t` with `M` of shape p×n and `t` of length p.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineMap {
    m: DMatrix<f64>,
    t: DVector<f64>,
}

impl AffineMap {
    /// Validate `t` against `m.nrows()`; `t` may be flat or `p×1`.
    pub fn new(m: DMatrix<f64>, t: impl Into<Rhs>) -> Result<Self, HrepError> {
        let t = t.into().flatten("d", m.nrows())?;
        Ok(Self { m, t })
    }
    /// Linear map (zero offset).
    pub fn linear(m: DMatrix<f64>) -> Self {
        let t = DVector::zeros(m.nrows());
        Self { m, t }
    }
    pub fn identity(n: usize) -> Self {
        Self::linear(DMatrix::identity(n, n))
    }
    #[inline]
    pub fn m(&self) -> &DMatrix<f64> {
        &self.m
    }
    #[inline]
    pub fn t(&self) -> &DVector<f64> {
        &self.t
    }
    /// n (dimension of x).
    #[inline]
    pub fn in_dim(&self) -> usize {
        self.m.ncols()
    }
    /// p (dimension of y).
    #[inline]
    pub fn out_dim(&self) -> usize {
        self.m.nrows()
    }
    /// `M x + t`. Panics if `x.len() != in_dim()`.
    pub fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.m * x + &self.t
    }
}

/// Row-count diagnostics for the projection path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffineImageStats {
    pub n_x_eliminated: usize,
    pub n_constraints_initial: usize,
    pub n_constraints_final: usize,
    pub steps: Vec<EliminationStats>,
}

/// Which path `image` took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImagePath {
    Invertible,
    Projection,
}

/// Image under a square invertible map.
///
/// Fails with `Shape` unless `M` is n×n (n = `sys.dim()`), and with
/// `SingularMap` when `|det M| <= tol`; callers should then use
/// `image_via_projection`. Output labels are `0..n` (y-coordinates).
pub fn image_invertible(sys: &HRep, map: &AffineMap, tol: f64) -> Result<HRep, HrepError> {
    let n = sys.dim();
    if map.m().shape() != (n, n) {
        return Err(HrepError::shape(
            "D",
            format!("({n}, {n})"),
            format!("({}, {})", map.out_dim(), map.in_dim()),
        ));
    }
    let det = map.m().determinant();
    if det.abs() <= tol {
        return Err(HrepError::SingularMap { det, tol });
    }
    let minv = map
        .m()
        .clone()
        .try_inverse()
        .ok_or(HrepError::SingularMap { det, tol })?;
    let a_y = sys.a() * &minv;
    let b_y = sys.b() + &a_y * map.t();
    tracing::debug!(rows = sys.nrows(), n, "affine_image_invertible");
    Ok(HRep::from_parts(a_y, b_y, (0..n).collect()))
}

/// Image under any map, via lifting and Fourier–Motzkin.
///
/// Fails with `Shape` if `M` has a column count other than `sys.dim()`,
/// before any elimination. Output labels are `0..p`.
pub fn image_via_projection(
    sys: &HRep,
    map: &AffineMap,
    tol: f64,
) -> Result<(HRep, AffineImageStats), HrepError> {
    let n = sys.dim();
    let p = map.out_dim();
    if map.in_dim() != n {
        return Err(HrepError::shape(
            "D",
            format!("({p}, {n})"),
            format!("({p}, {})", map.in_dim()),
        ));
    }
    let lifted = lift(sys, map);
    let n_constraints_initial = lifted.nrows();

    let cfg = FmCfg {
        tol,
        drop_column: true,
        normalize: true,
    };
    let x_labels: Vec<usize> = (0..n).collect();
    let (img, steps) = project_out(lifted, &x_labels, cfg)?;
    // x-labels lead the lifted columns, so each one is at column 0 on its turn.
    debug_assert!(steps.iter().all(|s| s.eliminated_index == 0));

    let stats = AffineImageStats {
        n_x_eliminated: n,
        n_constraints_initial,
        n_constraints_final: img.nrows(),
        steps,
    };
    tracing::debug!(
        n_x = n,
        p,
        rows_initial = stats.n_constraints_initial,
        rows_final = stats.n_constraints_final,
        "affine_image_projection"
    );
    Ok((img.relabeled(), stats))
}

/// Prefer the invertible path; fall back to projection.
pub fn image(sys: &HRep, map: &AffineMap, tol: f64) -> Result<(HRep, ImagePath), HrepError> {
    match image_invertible(sys, map, tol) {
        Ok(img) => Ok((img, ImagePath::Invertible)),
        Err(HrepError::SingularMap { .. }) | Err(HrepError::Shape { .. }) => {
            let (img, _) = image_via_projection(sys, map, tol)?;
            Ok((img, ImagePath::Projection))
        }
        Err(e) => Err(e),
    }
}

/// Graph of the map over `sys` in `(x, y)`, labels `0..n+p`.
fn lift(sys: &HRep, map: &AffineMap) -> HRep {
    let (m, n, p) = (sys.nrows(), sys.dim(), map.out_dim());
    let mut a = DMatrix::zeros(m + 2 * p, n + p);
    a.view_mut((0, 0), (m, n)).copy_from(sys.a());
    a.view_mut((m, 0), (p, n)).copy_from(&(-map.m()));
    a.view_mut((m, n), (p, p)).fill_with_identity();
    a.view_mut((m + p, 0), (p, n)).copy_from(map.m());
    a.view_mut((m + p, n), (p, p))
        .copy_from(&(-DMatrix::<f64>::identity(p, p)));

    let mut b = DVector::zeros(m + 2 * p);
    b.rows_mut(0, m).copy_from(sys.b());
    b.rows_mut(m, p).copy_from(map.t());
    b.rows_mut(m + p, p).copy_from(&(-map.t()));
    HRep::from_parts(a, b, (0..n + p).collect())
}
