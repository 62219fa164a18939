//! Linear system `A x <= b` with explicit variable labels.

use std::collections::BTreeSet;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use super::error::HrepError;

/// Right-hand side in either accepted layout.
///
/// Both forms are normalized to a flat vector at construction; `HRep::b_column`
/// hands the `m×1` layout back out for downstream consumers.
#[derive(Clone, Debug)]
pub enum Rhs {
    Flat(DVector<f64>),
    Column(DMatrix<f64>),
}

impl Rhs {
    /// Flatten to length `m`, rejecting anything but `(m,)` or `(m, 1)`.
    pub fn into_flat(self, m: usize) -> Result<DVector<f64>, HrepError> {
        self.flatten("b", m)
    }

    pub(crate) fn flatten(self, what: &'static str, m: usize) -> Result<DVector<f64>, HrepError> {
        let found = match self {
            Rhs::Flat(b) if b.len() == m => return Ok(b),
            Rhs::Flat(b) => format!("({},)", b.len()),
            Rhs::Column(b) if b.nrows() == m && b.ncols() == 1 => {
                return Ok(b.column(0).into_owned())
            }
            Rhs::Column(b) if m == 0 && b.is_empty() => return Ok(DVector::zeros(0)),
            Rhs::Column(b) => format!("({}, {})", b.nrows(), b.ncols()),
        };
        Err(HrepError::shape(what, format!("({m},) or ({m}, 1)"), found))
    }
}

impl From<DVector<f64>> for Rhs {
    fn from(b: DVector<f64>) -> Self {
        Rhs::Flat(b)
    }
}

impl From<DMatrix<f64>> for Rhs {
    fn from(b: DMatrix<f64>) -> Self {
        Rhs::Column(b)
    }
}

impl From<Vec<f64>> for Rhs {
    fn from(b: Vec<f64>) -> Self {
        Rhs::Flat(DVector::from_vec(b))
    }
}

impl From<&[f64]> for Rhs {
    fn from(b: &[f64]) -> Self {
        Rhs::Flat(DVector::from_column_slice(b))
    }
}

/// H-representation `{x | A x <= b}`.
///
/// Invariants:
/// - `b.len() == a.nrows()` and `labels.len() == a.ncols()`.
/// - `labels[j]` is the original-variable label of column `j`; labels are
///   unique. Eliminations that drop a column drop its label with it, so the
///   meaning of a column never depends on positional bookkeeping.
/// - Never mutated in place by the transformations; each returns a new system.
#[derive(Clone, Debug, PartialEq)]
pub struct HRep {
    a: DMatrix<f64>,
    b: DVector<f64>,
    labels: Vec<usize>,
}

impl HRep {
    /// Validate shapes; columns are labelled `0..n`.
    pub fn new(a: DMatrix<f64>, b: impl Into<Rhs>) -> Result<Self, HrepError> {
        let b = b.into().into_flat(a.nrows())?;
        let labels = (0..a.ncols()).collect();
        Ok(Self { a, b, labels })
    }

    /// Like `new`, with caller-provided column labels.
    pub fn with_labels(
        a: DMatrix<f64>,
        b: impl Into<Rhs>,
        labels: Vec<usize>,
    ) -> Result<Self, HrepError> {
        let mut sys = Self::new(a, b)?;
        if labels.len() != sys.dim() {
            return Err(HrepError::shape(
                "labels",
                format!("({},)", sys.dim()),
                format!("({},)", labels.len()),
            ));
        }
        let mut seen = BTreeSet::new();
        for &label in &labels {
            if !seen.insert(label) {
                return Err(HrepError::DuplicateLabel { label });
            }
        }
        sys.labels = labels;
        Ok(sys)
    }

    /// Build from row-major coefficients (`m*n` values) and `m` right-hand sides.
    pub fn from_row_slice(n: usize, a: &[f64], b: &[f64]) -> Result<Self, HrepError> {
        let m = b.len();
        if a.len() != m * n {
            return Err(HrepError::shape(
                "A",
                format!("({m}, {n}) = {} values", m * n),
                format!("{} values", a.len()),
            ));
        }
        Self::new(DMatrix::from_row_slice(m, n, a), b)
    }

    /// System with no rows in `n` variables (all of R^n).
    pub fn unconstrained(n: usize) -> Self {
        Self {
            a: DMatrix::zeros(0, n),
            b: DVector::zeros(0),
            labels: (0..n).collect(),
        }
    }

    /// Assemble from parts the caller already knows to be consistent.
    pub(crate) fn from_parts(a: DMatrix<f64>, b: DVector<f64>, labels: Vec<usize>) -> Self {
        debug_assert_eq!(a.nrows(), b.len());
        debug_assert_eq!(a.ncols(), labels.len());
        Self { a, b, labels }
    }

    #[inline]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }
    #[inline]
    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }
    /// Right-hand side as an `m×1` matrix.
    pub fn b_column(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.b.len(), 1, self.b.as_slice())
    }
    #[inline]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
    #[inline]
    pub fn nrows(&self) -> usize {
        self.a.nrows()
    }
    /// Number of columns (current dimensionality).
    #[inline]
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }
    #[inline]
    pub fn is_empty_rows(&self) -> bool {
        self.a.nrows() == 0
    }

    /// Current column of the variable carrying `label`.
    pub fn column_of(&self, label: usize) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Row `i` as `(coefficients, rhs)`.
    pub fn row(&self, i: usize) -> (Vec<f64>, f64) {
        (self.a.row(i).iter().copied().collect(), self.b[i])
    }

    pub fn into_parts(self) -> (DMatrix<f64>, DVector<f64>, Vec<usize>) {
        (self.a, self.b, self.labels)
    }

    /// Same system with labels reset to `0..n`.
    pub fn relabeled(mut self) -> Self {
        self.labels = (0..self.dim()).collect();
        self
    }

    /// Per-row slack `b - A x`. Panics if `x.len() != dim()`.
    pub fn slack(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.b - &self.a * x
    }

    /// Membership with slack: every row satisfies `a_i·x <= b_i + eps`.
    pub fn contains_eps(&self, x: &DVector<f64>, eps: f64) -> bool {
        self.slack(x).iter().all(|&s| s >= -eps)
    }
}

impl fmt::Display for HRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty_rows() {
            return write!(f, "(no constraints in {} variables)", self.dim());
        }
        for i in 0..self.nrows() {
            let mut first = true;
            for (j, &label) in self.labels.iter().enumerate() {
                let c = self.a[(i, j)];
                if c == 0.0 {
                    continue;
                }
                if first {
                    write!(f, "{c} x{label}")?;
                    first = false;
                } else if c < 0.0 {
                    write!(f, " - {} x{label}", -c)?;
                } else {
                    write!(f, " + {c} x{label}")?;
                }
            }
            if first {
                write!(f, "0")?;
            }
            writeln!(f, " <= {}", self.b[i])?;
        }
        Ok(())
    }
}
