//! One-variable systems `a_i x <= b_i` read as an interval `[lo, hi]`.
//!
//! Infeasibility is a value, not an error: `Interval1::INFEASIBLE` is the
//! inverted interval `(+inf, -inf)`, so `lo > hi` detects it structurally.

use crate::hrep::{HRep, HrepError};

/// Closed interval with possibly infinite ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval1 {
    pub lo: f64,
    pub hi: f64,
}

impl Interval1 {
    pub const UNBOUNDED: Self = Self {
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    };
    pub const INFEASIBLE: Self = Self {
        lo: f64::INFINITY,
        hi: f64::NEG_INFINITY,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }
}

/// Fold `a_i x <= b_i` into `[lo, hi]`.
///
/// - `|a_i| <= tol` rows constrain nothing unless `b_i < -tol`, which makes the
///   whole system infeasible and returns `Interval1::INFEASIBLE` immediately.
/// - Pairs beyond the shorter of `a`, `b` are ignored.
/// - The result may still be empty (`lo > hi`) from contradicting bounds.
pub fn interval_1d(a: &[f64], b: &[f64], tol: f64) -> Interval1 {
    let mut out = Interval1::UNBOUNDED;
    for (&ai, &bi) in a.iter().zip(b) {
        if ai.abs() <= tol {
            if bi < -tol {
                return Interval1::INFEASIBLE;
            }
            continue;
        }
        let bound = bi / ai;
        if ai > 0.0 {
            out.hi = out.hi.min(bound);
        } else {
            out.lo = out.lo.max(bound);
        }
    }
    out
}

impl HRep {
    /// Interval of a one-column system. Fails with `Shape` for any other width.
    pub fn interval(&self, tol: f64) -> Result<Interval1, HrepError> {
        if self.dim() != 1 {
            return Err(HrepError::shape(
                "A",
                format!("({}, 1)", self.nrows()),
                format!("({}, {})", self.nrows(), self.dim()),
            ));
        }
        let a: Vec<f64> = self.a().column(0).iter().copied().collect();
        Ok(interval_1d(&a, self.b().as_slice(), tol))
    }
}
