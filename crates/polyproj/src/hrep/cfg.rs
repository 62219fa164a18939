//! Tolerance defaults shared across the crate.
//!
//! Policy
//! - Every operation that takes a tolerance also accepts a caller override;
//!   these constants are only the defaults.

/// Zero test for elimination coefficients and the invertibility check.
pub const DEFAULT_TOL: f64 = 1e-12;
/// Membership slack used by `HRep::contains_eps` callers and vertex feasibility.
pub const FEAS_EPS: f64 = 1e-9;
/// Threshold for “near-active” inequalities when grouping vertices into facets.
pub(crate) const TIGHT_EPS: f64 = 1e-7;
