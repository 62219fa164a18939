//! Fourier–Motzkin elimination on `HRep` systems.
//!
//! Purpose
//! - Remove one variable from `A x <= b` so that the new system describes
//!   exactly the projection of the old feasible set onto the other variables.
//! - Serve as the engine behind the projection-based affine image.
//!
//! Algorithm (classical)
//! - Split rows by the sign of the coefficient on `x_k` (tolerance `tol`).
//! - Copy zero rows; combine every (negative, positive) pair so that `x_k`
//!   cancels: `a_jk·row_i − a_ik·row_j`. Output has `z + n_neg·n_pos` rows,
//!   the expected quadratic blow-up.
//! - Drop or zero the eliminated column, then optionally rescale each row by
//!   its max-abs coefficient (positive scaling keeps the feasible set).
//!
//! Conventions
//! - Intended for small, explanatory instances: no redundancy removal.
//! - In drop mode the column's label leaves with it; use `eliminate_label` to
//!   address variables by original label across repeated passes.

use nalgebra::{DMatrix, DVector};

use crate::hrep::cfg::DEFAULT_TOL;
use crate::hrep::{HRep, HrepError};

/// Elimination options.
#[derive(Clone, Copy, Debug)]
pub struct FmCfg {
    /// Coefficients with `|a_ik| <= tol` count as zero; also the floor for row rescaling.
    pub tol: f64,
    /// Remove the eliminated column (dimension shrinks) instead of zeroing it.
    pub drop_column: bool,
    /// Divide each output row (and rhs) by its max-abs coefficient.
    pub normalize: bool,
}

impl Default for FmCfg {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOL,
            drop_column: true,
            normalize: true,
        }
    }
}

/// Diagnostics for one elimination step. Purely informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EliminationStats {
    pub eliminated_index: usize,
    pub eliminated_label: usize,
    pub n_zero: usize,
    pub n_pos: usize,
    pub n_neg: usize,
    pub n_out: usize,
}

/// Eliminate the variable in column `k`.
///
/// Returns the projected system and step statistics. Fails with
/// `IndexOutOfRange` if `k >= sys.dim()`. A system without rows yields a
/// system without rows of the expected width.
pub fn eliminate(
    sys: HRep,
    k: usize,
    cfg: FmCfg,
) -> Result<(HRep, EliminationStats), HrepError> {
    let n = sys.dim();
    if k >= n {
        return Err(HrepError::IndexOutOfRange { index: k, dim: n });
    }
    let (a, b, mut labels) = sys.into_parts();
    let m = a.nrows();

    let mut zero = Vec::new();
    let mut pos = Vec::new();
    let mut neg = Vec::new();
    for i in 0..m {
        let c = a[(i, k)];
        if c.abs() <= cfg.tol {
            zero.push(i);
        } else if c > cfg.tol {
            pos.push(i);
        } else if c < -cfg.tol {
            neg.push(i);
        }
    }

    let out_cols = if cfg.drop_column { n - 1 } else { n };
    let out_rows = zero.len() + neg.len() * pos.len();
    let mut data: Vec<f64> = Vec::with_capacity(out_rows * out_cols);
    let mut rhs: Vec<f64> = Vec::with_capacity(out_rows);

    // Writes one output row from a per-column coefficient function.
    let mut push_row = |coef: &dyn Fn(usize) -> f64, r: f64| {
        for j in 0..n {
            if j == k {
                if !cfg.drop_column {
                    data.push(0.0);
                }
                continue;
            }
            data.push(coef(j));
        }
        rhs.push(r);
    };

    for &i in &zero {
        push_row(&|j: usize| a[(i, j)], b[i]);
    }
    for &i in &neg {
        let a_ik = a[(i, k)];
        for &j in &pos {
            let a_jk = a[(j, k)];
            push_row(
                &|col: usize| a_jk * a[(i, col)] - a_ik * a[(j, col)],
                a_jk * b[i] - a_ik * b[j],
            );
        }
    }
    debug_assert_eq!(rhs.len(), out_rows);

    if cfg.normalize && out_cols > 0 {
        for (row, r) in data.chunks_mut(out_cols).zip(rhs.iter_mut()) {
            let mut scale = row.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if scale <= cfg.tol {
                scale = 1.0;
            }
            for v in row.iter_mut() {
                *v /= scale;
            }
            *r /= scale;
        }
    }

    let eliminated_label = labels[k];
    if cfg.drop_column {
        labels.remove(k);
    }
    let stats = EliminationStats {
        eliminated_index: k,
        eliminated_label,
        n_zero: zero.len(),
        n_pos: pos.len(),
        n_neg: neg.len(),
        n_out: out_rows,
    };
    tracing::debug!(
        index = k,
        label = eliminated_label,
        n_zero = stats.n_zero,
        n_pos = stats.n_pos,
        n_neg = stats.n_neg,
        n_out = stats.n_out,
        "fm_eliminate"
    );

    let a_out = DMatrix::from_row_slice(out_rows, out_cols, &data);
    let b_out = DVector::from_vec(rhs);
    Ok((HRep::from_parts(a_out, b_out, labels), stats))
}

/// Eliminate the variable carrying original label `label`.
pub fn eliminate_label(
    sys: HRep,
    label: usize,
    cfg: FmCfg,
) -> Result<(HRep, EliminationStats), HrepError> {
    let k = sys
        .column_of(label)
        .ok_or(HrepError::UnknownLabel { label })?;
    eliminate(sys, k, cfg)
}

/// Eliminate each label in `labels`, in order.
pub fn project_out(
    sys: HRep,
    labels: &[usize],
    cfg: FmCfg,
) -> Result<(HRep, Vec<EliminationStats>), HrepError> {
    let mut cur = sys;
    let mut steps = Vec::with_capacity(labels.len());
    for &label in labels {
        let (next, stats) = eliminate_label(cur, label, cfg)?;
        steps.push(stats);
        cur = next;
    }
    Ok((cur, steps))
}

/// Eliminate every variable whose label is not in `keep`.
///
/// Surviving columns keep their relative order from `sys`, not the order of
/// `keep`. Fails with `UnknownLabel` if a kept label is absent.
pub fn project_onto(
    sys: HRep,
    keep: &[usize],
    cfg: FmCfg,
) -> Result<(HRep, Vec<EliminationStats>), HrepError> {
    if let Some(&label) = keep.iter().find(|l| sys.column_of(**l).is_none()) {
        return Err(HrepError::UnknownLabel { label });
    }
    let drop: Vec<usize> = sys
        .labels()
        .iter()
        .copied()
        .filter(|l| !keep.contains(l))
        .collect();
    project_out(sys, &drop, cfg)
}
