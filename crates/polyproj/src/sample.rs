//! Reproducible random systems and sample points.
//!
//! Purpose
//! - Feed property tests, benchmarks, and the CLI `demo` command with small
//!   bounded systems that always contain the origin.
//!
//! Model
//! - Axis box `|x_j| <= radius`, then `extra` halfspaces `u·x <= c` with
//!   `u` a random unit direction and `c ∈ [radius/2, radius]`.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG, so
//!   the i-th system of a stream can be regenerated on its own.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hrep::HRep;

/// Replay token for `random_bounded_system`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemToken {
    pub seed: u64,
    pub index: u64,
}

impl SystemToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// RNG seeded from both fields (SplitMix64 finalizer).
    pub fn rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the next system in the same stream.
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }
}

/// Bounded system in `n` variables with `2n + extra` rows; contains the origin
/// with slack at least `radius / 2` on every row.
///
/// `radius` is clamped to at least `1e-9`.
pub fn random_bounded_system(n: usize, extra: usize, radius: f64, tok: SystemToken) -> HRep {
    let r = radius.max(1e-9);
    let mut rng = tok.rng();
    let m = 2 * n + extra;
    let mut a = DMatrix::zeros(m, n);
    let mut b = DVector::from_element(m, r);
    for j in 0..n {
        a[(j, j)] = 1.0;
        a[(n + j, j)] = -1.0;
    }
    for i in 2 * n..m {
        let u = random_unit(&mut rng, n);
        a.row_mut(i).copy_from(&u.transpose());
        b[i] = rng.gen_range(0.5..=1.0) * r;
    }
    HRep::from_parts(a, b, (0..n).collect())
}

/// Uniform points in the box `[lo, hi]^n`.
pub fn sample_points<R: Rng>(
    rng: &mut R,
    lo: f64,
    hi: f64,
    n: usize,
    count: usize,
) -> Vec<DVector<f64>> {
    (0..count)
        .map(|_| DVector::from_fn(n, |_, _| rng.gen_range(lo..=hi)))
        .collect()
}

/// Random unit vector: uniform cube sample, normalized. Only near-zero draws
/// are rejected, so the expected number of draws stays ~1 in any dimension.
fn random_unit<R: Rng>(rng: &mut R, n: usize) -> DVector<f64> {
    if n == 0 {
        return DVector::zeros(0);
    }
    loop {
        let v = DVector::from_fn(n, |_, _| rng.gen_range(-1.0..=1.0));
        let norm = v.norm();
        if norm > 1e-3 {
            return v / norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn systems_replay_from_token() {
        let tok = SystemToken::new(7, 3);
        let s1 = random_bounded_system(3, 5, 2.0, tok);
        let s2 = random_bounded_system(3, 5, 2.0, tok);
        assert_eq!(s1, s2);
        let s3 = random_bounded_system(3, 5, 2.0, tok.next());
        assert_ne!(s1, s3);
        assert_eq!((s1.nrows(), s1.dim()), (11, 3));
    }

    #[test]
    fn origin_is_strictly_inside() {
        let mut tok = SystemToken::new(42, 0);
        for _ in 0..20 {
            let sys = random_bounded_system(2, 6, 1.5, tok);
            let slack = sys.slack(&DVector::zeros(2));
            assert!(slack.iter().all(|&s| s >= 0.75 - 1e-12));
            tok = tok.next();
        }
    }

    #[test]
    fn extra_rows_are_unit_directions() {
        let sys = random_bounded_system(4, 8, 1.0, SystemToken::new(1, 1));
        for i in 8..16 {
            let norm = sys.a().row(i).norm();
            assert!((norm - 1.0).abs() < 1e-12, "row {i} norm {norm}");
        }
    }

    #[test]
    fn high_dimensional_systems_build() {
        for n in [24, 48] {
            let sys = random_bounded_system(n, 3, 1.0, SystemToken::new(0, 0));
            assert_eq!((sys.nrows(), sys.dim()), (2 * n + 3, n));
            for i in 2 * n..2 * n + 3 {
                assert!((sys.a().row(i).norm() - 1.0).abs() < 1e-12);
            }
            assert!(sys.contains_eps(&DVector::zeros(n), 0.0));
        }
    }

    #[test]
    fn points_stay_in_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let pts = sample_points(&mut rng, -2.0, 3.0, 3, 50);
        assert_eq!(pts.len(), 50);
        assert!(pts
            .iter()
            .all(|p| p.len() == 3 && p.iter().all(|v| (-2.0..=3.0).contains(v))));
    }
}
