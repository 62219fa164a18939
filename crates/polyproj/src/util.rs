//! Small utilities: index combinations and geometric dedup.

use std::cmp::Ordering;

use nalgebra::DVector;

/// k-subsets of `0..n` in lexicographic order. Empty for `k == 0` or `k > n`.
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }
    let mut idxs: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(idxs.clone());
        // rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            break;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
    out
}

/// Lexicographic sort, then drop neighbours closer than `tol`.
pub(crate) fn dedup_points_in_place(points: &mut Vec<DVector<f64>>, tol: f64) {
    if points.len() < 2 {
        return;
    }
    points.sort_by(|a, b| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    points.dedup_by(|a, b| (&*a - &*b).norm() < tol);
}

/// Mean of a non-empty point set.
pub(crate) fn centroid(points: &[DVector<f64>]) -> Option<DVector<f64>> {
    let first = points.first()?;
    let mut sum = DVector::zeros(first.len());
    for p in points {
        sum += p;
    }
    Some(sum / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn combinations_count_and_order() {
        let c = combinations(4, 2);
        assert_eq!(
            c,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(5, 3).len(), 10);
        assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
        assert!(combinations(2, 3).is_empty());
        assert!(combinations(2, 0).is_empty());
    }

    #[test]
    fn dedup_merges_near_points() {
        let mut pts = vec![
            dvector![1.0, 0.0],
            dvector![0.0, 0.0],
            dvector![1.0, 1e-12],
            dvector![0.0, 1.0],
        ];
        dedup_points_in_place(&mut pts, 1e-9);
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], dvector![0.0, 0.0]);
    }

    #[test]
    fn centroid_of_square() {
        let pts = vec![
            dvector![0.0, 0.0],
            dvector![2.0, 0.0],
            dvector![2.0, 2.0],
            dvector![0.0, 2.0],
        ];
        assert_eq!(centroid(&pts), Some(dvector![1.0, 1.0]));
        assert_eq!(centroid(&[]), None);
    }
}
