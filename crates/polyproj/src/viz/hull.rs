//! Planar convex hull and facet ordering helpers.

use std::cmp::Ordering;

use nalgebra::{Vector2, Vector3};

/// Andrew’s monotone chain (counter-clockwise, no repeated endpoint).
///
/// Returns `None` for fewer than two distinct points.
pub(crate) fn convex_hull(points: &[Vector2<f64>]) -> Option<Vec<Vector2<f64>>> {
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 2 {
        return None;
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    Some(lower)
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Order coplanar points counter-clockwise around `normal` (returns indices).
pub(crate) fn order_around(points: &[Vector3<f64>], normal: Vector3<f64>) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    let n = normal.normalize();
    // in-plane basis from the axis least aligned with the normal
    let axis = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
        Vector3::x()
    } else if n.y.abs() <= n.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = n.cross(&axis).normalize();
    let w = n.cross(&u);
    let c = points.iter().fold(Vector3::zeros(), |acc, p| acc + p) / points.len() as f64;
    let mut keyed: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let d = p - c;
            (d.dot(&w).atan2(d.dot(&u)), i)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_drops_interior_points() {
        let pts = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.5, 0.5),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        let hull = convex_hull(&pts).unwrap();
        assert_eq!(hull.len(), 4);
        assert_eq!(hull[0], Vector2::new(0.0, 0.0));
        assert_eq!(hull[1], Vector2::new(1.0, 0.0));
        assert!(convex_hull(&[Vector2::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn facet_order_is_counter_clockwise() {
        // top face of the unit cube, scrambled
        let pts = vec![
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ];
        let order = order_around(&pts, Vector3::z());
        assert_eq!(order.len(), 4);
        // consecutive vertices share an edge (differ in exactly one coordinate)
        for k in 0..4 {
            let a = pts[order[k]];
            let b = pts[order[(k + 1) % 4]];
            let diff = (a - b).abs();
            assert!((diff.x + diff.y - 1.0).abs() < 1e-12, "{a:?} -> {b:?}");
        }
    }
}
