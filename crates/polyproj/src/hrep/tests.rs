use super::*;
use nalgebra::{dmatrix, dvector, DMatrix};

fn unit_square() -> HRep {
    HRep::new(
        dmatrix![1.0, 0.0; 0.0, 1.0; -1.0, 0.0; 0.0, -1.0],
        dvector![1.0, 1.0, 0.0, 0.0],
    )
    .unwrap()
}

#[test]
fn rhs_accepts_flat_and_column_forms() {
    let a = dmatrix![1.0, 2.0; 3.0, 4.0];
    let flat = HRep::new(a.clone(), vec![5.0, 6.0]).unwrap();
    let column = HRep::new(a, dmatrix![5.0; 6.0]).unwrap();
    assert_eq!(flat, column);
    assert_eq!(flat.b_column(), dmatrix![5.0; 6.0]);
    assert_eq!(flat.labels(), &[0, 1]);
}

#[test]
fn rhs_shape_mismatch_names_expected_shape() {
    let err = HRep::new(dmatrix![1.0, 2.0; 3.0, 4.0], vec![1.0]).unwrap_err();
    assert!(matches!(err, HrepError::Shape { what: "b", .. }));
    assert!(err.to_string().contains("(2,) or (2, 1)"), "{err}");

    let wide = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
    assert!(HRep::new(dmatrix![1.0; 2.0], wide).is_err());
}

#[test]
fn empty_system_keeps_column_width() {
    let sys = HRep::new(DMatrix::zeros(0, 3), DMatrix::<f64>::zeros(0, 1)).unwrap();
    assert_eq!(sys.dim(), 3);
    assert!(sys.is_empty_rows());
    assert!(sys.contains_eps(&dvector![1e9, -1e9, 0.0], 0.0));
    assert_eq!(sys, HRep::unconstrained(3));
}

#[test]
fn labels_are_validated() {
    let a = dmatrix![1.0, 1.0];
    assert!(matches!(
        HRep::with_labels(a.clone(), vec![1.0], vec![4, 4]),
        Err(HrepError::DuplicateLabel { label: 4 })
    ));
    assert!(matches!(
        HRep::with_labels(a.clone(), vec![1.0], vec![4]),
        Err(HrepError::Shape { what: "labels", .. })
    ));
    let sys = HRep::with_labels(a, vec![1.0], vec![7, 2]).unwrap();
    assert_eq!(sys.column_of(2), Some(1));
    assert_eq!(sys.column_of(0), None);
    assert_eq!(sys.relabeled().labels(), &[0, 1]);
}

#[test]
fn row_slice_constructor_checks_length() {
    let sys = HRep::from_row_slice(2, &[1.0, 0.0, 0.0, 1.0], &[2.0, 3.0]).unwrap();
    assert_eq!(sys.row(1), (vec![0.0, 1.0], 3.0));
    assert!(HRep::from_row_slice(2, &[1.0, 0.0, 0.0], &[2.0, 3.0]).is_err());
}

#[test]
fn membership_uses_slack() {
    let sq = unit_square();
    assert!(sq.contains_eps(&dvector![0.5, 0.5], 0.0));
    assert!(!sq.contains_eps(&dvector![1.0 + 1e-6, 0.5], 1e-9));
    assert!(sq.contains_eps(&dvector![1.0 + 1e-10, 0.5], 1e-9));
    let s = sq.slack(&dvector![0.25, 0.75]);
    assert!((s[0] - 0.75).abs() < 1e-12 && (s[3] - 0.75).abs() < 1e-12);
}

#[test]
fn display_lists_rows_by_label() {
    let sys = HRep::with_labels(dmatrix![1.0, -2.0; 0.0, 0.0], vec![3.0, 1.0], vec![5, 9]).unwrap();
    let text = sys.to_string();
    assert!(text.contains("1 x5 - 2 x9 <= 3"), "{text}");
    assert!(text.contains("0 <= 1"), "{text}");
}
