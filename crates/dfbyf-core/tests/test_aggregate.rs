use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2};

use dfbyf_core::analysis::{mean_matrices, normalize_unit_range, threshold_rows};
use dfbyf_core::error::DfbyfError;

#[test]
fn test_mean_of_identical_matrices() {
    let m = array![[0.1, 0.5, -0.2], [1.0, 2.0, 3.0]];
    let mean = mean_matrices(&[m.clone(), m.clone()]).unwrap();
    assert_eq!(mean, m);
}

#[test]
fn test_mean_of_two() {
    let a = array![[0.0, 2.0], [4.0, 6.0]];
    let b = array![[1.0, 0.0], [0.0, 2.0]];
    let mean = mean_matrices(&[a, b]).unwrap();
    assert_eq!(mean, array![[0.5, 1.0], [2.0, 4.0]]);
}

#[test]
fn test_mean_shape_mismatch() {
    let a = Array2::<f64>::zeros((2, 3));
    let b = Array2::<f64>::zeros((2, 4));
    let err = mean_matrices(&[a, b]).unwrap_err();
    assert!(matches!(
        err,
        DfbyfError::MatrixShapeMismatch {
            index: 1,
            expected: (2, 3),
            actual: (2, 4)
        }
    ));
}

#[test]
fn test_mean_empty_error() {
    assert!(matches!(mean_matrices(&[]), Err(DfbyfError::EmptySequence)));
}

#[test]
fn test_threshold_half_max() {
    let m = array![[0.0, 0.2, 0.6, 1.0, 0.4]];
    let t = threshold_rows(&m, 0.5);
    let expected = [0.0, 0.0, 0.1, 0.5, 0.0];
    for (got, want) in t.iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
    }
}

#[test]
fn test_threshold_bounds_per_row() {
    let m = array![
        [3.0, -1.0, 0.5, 2.0, 2.9],
        [0.01, 0.02, 0.0, 0.015, 0.005],
        [10.0, 10.0, 10.0, 10.0, 10.0]
    ];
    let t = threshold_rows(&m, 0.5);
    for (row_in, row_out) in m.rows().into_iter().zip(t.rows()) {
        let max = row_in.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(row_out.iter().all(|&v| v >= 0.0 && v <= max));
    }
    // Constant row: every element sits exactly at the shifted value.
    assert!(t.row(2).iter().all(|&v| v == 5.0));
}

#[test]
fn test_threshold_zero_row_stays_zero() {
    let m = Array2::<f64>::zeros((2, 6));
    assert_eq!(threshold_rows(&m, 0.5), m);
}

#[test]
fn test_threshold_non_positive_row_clamps_to_max() {
    // M = -2, shift by -1, clamp min(max(x, 0), -2) = -2.
    let m = array![[-4.0, -2.0, -3.0]];
    let t = threshold_rows(&m, 0.5);
    assert!(t.iter().all(|&v| v == -2.0));
}

#[test]
fn test_normalize_unit_range() {
    let s: Array1<f64> = array![2.0, 4.0, 3.0];
    let n = normalize_unit_range(&s);
    assert_eq!(n, array![0.0, 1.0, 0.5]);
}

#[test]
fn test_normalize_flat_or_inactive_is_zero() {
    let flat: Array1<f64> = array![5.0, 5.0, 5.0];
    assert_eq!(normalize_unit_range(&flat), Array1::<f64>::zeros(3));

    let inactive: Array1<f64> = array![100.0, 100.5, 100.2];
    assert_eq!(normalize_unit_range(&inactive), Array1::<f64>::zeros(3));

    assert_eq!(normalize_unit_range(&Array1::<f64>::zeros(0)).len(), 0);
}
