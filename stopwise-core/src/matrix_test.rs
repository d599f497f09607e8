// stopwise-core/src/matrix_test.rs

use super::*;
use approx::assert_relative_eq;

#[test]
fn test_from_vec_checks_length() {
    assert!(Matrix::from_vec(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    assert_eq!(m.shape(), [2, 2]);
    assert_eq!(m.get(1, 0), Some(3.0));
    assert_eq!(m.get(2, 0), None);
}

#[test]
fn test_from_rows_ragged() {
    let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    match result {
        Err(StopwiseError::ShapeMismatch { .. }) => (),
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_matmul() {
    let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    let b = Matrix::from_vec(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2).unwrap();
    let c = a.matmul(&b).unwrap();
    assert_eq!(c.shape(), [2, 2]);
    assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn test_matmul_shape_mismatch() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_transpose() {
    let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    let t = a.transpose();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn test_add_row_vector() {
    let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    let b = Matrix::row_vector(vec![10.0, 20.0]);
    let c = a.add_row_vector(&b).unwrap();
    assert_eq!(c.as_slice(), &[11.0, 22.0, 13.0, 24.0]);
    assert!(a.add_row_vector(&Matrix::row_vector(vec![1.0])).is_err());
}

#[test]
fn test_column_sums_and_argmax() {
    let a = Matrix::from_vec(vec![1.0, 5.0, 2.0, 7.0, 0.5, 0.5], 2, 3).unwrap();
    assert_eq!(a.column_sums().as_slice(), &[8.0, 5.5, 2.5]);
    assert_eq!(a.argmax_rows(), vec![1, 0]);
}

#[test]
fn test_argmax_ties_pick_first() {
    let a = Matrix::from_vec(vec![0.5, 0.5, 0.5], 1, 3).unwrap();
    assert_eq!(a.argmax_rows(), vec![0]);
}

#[test]
fn test_norms() {
    let a = Matrix::from_vec(vec![-1.0, 2.0, -3.0], 1, 3).unwrap();
    assert_relative_eq!(a.abs_sum(), 6.0);
    assert_relative_eq!(a.squared_sum(), 14.0);
    assert_relative_eq!(a.sum(), -2.0);
}

#[test]
fn test_add_scaled_inplace() {
    let mut a = Matrix::full(1, 2, 1.0);
    let b = Matrix::row_vector(vec![2.0, 4.0]);
    a.add_scaled_(-0.5, &b).unwrap();
    assert_eq!(a.as_slice(), &[0.0, -1.0]);
    assert!(a.add_scaled_(1.0, &Matrix::zeros(2, 2)).is_err());
}

#[test]
fn test_row_out_of_bounds() {
    let a = Matrix::zeros(2, 2);
    assert_eq!(a.row(1).unwrap(), &[0.0, 0.0]);
    assert_eq!(
        a.row(2).unwrap_err(),
        StopwiseError::IndexOutOfBounds { index: 2, len: 2 }
    );
}
