//! Algebraic properties checked over a fixed set of sample matrices.

use numarray::{DType, NumericArray};

fn samples() -> Vec<NumericArray> {
    vec![
        NumericArray::from_values([[1.0, 2.0], [3.0, 4.0]], DType::Float64).unwrap(),
        NumericArray::from_values([[4.0, -2.0, 1.0], [3.0, 6.0, -4.0], [2.0, 1.0, 8.0]], DType::Float64)
            .unwrap(),
        NumericArray::from_values(
            [
                [0.5, 1.5, -2.0, 0.25],
                [3.0, -1.0, 0.0, 2.0],
                [1.0, 1.0, 4.0, -3.0],
                [-2.5, 0.0, 1.0, 1.0],
            ],
            DType::Float64,
        )
        .unwrap(),
        NumericArray::from_values([[2, 1], [7, 4]], DType::Int64).unwrap(),
    ]
}

#[test]
fn add_is_commutative() {
    for a in samples() {
        let b = a.transpose().multiply(0.5).unwrap();
        assert!(a.add(&b).unwrap().allclose(&b.add(&a).unwrap(), 0.0, 1e-12));
    }
}

#[test]
fn zeros_and_ones_are_identities() {
    for a in samples() {
        assert_eq!(a.add(&NumericArray::zeros_like(&a)).unwrap(), a);
        assert_eq!(a.multiply(&NumericArray::ones_like(&a)).unwrap(), a);
    }
}

#[test]
fn transpose_is_an_involution() {
    for a in samples() {
        assert_eq!(a.transpose().transpose(), a);
    }
}

#[test]
fn matmul_with_inverse_is_identity() {
    for a in samples() {
        let n = a.shape()[0];
        let product = a.matmul(&a.inverse().unwrap()).unwrap();
        let eye = NumericArray::identity(n, DType::Float64);
        assert!(product.allclose(&eye, 1e-9, 1e-9), "{}", product);
    }
}

#[test]
fn determinant_of_product_is_product_of_determinants() {
    let all = samples();
    let a = &all[2];
    let b = a.transpose();
    let lhs = a.matmul(&b).unwrap().determinant().unwrap();
    let rhs = a.determinant().unwrap() * b.determinant().unwrap();
    assert!((lhs - rhs).abs() <= 1e-9 * rhs.abs().max(1.0));
}
