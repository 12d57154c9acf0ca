//! Stateless matrix arithmetic.
//!
//! Every function validates shapes and returns [`CoreError::DimensionMismatch`]
//! on incompatible operands. Results are fresh instances of the operands'
//! kind ([`Matrix`] or [`SquareMatrix`]) carrying the first operand's
//! configuration and no cached state.

use crate::Float;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;
use crate::square::SquareMatrix;
use crate::vector::Vector;

/// The matrix types the arithmetic in this module accepts and produces.
pub trait MatrixKind<T: Float>: Sized {
    /// The underlying rectangular grid.
    fn as_matrix(&self) -> &Matrix<T>;

    /// Wrap a freshly computed grid back into this kind.
    fn from_matrix(matrix: Matrix<T>) -> Result<Self>;
}

impl<T: Float> MatrixKind<T> for Matrix<T> {
    fn as_matrix(&self) -> &Matrix<T> {
        self
    }

    fn from_matrix(matrix: Matrix<T>) -> Result<Self> {
        Ok(matrix)
    }
}

impl<T: Float> MatrixKind<T> for SquareMatrix<T> {
    fn as_matrix(&self) -> &Matrix<T> {
        SquareMatrix::as_matrix(self)
    }

    fn from_matrix(matrix: Matrix<T>) -> Result<Self> {
        SquareMatrix::try_from(matrix)
    }
}

fn same_shape<T: Float>(a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(CoreError::DimensionMismatch {
            expected: vec![a.height(), a.width()],
            got: vec![b.height(), b.width()],
        });
    }
    Ok(())
}

fn zip_with<T, M, F>(a: &M, b: &M, f: F) -> Result<M>
where
    T: Float,
    M: MatrixKind<T>,
    F: Fn(T, T) -> T,
{
    let (a, b) = (a.as_matrix(), b.as_matrix());
    same_shape(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| f(x, y))
        .collect();
    M::from_matrix(Matrix::from_parts(a.height(), a.width(), data, *a.config()))
}

/// Element-wise sum `a + b`.
///
/// ```
/// # use lava_core::{Matrix, ops};
/// let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![3.0, 4.0]]).unwrap();
/// assert_eq!(ops::add(&a, &b).unwrap().as_slice(), &[4.0, 6.0]);
/// ```
pub fn add<T: Float, M: MatrixKind<T>>(a: &M, b: &M) -> Result<M> {
    zip_with(a, b, |x, y| x + y)
}

/// Element-wise difference `a - b`.
pub fn sub<T: Float, M: MatrixKind<T>>(a: &M, b: &M) -> Result<M> {
    zip_with(a, b, |x, y| x - y)
}

/// `k * a`.
pub fn scale<T: Float, M: MatrixKind<T>>(a: &M, k: T) -> Result<M> {
    let m = a.as_matrix();
    let data = m.as_slice().iter().map(|&x| x * k).collect();
    M::from_matrix(Matrix::from_parts(m.height(), m.width(), data, *m.config()))
}

/// Matrix product `a * b`. Requires `a.width() == b.height()`.
///
/// ```
/// # use lava_core::{Matrix, ops};
/// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5.0], vec![6.0]]).unwrap();
/// assert_eq!(ops::matmul(&a, &b).unwrap().as_slice(), &[17.0, 39.0]);
/// ```
pub fn matmul<T: Float, M: MatrixKind<T>>(a: &M, b: &M) -> Result<M> {
    let (a, b) = (a.as_matrix(), b.as_matrix());
    let (m, k) = a.shape();
    let n = b.width();
    if b.height() != k {
        return Err(CoreError::DimensionMismatch {
            expected: vec![k, n],
            got: vec![b.height(), n],
        });
    }

    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let mut c = vec![T::zero(); m * n];
    for i in 0..m {
        let a_row = i * k;
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum += a_data[a_row + p] * b_data[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
    M::from_matrix(Matrix::from_parts(m, n, c, *a.config()))
}

/// A fresh copy of `a` with no cached state.
pub fn copy<T: Float, M: MatrixKind<T>>(a: &M) -> Result<M> {
    let m = a.as_matrix();
    M::from_matrix(Matrix::from_parts(
        m.height(),
        m.width(),
        m.as_slice().to_vec(),
        *m.config(),
    ))
}

/// Matrix-vector product `a * x`.
pub fn mul_vector<T: Float, M: MatrixKind<T>>(a: &M, x: &Vector<T>) -> Result<Vector<T>> {
    let a = a.as_matrix();
    let (m, n) = a.shape();
    if x.len() != n {
        return Err(CoreError::DimensionMismatch {
            expected: vec![n],
            got: vec![x.len()],
        });
    }
    let xs = x.as_slice();
    let y = (0..m)
        .map(|i| {
            a.as_slice()[i * n..(i + 1) * n]
                .iter()
                .zip(xs)
                .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj)
        })
        .collect();
    Ok(Vector::new(y).with_config(*a.config()))
}

/// `a` multiplied by itself `k` times; `pow(a, 0)` is the identity.
///
/// ```
/// # use lava_core::{SquareMatrix, ops};
/// let a = SquareMatrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
/// let p = ops::pow(&a, 5).unwrap();
/// assert_eq!(p.as_slice(), &[1.0, 5.0, 0.0, 1.0]);
/// ```
pub fn pow<T: Float>(a: &SquareMatrix<T>, k: u32) -> Result<SquareMatrix<T>> {
    let mut out = SquareMatrix::identity(a.size()).with_config(*a.config());
    for _ in 0..k {
        out = matmul(&out, a)?;
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_add_sub_scale() {
        let a = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = matrix(&[&[6.0, 5.0, 4.0], &[3.0, 2.0, 1.0]]);
        assert_eq!(add(&a, &b).unwrap().as_slice(), &[7.0; 6]);
        assert_eq!(
            sub(&a, &b).unwrap().as_slice(),
            &[-5.0, -3.0, -1.0, 1.0, 3.0, 5.0]
        );
        assert_eq!(
            scale(&a, 2.0).unwrap().as_slice(),
            &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let a = matrix(&[&[1.0, 2.0]]);
        let b = matrix(&[&[1.0], &[2.0]]);
        assert!(matches!(
            add(&a, &b),
            Err(CoreError::DimensionMismatch { .. })
        ));
        assert!(matmul(&a, &a).is_err());
        assert!(mul_vector(&a, &Vector::new(vec![1.0])).is_err());
    }

    #[test]
    fn test_matmul_rectangular() {
        let a = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = matrix(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_square_results_stay_square() {
        let a = SquareMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        let b = matmul(&a, &a).unwrap();
        assert_eq!(b.as_slice(), &[2.0, 3.0, 6.0, 11.0]);
        assert!((b.determinant() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_copy_is_independent() {
        let a = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let mut b = copy(&a).unwrap();
        b.set(1, 1, 9.0).unwrap();
        assert_eq!(a.get(1, 1).unwrap(), 1.0);
        assert_eq!(b.get(1, 1).unwrap(), 9.0);
    }

    #[test]
    fn test_mul_vector() {
        let a = matrix(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let y = mul_vector(&a, &Vector::new(vec![1.0, -1.0])).unwrap();
        assert_eq!(y.as_slice(), &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_pow() {
        let a = SquareMatrix::from_rows(vec![vec![2.0, 0.0], vec![1.0, 1.0]]).unwrap();
        assert!(pow(&a, 0).unwrap().approx_eq(&SquareMatrix::identity(2)));
        assert!(pow(&a, 1).unwrap().approx_eq(&a));
        assert_eq!(pow(&a, 3).unwrap().as_slice(), &[8.0, 0.0, 7.0, 1.0]);
    }
}
