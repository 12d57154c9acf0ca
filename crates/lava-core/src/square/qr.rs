//! QR decomposition via classical Gram-Schmidt.
//!
//! Decomposes a square matrix `A` into `A = QR` where:
//! - `Q` holds the orthonormalised columns of `A`
//! - `R` is upper triangular with `R[r][c] = <a_c, q_r>` for `r <= c`
//!
//! A column that depends on the ones before it orthogonalises to zero and
//! leaves a zero column in `Q` and a zero row in `R`. The product `QR` still
//! reproduces `A`, and the QR algorithm relies on this to deflate zero
//! eigenvalues.

use crate::Float;
use crate::error::Result;

use super::SquareMatrix;

/// The factors of `A = QR`.
#[derive(Debug, Clone)]
pub struct QrFactors<T: Float = f64> {
    q: SquareMatrix<T>,
    r: SquareMatrix<T>,
}

impl<T: Float> QrFactors<T> {
    /// The factor with orthonormal (or zero) columns.
    pub fn q(&self) -> &SquareMatrix<T> {
        &self.q
    }

    /// The upper-triangular factor.
    pub fn r(&self) -> &SquareMatrix<T> {
        &self.r
    }

    pub fn into_parts(self) -> (SquareMatrix<T>, SquareMatrix<T>) {
        (self.q, self.r)
    }
}

#[allow(clippy::many_single_char_names)]
impl<T: Float> SquareMatrix<T> {
    /// The QR factors, computed once.
    ///
    /// ```
    /// # use lava_core::{SquareMatrix, ops};
    /// let a: SquareMatrix<f64> = SquareMatrix::from_rows(vec![
    ///     vec![12.0, -51.0, 4.0],
    ///     vec![6.0, 167.0, -68.0],
    ///     vec![-4.0, 24.0, -41.0],
    /// ]).unwrap();
    /// let qr = a.qr().unwrap();
    /// assert!((qr.r().get(1, 1).unwrap() - 14.0).abs() < 1e-9);
    /// assert!(ops::matmul(qr.q(), qr.r()).unwrap().approx_eq(&a));
    /// ```
    pub fn qr(&self) -> Result<&QrFactors<T>> {
        self.cache
            .qr
            .get_or_try_init(|| self.factor_qr().map(Box::new))
            .map(Box::as_ref)
    }

    fn factor_qr(&self) -> Result<QrFactors<T>> {
        let n = self.size();
        let config = *self.config();
        let columns = self.columns();
        let orthonormal = columns.gram_schmidt()?.orthonormalise();

        let mut q = vec![T::zero(); n * n];
        for (c, u) in orthonormal.iter().enumerate() {
            for (r, &x) in u.as_slice().iter().enumerate() {
                q[r * n + c] = x;
            }
        }

        let mut r = vec![T::zero(); n * n];
        for (row, u) in orthonormal.iter().enumerate() {
            for (col, a) in columns.iter().enumerate().skip(row) {
                r[row * n + col] = a.dot(u)?;
            }
        }

        Ok(QrFactors {
            q: Self::from_parts(n, q, config),
            r: Self::from_parts(n, r, config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;

    fn square(rows: &[&[f64]]) -> SquareMatrix {
        SquareMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_qr_known_factors() {
        let a = square(&[
            &[12.0, -51.0, 4.0],
            &[6.0, 167.0, -68.0],
            &[-4.0, 24.0, -41.0],
        ]);
        let qr = a.qr().unwrap();
        assert!(approx_eq(
            qr.q().as_slice(),
            &[
                6.0 / 7.0,
                -69.0 / 175.0,
                -58.0 / 175.0,
                3.0 / 7.0,
                158.0 / 175.0,
                6.0 / 175.0,
                -2.0 / 7.0,
                6.0 / 35.0,
                -33.0 / 35.0,
            ],
            1e-9
        ));
        assert!(approx_eq(
            qr.r().as_slice(),
            &[14.0, 21.0, -14.0, 0.0, 175.0, -70.0, 0.0, 0.0, 35.0],
            1e-9
        ));
    }

    #[test]
    fn test_qr_orthonormal_and_triangular() {
        let a = square(&[&[2.0, -1.0, 0.0], &[1.0, 3.0, 1.0], &[0.0, 1.0, 4.0]]);
        let qr = a.qr().unwrap();
        assert!(qr.r().is_upper_triangular());
        let qtq = ops::matmul(qr.q().transpose(), qr.q()).unwrap();
        assert!(qtq.approx_eq(&SquareMatrix::identity(3)));
        assert!(ops::matmul(qr.q(), qr.r()).unwrap().approx_eq(&a));
    }

    #[test]
    fn test_qr_dependent_column() {
        let a = square(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let (q, r) = a.qr().unwrap().clone().into_parts();
        assert!(q.column(3).unwrap().is_zero());
        assert!(r.row(3).unwrap().is_zero());
        assert!(ops::matmul(&q, &r).unwrap().approx_eq(&a));
    }

    #[test]
    fn test_qr_is_memoised() {
        let a = square(&[&[1.0, 1.0], &[0.0, 1.0]]);
        let first: *const QrFactors = a.qr().unwrap();
        let second: *const QrFactors = a.qr().unwrap();
        assert_eq!(first, second);
    }
}
