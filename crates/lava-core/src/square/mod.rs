//! Square matrices: determinant, inverse, trace, structure tests, QR and
//! eigen-decomposition.
//!
//! [`SquareMatrix`] wraps a [`Matrix`] whose height equals its width and
//! dereferences to it, so every rectangular operation (row reduction, null
//! space, solving, ...) is available as well. Mutators are re-exposed here so
//! that they clear the square-specific caches along with the matrix's own.

mod eig;
mod qr;

pub use eig::{Diagonalisation, EigenPair};
pub use qr::QrFactors;

use core::fmt;
use core::ops::Deref;

use once_cell::unsync::OnceCell;

use crate::Float;
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;
use crate::matrix::elimination::{Companion, Pivoting, eliminate};
use crate::matrix::identity_data;

/// An `n x n` matrix.
#[derive(Debug, Clone)]
pub struct SquareMatrix<T: Float = f64> {
    matrix: Matrix<T>,
    cache: SquareCache<T>,
}

#[derive(Debug, Clone, Default)]
struct SquareCache<T: Float> {
    inversion: OnceCell<Inversion<T>>,
    trace: OnceCell<T>,
    transpose: OnceCell<Box<SquareMatrix<T>>>,
    qr: OnceCell<Box<QrFactors<T>>>,
    eigenvalues: OnceCell<Vec<T>>,
    eigenpairs: OnceCell<Vec<EigenPair<T>>>,
    diagonalisation: OnceCell<Option<Box<Diagonalisation<T>>>>,
}

/// Determinant and inverse from one partially pivoted Gauss-Jordan pass.
#[derive(Debug, Clone)]
struct Inversion<T: Float> {
    determinant: T,
    inverse: Option<Box<SquareMatrix<T>>>,
}

impl<T: Float> SquareMatrix<T> {
    /// Create an `n x n` matrix from a row-major grid of exactly `n` rows of
    /// `n` entries.
    ///
    /// ```
    /// # use lava_core::SquareMatrix;
    /// let a = SquareMatrix::new(2, vec![vec![2.0, 1.0], vec![1.0, 4.0]]).unwrap();
    /// assert_eq!(a.size(), 2);
    /// assert!(SquareMatrix::new(2, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).is_err());
    /// ```
    pub fn new(n: usize, values: Vec<Vec<T>>) -> Result<Self> {
        Self::try_from(Matrix::new(n, n, values)?)
    }

    /// Create a square matrix from a row-major grid, taking the size from it.
    pub fn from_rows(values: Vec<Vec<T>>) -> Result<Self> {
        Self::new(values.len(), values)
    }

    /// Create an `n x n` matrix from flat row-major data.
    pub fn from_vec(n: usize, data: Vec<T>) -> Result<Self> {
        Self::try_from(Matrix::from_vec(n, n, data)?)
    }

    pub fn identity(n: usize) -> Self {
        Self::from_parts(n, identity_data(n), Config::default())
    }

    pub fn zeros(n: usize) -> Self {
        Self::from_parts(n, vec![T::zero(); n * n], Config::default())
    }

    pub(crate) fn from_parts(n: usize, data: Vec<T>, config: Config) -> Self {
        Self {
            matrix: Matrix::from_parts(n, n, data, config),
            cache: SquareCache::default(),
        }
    }

    /// Attach a configuration (tolerances) to this matrix.
    #[must_use]
    pub fn with_config(self, config: Config) -> Self {
        Self {
            matrix: self.matrix.with_config(config),
            cache: SquareCache::default(),
        }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.height()
    }

    #[inline]
    pub fn as_matrix(&self) -> &Matrix<T> {
        &self.matrix
    }

    #[inline]
    pub fn into_matrix(self) -> Matrix<T> {
        self.matrix
    }

    /// The main diagonal, top-left to bottom-right.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.size()).map(|i| self.at(i, i)).collect()
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Overwrite the entry at 1-based row `r`, column `c`.
    pub fn set(&mut self, r: usize, c: usize, value: T) -> Result<()> {
        self.matrix.set(r, c, value)?;
        self.invalidate();
        Ok(())
    }

    pub fn scalar_mult_row(&mut self, r: usize, k: T) -> Result<()> {
        self.matrix.scalar_mult_row(r, k)?;
        self.invalidate();
        Ok(())
    }

    pub fn scalar_mult(&mut self, k: T) {
        self.matrix.scalar_mult(k);
        self.invalidate();
    }

    pub fn switch_rows(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.matrix.switch_rows(r1, r2)?;
        self.invalidate();
        Ok(())
    }

    pub fn add_row(&mut self, source: usize, target: usize, k: T) -> Result<()> {
        self.matrix.add_row(source, target, k)?;
        self.invalidate();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Determinant, inverse, trace, transpose
    // ------------------------------------------------------------------

    /// The determinant.
    ///
    /// Computed by Gauss-Jordan elimination with partial pivoting as
    /// `(-1)^swaps * product(pivots)`; a column without a pivot gives zero.
    ///
    /// ```
    /// # use lava_core::SquareMatrix;
    /// let a: SquareMatrix<f64> = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 4.0]]).unwrap();
    /// assert!((a.determinant() - 7.0).abs() < 1e-10);
    /// ```
    pub fn determinant(&self) -> T {
        self.inversion().determinant
    }

    /// The inverse, or [`CoreError::SingularMatrix`].
    ///
    /// ```
    /// # use lava_core::SquareMatrix;
    /// let a: SquareMatrix<f64> = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 4.0]]).unwrap();
    /// let inv = a.inverse().unwrap();
    /// assert!((inv.get(1, 1).unwrap() - 4.0 / 7.0).abs() < 1e-10);
    /// ```
    pub fn inverse(&self) -> Result<&SquareMatrix<T>> {
        self.inversion()
            .inverse
            .as_deref()
            .ok_or(CoreError::SingularMatrix)
    }

    /// Whether the matrix has an inverse.
    pub fn is_invertible(&self) -> bool {
        self.inversion().inverse.is_some()
    }

    /// Sum of the diagonal entries.
    pub fn trace(&self) -> T {
        *self
            .cache
            .trace
            .get_or_init(|| self.diagonal().into_iter().sum())
    }

    pub fn transpose(&self) -> &SquareMatrix<T> {
        self.cache.transpose.get_or_init(|| {
            Box::new(Self {
                matrix: self.matrix.transpose().clone(),
                cache: SquareCache::default(),
            })
        })
    }

    fn inversion(&self) -> &Inversion<T> {
        self.cache.inversion.get_or_init(|| {
            let n = self.size();
            let mut work = self.as_slice().to_vec();
            let mut inverse = identity_data(n);
            let elimination = eliminate(
                &mut work,
                n,
                n,
                Some(Companion {
                    data: &mut inverse,
                    cols: n,
                }),
                Pivoting::Largest,
                true,
                self.config().eps(),
            );
            let determinant = elimination.determinant(n);
            let invertible = elimination.pivots.len() == n;
            log::debug!(
                "gauss-jordan on {n}x{n}: det {determinant}, {} swaps, invertible {invertible}",
                elimination.swaps
            );
            Inversion {
                determinant,
                inverse: invertible
                    .then(|| Box::new(Self::from_parts(n, inverse, *self.config()))),
            }
        })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Whether every entry below the diagonal is zero within tolerance.
    pub fn is_upper_triangular(&self) -> bool {
        let eps = self.config().eps::<T>();
        (1..self.size()).all(|r| (0..r).all(|c| self.at(r, c).is_negligible(eps)))
    }

    /// Whether every entry above the diagonal is zero within tolerance.
    pub fn is_lower_triangular(&self) -> bool {
        self.transpose().is_upper_triangular()
    }

    pub fn is_triangular(&self) -> bool {
        self.is_upper_triangular() || self.is_lower_triangular()
    }

    pub fn is_diagonal(&self) -> bool {
        self.is_upper_triangular() && self.is_lower_triangular()
    }

    fn invalidate(&mut self) {
        self.cache = SquareCache::default();
    }
}

impl<T: Float> Deref for SquareMatrix<T> {
    type Target = Matrix<T>;

    fn deref(&self) -> &Matrix<T> {
        &self.matrix
    }
}

impl<T: Float> TryFrom<Matrix<T>> for SquareMatrix<T> {
    type Error = CoreError;

    fn try_from(matrix: Matrix<T>) -> Result<Self> {
        if matrix.height() != matrix.width() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![matrix.height(), matrix.height()],
                got: vec![matrix.height(), matrix.width()],
            });
        }
        Ok(Self {
            matrix,
            cache: SquareCache::default(),
        })
    }
}

impl<T: Float> From<SquareMatrix<T>> for Matrix<T> {
    fn from(square: SquareMatrix<T>) -> Self {
        square.matrix
    }
}

impl<T: Float> fmt::Display for SquareMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ops;

    fn square(rows: &[&[f64]]) -> SquareMatrix {
        SquareMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_try_from_rejects_rectangular() {
        let m = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(
            SquareMatrix::try_from(m),
            Err(CoreError::DimensionMismatch { .. })
        ));
        assert!(SquareMatrix::try_from(Matrix::<f64>::zeros(3, 3)).is_ok());
    }

    #[test]
    fn test_determinant() {
        let a = square(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert!((a.determinant() + 2.0).abs() < 1e-12);

        let b = square(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        assert!((b.determinant() - 1.0).abs() < 1e-10);

        let singular = square(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(singular.determinant(), 0.0);
    }

    #[test]
    fn test_inverse() {
        let a = square(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        let inv = a.inverse().unwrap();
        let expected = square(&[
            &[-24.0, 18.0, 5.0],
            &[20.0, -15.0, -4.0],
            &[-5.0, 4.0, 1.0],
        ]);
        assert!(inv.approx_eq(&expected));
        let product = ops::matmul(&a, inv).unwrap();
        assert!(product.approx_eq(&SquareMatrix::identity(3)));
    }

    #[test]
    fn test_inverse_of_singular() {
        let a = square(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(a.inverse().unwrap_err(), CoreError::SingularMatrix);
        assert!(!a.is_invertible());
    }

    #[test]
    fn test_trace_and_transpose() {
        let a = square(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.trace(), 5.0);
        assert_eq!(a.transpose().as_slice(), &[1.0, 3.0, 2.0, 4.0]);
        assert!((a.transpose().determinant() - a.determinant()).abs() < 1e-12);
    }

    #[test]
    fn test_triangularity() {
        let upper = square(&[&[1.0, 2.0, 3.0], &[1e-9, 4.0, 5.0], &[0.0, 0.0, 6.0]]);
        assert!(upper.is_upper_triangular());
        assert!(!upper.is_lower_triangular());
        assert!(upper.is_triangular());
        assert!(!upper.is_diagonal());

        let lower = upper.transpose();
        assert!(lower.is_lower_triangular());
        assert!(lower.is_triangular());

        let diag = square(&[&[2.0, 1e-9], &[0.0, 3.0]]);
        assert!(diag.is_diagonal());

        let full = square(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert!(!full.is_triangular());
    }

    #[test]
    fn test_mutation_clears_square_cache() {
        let mut a = square(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert!((a.determinant() + 2.0).abs() < 1e-12);
        assert_eq!(a.trace(), 5.0);
        a.set(2, 2, 6.0).unwrap();
        assert!(a.determinant().abs() < 1e-12);
        assert_eq!(a.trace(), 7.0);
        assert!(a.inverse().is_err());
        a.switch_rows(1, 2).unwrap();
        assert_eq!(a.rank(), 1);
        a.scalar_mult(2.0);
        assert_eq!(a.trace(), 2.0 * (3.0 + 2.0));
    }

    #[test]
    fn test_display_delegates() {
        let a = SquareMatrix::<f64>::identity(2);
        assert_eq!(format!("{a}"), format!("{}", a.as_matrix()));
    }
}
