//! General rectangular matrices.
//!
//! Storage is a contiguous row-major `Vec<T>`. All public row/column
//! accessors are **1-based** and validate their arguments; out-of-range
//! indices return [`CoreError::InvalidIndex`].
//!
//! Derived state (row-echelon forms, pivots, transpose) is computed on first
//! use and memoised. Every mutator takes `&mut self` and clears the memoised
//! state, so a cached value can never outlive the contents it was computed
//! from.

mod display;
pub(crate) mod elimination;
mod reduce;

pub use elimination::Pivots;
pub use reduce::GeneralSolution;

use once_cell::unsync::OnceCell;

use crate::Float;
use crate::config::Config;
use crate::error::{Axis, CoreError, Result};
use crate::vector::{Vector, VectorSet};

/// A `height x width` grid of reals.
#[derive(Debug, Clone)]
pub struct Matrix<T: Float = f64> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    config: Config,
    cache: Cache<T>,
}

#[derive(Debug, Clone, Default)]
struct Cache<T: Float> {
    row_echelon: OnceCell<Box<Matrix<T>>>,
    reduced_row_echelon: OnceCell<Box<Matrix<T>>>,
    pivots: OnceCell<Pivots>,
    transpose: OnceCell<Box<Matrix<T>>>,
}

impl<T: Float> Matrix<T> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a `rows x cols` matrix from a row-major grid.
    ///
    /// The grid must have exactly `rows` rows of exactly `cols` entries.
    ///
    /// ```
    /// # use lava_core::Matrix;
    /// let a = Matrix::new(2, 3, vec![vec![5.0, 4.0, 6.0], vec![6.0, 3.0, 2.0]]).unwrap();
    /// assert_eq!(a.get(1, 2).unwrap(), 4.0);
    /// assert!(Matrix::new(3, 3, vec![vec![1.0, 2.0, 3.0]]).is_err());
    /// ```
    pub fn new(rows: usize, cols: usize, values: Vec<Vec<T>>) -> Result<Self> {
        if values.len() != rows {
            return Err(CoreError::DimensionMismatch {
                expected: vec![rows, cols],
                got: vec![values.len(), values.first().map_or(0, Vec::len)],
            });
        }
        if let Some(bad) = values.iter().find(|row| row.len() != cols) {
            return Err(CoreError::DimensionMismatch {
                expected: vec![rows, cols],
                got: vec![rows, bad.len()],
            });
        }
        let data = values.into_iter().flatten().collect();
        Ok(Self::from_parts(rows, cols, data, Config::default()))
    }

    /// Create a matrix from a row-major grid, taking the shape from the grid.
    pub fn from_rows(values: Vec<Vec<T>>) -> Result<Self> {
        let rows = values.len();
        let cols = values.first().map_or(0, Vec::len);
        Self::new(rows, cols, values)
    }

    /// Create a matrix from flat row-major data.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows * cols != data.len() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![rows * cols],
                got: vec![data.len()],
            });
        }
        Ok(Self::from_parts(rows, cols, data, Config::default()))
    }

    /// A `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_parts(rows, cols, vec![T::zero(); rows * cols], Config::default())
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_parts(n, n, identity_data(n), Config::default())
    }

    /// Build from parts already known to be consistent.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>, config: Config) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self {
            data,
            rows,
            cols,
            config,
            cache: Cache::default(),
        }
    }

    /// Attach a configuration (tolerances) to this matrix.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.invalidate();
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.cols
    }

    /// `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The entries in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The entry at 1-based row `r`, column `c`.
    pub fn get(&self, r: usize, c: usize) -> Result<T> {
        self.check_row(r)?;
        self.check_col(c)?;
        Ok(self.at(r - 1, c - 1))
    }

    /// Overwrite the entry at 1-based row `r`, column `c`.
    pub fn set(&mut self, r: usize, c: usize, value: T) -> Result<()> {
        self.check_row(r)?;
        self.check_col(c)?;
        self.data[(r - 1) * self.cols + (c - 1)] = value;
        self.invalidate();
        Ok(())
    }

    /// 0-based unchecked read for internal loops.
    #[inline]
    pub(crate) fn at(&self, r: usize, c: usize) -> T {
        self.data[r * self.cols + c]
    }

    /// Column `c` (1-based) as a vector.
    pub fn column(&self, c: usize) -> Result<Vector<T>> {
        self.check_col(c)?;
        Ok(self.column_vector(c - 1))
    }

    /// Row `r` (1-based) as a vector.
    pub fn row(&self, r: usize) -> Result<Vector<T>> {
        self.check_row(r)?;
        let start = (r - 1) * self.cols;
        let row = &self.data[start..start + self.cols];
        Ok(Vector::from_slice(row).with_config(self.config))
    }

    /// Every column, in order, as a vector set.
    pub fn columns(&self) -> VectorSet<T> {
        (0..self.cols).map(|c| self.column_vector(c)).collect()
    }

    pub(crate) fn column_vector(&self, c: usize) -> Vector<T> {
        Vector::new((0..self.rows).map(|r| self.at(r, c)).collect()).with_config(self.config)
    }

    /// Whether both matrices have the same shape and every pair of entries
    /// differs by less than `epsilon`.
    pub fn approx_eq(&self, other: &Matrix<T>) -> bool {
        let eps = self.config.eps::<T>();
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| (a - b).is_negligible(eps))
    }

    /// Number of entries of column `c` at or below row `r` (both 1-based)
    /// whose magnitude is at least `epsilon`.
    pub fn count(&self, c: usize, r: usize) -> Result<usize> {
        self.check_col(c)?;
        self.check_row(r)?;
        let eps = self.config.eps::<T>();
        Ok(((r - 1)..self.rows)
            .filter(|&i| !self.at(i, c - 1).is_negligible(eps))
            .count())
    }

    /// Number of entries of column `c` (1-based) that are non-zero within
    /// tolerance.
    pub fn count_nonzero(&self, c: usize) -> Result<usize> {
        self.count(c, 1)
    }

    /// The transpose, computed once.
    pub fn transpose(&self) -> &Matrix<T> {
        self.cache.transpose.get_or_init(|| {
            Box::new(Self::from_parts(
                self.cols,
                self.rows,
                transpose_data(&self.data, self.rows, self.cols),
                self.config,
            ))
        })
    }

    // ------------------------------------------------------------------
    // Elementary row operations (in place)
    // ------------------------------------------------------------------

    /// Multiply row `r` by `k`.
    pub fn scalar_mult_row(&mut self, r: usize, k: T) -> Result<()> {
        self.check_row(r)?;
        elimination::scale_row(&mut self.data, self.cols, r - 1, k);
        self.invalidate();
        Ok(())
    }

    /// Multiply every entry by `k`.
    pub fn scalar_mult(&mut self, k: T) {
        for v in &mut self.data {
            *v *= k;
        }
        self.invalidate();
    }

    /// Exchange rows `r1` and `r2`.
    pub fn switch_rows(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        elimination::swap_rows(&mut self.data, self.cols, r1 - 1, r2 - 1);
        self.invalidate();
        Ok(())
    }

    /// Add `k` times row `source` to row `target`.
    pub fn add_row(&mut self, source: usize, target: usize, k: T) -> Result<()> {
        self.check_row(source)?;
        self.check_row(target)?;
        elimination::add_scaled_row(&mut self.data, self.cols, source - 1, target - 1, k);
        self.invalidate();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn check_row(&self, r: usize) -> Result<()> {
        if r == 0 || r > self.rows {
            return Err(CoreError::InvalidIndex {
                axis: Axis::Row,
                index: r,
                extent: self.rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, c: usize) -> Result<()> {
        if c == 0 || c > self.cols {
            return Err(CoreError::InvalidIndex {
                axis: Axis::Column,
                index: c,
                extent: self.cols,
            });
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = Cache::default();
    }
}

pub(crate) fn identity_data<T: Float>(n: usize) -> Vec<T> {
    let mut data = vec![T::zero(); n * n];
    for i in 0..n {
        data[i * n + i] = T::one();
    }
    data
}

pub(crate) fn transpose_data<T: Float>(data: &[T], rows: usize, cols: usize) -> Vec<T> {
    let mut out = vec![T::zero(); rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::new(2, 3, vec![vec![5.0, 4.0, 6.0], vec![6.0, 3.0, 2.0]]).unwrap()
    }

    #[test]
    fn test_basic_access() {
        let mut a = sample();
        assert_eq!(a.height(), 2);
        assert_eq!(a.width(), 3);
        assert_eq!(a.get(1, 2).unwrap(), 4.0);

        let mut b = Matrix::zeros(2, 3);
        for (r, row) in [[5.0, 4.0, 6.0], [6.0, 3.0, 2.0]].iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                b.set(r + 1, c + 1, v).unwrap();
            }
        }
        assert!(a.approx_eq(&b));

        a.set(2, 3, 15.9).unwrap();
        assert_eq!(a.get(2, 3).unwrap(), 15.9);
    }

    #[test]
    fn test_construction_mismatch() {
        assert!(Matrix::new(2, 2, vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert!(Matrix::new(1, 2, rows).is_err());
        assert!(Matrix::<f64>::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_index_validation() {
        let mut a = sample();
        assert!(matches!(
            a.get(0, 1),
            Err(CoreError::InvalidIndex { axis: Axis::Row, .. })
        ));
        assert!(matches!(
            a.get(1, 4),
            Err(CoreError::InvalidIndex {
                axis: Axis::Column,
                index: 4,
                extent: 3
            })
        ));
        assert!(a.switch_rows(1, 3).is_err());
        assert!(a.add_row(0, 1, 1.0).is_err());
        assert!(a.scalar_mult_row(3, 2.0).is_err());
        assert!(a.set(3, 1, 0.0).is_err());
    }

    #[test]
    fn test_elementary_row_operations() {
        let mut a = sample();
        a.scalar_mult_row(1, 3.0).unwrap();
        assert_eq!(a.as_slice(), &[15.0, 12.0, 18.0, 6.0, 3.0, 2.0]);
        a.scalar_mult(2.0);
        assert_eq!(a.as_slice(), &[30.0, 24.0, 36.0, 12.0, 6.0, 4.0]);
        a.switch_rows(1, 2).unwrap();
        assert_eq!(a.as_slice(), &[12.0, 6.0, 4.0, 30.0, 24.0, 36.0]);
        a.add_row(1, 2, 2.0).unwrap();
        assert_eq!(a.as_slice(), &[12.0, 6.0, 4.0, 54.0, 36.0, 44.0]);
    }

    #[test]
    fn test_count() {
        let a = Matrix::new(
            4,
            3,
            vec![
                vec![5.0, 4.0, 6.0],
                vec![1.0, 0.0, 3.0],
                vec![0.0, 0.0, 7.0],
                vec![3.0, 0.0, 0.0],
            ],
        )
        .unwrap();
        assert_eq!(a.count_nonzero(1).unwrap(), 3);
        assert_eq!(a.count_nonzero(2).unwrap(), 1);
        assert_eq!(a.count_nonzero(3).unwrap(), 3);
        assert_eq!(a.count(1, 3).unwrap(), 1);
        assert_eq!(a.count(2, 2).unwrap(), 0);
        assert_eq!(a.count(2, 3).unwrap(), 0);
        assert!(a.count(4, 1).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = sample();
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.as_slice(), &[5.0, 6.0, 4.0, 3.0, 6.0, 2.0]);
    }

    #[test]
    fn test_mutation_clears_cached_state() {
        let mut a = Matrix::new(2, 2, vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        assert_eq!(a.rank(), 1);
        assert_eq!(a.transpose().get(1, 2).unwrap(), 2.0);
        a.set(2, 2, 5.0).unwrap();
        assert_eq!(a.rank(), 2);
        a.add_row(1, 2, -2.0).unwrap();
        assert_eq!(a.transpose().get(1, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_columns_and_rows() {
        let a = sample();
        assert_eq!(a.column(2).unwrap().as_slice(), &[4.0, 3.0]);
        assert_eq!(a.row(2).unwrap().as_slice(), &[6.0, 3.0, 2.0]);
        let cols = a.columns();
        assert_eq!(cols.size(), 3);
        assert!(cols.to_matrix().unwrap().approx_eq(&a));
    }

    #[test]
    fn test_approx_eq_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(3, 2);
        assert!(!a.approx_eq(&b));
    }
}
