//! Fixed-length real vectors and ordered vector sets.
//!
//! A [`Vector`] is immutable apart from the explicit in-place scaling
//! operations; its magnitude and normalised form are computed on first use
//! and memoised until the next in-place scaling.

pub mod set;

pub use set::VectorSet;

use core::cmp::Ordering;
use core::fmt;

use once_cell::unsync::OnceCell;

use crate::Float;
use crate::config::Config;
use crate::error::{Axis, CoreError, Result};
use crate::matrix::Matrix;

/// An ordered tuple of reals with tolerance-based comparisons.
#[derive(Debug, Clone)]
pub struct Vector<T: Float = f64> {
    data: Vec<T>,
    config: Config,
    magnitude: OnceCell<T>,
    unit: OnceCell<Vec<T>>,
}

impl<T: Float> Vector<T> {
    /// Create a vector from its entries.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            config: Config::default(),
            magnitude: OnceCell::new(),
            unit: OnceCell::new(),
        }
    }

    /// Create a vector by copying a slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self::new(data.to_vec())
    }

    /// The zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self::new(vec![T::zero(); n])
    }

    /// Attach a configuration (tolerances) to this vector.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.invalidate();
        self
    }

    /// The configuration this vector compares with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The entries as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the vector and return its entries.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// The entry at the 0-based position `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.data
            .get(index)
            .copied()
            .ok_or(CoreError::InvalidIndex {
                axis: Axis::Entry,
                index,
                extent: self.data.len(),
            })
    }

    /// Euclidean norm. Entries smaller than `epsilon` contribute nothing.
    ///
    /// ```
    /// # use lava_core::Vector;
    /// let v = Vector::new(vec![3.0, 4.0, 1e-9]);
    /// assert_eq!(v.magnitude(), 5.0);
    /// ```
    pub fn magnitude(&self) -> T {
        *self.magnitude.get_or_init(|| {
            let eps = self.config.eps::<T>();
            self.data
                .iter()
                .filter(|v| !v.is_negligible(eps))
                .fold(T::zero(), |acc, &v| acc + v * v)
                .sqrt()
        })
    }

    /// The entries divided by the magnitude, with entries smaller than
    /// `epsilon` forced to exactly zero.
    pub fn normalize(&self) -> &[T] {
        self.unit.get_or_init(|| {
            let eps = self.config.eps::<T>();
            let magnitude = self.magnitude();
            self.data
                .iter()
                .map(|&v| {
                    if v.is_negligible(eps) {
                        T::zero()
                    } else {
                        v / magnitude
                    }
                })
                .collect()
        })
    }

    /// A new unit vector in the direction of this one.
    pub fn normalized(&self) -> Self {
        Self::new(self.normalize().to_vec()).with_config(self.config)
    }

    /// Inner product `sum(x_i * y_i)`. Both vectors must have the same length.
    pub fn dot(&self, other: &Vector<T>) -> Result<T> {
        self.check_len(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Whether every pair of entries differs by less than `epsilon`.
    pub fn approx_eq(&self, other: &Vector<T>) -> bool {
        let eps = self.config.eps::<T>();
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| (a - b).is_negligible(eps))
    }

    /// Whether one vector is a uniform scalar multiple of the other.
    ///
    /// The zero vector is `0` times any vector, so it matches everything of
    /// the same length in either argument position.
    ///
    /// ```
    /// # use lava_core::Vector;
    /// let a = Vector::new(vec![1.0, -2.0, 0.0, 4.0]);
    /// let b = Vector::new(vec![-0.5, 1.0, 0.0, -2.0]);
    /// assert!(a.equal_scale(&b));
    /// ```
    pub fn equal_scale(&self, other: &Vector<T>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.is_zero() || other.is_zero() {
            return true;
        }
        let eps = self.config.eps::<T>();
        let Some(lead) = (0..self.len()).max_by(|&i, &j| {
            self.data[i]
                .abs()
                .partial_cmp(&self.data[j].abs())
                .unwrap_or(Ordering::Equal)
        }) else {
            return true;
        };
        let factor = other.data[lead] / self.data[lead];
        self.data
            .iter()
            .zip(&other.data)
            .all(|(&a, &b)| (b - factor * a).is_negligible(eps))
    }

    /// Multiply every entry by `k` in place.
    pub fn scale(&mut self, k: T) {
        for v in &mut self.data {
            *v *= k;
        }
        self.invalidate();
    }

    /// A copy of this vector with every entry multiplied by `k`.
    #[must_use]
    pub fn scaled(&self, k: T) -> Self {
        Self::new(self.data.iter().map(|&v| v * k).collect()).with_config(self.config)
    }

    /// Rescale so every entry is (near-)integral by dividing through by the
    /// smallest-magnitude non-integral entry. Leaves the vector untouched if
    /// that does not yield an all-integer vector.
    ///
    /// ```
    /// # use lava_core::Vector;
    /// let mut v = Vector::new(vec![0.5, -0.25, 1.0]);
    /// v.scale_whole_num();
    /// assert!(v.approx_eq(&Vector::new(vec![2.0, -1.0, 4.0])));
    /// ```
    pub fn scale_whole_num(&mut self) {
        let eps = self.config.eps::<T>();
        let factor = self
            .data
            .iter()
            .map(|v| v.abs())
            .filter(|&v| !v.is_negligible(eps) && !v.is_whole(eps))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let Some(factor) = factor else {
            return;
        };
        let candidate: Vec<T> = self.data.iter().map(|&v| v / factor).collect();
        if candidate.iter().all(|v| v.is_whole(eps)) {
            self.data = candidate;
            self.invalidate();
        }
    }

    /// Whether every entry is smaller than `epsilon` in absolute value.
    pub fn is_zero(&self) -> bool {
        let eps = self.config.eps::<T>();
        self.data.iter().all(|v| v.is_negligible(eps))
    }

    /// This vector as an `n x 1` column matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix::from_parts(self.len(), 1, self.data.clone(), self.config)
    }

    /// `self += alpha * x`, without a length check.
    pub(crate) fn axpy(&mut self, alpha: T, x: &Vector<T>) {
        for (yi, &xi) in self.data.iter_mut().zip(&x.data) {
            *yi += alpha * xi;
        }
        self.invalidate();
    }

    fn check_len(&self, other: &Vector<T>) -> Result<()> {
        if self.len() != other.len() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.len()],
                got: vec![other.len()],
            });
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.magnitude = OnceCell::new();
        self.unit = OnceCell::new();
    }
}

impl<T: Float> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T: Float> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match f.precision() {
                Some(p) => write!(f, "{v:.p$}")?,
                None => write!(f, "{v}")?,
            }
        }
        write!(f, ")")
    }
}
