//! Ordered collections of vectors: Gram-Schmidt, bases and coordinates.

use crate::Float;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;
use crate::square::SquareMatrix;

use super::Vector;

/// An ordered sequence of vectors.
///
/// Insertion order is significant: it fixes the Gram-Schmidt processing
/// order and the column order of [`to_matrix`](Self::to_matrix).
/// Duplicates and linearly dependent vectors are accepted.
#[derive(Debug, Clone, Default)]
pub struct VectorSet<T: Float = f64> {
    vectors: Vec<Vector<T>>,
}

impl<T: Float> VectorSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            vectors: Vec::new(),
        }
    }

    /// A set holding `vectors` in the given order.
    pub fn from_vectors(vectors: Vec<Vector<T>>) -> Self {
        Self { vectors }
    }

    /// Append a vector.
    pub fn add(&mut self, vector: Vector<T>) {
        self.vectors.push(vector);
    }

    /// The vector at 0-based position `index`.
    pub fn get(&self, index: usize) -> Option<&Vector<T>> {
        self.vectors.get(index)
    }

    /// Number of vectors.
    #[inline]
    pub fn size(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector<T>> {
        self.vectors.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vector<T>] {
        &self.vectors
    }

    /// The common length of the vectors in this set.
    pub fn dimension(&self) -> Result<usize> {
        let first = self.vectors.first().ok_or(CoreError::InvalidArgument {
            reason: "vector set is empty",
        })?;
        let n = first.len();
        if let Some(bad) = self.vectors.iter().find(|v| v.len() != n) {
            return Err(CoreError::DimensionMismatch {
                expected: vec![n],
                got: vec![bad.len()],
            });
        }
        Ok(n)
    }

    /// Classical Gram-Schmidt orthogonalisation.
    ///
    /// `u_i = v_i - sum_{j<i} (<v_i, u_j> / <u_j, u_j>) u_j`, processed in
    /// insertion order. Already-orthogonalised vectors that are zero within
    /// tolerance are skipped as projection targets. The input set is not
    /// modified.
    ///
    /// ```
    /// # use lava_core::{Vector, VectorSet};
    /// let set = VectorSet::from_vectors(vec![
    ///     Vector::new(vec![1.0, 1.0]),
    ///     Vector::new(vec![1.0, 0.0]),
    /// ]);
    /// let ortho = set.gram_schmidt().unwrap();
    /// let d: f64 = ortho.get(0).unwrap().dot(ortho.get(1).unwrap()).unwrap();
    /// assert!(d.abs() < 1e-12);
    /// ```
    pub fn gram_schmidt(&self) -> Result<Self> {
        if self.is_empty() {
            return Ok(Self::new());
        }
        self.dimension()?;
        let mut basis: Vec<Vector<T>> = Vec::with_capacity(self.size());
        for v in &self.vectors {
            let mut u = Vector::from_slice(v.as_slice()).with_config(*v.config());
            for prev in &basis {
                if prev.is_zero() {
                    continue;
                }
                let coefficient = v.dot(prev)? / prev.dot(prev)?;
                u.axpy(-coefficient, prev);
            }
            basis.push(u);
        }
        Ok(Self::from_vectors(basis))
    }

    /// Normalise every vector of an (already orthogonal) set.
    #[must_use]
    pub fn orthonormalise(&self) -> Self {
        self.vectors.iter().map(Vector::normalized).collect()
    }

    /// Lay the vectors out as matrix columns. All-zero vectors are moved to
    /// the trailing columns.
    pub fn to_matrix(&self) -> Result<Matrix<T>> {
        let rows = self.dimension()?;
        let cols = self.size();
        let config = *self.vectors[0].config();
        let ordered = self
            .vectors
            .iter()
            .filter(|v| !v.is_zero())
            .chain(self.vectors.iter().filter(|v| v.is_zero()));
        let mut data = vec![T::zero(); rows * cols];
        for (c, v) in ordered.enumerate() {
            for (r, &x) in v.as_slice().iter().enumerate() {
                data[r * cols + c] = x;
            }
        }
        Ok(Matrix::from_parts(rows, cols, data, config))
    }

    /// As [`to_matrix`](Self::to_matrix), requiring as many vectors as each
    /// vector has entries.
    pub fn to_square_matrix(&self) -> Result<SquareMatrix<T>> {
        SquareMatrix::try_from(self.to_matrix()?)
    }

    /// The linear combination `sum(c_i * b_i)` of this set's vectors with the
    /// given coordinates.
    ///
    /// ```
    /// # use lava_core::{Vector, VectorSet};
    /// let basis = VectorSet::from_vectors(vec![
    ///     Vector::new(vec![1.0, 0.0]),
    ///     Vector::new(vec![1.0, 2.0]),
    /// ]);
    /// let x = basis.coordinates(&Vector::new(vec![-2.0, 3.0])).unwrap();
    /// assert_eq!(x.as_slice(), &[1.0, 6.0]);
    /// ```
    pub fn coordinates(&self, coordinates: &Vector<T>) -> Result<Vector<T>> {
        let n = self.dimension()?;
        if coordinates.len() != self.size() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.size()],
                got: vec![coordinates.len()],
            });
        }
        let mut out = Vector::zeros(n).with_config(*self.vectors[0].config());
        for (b, &c) in self.vectors.iter().zip(coordinates.as_slice()) {
            out.axpy(c, b);
        }
        Ok(out)
    }

    /// The matrix expressing this basis in terms of `target`.
    pub fn change_of_basis(&self, target: &VectorSet<T>) -> Result<Matrix<T>> {
        self.to_matrix()?.change_of_basis(&target.to_matrix()?)
    }

    /// Whether some vector of the set equals `vector` within tolerance.
    pub fn contains(&self, vector: &Vector<T>) -> bool {
        self.vectors.iter().any(|v| v.approx_eq(vector))
    }

    /// Order-independent equality: both sets hold the same vectors with the
    /// same multiplicities.
    pub fn same_elements(&self, other: &VectorSet<T>) -> bool {
        if self.size() != other.size() {
            return false;
        }
        let mut unmatched: Vec<&Vector<T>> = other.vectors.iter().collect();
        for v in &self.vectors {
            match unmatched.iter().position(|w| v.approx_eq(w)) {
                Some(i) => {
                    unmatched.swap_remove(i);
                }
                None => return false,
            }
        }
        true
    }
}

impl<T: Float> FromIterator<Vector<T>> for VectorSet<T> {
    fn from_iter<I: IntoIterator<Item = Vector<T>>>(iter: I) -> Self {
        Self::from_vectors(iter.into_iter().collect())
    }
}

impl<T: Float> IntoIterator for VectorSet<T> {
    type Item = Vector<T>;
    type IntoIter = std::vec::IntoIter<Vector<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.into_iter()
    }
}

impl<'a, T: Float> IntoIterator for &'a VectorSet<T> {
    type Item = &'a Vector<T>;
    type IntoIter = core::slice::Iter<'a, Vector<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}
