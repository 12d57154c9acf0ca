//! Eigenvalues via the unshifted QR algorithm, eigenvectors via null spaces,
//! diagonalisation and similarity.
//!
//! Only real eigenvalues are supported. Matrices whose eigenvalues share a
//! magnitude without being equal (rotations, permutations) never reach
//! triangular form and report [`CoreError::NoConvergence`].

use core::cmp::Ordering;

use crate::Float;
use crate::error::{CoreError, Result};
use crate::ops;
use crate::vector::{Vector, VectorSet};

use super::SquareMatrix;

/// An eigenvalue together with one of its eigenvectors.
#[derive(Debug, Clone)]
pub struct EigenPair<T: Float = f64> {
    value: T,
    vector: Vector<T>,
}

impl<T: Float> EigenPair<T> {
    pub fn value(&self) -> T {
        self.value
    }

    pub fn vector(&self) -> &Vector<T> {
        &self.vector
    }
}

/// `A = P D P^-1` with `D` diagonal.
#[derive(Debug, Clone)]
pub struct Diagonalisation<T: Float = f64> {
    p: SquareMatrix<T>,
    d: SquareMatrix<T>,
    p_inverse: SquareMatrix<T>,
}

impl<T: Float> Diagonalisation<T> {
    /// Eigenvectors as columns.
    pub fn p(&self) -> &SquareMatrix<T> {
        &self.p
    }

    /// Eigenvalues on the diagonal, in the column order of `P`.
    pub fn d(&self) -> &SquareMatrix<T> {
        &self.d
    }

    pub fn p_inverse(&self) -> &SquareMatrix<T> {
        &self.p_inverse
    }

    /// `A^k` computed as `P D^k P^-1`.
    pub fn power(&self, k: u32) -> Result<SquareMatrix<T>> {
        let n = self.d.size();
        let mut dk = SquareMatrix::identity(n).with_config(*self.d.config());
        for i in 1..=n {
            let lambda = self.d.get(i, i)?;
            let mut value = T::one();
            for _ in 0..k {
                value *= lambda;
            }
            dk.set(i, i, value)?;
        }
        ops::matmul(&ops::matmul(&self.p, &dk)?, &self.p_inverse)
    }

    /// `P D P^-1`, which reproduces the original matrix.
    pub fn reconstruct(&self) -> Result<SquareMatrix<T>> {
        self.power(1)
    }
}

impl<T: Float> SquareMatrix<T> {
    /// The eigenvalues, computed once.
    ///
    /// Triangular matrices yield their diagonal exactly. Otherwise the
    /// unshifted QR algorithm `A <- R Q` runs until the running matrix is
    /// triangular within `Config::convergence`, and the eigenvalues are read
    /// off its diagonal (typically in decreasing order of magnitude).
    ///
    /// ```
    /// # use lava_core::SquareMatrix;
    /// let a = SquareMatrix::from_rows(vec![
    ///     vec![1.0, 2.0, 3.0],
    ///     vec![0.0, 4.0, 5.0],
    ///     vec![0.0, 0.0, 6.0],
    /// ]).unwrap();
    /// assert_eq!(a.eigenvalues().unwrap(), &[1.0, 4.0, 6.0]);
    /// ```
    pub fn eigenvalues(&self) -> Result<&[T]> {
        self.cache
            .eigenvalues
            .get_or_try_init(|| self.qr_algorithm())
            .map(Vec::as_slice)
    }

    /// Every eigenvalue paired with each vector of a basis of its eigenspace.
    ///
    /// Eigenvalues equal within `epsilon` are treated as one; vectors are
    /// rescaled to whole numbers where possible.
    pub fn eigenpairs(&self) -> Result<&[EigenPair<T>]> {
        self.cache
            .eigenpairs
            .get_or_try_init(|| self.find_eigenpairs())
            .map(Vec::as_slice)
    }

    /// The eigenvectors of every distinct eigenvalue, in eigenvalue order.
    pub fn eigenvectors(&self) -> Result<VectorSet<T>> {
        Ok(self
            .eigenpairs()?
            .iter()
            .map(|pair| pair.vector.clone())
            .collect())
    }

    /// Whether the eigenvectors form a basis.
    pub fn is_diagonalisable(&self) -> Result<bool> {
        Ok(self.eigenpairs()?.len() == self.size())
    }

    /// `A = P D P^-1`, or `None` when the matrix is not diagonalisable.
    ///
    /// ```
    /// # use lava_core::{SquareMatrix, ops};
    /// let a = SquareMatrix::from_rows(vec![
    ///     vec![1.0, 2.0, 0.0],
    ///     vec![0.0, 3.0, 0.0],
    ///     vec![2.0, 4.0, -2.0],
    /// ]).unwrap();
    /// let diag = a.diagonalise().unwrap().unwrap();
    /// assert!(diag.d().is_diagonal());
    /// assert!(diag.reconstruct().unwrap().approx_eq(&a));
    /// ```
    pub fn diagonalise(&self) -> Result<Option<&Diagonalisation<T>>> {
        self.cache
            .diagonalisation
            .get_or_try_init(|| self.build_diagonalisation())
            .map(Option::as_deref)
    }

    /// Whether both matrices have the same eigenvalues, compared as sorted
    /// lists at `epsilon * similarity_factor`.
    pub fn similar(&self, other: &SquareMatrix<T>) -> Result<bool> {
        if self.size() != other.size() {
            return Ok(false);
        }
        let tol = self.config().similarity_eps::<T>();
        let mut mine = self.eigenvalues()?.to_vec();
        let mut theirs = other.eigenvalues()?.to_vec();
        mine.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        theirs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Ok(mine
            .iter()
            .zip(&theirs)
            .all(|(&a, &b)| (a - b).is_negligible(tol)))
    }

    fn qr_algorithm(&self) -> Result<Vec<T>> {
        if self.is_triangular() {
            log::debug!(
                "eigenvalues of triangular {0}x{0} read off the diagonal",
                self.size()
            );
            return Ok(self.diagonal());
        }

        let config = self.config().for_iteration();
        let mut current = ops::copy(self)?.with_config(config);
        for iteration in 1..=config.max_iterations {
            let next = {
                let factors = current.qr()?;
                ops::matmul(factors.r(), factors.q())?
            };
            current = next;
            log::trace!(
                "qr iteration {iteration}: diagonal {:?}",
                current.diagonal()
            );
            if current.is_triangular() {
                let values = current.diagonal();
                log::debug!("qr algorithm converged after {iteration} iterations: {values:?}");
                return Ok(values);
            }
        }

        log::warn!(
            "qr algorithm gave up on {0}x{0} matrix after {1} iterations",
            self.size(),
            config.max_iterations
        );
        Err(CoreError::NoConvergence {
            iterations: config.max_iterations,
        })
    }

    fn find_eigenpairs(&self) -> Result<Vec<EigenPair<T>>> {
        let eps = self.config().eps::<T>();
        let mut distinct: Vec<T> = Vec::new();
        for &value in self.eigenvalues()? {
            if !distinct.iter().any(|&d| (d - value).is_negligible(eps)) {
                distinct.push(value);
            }
        }

        let identity = SquareMatrix::identity(self.size()).with_config(*self.config());
        let mut pairs = Vec::new();
        for lambda in distinct {
            let shifted = ops::sub(self, &ops::scale(&identity, lambda)?)?;
            for mut vector in shifted.null_space() {
                if vector.is_zero() {
                    continue;
                }
                vector.scale_whole_num();
                pairs.push(EigenPair {
                    value: lambda,
                    vector,
                });
            }
        }
        log::debug!(
            "{} eigenvectors for {1}x{1} matrix",
            pairs.len(),
            self.size()
        );
        Ok(pairs)
    }

    fn build_diagonalisation(&self) -> Result<Option<Box<Diagonalisation<T>>>> {
        let n = self.size();
        let pairs = self.eigenpairs()?;
        if pairs.len() != n {
            log::debug!(
                "not diagonalisable: {} eigenvectors for size {n}",
                pairs.len()
            );
            return Ok(None);
        }

        let config = *self.config();
        let mut p = vec![T::zero(); n * n];
        let mut d = vec![T::zero(); n * n];
        for (c, pair) in pairs.iter().enumerate() {
            for (r, &x) in pair.vector.as_slice().iter().enumerate() {
                p[r * n + c] = x;
            }
            d[c * n + c] = pair.value;
        }
        let p = SquareMatrix::from_parts(n, p, config);
        let p_inverse = match p.inverse() {
            Ok(inverse) => ops::copy(inverse)?,
            Err(CoreError::SingularMatrix) => {
                log::debug!("not diagonalisable: eigenvector matrix is singular");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(Some(Box::new(Diagonalisation {
            p,
            d: SquareMatrix::from_parts(n, d, config),
            p_inverse,
        })))
    }
}
