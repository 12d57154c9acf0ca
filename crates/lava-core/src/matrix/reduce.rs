//! Row reduction and everything read off it: rank profile, null space,
//! column space, linear systems and change of basis.

use crate::Float;
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::vector::{Vector, VectorSet};

use super::Matrix;
use super::elimination::{Companion, Pivoting, Pivots, eliminate};

impl<T: Float> Matrix<T> {
    /// Gaussian elimination. Returns the reduced row-echelon form when
    /// `reduced` is set, the row-echelon form otherwise. Both are memoised,
    /// and whichever runs first records the pivots shared by the rank
    /// queries.
    pub fn row_reduction(&self, reduced: bool) -> &Matrix<T> {
        let slot = if reduced {
            &self.cache.reduced_row_echelon
        } else {
            &self.cache.row_echelon
        };
        slot.get_or_init(|| {
            let (form, pivots) = self.reduce(reduced);
            let _ = self.cache.pivots.set(pivots);
            Box::new(form)
        })
    }

    /// Row-echelon form: zeros below every pivot, pivots scaled to `1`.
    pub fn row_echelon(&self) -> &Matrix<T> {
        self.row_reduction(false)
    }

    /// Reduced row-echelon form: every pivot is `1` and the only non-zero
    /// entry of its column.
    ///
    /// ```
    /// # use lava_core::Matrix;
    /// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert!(a.reduced_row_echelon().approx_eq(&Matrix::identity(2)));
    /// ```
    pub fn reduced_row_echelon(&self) -> &Matrix<T> {
        self.row_reduction(true)
    }

    /// The pivot structure of this matrix.
    pub fn pivots(&self) -> &Pivots {
        self.cache.pivots.get_or_init(|| {
            let (form, pivots) = self.reduce(false);
            let _ = self.cache.row_echelon.set(Box::new(form));
            pivots
        })
    }

    /// Zero-based pivot columns.
    pub fn pivot_columns(&self) -> &[usize] {
        self.pivots().columns()
    }

    /// Zero-based pivot rows, parallel to [`pivot_columns`](Self::pivot_columns).
    pub fn pivot_rows(&self) -> &[usize] {
        self.pivots().rows()
    }

    pub fn rank(&self) -> usize {
        self.pivots().len()
    }

    /// Dimension of the null space; `rank + nullity == width`.
    pub fn nullity(&self) -> usize {
        self.cols - self.rank()
    }

    /// Whether the columns are linearly independent.
    pub fn is_linearly_independent(&self) -> bool {
        self.rank() == self.cols
    }

    /// Whether the columns span the codomain.
    pub fn is_surjective(&self) -> bool {
        self.rank() == self.rows
    }

    pub fn is_injective(&self) -> bool {
        self.nullity() == 0
    }

    /// A basis for the null space.
    ///
    /// One vector per free column `c`: a `1` at position `c` and, for every
    /// pivot at `(row r, column p)`, `-RREF[r][c]` at position `p`. A matrix
    /// of full column rank yields the single zero vector.
    ///
    /// ```
    /// # use lava_core::{Matrix, Vector};
    /// let a = Matrix::from_rows(vec![
    ///     vec![1.0, 2.0, 3.0],
    ///     vec![4.0, 5.0, 6.0],
    ///     vec![7.0, 8.0, 9.0],
    /// ]).unwrap();
    /// let ns = a.null_space();
    /// assert_eq!(ns.size(), 1);
    /// assert!(ns.get(0).unwrap().approx_eq(&Vector::new(vec![1.0, -2.0, 1.0])));
    /// ```
    pub fn null_space(&self) -> VectorSet<T> {
        if self.is_linearly_independent() {
            return VectorSet::from_vectors(vec![
                Vector::zeros(self.cols).with_config(self.config),
            ]);
        }
        let rref = self.reduced_row_echelon();
        free_directions(rref.as_slice(), self.cols, self.pivots(), &self.config)
    }

    /// The original columns at the pivot positions: a basis for the column
    /// space.
    pub fn column_space(&self) -> VectorSet<T> {
        self.pivot_columns()
            .iter()
            .map(|&c| self.column_vector(c))
            .collect()
    }

    /// One solution of `A x = b`, or `None` if the system is inconsistent.
    ///
    /// Free variables are set to zero.
    ///
    /// ```
    /// # use lava_core::{Matrix, Vector};
    /// let a = Matrix::from_rows(vec![
    ///     vec![1.0, 0.0, 1.0, 0.0],
    ///     vec![0.0, 2.0, 2.0, 2.0],
    ///     vec![4.0, -2.0, 2.0, -2.0],
    /// ]).unwrap();
    /// let x = a.solve(&Vector::new(vec![2.0, -10.0, 18.0])).unwrap().unwrap();
    /// assert!(x.approx_eq(&Vector::new(vec![2.0, -5.0, 0.0, 0.0])));
    /// ```
    pub fn solve(&self, b: &Vector<T>) -> Result<Option<Vector<T>>> {
        Ok(self
            .augmented_reduction(b)?
            .as_ref()
            .map(ReducedSystem::particular))
    }

    /// Every solution of `A x = b` as a particular solution plus the span
    /// of the null-space directions, or `None` if the system is inconsistent.
    pub fn general_solution(&self, b: &Vector<T>) -> Result<Option<GeneralSolution<T>>> {
        Ok(self.augmented_reduction(b)?.map(|system| {
            let directions = free_directions(
                &system.coefficients,
                self.cols,
                &system.pivots,
                &self.config,
            );
            let free_columns = (0..self.cols)
                .filter(|&c| !system.pivots.is_pivot_column(c))
                .collect();
            GeneralSolution {
                particular: system.particular(),
                free_columns,
                directions,
            }
        }))
    }

    /// Express the columns of `self` in terms of the columns of `target`.
    ///
    /// The same row operations that reduce `target` to reduced row-echelon
    /// form are applied to `self`; column `j` of the result holds the
    /// coordinates of `self`'s column `j` in the `target` basis.
    pub fn change_of_basis(&self, target: &Matrix<T>) -> Result<Matrix<T>> {
        if target.shape() != self.shape() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.rows, self.cols],
                got: vec![target.rows, target.cols],
            });
        }
        let eps = self.config.eps::<T>();
        let mut basis = target.data.clone();
        let mut mirrored = self.data.clone();
        let elimination = eliminate(
            &mut basis,
            self.rows,
            self.cols,
            Some(Companion {
                data: &mut mirrored,
                cols: self.cols,
            }),
            Pivoting::FirstNonZero,
            true,
            eps,
        );
        if elimination.pivots.len() < self.cols {
            return Err(CoreError::InvalidArgument {
                reason: "target basis is linearly dependent",
            });
        }
        if mirrored[self.cols * self.cols..]
            .iter()
            .any(|v| !v.is_negligible(eps))
        {
            return Err(CoreError::InvalidArgument {
                reason: "vectors do not lie in the span of the target basis",
            });
        }
        mirrored.truncate(self.cols * self.cols);
        Ok(Matrix::from_parts(self.cols, self.cols, mirrored, self.config))
    }

    fn reduce(&self, full: bool) -> (Matrix<T>, Pivots) {
        let mut work = self.data.clone();
        let elimination = eliminate(
            &mut work,
            self.rows,
            self.cols,
            None,
            Pivoting::FirstNonZero,
            full,
            self.config.eps(),
        );
        log::debug!(
            "reduced {}x{} matrix ({}): rank {}",
            self.rows,
            self.cols,
            if full { "rref" } else { "ref" },
            elimination.pivots.len()
        );
        (
            Matrix::from_parts(self.rows, self.cols, work, self.config),
            elimination.pivots,
        )
    }

    /// Reduce `[A | b]` to reduced row-echelon form. `None` when some row has
    /// zero coefficients but a non-zero right-hand side.
    fn augmented_reduction(&self, b: &Vector<T>) -> Result<Option<ReducedSystem<T>>> {
        if b.len() != self.rows {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.rows],
                got: vec![b.len()],
            });
        }
        let eps = self.config.eps::<T>();
        let mut coefficients = self.data.clone();
        let mut rhs = b.as_slice().to_vec();
        let elimination = eliminate(
            &mut coefficients,
            self.rows,
            self.cols,
            Some(Companion {
                data: &mut rhs,
                cols: 1,
            }),
            Pivoting::FirstNonZero,
            true,
            eps,
        );
        let inconsistent = (0..self.rows).any(|r| {
            let row = &coefficients[r * self.cols..(r + 1) * self.cols];
            row.iter().all(|v| v.is_negligible(eps)) && !rhs[r].is_negligible(eps)
        });
        if inconsistent {
            log::debug!("system is inconsistent; no solution");
            return Ok(None);
        }
        Ok(Some(ReducedSystem {
            coefficients,
            rhs,
            pivots: elimination.pivots,
            cols: self.cols,
            config: self.config,
        }))
    }
}

/// A consistent system `[A | b]` in reduced row-echelon form.
struct ReducedSystem<T: Float> {
    coefficients: Vec<T>,
    rhs: Vec<T>,
    pivots: Pivots,
    cols: usize,
    config: Config,
}

impl<T: Float> ReducedSystem<T> {
    fn particular(&self) -> Vector<T> {
        let mut x = vec![T::zero(); self.cols];
        for (c, r) in self.pivots.iter() {
            x[c] = self.rhs[r];
        }
        Vector::new(x).with_config(self.config)
    }
}

/// Null-space directions read off a reduced row-echelon buffer.
fn free_directions<T: Float>(
    rref: &[T],
    cols: usize,
    pivots: &Pivots,
    config: &Config,
) -> VectorSet<T> {
    (0..cols)
        .filter(|&c| !pivots.is_pivot_column(c))
        .map(|free| {
            let mut v = vec![T::zero(); cols];
            v[free] = T::one();
            for (p, r) in pivots.iter() {
                v[p] = -rref[r * cols + free];
            }
            Vector::new(v).with_config(*config)
        })
        .collect()
}

/// The complete solution set of a consistent linear system:
/// `x = particular + sum(t_i * directions[i])` for free parameters `t_i`.
#[derive(Debug, Clone)]
pub struct GeneralSolution<T: Float = f64> {
    pub(super) particular: Vector<T>,
    pub(super) free_columns: Vec<usize>,
    pub(super) directions: VectorSet<T>,
}

impl<T: Float> GeneralSolution<T> {
    /// The solution with every free variable set to zero.
    pub fn particular(&self) -> &Vector<T> {
        &self.particular
    }

    /// Zero-based indices of the free variables.
    pub fn free_columns(&self) -> &[usize] {
        &self.free_columns
    }

    /// One null-space direction per free variable, in the same order.
    pub fn directions(&self) -> &VectorSet<T> {
        &self.directions
    }

    /// Whether the system has exactly one solution.
    pub fn is_unique(&self) -> bool {
        self.free_columns.is_empty()
    }

    /// The solution for the given values of the free variables.
    pub fn evaluate(&self, parameters: &[T]) -> Result<Vector<T>> {
        if parameters.len() != self.free_columns.len() {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.free_columns.len()],
                got: vec![parameters.len()],
            });
        }
        let mut x = self.particular.clone();
        for (direction, &t) in self.directions.iter().zip(parameters) {
            x.axpy(t, direction);
        }
        Ok(x)
    }
}
