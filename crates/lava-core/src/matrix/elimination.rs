//! Gaussian / Gauss-Jordan elimination on row-major buffers.
//!
//! A single kernel serves every reduction in the crate. An optional
//! *companion* buffer with the same number of rows receives exactly the same
//! sequence of row operations; this is how inverses (companion = identity),
//! linear systems (companion = right-hand side) and changes of basis
//! (companion = the other basis) are computed.

use core::cmp::Ordering;

use crate::Float;

/// Pivot positions found by elimination, zero-based.
///
/// `columns()[i]` is the column of the `i`-th pivot and `rows()[i]` the row
/// it ended up in. Both lists have length equal to the rank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pivots {
    columns: Vec<usize>,
    rows: Vec<usize>,
}

impl Pivots {
    /// Zero-based pivot columns, in increasing order.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Zero-based pivot rows, parallel to [`columns`](Self::columns).
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of pivots, i.e. the rank.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `column` (zero-based) holds a pivot.
    pub fn is_pivot_column(&self, column: usize) -> bool {
        self.columns.binary_search(&column).is_ok()
    }

    /// `(column, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns.iter().copied().zip(self.rows.iter().copied())
    }

    fn push(&mut self, column: usize, row: usize) {
        self.columns.push(column);
        self.rows.push(row);
    }
}

/// How the pivot row is chosen within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pivoting {
    /// The first row at or below the pivot position with a non-negligible entry.
    FirstNonZero,
    /// The row with the largest absolute entry (partial pivoting).
    Largest,
}

/// Outcome of [`eliminate`].
#[derive(Debug, Clone)]
pub(crate) struct Elimination<T> {
    pub pivots: Pivots,
    /// Number of row exchanges performed.
    pub swaps: usize,
    /// Product of the pivot values before each pivot row was normalised.
    pub pivot_product: T,
}

impl<T: Float> Elimination<T> {
    /// `det = (-1)^swaps * product(pivots)`, or zero when a column had no pivot.
    pub fn determinant(&self, n: usize) -> T {
        if self.pivots.len() < n {
            return T::zero();
        }
        if self.swaps % 2 == 1 {
            -self.pivot_product
        } else {
            self.pivot_product
        }
    }
}

/// A buffer that mirrors the row operations applied to the work matrix.
pub(crate) struct Companion<'a, T> {
    pub data: &'a mut [T],
    pub cols: usize,
}

/// Reduce `work` (`rows x cols`, row-major) in place.
///
/// Each pivot row is normalised so the pivot becomes `1`. With `full` set,
/// entries above each pivot are eliminated too (reduced row-echelon form);
/// otherwise only entries below it are. Columns with no entry of magnitude
/// at least `eps` at or below the current pivot row are skipped.
#[allow(clippy::many_single_char_names)]
pub(crate) fn eliminate<T: Float>(
    work: &mut [T],
    rows: usize,
    cols: usize,
    mut companion: Option<Companion<'_, T>>,
    pivoting: Pivoting,
    full: bool,
    eps: T,
) -> Elimination<T> {
    let mut pivots = Pivots::default();
    let mut swaps = 0;
    let mut pivot_product = T::one();
    let mut pivot = 0;

    for c in 0..cols {
        if pivot == rows {
            break;
        }

        let candidate = match pivoting {
            Pivoting::FirstNonZero => {
                (pivot..rows).find(|&r| !work[r * cols + c].is_negligible(eps))
            }
            Pivoting::Largest => (pivot..rows)
                .max_by(|&a, &b| {
                    work[a * cols + c]
                        .abs()
                        .partial_cmp(&work[b * cols + c].abs())
                        .unwrap_or(Ordering::Equal)
                })
                .filter(|&r| !work[r * cols + c].is_negligible(eps)),
        };
        let Some(k) = candidate else {
            continue;
        };

        if k != pivot {
            swap_rows(work, cols, pivot, k);
            if let Some(other) = companion.as_mut() {
                swap_rows(other.data, other.cols, pivot, k);
            }
            swaps += 1;
        }

        let p = work[pivot * cols + c];
        pivot_product *= p;

        let targets = if full { 0..rows } else { (pivot + 1)..rows };
        for r in targets {
            if r == pivot {
                continue;
            }
            let factor = work[r * cols + c] / p;
            add_scaled_row(work, cols, pivot, r, -factor);
            work[r * cols + c] = T::zero();
            if let Some(other) = companion.as_mut() {
                add_scaled_row(other.data, other.cols, pivot, r, -factor);
            }
        }

        let inv = p.recip();
        scale_row(work, cols, pivot, inv);
        work[pivot * cols + c] = T::one();
        if let Some(other) = companion.as_mut() {
            scale_row(other.data, other.cols, pivot, inv);
        }

        pivots.push(c, pivot);
        pivot += 1;
    }

    Elimination {
        pivots,
        swaps,
        pivot_product,
    }
}

/// Exchange rows `a` and `b` (zero-based).
pub(crate) fn swap_rows<T>(data: &mut [T], cols: usize, a: usize, b: usize) {
    if a == b {
        return;
    }
    for j in 0..cols {
        data.swap(a * cols + j, b * cols + j);
    }
}

/// Multiply row `r` (zero-based) by `k`.
pub(crate) fn scale_row<T: Float>(data: &mut [T], cols: usize, r: usize, k: T) {
    for v in &mut data[r * cols..(r + 1) * cols] {
        *v *= k;
    }
}

/// `row[target] += k * row[source]` (zero-based).
pub(crate) fn add_scaled_row<T: Float>(
    data: &mut [T],
    cols: usize,
    source: usize,
    target: usize,
    k: T,
) {
    for j in 0..cols {
        let s = data[source * cols + j];
        data[target * cols + j] += k * s;
    }
}
