//! `Display` formatting for [`Matrix`] and [`GeneralSolution`].

use core::fmt;

use crate::Float;

use super::{GeneralSolution, Matrix};

fn entry<T: Float>(f: &mut fmt::Formatter<'_>, v: T) -> fmt::Result {
    match f.precision() {
        Some(p) => write!(f, "{v:.p$}"),
        None => write!(f, "{v}"),
    }
}

impl<T: Float> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return write!(f, "matrix([], shape=({}, {}))", self.rows, self.cols);
        }
        writeln!(f, "matrix([")?;
        for r in 0..self.rows {
            write!(f, "  [")?;
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, ", ")?;
                }
                entry(f, self.at(r, c))?;
            }
            if r < self.rows - 1 {
                writeln!(f, "],")?;
            } else {
                writeln!(f, "]")?;
            }
        }
        write!(f, "])")
    }
}

/// One line per variable: `x1 = 2 - 1·x3` for pivot variables, `x3 free`
/// for free ones.
impl<T: Float> fmt::Display for GeneralSolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eps = self.particular.config().eps::<T>();
        let n = self.particular.len();
        for i in 0..n {
            if i > 0 {
                writeln!(f)?;
            }
            if self.free_columns.contains(&i) {
                write!(f, "x{} free", i + 1)?;
                continue;
            }
            write!(f, "x{} = ", i + 1)?;
            entry(f, self.particular.as_slice()[i])?;
            for (&free, direction) in self.free_columns.iter().zip(&self.directions) {
                let coefficient = direction.as_slice()[i];
                if coefficient.is_negligible(eps) {
                    continue;
                }
                if coefficient < T::zero() {
                    write!(f, " - ")?;
                } else {
                    write!(f, " + ")?;
                }
                entry(f, coefficient.abs())?;
                write!(f, "·x{}", free + 1)?;
            }
        }
        Ok(())
    }
}
