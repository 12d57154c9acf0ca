use core::fmt;

use thiserror::Error;

/// Which kind of index an [`CoreError::InvalidIndex`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// A 1-based matrix row.
    Row,
    /// A 1-based matrix column.
    Column,
    /// A 0-based vector position.
    Entry,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
            Self::Entry => write!(f, "entry"),
        }
    }
}

/// All errors returned by `lava-core`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Operand shapes do not match the required layout.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A row, column or entry index lies outside the valid range.
    #[error("{axis} index {index} is out of range for extent {extent}")]
    InvalidIndex {
        axis: Axis,
        index: usize,
        extent: usize,
    },

    /// Matrix is singular and cannot be inverted.
    #[error("singular matrix")]
    SingularMatrix,

    /// The QR algorithm did not reach triangular form.
    #[error("QR algorithm did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
}

/// Convenience alias used throughout `lava-core`.
pub type Result<T> = std::result::Result<T, CoreError>;
