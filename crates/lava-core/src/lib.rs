//! `lava-core`: dense real linear algebra.
//!
//! Provides vectors, vector sets, rectangular and square matrices and the
//! classical hand-computation algorithms over them: Gaussian elimination,
//! rank and null space, linear systems, change of basis, Gram-Schmidt QR,
//! eigenvalues by the QR algorithm and diagonalisation.
//!
//! # Design
//!
//! - Generic over the element type via the [`Scalar`] / [`Float`] trait
//!   hierarchy, defaulting to `f64`.
//! - Equality is tolerance-based. Every value carries the [`Config`] it was
//!   built with, and derived values inherit it.
//! - Derived state (echelon forms, determinant, eigenvalues, ...) is computed
//!   on first use and memoised; every `&mut self` mutator clears it.
//! - Row and column indices in the public API are 1-based; vector positions
//!   and pivot lists are 0-based.

pub mod config;
pub mod dtype;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod square;
pub mod vector;

// Re-export key types at crate root for convenience.
pub use config::Config;
pub use dtype::{Float, Scalar};
pub use error::{Axis, CoreError, Result};
pub use matrix::{GeneralSolution, Matrix, Pivots};
pub use ops::MatrixKind;
pub use square::{Diagonalisation, EigenPair, QrFactors, SquareMatrix};
pub use vector::{Vector, VectorSet};

/// Items intended for glob-import: `use lava_core::prelude::*;`
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dtype::{Float, Scalar};
    pub use crate::error::{CoreError, Result};
    pub use crate::matrix::Matrix;
    pub use crate::ops::{self, MatrixKind};
    pub use crate::square::SquareMatrix;
    pub use crate::vector::{Vector, VectorSet};
}
