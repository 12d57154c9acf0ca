//! # Lava
//!
//! Dense real linear algebra for teaching-scale problems: row reduction,
//! null spaces, linear systems, QR, eigenvalues and diagonalisation.
//!
//! One `use lava::prelude::*;` gives you vectors, matrices and the
//! arithmetic in [`ops`](lava_core::ops).
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | Vectors, matrices, decompositions |
//!
//! ```
//! # #[cfg(feature = "core")] {
//! use lava::prelude::*;
//!
//! let a = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
//! let values = a.eigenvalues().unwrap();
//! assert!((values[0] - 3.0).abs() < 1e-6);
//! assert!((values[1] - 1.0).abs() < 1e-6);
//! # }
//! ```

#[cfg(feature = "core")]
pub use lava_core as core;

/// Glob-import convenience: `use lava::prelude::*;`
#[cfg(feature = "core")]
pub mod prelude {
    pub use lava_core::prelude::*;
}
