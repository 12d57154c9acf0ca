//! Numeric type hierarchy for generic math.
//!
//! The trait hierarchy is:
//! ```text
//! Scalar
//!   └── Float  (f32, f64)
//! ```
//!
//! Vectors, matrices and every decomposition in this crate are generic over
//! [`Float`], defaulting to `f64`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Scalar: the root trait for every element type
// ---------------------------------------------------------------------------

/// Base trait for numeric element types.
pub trait Scalar:
    Copy
    + Clone
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Sum
    + Default
    + 'static
{
    /// The additive identity (`0`).
    fn zero() -> Self;

    /// The multiplicative identity (`1`).
    fn one() -> Self;
}

// ---------------------------------------------------------------------------
// Float: operations that only make sense for floating-point numbers
// ---------------------------------------------------------------------------

/// Trait for floating-point scalar types (`f32`, `f64`).
pub trait Float: Scalar + Neg<Output = Self> {
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn round(self) -> Self;
    fn recip(self) -> Self;
    fn is_finite(self) -> bool;

    /// Convert from an `f64` literal (used for tolerances and constants).
    fn from_f64(v: f64) -> Self;

    /// Whether `self` is within `tol` of zero.
    #[inline]
    fn is_negligible(self, tol: Self) -> bool {
        self.abs() < tol
    }

    /// Whether `self` lies within `tol` of an integer.
    #[inline]
    fn is_whole(self, tol: Self) -> bool {
        (self - self.round()).abs() < tol
    }
}

// ===========================================================================
// Macro implementations
// ===========================================================================

macro_rules! impl_scalar_float {
    ($ty:ty) => {
        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
        }

        impl Float for $ty {
            #[inline]
            fn abs(self) -> Self {
                <$ty>::abs(self)
            }
            #[inline]
            fn sqrt(self) -> Self {
                <$ty>::sqrt(self)
            }
            #[inline]
            fn round(self) -> Self {
                <$ty>::round(self)
            }
            #[inline]
            fn recip(self) -> Self {
                <$ty>::recip(self)
            }
            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }
            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_f64(v: f64) -> Self {
                v as Self
            }
        }
    };
}

impl_scalar_float!(f32);
impl_scalar_float!(f64);
