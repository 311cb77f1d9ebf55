//! Data Types - RetinaML Type System
//!
//! Defines the data types supported by RetinaML tensors and provides traits
//! for type-safe operations. Image data flows through the framework as f32;
//! argmax index tensors use i64; raw decoded image bytes arrive as u8.
//!
//! # Key Features
//! - Type-safe numeric operations via traits
//! - Runtime dtype information via `DType` enum
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use num_traits::{Float as NumFloat, Num, NumCast, One, Zero};

use core::fmt::Debug;

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of tensor data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point (single precision).
    F32,
    /// 64-bit floating point (double precision).
    F64,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
}

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F32 | Self::I32 => 4,
            Self::F64 | Self::I64 => 8,
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns true if this is an integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::I32 | Self::I64 | Self::U8)
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
        }
    }

    /// Returns the default floating point type (f32).
    #[must_use]
    pub const fn default_float() -> Self {
        Self::F32
    }

    /// Returns the default index type (i64).
    #[must_use]
    pub const fn default_int() -> Self {
        Self::I64
    }
}

impl Default for DType {
    fn default() -> Self {
        Self::F32
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for all scalar types that can be stored in a tensor.
///
/// This is the base trait that all tensor element types must implement.
pub trait Scalar:
    Copy + Clone + Debug + Default + PartialEq + Send + Sync + 'static
{
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

// =============================================================================
// Numeric Trait
// =============================================================================

/// Trait for numeric types that support arithmetic operations.
pub trait Numeric: Scalar + Num + NumCast + PartialOrd + Zero + One {
    /// The zero value for this type.
    const ZERO: Self;

    /// The one value for this type.
    const ONE: Self;

    /// Returns the minimum value for this type.
    fn min_value() -> Self;

    /// Returns the maximum value for this type.
    fn max_value() -> Self;
}

// =============================================================================
// Float Trait
// =============================================================================

/// Trait for floating point types.
pub trait Float: Numeric + NumFloat {
    /// Not a Number value.
    const NAN: Self;

    /// Positive infinity.
    const INFINITY: Self;

    /// Negative infinity.
    const NEG_INFINITY: Self;

    /// Machine epsilon.
    const EPSILON: Self;

    /// Returns true if this value is NaN.
    fn is_nan_value(self) -> bool;

    /// Returns the exponential of this value.
    fn exp_value(self) -> Self;

    /// Returns the natural logarithm of this value.
    fn ln_value(self) -> Self;

    /// Returns the square root of this value.
    fn sqrt_value(self) -> Self;
}

// =============================================================================
// Scalar Implementations
// =============================================================================

macro_rules! impl_scalar {
    ($ty:ty, $dtype:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }
    };
}

impl_scalar!(f32, DType::F32);
impl_scalar!(f64, DType::F64);
impl_scalar!(i32, DType::I32);
impl_scalar!(i64, DType::I64);
impl_scalar!(u8, DType::U8);

// =============================================================================
// Numeric Implementations
// =============================================================================

macro_rules! impl_numeric {
    ($ty:ty, $zero:expr, $one:expr) => {
        impl Numeric for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            fn min_value() -> Self {
                <$ty>::MIN
            }

            fn max_value() -> Self {
                <$ty>::MAX
            }
        }
    };
}

impl_numeric!(f32, 0.0, 1.0);
impl_numeric!(f64, 0.0, 1.0);
impl_numeric!(i32, 0, 1);
impl_numeric!(i64, 0, 1);
impl_numeric!(u8, 0, 1);

// =============================================================================
// Float Implementations
// =============================================================================

macro_rules! impl_float {
    ($ty:ty) => {
        impl Float for $ty {
            const NAN: Self = <$ty>::NAN;
            const INFINITY: Self = <$ty>::INFINITY;
            const NEG_INFINITY: Self = <$ty>::NEG_INFINITY;
            const EPSILON: Self = <$ty>::EPSILON;

            fn is_nan_value(self) -> bool {
                self.is_nan()
            }

            fn exp_value(self) -> Self {
                self.exp()
            }

            fn ln_value(self) -> Self {
                self.ln()
            }

            fn sqrt_value(self) -> Self {
                self.sqrt()
            }
        }
    };
}

impl_float!(f32);
impl_float!(f64);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F32.size_of(), 4);
        assert_eq!(DType::F64.size_of(), 8);
        assert_eq!(DType::I64.size_of(), 8);
        assert_eq!(DType::U8.size_of(), 1);
    }

    #[test]
    fn test_dtype_is_float() {
        assert!(DType::F32.is_float());
        assert!(DType::F64.is_float());
        assert!(!DType::I64.is_float());
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f32::dtype(), DType::F32);
        assert_eq!(i64::dtype(), DType::I64);
        assert_eq!(u8::dtype(), DType::U8);
    }

    #[test]
    fn test_numeric_constants() {
        assert_eq!(f32::ZERO, 0.0);
        assert_eq!(f32::ONE, 1.0);
        assert_eq!(i64::ZERO, 0);
        assert_eq!(i64::ONE, 1);
    }

    #[test]
    fn test_float_operations() {
        let x: f32 = 2.0;
        assert!((x.exp_value() - 2.0_f32.exp()).abs() < f32::EPSILON);
        assert!((x.sqrt_value() - 2.0_f32.sqrt()).abs() < f32::EPSILON);
    }
}
