//! Error Types - RetinaML Core Error Handling
//!
//! Provides the unified error type for all operations within the RetinaML
//! framework, including shape disagreements, window configuration problems,
//! and indexing failures.
//!
//! # Key Features
//! - Unified error type for all RetinaML operations
//! - Detailed error context for debugging
//! - Integration with `std::error::Error`
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for RetinaML operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Shape mismatch between tensors.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Pooling window configuration is unusable.
    #[error("Invalid window config: window {window}, stride {stride}")]
    InvalidWindowConfig {
        /// The requested window size.
        window: usize,
        /// The requested stride.
        stride: usize,
    },

    /// Invalid dimension index.
    #[error("Invalid dimension: index {index} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension index.
        index: i64,
        /// Number of dimensions in the tensor.
        ndim: usize,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The size of the dimension.
        size: usize,
    },

    /// Broadcasting failed between shapes.
    #[error("Cannot broadcast shapes {shape1:?} and {shape2:?}")]
    BroadcastError {
        /// The first shape.
        shape1: Vec<usize>,
        /// The second shape.
        shape2: Vec<usize>,
    },

    /// Invalid operation for the given tensor.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// Empty tensor error.
    #[error("Operation not supported on empty tensor")]
    EmptyTensor,

    /// Internal error (should not happen).
    #[error("Internal error: {message}")]
    InternalError {
        /// Description of the internal error.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for RetinaML operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new invalid window configuration error.
    #[must_use]
    pub fn invalid_window(window: usize, stride: usize) -> Self {
        Self::InvalidWindowConfig { window, stride }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::shape_mismatch(&[2, 3], &[2, 4]);
        assert!(err.to_string().contains("Shape mismatch"));
    }

    #[test]
    fn test_window_config_display() {
        let err = Error::invalid_window(0, 2);
        assert!(err.to_string().contains("window 0"));
        assert!(err.to_string().contains("stride 2"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = Error::EmptyTensor;
        let err2 = Error::EmptyTensor;
        assert_eq!(err1, err2);
    }
}
