//! Shape and Strides - Tensor Dimension Management
//!
//! Provides types and functions for managing tensor shapes, strides, and
//! broadcasting rules, plus helpers for the NHWC image layout used by the
//! vision models.
//!
//! # Key Features
//! - Efficient shape representation with small-vector optimization
//! - Stride computation for contiguous row-major layouts
//! - Broadcasting support following `NumPy` rules
//! - NHWC dimension extraction for 4D image batches
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use retinaml_core::error::{Error, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Shape type - dimensions of a tensor.
/// Uses `SmallVec` for stack allocation of small shapes (up to 6 dimensions).
pub type Shape = SmallVec<[usize; 6]>;

/// Strides type - step sizes for each dimension.
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Shape Utilities
// =============================================================================

/// Computes the total number of elements from a shape.
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes row-major (C-order) strides for a shape.
#[must_use]
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    if shape.is_empty() {
        return Strides::new();
    }

    let mut strides = Strides::with_capacity(shape.len());
    let mut stride = 1isize;

    // Compute strides from right to left
    for &dim in shape.iter().rev() {
        strides.push(stride);
        stride *= dim as isize;
    }

    strides.reverse();
    strides
}

/// Checks if strides represent a contiguous row-major layout.
#[must_use]
pub fn is_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    if shape.is_empty() {
        return true;
    }

    let expected = contiguous_strides(shape);
    strides == expected.as_slice()
}

/// Computes the linear storage offset from multi-dimensional indices.
#[must_use]
pub fn linear_index(indices: &[usize], strides: &[isize]) -> usize {
    debug_assert_eq!(indices.len(), strides.len());

    let mut offset = 0isize;
    for (&idx, &stride) in indices.iter().zip(strides.iter()) {
        offset += idx as isize * stride;
    }
    offset as usize
}

/// Converts a linear index to multi-dimensional indices.
#[must_use]
pub fn unravel_index(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];

    for (i, &dim) in shape.iter().enumerate().rev() {
        indices[i] = linear % dim;
        linear /= dim;
    }

    indices
}

// =============================================================================
// NHWC Helpers
// =============================================================================

/// Splits a 4D NHWC shape into its (batch, height, width, channels) parts.
///
/// # Arguments
/// * `shape` - The tensor shape, which must have exactly four dimensions
///
/// # Returns
/// The four dimension sizes, or an error for non-4D shapes.
pub fn nhwc_dims(shape: &[usize]) -> Result<(usize, usize, usize, usize)> {
    if shape.len() != 4 {
        return Err(Error::invalid_operation(format!(
            "Expected 4D NHWC tensor, got {}D shape {:?}",
            shape.len(),
            shape
        )));
    }
    Ok((shape[0], shape[1], shape[2], shape[3]))
}

// =============================================================================
// Broadcasting
// =============================================================================

/// Computes the broadcast shape of two shapes.
///
/// Broadcasting follows `NumPy` rules:
/// 1. Shapes are aligned from the right
/// 2. Dimensions are compatible if equal or one of them is 1
/// 3. Missing dimensions are treated as 1
pub fn broadcast_shape(shape1: &[usize], shape2: &[usize]) -> Result<Shape> {
    let max_ndim = shape1.len().max(shape2.len());
    let mut result = Shape::with_capacity(max_ndim);

    // Iterate from right to left
    for i in 0..max_ndim {
        let d1 = if i < shape1.len() {
            shape1[shape1.len() - 1 - i]
        } else {
            1
        };

        let d2 = if i < shape2.len() {
            shape2[shape2.len() - 1 - i]
        } else {
            1
        };

        if d1 == d2 {
            result.push(d1);
        } else if d1 == 1 {
            result.push(d2);
        } else if d2 == 1 {
            result.push(d1);
        } else {
            return Err(Error::BroadcastError {
                shape1: shape1.to_vec(),
                shape2: shape2.to_vec(),
            });
        }
    }

    result.reverse();
    Ok(result)
}

/// Computes broadcast strides for a shape to match a target shape.
///
/// Broadcast dimensions get a stride of zero so every index along them
/// reads the same storage element.
#[must_use]
pub fn broadcast_strides(shape: &[usize], strides: &[isize], target_shape: &[usize]) -> Strides {
    let mut result = Strides::with_capacity(target_shape.len());
    let shape_offset = target_shape.len() - shape.len();

    for (i, &target_dim) in target_shape.iter().enumerate() {
        if i < shape_offset {
            result.push(0);
        } else {
            let orig_idx = i - shape_offset;
            if shape[orig_idx] == target_dim {
                result.push(strides[orig_idx]);
            } else {
                result.push(0);
            }
        }
    }

    result
}

// =============================================================================
// Shape Manipulation
// =============================================================================

/// Resolves a reshape target, validating that total elements match.
///
/// Supports -1 in one dimension to infer the size.
pub fn reshape(old_shape: &[usize], new_shape: &[isize]) -> Result<Shape> {
    let old_numel = numel(old_shape);
    let mut result = Shape::with_capacity(new_shape.len());
    let mut infer_idx = None;
    let mut known_numel = 1usize;

    for (i, &dim) in new_shape.iter().enumerate() {
        if dim == -1 {
            if infer_idx.is_some() {
                return Err(Error::invalid_operation("Can only have one -1 in reshape"));
            }
            infer_idx = Some(i);
            result.push(0); // Placeholder
        } else if dim < 0 {
            return Err(Error::invalid_operation("Invalid dimension in reshape"));
        } else {
            let d = dim as usize;
            known_numel *= d;
            result.push(d);
        }
    }

    if let Some(idx) = infer_idx {
        if known_numel == 0 || old_numel % known_numel != 0 {
            return Err(Error::invalid_operation(
                "Cannot infer dimension: not evenly divisible",
            ));
        }
        result[idx] = old_numel / known_numel;
    } else if known_numel != old_numel {
        return Err(Error::shape_mismatch(old_shape, &result));
    }

    Ok(result)
}

// =============================================================================
// Validation
// =============================================================================

/// Validates that indices are within bounds for a shape.
pub fn validate_indices(indices: &[usize], shape: &[usize]) -> Result<()> {
    if indices.len() != shape.len() {
        return Err(Error::invalid_operation(format!(
            "Expected {} indices, got {}",
            shape.len(),
            indices.len()
        )));
    }

    for (&idx, &dim) in indices.iter().zip(shape.iter()) {
        if idx >= dim {
            return Err(Error::IndexOutOfBounds {
                index: idx,
                size: dim,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[2, 3, 4]), 24);
        assert_eq!(numel(&[]), 1);
        assert_eq!(numel(&[1, 128, 128, 3]), 49152);
    }

    #[test]
    fn test_contiguous_strides() {
        let strides = contiguous_strides(&[2, 4, 4, 3]);
        assert_eq!(strides.as_slice(), &[48, 12, 3, 1]);
    }

    #[test]
    fn test_is_contiguous() {
        let shape = [2, 3];
        let strides = contiguous_strides(&shape);
        assert!(is_contiguous(&shape, &strides));

        let transposed: Strides = smallvec::smallvec![1, 2];
        assert!(!is_contiguous(&shape, &transposed));
    }

    #[test]
    fn test_nhwc_dims() {
        let (b, h, w, c) = nhwc_dims(&[2, 4, 6, 3]).unwrap();
        assert_eq!((b, h, w, c), (2, 4, 6, 3));

        assert!(nhwc_dims(&[2, 4, 6]).is_err());
        assert!(nhwc_dims(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_broadcast_shape() {
        assert_eq!(
            broadcast_shape(&[2, 3], &[2, 3]).unwrap().as_slice(),
            &[2, 3]
        );
        assert_eq!(broadcast_shape(&[2, 3], &[3]).unwrap().as_slice(), &[2, 3]);
        assert_eq!(
            broadcast_shape(&[2, 4, 4, 1], &[8]).unwrap().as_slice(),
            &[2, 4, 4, 8]
        );
        assert!(broadcast_shape(&[2, 3], &[2, 4]).is_err());
    }

    #[test]
    fn test_reshape() {
        let old_shape = [2, 3, 4];

        let new = reshape(&old_shape, &[6, 4]).unwrap();
        assert_eq!(new.as_slice(), &[6, 4]);

        let new = reshape(&old_shape, &[-1, 4]).unwrap();
        assert_eq!(new.as_slice(), &[6, 4]);

        assert!(reshape(&old_shape, &[5, 5]).is_err());
        assert!(reshape(&old_shape, &[-1, -1]).is_err());
    }

    #[test]
    fn test_linear_index() {
        // 2x3 matrix, row-major
        let strides: Strides = smallvec::smallvec![3, 1];

        assert_eq!(linear_index(&[0, 0], &strides), 0);
        assert_eq!(linear_index(&[1, 0], &strides), 3);
        assert_eq!(linear_index(&[1, 2], &strides), 5);
    }

    #[test]
    fn test_unravel_index() {
        let shape = [2, 3, 4];

        assert_eq!(unravel_index(0, &shape), vec![0, 0, 0]);
        assert_eq!(unravel_index(4, &shape), vec![0, 1, 0]);
        assert_eq!(unravel_index(12, &shape), vec![1, 0, 0]);
    }

    #[test]
    fn test_validate_indices() {
        assert!(validate_indices(&[1, 2], &[2, 3]).is_ok());
        assert!(validate_indices(&[2, 0], &[2, 3]).is_err());
        assert!(validate_indices(&[0], &[2, 3]).is_err());
    }
}
