//! Tensor Views - Joining Operations
//!
//! Free functions for joining tensors: concatenation along an existing
//! dimension and stacking along a new one. Used for batching samples and
//! for channel-wise merges of skip connections.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use retinaml_core::dtype::Scalar;
use retinaml_core::error::{Error, Result};

use crate::shape::{numel, Shape};
use crate::tensor::Tensor;

// =============================================================================
// Concatenation
// =============================================================================

/// Concatenates tensors along an existing dimension.
///
/// All tensors must have the same shape except along `dim`.
///
/// # Arguments
/// * `tensors` - Tensors to concatenate (at least one)
/// * `dim` - Dimension to concatenate along
pub fn cat<T: Scalar>(tensors: &[Tensor<T>], dim: usize) -> Result<Tensor<T>> {
    if tensors.is_empty() {
        return Err(Error::invalid_operation("Cannot concatenate empty list"));
    }

    let first = &tensors[0];
    let ndim = first.ndim();

    if dim >= ndim {
        return Err(Error::InvalidDimension {
            index: dim as i64,
            ndim,
        });
    }

    // Validate shapes match except for the concat dimension
    for t in tensors.iter().skip(1) {
        if t.ndim() != ndim {
            return Err(Error::invalid_operation(
                "All tensors must have same number of dimensions",
            ));
        }
        for (d, (&s1, &s2)) in first.shape().iter().zip(t.shape().iter()).enumerate() {
            if d != dim && s1 != s2 {
                return Err(Error::shape_mismatch(first.shape(), t.shape()));
            }
        }
    }

    let mut output_shape = Shape::from_slice(first.shape());
    output_shape[dim] = tensors.iter().map(|t| t.shape()[dim]).sum();

    // View every tensor as [outer, dim, inner] blocks and copy block-wise
    let outer: usize = first.shape()[..dim].iter().product();
    let inner: usize = first.shape()[dim + 1..].iter().product();
    let out_dim = output_shape[dim];

    let mut output_data = vec![T::default(); numel(&output_shape)];

    let mut dim_offset = 0;
    for t in tensors {
        let t_dim = t.shape()[dim];
        let block = t_dim * inner;
        let data = t.to_vec();

        for o in 0..outer {
            let src = &data[o * block..(o + 1) * block];
            let dst_start = o * out_dim * inner + dim_offset * inner;
            output_data[dst_start..dst_start + block].copy_from_slice(src);
        }

        dim_offset += t_dim;
    }

    Tensor::from_vec(output_data, &output_shape)
}

// =============================================================================
// Stacking
// =============================================================================

/// Stacks tensors along a new dimension.
///
/// All tensors must have identical shapes. The result gains one dimension
/// of size `tensors.len()` at position `dim`.
///
/// # Arguments
/// * `tensors` - Tensors to stack (at least one)
/// * `dim` - Position of the new dimension
pub fn stack<T: Scalar>(tensors: &[Tensor<T>], dim: usize) -> Result<Tensor<T>> {
    if tensors.is_empty() {
        return Err(Error::invalid_operation("Cannot stack empty list"));
    }

    let first_shape = tensors[0].shape();
    if dim > first_shape.len() {
        return Err(Error::InvalidDimension {
            index: dim as i64,
            ndim: first_shape.len(),
        });
    }

    for t in tensors.iter().skip(1) {
        if t.shape() != first_shape {
            return Err(Error::shape_mismatch(first_shape, t.shape()));
        }
    }

    // Insert a unit axis at `dim`, then concatenate along it
    let mut unit_shape = Shape::with_capacity(first_shape.len() + 1);
    unit_shape.extend_from_slice(&first_shape[..dim]);
    unit_shape.push(1);
    unit_shape.extend_from_slice(&first_shape[dim..]);

    let expanded: Result<Vec<Tensor<T>>> = tensors
        .iter()
        .map(|t| Tensor::from_vec(t.to_vec(), &unit_shape))
        .collect();

    cat(&expanded?, dim)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cat_dim0() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0], &[1, 2]).unwrap();
        let b = Tensor::from_vec(vec![3.0f32, 4.0], &[1, 2]).unwrap();

        let c = cat(&[a, b], 0).unwrap();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_cat_channel_axis() {
        // Two 1x1x2x1 maps joined channel-wise into 1x1x2x2
        let a = Tensor::from_vec(vec![1.0f32, 2.0], &[1, 1, 2, 1]).unwrap();
        let b = Tensor::from_vec(vec![10.0f32, 20.0], &[1, 1, 2, 1]).unwrap();

        let c = cat(&[a, b], 3).unwrap();
        assert_eq!(c.shape(), &[1, 1, 2, 2]);
        // Channels interleave per pixel
        assert_eq!(c.to_vec(), vec![1.0, 10.0, 2.0, 20.0]);
    }

    #[test]
    fn test_cat_shape_mismatch() {
        let a = Tensor::<f32>::zeros(&[1, 2]);
        let b = Tensor::<f32>::zeros(&[2, 3]);
        assert!(cat(&[a, b], 0).is_err());
    }

    #[test]
    fn test_cat_empty() {
        let empty: Vec<Tensor<f32>> = Vec::new();
        assert!(cat(&empty, 0).is_err());
    }

    #[test]
    fn test_stack_batches_samples() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2, 1]).unwrap();
        let b = Tensor::from_vec(vec![5.0f32, 6.0, 7.0, 8.0], &[2, 2, 1]).unwrap();

        let batch = stack(&[a, b], 0).unwrap();
        assert_eq!(batch.shape(), &[2, 2, 2, 1]);
        assert_eq!(batch.get(&[1, 0, 1, 0]).unwrap(), 6.0);
    }

    #[test]
    fn test_stack_rejects_mixed_shapes() {
        let a = Tensor::<f32>::zeros(&[2, 2]);
        let b = Tensor::<f32>::zeros(&[2, 3]);
        assert!(stack(&[a, b], 0).is_err());
    }
}
