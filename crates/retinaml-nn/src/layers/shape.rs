//! Shape Adapter Layers - Flatten and Reshape
//!
//! Bridges between spatial NHWC tensors and the flat vectors that dense
//! layers consume. Both layers preserve the batch dimension and only
//! rearrange the per-sample axes.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::numel;
use retinaml_tensor::Tensor;

use crate::module::Module;

// =============================================================================
// Flatten
// =============================================================================

/// Collapses all dimensions after the batch axis into one.
///
/// `[B, H, W, C]` becomes `[B, H * W * C]`. Scalar inputs are rejected
/// because there is no batch axis to preserve.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Flatten {
    /// Creates a flatten layer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Flatten {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let shape = input.shape();
        if shape.is_empty() {
            return Err(Error::invalid_operation(
                "Flatten requires at least a batch dimension",
            ));
        }
        let batch = shape[0];
        let per_sample = numel(&shape[1..]);
        input.reshape(&[batch as isize, per_sample as isize])
    }

    fn name(&self) -> &'static str {
        "Flatten"
    }
}

// =============================================================================
// Reshape
// =============================================================================

/// Reshapes each sample to a fixed target shape, keeping the batch axis.
///
/// A target of `[128, 128, 3]` turns `[B, 49152]` into `[B, 128, 128, 3]`.
/// The per-sample element count must match exactly.
#[derive(Debug, Clone)]
pub struct Reshape {
    target: Vec<usize>,
}

impl Reshape {
    /// Creates a reshape layer with the given per-sample target shape.
    #[must_use]
    pub fn new(target: &[usize]) -> Self {
        Self {
            target: target.to_vec(),
        }
    }

    /// Returns the per-sample target shape.
    #[must_use]
    pub fn target(&self) -> &[usize] {
        &self.target
    }
}

impl Module for Reshape {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let shape = input.shape();
        if shape.is_empty() {
            return Err(Error::invalid_operation(
                "Reshape requires at least a batch dimension",
            ));
        }
        let batch = shape[0];
        let per_sample = numel(&shape[1..]);
        let target_numel = numel(&self.target);
        if per_sample != target_numel {
            let mut expected: Vec<usize> = vec![batch];
            expected.extend_from_slice(&self.target);
            return Err(Error::shape_mismatch(&expected, shape));
        }

        let mut new_shape: Vec<isize> = Vec::with_capacity(self.target.len() + 1);
        new_shape.push(batch as isize);
        new_shape.extend(self.target.iter().map(|&d| d as isize));
        input.reshape(&new_shape)
    }

    fn name(&self) -> &'static str {
        "Reshape"
    }
}

// =============================================================================
// Tests
// =============================================================================
