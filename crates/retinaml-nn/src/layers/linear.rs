//! Linear Layer - Fully Connected Transformation
//!
//! Implements the dense layer y = x @ W + b. The weight is stored
//! (in_features, out_features) so the forward pass is a plain matrix
//! product against the trailing input dimension.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_tensor::Tensor;

use crate::init;
use crate::module::Module;

// =============================================================================
// Linear
// =============================================================================

/// Fully connected layer.
///
/// Applies `y = x @ W + b` to the last dimension of the input. Leading
/// dimensions are treated as batch dimensions and preserved.
pub struct Linear {
    weight: Tensor<f32>,
    bias: Option<Tensor<f32>>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer with Xavier-initialized weights and zero bias.
    ///
    /// # Arguments
    /// * `in_features` - Size of each input sample
    /// * `out_features` - Size of each output sample
    #[must_use]
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self::with_bias(in_features, out_features, true)
    }

    /// Creates a new Linear layer with or without a bias term.
    #[must_use]
    pub fn with_bias(in_features: usize, out_features: usize, bias: bool) -> Self {
        let weight = init::xavier_uniform(&[in_features, out_features], in_features, out_features);
        let bias = if bias {
            Some(init::zeros(&[out_features]))
        } else {
            None
        };

        Self {
            weight,
            bias,
            in_features,
            out_features,
        }
    }

    /// Creates a Linear layer from existing weights.
    ///
    /// # Arguments
    /// * `weight` - Weight tensor of shape (in_features, out_features)
    /// * `bias` - Optional bias tensor of shape (out_features)
    pub fn from_weights(weight: Tensor<f32>, bias: Option<Tensor<f32>>) -> Result<Self> {
        if weight.ndim() != 2 {
            return Err(Error::invalid_operation(
                "Linear weight must be 2D (in_features, out_features)",
            ));
        }
        let in_features = weight.shape()[0];
        let out_features = weight.shape()[1];

        if let Some(b) = &bias {
            if b.shape() != [out_features] {
                return Err(Error::shape_mismatch(&[out_features], b.shape()));
            }
        }

        Ok(Self {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    /// Returns the input feature count.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature count.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let ndim = input.ndim();
        if ndim == 0 {
            return Err(Error::invalid_operation("Linear input must have at least 1 dimension"));
        }

        let last = input.shape()[ndim - 1];
        if last != self.in_features {
            return Err(Error::shape_mismatch(&[self.in_features], &[last]));
        }

        // Collapse leading dims into one batch dimension
        let batch: usize = input.shape()[..ndim - 1].iter().product();
        let flat = input.reshape(&[batch as isize, self.in_features as isize])?;

        let mut output = flat.matmul(&self.weight)?;
        if let Some(bias) = &self.bias {
            output = output.add(bias)?;
        }

        let mut out_shape: Vec<isize> = input.shape()[..ndim - 1]
            .iter()
            .map(|&d| d as isize)
            .collect();
        out_shape.push(self.out_features as isize);
        output.reshape(&out_shape)
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        let mut params = vec![self.weight.clone()];
        if let Some(bias) = &self.bias {
            params.push(bias.clone());
        }
        params
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        params.insert("weight".to_string(), self.weight.clone());
        if let Some(bias) = &self.bias {
            params.insert("bias".to_string(), bias.clone());
        }
        params
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

impl std::fmt::Debug for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linear")
            .field("in_features", &self.in_features)
            .field("out_features", &self.out_features)
            .field("bias", &self.bias.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let layer = Linear::new(10, 5);
        let input = Tensor::from_vec(vec![1.0; 20], &[2, 10]).unwrap();
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.shape(), &[2, 5]);
    }

    #[test]
    fn test_known_values() {
        // y = x @ W + b with W = [[1, 2], [3, 4]], b = [10, 20]
        let weight = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let bias = Tensor::from_vec(vec![10.0, 20.0], &[2]).unwrap();
        let layer = Linear::from_weights(weight, Some(bias)).unwrap();

        let input = Tensor::from_vec(vec![1.0, 1.0], &[1, 2]).unwrap();
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.to_vec(), vec![14.0, 26.0]);
    }

    #[test]
    fn test_no_bias() {
        let layer = Linear::with_bias(4, 2, false);
        assert_eq!(layer.parameters().len(), 1);
        assert_eq!(layer.num_parameters(), 8);
    }

    #[test]
    fn test_num_parameters() {
        let layer = Linear::new(10, 5);
        assert_eq!(layer.num_parameters(), 55);
    }

    #[test]
    fn test_rejects_wrong_input_width() {
        let layer = Linear::new(10, 5);
        let input = Tensor::from_vec(vec![1.0; 8], &[2, 4]).unwrap();
        assert!(layer.forward(&input).is_err());
    }

    #[test]
    fn test_leading_dims_preserved() {
        let layer = Linear::new(4, 3);
        let input = Tensor::from_vec(vec![0.5; 2 * 5 * 4], &[2, 5, 4]).unwrap();
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.shape(), &[2, 5, 3]);
    }

    #[test]
    fn test_from_weights_validates_bias() {
        let weight = Tensor::<f32>::zeros(&[4, 2]);
        let bad_bias = Tensor::<f32>::zeros(&[3]);
        assert!(Linear::from_weights(weight, Some(bad_bias)).is_err());
    }
}
