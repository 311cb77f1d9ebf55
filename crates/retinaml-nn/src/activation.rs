//! Activation Functions - Non-Linear Transformations
//!
//! Provides activation functions both as standalone modules for use in
//! `Sequential` chains and as a lightweight enum for layers that fuse an
//! activation into their forward pass.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use retinaml_core::Result;
use retinaml_tensor::Tensor;

use crate::module::Module;

// =============================================================================
// Fused Activation
// =============================================================================

/// Activation applied by a layer directly after its linear transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Rectified linear unit: max(x, 0).
    Relu,
    /// Logistic sigmoid: 1 / (1 + exp(-x)).
    Sigmoid,
}

impl Activation {
    /// Applies this activation element-wise.
    #[must_use]
    pub fn apply(self, input: &Tensor<f32>) -> Tensor<f32> {
        match self {
            Activation::Relu => input.relu(),
            Activation::Sigmoid => input.sigmoid(),
        }
    }

    /// Returns the activation name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
        }
    }
}

// =============================================================================
// Activation Modules
// =============================================================================

/// ReLU activation module.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ReLU {
    /// Creates a new ReLU module.
    #[must_use]
    pub fn new() -> Self {
        ReLU
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        Ok(input.relu())
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

/// Sigmoid activation module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    /// Creates a new Sigmoid module.
    #[must_use]
    pub fn new() -> Self {
        Sigmoid
    }
}

impl Module for Sigmoid {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        Ok(input.sigmoid())
    }

    fn name(&self) -> &'static str {
        "Sigmoid"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_module() {
        let relu = ReLU::new();
        let input = Tensor::from_vec(vec![-2.0, 0.0, 3.0], &[3]).unwrap();
        let output = relu.forward(&input).unwrap();
        assert_eq!(output.to_vec(), vec![0.0, 0.0, 3.0]);
        assert_eq!(relu.num_parameters(), 0);
    }

    #[test]
    fn test_sigmoid_module() {
        let sigmoid = Sigmoid::new();
        let input = Tensor::from_vec(vec![0.0], &[1]).unwrap();
        let output = sigmoid.forward(&input).unwrap();
        assert!((output.get(&[0]).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fused_activation() {
        let input = Tensor::from_vec(vec![-1.0, 1.0], &[2]).unwrap();
        assert_eq!(Activation::Relu.apply(&input).to_vec(), vec![0.0, 1.0]);
        assert_eq!(Activation::Relu.name(), "relu");
        assert_eq!(Activation::Sigmoid.name(), "sigmoid");
    }
}
