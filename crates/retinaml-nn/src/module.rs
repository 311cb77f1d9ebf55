//! Module Trait - Neural Network Module Interface
//!
//! Defines the core Module trait that all neural network layers implement.
//! This is the foundation of the model abstraction in RetinaML. Inference
//! is fallible: layers validate their input shapes and propagate errors.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use retinaml_core::Result;
use retinaml_tensor::Tensor;

// =============================================================================
// Module Trait
// =============================================================================

/// Core trait for all neural network modules.
///
/// Every layer in RetinaML implements this trait, which provides:
/// - Forward pass computation
/// - Parameter enumeration
/// - Training/evaluation mode switching
/// - Module naming
pub trait Module: Send + Sync {
    /// Performs the forward pass.
    ///
    /// # Arguments
    /// * `input` - Input tensor
    ///
    /// # Returns
    /// Output tensor, or an error if the input shape is incompatible.
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>>;

    /// Returns all parameters of this module.
    ///
    /// Parameter tensors share storage with the module, so the returned
    /// handles are cheap. Includes parameters from all child modules.
    fn parameters(&self) -> Vec<Tensor<f32>> {
        Vec::new()
    }

    /// Returns named parameters of this module.
    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        HashMap::new()
    }

    /// Returns the total number of parameter elements.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(Tensor::numel).sum()
    }

    /// Sets the module to training mode.
    fn train(&mut self) {
        self.set_training(true);
    }

    /// Sets the module to evaluation mode.
    fn eval(&mut self) {
        self.set_training(false);
    }

    /// Sets the training mode.
    fn set_training(&mut self, _training: bool) {
        // Default implementation does nothing
        // Submodules override this if they have training-specific behavior
    }

    /// Returns whether the module is in training mode.
    fn is_training(&self) -> bool {
        true // Default to training mode
    }

    /// Returns the module name for debugging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// =============================================================================
// Tests
// =============================================================================
