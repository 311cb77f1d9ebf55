//! Sequential Container - Linear Module Chains
//!
//! Provides a container that runs modules one after another, feeding each
//! module's output into the next. Errors from any stage propagate out of
//! the chain's forward pass.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use retinaml_core::Result;
use retinaml_tensor::Tensor;

use crate::module::Module;

// =============================================================================
// Sequential
// =============================================================================

/// A container that chains modules sequentially.
///
/// Modules are applied in insertion order. Each module is stored with a
/// name, either given explicitly or derived from its position.
pub struct Sequential {
    modules: Vec<(String, Box<dyn Module>)>,
    training: bool,
}

impl Sequential {
    /// Creates a new empty Sequential container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            training: true,
        }
    }

    /// Adds a module, consuming and returning self for chaining.
    #[must_use]
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        let name = format!("{}", self.modules.len());
        self.modules.push((name, Box::new(module)));
        self
    }

    /// Adds a named module, consuming and returning self for chaining.
    #[must_use]
    pub fn add_named<M: Module + 'static>(mut self, name: &str, module: M) -> Self {
        self.modules.push((name.to_string(), Box::new(module)));
        self
    }

    /// Appends a module in place.
    pub fn push<M: Module + 'static>(&mut self, module: M) {
        let name = format!("{}", self.modules.len());
        self.modules.push((name, Box::new(module)));
    }

    /// Returns the number of modules in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns an iterator over (name, module) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Module)> {
        self.modules.iter().map(|(n, m)| (n.as_str(), m.as_ref()))
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let mut x = input.clone();
        for (_, module) in &self.modules {
            x = module.forward(&x)?;
        }
        Ok(x)
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        self.modules
            .iter()
            .flat_map(|(_, m)| m.parameters())
            .collect()
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        for (name, module) in &self.modules {
            for (param_name, param) in module.named_parameters() {
                params.insert(format!("{name}.{param_name}"), param);
            }
        }
        params
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        for (_, module) in &mut self.modules {
            module.set_training(training);
        }
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn name(&self) -> &'static str {
        "Sequential"
    }
}

// =============================================================================
// Tests
// =============================================================================
