//! Normalization Layers - Batch Normalization
//!
//! Batch normalization over the channel axis of NHWC tensors. In training
//! mode statistics come from the current batch and are folded into running
//! buffers; in evaluation mode the running buffers are used directly.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use parking_lot::RwLock;

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::Tensor;

use crate::init;
use crate::module::Module;

// =============================================================================
// BatchNorm2d
// =============================================================================

/// Batch normalization for NHWC image tensors.
///
/// Normalizes each channel over the batch and spatial dimensions, then
/// applies a learned scale (gamma) and shift (beta). Running statistics
/// live behind a lock so the forward pass can update them through `&self`.
pub struct BatchNorm2d {
    gamma: Tensor<f32>,
    beta: Tensor<f32>,
    running_mean: RwLock<Vec<f32>>,
    running_var: RwLock<Vec<f32>>,
    num_features: usize,
    eps: f32,
    momentum: f32,
    training: bool,
}

impl BatchNorm2d {
    /// Creates a new BatchNorm2d layer.
    ///
    /// Gamma starts at one, beta at zero, running mean at zero and running
    /// variance at one. `eps` is 1e-5 and `momentum` 0.1, the fraction of
    /// the batch statistic blended into the running buffers per step.
    ///
    /// # Arguments
    /// * `num_features` - Number of channels to normalize
    #[must_use]
    pub fn new(num_features: usize) -> Self {
        Self {
            gamma: init::ones(&[num_features]),
            beta: init::zeros(&[num_features]),
            running_mean: RwLock::new(vec![0.0; num_features]),
            running_var: RwLock::new(vec![1.0; num_features]),
            num_features,
            eps: 1e-5,
            momentum: 0.1,
            training: true,
        }
    }

    /// Returns the number of normalized channels.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Per-channel mean and biased variance of an NHWC batch.
    fn batch_stats(data: &[f32], count: usize, channels: usize) -> (Vec<f32>, Vec<f32>) {
        let mut mean = vec![0.0f32; channels];
        for pixel in data.chunks_exact(channels) {
            for (ch, &v) in pixel.iter().enumerate() {
                mean[ch] += v;
            }
        }
        for m in &mut mean {
            *m /= count as f32;
        }

        let mut var = vec![0.0f32; channels];
        for pixel in data.chunks_exact(channels) {
            for (ch, &v) in pixel.iter().enumerate() {
                let d = v - mean[ch];
                var[ch] += d * d;
            }
        }
        for v in &mut var {
            *v /= count as f32;
        }

        (mean, var)
    }
}

impl Module for BatchNorm2d {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let (batch, height, width, channels) = nhwc_dims(input.shape())?;
        if channels != self.num_features {
            return Err(Error::shape_mismatch(&[self.num_features], &[channels]));
        }

        let data = input.to_vec();

        let (mean, var) = if self.training {
            let count = batch * height * width;
            if count == 0 {
                return Err(Error::EmptyTensor);
            }
            let (mean, var) = Self::batch_stats(&data, count, channels);

            {
                let mut running_mean = self.running_mean.write();
                let mut running_var = self.running_var.write();
                for ch in 0..channels {
                    running_mean[ch] =
                        (1.0 - self.momentum) * running_mean[ch] + self.momentum * mean[ch];
                    running_var[ch] =
                        (1.0 - self.momentum) * running_var[ch] + self.momentum * var[ch];
                }
            }

            (mean, var)
        } else {
            (self.running_mean.read().clone(), self.running_var.read().clone())
        };

        // Fold gamma/mean/var into one scale and shift per channel
        let gamma = self.gamma.to_vec();
        let beta = self.beta.to_vec();
        let mut scale = vec![0.0f32; channels];
        let mut shift = vec![0.0f32; channels];
        for ch in 0..channels {
            scale[ch] = gamma[ch] / (var[ch] + self.eps).sqrt();
            shift[ch] = beta[ch] - mean[ch] * scale[ch];
        }

        let mut output = Vec::with_capacity(data.len());
        for pixel in data.chunks_exact(channels) {
            for (ch, &v) in pixel.iter().enumerate() {
                output.push(v * scale[ch] + shift[ch]);
            }
        }

        Tensor::from_vec(output, input.shape())
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        vec![self.gamma.clone(), self.beta.clone()]
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        params.insert("gamma".to_string(), self.gamma.clone());
        params.insert("beta".to_string(), self.beta.clone());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn name(&self) -> &'static str {
        "BatchNorm2d"
    }
}

impl std::fmt::Debug for BatchNorm2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchNorm2d")
            .field("num_features", &self.num_features)
            .field("eps", &self.eps)
            .field("momentum", &self.momentum)
            .field("training", &self.training)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
