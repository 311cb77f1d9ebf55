//! Shallow Autoencoder - Dense Bottleneck Baseline
//!
//! The simplest of the denoising models: every image is flattened, squeezed
//! through one dense hidden layer, and expanded back to the full pixel
//! count. It has no spatial structure at all, which makes it the baseline
//! the convolutional models are compared against.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_nn::{Flatten, Linear, Module, ReLU, Reshape, Sequential, Sigmoid};
use retinaml_tensor::Tensor;

use crate::models::check_image_batch;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`ShallowAutoencoder`].
#[derive(Debug, Clone)]
pub struct ShallowConfig {
    /// Input image height.
    pub height: usize,
    /// Input image width.
    pub width: usize,
    /// Input image channels.
    pub colors: usize,
    /// Size of the dense bottleneck.
    pub latent_dim: usize,
}

impl Default for ShallowConfig {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
            colors: 3,
            latent_dim: 512,
        }
    }
}

// =============================================================================
// ShallowAutoencoder
// =============================================================================

/// Dense denoising autoencoder.
///
/// Encoder: Flatten, Linear(H*W*C -> latent), ReLU.
/// Decoder: Linear(latent -> H*W*C), Sigmoid, Reshape back to (H, W, C).
pub struct ShallowAutoencoder {
    encoder: Sequential,
    decoder: Sequential,
    config: ShallowConfig,
}

impl ShallowAutoencoder {
    /// Builds the model for the configured resolution.
    ///
    /// Fails if any configured dimension is zero; the dense layer sizes are
    /// fixed by the resolution, so the whole shape flow is settled here.
    pub fn new(config: ShallowConfig) -> Result<Self> {
        if config.height == 0 || config.width == 0 || config.colors == 0 {
            return Err(Error::invalid_operation(format!(
                "Image dimensions must be non-zero, got {}x{}x{}",
                config.height, config.width, config.colors
            )));
        }
        if config.latent_dim == 0 {
            return Err(Error::invalid_operation("Latent dimension must be non-zero"));
        }

        let features = config.height * config.width * config.colors;

        let encoder = Sequential::new()
            .add_named("flatten", Flatten::new())
            .add_named("hidden", Linear::new(features, config.latent_dim))
            .add_named("relu", ReLU::new());

        let decoder = Sequential::new()
            .add_named("expand", Linear::new(config.latent_dim, features))
            .add_named("sigmoid", Sigmoid::new())
            .add_named(
                "reshape",
                Reshape::new(&[config.height, config.width, config.colors]),
            );

        Ok(Self {
            encoder,
            decoder,
            config,
        })
    }

    /// Returns the model configuration.
    #[must_use] pub fn config(&self) -> &ShallowConfig {
        &self.config
    }

    /// Maps an NHWC batch to its latent codes of shape (batch, latent_dim).
    pub fn encode(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        check_image_batch(input, self.config.height, self.config.width, self.config.colors)?;
        self.encoder.forward(input)
    }

    /// Maps latent codes back to an NHWC image batch.
    pub fn decode(&self, latent: &Tensor<f32>) -> Result<Tensor<f32>> {
        self.decoder.forward(latent)
    }
}

impl Module for ShallowAutoencoder {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let latent = self.encode(input)?;
        self.decode(&latent)
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        let mut params = self.encoder.parameters();
        params.extend(self.decoder.parameters());
        params
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        for (name, param) in self.encoder.named_parameters() {
            params.insert(format!("encoder.{name}"), param);
        }
        for (name, param) in self.decoder.named_parameters() {
            params.insert(format!("decoder.{name}"), param);
        }
        params
    }

    fn set_training(&mut self, training: bool) {
        self.encoder.set_training(training);
        self.decoder.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.encoder.is_training()
    }

    fn name(&self) -> &'static str {
        "ShallowAutoencoder"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ShallowConfig {
        ShallowConfig {
            height: 8,
            width: 8,
            colors: 3,
            latent_dim: 16,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ShallowConfig::default();
        assert_eq!(config.height, 128);
        assert_eq!(config.width, 128);
        assert_eq!(config.colors, 3);
        assert_eq!(config.latent_dim, 512);
    }

    #[test]
    fn test_round_trip_shape_and_range() {
        let model = ShallowAutoencoder::new(small_config()).unwrap();
        let input = Tensor::<f32>::rand(&[2, 8, 8, 3]);

        let output = model.forward(&input).unwrap();
        assert_eq!(output.shape(), input.shape());
        assert!(output.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_encode_bottleneck_shape() {
        let model = ShallowAutoencoder::new(small_config()).unwrap();
        let input = Tensor::<f32>::rand(&[4, 8, 8, 3]);

        let latent = model.encode(&input).unwrap();
        assert_eq!(latent.shape(), &[4, 16]);
    }

    #[test]
    fn test_rejects_wrong_resolution() {
        let model = ShallowAutoencoder::new(small_config()).unwrap();
        let input = Tensor::<f32>::rand(&[1, 4, 4, 3]);
        assert!(model.forward(&input).is_err());
    }

    #[test]
    fn test_rejects_zero_config() {
        let config = ShallowConfig {
            height: 0,
            ..small_config()
        };
        assert!(ShallowAutoencoder::new(config).is_err());

        let config = ShallowConfig {
            latent_dim: 0,
            ..small_config()
        };
        assert!(ShallowAutoencoder::new(config).is_err());
    }

    #[test]
    fn test_parameter_count() {
        let model = ShallowAutoencoder::new(small_config()).unwrap();
        let features = 8 * 8 * 3;
        let expected = features * 16 + 16 + 16 * features + features;
        assert_eq!(model.num_parameters(), expected);
    }
}
