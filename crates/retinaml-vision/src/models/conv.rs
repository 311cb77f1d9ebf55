//! Convolutional Autoencoder - Strided Encoder, Transposed Decoder
//!
//! Downsamples with strided same-padded convolutions and upsamples with the
//! mirrored transposed convolutions. Unlike [`SegNet`] there is no pooling
//! and nothing is carried across the bottleneck except the feature map
//! itself.
//!
//! [`SegNet`]: crate::models::SegNet
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_nn::{Activation, Conv2d, ConvTranspose2d, Module, Padding, Sequential};
use retinaml_tensor::Tensor;

use crate::models::check_image_batch;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`ConvAutoencoder`].
#[derive(Debug, Clone)]
pub struct ConvAutoencoderConfig {
    /// Input image height.
    pub height: usize,
    /// Input image width.
    pub width: usize,
    /// Input image channels.
    pub colors: usize,
    /// Filter count of each encoder stage; the decoder mirrors them.
    pub filters: Vec<usize>,
    /// Square kernel edge length.
    pub kernel_size: usize,
    /// Downsampling stride of every stage.
    pub stride: usize,
}

impl Default for ConvAutoencoderConfig {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
            colors: 3,
            filters: vec![128, 64, 32],
            kernel_size: 3,
            stride: 2,
        }
    }
}

// =============================================================================
// ConvAutoencoder
// =============================================================================

/// Convolutional denoising autoencoder.
///
/// Encoder: one strided same-padded ReLU convolution per entry of
/// `filters`. Decoder: the transposed mirror, ending in a 1x1 sigmoid
/// convolution back to the input channel count.
pub struct ConvAutoencoder {
    encoder: Sequential,
    decoder: Sequential,
    config: ConvAutoencoderConfig,
}

impl ConvAutoencoder {
    /// Builds the model for the configured resolution.
    ///
    /// The strided stages shrink the image by `stride` per stage and the
    /// transposed stages grow it back, so the resolution must be divisible
    /// by `stride^filters.len()` for the output to line up with the input.
    pub fn new(config: ConvAutoencoderConfig) -> Result<Self> {
        if config.height == 0 || config.width == 0 || config.colors == 0 {
            return Err(Error::invalid_operation(format!(
                "Image dimensions must be non-zero, got {}x{}x{}",
                config.height, config.width, config.colors
            )));
        }
        if config.kernel_size == 0 || config.stride == 0 {
            return Err(Error::invalid_window(config.kernel_size, config.stride));
        }
        if config.filters.is_empty() || config.filters.contains(&0) {
            return Err(Error::invalid_operation(
                "Filter list must be non-empty with non-zero entries",
            ));
        }

        let total = config.stride.pow(config.filters.len() as u32);
        if config.height % total != 0 || config.width % total != 0 {
            return Err(Error::invalid_operation(format!(
                "Input {}x{} must be divisible by the total stride {total}",
                config.height, config.width
            )));
        }

        let mut encoder = Sequential::new();
        let mut prev = config.colors;
        for &filters in &config.filters {
            encoder.push(
                Conv2d::new(prev, filters, config.kernel_size)
                    .with_stride(config.stride)
                    .with_padding(Padding::Same)
                    .with_activation(Activation::Relu),
            );
            prev = filters;
        }

        let mut decoder = Sequential::new();
        for &filters in config.filters.iter().rev() {
            decoder.push(
                ConvTranspose2d::new(prev, filters, config.kernel_size)
                    .with_stride(config.stride)
                    .with_padding(Padding::Same)
                    .with_activation(Activation::Relu),
            );
            prev = filters;
        }
        decoder.push(
            Conv2d::new(prev, config.colors, 1)
                .with_padding(Padding::Same)
                .with_activation(Activation::Sigmoid),
        );

        Ok(Self {
            encoder,
            decoder,
            config,
        })
    }

    /// Returns the model configuration.
    #[must_use] pub fn config(&self) -> &ConvAutoencoderConfig {
        &self.config
    }

    /// Maps an NHWC batch to its bottleneck feature map.
    pub fn encode(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        check_image_batch(input, self.config.height, self.config.width, self.config.colors)?;
        self.encoder.forward(input)
    }

    /// Maps a bottleneck feature map back to an NHWC image batch.
    pub fn decode(&self, features: &Tensor<f32>) -> Result<Tensor<f32>> {
        self.decoder.forward(features)
    }
}

impl Module for ConvAutoencoder {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        let features = self.encode(input)?;
        self.decode(&features)
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
        "ConvAutoencoder"
    }
}

// =============================================================================
// Tests
// =============================================================================
