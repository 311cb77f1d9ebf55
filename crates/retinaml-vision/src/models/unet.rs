//! U-Net - Encoder-Decoder with Skip Concatenation
//!
//! Filter counts double at every level down the contracting path and halve
//! back up the expansive path. Each decoder level upsamples with a strided
//! transposed convolution, concatenates the same-level encoder output on
//! the channel axis, and convolves the pair back down. Skips are cropped
//! centered onto the upsampled tensor before the concat.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_nn::{
    Activation, BatchNorm2d, Conv2d, ConvTranspose2d, MaxPool2d, Module, Padding, Sequential,
};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::{cat, Tensor};

use crate::models::check_image_batch;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`UNet`].
#[derive(Debug, Clone)]
pub struct UNetConfig {
    /// Input image height.
    pub height: usize,
    /// Input image width.
    pub width: usize,
    /// Input image channels.
    pub colors: usize,
    /// Filter count of the shallowest level; each level below doubles it.
    pub root_filters: usize,
    /// Number of pooling levels; the bottleneck sits one level deeper.
    pub depth: usize,
    /// Convolutions per level block.
    pub convs_per_block: usize,
    /// Square kernel edge length of the block convolutions.
    pub kernel_size: usize,
    /// Pooling window and stride; also the up-convolution kernel and stride.
    pub pool_size: usize,
}

impl Default for UNetConfig {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
            colors: 3,
            root_filters: 64,
            depth: 3,
            convs_per_block: 2,
            kernel_size: 3,
            pool_size: 2,
        }
    }
}

impl UNetConfig {
    /// Filter count at the given level, doubling per level from the root.
    #[must_use] pub fn level_filters(&self, level: usize) -> usize {
        self.root_filters << level
    }
}

// =============================================================================
// UNet
// =============================================================================

/// U-Net style denoising autoencoder.
///
/// Pooling uses valid padding, which truncates trailing rows and columns,
/// so the resolution must be divisible by `pool_size^depth` for the
/// expansive path to land back on the input extent.
pub struct UNet {
    encoder: Vec<Sequential>,
    pool: MaxPool2d,
    bottleneck: Sequential,
    upconvs: Vec<ConvTranspose2d>,
    decoder: Vec<Sequential>,
    output: Conv2d,
    output_bn: BatchNorm2d,
    config: UNetConfig,
}

/// Builds one level block: `convs` same-padded ReLU convolutions, the
/// first mapping `in_channels` to `out_channels`.
fn conv_block(in_channels: usize, out_channels: usize, convs: usize, kernel: usize) -> Sequential {
    let mut block = Sequential::new();
    let mut prev = in_channels;
    for _ in 0..convs {
        block.push(
            Conv2d::new(prev, out_channels, kernel)
                .with_padding(Padding::Same)
                .with_activation(Activation::Relu),
        );
        prev = out_channels;
    }
    block
}

/// Crops `skip` centered onto the spatial extent of `target`.
fn crop_to_match(skip: &Tensor<f32>, target: &Tensor<f32>) -> Result<Tensor<f32>> {
    let (_, skip_h, skip_w, _) = nhwc_dims(skip.shape())?;
    let (_, out_h, out_w, _) = nhwc_dims(target.shape())?;
    if skip_h < out_h || skip_w < out_w {
        return Err(Error::shape_mismatch(&[out_h, out_w], &[skip_h, skip_w]));
    }

    let offset_y = (skip_h - out_h) / 2;
    let offset_x = (skip_w - out_w) / 2;
    let cropped = skip.narrow(1, offset_y, out_h)?;
    cropped.narrow(2, offset_x, out_w)
}

impl UNet {
    /// Builds the model for the configured resolution.
    pub fn new(config: UNetConfig) -> Result<Self> {
        if config.height == 0 || config.width == 0 || config.colors == 0 {
            return Err(Error::invalid_operation(format!(
                "Image dimensions must be non-zero, got {}x{}x{}",
                config.height, config.width, config.colors
            )));
        }
        if config.kernel_size == 0 || config.pool_size == 0 {
            return Err(Error::invalid_window(config.kernel_size, config.pool_size));
        }
        if config.root_filters == 0 || config.depth == 0 || config.convs_per_block == 0 {
            return Err(Error::invalid_operation(
                "Root filters, depth, and convs per block must be non-zero",
            ));
        }

        let total = config.pool_size.pow(config.depth as u32);
        if config.height % total != 0 || config.width % total != 0 {
            return Err(Error::invalid_operation(format!(
                "Input {}x{} must be divisible by the total pooling factor {total}",
                config.height, config.width
            )));
        }

        let mut encoder = Vec::with_capacity(config.depth);
        let mut prev = config.colors;
        for level in 0..config.depth {
            let filters = config.level_filters(level);
            encoder.push(conv_block(
                prev,
                filters,
                config.convs_per_block,
                config.kernel_size,
            ));
            prev = filters;
        }

        let bottleneck = conv_block(
            prev,
            config.level_filters(config.depth),
            config.convs_per_block,
            config.kernel_size,
        );

        // Expansive path, deepest level first. Each up-convolution halves
        // the channel count so the skip concat restores it.
        let mut upconvs = Vec::with_capacity(config.depth);
        let mut decoder = Vec::with_capacity(config.depth);
        for level in (0..config.depth).rev() {
            let above = config.level_filters(level + 1);
            let filters = config.level_filters(level);
            upconvs.push(
                ConvTranspose2d::new(above, filters, config.pool_size)
                    .with_stride(config.pool_size)
                    .with_padding(Padding::Same)
                    .with_activation(Activation::Relu),
            );
            decoder.push(conv_block(
                filters * 2,
                filters,
                config.convs_per_block,
                config.kernel_size,
            ));
        }

        let output = Conv2d::new(config.root_filters, config.colors, 1)
            .with_padding(Padding::Valid)
            .with_activation(Activation::Relu);
        let output_bn = BatchNorm2d::new(config.colors);

        Ok(Self {
            encoder,
            pool: MaxPool2d::new(config.pool_size),
            bottleneck,
            upconvs,
            decoder,
            output,
            output_bn,
            config,
        })
    }

    /// Returns the model configuration.
    #[must_use] pub fn config(&self) -> &UNetConfig {
        &self.config
    }
}

impl Module for UNet {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        check_image_batch(input, self.config.height, self.config.width, self.config.colors)?;

        let mut x = input.clone();
        let mut skips = Vec::with_capacity(self.encoder.len());
        for block in &self.encoder {
            x = block.forward(&x)?;
            skips.push(x.clone());
            x = self.pool.forward(&x)?;
        }

        x = self.bottleneck.forward(&x)?;

        for (upconv, block) in self.upconvs.iter().zip(&self.decoder) {
            let skip = skips
                .pop()
                .ok_or_else(|| Error::internal("Decoder level without a matching skip tensor"))?;
            x = upconv.forward(&x)?;
            let skip = crop_to_match(&skip, &x)?;
            x = cat(&[skip, x], 3)?;
            x = block.forward(&x)?;
        }

        let x = self.output.forward(&x)?;
        let x = self.output_bn.forward(&x)?;
        Ok(x.sigmoid())
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        let mut params = Vec::new();
        for block in &self.encoder {
            params.extend(block.parameters());
        }
        params.extend(self.bottleneck.parameters());
        for upconv in &self.upconvs {
            params.extend(upconv.parameters());
        }
        for block in &self.decoder {
            params.extend(block.parameters());
        }
        params.extend(self.output.parameters());
        params.extend(self.output_bn.parameters());
        params
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        for (level, block) in self.encoder.iter().enumerate() {
            for (name, param) in block.named_parameters() {
                params.insert(format!("encoder.{level}.{name}"), param);
            }
        }
        for (name, param) in self.bottleneck.named_parameters() {
            params.insert(format!("bottleneck.{name}"), param);
        }
        for (index, upconv) in self.upconvs.iter().enumerate() {
            for (name, param) in upconv.named_parameters() {
                params.insert(format!("upconv.{index}.{name}"), param);
            }
        }
        for (index, block) in self.decoder.iter().enumerate() {
            for (name, param) in block.named_parameters() {
                params.insert(format!("decoder.{index}.{name}"), param);
            }
        }
        for (name, param) in self.output.named_parameters() {
            params.insert(format!("output.{name}"), param);
        }
        for (name, param) in self.output_bn.named_parameters() {
            params.insert(format!("output_bn.{name}"), param);
        }
        params
    }

    fn set_training(&mut self, training: bool) {
        for block in &mut self.encoder {
            block.set_training(training);
        }
        self.bottleneck.set_training(training);
        for block in &mut self.decoder {
            block.set_training(training);
        }
        self.output_bn.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.output_bn.is_training()
    }

    fn name(&self) -> &'static str {
        "UNet"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> UNetConfig {
        UNetConfig {
            height: 16,
            width: 16,
            colors: 3,
            root_filters: 4,
            depth: 2,
            convs_per_block: 2,
            kernel_size: 3,
            pool_size: 2,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = UNetConfig::default();
        assert_eq!(config.root_filters, 64);
        assert_eq!(config.depth, 3);
        assert_eq!(config.convs_per_block, 2);
        assert_eq!(config.level_filters(2), 256);
    }

    #[test]
    fn test_round_trip_shape_and_range() {
        let mut model = UNet::new(small_config()).unwrap();
        model.eval();
        let input = Tensor::<f32>::rand(&[2, 16, 16, 3]);

        let output = model.forward(&input).unwrap();
        assert_eq!(output.shape(), input.shape());
        assert!(output.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_rejects_indivisible_resolution() {
        // Two pool-2 levels need multiples of 4
        let config = UNetConfig {
            height: 10,
            width: 10,
            ..small_config()
        };
        assert!(UNet::new(config).is_err());
    }

    #[test]
    fn test_rejects_wrong_resolution_input() {
        let model = UNet::new(small_config()).unwrap();
        let input = Tensor::<f32>::rand(&[1, 8, 8, 3]);
        assert!(model.forward(&input).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = UNetConfig {
            depth: 0,
            ..small_config()
        };
        assert!(UNet::new(config).is_err());

        let config = UNetConfig {
            root_filters: 0,
            ..small_config()
        };
        assert!(UNet::new(config).is_err());
    }

    #[test]
    fn test_crop_to_match_centers() {
        let skip = Tensor::from_vec((0..16).map(|v| v as f32).collect(), &[1, 4, 4, 1]).unwrap();
        let target = Tensor::<f32>::zeros(&[1, 2, 2, 1]);

        let cropped = crop_to_match(&skip, &target).unwrap();
        assert_eq!(cropped.shape(), &[1, 2, 2, 1]);
        assert_eq!(cropped.to_vec(), vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_crop_to_match_rejects_growth() {
        let skip = Tensor::<f32>::zeros(&[1, 2, 2, 1]);
        let target = Tensor::<f32>::zeros(&[1, 4, 4, 1]);
        assert!(crop_to_match(&skip, &target).is_err());
    }

    #[test]
    fn test_parameter_count() {
        let model = UNet::new(small_config()).unwrap();
        // contracting: (3->4, 4->4), (4->8, 8->8)
        let enc = (3 * 3 * 3 * 4 + 4)
            + (3 * 3 * 4 * 4 + 4)
            + (3 * 3 * 4 * 8 + 8)
            + (3 * 3 * 8 * 8 + 8);
        // bottleneck: 8->16, 16->16
        let mid = (3 * 3 * 8 * 16 + 16) + (3 * 3 * 16 * 16 + 16);
        // expansive level 1: ConvT(16->8) at 2x2, then 16->8, 8->8
        let dec1 = (2 * 2 * 16 * 8 + 8) + (3 * 3 * 16 * 8 + 8) + (3 * 3 * 8 * 8 + 8);
        // expansive level 0: ConvT(8->4) at 2x2, then 8->4, 4->4
        let dec0 = (2 * 2 * 8 * 4 + 4) + (3 * 3 * 8 * 4 + 4) + (3 * 3 * 4 * 4 + 4);
        // head: Conv(4->3) at 1x1 + BN
        let head = (4 * 3 + 3) + 6;
        assert_eq!(model.num_parameters(), enc + mid + dec1 + dec0 + head);
    }

    #[test]
    fn test_named_parameters_cover_all_levels() {
        let model = UNet::new(small_config()).unwrap();
        let names = model.named_parameters();
        assert!(names.keys().any(|k| k.starts_with("encoder.0.")));
        assert!(names.keys().any(|k| k.starts_with("bottleneck.")));
        assert!(names.keys().any(|k| k.starts_with("upconv.0.")));
        assert!(names.keys().any(|k| k.starts_with("decoder.1.")));
        assert!(names.contains_key("output_bn.beta"));
    }
}
