//! SegNet - Encoder-Decoder with Pooling Index Reuse
//!
//! Each encoder stage runs a few batch-normalized convolutions and then
//! pools with [`MaxPoolWithArgmax2d`], recording where every maximum came
//! from. The decoder unpools with [`MaxUnpool2d`] at the recorded positions
//! instead of learning its own upsampling, so spatial detail survives the
//! bottleneck without skip tensors.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_nn::{
    Activation, BatchNorm2d, Conv2d, ConvTranspose2d, MaxPoolWithArgmax2d, MaxUnpool2d, Module,
    Padding, Sequential,
};
use retinaml_tensor::Tensor;

use crate::models::check_image_batch;

// =============================================================================
// Configuration
// =============================================================================

/// One encoder stage: `convs` batch-normalized convolutions at `filters`
/// channels, followed by an argmax pool.
#[derive(Debug, Clone, Copy)]
pub struct SegNetStage {
    /// Channel count of every convolution in the stage.
    pub filters: usize,
    /// Number of convolutions in the stage.
    pub convs: usize,
}

impl SegNetStage {
    /// Creates a stage description.
    #[must_use] pub fn new(filters: usize, convs: usize) -> Self {
        Self { filters, convs }
    }
}

/// Configuration for [`SegNet`].
#[derive(Debug, Clone)]
pub struct SegNetConfig {
    /// Input image height.
    pub height: usize,
    /// Input image width.
    pub width: usize,
    /// Input image channels.
    pub colors: usize,
    /// Encoder stages, shallowest first; the decoder mirrors them.
    pub stages: Vec<SegNetStage>,
    /// Square kernel edge length of the stage convolutions.
    pub kernel_size: usize,
    /// Pooling window and stride.
    pub pool_size: usize,
}

impl Default for SegNetConfig {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
            colors: 3,
            stages: vec![
                SegNetStage::new(64, 2),
                SegNetStage::new(128, 2),
                SegNetStage::new(256, 3),
            ],
            kernel_size: 3,
            pool_size: 2,
        }
    }
}

// =============================================================================
// SegNet
// =============================================================================

/// SegNet-style denoising autoencoder.
///
/// Pooling uses ceiling-division output sizing, and every unpool receives
/// the recorded pre-pool shape as its explicit target, so odd resolutions
/// round-trip without any divisibility requirement on the input.
pub struct SegNet {
    encoder: Vec<Sequential>,
    decoder: Vec<Sequential>,
    pool: MaxPoolWithArgmax2d,
    unpool: MaxUnpool2d,
    output: Conv2d,
    output_bn: BatchNorm2d,
    config: SegNetConfig,
}

impl SegNet {
    /// Builds the model for the configured resolution.
    pub fn new(config: SegNetConfig) -> Result<Self> {
        if config.height == 0 || config.width == 0 || config.colors == 0 {
            return Err(Error::invalid_operation(format!(
                "Image dimensions must be non-zero, got {}x{}x{}",
                config.height, config.width, config.colors
            )));
        }
        if config.kernel_size == 0 || config.pool_size == 0 {
            return Err(Error::invalid_window(config.kernel_size, config.pool_size));
        }
        if config.stages.is_empty()
            || config.stages.iter().any(|s| s.filters == 0 || s.convs == 0)
        {
            return Err(Error::invalid_operation(
                "Stage list must be non-empty with non-zero filters and convs",
            ));
        }

        let mut encoder = Vec::with_capacity(config.stages.len());
        let mut prev = config.colors;
        for stage in &config.stages {
            let mut block = Sequential::new();
            for _ in 0..stage.convs {
                block.push(
                    Conv2d::new(prev, stage.filters, config.kernel_size)
                        .with_padding(Padding::Same)
                        .with_activation(Activation::Relu),
                );
                block.push(BatchNorm2d::new(stage.filters));
                prev = stage.filters;
            }
            encoder.push(block);
        }

        // The decoder mirrors the stages deepest first. The deepest stage
        // keeps the full convolution count; shallower stages give one up to
        // the channel transition that follows the previous unpool.
        let mut decoder = Vec::with_capacity(config.stages.len());
        let deepest = config.stages.len() - 1;
        for (index, stage) in config.stages.iter().enumerate().rev() {
            let mut block = Sequential::new();
            let convs = if index == deepest {
                stage.convs
            } else {
                stage.convs - 1
            };
            for _ in 0..convs {
                block.push(
                    ConvTranspose2d::new(stage.filters, stage.filters, config.kernel_size)
                        .with_padding(Padding::Same)
                        .with_activation(Activation::Relu),
                );
                block.push(BatchNorm2d::new(stage.filters));
            }
            if index > 0 {
                let next = config.stages[index - 1].filters;
                block.push(
                    ConvTranspose2d::new(stage.filters, next, config.kernel_size)
                        .with_padding(Padding::Same)
                        .with_activation(Activation::Relu),
                );
                block.push(BatchNorm2d::new(next));
            }
            decoder.push(block);
        }

        let output = Conv2d::new(config.stages[0].filters, config.colors, 1)
            .with_padding(Padding::Valid)
            .with_activation(Activation::Relu);
        let output_bn = BatchNorm2d::new(config.colors);

        Ok(Self {
            encoder,
            decoder,
            pool: MaxPoolWithArgmax2d::new(config.pool_size),
            unpool: MaxUnpool2d::new(config.pool_size),
            output,
            output_bn,
            config,
        })
    }

    /// Returns the model configuration.
    #[must_use] pub fn config(&self) -> &SegNetConfig {
        &self.config
    }
}

impl Module for SegNet {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        check_image_batch(input, self.config.height, self.config.width, self.config.colors)?;

        let mut x = input.clone();
        let mut masks = Vec::with_capacity(self.encoder.len());
        for stage in &self.encoder {
            x = stage.forward(&x)?;
            let pre_pool = x.shape().to_vec();
            let (pooled, argmax) = self.pool.forward(&x)?;
            masks.push((argmax, pre_pool));
            x = pooled;
        }

        for stage in &self.decoder {
            let (argmax, target) = masks
                .pop()
                .ok_or_else(|| Error::internal("Decoder stage without a matching pooling mask"))?;
            x = self.unpool.forward(&x, &argmax, Some(&target))?;
            x = stage.forward(&x)?;
        }

        let x = self.output.forward(&x)?;
        let x = self.output_bn.forward(&x)?;
        Ok(x.sigmoid())
    }

    fn parameters(&self) -> Vec<Tensor<f32>> {
        let mut params = Vec::new();
        for stage in &self.encoder {
            params.extend(stage.parameters());
        }
        for stage in &self.decoder {
            params.extend(stage.parameters());
        }
        params.extend(self.output.parameters());
        params.extend(self.output_bn.parameters());
        params
    }

    fn named_parameters(&self) -> HashMap<String, Tensor<f32>> {
        let mut params = HashMap::new();
        for (index, stage) in self.encoder.iter().enumerate() {
            for (name, param) in stage.named_parameters() {
                params.insert(format!("encoder.{index}.{name}"), param);
            }
        }
        for (index, stage) in self.decoder.iter().enumerate() {
            for (name, param) in stage.named_parameters() {
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
        for stage in &mut self.encoder {
            stage.set_training(training);
        }
        for stage in &mut self.decoder {
            stage.set_training(training);
        }
        self.output.set_training(training);
        self.output_bn.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.output_bn.is_training()
    }

    fn name(&self) -> &'static str {
        "SegNet"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(height: usize, width: usize) -> SegNetConfig {
        SegNetConfig {
            height,
            width,
            colors: 3,
            stages: vec![SegNetStage::new(4, 2), SegNetStage::new(8, 2)],
            kernel_size: 3,
            pool_size: 2,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = SegNetConfig::default();
        assert_eq!(config.stages.len(), 3);
        assert_eq!(config.stages[2].filters, 256);
        assert_eq!(config.stages[2].convs, 3);
        assert_eq!(config.pool_size, 2);
    }

    #[test]
    fn test_round_trip_shape_and_range() {
        let mut model = SegNet::new(small_config(16, 16)).unwrap();
        model.eval();
        let input = Tensor::<f32>::rand(&[2, 16, 16, 3]);

        let output = model.forward(&input).unwrap();
        assert_eq!(output.shape(), input.shape());
        assert!(output.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_odd_resolution_round_trips() {
        // 15 pools to 8 then 4; the recorded pre-pool shapes steer each
        // unpool back, so no divisibility is required.
        let mut model = SegNet::new(small_config(15, 9)).unwrap();
        model.eval();
        let input = Tensor::<f32>::rand(&[1, 15, 9, 3]);

        let output = model.forward(&input).unwrap();
        assert_eq!(output.shape(), &[1, 15, 9, 3]);
    }

    #[test]
    fn test_rejects_wrong_resolution_input() {
        let model = SegNet::new(small_config(16, 16)).unwrap();
        let input = Tensor::<f32>::rand(&[1, 8, 8, 3]);
        assert!(model.forward(&input).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = SegNetConfig {
            stages: vec![],
            ..small_config(16, 16)
        };
        assert!(SegNet::new(config).is_err());

        let config = SegNetConfig {
            stages: vec![SegNetStage::new(4, 0)],
            ..small_config(16, 16)
        };
        assert!(SegNet::new(config).is_err());

        let config = SegNetConfig {
            pool_size: 0,
            ..small_config(16, 16)
        };
        assert!(SegNet::new(config).is_err());
    }

    #[test]
    fn test_parameter_count() {
        let model = SegNet::new(small_config(16, 16)).unwrap();
        // encoder stage 0: Conv(3->4)+BN, Conv(4->4)+BN
        let enc0 = (3 * 3 * 3 * 4 + 4) + 8 + (3 * 3 * 4 * 4 + 4) + 8;
        // encoder stage 1: Conv(4->8)+BN, Conv(8->8)+BN
        let enc1 = (3 * 3 * 4 * 8 + 8) + 16 + (3 * 3 * 8 * 8 + 8) + 16;
        // decoder deep: two ConvT(8->8)+BN, transition ConvT(8->4)+BN
        let dec1 = 2 * ((3 * 3 * 8 * 8 + 8) + 16) + (3 * 3 * 8 * 4 + 4) + 8;
        // decoder shallow: one ConvT(4->4)+BN
        let dec0 = (3 * 3 * 4 * 4 + 4) + 8;
        // head: Conv(4->3) at 1x1 + BN
        let head = (4 * 3 + 3) + 6;
        assert_eq!(model.num_parameters(), enc0 + enc1 + dec1 + dec0 + head);
    }

    #[test]
    fn test_named_parameters_cover_all_stages() {
        let model = SegNet::new(small_config(16, 16)).unwrap();
        let names = model.named_parameters();
        assert!(names.keys().any(|k| k.starts_with("encoder.0.")));
        assert!(names.keys().any(|k| k.starts_with("encoder.1.")));
        assert!(names.keys().any(|k| k.starts_with("decoder.0.")));
        assert!(names.keys().any(|k| k.starts_with("decoder.1.")));
        assert!(names.contains_key("output_bn.gamma"));
    }

    #[test]
    fn test_training_flag_cascades() {
        let mut model = SegNet::new(small_config(16, 16)).unwrap();
        assert!(model.is_training());
        model.eval();
        assert!(!model.is_training());
        model.train();
        assert!(model.is_training());
    }
}
