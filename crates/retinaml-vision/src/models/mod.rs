//! Denoising Models - Four Autoencoder Architectures
//!
//! Implements the four image denoising architectures compared in this
//! framework, from a single-bottleneck dense autoencoder to a U-Net with
//! skip connections. Every model owns its layers, validates the complete
//! shape flow when constructed, and maps NHWC batches to NHWC batches of
//! the same shape.
//!
//! # Key Components
//! - [`ShallowAutoencoder`] - Flatten / Dense bottleneck / Reshape
//! - [`ConvAutoencoder`] - strided convolutions mirrored by transposed ones
//! - [`SegNet`] - pooling with recorded argmax, unpooling by those positions
//! - [`UNet`] - encoder-decoder with cropped skip concatenations
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::Tensor;

pub mod conv;
pub mod segnet;
pub mod shallow;
pub mod unet;

pub use conv::{ConvAutoencoder, ConvAutoencoderConfig};
pub use segnet::{SegNet, SegNetConfig, SegNetStage};
pub use shallow::{ShallowAutoencoder, ShallowConfig};
pub use unet::{UNet, UNetConfig};

/// Checks that a batch matches the resolution a model was built for.
pub(crate) fn check_image_batch(
    input: &Tensor<f32>,
    height: usize,
    width: usize,
    colors: usize,
) -> Result<()> {
    let (_, in_h, in_w, in_c) = nhwc_dims(input.shape())?;
    if (in_h, in_w, in_c) != (height, width, colors) {
        return Err(Error::shape_mismatch(
            &[height, width, colors],
            &[in_h, in_w, in_c],
        ));
    }
    Ok(())
}
