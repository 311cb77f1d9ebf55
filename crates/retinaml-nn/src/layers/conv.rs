//! Convolution Layers - 2D Convolution and Transposed Convolution
//!
//! NHWC convolution layers with ceil-mode `Same` padding. Kernels are
//! stored (kh, kw, in_channels, out_channels) for both layer types. `Same`
//! padding keeps `ceil(in / stride)` output cells for convolution and
//! `in * stride` for transposed convolution, padding asymmetrically with
//! the extra row/column at the bottom/right.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::Tensor;

use crate::activation::Activation;
use crate::init;
use crate::module::Module;

// =============================================================================
// Padding
// =============================================================================

/// Spatial padding scheme for convolution layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// No padding; windows must fit entirely inside the input.
    Valid,
    /// Zero padding sized so the output covers every input position.
    Same,
}

impl Padding {
    /// Output size of a convolution along one spatial axis.
    pub fn conv_output_size(self, input: usize, kernel: usize, stride: usize) -> Result<usize> {
        match self {
            Padding::Valid => {
                if input < kernel {
                    return Err(Error::shape_mismatch(&[kernel], &[input]));
                }
                Ok((input - kernel) / stride + 1)
            }
            Padding::Same => Ok((input + stride - 1) / stride),
        }
    }

    /// Leading zero padding of a convolution along one spatial axis.
    ///
    /// For `Same`, the total padding splits with the extra cell trailing,
    /// so odd totals pad one more at the bottom/right than at the top/left.
    #[must_use]
    pub fn conv_pad_before(self, input: usize, kernel: usize, stride: usize) -> usize {
        match self {
            Padding::Valid => 0,
            Padding::Same => {
                let output = (input + stride - 1) / stride;
                let total = ((output - 1) * stride + kernel).saturating_sub(input);
                total / 2
            }
        }
    }

    /// Output size of a transposed convolution along one spatial axis.
    #[must_use]
    pub fn transpose_output_size(self, input: usize, kernel: usize, stride: usize) -> usize {
        match self {
            Padding::Valid => {
                if input == 0 {
                    0
                } else {
                    (input - 1) * stride + kernel
                }
            }
            Padding::Same => input * stride,
        }
    }

    /// Leading crop of a transposed convolution along one spatial axis.
    #[must_use]
    pub fn transpose_pad_before(self, kernel: usize, stride: usize) -> usize {
        match self {
            Padding::Valid => 0,
            Padding::Same => kernel.saturating_sub(stride) / 2,
        }
    }
}

// =============================================================================
// Conv2d
// =============================================================================

/// 2D convolution over NHWC inputs.
///
/// Weight shape is (kernel, kernel, in_channels, out_channels). An optional
/// activation is fused into the forward pass.
pub struct Conv2d {
    weight: Tensor<f32>,
    bias: Option<Tensor<f32>>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    stride: usize,
    padding: Padding,
    activation: Option<Activation>,
}

impl Conv2d {
    /// Creates a new Conv2d layer.
    ///
    /// Defaults: stride 1, valid padding, bias, no activation. Weights are
    /// Xavier-initialized with convolutional fan sizes.
    ///
    /// # Arguments
    /// * `in_channels` - Number of input channels
    /// * `out_channels` - Number of output channels (filters)
    /// * `kernel_size` - Square kernel edge length
    #[must_use]
    pub fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        let fan_in = kernel_size * kernel_size * in_channels;
        let fan_out = kernel_size * kernel_size * out_channels;
        let weight = init::xavier_uniform(
            &[kernel_size, kernel_size, in_channels, out_channels],
            fan_in,
            fan_out,
        );

        Self {
            weight,
            bias: Some(init::zeros(&[out_channels])),
            in_channels,
            out_channels,
            kernel_size,
            stride: 1,
            padding: Padding::Valid,
            activation: None,
        }
    }

    /// Sets the stride.
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Sets the padding scheme.
    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Fuses an activation into the forward pass.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    /// Removes the bias term.
    #[must_use]
    pub fn without_bias(mut self) -> Self {
        self.bias = None;
        self
    }

    /// Returns the number of input channels.
    #[must_use]
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the number of output channels.
    #[must_use]
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the kernel edge length.
    #[must_use]
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    /// Returns the stride.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the padding scheme.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        if self.kernel_size == 0 || self.stride == 0 {
            return Err(Error::invalid_window(self.kernel_size, self.stride));
        }

        let (batch, in_h, in_w, channels) = nhwc_dims(input.shape())?;
        if channels != self.in_channels {
            return Err(Error::shape_mismatch(&[self.in_channels], &[channels]));
        }

        let k = self.kernel_size;
        let s = self.stride;
        let out_h = self.padding.conv_output_size(in_h, k, s)?;
        let out_w = self.padding.conv_output_size(in_w, k, s)?;
        let pad_top = self.padding.conv_pad_before(in_h, k, s);
        let pad_left = self.padding.conv_pad_before(in_w, k, s);

        let data = input.to_vec();
        let weight = self.weight.to_vec();
        let bias = self.bias.as_ref().map(Tensor::to_vec);

        let in_c = self.in_channels;
        let out_c = self.out_channels;
        let mut output = vec![0.0f32; batch * out_h * out_w * out_c];

        for n in 0..batch {
            let in_base = n * in_h * in_w * in_c;
            let out_base = n * out_h * out_w * out_c;
            for oy in 0..out_h {
                for ox in 0..out_w {
                    let acc_base = out_base + (oy * out_w + ox) * out_c;
                    let acc = &mut output[acc_base..acc_base + out_c];

                    if let Some(b) = &bias {
                        acc.copy_from_slice(b);
                    }

                    for ky in 0..k {
                        let y = oy * s + ky;
                        if y < pad_top || y - pad_top >= in_h {
                            continue;
                        }
                        let y = y - pad_top;
                        for kx in 0..k {
                            let x = ox * s + kx;
                            if x < pad_left || x - pad_left >= in_w {
                                continue;
                            }
                            let x = x - pad_left;
                            let pixel = in_base + (y * in_w + x) * in_c;
                            for ic in 0..in_c {
                                let value = data[pixel + ic];
                                let w_base = ((ky * k + kx) * in_c + ic) * out_c;
                                let w_row = &weight[w_base..w_base + out_c];
                                for (o, &w) in w_row.iter().enumerate() {
                                    acc[o] += value * w;
                                }
                            }
                        }
                    }
                }
            }
        }

        let result = Tensor::from_vec(output, &[batch, out_h, out_w, out_c])?;
        Ok(match self.activation {
            Some(activation) => activation.apply(&result),
            None => result,
        })
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
        "Conv2d"
    }
}

impl std::fmt::Debug for Conv2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conv2d")
            .field("in_channels", &self.in_channels)
            .field("out_channels", &self.out_channels)
            .field("kernel_size", &self.kernel_size)
            .field("stride", &self.stride)
            .field("padding", &self.padding)
            .finish()
    }
}

// =============================================================================
// ConvTranspose2d
// =============================================================================

/// 2D transposed convolution over NHWC inputs.
///
/// Implemented as a scatter: every input cell adds its kernel-weighted
/// contribution into the upsampled output. Weight shape matches [`Conv2d`]:
/// (kernel, kernel, in_channels, out_channels).
pub struct ConvTranspose2d {
    weight: Tensor<f32>,
    bias: Option<Tensor<f32>>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    stride: usize,
    padding: Padding,
    activation: Option<Activation>,
}

impl ConvTranspose2d {
    /// Creates a new ConvTranspose2d layer.
    ///
    /// Defaults: stride 1, valid padding, bias, no activation.
    ///
    /// # Arguments
    /// * `in_channels` - Number of input channels
    /// * `out_channels` - Number of output channels (filters)
    /// * `kernel_size` - Square kernel edge length
    #[must_use]
    pub fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        let fan_in = kernel_size * kernel_size * in_channels;
        let fan_out = kernel_size * kernel_size * out_channels;
        let weight = init::xavier_uniform(
            &[kernel_size, kernel_size, in_channels, out_channels],
            fan_in,
            fan_out,
        );

        Self {
            weight,
            bias: Some(init::zeros(&[out_channels])),
            in_channels,
            out_channels,
            kernel_size,
            stride: 1,
            padding: Padding::Valid,
            activation: None,
        }
    }

    /// Sets the stride (upsampling factor).
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Sets the padding scheme.
    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Fuses an activation into the forward pass.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    /// Returns the number of input channels.
    #[must_use]
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    /// Returns the number of output channels.
    #[must_use]
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Returns the stride.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl Module for ConvTranspose2d {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        if self.kernel_size == 0 || self.stride == 0 {
            return Err(Error::invalid_window(self.kernel_size, self.stride));
        }

        let (batch, in_h, in_w, channels) = nhwc_dims(input.shape())?;
        if channels != self.in_channels {
            return Err(Error::shape_mismatch(&[self.in_channels], &[channels]));
        }

        let k = self.kernel_size;
        let s = self.stride;
        let out_h = self.padding.transpose_output_size(in_h, k, s);
        let out_w = self.padding.transpose_output_size(in_w, k, s);
        let pad_top = self.padding.transpose_pad_before(k, s);
        let pad_left = self.padding.transpose_pad_before(k, s);

        let data = input.to_vec();
        let weight = self.weight.to_vec();

        let in_c = self.in_channels;
        let out_c = self.out_channels;

        // Bias fills the canvas before input contributions are scattered
        let mut output = match &self.bias {
            Some(bias) => {
                let b = bias.to_vec();
                let mut canvas = vec![0.0f32; batch * out_h * out_w * out_c];
                for chunk in canvas.chunks_exact_mut(out_c) {
                    chunk.copy_from_slice(&b);
                }
                canvas
            }
            None => vec![0.0f32; batch * out_h * out_w * out_c],
        };

        for n in 0..batch {
            let in_base = n * in_h * in_w * in_c;
            let out_base = n * out_h * out_w * out_c;
            for iy in 0..in_h {
                for ix in 0..in_w {
                    let pixel = in_base + (iy * in_w + ix) * in_c;
                    for ic in 0..in_c {
                        let value = data[pixel + ic];
                        for ky in 0..k {
                            let oy = iy * s + ky;
                            if oy < pad_top || oy - pad_top >= out_h {
                                continue;
                            }
                            let oy = oy - pad_top;
                            for kx in 0..k {
                                let ox = ix * s + kx;
                                if ox < pad_left || ox - pad_left >= out_w {
                                    continue;
                                }
                                let ox = ox - pad_left;
                                let w_base = ((ky * k + kx) * in_c + ic) * out_c;
                                let w_row = &weight[w_base..w_base + out_c];
                                let acc_base = out_base + (oy * out_w + ox) * out_c;
                                let acc = &mut output[acc_base..acc_base + out_c];
                                for (o, &w) in w_row.iter().enumerate() {
                                    acc[o] += value * w;
                                }
                            }
                        }
                    }
                }
            }
        }

        let result = Tensor::from_vec(output, &[batch, out_h, out_w, out_c])?;
        Ok(match self.activation {
            Some(activation) => activation.apply(&result),
            None => result,
        })
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
        "ConvTranspose2d"
    }
}

impl std::fmt::Debug for ConvTranspose2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvTranspose2d")
            .field("in_channels", &self.in_channels)
            .field("out_channels", &self.out_channels)
            .field("kernel_size", &self.kernel_size)
            .field("stride", &self.stride)
            .field("padding", &self.padding)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
