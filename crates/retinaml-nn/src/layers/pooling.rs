//! Pooling Layers - Spatial Downsampling and Indexed Upsampling
//!
//! `MaxPool2d` is a plain valid-padding max pool for encoder paths that do
//! not need to remember where maxima came from. `MaxPoolWithArgmax2d` and
//! `MaxUnpool2d` wrap the functional operator pair for encoder-decoder
//! models that route pooling indices across the bottleneck; they are not
//! `Module`s because their forward passes carry a second tensor.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::Tensor;

use crate::functional;
use crate::module::Module;

// =============================================================================
// MaxPool2d
// =============================================================================

/// 2D max pooling with valid padding over NHWC inputs.
///
/// Output spatial size is `(in - pool) / stride + 1`; trailing cells that
/// do not fill a whole window are dropped.
#[derive(Debug, Clone, Copy)]
pub struct MaxPool2d {
    pool_size: usize,
    stride: usize,
}

impl MaxPool2d {
    /// Creates a max pool with stride equal to the window size.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            stride: pool_size,
        }
    }

    /// Sets the stride.
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Returns the window size.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}

impl Module for MaxPool2d {
    fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        if self.pool_size == 0 || self.stride == 0 {
            return Err(Error::invalid_window(self.pool_size, self.stride));
        }

        let (batch, in_h, in_w, channels) = nhwc_dims(input.shape())?;
        if in_h < self.pool_size || in_w < self.pool_size {
            return Err(Error::shape_mismatch(
                &[self.pool_size, self.pool_size],
                &[in_h, in_w],
            ));
        }

        let out_h = (in_h - self.pool_size) / self.stride + 1;
        let out_w = (in_w - self.pool_size) / self.stride + 1;

        let data = input.to_vec();
        let mut output = Vec::with_capacity(batch * out_h * out_w * channels);

        for n in 0..batch {
            let base = n * in_h * in_w * channels;
            for oy in 0..out_h {
                let y0 = oy * self.stride;
                for ox in 0..out_w {
                    let x0 = ox * self.stride;
                    for ch in 0..channels {
                        let mut best = data[base + (y0 * in_w + x0) * channels + ch];
                        for y in y0..y0 + self.pool_size {
                            for x in x0..x0 + self.pool_size {
                                let value = data[base + (y * in_w + x) * channels + ch];
                                if value > best {
                                    best = value;
                                }
                            }
                        }
                        output.push(best);
                    }
                }
            }
        }

        Tensor::from_vec(output, &[batch, out_h, out_w, channels])
    }

    fn name(&self) -> &'static str {
        "MaxPool2d"
    }
}

// =============================================================================
// MaxPoolWithArgmax2d
// =============================================================================

/// Max pooling layer that also returns argmax positions.
///
/// Delegates to [`functional::max_pool2d_with_argmax`]; see that function
/// for the shape law and index encoding.
#[derive(Debug, Clone, Copy)]
pub struct MaxPoolWithArgmax2d {
    window: usize,
    stride: usize,
}

impl MaxPoolWithArgmax2d {
    /// Creates a pooling layer with stride equal to the window size.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            stride: window,
        }
    }

    /// Sets the stride.
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Pools the input, returning values and argmax positions.
    pub fn forward(&self, input: &Tensor<f32>) -> Result<(Tensor<f32>, Tensor<i64>)> {
        functional::max_pool2d_with_argmax(input, self.window, self.stride)
    }
}

// =============================================================================
// MaxUnpool2d
// =============================================================================

/// Unpooling layer that scatters values back to recorded positions.
///
/// Delegates to [`functional::max_unpool2d`].
#[derive(Debug, Clone, Copy)]
pub struct MaxUnpool2d {
    stride: usize,
}

impl MaxUnpool2d {
    /// Creates an unpooling layer with the given upsampling factor.
    #[must_use]
    pub fn new(stride: usize) -> Self {
        Self { stride }
    }

    /// Scatters pooled values into a zero canvas at their argmax positions.
    ///
    /// # Arguments
    /// * `pooled` - Pooled values
    /// * `argmax` - Positions recorded during pooling
    /// * `target_shape` - Explicit output shape, or `None` to derive it
    pub fn forward(
        &self,
        pooled: &Tensor<f32>,
        argmax: &Tensor<i64>,
        target_shape: Option<&[usize]>,
    ) -> Result<Tensor<f32>> {
        functional::max_unpool2d(pooled, argmax, self.stride, target_shape)
    }
}

// =============================================================================
// Tests
// =============================================================================
