//! Weight Initialization - Parameter Initialization Strategies
//!
//! Provides weight initialization strategies for neural network layers.
//! Shapes are passed explicitly so the same initializers serve both dense
//! matrices and 4D convolution kernels.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use rand::Rng;

use retinaml_tensor::Tensor;

// =============================================================================
// Basic Initializers
// =============================================================================

/// Creates a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor<f32> {
    retinaml_tensor::zeros(shape)
}

/// Creates a tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor<f32> {
    retinaml_tensor::ones(shape)
}

/// Creates a tensor filled with a constant value.
pub fn constant(shape: &[usize], value: f32) -> Tensor<f32> {
    retinaml_tensor::full(shape, value)
}

// =============================================================================
// Random Initializers
// =============================================================================

/// Creates a tensor with uniform random values in [low, high).
pub fn uniform_range(shape: &[usize], low: f32, high: f32) -> Tensor<f32> {
    let mut rng = rand::thread_rng();
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| rng.gen_range(low..high)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with standard normal random values (mean=0, std=1).
pub fn randn(shape: &[usize]) -> Tensor<f32> {
    retinaml_tensor::randn(shape)
}

/// Creates a tensor with normal random values (specified mean and std).
pub fn normal(shape: &[usize], mean: f32, std: f32) -> Tensor<f32> {
    let base = retinaml_tensor::randn(shape);
    base.mul_scalar(std).add_scalar(mean)
}

// =============================================================================
// Xavier/Glorot Initialization
// =============================================================================

/// Xavier uniform initialization.
///
/// Samples from U(-a, a) where a = sqrt(6 / (fan_in + fan_out)). For a
/// convolution kernel the fans are `kh * kw * in_channels` and
/// `kh * kw * out_channels`.
///
/// # Arguments
/// * `shape` - Shape of the tensor to create
/// * `fan_in` - Number of input units feeding each output
/// * `fan_out` - Number of output units fed by each input
pub fn xavier_uniform(shape: &[usize], fan_in: usize, fan_out: usize) -> Tensor<f32> {
    let a = (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform_range(shape, -a, a)
}

/// Xavier normal initialization.
///
/// Samples from N(0, std) where std = sqrt(2 / (fan_in + fan_out)).
pub fn xavier_normal(shape: &[usize], fan_in: usize, fan_out: usize) -> Tensor<f32> {
    let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
    normal(shape, 0.0, std)
}

/// Alias for xavier_uniform.
pub fn glorot_uniform(shape: &[usize], fan_in: usize, fan_out: usize) -> Tensor<f32> {
    xavier_uniform(shape, fan_in, fan_out)
}

/// Alias for xavier_normal.
pub fn glorot_normal(shape: &[usize], fan_in: usize, fan_out: usize) -> Tensor<f32> {
    xavier_normal(shape, fan_in, fan_out)
}

// =============================================================================
// Kaiming/He Initialization
// =============================================================================

/// Kaiming uniform initialization.
///
/// Designed for layers with ReLU activations.
/// Samples from U(-bound, bound) where bound = sqrt(6 / fan_in).
pub fn kaiming_uniform(shape: &[usize], fan_in: usize) -> Tensor<f32> {
    let bound = (6.0 / fan_in as f32).sqrt();
    uniform_range(shape, -bound, bound)
}

/// Kaiming normal initialization.
///
/// Designed for layers with ReLU activations.
/// Samples from N(0, std) where std = sqrt(2 / fan_in).
pub fn kaiming_normal(shape: &[usize], fan_in: usize) -> Tensor<f32> {
    let std = (2.0 / fan_in as f32).sqrt();
    normal(shape, 0.0, std)
}

// =============================================================================
// Tests
// =============================================================================
