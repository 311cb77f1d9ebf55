//! Tensor Creation - Factory Functions
//!
//! Provides factory functions for creating tensors with various
//! initialization patterns: constants, ramps, and random distributions.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::{Distribution, Standard, Uniform};
use rand::thread_rng;
use rand_distr::StandardNormal;

use retinaml_core::dtype::{Float, Numeric, Scalar};
use retinaml_core::storage::Storage;

use crate::shape::numel;
use crate::tensor::Tensor;

// =============================================================================
// Constant Tensors
// =============================================================================

/// Creates a tensor filled with zeros.
#[must_use]
pub fn zeros<T: Scalar>(shape: &[usize]) -> Tensor<T> {
    let storage = Storage::zeros(numel(shape));
    Tensor::from_storage(storage, shape).unwrap()
}

/// Creates a tensor filled with ones.
#[must_use]
pub fn ones<T: Numeric>(shape: &[usize]) -> Tensor<T> {
    full(shape, T::ONE)
}

/// Creates a tensor filled with a constant value.
#[must_use]
pub fn full<T: Scalar>(shape: &[usize], value: T) -> Tensor<T> {
    let data = vec![value; numel(shape)];
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a zero tensor with the same shape as another.
#[must_use]
pub fn zeros_like<T: Scalar>(other: &Tensor<T>) -> Tensor<T> {
    zeros(other.shape())
}

/// Creates a ones tensor with the same shape as another.
#[must_use]
pub fn ones_like<T: Numeric>(other: &Tensor<T>) -> Tensor<T> {
    ones(other.shape())
}

/// Creates a constant tensor with the same shape as another.
#[must_use]
pub fn full_like<T: Scalar>(other: &Tensor<T>, value: T) -> Tensor<T> {
    full(other.shape(), value)
}

// =============================================================================
// Range Tensors
// =============================================================================

/// Creates a 1D tensor with values [0, 1, ..., n-1].
#[must_use]
pub fn arange<T: Numeric>(n: usize) -> Tensor<T> {
    let mut data = Vec::with_capacity(n);
    let mut value = T::ZERO;
    for _ in 0..n {
        data.push(value);
        value = value + T::ONE;
    }
    Tensor::from_vec(data, &[n]).unwrap()
}

/// Creates a 1D tensor with `steps` evenly spaced values from `start` to
/// `end` inclusive.
#[must_use]
pub fn linspace<T: Float>(start: T, end: T, steps: usize) -> Tensor<T> {
    if steps == 0 {
        return Tensor::from_vec(Vec::new(), &[0]).unwrap();
    }
    if steps == 1 {
        return Tensor::from_vec(vec![start], &[1]).unwrap();
    }

    let step_count = num_traits::cast::<usize, T>(steps - 1).unwrap();
    let delta = (end - start) / step_count;
    let mut data = Vec::with_capacity(steps);
    let mut value = start;
    for _ in 0..steps - 1 {
        data.push(value);
        value = value + delta;
    }
    data.push(end);
    Tensor::from_vec(data, &[steps]).unwrap()
}

// =============================================================================
// Random Tensors
// =============================================================================

/// Creates a tensor with uniform random values in [0, 1).
#[must_use]
pub fn rand<T>(shape: &[usize]) -> Tensor<T>
where
    T: Float,
    Standard: Distribution<T>,
{
    let mut rng = thread_rng();
    let data: Vec<T> = Standard.sample_iter(&mut rng).take(numel(shape)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with standard normal random values (mean 0, std 1).
#[must_use]
pub fn randn<T>(shape: &[usize]) -> Tensor<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    let mut rng = thread_rng();
    let data: Vec<T> = StandardNormal
        .sample_iter(&mut rng)
        .take(numel(shape))
        .collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with normal random values with the given mean and
/// standard deviation.
#[must_use]
pub fn normal<T>(shape: &[usize], mean: T, std: T) -> Tensor<T>
where
    T: Float,
    StandardNormal: Distribution<T>,
{
    let mut rng = thread_rng();
    let data: Vec<T> = StandardNormal
        .sample_iter(&mut rng)
        .take(numel(shape))
        .map(|z: T| mean + z * std)
        .collect();
    Tensor::from_vec(data, shape).unwrap()
}

/// Creates a tensor with uniform random values in [low, high).
#[must_use]
pub fn uniform<T>(shape: &[usize], low: T, high: T) -> Tensor<T>
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    let mut rng = thread_rng();
    let dist = Uniform::new(low, high);
    let data: Vec<T> = dist.sample_iter(&mut rng).take(numel(shape)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_ones() {
        let z = zeros::<f32>(&[2, 3]);
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.to_vec().iter().all(|&x| x == 0.0));

        let o = ones::<f32>(&[4]);
        assert!(o.to_vec().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_full() {
        let t = full(&[2, 2], 3.5f32);
        assert_eq!(t.to_vec(), vec![3.5, 3.5, 3.5, 3.5]);
    }

    #[test]
    fn test_like_variants() {
        let base = zeros::<f32>(&[1, 2, 2, 3]);
        assert_eq!(zeros_like(&base).shape(), base.shape());
        assert_eq!(ones_like(&base).shape(), base.shape());
        assert_eq!(full_like(&base, 9.0).get(&[0, 0, 0, 0]).unwrap(), 9.0);
    }

    #[test]
    fn test_arange() {
        let t = arange::<f32>(5);
        assert_eq!(t.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_linspace() {
        let t = linspace(0.0f32, 1.0, 5);
        assert_eq!(t.to_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let single = linspace(3.0f32, 7.0, 1);
        assert_eq!(single.to_vec(), vec![3.0]);
        assert_eq!(linspace::<f32>(0.0, 1.0, 0).numel(), 0);
    }

    #[test]
    fn test_linspace_endpoint_exact() {
        let t = linspace(0.0f32, 0.3, 4);
        let values = t.to_vec();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[3], 0.3);
    }

    #[test]
    fn test_rand_bounds() {
        let t = rand::<f32>(&[100]);
        assert!(t.to_vec().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_uniform_bounds() {
        let t = uniform::<f32>(&[100], -2.0, 2.0);
        assert!(t.to_vec().iter().all(|&x| (-2.0..2.0).contains(&x)));
    }

    #[test]
    fn test_randn_shape() {
        let t = randn::<f32>(&[3, 3]);
        assert_eq!(t.numel(), 9);
    }

    #[test]
    fn test_normal_moments() {
        let t = normal::<f32>(&[10_000], 5.0, 0.1);
        let mean = t.to_vec().iter().sum::<f32>() / 10_000.0;
        assert!((mean - 5.0).abs() < 0.05);
    }
}
