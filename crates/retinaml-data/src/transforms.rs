//! Transforms - Image Corruption and Preprocessing
//!
//! Provides composable tensor transformations. The denoising pipeline
//! corrupts clean images with `GaussianNoise` followed by `Clamp`, which
//! keeps pixel values in the displayable [0, 1] range.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::Rng;
use rand_distr::StandardNormal;
use retinaml_tensor::Tensor;

// =============================================================================
// Transform Trait
// =============================================================================

/// Trait for tensor transformations.
pub trait Transform: Send + Sync {
    /// Applies the transform to a tensor.
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32>;
}

// =============================================================================
// Compose
// =============================================================================

/// Composes multiple transforms into a single transform.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    /// Creates a new Compose from a vector of transforms.
    #[must_use]
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }

    /// Creates an empty Compose.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Adds a transform to the composition.
    pub fn add<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }
}

impl Transform for Compose {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        let mut result = input.clone();
        for transform in &self.transforms {
            result = transform.apply(&result);
        }
        result
    }
}

// =============================================================================
// GaussianNoise
// =============================================================================

/// Adds factor-scaled standard normal noise to every element.
///
/// Produces `x + factor * z` with `z ~ N(0, 1)`. Values are left
/// unclamped; compose with [`Clamp`] to stay in pixel range.
pub struct GaussianNoise {
    factor: f32,
}

impl GaussianNoise {
    /// Creates a new `GaussianNoise` transform.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// Returns the noise factor.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl Transform for GaussianNoise {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        if self.factor == 0.0 {
            return input.clone();
        }

        let mut rng = rand::thread_rng();
        let noisy: Vec<f32> = input
            .to_vec()
            .iter()
            .map(|&x| {
                let z: f32 = rng.sample(StandardNormal);
                x + z * self.factor
            })
            .collect();
        Tensor::from_vec(noisy, input.shape()).unwrap()
    }
}

// =============================================================================
// Clamp
// =============================================================================

/// Clamps tensor values to a specified range.
pub struct Clamp {
    min: f32,
    max: f32,
}

impl Clamp {
    /// Creates a new Clamp transform.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Creates a Clamp for the [0, 1] pixel range.
    #[must_use]
    pub fn zero_one() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Transform for Clamp {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        input.clamp(self.min, self.max)
    }
}

// =============================================================================
// Scale
// =============================================================================

/// Scales tensor values by a constant factor.
pub struct Scale {
    factor: f32,
}

impl Scale {
    /// Creates a new Scale transform.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// Creates a Scale that maps 8-bit pixel values into [0, 1].
    #[must_use]
    pub fn from_u8_range() -> Self {
        Self::new(1.0 / 255.0)
    }
}

impl Transform for Scale {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        input.mul_scalar(self.factor)
    }
}

// =============================================================================
// Lambda Transform
// =============================================================================

/// Applies a custom function as a transform.
pub struct Lambda<F>
where
    F: Fn(&Tensor<f32>) -> Tensor<f32> + Send + Sync,
{
    func: F,
}

impl<F> Lambda<F>
where
    F: Fn(&Tensor<f32>) -> Tensor<f32> + Send + Sync,
{
    /// Creates a new Lambda transform.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Transform for Lambda<F>
where
    F: Fn(&Tensor<f32>) -> Tensor<f32> + Send + Sync,
{
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        (self.func)(input)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_noise_zero_factor_is_identity() {
        let input = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let noise = GaussianNoise::new(0.0);

        let output = noise.apply(&input);
        assert_eq!(output.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_gaussian_noise_perturbs_values() {
        let input = Tensor::from_vec(vec![0.5; 1000], &[1000]).unwrap();
        let noise = GaussianNoise::new(0.2);

        let output = noise.apply(&input);
        let values = output.to_vec();

        // Mean stays near 0.5; essentially no value survives unperturbed
        let mean: f32 = values.iter().sum::<f32>() / values.len() as f32;
        assert!((mean - 0.5).abs() < 0.05, "mean drifted to {mean}");
        let unchanged = values.iter().filter(|&&v| v == 0.5).count();
        assert!(unchanged < 5);
    }

    #[test]
    fn test_clamp() {
        let input = Tensor::from_vec(vec![-1.0, 0.5, 2.0], &[3]).unwrap();
        let clamp = Clamp::zero_one();

        let output = clamp.apply(&input);
        assert_eq!(output.to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_scale() {
        let input = Tensor::from_vec(vec![0.0, 127.5, 255.0], &[3]).unwrap();
        let scale = Scale::from_u8_range();

        let output = scale.apply(&input);
        assert_eq!(output.to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_corruption_pipeline_stays_in_range() {
        let corrupt = Compose::empty()
            .add(GaussianNoise::new(0.2))
            .add(Clamp::zero_one());

        let input = Tensor::<f32>::rand(&[4, 4, 3]);
        let output = corrupt.apply(&input);

        assert_eq!(output.shape(), input.shape());
        assert!(output.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_lambda() {
        let lambda = Lambda::new(|t: &Tensor<f32>| t.mul_scalar(3.0));

        let input = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let output = lambda.apply(&input);

        assert_eq!(output.to_vec(), vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_compose_order() {
        // Scale then clamp differs from clamp then scale
        let scale_then_clamp =
            Compose::new(vec![Box::new(Scale::new(2.0)), Box::new(Clamp::zero_one())]);

        let input = Tensor::from_vec(vec![0.3, 0.8], &[2]).unwrap();
        let output = scale_then_clamp.apply(&input);
        assert_eq!(output.to_vec(), vec![0.6, 1.0]);
    }
}
