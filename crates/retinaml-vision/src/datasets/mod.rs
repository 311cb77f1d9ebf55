//! Vision Datasets
//!
//! Provides image dataset providers for denoising experiments. A provider
//! yields three NHWC splits (train/val/test) with values in [0, 1]; the
//! [`noisy_splits`] helper corrupts all three at once to form the
//! (noisy, clean) pairs a denoising model trains against.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::PathBuf;

use thiserror::Error;

use retinaml_data::{Clamp, Compose, GaussianNoise, Transform};
use retinaml_tensor::Tensor;

pub mod bsd500;
pub mod synthetic;

pub use bsd500::{Bsd500, Bsd500Config};
pub use synthetic::SyntheticImages;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading image datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An image file could not be decoded.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// A split directory contained no usable images.
    #[error("No '{extension}' images found in {}", dir.display())]
    EmptySplit {
        /// The directory that was scanned.
        dir: PathBuf,
        /// The file extension that was looked for.
        extension: String,
    },

    /// Decoded data could not be assembled into a tensor.
    #[error(transparent)]
    Tensor(#[from] retinaml_core::Error),
}

/// A specialized Result type for dataset loading.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

// =============================================================================
// Split Provider Contract
// =============================================================================

/// The three image splits of a dataset, each a (count, height, width,
/// channels) tensor with values in [0, 1].
#[derive(Debug, Clone)]
pub struct ImageSplits {
    /// Training images.
    pub train: Tensor<f32>,
    /// Validation images.
    pub val: Tensor<f32>,
    /// Test images.
    pub test: Tensor<f32>,
}

impl ImageSplits {
    /// Returns the per-image (height, width, channels) of the splits.
    #[must_use]
    pub fn image_shape(&self) -> (usize, usize, usize) {
        let shape = self.train.shape();
        (shape[1], shape[2], shape[3])
    }

    /// Returns the number of images in (train, val, test) order.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.train.shape()[0],
            self.val.shape()[0],
            self.test.shape()[0],
        )
    }
}

/// A source of train/val/test image splits.
pub trait SplitImages {
    /// Loads all three splits as NHWC tensors with values in [0, 1].
    fn load_splits(&self) -> DatasetResult<ImageSplits>;
}

// =============================================================================
// Noise Corruption
// =============================================================================

/// Corrupts every split with Gaussian noise and clamps back to [0, 1].
///
/// The returned splits line up image-for-image with the input, so
/// `(noisy.train, clean.train)` form the training pairs of a denoiser.
#[must_use]
pub fn noisy_splits(clean: &ImageSplits, factor: f32) -> ImageSplits {
    let corrupt = Compose::new(vec![
        Box::new(GaussianNoise::new(factor)),
        Box::new(Clamp::zero_one()),
    ]);

    ImageSplits {
        train: corrupt.apply(&clean.train),
        val: corrupt.apply(&clean.val),
        test: corrupt.apply(&clean.test),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_splits() -> ImageSplits {
        ImageSplits {
            train: Tensor::from_vec(vec![0.5; 4 * 8 * 8 * 3], &[4, 8, 8, 3]).unwrap(),
            val: Tensor::from_vec(vec![0.5; 2 * 8 * 8 * 3], &[2, 8, 8, 3]).unwrap(),
            test: Tensor::from_vec(vec![0.5; 2 * 8 * 8 * 3], &[2, 8, 8, 3]).unwrap(),
        }
    }

    #[test]
    fn test_split_accessors() {
        let splits = tiny_splits();
        assert_eq!(splits.image_shape(), (8, 8, 3));
        assert_eq!(splits.counts(), (4, 2, 2));
    }

    #[test]
    fn test_noisy_splits_shapes_and_range() {
        let clean = tiny_splits();
        let noisy = noisy_splits(&clean, 0.2);

        assert_eq!(noisy.train.shape(), clean.train.shape());
        assert_eq!(noisy.val.shape(), clean.val.shape());
        assert_eq!(noisy.test.shape(), clean.test.shape());
        assert!(noisy.train.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_noisy_splits_zero_factor_is_identity() {
        let clean = tiny_splits();
        let noisy = noisy_splits(&clean, 0.0);
        assert_eq!(noisy.train.to_vec(), clean.train.to_vec());
    }

    #[test]
    fn test_empty_split_error_display() {
        let err = DatasetError::EmptySplit {
            dir: PathBuf::from("BSD/train"),
            extension: "jpg".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("jpg"));
        assert!(message.contains("BSD"));
    }
}
