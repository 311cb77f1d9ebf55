//! BSD500 Dataset - Berkeley Segmentation Images
//!
//! Loads the BSD500 natural-image splits from a directory tree of the form
//! `<root>/{train,val,test}/*.jpg`. Every image is decoded, scaled to [0, 1],
//! and bilinearly resized to one common resolution so a split stacks into a
//! single NHWC tensor.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::fs;
use std::path::{Path, PathBuf};

use retinaml_data::Transform;
use retinaml_tensor::{stack, Tensor};

use crate::datasets::{DatasetError, DatasetResult, ImageSplits, SplitImages};
use crate::transforms::{Resize, ToGrayscale};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the BSD500 loader.
#[derive(Debug, Clone)]
pub struct Bsd500Config {
    /// Root directory containing the split subdirectories.
    pub root: PathBuf,
    /// Target image width after resizing.
    pub width: usize,
    /// Target image height after resizing.
    pub height: usize,
    /// Output channels: 3 keeps RGB, 1 keeps only the first channel.
    pub colors: usize,
    /// File extension of the images (without the dot).
    pub extension: String,
    /// Name of the training split subdirectory.
    pub train_dir: String,
    /// Name of the validation split subdirectory.
    pub val_dir: String,
    /// Name of the test split subdirectory.
    pub test_dir: String,
}

impl Default for Bsd500Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("BSD"),
            width: 128,
            height: 128,
            colors: 3,
            extension: "jpg".to_string(),
            train_dir: "train".to_string(),
            val_dir: "val".to_string(),
            test_dir: "test".to_string(),
        }
    }
}

// =============================================================================
// Bsd500
// =============================================================================

/// BSD500 image loader.
pub struct Bsd500 {
    config: Bsd500Config,
}

impl Bsd500 {
    /// Creates a loader rooted at `root` with the default configuration.
    #[must_use] pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: Bsd500Config {
                root: root.into(),
                ..Bsd500Config::default()
            },
        }
    }

    /// Creates a loader from an explicit configuration.
    #[must_use] pub fn with_config(config: Bsd500Config) -> Self {
        Self { config }
    }

    /// Returns the loader configuration.
    #[must_use] pub fn config(&self) -> &Bsd500Config {
        &self.config
    }

    /// Collects the image paths of one split directory in sorted order.
    ///
    /// Directory iteration order is filesystem-dependent, so paths are
    /// sorted to keep the stacked tensor deterministic across runs.
    fn image_paths(&self, dir: &Path) -> DatasetResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(&self.config.extension));
            if matches {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(DatasetError::EmptySplit {
                dir: dir.to_path_buf(),
                extension: self.config.extension.clone(),
            });
        }
        Ok(paths)
    }

    /// Decodes one image into an HWC tensor with values in [0, 1].
    fn load_image(&self, path: &Path) -> DatasetResult<Tensor<f32>> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let data: Vec<f32> = rgb
            .into_raw()
            .into_iter()
            .map(|byte| f32::from(byte) / 255.0)
            .collect();
        let tensor = Tensor::from_vec(data, &[height as usize, width as usize, 3])?;

        let resized = Resize::new(self.config.height, self.config.width).apply(&tensor);
        if self.config.colors == 1 {
            Ok(ToGrayscale::new().apply(&resized))
        } else {
            Ok(resized)
        }
    }

    /// Loads every image of one split into a stacked NHWC tensor.
    fn load_split(&self, dir_name: &str) -> DatasetResult<Tensor<f32>> {
        let dir = self.config.root.join(dir_name);
        let paths = self.image_paths(&dir)?;

        let mut images = Vec::with_capacity(paths.len());
        for path in &paths {
            images.push(self.load_image(path)?);
        }
        Ok(stack(&images, 0)?)
    }
}

impl SplitImages for Bsd500 {
    fn load_splits(&self) -> DatasetResult<ImageSplits> {
        Ok(ImageSplits {
            train: self.load_split(&self.config.train_dir)?,
            val: self.load_split(&self.config.val_dir)?,
            test: self.load_split(&self.config.test_dir)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
