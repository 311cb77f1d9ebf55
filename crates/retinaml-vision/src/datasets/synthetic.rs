//! Synthetic Images - File-Free Split Provider
//!
//! Generates deterministic natural-looking test images so pipelines and
//! models can run without any dataset on disk. Every pixel is a pure
//! function of the seed, the image index, and the pixel position, so
//! repeated loads produce identical splits.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use retinaml_tensor::{linspace, Tensor};

use crate::datasets::{DatasetResult, ImageSplits, SplitImages};

// =============================================================================
// SyntheticImages
// =============================================================================

/// A synthetic image dataset with the same provider surface as [`Bsd500`].
///
/// Each image blends a smooth per-channel gradient, a bright blob whose
/// position and spread vary with the image index, and hash noise. Split
/// images draw from one global index sequence, so no two images repeat
/// across splits.
///
/// [`Bsd500`]: crate::datasets::Bsd500
pub struct SyntheticImages {
    train: usize,
    val: usize,
    test: usize,
    height: usize,
    width: usize,
    colors: usize,
    seed: u32,
}

impl SyntheticImages {
    /// Creates a generator with the given split sizes at 128x128 RGB.
    #[must_use] pub fn new(train: usize, val: usize, test: usize) -> Self {
        Self {
            train,
            val,
            test,
            height: 128,
            width: 128,
            colors: 3,
            seed: 0,
        }
    }

    /// Creates a small dataset (8/4/4 images at 32x32 RGB) for tests.
    #[must_use] pub fn small() -> Self {
        Self::new(8, 4, 4).with_resolution(32, 32)
    }

    /// Sets the image resolution.
    #[must_use] pub fn with_resolution(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Sets the number of channels (1 for grayscale, 3 for RGB).
    #[must_use] pub fn with_colors(mut self, colors: usize) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the seed that shifts every generated pixel.
    #[must_use] pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Renders one image into `out` as HWC pixels.
    fn render(&self, index: usize, ramp_y: &[f32], ramp_x: &[f32], out: &mut Vec<f32>) {
        let (h, w) = (self.height, self.width);
        if h == 0 || w == 0 {
            return;
        }
        let image_seed = self.seed.wrapping_add(index as u32);

        // Blob position and spread wander with the image index
        let cy = (index * 7 + 3) % h;
        let cx = (index * 13 + 5) % w;
        let spread =
            ((h.min(w)) as f32 / 4.0).powi(2).max(1.0) * (1.0 + (index % 5) as f32 * 0.5);

        for y in 0..h {
            for x in 0..w {
                let dy = y as f32 - cy as f32;
                let dx = x as f32 - cx as f32;
                let blob = (-(dy * dy + dx * dx) / spread).exp();

                for c in 0..self.colors {
                    let ramp = match c % 3 {
                        0 => ramp_x[x],
                        1 => ramp_y[y],
                        _ => (ramp_x[x] + ramp_y[y]) / 2.0,
                    };

                    // Deterministic hash noise, no RNG state to thread through
                    let pos = ((y * w + x) * self.colors + c) as u32;
                    let noise = (image_seed
                        .wrapping_mul(1_103_515_245)
                        .wrapping_add(12345 + pos)
                        % 256) as f32
                        / 255.0;

                    let value = 0.45 * blob + 0.35 * ramp + 0.2 * noise;
                    out.push(value.clamp(0.0, 1.0));
                }
            }
        }
    }

    /// Generates `count` images starting at the global index `offset`.
    fn split(&self, count: usize, offset: usize) -> DatasetResult<Tensor<f32>> {
        let ramp_y = linspace(0.0f32, 1.0, self.height).to_vec();
        let ramp_x = linspace(0.0f32, 1.0, self.width).to_vec();

        let mut data = Vec::with_capacity(count * self.height * self.width * self.colors);
        for i in 0..count {
            self.render(offset + i, &ramp_y, &ramp_x, &mut data);
        }

        Ok(Tensor::from_vec(
            data,
            &[count, self.height, self.width, self.colors],
        )?)
    }
}

impl SplitImages for SyntheticImages {
    fn load_splits(&self) -> DatasetResult<ImageSplits> {
        Ok(ImageSplits {
            train: self.split(self.train, 0)?,
            val: self.split(self.val, self.train)?,
            test: self.split(self.test, self.train + self.val)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
