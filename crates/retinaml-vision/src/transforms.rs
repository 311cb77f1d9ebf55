//! Image Transforms - Vision-Specific Preprocessing
//!
//! Provides image-specific transformations for preprocessing. Images follow
//! the channels-last convention used throughout RetinaML: HWC for single
//! images and NHWC for batches.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use retinaml_data::Transform;
use retinaml_tensor::Tensor;

// =============================================================================
// Resize
// =============================================================================

/// Resizes an image to the specified size using bilinear interpolation.
pub struct Resize {
    height: usize,
    width: usize,
}

impl Resize {
    /// Creates a new Resize transform.
    #[must_use] pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Creates a square Resize transform.
    #[must_use] pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }
}

impl Transform for Resize {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        let shape = input.shape();

        // Handle different input formats
        match shape.len() {
            2 => resize_2d(input, self.height, self.width),
            3 => resize_hwc(input, self.height, self.width),
            4 => resize_nhwc(input, self.height, self.width),
            _ => input.clone(),
        }
    }
}

/// Bilinear interpolation resize for a 2D tensor (H x W).
fn resize_2d(input: &Tensor<f32>, new_h: usize, new_w: usize) -> Tensor<f32> {
    let shape = input.shape();
    let (old_h, old_w) = (shape[0], shape[1]);
    let data = input.to_vec();

    let mut result = vec![0.0; new_h * new_w];

    let scale_h = old_h as f32 / new_h as f32;
    let scale_w = old_w as f32 / new_w as f32;

    for y in 0..new_h {
        for x in 0..new_w {
            let src_y = y as f32 * scale_h;
            let src_x = x as f32 * scale_w;

            let y0 = (src_y.floor() as usize).min(old_h - 1);
            let y1 = (y0 + 1).min(old_h - 1);
            let x0 = (src_x.floor() as usize).min(old_w - 1);
            let x1 = (x0 + 1).min(old_w - 1);

            let dy = src_y - y0 as f32;
            let dx = src_x - x0 as f32;

            let v00 = data[y0 * old_w + x0];
            let v01 = data[y0 * old_w + x1];
            let v10 = data[y1 * old_w + x0];
            let v11 = data[y1 * old_w + x1];

            let value = v00 * (1.0 - dx) * (1.0 - dy)
                + v01 * dx * (1.0 - dy)
                + v10 * (1.0 - dx) * dy
                + v11 * dx * dy;

            result[y * new_w + x] = value;
        }
    }

    Tensor::from_vec(result, &[new_h, new_w]).unwrap()
}

/// Bilinear interpolation resize for a 3D tensor (H x W x C).
fn resize_hwc(input: &Tensor<f32>, new_h: usize, new_w: usize) -> Tensor<f32> {
    let shape = input.shape();
    let (old_h, old_w, channels) = (shape[0], shape[1], shape[2]);
    let data = input.to_vec();

    let mut result = vec![0.0; new_h * new_w * channels];

    let scale_h = old_h as f32 / new_h as f32;
    let scale_w = old_w as f32 / new_w as f32;

    for y in 0..new_h {
        for x in 0..new_w {
            let src_y = y as f32 * scale_h;
            let src_x = x as f32 * scale_w;

            let y0 = (src_y.floor() as usize).min(old_h - 1);
            let y1 = (y0 + 1).min(old_h - 1);
            let x0 = (src_x.floor() as usize).min(old_w - 1);
            let x1 = (x0 + 1).min(old_w - 1);

            let dy = src_y - y0 as f32;
            let dx = src_x - x0 as f32;

            for c in 0..channels {
                let v00 = data[(y0 * old_w + x0) * channels + c];
                let v01 = data[(y0 * old_w + x1) * channels + c];
                let v10 = data[(y1 * old_w + x0) * channels + c];
                let v11 = data[(y1 * old_w + x1) * channels + c];

                let value = v00 * (1.0 - dx) * (1.0 - dy)
                    + v01 * dx * (1.0 - dy)
                    + v10 * (1.0 - dx) * dy
                    + v11 * dx * dy;

                result[(y * new_w + x) * channels + c] = value;
            }
        }
    }

    Tensor::from_vec(result, &[new_h, new_w, channels]).unwrap()
}

/// Bilinear interpolation resize for a 4D tensor (N x H x W x C).
fn resize_nhwc(input: &Tensor<f32>, new_h: usize, new_w: usize) -> Tensor<f32> {
    let shape = input.shape();
    let (batch, old_h, old_w, channels) = (shape[0], shape[1], shape[2], shape[3]);
    let data = input.to_vec();

    let mut result = vec![0.0; batch * new_h * new_w * channels];

    let scale_h = old_h as f32 / new_h as f32;
    let scale_w = old_w as f32 / new_w as f32;

    for n in 0..batch {
        let in_base = n * old_h * old_w * channels;
        let out_base = n * new_h * new_w * channels;
        for y in 0..new_h {
            for x in 0..new_w {
                let src_y = y as f32 * scale_h;
                let src_x = x as f32 * scale_w;

                let y0 = (src_y.floor() as usize).min(old_h - 1);
                let y1 = (y0 + 1).min(old_h - 1);
                let x0 = (src_x.floor() as usize).min(old_w - 1);
                let x1 = (x0 + 1).min(old_w - 1);

                let dy = src_y - y0 as f32;
                let dx = src_x - x0 as f32;

                for c in 0..channels {
                    let v00 = data[in_base + (y0 * old_w + x0) * channels + c];
                    let v01 = data[in_base + (y0 * old_w + x1) * channels + c];
                    let v10 = data[in_base + (y1 * old_w + x0) * channels + c];
                    let v11 = data[in_base + (y1 * old_w + x1) * channels + c];

                    let value = v00 * (1.0 - dx) * (1.0 - dy)
                        + v01 * dx * (1.0 - dy)
                        + v10 * (1.0 - dx) * dy
                        + v11 * dx * dy;

                    result[out_base + (y * new_w + x) * channels + c] = value;
                }
            }
        }
    }

    Tensor::from_vec(result, &[batch, new_h, new_w, channels]).unwrap()
}

// =============================================================================
// ToGrayscale
// =============================================================================

/// Reduces an image to a single channel by keeping the first channel.
///
/// No luma blend is computed; the red channel stands in for intensity.
/// Accepts HWC or NHWC input; anything else (or an already single-channel
/// image) is returned unchanged.
pub struct ToGrayscale;

impl ToGrayscale {
    /// Creates a new `ToGrayscale` transform.
    #[must_use] pub fn new() -> Self {
        Self
    }
}

impl Default for ToGrayscale {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for ToGrayscale {
    fn apply(&self, input: &Tensor<f32>) -> Tensor<f32> {
        let shape = input.shape();
        let ndim = shape.len();

        if !(3..=4).contains(&ndim) || shape[ndim - 1] <= 1 {
            return input.clone();
        }

        let channels = shape[ndim - 1];
        let pixels: usize = shape[..ndim - 1].iter().product();
        let data = input.to_vec();

        let mut gray = Vec::with_capacity(pixels);
        for p in 0..pixels {
            gray.push(data[p * channels]);
        }

        let mut out_shape = shape.to_vec();
        out_shape[ndim - 1] = 1;
        Tensor::from_vec(gray, &out_shape).unwrap()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_2d_upscale() {
        let input = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();

        let resize = Resize::new(4, 4);
        let output = resize.apply(&input);

        assert_eq!(output.shape(), &[4, 4]);
        let data = output.to_vec();
        // Top-left maps straight onto the source origin.
        assert_eq!(data[0], 1.0);
        // Bottom-right clamps to the last source pixel.
        assert_eq!(data[15], 4.0);
    }

    #[test]
    fn test_resize_row_interpolation() {
        let input = Tensor::from_vec(vec![0.0, 1.0], &[1, 2, 1]).unwrap();

        let resize = Resize::new(1, 4);
        let output = resize.apply(&input);

        assert_eq!(output.shape(), &[1, 4, 1]);
        assert_eq!(output.to_vec(), vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_resize_identity() {
        let input =
            Tensor::from_vec((0..12).map(|x| x as f32).collect(), &[2, 2, 3]).unwrap();

        let resize = Resize::new(2, 2);
        let output = resize.apply(&input);

        assert_eq!(output.to_vec(), input.to_vec());
    }

    #[test]
    fn test_resize_hwc_channels_independent() {
        // Channel 0 is constant 1, channel 1 is constant 5; interpolation
        // must never mix them.
        let mut data = Vec::new();
        for _ in 0..16 {
            data.push(1.0);
            data.push(5.0);
        }
        let input = Tensor::from_vec(data, &[4, 4, 2]).unwrap();

        let resize = Resize::square(7);
        let output = resize.apply(&input);

        assert_eq!(output.shape(), &[7, 7, 2]);
        for pixel in output.to_vec().chunks(2) {
            assert_eq!(pixel[0], 1.0);
            assert_eq!(pixel[1], 5.0);
        }
    }

    #[test]
    fn test_resize_nhwc_batch() {
        let a = vec![1.0; 4 * 4 * 3];
        let b = vec![2.0; 4 * 4 * 3];
        let data: Vec<f32> = a.into_iter().chain(b).collect();
        let input = Tensor::from_vec(data, &[2, 4, 4, 3]).unwrap();

        let resize = Resize::new(2, 2);
        let output = resize.apply(&input);

        assert_eq!(output.shape(), &[2, 2, 2, 3]);
        let out = output.to_vec();
        assert!(out[..12].iter().all(|&v| v == 1.0));
        assert!(out[12..].iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_to_grayscale_keeps_first_channel() {
        let input = Tensor::from_vec(
            vec![
                0.1, 0.5, 0.9, // pixel (0,0)
                0.2, 0.6, 1.0, // pixel (0,1)
                0.3, 0.7, 0.0, // pixel (1,0)
                0.4, 0.8, 0.1, // pixel (1,1)
            ],
            &[2, 2, 3],
        )
        .unwrap();

        let gray = ToGrayscale::new();
        let output = gray.apply(&input);

        assert_eq!(output.shape(), &[2, 2, 1]);
        assert_eq!(output.to_vec(), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_to_grayscale_batched() {
        let input = Tensor::from_vec((0..24).map(|x| x as f32).collect(), &[2, 2, 2, 3]).unwrap();

        let output = ToGrayscale::new().apply(&input);

        assert_eq!(output.shape(), &[2, 2, 2, 1]);
        assert_eq!(
            output.to_vec(),
            vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0]
        );
    }

    #[test]
    fn test_to_grayscale_single_channel_passthrough() {
        let input = Tensor::from_vec(vec![0.5; 4], &[2, 2, 1]).unwrap();

        let output = ToGrayscale::new().apply(&input);

        assert_eq!(output.shape(), &[2, 2, 1]);
        assert_eq!(output.to_vec(), vec![0.5; 4]);
    }
}
