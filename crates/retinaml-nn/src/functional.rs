//! Functional API - Stateless Neural Network Operations
//!
//! Free-function forms of the image operators. The centerpiece is the
//! max-pooling / max-unpooling pair used by encoder-decoder models: pooling
//! records the flat position of every window maximum, and unpooling scatters
//! values back to exactly those positions.
//!
//! All image tensors are NHWC: (batch, height, width, channels).
//!
//! # Key Features
//! - `max_pool2d_with_argmax` - pooling that remembers where each maximum came from
//! - `max_unpool2d` - sparse upsampling driven by recorded argmax positions
//! - Element-wise activations and the MSE reconstruction loss
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use retinaml_core::error::{Error, Result};
use retinaml_tensor::shape::nhwc_dims;
use retinaml_tensor::Tensor;

// =============================================================================
// Max Pooling With Argmax
// =============================================================================

/// 2D max pooling that also returns the argmax of every window.
///
/// Windows of size `window` are placed every `stride` rows and columns.
/// The output has spatial size `ceil(in / stride)`; windows that overhang
/// the border only consider in-bounds cells. Ties within a window resolve
/// to the first cell in row-major order.
///
/// Each argmax value is the flat position of the maximum within its batch
/// image: `(y * width + x) * channels + c`.
///
/// # Arguments
/// * `input` - NHWC tensor of shape (batch, height, width, channels)
/// * `window` - Pooling window edge length (must be non-zero)
/// * `stride` - Step between window origins (must be non-zero)
///
/// # Returns
/// `(pooled, argmax)` tensors, both of shape
/// (batch, ceil(height / stride), ceil(width / stride), channels).
pub fn max_pool2d_with_argmax(
    input: &Tensor<f32>,
    window: usize,
    stride: usize,
) -> Result<(Tensor<f32>, Tensor<i64>)> {
    if window == 0 || stride == 0 {
        return Err(Error::invalid_window(window, stride));
    }

    let (batch, in_h, in_w, channels) = nhwc_dims(input.shape())?;

    let out_h = (in_h + stride - 1) / stride;
    let out_w = (in_w + stride - 1) / stride;
    let out_shape = [batch, out_h, out_w, channels];

    let data = input.to_vec();
    let out_numel = batch * out_h * out_w * channels;
    let mut pooled = Vec::with_capacity(out_numel);
    let mut argmax = Vec::with_capacity(out_numel);

    for n in 0..batch {
        let base = n * in_h * in_w * channels;
        for oy in 0..out_h {
            let y0 = oy * stride;
            let y1 = (y0 + window).min(in_h);
            for ox in 0..out_w {
                let x0 = ox * stride;
                let x1 = (x0 + window).min(in_w);
                for ch in 0..channels {
                    // The window origin is always in bounds, so it seeds the
                    // scan; strict comparison keeps the first maximum on ties
                    let mut best_idx = (y0 * in_w + x0) * channels + ch;
                    let mut best = data[base + best_idx];
                    for y in y0..y1 {
                        for x in x0..x1 {
                            let idx = (y * in_w + x) * channels + ch;
                            let value = data[base + idx];
                            if value > best {
                                best = value;
                                best_idx = idx;
                            }
                        }
                    }
                    pooled.push(best);
                    argmax.push(best_idx as i64);
                }
            }
        }
    }

    Ok((
        Tensor::from_vec(pooled, &out_shape)?,
        Tensor::from_vec(argmax, &out_shape)?,
    ))
}

// =============================================================================
// Max Unpooling
// =============================================================================

/// Reverses max pooling by scattering values to their recorded positions.
///
/// The output is zero-initialized and each pooled value is written to the
/// flat position its argmax entry names, interpreted within the batch image
/// of the target shape. When `target_shape` is `None` the output is
/// (batch, height * stride, width * stride, channels).
///
/// Every argmax entry must land inside the target image and no two entries
/// in the same batch may collide; a collision means the argmax did not come
/// from a non-overlapping pooling pass and is reported rather than resolved.
///
/// # Arguments
/// * `pooled` - NHWC tensor of pooled values
/// * `argmax` - Positions recorded by [`max_pool2d_with_argmax`], same shape
/// * `stride` - Upsampling factor used when deriving the target shape
/// * `target_shape` - Explicit 4D output shape, or `None` to derive it
///
/// # Returns
/// NHWC tensor of the target shape, zero except at scattered positions.
pub fn max_unpool2d(
    pooled: &Tensor<f32>,
    argmax: &Tensor<i64>,
    stride: usize,
    target_shape: Option<&[usize]>,
) -> Result<Tensor<f32>> {
    if stride == 0 {
        return Err(Error::invalid_window(stride, stride));
    }
    if pooled.shape() != argmax.shape() {
        return Err(Error::shape_mismatch(pooled.shape(), argmax.shape()));
    }

    let (batch, in_h, in_w, channels) = nhwc_dims(pooled.shape())?;

    let derived = [batch, in_h * stride, in_w * stride, channels];
    let target: Vec<usize> = match target_shape {
        Some(shape) => shape.to_vec(),
        None => derived.to_vec(),
    };

    if target.len() != 4 || target[0] != batch || target[3] != channels {
        return Err(Error::shape_mismatch(&derived, &target));
    }

    let plane = target[1] * target[2] * target[3];
    let mut output = vec![0.0f32; batch * plane];
    let mut written = vec![false; batch * plane];

    let values = pooled.to_vec();
    let indices = argmax.to_vec();
    let per_batch = in_h * in_w * channels;

    for n in 0..batch {
        let base = n * per_batch;
        let out_base = n * plane;
        for i in 0..per_batch {
            let raw = indices[base + i];

            if raw < 0 {
                return Err(Error::shape_mismatch(&derived, &target));
            }
            let flat = raw as usize;
            if flat >= plane {
                // Report the smallest image that would contain this position
                let needed_rows = flat / (target[2] * target[3]) + 1;
                return Err(Error::shape_mismatch(
                    &[batch, needed_rows, target[2], target[3]],
                    &target,
                ));
            }

            if written[out_base + flat] {
                return Err(Error::invalid_operation(format!(
                    "duplicate argmax position {flat} in batch {n}: unpool requires unique positions"
                )));
            }
            written[out_base + flat] = true;
            output[out_base + flat] = values[base + i];
        }
    }

    Tensor::from_vec(output, &target)
}

// =============================================================================
// Activations
// =============================================================================

/// Applies the rectified linear unit element-wise.
#[must_use]
pub fn relu(input: &Tensor<f32>) -> Tensor<f32> {
    input.relu()
}

/// Applies the logistic sigmoid element-wise.
#[must_use]
pub fn sigmoid(input: &Tensor<f32>) -> Tensor<f32> {
    input.sigmoid()
}

// =============================================================================
// Loss Functions
// =============================================================================

/// Mean squared error between a prediction and a target.
///
/// # Returns
/// A scalar tensor, or an error if the shapes differ.
pub fn mse_loss(prediction: &Tensor<f32>, target: &Tensor<f32>) -> Result<Tensor<f32>> {
    if prediction.shape() != target.shape() {
        return Err(Error::shape_mismatch(prediction.shape(), target.shape()));
    }

    let diff = prediction.sub(target)?;
    diff.mul(&diff)?.mean()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use retinaml_core::Error;
    use std::collections::HashSet;

    fn grid_4x4() -> Tensor<f32> {
        Tensor::from_vec(
            vec![
                1.0, 3.0, 2.0, 4.0, //
                5.0, 6.0, 7.0, 8.0, //
                9.0, 1.0, 2.0, 3.0, //
                4.0, 5.0, 6.0, 7.0,
            ],
            &[1, 4, 4, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_pool_matches_hand_computed_grid() {
        let (pooled, argmax) = max_pool2d_with_argmax(&grid_4x4(), 2, 2).unwrap();

        assert_eq!(pooled.shape(), &[1, 2, 2, 1]);
        assert_eq!(pooled.to_vec(), vec![6.0, 8.0, 9.0, 7.0]);

        // Maxima sit at (1,1), (1,3), (2,0), (3,3) in the 4x4 image
        assert_eq!(argmax.to_vec(), vec![5, 7, 8, 15]);
    }

    #[test]
    fn test_pool_output_shape_law() {
        // Output spatial size is ceil(input / stride)
        let cases = [
            (4, 4, 2, 2, [2, 2]),
            (3, 3, 2, 2, [2, 2]),
            (5, 4, 2, 2, [3, 2]),
            (6, 6, 3, 3, [2, 2]),
            (1, 1, 2, 2, [1, 1]),
            (7, 5, 3, 2, [4, 3]),
        ];

        for (h, w, window, stride, expected) in cases {
            let input = Tensor::<f32>::zeros(&[2, h, w, 3]);
            let (pooled, argmax) = max_pool2d_with_argmax(&input, window, stride).unwrap();
            assert_eq!(pooled.shape(), &[2, expected[0], expected[1], 3]);
            assert_eq!(argmax.shape(), pooled.shape());
        }
    }

    #[test]
    fn test_pool_boundary_window_single_cell() {
        let input = Tensor::from_vec(
            vec![
                1.0, 2.0, 3.0, //
                4.0, 5.0, 6.0, //
                7.0, 8.0, 9.0,
            ],
            &[1, 3, 3, 1],
        )
        .unwrap();

        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();
        assert_eq!(pooled.shape(), &[1, 2, 2, 1]);

        // Bottom-right window covers only the in-bounds cell (2,2)
        assert_eq!(pooled.get(&[0, 1, 1, 0]).unwrap(), 9.0);
        assert_eq!(argmax.get(&[0, 1, 1, 0]).unwrap(), 8);
    }

    #[test]
    fn test_pool_tie_breaks_to_first_row_major() {
        let input = Tensor::from_vec(vec![5.0; 4], &[1, 2, 2, 1]).unwrap();
        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();
        assert_eq!(pooled.to_vec(), vec![5.0]);
        assert_eq!(argmax.to_vec(), vec![0]);
    }

    #[test]
    fn test_pool_channels_tracked_independently() {
        // Two channels with maxima in opposite corners
        let input = Tensor::from_vec(
            vec![
                9.0, 0.0, //
                0.0, 1.0, //
                0.0, 2.0, //
                1.0, 8.0,
            ],
            &[1, 2, 2, 2],
        )
        .unwrap();

        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();
        assert_eq!(pooled.to_vec(), vec![9.0, 8.0]);
        assert_eq!(argmax.to_vec(), vec![0, 7]);
    }

    #[test]
    fn test_pool_rejects_zero_window_or_stride() {
        let input = Tensor::<f32>::zeros(&[1, 4, 4, 1]);

        let err = max_pool2d_with_argmax(&input, 0, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidWindowConfig { window: 0, .. }));

        let err = max_pool2d_with_argmax(&input, 2, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidWindowConfig { stride: 0, .. }));
    }

    #[test]
    fn test_pool_rejects_non_4d_input() {
        let input = Tensor::<f32>::zeros(&[4, 4]);
        assert!(max_pool2d_with_argmax(&input, 2, 2).is_err());
    }

    #[test]
    fn test_pool_argmax_unique_per_batch() {
        let input = Tensor::<f32>::rand(&[2, 8, 8, 3]);
        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();

        let per_batch = pooled.numel() / 2;
        let indices = argmax.to_vec();
        for n in 0..2 {
            let unique: HashSet<i64> = indices[n * per_batch..(n + 1) * per_batch]
                .iter()
                .copied()
                .collect();
            assert_eq!(unique.len(), per_batch);
        }
    }

    #[test]
    fn test_unpool_round_trip() {
        let input = grid_4x4();
        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();
        let restored = max_unpool2d(&pooled, &argmax, 2, None).unwrap();

        assert_eq!(restored.shape(), input.shape());
        assert_eq!(
            restored.to_vec(),
            vec![
                0.0, 0.0, 0.0, 0.0, //
                0.0, 6.0, 0.0, 8.0, //
                9.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 7.0,
            ]
        );
    }

    #[test]
    fn test_unpool_batch_positions_stay_in_batch() {
        // Batch 0 peaks top-left, batch 1 peaks bottom-right
        let mut data = vec![0.0f32; 2 * 16];
        data[0] = 5.0;
        data[16 + 15] = 7.0;
        let input = Tensor::from_vec(data, &[2, 4, 4, 1]).unwrap();

        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();
        let restored = max_unpool2d(&pooled, &argmax, 2, None).unwrap();

        assert_eq!(restored.get(&[0, 0, 0, 0]).unwrap(), 5.0);
        assert_eq!(restored.get(&[1, 3, 3, 0]).unwrap(), 7.0);
        assert_eq!(restored.get(&[1, 0, 0, 0]).unwrap(), 0.0);
    }

    #[test]
    fn test_pool_unpool_idempotence() {
        let input = Tensor::<f32>::rand(&[1, 6, 6, 2]);
        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();

        let restored = max_unpool2d(&pooled, &argmax, 2, None).unwrap();
        let (pooled2, argmax2) = max_pool2d_with_argmax(&restored, 2, 2).unwrap();

        assert_eq!(pooled.to_vec(), pooled2.to_vec());
        assert_eq!(argmax.to_vec(), argmax2.to_vec());
    }

    #[test]
    fn test_unpool_derives_target_shape() {
        let pooled = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 2, 2, 1]).unwrap();
        let argmax = Tensor::from_vec(vec![0i64, 3, 8, 11], &[1, 2, 2, 1]).unwrap();

        let out = max_unpool2d(&pooled, &argmax, 2, None).unwrap();
        assert_eq!(out.shape(), &[1, 4, 4, 1]);
    }

    #[test]
    fn test_unpool_explicit_target_shape() {
        // Odd input pooled to 2x2; explicit 3x3 target restores the extent
        let input = Tensor::from_vec(
            vec![
                1.0, 2.0, 3.0, //
                4.0, 5.0, 6.0, //
                7.0, 8.0, 9.0,
            ],
            &[1, 3, 3, 1],
        )
        .unwrap();
        let (pooled, argmax) = max_pool2d_with_argmax(&input, 2, 2).unwrap();

        let restored = max_unpool2d(&pooled, &argmax, 2, Some(&[1, 3, 3, 1])).unwrap();
        assert_eq!(restored.shape(), &[1, 3, 3, 1]);
        assert_eq!(restored.get(&[0, 2, 2, 0]).unwrap(), 9.0);
    }

    #[test]
    fn test_unpool_rejects_mismatched_argmax_shape() {
        let pooled = Tensor::<f32>::zeros(&[1, 2, 2, 1]);
        let argmax = Tensor::<i64>::zeros(&[1, 2, 1, 1]);
        let err = max_unpool2d(&pooled, &argmax, 2, None).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_unpool_rejects_out_of_range_position() {
        let pooled = Tensor::from_vec(vec![1.0], &[1, 1, 1, 1]).unwrap();
        let argmax = Tensor::from_vec(vec![99i64], &[1, 1, 1, 1]).unwrap();

        let err = max_unpool2d(&pooled, &argmax, 2, None).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_unpool_rejects_negative_position() {
        let pooled = Tensor::from_vec(vec![1.0], &[1, 1, 1, 1]).unwrap();
        let argmax = Tensor::from_vec(vec![-1i64], &[1, 1, 1, 1]).unwrap();
        assert!(max_unpool2d(&pooled, &argmax, 2, None).is_err());
    }

    #[test]
    fn test_unpool_rejects_bad_target_batch_or_channels() {
        let pooled = Tensor::<f32>::zeros(&[2, 2, 2, 3]);
        let argmax = Tensor::<i64>::zeros(&[2, 2, 2, 3]);

        assert!(max_unpool2d(&pooled, &argmax, 2, Some(&[1, 4, 4, 3])).is_err());
        assert!(max_unpool2d(&pooled, &argmax, 2, Some(&[2, 4, 4, 1])).is_err());
        assert!(max_unpool2d(&pooled, &argmax, 2, Some(&[2, 4, 4])).is_err());
    }

    #[test]
    fn test_unpool_rejects_duplicate_positions() {
        let pooled = Tensor::from_vec(vec![1.0, 2.0], &[1, 1, 2, 1]).unwrap();
        let argmax = Tensor::from_vec(vec![3i64, 3], &[1, 1, 2, 1]).unwrap();

        let err = max_unpool2d(&pooled, &argmax, 2, None).unwrap_err();
        assert!(matches!(err, Error::InvalidOperation { .. }));
    }

    #[test]
    fn test_unpool_detects_collisions_from_overlapping_pool() {
        // Window 3 with stride 2 overlaps, so one cell can win twice
        let input = Tensor::from_vec(
            vec![
                1.0, 2.0, 3.0, //
                4.0, 5.0, 6.0, //
                7.0, 8.0, 9.0,
            ],
            &[1, 3, 3, 1],
        )
        .unwrap();

        let (pooled, argmax) = max_pool2d_with_argmax(&input, 3, 2).unwrap();
        assert!(max_unpool2d(&pooled, &argmax, 2, Some(&[1, 3, 3, 1])).is_err());
    }

    #[test]
    fn test_unpool_rejects_zero_stride() {
        let pooled = Tensor::<f32>::zeros(&[1, 2, 2, 1]);
        let argmax = Tensor::<i64>::zeros(&[1, 2, 2, 1]);
        let err = max_unpool2d(&pooled, &argmax, 0, None).unwrap_err();
        assert!(matches!(err, Error::InvalidWindowConfig { .. }));
    }

    #[test]
    fn test_mse_loss() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::from_vec(vec![1.0, 2.0, 3.0, 2.0], &[2, 2]).unwrap();

        let loss = mse_loss(&a, &b).unwrap().item().unwrap();
        assert!((loss - 1.0).abs() < 1e-6);

        let c = Tensor::<f32>::zeros(&[4]);
        assert!(mse_loss(&a, &c).is_err());
    }

    #[test]
    fn test_activations() {
        let x = Tensor::from_vec(vec![-1.0, 0.0, 2.0], &[3]).unwrap();
        assert_eq!(relu(&x).to_vec(), vec![0.0, 0.0, 2.0]);

        let s = sigmoid(&Tensor::from_vec(vec![0.0], &[1]).unwrap());
        assert!((s.get(&[0]).unwrap() - 0.5).abs() < 1e-6);
    }
}
