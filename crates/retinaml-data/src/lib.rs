//! retinaml-data - Data Loading Utilities
//!
//! Provides the data pipeline for the denoising models:
//! - Dataset trait for defining data sources
//! - Transforms for corrupting clean images with Gaussian noise
//! - `DataLoader` for batched iteration with parallel loading
//! - Samplers for controlling data access patterns
//!
//! # Example
//!
//! ```ignore
//! use retinaml_data::prelude::*;
//!
//! // Pair precomputed noisy images with their clean originals
//! let dataset = TensorDataset::new(noisy_images, clean_images);
//!
//! let loader = DataLoader::new(dataset, 32)
//!     .shuffle(true)
//!     .num_workers(4);
//!
//! for batch in loader.iter() {
//!     // batch.inputs is [B, H, W, C] noisy, batch.targets is clean
//! }
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::single_match_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::explicit_iter_loop)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::iter_without_into_iter)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dataloader;
pub mod dataset;
pub mod sampler;
pub mod transforms;

// =============================================================================
// Re-exports
// =============================================================================

pub use dataloader::{Batch, DataLoader, DataLoaderIter};
pub use dataset::{Dataset, MapDataset, SubsetDataset, TensorDataset};
pub use sampler::{RandomSampler, Sampler, SequentialSampler};
pub use transforms::{Clamp, Compose, GaussianNoise, Lambda, Scale, Transform};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for data loading.
pub mod prelude {
    pub use crate::{
        Batch, Clamp, Compose, DataLoader, DataLoaderIter, Dataset, GaussianNoise, Lambda,
        MapDataset, RandomSampler, Sampler, Scale, SequentialSampler, SubsetDataset,
        TensorDataset, Transform,
    };
    pub use retinaml_tensor::Tensor;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use retinaml_tensor::Tensor;

    #[test]
    fn test_denoising_pipeline() {
        // Corrupt a clean batch, pair it, and iterate NHWC batches
        let clean = Tensor::<f32>::rand(&[8, 4, 4, 3]);
        let corrupt = Compose::empty()
            .add(GaussianNoise::new(0.2))
            .add(Clamp::zero_one());
        let noisy = corrupt.apply(&clean);

        let dataset = TensorDataset::new(noisy, clean);
        let loader = DataLoader::new(dataset, 4);

        let batches: Vec<Batch> = loader.iter().collect();
        assert_eq!(batches.len(), 2);
        for batch in &batches {
            assert_eq!(batch.inputs.shape(), &[4, 4, 4, 3]);
            assert_eq!(batch.targets.shape(), &[4, 4, 4, 3]);
        }
    }

    #[test]
    fn test_on_the_fly_corruption() {
        let clean = Tensor::<f32>::rand(&[4, 4, 4, 3]);
        let base = TensorDataset::identity(clean);

        let noisy = MapDataset::new(base, |(x, y)| {
            let corrupted = Clamp::zero_one().apply(&GaussianNoise::new(0.2).apply(&x));
            (corrupted, y)
        });

        let (x, y) = noisy.get(0).unwrap();
        assert_eq!(x.shape(), y.shape());
        assert!(x.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
