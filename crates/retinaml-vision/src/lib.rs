//! Retinaml Vision - Image Denoising Datasets and Models
//!
//! This crate provides the vision layer of the RetinaML ML framework:
//!
//! - **Transforms**: Bilinear resizing and grayscale extraction
//! - **Datasets**: BSD500 directory loading and synthetic image splits
//! - **Models**: Four denoising autoencoder architectures
//!
//! # Example
//!
//! ```ignore
//! use retinaml_vision::prelude::*;
//!
//! // Generate train/val/test splits and corrupt them
//! let clean = SyntheticImages::small().load_splits()?;
//! let noisy = noisy_splits(&clean, 0.2);
//!
//! // Denoise with a convolutional autoencoder
//! let model = ConvAutoencoder::new(ConvAutoencoderConfig::default())?;
//! let restored = model.forward(&noisy.test)?;
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
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::ptr_arg)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_same_then_else)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unused_self)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::single_match_else)]
#![allow(clippy::fn_params_excessive_bools)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::format_push_string)]
#![allow(clippy::erasing_op)]
#![allow(clippy::type_repetition_in_bounds)]
#![allow(clippy::iter_without_into_iter)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::use_debug)]
#![allow(clippy::case_sensitive_file_extension_comparisons)]
#![allow(clippy::large_enum_variant)]
#![allow(clippy::panic)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::assigning_clones)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::explicit_iter_loop)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::only_used_in_recursion)]
#![allow(clippy::manual_clamp)]
#![allow(clippy::ref_option)]
#![allow(clippy::multiple_bound_locations)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::manual_assert)]
#![allow(clippy::unnecessary_debug_formatting)]

pub mod datasets;
pub mod models;
pub mod transforms;

// =============================================================================
// Re-exports
// =============================================================================

pub use transforms::{Resize, ToGrayscale};

pub use datasets::{
    noisy_splits, Bsd500, Bsd500Config, DatasetError, DatasetResult, ImageSplits, SplitImages,
    SyntheticImages,
};

pub use models::{
    ConvAutoencoder, ConvAutoencoderConfig, SegNet, SegNetConfig, SegNetStage, ShallowAutoencoder,
    ShallowConfig, UNet, UNetConfig,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for image denoising tasks.
pub mod prelude {
    pub use crate::{
        // Datasets
        noisy_splits,
        Bsd500,
        Bsd500Config,
        // Models
        ConvAutoencoder,
        ConvAutoencoderConfig,
        ImageSplits,
        // Transforms
        Resize,
        SegNet,
        SegNetConfig,
        SegNetStage,
        ShallowAutoencoder,
        ShallowConfig,
        SplitImages,
        SyntheticImages,
        ToGrayscale,
        UNet,
        UNetConfig,
    };

    // Re-export useful items from dependencies
    pub use retinaml_data::{Compose, DataLoader, Dataset, Transform};
    pub use retinaml_nn::Module;
    pub use retinaml_tensor::Tensor;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use retinaml_data::{Compose, DataLoader, TensorDataset, Transform};
    use retinaml_nn::{functional, Module};
    use retinaml_tensor::Tensor;

    #[test]
    fn test_synthetic_splits_with_noise() {
        let clean = SyntheticImages::small().load_splits().unwrap();
        let noisy = noisy_splits(&clean, 0.2);

        assert_eq!(noisy.train.shape(), clean.train.shape());
        assert_eq!(noisy.val.shape(), clean.val.shape());
        assert_eq!(noisy.test.shape(), clean.test.shape());
        assert!(noisy.train.to_vec().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_ne!(noisy.train.to_vec(), clean.train.to_vec());
    }

    #[test]
    fn test_resize_grayscale_pipeline() {
        let pipeline = Compose::new(vec![
            Box::new(Resize::new(16, 16)),
            Box::new(ToGrayscale::new()),
        ]);

        let image = Tensor::<f32>::rand(&[8, 8, 3]);
        let output = pipeline.apply(&image);

        assert_eq!(output.shape(), &[16, 16, 1]);
    }

    #[test]
    fn test_shallow_denoiser_on_noisy_batch() {
        let clean = SyntheticImages::small().load_splits().unwrap();
        let noisy = noisy_splits(&clean, 0.2);
        let (height, width, colors) = clean.image_shape();

        let model = ShallowAutoencoder::new(ShallowConfig {
            height,
            width,
            colors,
            latent_dim: 32,
        })
        .unwrap();

        let restored = model.forward(&noisy.test).unwrap();
        assert_eq!(restored.shape(), clean.test.shape());

        let loss = functional::mse_loss(&restored, &clean.test).unwrap();
        let value = loss.item().unwrap();
        assert!(value.is_finite());
        assert!(value >= 0.0);
    }

    #[test]
    fn test_dataloader_feeds_segnet() {
        let clean = SyntheticImages::small().load_splits().unwrap();
        let noisy = noisy_splits(&clean, 0.2);
        let (height, width, colors) = clean.image_shape();

        let mut model = SegNet::new(SegNetConfig {
            height,
            width,
            colors,
            stages: vec![SegNetStage::new(2, 1), SegNetStage::new(4, 1)],
            kernel_size: 3,
            pool_size: 2,
        })
        .unwrap();
        model.eval();

        let dataset = TensorDataset::new(noisy.train, clean.train);
        let loader = DataLoader::new(dataset, 4);

        let mut batches = 0;
        for batch in loader.iter().take(1) {
            let output = model.forward(&batch.inputs).unwrap();
            assert_eq!(output.shape(), batch.inputs.shape());
            assert_eq!(output.shape(), batch.targets.shape());
            batches += 1;
        }
        assert_eq!(batches, 1);
    }
}
