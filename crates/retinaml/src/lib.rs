//! # RetinaML - Image-Denoising Autoencoders in Pure Rust
//!
//! RetinaML is a compact machine learning framework for image denoising. It
//! provides NHWC tensors, inference-capable neural network layers, data
//! loading with noise injection, and four denoising autoencoder
//! architectures evaluated side by side:
//!
//! ## Core Features
//!
//! - **Tensors**: N-dimensional arrays with broadcasting, views, matmul, reductions
//! - **Neural Networks**: Linear, Conv2d, `ConvTranspose2d`, `BatchNorm2d`, pooling
//!   with argmax, indexed unpooling, `Sequential` containers
//! - **Data Loading**: Dataset trait, `DataLoader` with parallel collation,
//!   Gaussian noise and clamp transforms
//! - **Vision**: BSD500 directory loading, deterministic synthetic images,
//!   bilinear resize, grayscale extraction
//! - **Models**: `ShallowAutoencoder`, `ConvAutoencoder`, `SegNet` (pooling-index
//!   reuse), `UNet` (skip concatenation)
//! - **Evaluation**: MSE/PSNR scoring, timed inference, model comparison tables
//!
//! # Quick Start
//!
//! ```ignore
//! use retinaml::prelude::*;
//! use retinaml::evaluate::{compare_models, print_comparison};
//!
//! // Build clean and corrupted splits
//! let clean = SyntheticImages::small().load_splits()?;
//! let noisy = noisy_splits(&clean, 0.2);
//!
//! // Construct the four architectures at the split resolution
//! let (height, width, colors) = clean.image_shape();
//! let shallow = ShallowAutoencoder::new(ShallowConfig { height, width, colors, latent_dim: 512 })?;
//! let unet = UNet::new(UNetConfig { height, width, colors, ..UNetConfig::default() })?;
//!
//! // Score them on the test split
//! let reports = compare_models(
//!     &[("shallow", &shallow), ("unet", &unet)],
//!     &noisy.test,
//!     &clean.test,
//! )?;
//! print_comparison(&reports);
//! ```
//!
//! # Feature Flags
//!
//! - `full` (default): All features enabled
//! - `core`: Core tensor functionality
//! - `nn`: Neural network layers
//! - `data`: Data loading utilities
//! - `vision`: Image datasets, transforms, and the denoising models
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

// =============================================================================
// Core Re-exports
// =============================================================================

#[cfg(feature = "core")]
pub use retinaml_core as core;

#[cfg(feature = "core")]
pub use retinaml_tensor as tensor;

// =============================================================================
// Neural Network Re-exports
// =============================================================================

#[cfg(feature = "nn")]
pub use retinaml_nn as nn;

// =============================================================================
// Data Re-exports
// =============================================================================

#[cfg(feature = "data")]
pub use retinaml_data as data;

// =============================================================================
// Domain-Specific Re-exports
// =============================================================================

#[cfg(feature = "vision")]
pub use retinaml_vision as vision;

// =============================================================================
// Evaluation Harness
// =============================================================================

pub mod evaluate;
pub use evaluate::{format_duration, print_comparison, DenoisingReport};

#[cfg(all(feature = "core", feature = "nn"))]
pub use evaluate::{compare_models, evaluate_model, mse, psnr};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for image denoising tasks.
///
/// This module re-exports the most commonly used types and traits from all
/// RetinaML subcrates, allowing you to get started quickly with:
///
/// ```ignore
/// use retinaml::prelude::*;
/// ```
pub mod prelude {
    // Core types
    #[cfg(feature = "core")]
    pub use retinaml_core::{DType, Error, Result};

    // Tensor operations
    #[cfg(feature = "core")]
    pub use retinaml_tensor::Tensor;

    // Neural network modules
    #[cfg(feature = "nn")]
    pub use retinaml_nn::{
        Activation, BatchNorm2d, Conv2d, ConvTranspose2d, Flatten, Linear, MaxPool2d,
        MaxPoolWithArgmax2d, MaxUnpool2d, Module, Padding, ReLU, Reshape, Sequential, Sigmoid,
    };

    // Data loading
    #[cfg(feature = "data")]
    pub use retinaml_data::{
        Clamp, Compose, DataLoader, Dataset, GaussianNoise, TensorDataset, Transform,
    };

    // Vision
    #[cfg(feature = "vision")]
    pub use retinaml_vision::{
        noisy_splits, Bsd500, Bsd500Config, ConvAutoencoder, ConvAutoencoderConfig, ImageSplits,
        Resize, SegNet, SegNetConfig, SegNetStage, ShallowAutoencoder, ShallowConfig, SplitImages,
        SyntheticImages, ToGrayscale, UNet, UNetConfig,
    };

    // Evaluation
    pub use crate::evaluate::{print_comparison, DenoisingReport};

    #[cfg(all(feature = "core", feature = "nn"))]
    pub use crate::evaluate::{compare_models, evaluate_model};
}

// =============================================================================
// Version Information
// =============================================================================

/// Returns the version of the RetinaML framework.
#[must_use] pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns a string describing the enabled features.
#[must_use] pub fn features() -> String {
    let mut features = Vec::new();

    #[cfg(feature = "core")]
    features.push("core");

    #[cfg(feature = "nn")]
    features.push("nn");

    #[cfg(feature = "data")]
    features.push("data");

    #[cfg(feature = "vision")]
    features.push("vision");

    if features.is_empty() {
        "none".to_string()
    } else {
        features.join(", ")
    }
}

// =============================================================================
// Tests
// =============================================================================
