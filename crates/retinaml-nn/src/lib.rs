//! retinaml-nn - Neural Network Layers for Image Models
//!
//! Provides the layers, activations, and stateless operators used to build
//! the RetinaML denoising models. Layers operate on NHWC `f32` tensors and
//! return `Result`, so shape errors surface at the layer that caused them.
//!
//! # Key Components
//!
//! - **Module trait**: Core interface for all neural network modules
//! - **Sequential**: Container for chaining modules
//! - **Layers**: Linear, Conv2d, ConvTranspose2d, BatchNorm2d, pooling
//! - **Argmax pooling**: Max pool that records positions, and the unpool
//!   that scatters values back to them
//! - **Activations**: ReLU and Sigmoid, standalone or fused into layers
//! - **Initialization**: Glorot/Xavier schemes
//! - **Functional API**: Stateless operations
//!
//! # Example
//!
//! ```ignore
//! use retinaml_nn::prelude::*;
//!
//! // Build a convolutional encoder
//! let encoder = Sequential::new()
//!     .add(Conv2d::new(3, 64, 3).with_padding(Padding::Same).with_activation(Activation::Relu))
//!     .add(MaxPool2d::new(2));
//!
//! // Forward pass over an NHWC batch
//! let features = encoder.forward(&images)?;
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

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

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activation;
pub mod functional;
pub mod init;
pub mod layers;
pub mod module;
pub mod sequential;

// =============================================================================
// Re-exports
// =============================================================================

pub use module::Module;
pub use sequential::Sequential;

// Layer re-exports
pub use layers::{
    BatchNorm2d, Conv2d, ConvTranspose2d, Flatten, Linear, MaxPool2d, MaxPoolWithArgmax2d,
    MaxUnpool2d, Padding, Reshape,
};

// Activation re-exports
pub use activation::{Activation, ReLU, Sigmoid};

// Init re-exports
pub use init::{
    constant, glorot_normal, glorot_uniform, kaiming_normal, kaiming_uniform, normal, ones, randn,
    uniform_range, xavier_normal, xavier_uniform, zeros,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for neural network development.
pub mod prelude {
    pub use crate::{
        // Functional
        functional,
        // Activations
        Activation,
        BatchNorm2d,
        // Layers
        Conv2d,
        ConvTranspose2d,
        Flatten,
        Linear,
        MaxPool2d,
        MaxPoolWithArgmax2d,
        MaxUnpool2d,
        // Core traits and types
        Module,
        Padding,
        ReLU,
        Reshape,
        Sequential,
        Sigmoid,
    };
}

// =============================================================================
// Tests
// =============================================================================
