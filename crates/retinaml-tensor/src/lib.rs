//! RetinaML Tensor - N-Dimensional Array for Image Models
//!
//! This crate provides the core `Tensor` type that all RetinaML image
//! operations are built on. Tensors are multi-dimensional arrays with
//! automatic broadcasting and cheap memory sharing through views. Image
//! batches use the NHWC layout (batch, height, width, channels) throughout.
//!
//! # Key Features
//! - N-dimensional tensor with arbitrary shape
//! - Automatic broadcasting for element-wise operations
//! - Cheap views via shared, reference-counted storage
//! - NHWC helpers for image-shaped tensors
//! - Generic over data type (f32, f64, i32, etc.)
//!
//! # Example
//! ```rust
//! use retinaml_tensor::{ones, zeros, Tensor};
//!
//! let a = zeros::<f32>(&[2, 3]);
//! let b = ones::<f32>(&[2, 3]);
//!
//! let c = a.add(&b).unwrap();
//! let d = c.mul_scalar(2.0);
//!
//! assert_eq!(d.sum().item().unwrap(), 12.0);
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

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod shape;
pub mod tensor;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use creation::*;
pub use retinaml_core::{DType, Error, Result};
pub use shape::{Shape, Strides};
pub use tensor::Tensor;
pub use view::{cat, stack};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::shape::{Shape, Strides};
    pub use crate::tensor::Tensor;
    pub use crate::view::{cat, stack};
    pub use crate::{arange, full, ones, rand, randn, zeros};
    pub use retinaml_core::{DType, Error, Result};
}
