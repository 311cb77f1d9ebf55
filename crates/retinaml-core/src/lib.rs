//! RetinaML Core - Foundation Layer for the RetinaML Framework
//!
//! This crate provides the core abstractions that underpin the RetinaML
//! image-restoration framework: error handling, the data type system, and
//! reference-counted memory storage shared by every tensor.
//!
//! # Key Features
//! - Unified error type with structured context
//! - Type-safe data type system (f32, f64, i32, i64, u8)
//! - Efficient memory storage with reference counting
//!
//! # Example
//! ```rust
//! use retinaml_core::Storage;
//!
//! let storage = Storage::<f32>::zeros(1024);
//! assert_eq!(storage.len(), 1024);
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
#![allow(clippy::items_after_statements)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unused_self)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::single_match_else)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::explicit_iter_loop)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::manual_assert)]

// =============================================================================
// Modules
// =============================================================================

pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use dtype::{DType, Float, Numeric, Scalar};
pub use error::{Error, Result};
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::dtype::{DType, Float, Numeric, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::storage::Storage;
}
