//! Neural Network Layers
//!
//! Contains the layer implementations used by the denoising models.
//! All spatial layers operate on NHWC tensors.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod conv;
pub mod linear;
pub mod norm;
pub mod pooling;
pub mod shape;

// Re-exports
pub use conv::{Conv2d, ConvTranspose2d, Padding};
pub use linear::Linear;
pub use norm::BatchNorm2d;
pub use pooling::{MaxPool2d, MaxPoolWithArgmax2d, MaxUnpool2d};
pub use shape::{Flatten, Reshape};
