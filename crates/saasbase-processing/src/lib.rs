//! Image processing for saasbase
//!
//! Decodes an uploaded original, applies a [`ResizeSpec`] and encodes the
//! result. Everything here is synchronous and CPU bound; async callers run
//! it on a blocking thread.
//!
//! [`ResizeSpec`]: saasbase_core::models::ResizeSpec

pub mod error;
pub mod image;

pub use error::ProcessingError;
pub use crate::image::{ImageResize, ImageTransform, ImageTransformer, TransformedImage};
