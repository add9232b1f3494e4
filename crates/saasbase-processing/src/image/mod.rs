mod resize;
mod transformer;

pub use resize::ImageResize;
pub use transformer::{ImageTransform, ImageTransformer, TransformedImage};
