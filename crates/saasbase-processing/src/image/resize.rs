use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use saasbase_core::models::{ResizeSpec, Sizing};

use crate::error::ProcessingError;

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target size for a single given dimension, the other following the
    /// source aspect ratio.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        width: Option<u32>,
        height: Option<u32>,
    ) -> (u32, u32) {
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f32 / orig_width as f32;
                let h = (w as f32 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f32 / orig_height as f32;
                let w = (h as f32 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Apply the sizing mode of `spec`. Cropping always keeps the center.
    pub fn apply(img: &DynamicImage, spec: &ResizeSpec) -> Result<DynamicImage, ProcessingError> {
        let (orig_width, orig_height) = img.dimensions();

        let resized = match spec.sizing {
            Sizing::ScaleToFit => match (spec.width, spec.height) {
                (None, None) => img.clone(),
                (Some(w), Some(h)) => {
                    let filter = Self::select_filter(orig_width, orig_height, w, h);
                    img.resize(w, h, filter)
                }
                (w, h) => Self::resize_exact(img, w, h),
            },
            Sizing::Width => {
                let w = spec.width.ok_or_else(|| {
                    ProcessingError::InvalidSpec("Width is required for sizing: width".to_string())
                })?;
                Self::resize_exact(img, Some(w), None)
            }
            Sizing::Height => {
                let h = spec.height.ok_or_else(|| {
                    ProcessingError::InvalidSpec(
                        "Height is required for sizing: height".to_string(),
                    )
                })?;
                Self::resize_exact(img, None, Some(h))
            }
            Sizing::Crop => {
                let (w, h) = Self::both(spec)?;
                let filter = Self::select_filter(orig_width, orig_height, w, h);
                img.resize_to_fill(w, h, filter)
            }
            Sizing::Fill => {
                let (w, h) = Self::both(spec)?;
                Self::resize_exact(img, Some(w), Some(h))
            }
        };

        Ok(resized)
    }

    fn resize_exact(img: &DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (w, h) = Self::calculate_dimensions(orig_width, orig_height, width, height);
        let filter = Self::select_filter(orig_width, orig_height, w, h);
        img.resize_exact(w, h, filter)
    }

    fn both(spec: &ResizeSpec) -> Result<(u32, u32), ProcessingError> {
        match (spec.width, spec.height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(ProcessingError::InvalidSpec(format!(
                "Width and height are required for sizing: {}",
                spec.sizing
            ))),
        }
    }
}
