//! Image transformer - decode, resize and encode in one call

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use saasbase_core::models::{OutputFormat, ResizeSpec};
use saasbase_core::ErrorMetadata;

use crate::error::ProcessingError;
use crate::image::resize::ImageResize;

/// JPEG quality used when the request does not set one.
const DEFAULT_JPEG_QUALITY: u8 = 80;

/// An encoded image ready to store or send
#[derive(Debug, Clone)]
pub struct TransformedImage {
    pub data: Bytes,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Applies a [`ResizeSpec`] to encoded image bytes.
///
/// A trait so callers can count or replace the work in tests.
pub trait ImageTransform: Send + Sync {
    fn transform(&self, data: &[u8], spec: &ResizeSpec)
        -> Result<TransformedImage, ProcessingError>;
}

/// Default transformer built on the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| ProcessingError::Decode(e.to_string()))
    }

    pub fn encode(
        img: &DynamicImage,
        format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<Bytes, ProcessingError> {
        let mut buffer = Vec::new();

        match format {
            OutputFormat::Png => {
                img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|e| ProcessingError::Encode(e.to_string()))?;
            }
            OutputFormat::Jpg => {
                let encoder = JpegEncoder::new_with_quality(
                    &mut buffer,
                    quality.unwrap_or(DEFAULT_JPEG_QUALITY),
                );
                DynamicImage::ImageRgb8(img.to_rgb8())
                    .write_with_encoder(encoder)
                    .map_err(|e| ProcessingError::Encode(e.to_string()))?;
            }
        }

        Ok(Bytes::from(buffer))
    }
}

impl ImageTransform for ImageTransformer {
    fn transform(
        &self,
        data: &[u8],
        spec: &ResizeSpec,
    ) -> Result<TransformedImage, ProcessingError> {
        let start = std::time::Instant::now();
        spec
            .check()
            .map_err(|e| ProcessingError::InvalidSpec(e.client_message()))?;
        let img = Self::decode(data)?;
        let (orig_width, orig_height) = img.dimensions();

        let resized = ImageResize::apply(&img, spec)?;
        let (width, height) = resized.dimensions();
        let format = spec.output_format();
        let encoded = Self::encode(&resized, format, spec.quality)?;

        tracing::debug!(
            sizing = %spec.sizing,
            orig_width,
            orig_height,
            width,
            height,
            output_bytes = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(TransformedImage {
            data: encoded,
            content_type: format.content_type(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use saasbase_core::models::Sizing;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_avatar_crop_outputs_png() {
        let result = ImageTransformer
            .transform(&png_bytes(640, 480), &ResizeSpec::avatar())
            .unwrap();
        assert_eq!(result.content_type, "image/png");
        assert_eq!((result.width, result.height), (200, 200));

        let decoded = image::load_from_memory(&result.data).unwrap();
        assert_eq!(decoded.dimensions(), (200, 200));
    }

    #[test]
    fn test_jpeg_output_with_quality() {
        let spec = ResizeSpec::new(Sizing::Width)
            .width(100)
            .format(OutputFormat::Jpg)
            .quality(60);
        let result = ImageTransformer.transform(&png_bytes(400, 300), &spec).unwrap();
        assert_eq!(result.content_type, "image/jpeg");
        assert_eq!(&result.data[..2], &[0xFF, 0xD8]);
        assert_eq!((result.width, result.height), (100, 75));
    }

    #[test]
    fn test_garbage_input_is_decode_error() {
        let err = ImageTransformer
            .transform(b"definitely not an image", &ResizeSpec::avatar())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Decode(_)));
    }

    #[test]
    fn test_oversized_request_is_rejected_before_decoding() {
        let spec = ResizeSpec::new(Sizing::Fill).width(u32::MAX).height(u32::MAX);
        let err = ImageTransformer
            .transform(&png_bytes(4, 4), &spec)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidSpec(_)));
    }
}
