use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// A solid-colour PNG of the given size.
pub fn create_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([12, 120, 80])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    out
}
