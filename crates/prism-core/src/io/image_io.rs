use std::path::Path;

use image::{ColorType, DynamicImage, GrayImage, RgbImage};

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::error::{PrismError, Result};

/// Convert a decoded image into a [`PixelBuffer`].
///
/// Luma images (with or without alpha, any depth) become `Gray8`,
/// everything else is flattened to `Rgb8`.
pub fn from_dynamic_image(img: DynamicImage) -> PixelBuffer {
    let (width, height) = (img.width(), img.height());
    match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            PixelBuffer::from_sized(width, height, PixelFormat::Gray8, img.into_luma8().into_raw())
        }
        _ => PixelBuffer::from_sized(width, height, PixelFormat::Rgb8, img.into_rgb8().into_raw()),
    }
}

/// Wrap a [`PixelBuffer`] for encoding.
pub fn to_dynamic_image(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let (w, h) = (buffer.width(), buffer.height());
    let data = buffer.data().to_vec();
    let img = match buffer.format() {
        PixelFormat::Gray8 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        PixelFormat::Rgb8 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
    };
    img.ok_or(PrismError::InvalidBufferLength {
        width: w,
        height: h,
        channels: buffer.channels(),
        len: buffer.data().len(),
    })
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)?;
    let buffer = from_dynamic_image(img);
    tracing::debug!(
        "Loaded {} ({}x{}, {})",
        path.display(),
        buffer.width(),
        buffer.height(),
        buffer.format()
    );
    Ok(buffer)
}

/// Encode a buffer, choosing the format from the file extension.
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if buffer.is_empty() {
        return Err(PrismError::UnsupportedFormat(
            "cannot save an empty image".into(),
        ));
    }
    to_dynamic_image(buffer)?.save(path)?;
    Ok(())
}
