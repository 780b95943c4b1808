#![allow(dead_code)]

use prism_core::buffer::{PixelBuffer, PixelFormat};

/// RGB image where every pixel is `rgb`.
pub fn make_solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
    let data = rgb
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 3)
        .collect();
    PixelBuffer::new(width, height, PixelFormat::Rgb8, data).unwrap()
}

/// RGB image whose pixel (x, y) is `(x, y, x + y)` truncated to u8.
pub fn make_gradient_rgb(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            data.push(x as u8);
            data.push(y as u8);
            data.push((x + y) as u8);
        }
    }
    PixelBuffer::new(width, height, PixelFormat::Rgb8, data).unwrap()
}

/// Gray image whose pixel (x, y) is `x + y * width` truncated to u8.
pub fn make_gray(width: u32, height: u32) -> PixelBuffer {
    let data = (0..width as usize * height as usize)
        .map(|i| i as u8)
        .collect();
    PixelBuffer::new(width, height, PixelFormat::Gray8, data).unwrap()
}

/// Gray value of pixel (x, y) in a single-channel buffer.
pub fn gray_at(buffer: &PixelBuffer, x: u32, y: u32) -> u8 {
    buffer.pixel(x, y).unwrap()[0]
}
