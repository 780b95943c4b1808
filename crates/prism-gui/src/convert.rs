use prism_core::buffer::{PixelBuffer, PixelFormat};

/// Upload form of a [`PixelBuffer`]; gray planes become gray texels.
pub fn buffer_to_color_image(buffer: &PixelBuffer) -> egui::ColorImage {
    let size = [buffer.width() as usize, buffer.height() as usize];
    match buffer.format() {
        PixelFormat::Gray8 => egui::ColorImage::from_gray(size, buffer.data()),
        PixelFormat::Rgb8 => egui::ColorImage::from_rgb(size, buffer.data()),
    }
}

pub fn color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}
