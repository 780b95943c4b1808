use crate::buffer::PixelBuffer;

use super::split_planes;

/// Split a color image into its R, G and B planes, copied byte for byte.
///
/// Gray input is returned unchanged.
pub fn split_rgb(image: &PixelBuffer) -> PixelBuffer {
    split_planes(image, |px| px)
}
