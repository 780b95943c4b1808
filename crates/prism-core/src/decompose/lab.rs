//! sRGB to CIE L*a*b* conversion and the L*, a*, b* plane split.
//!
//! The pipeline is: inverse sRGB gamma -> linear RGB -> XYZ (D65) ->
//! normalise by the D65 white point -> L*a*b*. The 8-bit quantisation used
//! for display is lossy and not meant to be inverted.

use crate::buffer::PixelBuffer;
use crate::consts::{
    LAB_EPSILON, SRGB_DECODE_THRESHOLD, SRGB_TO_XYZ, WHITEPOINT_X, WHITEPOINT_Y, WHITEPOINT_Z,
};

use super::split_planes;

/// A CIE L*a*b* color. L in [0, 100], a and b roughly in [-128, 128].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Inverse sRGB gamma: encoded value in [0, 1] to linear light.
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= SRGB_DECODE_THRESHOLD {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear sRGB to CIE XYZ under D65.
#[inline]
pub fn linear_rgb_to_xyz(r: f64, g: f64, b: f64) -> [f64; 3] {
    let m = &SRGB_TO_XYZ;
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t >= LAB_EPSILON {
        t.cbrt()
    } else {
        (841.0 / 108.0) * t + 4.0 / 29.0
    }
}

/// CIE XYZ to L*a*b*, relative to the D65 white point.
#[inline]
pub fn xyz_to_lab(xyz: [f64; 3]) -> Lab {
    let fx = lab_f(xyz[0] / WHITEPOINT_X);
    let fy = lab_f(xyz[1] / WHITEPOINT_Y);
    let fz = lab_f(xyz[2] / WHITEPOINT_Z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert one 8-bit sRGB pixel to L*a*b*.
pub fn srgb8_to_lab(rgb: [u8; 3]) -> Lab {
    let [r, g, b] = rgb.map(|c| srgb_to_linear(c as f64 / 255.0));
    xyz_to_lab(linear_rgb_to_xyz(r, g, b))
}

/// Display quantisation: L scaled to [0, 255], a and b offset by 128.
///
/// Rounds half to even and saturates to the u8 range.
pub fn quantize_lab(lab: Lab) -> [u8; 3] {
    [
        saturate_u8(lab.l * 255.0 / 100.0),
        saturate_u8(lab.a + 128.0),
        saturate_u8(lab.b + 128.0),
    ]
}

#[inline]
fn saturate_u8(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Split a color image into quantised L*, a* and b* planes.
///
/// Uses the same plane layout as [`super::split_rgb`]. Gray input is
/// returned unchanged.
pub fn split_lab(image: &PixelBuffer) -> PixelBuffer {
    let linear: [f64; 256] = std::array::from_fn(|i| srgb_to_linear(i as f64 / 255.0));
    split_planes(image, |[r, g, b]| {
        let xyz = linear_rgb_to_xyz(linear[r as usize], linear[g as usize], linear[b as usize]);
        quantize_lab(xyz_to_lab(xyz))
    })
}
