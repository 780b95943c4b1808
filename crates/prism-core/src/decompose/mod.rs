//! Channel decomposition: turn a color image into one gray image holding
//! its three channel planes next to each other.
//!
//! Both operations are pure functions of their input and may run on any
//! thread.

pub mod lab;
pub mod rgb;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::consts::{PARALLEL_PIXEL_THRESHOLD, SPLIT_PLANE_COUNT};

pub use lab::split_lab;
pub use rgb::split_rgb;

/// Which channel decomposition to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecomposeMode {
    #[default]
    Rgb,
    Lab,
}

impl std::fmt::Display for DecomposeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb => write!(f, "R,G,B channels"),
            Self::Lab => write!(f, "L*,a*,b* channels"),
        }
    }
}

/// Arrangement of the three planes in a split image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitLayout {
    /// Planes placed left to right: output is 3W x H.
    SideBySide,
    /// Planes placed top to bottom: output is W x 3H.
    Stacked,
}

impl SplitLayout {
    /// Narrow images (`width < 2 * height`) go side by side, wide ones are stacked.
    pub fn for_size(width: u32, height: u32) -> Self {
        if (width as u64) < 2 * height as u64 {
            Self::SideBySide
        } else {
            Self::Stacked
        }
    }

    /// Output dimensions for a `width` x `height` source.
    pub fn output_size(self, width: u32, height: u32) -> (u32, u32) {
        let planes = SPLIT_PLANE_COUNT as u32;
        match self {
            Self::SideBySide => (width * planes, height),
            Self::Stacked => (width, height * planes),
        }
    }
}

/// Run the decomposition selected by `mode`.
pub fn decompose(image: &PixelBuffer, mode: DecomposeMode) -> PixelBuffer {
    match mode {
        DecomposeMode::Rgb => split_rgb(image),
        DecomposeMode::Lab => split_lab(image),
    }
}

/// Shared scanline driver for both decompositions.
///
/// `convert` maps one packed RGB pixel to the three plane values written
/// for it. Gray and empty inputs come back unchanged.
pub(crate) fn split_planes<F>(image: &PixelBuffer, convert: F) -> PixelBuffer
where
    F: Fn([u8; 3]) -> [u8; 3] + Sync,
{
    if image.is_empty() || image.is_grayscale() {
        return image.clone();
    }

    let w = image.width() as usize;
    let h = image.height() as usize;
    let src_stride = image.stride();
    let src = image.data();
    let layout = SplitLayout::for_size(image.width(), image.height());
    let (out_w, out_h) = layout.output_size(image.width(), image.height());
    let mut out = vec![0u8; w * h * SPLIT_PLANE_COUNT];
    let parallel = w * h >= PARALLEL_PIXEL_THRESHOLD;

    match layout {
        SplitLayout::SideBySide => {
            let dst_stride = w * SPLIT_PLANE_COUNT;
            if parallel {
                out.par_chunks_mut(dst_stride)
                    .zip(src.par_chunks(src_stride))
                    .for_each(|(dst, src_row)| fill_side_by_side(dst, src_row, w, &convert));
            } else {
                out.chunks_mut(dst_stride)
                    .zip(src.chunks(src_stride))
                    .for_each(|(dst, src_row)| fill_side_by_side(dst, src_row, w, &convert));
            }
        }
        SplitLayout::Stacked => {
            let (first, rest) = out.split_at_mut(w * h);
            let (second, third) = rest.split_at_mut(w * h);
            if parallel {
                first
                    .par_chunks_mut(w)
                    .zip(second.par_chunks_mut(w))
                    .zip(third.par_chunks_mut(w))
                    .zip(src.par_chunks(src_stride))
                    .for_each(|(((c0, c1), c2), src_row)| {
                        fill_planes(src_row, c0, c1, c2, &convert)
                    });
            } else {
                first
                    .chunks_mut(w)
                    .zip(second.chunks_mut(w))
                    .zip(third.chunks_mut(w))
                    .zip(src.chunks(src_stride))
                    .for_each(|(((c0, c1), c2), src_row)| {
                        fill_planes(src_row, c0, c1, c2, &convert)
                    });
            }
        }
    }

    PixelBuffer::from_sized(out_w, out_h, PixelFormat::Gray8, out)
}

fn fill_side_by_side<F>(dst: &mut [u8], src_row: &[u8], w: usize, convert: &F)
where
    F: Fn([u8; 3]) -> [u8; 3],
{
    let (c0, rest) = dst.split_at_mut(w);
    let (c1, c2) = rest.split_at_mut(w);
    fill_planes(src_row, c0, c1, c2, convert);
}

fn fill_planes<F>(src_row: &[u8], c0: &mut [u8], c1: &mut [u8], c2: &mut [u8], convert: &F)
where
    F: Fn([u8; 3]) -> [u8; 3],
{
    for (x, px) in src_row.chunks_exact(3).enumerate() {
        let [v0, v1, v2] = convert([px[0], px[1], px[2]]);
        c0[x] = v0;
        c1[x] = v1;
        c2[x] = v2;
    }
}
