use crate::error::{PrismError, Result};

/// Channel layout of a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// One 8-bit gray plane.
    Gray8,
    /// Packed 8-bit R, G, B.
    Rgb8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gray8 => write!(f, "Gray 8-bit"),
            Self::Rgb8 => write!(f, "RGB 8-bit"),
        }
    }
}

/// An in-memory raster, immutable once built.
///
/// Rows are tightly packed: `data.len() == width * height * channels`.
/// A zero width or height denotes the empty buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(PrismError::InvalidBufferLength {
                width,
                height,
                channels: format.channels(),
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Wraps storage whose length the caller has already sized to match.
    pub(crate) fn from_sized(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * format.channels());
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// The null image. Every operation treats it as a no-op input.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::Gray8,
            data: Vec::new(),
        }
    }

    /// A buffer with every byte set to `value`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Self {
        let len = width as usize * height as usize * format.channels();
        Self {
            width,
            height,
            format,
            data: vec![value; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn is_grayscale(&self) -> bool {
        self.format == PixelFormat::Gray8
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// One scanline. Panics if `y` is out of range.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Color at `(x, y)`, gray replicated to all three channels.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.channels();
        Some(match self.format {
            PixelFormat::Gray8 => {
                let v = self.data[idx];
                [v, v, v]
            }
            PixelFormat::Rgb8 => [self.data[idx], self.data[idx + 1], self.data[idx + 2]],
        })
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
