use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LARGE_IMAGE_THRESHOLD, DEFAULT_WHEEL_NOTCH_ANGLE};
use crate::error::{PrismError, Result};

/// All tunables read by the viewer core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub decomposition: DecompositionConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
}

impl ViewerConfig {
    /// Reject values the viewer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.viewport.wheel_notch_angle <= 0 {
            return Err(PrismError::Config(format!(
                "viewport.wheel_notch_angle must be positive, got {}",
                self.viewport.wheel_notch_angle
            )));
        }
        if !self.viewport.line_width.is_finite() || self.viewport.line_width <= 0.0 {
            return Err(PrismError::Config(format!(
                "viewport.line_width must be a positive number, got {}",
                self.viewport.line_width
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Pixel count above which a split runs on a worker thread.
    pub large_image_threshold: u64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            large_image_threshold: DEFAULT_LARGE_IMAGE_THRESHOLD,
        }
    }
}

impl DecompositionConfig {
    pub fn is_large(&self, pixel_count: u64) -> bool {
        pixel_count > self.large_image_threshold
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Bilinear resampling instead of nearest neighbour.
    pub smooth_transform: bool,
    /// Wheel angle delta that counts as one notch.
    pub wheel_notch_angle: i32,
    pub background: [u8; 3],
    pub line_color: [u8; 3],
    /// Measurement line width in surface pixels.
    pub line_width: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            smooth_transform: false,
            wheel_notch_angle: DEFAULT_WHEEL_NOTCH_ANGLE,
            background: [255, 255, 255],
            line_color: [0, 255, 0],
            line_width: 2.0,
        }
    }
}
