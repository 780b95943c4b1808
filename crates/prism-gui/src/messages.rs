use std::path::PathBuf;

use prism_core::buffer::PixelBuffer;
use prism_core::io::load_image;

/// Results sent back to the UI thread from file-dialog threads.
pub enum AppMessage {
    ImageLoaded { path: PathBuf, image: PixelBuffer },
    ImageSaved { path: PathBuf },
    Error { message: String },
}

impl AppMessage {
    /// Decode `path`, blocking the calling thread.
    pub fn load(path: PathBuf) -> Self {
        match load_image(&path) {
            Ok(image) => Self::ImageLoaded { path, image },
            Err(e) => Self::Error {
                message: format!("Failed to open {}: {e}", path.display()),
            },
        }
    }
}
