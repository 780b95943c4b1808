use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrismError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error(
        "Pixel storage of {len} bytes does not match {width}x{height} with {channels} channel(s)"
    )]
    InvalidBufferLength {
        width: u32,
        height: u32,
        channels: usize,
        len: usize,
    },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PrismError>;
