mod common;

use prism_core::buffer::{PixelBuffer, PixelFormat};
use prism_core::error::PrismError;

use common::{make_gradient_rgb, make_gray};

#[test]
fn test_new_rejects_wrong_length() {
    let err = PixelBuffer::new(4, 4, PixelFormat::Rgb8, vec![0; 47]).unwrap_err();
    match err {
        PrismError::InvalidBufferLength {
            width,
            height,
            channels,
            len,
        } => {
            assert_eq!((width, height, channels, len), (4, 4, 3, 47));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_buffer() {
    let empty = PixelBuffer::empty();
    assert!(empty.is_empty());
    assert_eq!(empty.pixel_count(), 0);
    assert_eq!(empty.pixel(0, 0), None);
    assert_eq!(PixelBuffer::default(), empty);
}

#[test]
fn test_zero_width_is_empty() {
    let buf = PixelBuffer::new(0, 5, PixelFormat::Gray8, Vec::new()).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn test_gray_pixel_is_replicated() {
    let buf = make_gray(4, 2);
    assert!(buf.is_grayscale());
    assert_eq!(buf.pixel(1, 1), Some([5, 5, 5]));
}

#[test]
fn test_rgb_pixel_and_row() {
    let buf = make_gradient_rgb(3, 2);
    assert!(!buf.is_grayscale());
    assert_eq!(buf.stride(), 9);
    assert_eq!(buf.pixel(2, 1), Some([2, 1, 3]));
    assert_eq!(buf.row(1), &[0, 1, 1, 1, 1, 2, 2, 1, 3]);
    assert_eq!(buf.pixel(3, 0), None);
}

#[test]
fn test_filled() {
    let buf = PixelBuffer::filled(2, 3, PixelFormat::Rgb8, 192);
    assert_eq!(buf.data().len(), 18);
    assert!(buf.data().iter().all(|&v| v == 192));
}

#[test]
fn test_pixel_format_display() {
    assert_eq!(PixelFormat::Gray8.to_string(), "Gray 8-bit");
    assert_eq!(PixelFormat::Rgb8.to_string(), "RGB 8-bit");
}
