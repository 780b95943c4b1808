mod common;

use prism_core::buffer::PixelFormat;
use prism_core::error::PrismError;
use prism_core::io::{load_image, save_image};

use common::{make_gradient_rgb, make_gray};

#[test]
fn test_png_roundtrip_rgb() {
    let img = make_gradient_rgb(6, 4);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.png");

    save_image(&img, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded, img);
}

#[test]
fn test_png_roundtrip_gray() {
    let img = make_gray(5, 3);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");

    save_image(&img, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.format(), PixelFormat::Gray8);
    assert_eq!(loaded, img);
}

#[test]
fn test_save_empty_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.png");
    let err = save_image(&prism_core::buffer::PixelBuffer::empty(), &path).unwrap_err();
    assert!(matches!(err, PrismError::UnsupportedFormat(_)));
    assert!(!path.exists());
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_image(&dir.path().join("missing.png")).is_err());
}
