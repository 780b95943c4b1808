mod common;

use prism_core::decompose::{decompose, split_lab, split_rgb, DecomposeMode, SplitLayout};

use common::{gray_at, make_gradient_rgb, make_gray, make_solid_rgb};

// ---------------------------------------------------------------------------
// Layout selection
// ---------------------------------------------------------------------------

#[test]
fn test_layout_narrow_is_side_by_side() {
    assert_eq!(SplitLayout::for_size(3, 2), SplitLayout::SideBySide);
    assert_eq!(SplitLayout::for_size(100, 200), SplitLayout::SideBySide);
}

#[test]
fn test_layout_wide_is_stacked() {
    // w == 2h is the first stacked size.
    assert_eq!(SplitLayout::for_size(4, 2), SplitLayout::Stacked);
    assert_eq!(SplitLayout::for_size(640, 100), SplitLayout::Stacked);
}

#[test]
fn test_output_dimensions() {
    let side = split_rgb(&make_gradient_rgb(3, 2));
    assert_eq!((side.width(), side.height()), (9, 2));

    let stacked = split_rgb(&make_gradient_rgb(4, 2));
    assert_eq!((stacked.width(), stacked.height()), (4, 6));

    for (w, h) in [(1, 1), (7, 3), (5, 9), (16, 8)] {
        let out = split_lab(&make_gradient_rgb(w, h));
        assert_eq!(out.pixel_count(), 3 * w as u64 * h as u64);
        assert!(out.is_grayscale());
    }
}

// ---------------------------------------------------------------------------
// RGB split
// ---------------------------------------------------------------------------

#[test]
fn test_split_rgb_side_by_side_planes() {
    let img = make_gradient_rgb(2, 2);
    let out = split_rgb(&img);
    assert_eq!((out.width(), out.height()), (6, 2));
    for y in 0..2 {
        for x in 0..2 {
            let [r, g, b] = img.pixel(x, y).unwrap();
            assert_eq!(gray_at(&out, x, y), r);
            assert_eq!(gray_at(&out, 2 + x, y), g);
            assert_eq!(gray_at(&out, 4 + x, y), b);
        }
    }
}

#[test]
fn test_split_rgb_stacked_planes() {
    let img = make_gradient_rgb(4, 1);
    let out = split_rgb(&img);
    assert_eq!((out.width(), out.height()), (4, 3));
    for x in 0..4 {
        let [r, g, b] = img.pixel(x, 0).unwrap();
        assert_eq!(gray_at(&out, x, 0), r);
        assert_eq!(gray_at(&out, x, 1), g);
        assert_eq!(gray_at(&out, x, 2), b);
    }
}

#[test]
fn test_split_rgb_parallel_path_matches_pixels() {
    // Above the rayon threshold, stacked layout.
    let img = make_gradient_rgb(512, 256);
    let out = split_rgb(&img);
    assert_eq!((out.width(), out.height()), (512, 768));
    for &(x, y) in &[(0, 0), (511, 0), (300, 255), (17, 128)] {
        let [r, g, b] = img.pixel(x, y).unwrap();
        assert_eq!(gray_at(&out, x, y), r);
        assert_eq!(gray_at(&out, x, 256 + y), g);
        assert_eq!(gray_at(&out, x, 512 + y), b);
    }
}

#[test]
fn test_split_rgb_parallel_side_by_side() {
    let img = make_gradient_rgb(200, 400);
    let out = split_rgb(&img);
    assert_eq!((out.width(), out.height()), (600, 400));
    let [r, g, b] = img.pixel(199, 399).unwrap();
    assert_eq!(gray_at(&out, 199, 399), r);
    assert_eq!(gray_at(&out, 399, 399), g);
    assert_eq!(gray_at(&out, 599, 399), b);
}

#[test]
fn test_gray_input_is_identity() {
    let gray = make_gray(5, 3);
    assert_eq!(split_rgb(&gray), gray);
    assert_eq!(split_lab(&gray), gray);
}

#[test]
fn test_empty_input_is_identity() {
    let empty = prism_core::buffer::PixelBuffer::empty();
    assert!(split_rgb(&empty).is_empty());
    assert!(split_lab(&empty).is_empty());
}

#[test]
fn test_decompose_dispatches_on_mode() {
    let img = make_solid_rgb(3, 3, [10, 20, 30]);
    assert_eq!(decompose(&img, DecomposeMode::Rgb), split_rgb(&img));
    assert_eq!(decompose(&img, DecomposeMode::Lab), split_lab(&img));
}

#[test]
fn test_decompose_mode_display_and_default() {
    assert_eq!(DecomposeMode::default(), DecomposeMode::Rgb);
    assert_eq!(DecomposeMode::Rgb.to_string(), "R,G,B channels");
    assert_eq!(DecomposeMode::Lab.to_string(), "L*,a*,b* channels");
}
