mod common;

use approx::assert_abs_diff_eq;

use prism_core::decompose::lab::{quantize_lab, split_lab, srgb8_to_lab, srgb_to_linear, Lab};

use common::{gray_at, make_gradient_rgb, make_solid_rgb};

#[test]
fn test_srgb_to_linear_endpoints() {
    assert_abs_diff_eq!(srgb_to_linear(0.0), 0.0);
    assert_abs_diff_eq!(srgb_to_linear(1.0), 1.0, epsilon = 1e-12);
    // Linear segment below the threshold.
    assert_abs_diff_eq!(srgb_to_linear(0.04), 0.04 / 12.92, epsilon = 1e-12);
}

#[test]
fn test_white_is_neutral() {
    let lab = srgb8_to_lab([255, 255, 255]);
    assert_abs_diff_eq!(lab.l, 100.0, epsilon = 0.01);
    assert_abs_diff_eq!(lab.a, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(lab.b, 0.0, epsilon = 0.05);
    assert_eq!(quantize_lab(lab), [255, 128, 128]);
}

#[test]
fn test_black_is_neutral() {
    let lab = srgb8_to_lab([0, 0, 0]);
    assert_abs_diff_eq!(lab.l, 0.0, epsilon = 1e-9);
    assert_eq!(quantize_lab(lab), [0, 128, 128]);
}

#[test]
fn test_pure_red() {
    let lab = srgb8_to_lab([255, 0, 0]);
    assert_abs_diff_eq!(lab.l, 53.24, epsilon = 0.1);
    assert_abs_diff_eq!(lab.a, 80.09, epsilon = 0.5);
    assert_abs_diff_eq!(lab.b, 67.20, epsilon = 0.5);
}

#[test]
fn test_quantize_saturates() {
    let q = quantize_lab(Lab {
        l: 120.0,
        a: -200.0,
        b: 200.0,
    });
    assert_eq!(q, [255, 0, 255]);
}

#[test]
fn test_split_lab_solid_white() {
    let out = split_lab(&make_solid_rgb(2, 3, [255, 255, 255]));
    assert_eq!((out.width(), out.height()), (6, 3));
    for y in 0..3 {
        for x in 0..2 {
            assert_eq!(gray_at(&out, x, y), 255);
            assert_eq!(gray_at(&out, 2 + x, y), 128);
            assert_eq!(gray_at(&out, 4 + x, y), 128);
        }
    }
}

#[test]
fn test_split_lab_matches_per_pixel_conversion() {
    let img = make_gradient_rgb(8, 2);
    let out = split_lab(&img);
    assert_eq!((out.width(), out.height()), (8, 6));
    for y in 0..2 {
        for x in 0..8 {
            let [l, a, b] = quantize_lab(srgb8_to_lab(img.pixel(x, y).unwrap()));
            assert_eq!(gray_at(&out, x, y), l);
            assert_eq!(gray_at(&out, x, 2 + y), a);
            assert_eq!(gray_at(&out, x, 4 + y), b);
        }
    }
}
