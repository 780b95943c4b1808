mod common;

use prism_core::buffer::{PixelBuffer, PixelFormat};
use prism_core::geometry::{Point, Rect, Size};
use prism_core::viewport::{
    rasterize, CanvasSurface, DrawItem, Modifiers, PointerButton, RasterSurface, SamplingFilter,
    ViewportController,
};

use common::{make_gradient_rgb, make_solid_rgb};

const WHITE: [u8; 3] = [255, 255, 255];
const GREEN: [u8; 3] = [0, 255, 0];

fn make_ramp() -> PixelBuffer {
    PixelBuffer::new(2, 1, PixelFormat::Gray8, vec![0, 255]).unwrap()
}

fn row_values(frame: &PixelBuffer, y: u32) -> Vec<u8> {
    (0..frame.width()).map(|x| frame.pixel(x, y).unwrap()[0]).collect()
}

// ---------------------------------------------------------------------------
// rasterize
// ---------------------------------------------------------------------------

#[test]
fn test_background_only() {
    let frame = rasterize(&[DrawItem::Background { color: WHITE }], Rect::new(0.0, 0.0, 3.0, 2.0));
    assert_eq!((frame.width(), frame.height()), (3, 2));
    assert_eq!(frame.format(), PixelFormat::Rgb8);
    assert!(frame.data().iter().all(|&v| v == 255));
}

#[test]
fn test_empty_region() {
    let frame = rasterize(&[DrawItem::Background { color: WHITE }], Rect::default());
    assert!(frame.is_empty());
}

#[test]
fn test_nearest_sampling() {
    let ramp = make_ramp();
    let items = [DrawItem::Image {
        buffer: &ramp,
        dest: Rect::new(0.0, 0.0, 4.0, 1.0),
        filter: SamplingFilter::Nearest,
    }];
    let frame = rasterize(&items, Rect::new(0.0, 0.0, 4.0, 1.0));
    assert_eq!(row_values(&frame, 0), vec![0, 0, 255, 255]);
}

#[test]
fn test_bilinear_sampling() {
    let ramp = make_ramp();
    let items = [DrawItem::Image {
        buffer: &ramp,
        dest: Rect::new(0.0, 0.0, 4.0, 1.0),
        filter: SamplingFilter::Bilinear,
    }];
    let frame = rasterize(&items, Rect::new(0.0, 0.0, 4.0, 1.0));
    assert_eq!(row_values(&frame, 0), vec![0, 64, 191, 255]);
}

#[test]
fn test_image_outside_dest_keeps_background() {
    let img = make_solid_rgb(1, 1, [9, 9, 9]);
    let items = [
        DrawItem::Background { color: WHITE },
        DrawItem::Image {
            buffer: &img,
            dest: Rect::new(1.0, 0.0, 1.0, 1.0),
            filter: SamplingFilter::Nearest,
        },
    ];
    let frame = rasterize(&items, Rect::new(0.0, 0.0, 3.0, 1.0));
    assert_eq!(frame.pixel(0, 0), Some(WHITE));
    assert_eq!(frame.pixel(1, 0), Some([9, 9, 9]));
    assert_eq!(frame.pixel(2, 0), Some(WHITE));
}

#[test]
fn test_line_width() {
    let items = [
        DrawItem::Background { color: WHITE },
        DrawItem::Line {
            from: Point::new(0.0, 2.0),
            to: Point::new(4.0, 2.0),
            color: GREEN,
            width: 2.0,
        },
    ];
    let frame = rasterize(&items, Rect::new(0.0, 0.0, 4.0, 4.0));
    assert_eq!(frame.pixel(0, 0), Some(WHITE));
    assert_eq!(frame.pixel(2, 1), Some(GREEN));
    assert_eq!(frame.pixel(3, 2), Some(GREEN));
    assert_eq!(frame.pixel(1, 3), Some(WHITE));
}

#[test]
fn test_region_offset() {
    let img = make_gradient_rgb(8, 8);
    let items = [DrawItem::Image {
        buffer: &img,
        dest: Rect::new(0.0, 0.0, 8.0, 8.0),
        filter: SamplingFilter::Nearest,
    }];
    let frame = rasterize(&items, Rect::new(2.0, 3.0, 2.0, 2.0));
    assert_eq!((frame.width(), frame.height()), (2, 2));
    assert_eq!(frame.pixel(0, 0), img.pixel(2, 3));
    assert_eq!(frame.pixel(1, 1), img.pixel(3, 4));
}

// ---------------------------------------------------------------------------
// Controller + surface
// ---------------------------------------------------------------------------

#[test]
fn test_render_to_raster_surface() {
    let mut vp = ViewportController::default();
    vp.display(make_solid_rgb(2, 2, [200, 0, 0]), true);
    let mut surface = RasterSurface::new(4, 4);
    assert_eq!(surface.size(), Size::new(4.0, 4.0));

    vp.render_to(&mut surface);
    assert!((vp.zoom_scale() - 2.0).abs() < 1e-12);
    let frame = surface.frame();
    assert_eq!((frame.width(), frame.height()), (4, 4));
    assert!(frame.data().chunks_exact(3).all(|px| px == [200, 0, 0]));
    assert!(!vp.take_redraw_request());
}

#[test]
fn test_draw_list_includes_line() {
    let mut vp = ViewportController::default();
    vp.resize(Size::new(10.0, 10.0));
    vp.display(make_solid_rgb(10, 10, [0, 0, 0]), true);
    assert_eq!(vp.draw_list().len(), 2);

    vp.pointer_press(Point::new(1.0, 1.0), PointerButton::Primary, Modifiers::CTRL);
    vp.pointer_move(Point::new(8.0, 1.0));
    let items = vp.draw_list();
    assert_eq!(items.len(), 3);
    match items[2] {
        DrawItem::Line { from, to, .. } => {
            assert_eq!(from, Point::new(1.0, 1.0));
            assert_eq!(to, Point::new(8.0, 1.0));
        }
        _ => panic!("expected the measurement line last"),
    }
}

#[test]
fn test_grab_whole_image_and_sub_rect() {
    let mut vp = ViewportController::default();
    vp.resize(Size::new(4.0, 4.0));
    vp.display(make_gradient_rgb(2, 2), true);

    let whole = vp.grab(None);
    assert_eq!((whole.width(), whole.height()), (4, 4));
    assert_eq!(whole.pixel(3, 3), Some([1, 1, 2]));

    let part = vp.grab(Some(Rect::new(1.0, 0.0, 1.0, 1.0)));
    assert_eq!((part.width(), part.height()), (2, 2));
    assert!(part.data().chunks_exact(3).all(|px| px == [1, 0, 1]));
}

#[test]
fn test_grab_clips_to_visible_area() {
    let mut vp = ViewportController::default();
    vp.resize(Size::new(10.0, 10.0));
    vp.display(make_solid_rgb(20, 20, [5, 5, 5]), true);
    vp.zoom_to_actual_size();
    let shot = vp.grab(None);
    assert_eq!((shot.width(), shot.height()), (10, 10));
}
