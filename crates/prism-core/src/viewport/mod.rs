//! Placement of a [`PixelBuffer`](crate::buffer::PixelBuffer) on a
//! scrollable, zoomable canvas, and the pointer interactions on top of it.

mod controller;
mod input;
mod render;
mod transform;

pub use controller::ViewportController;
pub use input::{InputEvent, MeasurementLine, Modifiers, PixelProbe, PointerButton};
pub use render::{rasterize, DrawItem, RasterSurface, SamplingFilter};
pub use transform::ViewTransform;

use crate::geometry::Size;

/// The drawable, scrollable area a [`ViewportController`] drives.
///
/// The controller decides what goes where; the surface only reports its
/// size and paints the list of items it is handed, in order.
pub trait CanvasSurface {
    /// Current drawable size in device pixels.
    fn size(&self) -> Size;

    /// Paint one frame.
    fn draw(&mut self, items: &[DrawItem<'_>]);
}
