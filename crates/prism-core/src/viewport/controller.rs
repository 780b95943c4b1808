use std::sync::Arc;

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::config::ViewportConfig;
use crate::consts::{
    MAX_ZOOM_SCALE, MIN_ZOOM_SCALE, PLACEHOLDER_GRAY, WHEEL_ZOOM_IN_STEP, WHEEL_ZOOM_OUT_STEP,
    ZOOM_IN_STEP, ZOOM_OUT_STEP,
};
use crate::geometry::{AspectRatioMode, Point, Rect, Size};

use super::input::{InputEvent, MeasurementLine, Modifiers, PixelProbe, PointerButton};
use super::render::{rasterize, DrawItem, SamplingFilter};
use super::transform::ViewTransform;
use super::CanvasSurface;

type ProbeCallback = Box<dyn FnMut(PixelProbe)>;
type LineCallback = Box<dyn FnMut(MeasurementLine)>;

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragMode {
    None,
    Pan { last: Point },
    Line,
}

/// Policy layer between a [`CanvasSurface`] and the image shown on it.
///
/// Owns the scene (the displayed buffer), the scene-to-surface transform,
/// the best-fit flag, the one-shot pending zoom step and the measurement
/// line overlay. Everything here runs on the interactive thread and does
/// constant work per call, except [`grab`](Self::grab).
pub struct ViewportController {
    config: ViewportConfig,
    buffer: Option<Arc<PixelBuffer>>,
    generation: u64,
    scene_rect: Rect,
    surface: Size,
    transform: ViewTransform,
    best_fit: bool,
    pending_zoom: f64,
    filter: SamplingFilter,
    drag: DragMode,
    line: Option<MeasurementLine>,
    hover: Option<Point>,
    redraw_requested: bool,
    on_pixel_probe: Option<ProbeCallback>,
    on_line_ready: Option<LineCallback>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        let filter = if config.smooth_transform {
            SamplingFilter::Bilinear
        } else {
            SamplingFilter::Nearest
        };
        Self {
            config,
            buffer: None,
            generation: 0,
            scene_rect: Rect::default(),
            surface: Size::default(),
            transform: ViewTransform::identity(),
            best_fit: false,
            pending_zoom: 1.0,
            filter,
            drag: DragMode::None,
            line: None,
            hover: None,
            redraw_requested: false,
            on_pixel_probe: None,
            on_line_ready: None,
        }
    }

    // -----------------------------------------------------------------------
    // Callbacks
    // -----------------------------------------------------------------------

    /// Called on every pointer move that is not part of a drag.
    pub fn set_pixel_probe_callback<F>(&mut self, callback: F)
    where
        F: FnMut(PixelProbe) + 'static,
    {
        self.on_pixel_probe = Some(Box::new(callback));
    }

    /// Called once per completed measurement-line drag.
    pub fn set_line_ready_callback<F>(&mut self, callback: F)
    where
        F: FnMut(MeasurementLine) + 'static,
    {
        self.on_line_ready = Some(Box::new(callback));
    }

    // -----------------------------------------------------------------------
    // Content
    // -----------------------------------------------------------------------

    /// Show `buffer`. Empty buffers are ignored.
    ///
    /// With `reset_to_fit` the view switches to best-fit and is refitted.
    /// Otherwise the current scale and scroll are kept, and the layout is
    /// recomputed only when the image extent differs from the previous one.
    pub fn display(&mut self, buffer: impl Into<Arc<PixelBuffer>>, reset_to_fit: bool) {
        let buffer = buffer.into();
        if buffer.is_empty() {
            return;
        }
        let rect = Rect::new(0.0, 0.0, buffer.width() as f64, buffer.height() as f64);
        let changed = rect != self.scene_rect;

        self.buffer = Some(buffer);
        self.generation += 1;
        self.scene_rect = rect;
        if reset_to_fit {
            self.best_fit = true;
        }
        if changed || self.best_fit {
            self.refresh();
        } else {
            self.redraw_requested = true;
        }
    }

    /// Show a light-gray blank canvas of the given size in best-fit mode.
    pub fn display_placeholder(&mut self, width: u32, height: u32) {
        let blank = PixelBuffer::filled(width, height, PixelFormat::Rgb8, PLACEHOLDER_GRAY);
        if blank.is_empty() {
            return;
        }
        self.display(blank, true);
        self.best_fit = true;
        self.refresh();
    }

    /// Drop the displayed image and any measurement line.
    pub fn clear(&mut self) {
        self.buffer = None;
        self.generation += 1;
        self.scene_rect = Rect::default();
        self.line = None;
        self.drag = DragMode::None;
        self.redraw_requested = true;
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_deref()
    }

    /// Bumped whenever the displayed buffer changes; hosts use it to know
    /// when to re-upload textures.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene_rect(&self) -> Rect {
        self.scene_rect
    }

    // -----------------------------------------------------------------------
    // Rendering state
    // -----------------------------------------------------------------------

    /// Nearest neighbour (`false`) or bilinear (`true`) resampling for
    /// subsequent redraws. Pixel data is untouched.
    pub fn set_transformation_quality(&mut self, smooth: bool) {
        self.filter = if smooth {
            SamplingFilter::Bilinear
        } else {
            SamplingFilter::Nearest
        };
        self.redraw_requested = true;
    }

    pub fn sampling_filter(&self) -> SamplingFilter {
        self.filter
    }

    pub fn is_smooth(&self) -> bool {
        self.filter == SamplingFilter::Bilinear
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current horizontal scale factor.
    pub fn zoom_scale(&self) -> f64 {
        self.transform.sx
    }

    pub fn is_best_fit(&self) -> bool {
        self.best_fit
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // -----------------------------------------------------------------------
    // Zoom
    // -----------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.best_fit = false;
        self.pending_zoom = ZOOM_IN_STEP;
        self.refresh();
    }

    pub fn zoom_out(&mut self) {
        self.best_fit = false;
        self.pending_zoom = ZOOM_OUT_STEP;
        self.refresh();
    }

    /// One image pixel per surface pixel, keeping the view center.
    pub fn zoom_to_actual_size(&mut self) {
        self.best_fit = false;
        let center = self.transform.inverse_map(self.surface_center());
        self.transform = ViewTransform::identity();
        self.transform.align(center, self.surface_center());
        self.refresh();
    }

    pub fn zoom_to_fit(&mut self) {
        self.best_fit = true;
        self.refresh();
    }

    /// Zoom by whole wheel notches: 1.25 per notch in, 0.75 per notch out.
    pub fn wheel_zoom(&mut self, notches: i32) {
        if notches == 0 {
            return;
        }
        let step = if notches > 0 {
            WHEEL_ZOOM_IN_STEP
        } else {
            WHEEL_ZOOM_OUT_STEP
        };
        self.best_fit = false;
        self.pending_zoom = step.powi(notches.abs());
        self.refresh();
    }

    /// Raw wheel input in eighths of a degree; partial notches are dropped.
    pub fn wheel(&mut self, angle_delta: i32) {
        let notch = self.config.wheel_notch_angle.max(1);
        self.wheel_zoom(angle_delta / notch);
    }

    /// Scale and center the view so that `rect` (scene coordinates) fills
    /// the surface according to `mode`.
    ///
    /// Does nothing when the surface or `rect` has no area.
    pub fn fit_to_rect(&mut self, rect: Rect, mode: AspectRatioMode) {
        if self.surface.is_empty() || rect.is_empty() {
            return;
        }

        // Back to 1:1 first, so the ratios below are absolute scales.
        let unity = self.transform.map_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        if unity.is_empty() {
            return;
        }
        self.transform.sx /= unity.width;
        self.transform.sy /= unity.height;

        let target = self.transform.map_rect(rect);
        let mut xratio = self.surface.width / target.width;
        let mut yratio = self.surface.height / target.height;
        match mode {
            AspectRatioMode::KeepAspectRatio => {
                xratio = xratio.min(yratio);
                yratio = xratio;
            }
            AspectRatioMode::KeepAspectRatioByExpanding => {
                xratio = xratio.max(yratio);
                yratio = xratio;
            }
            AspectRatioMode::IgnoreAspectRatio => {}
        }

        self.transform.sx *= xratio;
        self.transform.sy *= yratio;
        self.center_on(rect.center());
        self.redraw_requested = true;
    }

    /// Scroll so that scene point `p` sits in the middle of the surface,
    /// as far as the scroll range allows.
    pub fn center_on(&mut self, p: Point) {
        self.transform.align(p, self.surface_center());
        self.constrain();
    }

    /// Scroll by a surface-space delta.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.transform.tx -= dx;
        self.transform.ty -= dy;
        self.constrain();
        self.redraw_requested = true;
    }

    /// Re-run the redraw policy: recompute best-fit, or apply the pending
    /// zoom step once and reset it to neutral.
    pub fn refresh(&mut self) {
        if self.buffer.is_none() {
            return;
        }
        if self.best_fit {
            self.fit_to_rect(self.scene_rect, AspectRatioMode::KeepAspectRatio);
        } else if self.pending_zoom != 1.0 && !self.zoom_step_in_range(self.pending_zoom) {
            tracing::debug!(
                "Zoom step {} ignored at scale {:.4}x{:.4}",
                self.pending_zoom,
                self.transform.sx,
                self.transform.sy
            );
        } else if self.pending_zoom != 1.0 {
            let anchor = self
                .hover
                .filter(|p| Rect::from_size(self.surface).contains(*p))
                .unwrap_or_else(|| self.surface_center());
            self.transform
                .scale_about(self.pending_zoom, self.pending_zoom, anchor);
            self.constrain();
        }
        self.pending_zoom = 1.0;
        self.redraw_requested = true;
        tracing::debug!(
            "Viewport transform: scale {:.4}x{:.4}, offset ({:.1}, {:.1}), best fit {}",
            self.transform.sx,
            self.transform.sy,
            self.transform.tx,
            self.transform.ty,
            self.best_fit
        );
    }

    /// Whether scaling by `step` keeps both axes inside the usable range.
    fn zoom_step_in_range(&self, step: f64) -> bool {
        let in_range = |scale: f64| {
            let next = scale * step;
            next.is_finite() && (MIN_ZOOM_SCALE..=MAX_ZOOM_SCALE).contains(&next)
        };
        in_range(self.transform.sx) && in_range(self.transform.sy)
    }

    /// Surface resize notification.
    pub fn resize(&mut self, size: Size) {
        if size == self.surface {
            return;
        }
        self.surface = size;
        self.constrain();
        self.refresh();
        self.redraw_requested = true;
    }

    // -----------------------------------------------------------------------
    // Coordinate mapping
    // -----------------------------------------------------------------------

    pub fn map_to_scene(&self, surface_point: Point) -> Point {
        self.transform.inverse_map(surface_point)
    }

    pub fn map_from_scene(&self, scene_point: Point) -> Point {
        self.transform.map(scene_point)
    }

    /// Integer image pixel under a surface point, truncating toward zero.
    pub fn map_pointer_to_image(&self, surface_point: Point) -> (i32, i32) {
        let p = self.map_to_scene(surface_point);
        (p.x as i32, p.y as i32)
    }

    /// What the cursor at `surface_point` is over.
    pub fn probe(&self, surface_point: Point) -> PixelProbe {
        let Some(buffer) = self.buffer.as_deref() else {
            return PixelProbe::Outside;
        };
        let p = self.map_to_scene(surface_point);
        if p.x < 0.0 || p.y < 0.0 || p.x >= buffer.width() as f64 || p.y >= buffer.height() as f64
        {
            return PixelProbe::Outside;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        match buffer.pixel(x, y) {
            Some(rgb) => PixelProbe::Pixel { x, y, rgb },
            None => PixelProbe::Outside,
        }
    }

    // -----------------------------------------------------------------------
    // Measurement line
    // -----------------------------------------------------------------------

    pub fn measurement_line(&self) -> Option<&MeasurementLine> {
        self.line.as_ref()
    }

    /// Endpoints of the current line, all zero when there is none.
    pub fn line_coords(&self) -> [i32; 4] {
        self.line.map(|l| l.coords()).unwrap_or_default()
    }

    pub fn is_line_dragging(&self) -> bool {
        self.drag == DragMode::Line
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.drag, DragMode::Pan { .. })
    }

    pub fn clear_line(&mut self) {
        if self.line.take().is_some() {
            self.redraw_requested = true;
        }
        if self.drag == DragMode::Line {
            self.drag = DragMode::None;
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press {
                pos,
                button,
                modifiers,
            } => self.pointer_press(pos, button, modifiers),
            InputEvent::Move { pos } => self.pointer_move(pos),
            InputEvent::Release { pos, button } => self.pointer_release(pos, button),
            InputEvent::DoubleClick {
                pos,
                button,
                modifiers,
            } => self.double_click(pos, button, modifiers),
            InputEvent::Wheel { angle_delta } => self.wheel(angle_delta),
            InputEvent::Leave => self.pointer_leave(),
            InputEvent::Resize { size } => self.resize(size),
        }
    }

    /// Primary press: with Ctrl starts a new measurement line at the
    /// pointer (replacing any previous one), without it starts panning.
    pub fn pointer_press(&mut self, pos: Point, button: PointerButton, modifiers: Modifiers) {
        self.hover = Some(pos);
        if button != PointerButton::Primary {
            return;
        }
        if modifiers.ctrl && self.buffer.is_some() {
            let (x, y) = self.map_pointer_to_image(pos);
            self.line = Some(MeasurementLine::start_at(x, y));
            self.drag = DragMode::Line;
            self.redraw_requested = true;
        } else {
            self.drag = DragMode::Pan { last: pos };
        }
        self.emit_probe(PixelProbe::Outside);
    }

    pub fn pointer_move(&mut self, pos: Point) {
        self.hover = Some(pos);
        match self.drag {
            DragMode::Line => {
                let (x, y) = self.map_pointer_to_image(pos);
                if let Some(line) = self.line.as_mut() {
                    line.x1 = x;
                    line.y1 = y;
                }
                self.redraw_requested = true;
            }
            DragMode::Pan { last } => {
                self.scroll_by(last.x - pos.x, last.y - pos.y);
                self.drag = DragMode::Pan { last: pos };
            }
            DragMode::None => {
                if self.buffer.is_some() {
                    let probe = self.probe(pos);
                    self.emit_probe(probe);
                }
            }
        }
    }

    pub fn pointer_release(&mut self, pos: Point, button: PointerButton) {
        self.hover = Some(pos);
        if button != PointerButton::Primary {
            return;
        }
        if self.drag == DragMode::Line {
            let (x, y) = self.map_pointer_to_image(pos);
            if let Some(line) = self.line.as_mut() {
                line.x1 = x;
                line.y1 = y;
                line.armed = false;
                let finished = *line;
                self.redraw_requested = true;
                if let Some(cb) = self.on_line_ready.as_mut() {
                    cb(finished);
                }
            }
        }
        self.drag = DragMode::None;
    }

    /// Plain primary double-click removes the measurement line.
    pub fn double_click(&mut self, pos: Point, button: PointerButton, modifiers: Modifiers) {
        self.hover = Some(pos);
        if button == PointerButton::Primary && !modifiers.ctrl {
            self.clear_line();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
        self.emit_probe(PixelProbe::Outside);
    }

    fn emit_probe(&mut self, probe: PixelProbe) {
        if let Some(cb) = self.on_pixel_probe.as_mut() {
            cb(probe);
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Items the surface paints this frame, back to front.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items = vec![DrawItem::Background {
            color: self.config.background,
        }];
        if let Some(buffer) = self.buffer.as_deref() {
            items.push(DrawItem::Image {
                buffer,
                dest: self.transform.map_rect(self.scene_rect),
                filter: self.filter,
            });
        }
        if let Some(line) = self.line {
            items.push(DrawItem::Line {
                from: self.transform.map(Point::new(line.x0 as f64, line.y0 as f64)),
                to: self.transform.map(Point::new(line.x1 as f64, line.y1 as f64)),
                color: self.config.line_color,
                width: self.config.line_width,
            });
        }
        items
    }

    /// Sync the surface size, then paint the current frame onto it.
    pub fn render_to<S: CanvasSurface>(&mut self, surface: &mut S) {
        self.resize(surface.size());
        surface.draw(&self.draw_list());
        self.redraw_requested = false;
    }

    /// Rasterize what the surface currently shows of the scene rectangle
    /// `rect` (the whole image when `None`), clipped to the visible area.
    ///
    /// Returns an empty buffer when nothing is displayed.
    pub fn grab(&self, rect: Option<Rect>) -> PixelBuffer {
        if self.buffer.is_none() {
            return PixelBuffer::empty();
        }
        let scene = rect.unwrap_or(self.scene_rect);
        let region = self
            .transform
            .map_rect(scene)
            .intersect(&Rect::from_size(self.surface));
        if region.is_empty() {
            return PixelBuffer::empty();
        }
        rasterize(&self.draw_list(), region)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn surface_center(&self) -> Point {
        Point::new(self.surface.width / 2.0, self.surface.height / 2.0)
    }

    /// Keep the scaled scene inside the scroll range; an axis smaller than
    /// the surface is centered.
    fn constrain(&mut self) {
        if self.scene_rect.is_empty() || !self.transform.is_invertible() {
            return;
        }
        let t = &mut self.transform;
        t.tx = constrain_axis(
            t.tx,
            self.scene_rect.x * t.sx,
            self.scene_rect.width * t.sx,
            self.surface.width,
        );
        t.ty = constrain_axis(
            t.ty,
            self.scene_rect.y * t.sy,
            self.scene_rect.height * t.sy,
            self.surface.height,
        );
    }
}

/// Offset for one axis: `start` and `extent` are the scaled scene origin
/// and length, `view` the surface length.
fn constrain_axis(offset: f64, start: f64, extent: f64, view: f64) -> f64 {
    if extent <= view {
        (view - extent) / 2.0 - start
    } else {
        offset.clamp(view - extent - start, -start)
    }
}
