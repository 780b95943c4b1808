use prism_core::geometry::{Point, Size};
use prism_core::viewport::{
    CanvasSurface, DrawItem, InputEvent, Modifiers, PointerButton, ViewportController,
};

use crate::app::PrismApp;
use crate::convert::color32;

/// Points of smooth (touchpad) scrolling that count as one line.
const POINTS_PER_LINE: f32 = 50.0;

pub fn show(ctx: &egui::Context, app: &mut PrismApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            let blocked = app.gate.is_blocked();

            app.viewport
                .resize(Size::new(rect.width() as f64, rect.height() as f64));
            if !blocked {
                feed_input(ui, &response, rect, app);
            }

            let texture = app.texture_id(ctx);
            let mut surface = EguiSurface {
                painter: ui.painter_at(rect),
                origin: rect.min,
                size: Size::new(rect.width() as f64, rect.height() as f64),
                texture,
            };
            app.viewport.render_to(&mut surface);

            if blocked {
                show_busy(ui, rect);
            } else if app.original.is_none() {
                show_hint(ui, rect);
            }
        });
}

/// egui painter wrapped as the viewport's drawing surface.
struct EguiSurface {
    painter: egui::Painter,
    origin: egui::Pos2,
    size: Size,
    texture: Option<egui::TextureId>,
}

impl EguiSurface {
    fn to_screen(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32, p.y as f32)
    }
}

impl CanvasSurface for EguiSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn draw(&mut self, items: &[DrawItem<'_>]) {
        for item in items {
            match *item {
                DrawItem::Background { color } => {
                    self.painter
                        .rect_filled(self.painter.clip_rect(), 0.0, color32(color));
                }
                DrawItem::Image { dest, .. } => {
                    let Some(texture) = self.texture else {
                        continue;
                    };
                    let min = self.to_screen(Point::new(dest.x, dest.y));
                    let max = self.to_screen(Point::new(dest.right(), dest.bottom()));
                    self.painter.image(
                        texture,
                        egui::Rect::from_min_max(min, max),
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                DrawItem::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    self.painter.line_segment(
                        [self.to_screen(from), self.to_screen(to)],
                        egui::Stroke::new(width, color32(color)),
                    );
                }
            }
        }
    }
}

/// Translate this frame's raw egui input into viewport events.
fn feed_input(ui: &egui::Ui, response: &egui::Response, rect: egui::Rect, app: &mut PrismApp) {
    let local = |p: egui::Pos2| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);
    let events = ui.input(|i| i.events.clone());
    let dragging = app.viewport.is_line_dragging() || app.viewport.is_panning();

    for event in events {
        match event {
            egui::Event::PointerMoved(pos) => {
                let inside = rect.contains(pos);
                if inside || dragging {
                    app.viewport.pointer_move(local(pos));
                }
                if !inside && app.ui_state.pointer_inside {
                    app.viewport.pointer_leave();
                }
                app.ui_state.pointer_inside = inside;
            }
            egui::Event::PointerGone => {
                if app.ui_state.pointer_inside {
                    app.viewport.pointer_leave();
                }
                app.ui_state.pointer_inside = false;
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
                ..
            } => {
                let Some(button) = map_button(button) else {
                    continue;
                };
                let event = if pressed {
                    if !rect.contains(pos) || !response.hovered() {
                        continue;
                    }
                    InputEvent::Press {
                        pos: local(pos),
                        button,
                        modifiers: map_modifiers(modifiers),
                    }
                } else {
                    InputEvent::Release {
                        pos: local(pos),
                        button,
                    }
                };
                app.viewport.handle_event(event);
            }
            egui::Event::MouseWheel { unit, delta, .. } => {
                if app.ui_state.pointer_inside {
                    let notch = app.config.viewport.wheel_notch_angle;
                    wheel(
                        &mut app.viewport,
                        &mut app.ui_state.wheel_accum,
                        unit,
                        delta.y,
                        notch,
                    );
                }
            }
            _ => {}
        }
    }

    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let modifiers = ui.input(|i| i.modifiers);
            app.viewport.handle_event(InputEvent::DoubleClick {
                pos: local(pos),
                button: PointerButton::Primary,
                modifiers: map_modifiers(modifiers),
            });
        }
    }
}

/// Accumulate wheel rotation and forward it in whole notches.
fn wheel(
    viewport: &mut ViewportController,
    accum: &mut f32,
    unit: egui::MouseWheelUnit,
    delta: f32,
    notch_angle: i32,
) {
    let notch = notch_angle.max(1) as f32;
    let lines = match unit {
        egui::MouseWheelUnit::Point => delta / POINTS_PER_LINE,
        egui::MouseWheelUnit::Line => delta,
        egui::MouseWheelUnit::Page => delta * 3.0,
    };
    *accum += lines * notch;
    let whole = (*accum / notch).trunc() * notch;
    if whole != 0.0 {
        *accum -= whole;
        viewport.wheel(whole as i32);
    }
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn map_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.command,
        shift: m.shift,
        alt: m.alt,
    }
}

fn show_busy(ui: &mut egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(96));
    let spinner = egui::Rect::from_center_size(rect.center(), egui::vec2(48.0, 48.0));
    ui.put(spinner, egui::Spinner::new().size(48.0));
}

fn show_hint(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Open an image to begin",
        egui::FontId::proportional(18.0),
        egui::Color32::from_gray(100),
    );
}
