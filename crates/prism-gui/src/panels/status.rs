use prism_core::viewport::PixelProbe;

use crate::app::PrismApp;

pub fn show(ctx: &egui::Context, app: &mut PrismApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 3 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 3.0 + spacing * 2.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..3 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.separator();

        ui.horizontal(|ui| {
            ui.label(app.ui_state.view.to_string());
            ui.separator();

            if let Some(buffer) = app.viewport.buffer() {
                ui.label(format!("{}x{}", buffer.width(), buffer.height()));
                ui.separator();
            }
            ui.label(format!("Zoom: {:.0}%", app.viewport.zoom_scale() * 100.0));
            ui.separator();

            match app.probe.get() {
                PixelProbe::Pixel { x, y, rgb } => {
                    ui.monospace(format!(
                        "({x}, {y})  R {:3} G {:3} B {:3}",
                        rgb[0], rgb[1], rgb[2]
                    ));
                }
                PixelProbe::Outside => {
                    ui.monospace("(-, -)");
                }
            }

            if let Some(line) = app.last_line.get() {
                ui.separator();
                ui.monospace(format!(
                    "Line ({}, {}) -> ({}, {})  {:.2}px",
                    line.x0,
                    line.y0,
                    line.x1,
                    line.y1,
                    line.length()
                ));
            }

            if app.gate.is_blocked() {
                ui.separator();
                ui.add(egui::Spinner::new());
                ui.label("Working...");
            }
        });

        ui.add_space(2.0);
    });
}
