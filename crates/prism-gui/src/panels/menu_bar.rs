use prism_core::decompose::DecomposeMode;
use prism_core::io::save_image;

use crate::app::PrismApp;
use crate::messages::AppMessage;
use crate::state::{MenuGates, ViewKind};

pub fn show(ctx: &egui::Context, app: &mut PrismApp) {
    let gates = MenuGates::new(
        app.gate.is_blocked(),
        app.original.is_some(),
        app.viewport.measurement_line().is_some(),
    );

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add_enabled(
                        gates.open,
                        egui::Button::new("Open...").shortcut_text(ctx.format_shortcut(&open_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    open_file(ctx, app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui
                    .add_enabled(
                        gates.save,
                        egui::Button::new("Save As...").shortcut_text(ctx.format_shortcut(&save_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    save_file(app);
                }

                if ui
                    .add_enabled(gates.save, egui::Button::new("Save View As..."))
                    .clicked()
                {
                    ui.close();
                    save_view(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.add_enabled(gates.split, egui::Button::new("Split RGB")).clicked() {
                    ui.close();
                    app.request_split(ctx, DecomposeMode::Rgb);
                }
                if ui.add_enabled(gates.split, egui::Button::new("Split Lab")).clicked() {
                    ui.close();
                    app.request_split(ctx, DecomposeMode::Lab);
                }
                let showing_original = app.ui_state.view == ViewKind::Original;
                if ui
                    .add_enabled(gates.split && !showing_original, egui::Button::new("Show Original"))
                    .clicked()
                {
                    ui.close();
                    app.show_original();
                }

                ui.separator();

                if ui
                    .add_enabled(gates.clear_line, egui::Button::new("Clear Line"))
                    .clicked()
                {
                    ui.close();
                    app.clear_line();
                }
            });

            ui.menu_button("View", |ui| {
                ui.add_enabled_ui(gates.view, |ui| {
                    if ui.button("Zoom In").clicked() {
                        ui.close();
                        app.viewport.zoom_in();
                    }
                    if ui.button("Zoom Out").clicked() {
                        ui.close();
                        app.viewport.zoom_out();
                    }
                    if ui.button("Actual Size").clicked() {
                        ui.close();
                        app.viewport.zoom_to_actual_size();
                    }
                    if ui.button("Fit to Window").clicked() {
                        ui.close();
                        app.viewport.zoom_to_fit();
                    }

                    ui.separator();

                    let mut smooth = app.viewport.is_smooth();
                    if ui.checkbox(&mut smooth, "Smooth Transform").changed() {
                        app.viewport.set_transformation_quality(smooth);
                    }
                });
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) && gates.open {
            open_file(ctx, app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) && gates.save {
            save_file(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_file(ctx: &egui::Context, app: &mut PrismApp) {
    let tx = app.msg_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "gif", "webp"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = tx.send(AppMessage::load(path));
            ctx.request_repaint();
        }
    });
}

/// Save the displayed buffer (original or split) at full resolution.
fn save_file(app: &mut PrismApp) {
    let Some(buffer) = app.viewport.buffer().cloned() else {
        return;
    };
    spawn_save(app, buffer, "output.png");
}

/// Save what the canvas currently shows of the image.
fn save_view(app: &mut PrismApp) {
    let view = app.viewport.grab(None);
    if view.is_empty() {
        app.ui_state.add_log("Nothing visible to save".into());
        return;
    }
    spawn_save(app, view, "view.png");
}

fn spawn_save(app: &PrismApp, buffer: prism_core::buffer::PixelBuffer, default_name: &str) {
    let tx = app.msg_tx.clone();
    let default_name = default_name.to_string();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("TIFF", &["tiff", "tif"])
            .add_filter("BMP", &["bmp"])
            .set_file_name(default_name)
            .save_file()
        {
            let msg = match save_image(&buffer, &path) {
                Ok(()) => AppMessage::ImageSaved { path },
                Err(e) => AppMessage::Error {
                    message: format!("Failed to save {}: {e}", path.display()),
                },
            };
            let _ = tx.send(msg);
        }
    });
}
