//! The toolbar: tool selection, pen/eraser/highlighter settings, background
//! color, undo/redo, and export/save actions. It only ever reads the
//! `can_undo`/`can_redo` flags from the core; stroke data stays behind the
//! canvas controller.

use egui::{Color32, Slider};

use crate::app::WhiteboardApp;
use crate::stroke::PALETTE;
use crate::toast::ToastKind;
use crate::tools::Tool;

pub fn toolbar(app: &mut WhiteboardApp, ctx: &egui::Context, now_ms: f64) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            for tool in Tool::ALL {
                if ui
                    .selectable_label(app.tool == tool, tool.label())
                    .clicked()
                {
                    log::info!("tool selected: {}", tool.label());
                    app.tool = tool;
                }
            }
        });

        ui.separator();

        ui.horizontal_wrapped(|ui| {
            ui.label("Color:");
            for color in PALETTE {
                let button = egui::Button::new("  ").fill(color);
                let selected = app.settings.pen.color == color;
                let response = ui.add(button);
                if selected {
                    ui.painter().rect_stroke(
                        response.rect,
                        2.0,
                        egui::Stroke::new(2.0, Color32::GRAY),
                    );
                }
                if response.clicked() {
                    app.settings.pen.color = color;
                }
            }
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut app.settings.pen.color,
                egui::color_picker::Alpha::Opaque,
            );

            ui.separator();

            match app.tool {
                Tool::Eraser => {
                    ui.label("Eraser size:");
                    ui.add(Slider::new(&mut app.settings.eraser_size, 4.0..=80.0));
                }
                Tool::Highlighter => {
                    ui.label("Highlighter size:");
                    ui.add(Slider::new(&mut app.settings.highlighter_size, 4.0..=80.0));
                }
                _ => {
                    ui.label("Size:");
                    ui.add(Slider::new(&mut app.settings.pen.size, 1.0..=72.0));
                }
            }

            ui.separator();

            ui.label("Background:");
            let mut background = app
                .pages
                .current_page()
                .map(|p| p.background_color)
                .unwrap_or(Color32::WHITE);
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut background,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                app.pages.set_background(background);
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            let (can_undo, can_redo) = app
                .pages
                .current_page()
                .map(|p| (p.history.can_undo(), p.history.can_redo()))
                .unwrap_or((false, false));

            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                app.redo();
            }

            ui.separator();

            if ui.button("Export PNG").clicked() {
                app.request_export(ctx);
                app.toasts.push("Exporting PNG...", ToastKind::Info, now_ms);
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.separator();
                if ui.button("Save").clicked() {
                    app.save_document(now_ms);
                }
                if ui.button("Load").clicked() {
                    app.load_document(now_ms);
                }
            }
        });
    });
}
