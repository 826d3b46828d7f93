//! Application shell: wires the toolbar, page navigator and canvas panel to
//! the core, handles keyboard shortcuts and screenshot-based export, and
//! persists the document across runs through eframe storage.

use std::path::Path;

use egui::{
    Color32, CursorIcon, FontId, Key, PointerButton, Rect, Sense, Vec2, ViewportCommand,
};

use crate::canvas::{has_highlighters, CanvasController, Gesture};
use crate::export;
use crate::pages::{AspectRatio, PageCollection};
use crate::panels;
#[cfg(not(target_arch = "wasm32"))]
use crate::persistence;
use crate::renderer;
use crate::toast::{ToastKind, Toasts};
use crate::tools::{Tool, ToolSettings};
use crate::util::time;

/// Interval between highlighter expiry sweeps.
const PRUNE_INTERVAL_MS: f64 = 1000.0;
/// Backdrop behind the page surface.
const WORKSPACE_COLOR: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);

#[cfg(not(target_arch = "wasm32"))]
const DOCUMENT_PATH: &str = "whiteboard.json";

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct WhiteboardApp {
    pub(crate) pages: PageCollection,
    pub(crate) tool: Tool,
    pub(crate) settings: ToolSettings,
    // Interaction state is transient; a restart begins at Idle.
    #[serde(skip)]
    pub(crate) canvas: CanvasController,
    #[serde(skip)]
    pub(crate) toasts: Toasts,
    #[serde(skip)]
    pub(crate) show_add_page_modal: bool,
    #[serde(skip)]
    pending_export: bool,
    #[serde(skip, default = "empty_rect")]
    canvas_rect: Rect,
    #[serde(skip)]
    last_prune_ms: f64,
}

fn empty_rect() -> Rect {
    Rect::NOTHING
}

impl Default for WhiteboardApp {
    fn default() -> Self {
        Self {
            pages: PageCollection::new(),
            tool: Tool::Pen,
            settings: ToolSettings::default(),
            canvas: CanvasController::new(),
            toasts: Toasts::new(),
            show_add_page_modal: false,
            pending_export: false,
            canvas_rect: Rect::NOTHING,
            last_prune_ms: 0.0,
        }
    }
}

impl WhiteboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }
        Self::default()
    }

    pub fn undo(&mut self) {
        if let Some(page) = self.pages.current_page_mut() {
            page.history.undo();
        }
        self.pages.sync_current();
    }

    pub fn redo(&mut self) {
        if let Some(page) = self.pages.current_page_mut() {
            page.history.redo();
        }
        self.pages.sync_current();
    }

    /// Ask the backend for a frame screenshot; the PNG is written once the
    /// screenshot event arrives.
    pub fn request_export(&mut self, ctx: &egui::Context) {
        self.pending_export = true;
        ctx.send_viewport_cmd(ViewportCommand::Screenshot(egui::UserData::default()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_document(&mut self, now_ms: f64) {
        self.pages.sync_current();
        match persistence::save_document(&self.pages, Path::new(DOCUMENT_PATH)) {
            Ok(()) => self
                .toasts
                .push("Document saved", ToastKind::Success, now_ms),
            Err(err) => {
                log::error!("save failed: {err}");
                self.toasts
                    .push(format!("Save failed: {err}"), ToastKind::Error, now_ms);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_document(&mut self, now_ms: f64) {
        match persistence::load_document(Path::new(DOCUMENT_PATH)) {
            Ok(pages) => {
                self.pages = pages;
                self.canvas = CanvasController::new();
                self.toasts
                    .push("Document loaded", ToastKind::Success, now_ms);
            }
            Err(err) => {
                log::error!("load failed: {err}");
                self.toasts
                    .push(format!("Load failed: {err}"), ToastKind::Error, now_ms);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.pages.is_empty() || ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(Key::Z),
                i.modifiers.command && i.key_pressed(Key::Y),
            )
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
    }

    fn handle_screenshot_events(&mut self, ctx: &egui::Context, now_ms: f64) {
        if !self.pending_export {
            return;
        }
        let image = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = image else {
            return;
        };
        self.pending_export = false;
        let result = export::save_canvas_png(
            &image,
            self.canvas_rect,
            ctx.pixels_per_point(),
            Path::new("whiteboard.png"),
        );
        match result {
            Ok(()) => self
                .toasts
                .push("Exported whiteboard.png", ToastKind::Success, now_ms),
            Err(err) => {
                log::error!("export failed: {err}");
                self.toasts
                    .push(format!("Export failed: {err}"), ToastKind::Error, now_ms);
            }
        }
    }

    fn welcome_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(WORKSPACE_COLOR))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.heading("Whiteboard");
                    ui.label("Create a page to start drawing.");
                    ui.add_space(12.0);
                    if ui.button("＋ Create your first page").clicked() {
                        self.show_add_page_modal = true;
                    }
                });
            });
    }

    fn add_page_modal(&mut self, ctx: &egui::Context, now_ms: f64) {
        if !self.show_add_page_modal {
            return;
        }
        egui::Window::new("New Page")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Choose an aspect ratio:");
                ui.horizontal(|ui| {
                    for aspect in [AspectRatio::FourThree, AspectRatio::SixteenNine] {
                        if ui.button(aspect.label()).clicked() {
                            self.pages.add_page(aspect);
                            self.toasts
                                .push("New page added", ToastKind::Success, now_ms);
                            self.show_add_page_modal = false;
                        }
                    }
                });
                if ui.button("Cancel").clicked() {
                    self.show_add_page_modal = false;
                }
            });
    }

    fn cursor_for_tool(&self) -> CursorIcon {
        if self.canvas.is_panning() {
            return CursorIcon::Grabbing;
        }
        if self.canvas.is_transforming() {
            return CursorIcon::Move;
        }
        match self.tool {
            Tool::Pen | Tool::Highlighter | Tool::Lasso => CursorIcon::Crosshair,
            Tool::Text => CursorIcon::Text,
            Tool::Eraser | Tool::EraserPlus => CursorIcon::PointingHand,
            _ => CursorIcon::Default,
        }
    }

    fn canvas_panel(&mut self, ctx: &egui::Context, now_ms: f64) {
        let cursor = self.cursor_for_tool();
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(WORKSPACE_COLOR))
            .show(ctx, |ui| {
                let Self {
                    pages,
                    tool,
                    settings,
                    canvas,
                    toasts,
                    last_prune_ms,
                    ..
                } = self;
                let Some(page) = pages.current_page_mut() else {
                    return;
                };
                let background = page.background_color;
                let aspect = page.aspect_ratio;
                let history = &mut page.history;

                // Fit the fixed-aspect page surface into the panel, centered.
                let avail = ui.available_rect_before_wrap();
                let height_factor = aspect.height_factor();
                let mut size = Vec2::new(avail.width(), avail.width() * height_factor);
                if size.y > avail.height() {
                    size = Vec2::new(avail.height() / height_factor, avail.height());
                }
                let canvas_rect = Rect::from_center_size(avail.center(), size);
                self.canvas_rect = canvas_rect;

                let response = ui
                    .allocate_rect(canvas_rect, Sense::click_and_drag())
                    .on_hover_cursor(cursor);
                let painter = ui.painter_at(canvas_rect);
                painter.rect_filled(canvas_rect, 0.0, background);

                let zoom = canvas.zoom();
                let transform = canvas.transform(canvas_rect.min);

                let pointer_pos = ctx.input(|i| i.pointer.interact_pos());
                let (primary_down, middle_down, released, delta, pointer_gone) = ctx.input(|i| {
                    (
                        i.pointer.button_pressed(PointerButton::Primary),
                        i.pointer.button_pressed(PointerButton::Middle),
                        i.pointer.button_released(PointerButton::Primary)
                            || i.pointer.button_released(PointerButton::Middle),
                        i.pointer.delta(),
                        !i.pointer.has_pointer(),
                    )
                });

                if response.hovered() {
                    let scroll = ctx.input(|i| i.raw_scroll_delta.y);
                    if scroll != 0.0 {
                        if let Some(pos) = pointer_pos {
                            canvas.wheel_zoom(pos, canvas_rect.min, scroll);
                        }
                    }
                }

                if let Some(pos) = pointer_pos {
                    let doc_point = transform.to_doc(pos);
                    if (primary_down || middle_down) && response.hovered() {
                        let button = if middle_down {
                            PointerButton::Middle
                        } else {
                            PointerButton::Primary
                        };
                        canvas.pointer_down(
                            doc_point, button, *tool, settings, background, history, now_ms,
                        );
                    }
                    // Pointer capture: an active gesture keeps receiving
                    // motion even after the pointer leaves the page surface.
                    if response.hovered() || !matches!(canvas.gesture(), Gesture::Idle) {
                        canvas.pointer_move(doc_point, delta, *tool, history);
                    }
                }
                let gesture_active = !matches!(
                    canvas.gesture(),
                    Gesture::Idle | Gesture::TextEditing(_)
                );
                if released || (pointer_gone && gesture_active) {
                    if let Some(message) = canvas.pointer_up(history) {
                        toasts.push(message, ToastKind::Info, now_ms);
                    }
                }

                // 1 Hz expiry sweep, always against the current snapshot.
                if now_ms - *last_prune_ms >= PRUNE_INTERVAL_MS {
                    *last_prune_ms = now_ms;
                    canvas.prune_expired(history, now_ms);
                }

                let committed: &[crate::stroke::Stroke] = canvas
                    .preview_strokes()
                    .unwrap_or_else(|| history.current());
                renderer::render_strokes(&painter, &transform, committed, now_ms);

                if let Some(stroke) = canvas.current_stroke() {
                    renderer::render_preview(&painter, &transform, stroke);
                }
                if !canvas.selection().is_empty() {
                    if let Some(bounds) = canvas.selection_bounds() {
                        renderer::render_selection_box(&painter, &transform, &bounds);
                    }
                }
                if canvas.preview_strokes().is_none() && canvas.current_stroke().is_none() {
                    if let Some(id) = canvas.hovered_id() {
                        if let Some(stroke) = history.current().iter().find(|s| s.id == id) {
                            renderer::render_hover(&painter, &transform, stroke);
                        }
                    }
                }

                painter.text(
                    canvas_rect.right_bottom() - Vec2::new(8.0, 8.0),
                    egui::Align2::RIGHT_BOTTOM,
                    format!("{:.0}%", zoom * 100.0),
                    FontId::proportional(12.0),
                    Color32::from_black_alpha(160),
                );

                // Text input overlay for the open text session.
                let pen = settings.pen;
                let mut commit = false;
                let mut cancel = false;
                if let Some(session) = canvas.text_session_mut() {
                    let screen = transform.to_screen(session.anchor);
                    egui::Area::new(egui::Id::new("text_session"))
                        .fixed_pos(screen)
                        .order(egui::Order::Foreground)
                        .show(ctx, |ui| {
                            let edit = egui::TextEdit::multiline(&mut session.buffer)
                                .font(FontId::proportional(pen.size * zoom))
                                .text_color(pen.color)
                                .desired_width(280.0)
                                .hint_text("Type here...");
                            let edit_response = ui.add(edit);
                            if !session.focused {
                                edit_response.request_focus();
                                session.focused = true;
                            } else if ui.input(|i| i.key_pressed(Key::Escape)) {
                                cancel = true;
                            } else if ui
                                .input(|i| i.key_pressed(Key::Enter) && !i.modifiers.shift)
                            {
                                commit = true;
                            } else if edit_response.lost_focus() {
                                commit = true;
                            }
                        });
                }
                if cancel {
                    canvas.cancel_text();
                } else if commit {
                    canvas.commit_text(pen, history);
                }

                // Fade/glow animate only while a highlighter is alive;
                // otherwise repaints stay event-driven.
                let animating = has_highlighters(history.current())
                    || canvas.current_stroke().is_some_and(|s| s.is_highlighter());
                if animating {
                    ctx.request_repaint();
                }

                pages.sync_current();
            });
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = time::now_ms();
        self.toasts.retain_live(now_ms);
        self.handle_shortcuts(ctx);
        self.handle_screenshot_events(ctx, now_ms);

        if self.pages.is_empty() {
            self.welcome_screen(ctx);
            self.add_page_modal(ctx, now_ms);
            self.toasts.show(ctx);
            return;
        }

        panels::toolbar(self, ctx, now_ms);
        panels::page_navigator(self, ctx, now_ms);
        self.canvas_panel(ctx, now_ms);
        self.add_page_modal(ctx, now_ms);
        self.toasts.show(ctx);
    }
}
