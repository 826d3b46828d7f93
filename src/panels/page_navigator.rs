//! The page strip: one live thumbnail per page, plus delete and add-page
//! controls.

use egui::{Sense, Vec2};

use crate::app::WhiteboardApp;
use crate::export;
use crate::geometry;
use crate::renderer::{self, CanvasTransform};
use crate::stroke::SELECTION_COLOR;
use crate::toast::ToastKind;

const THUMBNAIL_WIDTH: f32 = 96.0;
const THUMBNAIL_PADDING: f32 = 4.0;

pub fn page_navigator(app: &mut WhiteboardApp, ctx: &egui::Context, now_ms: f64) {
    egui::TopBottomPanel::bottom("page_navigator").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let current = app.pages.current_index();
            let mut select: Option<usize> = None;
            let mut delete: Option<usize> = None;

            for (i, page) in app.pages.pages().iter().enumerate() {
                ui.vertical(|ui| {
                    let size = Vec2::new(
                        THUMBNAIL_WIDTH,
                        THUMBNAIL_WIDTH * page.aspect_ratio.height_factor(),
                    );
                    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
                    if response.clicked() {
                        select = Some(i);
                    }

                    let painter = ui.painter_at(rect);
                    painter.rect_filled(rect, 2.0, page.background_color);
                    // Miniature of the page, fitted with the same math as the
                    // export sink and painted with the same primitives.
                    if let Some(bounds) = geometry::bounding_box(&page.strokes) {
                        if let Some(fit) =
                            export::fit_transform(&bounds, size.x, size.y, THUMBNAIL_PADDING)
                        {
                            let transform = CanvasTransform {
                                origin: rect.min,
                                pan: fit.pan,
                                zoom: fit.zoom,
                            };
                            renderer::render_strokes(&painter, &transform, &page.strokes, now_ms);
                        }
                    }
                    let outline = if current == i {
                        egui::Stroke::new(2.0, SELECTION_COLOR)
                    } else {
                        egui::Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color)
                    };
                    painter.rect_stroke(rect, 2.0, outline);

                    ui.horizontal(|ui| {
                        ui.label(format!("{} ({})", i + 1, page.aspect_ratio.label()));
                        if ui.small_button("✕").clicked() {
                            delete = Some(i);
                        }
                    });
                });
            }

            if let Some(i) = select {
                app.pages.select_page(i);
            }
            if let Some(i) = delete {
                app.pages.delete_page(i);
                app.toasts.push("Page deleted", ToastKind::Success, now_ms);
            }

            if ui.button("＋ Add Page").clicked() {
                app.show_add_page_modal = true;
            }
        });
    });
}
