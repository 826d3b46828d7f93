//! Stroke painting: the committed pass (with highlighter fade/glow driven by
//! wall-clock age) and the preview pass for the stroke under the pointer,
//! plus the selection and hover overlays.
//!
//! All functions are stateless: they take a painter, the zoom/pan mapping and
//! a timestamp, and never touch the stored strokes.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{polygon_vertices, BoundingBox};
use crate::stroke::{
    PenConfig, ShapeKind, Stroke, StrokeGeometry, HIGHLIGHTER_GLOW_DURATION_MS,
    HIGHLIGHTER_LIFESPAN_MS, SELECTION_COLOR,
};

/// Highlighter opacity holds this value until the fade starts.
pub const HIGHLIGHTER_BASE_ALPHA: f32 = 0.4;
/// Age at which a highlighter begins fading out.
pub const HIGHLIGHTER_FADE_START_MS: f64 = 3000.0;

/// Maps document coordinates to screen pixels for one canvas rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Top-left of the canvas rect in screen coordinates.
    pub origin: Pos2,
    /// Pan offset in screen pixels, unaffected by zoom.
    pub pan: Vec2,
    pub zoom: f32,
}

impl CanvasTransform {
    pub fn to_screen(&self, p: Pos2) -> Pos2 {
        self.origin + self.pan + p.to_vec2() * self.zoom
    }

    pub fn to_doc(&self, screen: Pos2) -> Pos2 {
        (((screen - self.origin) - self.pan) / self.zoom).to_pos2()
    }

    /// A length in document units, in screen pixels.
    pub fn scale(&self, len: f32) -> f32 {
        len * self.zoom
    }
}

/// Committed-pass opacity of a highlighter of the given age (ms).
///
/// Full base alpha until the fade starts, then a linear ramp to zero at the
/// end of the lifespan.
pub fn highlighter_alpha(age_ms: f64) -> f32 {
    if age_ms <= HIGHLIGHTER_FADE_START_MS {
        return HIGHLIGHTER_BASE_ALPHA;
    }
    let fade_duration = HIGHLIGHTER_LIFESPAN_MS - HIGHLIGHTER_FADE_START_MS;
    let remaining = 1.0 - (age_ms - HIGHLIGHTER_FADE_START_MS) / fade_duration;
    (HIGHLIGHTER_BASE_ALPHA * remaining as f32).max(0.0)
}

/// Glow intensity of a highlighter of the given age (ms): 1 at birth, 0 once
/// the glow duration has elapsed.
pub fn glow_opacity(age_ms: f64) -> f32 {
    (1.0 - (age_ms / HIGHLIGHTER_GLOW_DURATION_MS) as f32).clamp(0.0, 1.0)
}

fn line_style(transform: &CanvasTransform, width: f32, color: Color32) -> egui::Stroke {
    egui::Stroke::new(transform.scale(width), color)
}

fn paint_polyline(
    painter: &Painter,
    transform: &CanvasTransform,
    points: &[Pos2],
    width: f32,
    color: Color32,
) {
    if points.len() < 2 {
        return;
    }
    let screen: Vec<Pos2> = points.iter().map(|p| transform.to_screen(*p)).collect();
    painter.add(Shape::line(screen, line_style(transform, width, color)));
}

fn paint_shape(
    painter: &Painter,
    transform: &CanvasTransform,
    stroke: &Stroke,
    kind: ShapeKind,
    start: Pos2,
    end: Pos2,
    color: Color32,
) {
    let style = line_style(transform, stroke.config.size, color);
    match kind {
        ShapeKind::Line => {
            painter.line_segment([transform.to_screen(start), transform.to_screen(end)], style);
        }
        ShapeKind::Rectangle => {
            let rect = Rect::from_two_pos(transform.to_screen(start), transform.to_screen(end));
            painter.rect_stroke(rect, 0.0, style);
        }
        ShapeKind::Circle => {
            let radius = transform.scale((end - start).length());
            painter.circle_stroke(transform.to_screen(start), radius, style);
        }
        _ => {
            let vertices: Vec<Pos2> = polygon_vertices(stroke)
                .into_iter()
                .map(|p| transform.to_screen(p))
                .collect();
            if vertices.len() >= 3 {
                painter.add(Shape::closed_line(vertices, style));
            }
        }
    }
}

fn paint_text(
    painter: &Painter,
    transform: &CanvasTransform,
    anchor: Pos2,
    text: &str,
    config: &PenConfig,
) {
    if text.is_empty() {
        return;
    }
    let font = FontId::proportional(transform.scale(config.size));
    let line_height = transform.scale(config.size * 1.2);
    let screen = transform.to_screen(anchor);
    for (i, line) in text.split('\n').enumerate() {
        painter.text(
            Pos2::new(screen.x, screen.y + i as f32 * line_height),
            Align2::LEFT_TOP,
            line,
            font.clone(),
            config.color,
        );
    }
}

/// Paint the committed stroke list.
///
/// `now_ms` drives the highlighter fade and glow; everything else renders the
/// same regardless of time.
pub fn render_strokes(
    painter: &Painter,
    transform: &CanvasTransform,
    strokes: &[Stroke],
    now_ms: f64,
) {
    for stroke in strokes {
        match &stroke.geometry {
            StrokeGeometry::Path { points } => {
                paint_polyline(painter, transform, points, stroke.config.size, stroke.config.color);
            }
            StrokeGeometry::Timed { points, created_at } => {
                let age = now_ms - created_at;
                let alpha = highlighter_alpha(age);
                if alpha <= 0.0 {
                    continue;
                }
                let glow = glow_opacity(age);
                if glow > 0.0 {
                    // egui has no shadow blur; the glow is a wider stroke
                    // layered underneath, shrinking as the glow decays.
                    let glow_color =
                        Color32::from_rgba_unmultiplied(255, 100, 100, (204.0 * glow) as u8);
                    paint_polyline(
                        painter,
                        transform,
                        points,
                        stroke.config.size + 15.0 * glow,
                        glow_color,
                    );
                }
                // Fixed red ink; the configured color is only for previews.
                let ink = Color32::from_rgba_unmultiplied(255, 0, 0, (alpha * 255.0) as u8);
                paint_polyline(painter, transform, points, stroke.config.size, ink);
            }
            StrokeGeometry::Shape { kind, start, end } => {
                paint_shape(painter, transform, stroke, *kind, *start, *end, stroke.config.color);
            }
            StrokeGeometry::Text { anchor, text } => {
                paint_text(painter, transform, *anchor, text, &stroke.config);
            }
            // Lassos never reach the committed list.
            StrokeGeometry::Lasso { .. } => {}
        }
    }
}

/// Paint the single in-progress stroke.
///
/// Same per-kind rules as the committed pass, minus time decay (an unfinished
/// highlighter has no meaningful age) and minus text (text appears only on
/// commit). The lasso path renders as an open polyline in its own config.
pub fn render_preview(painter: &Painter, transform: &CanvasTransform, stroke: &Stroke) {
    match &stroke.geometry {
        StrokeGeometry::Path { points }
        | StrokeGeometry::Timed { points, .. }
        | StrokeGeometry::Lasso { points } => {
            paint_polyline(painter, transform, points, stroke.config.size, stroke.config.color);
        }
        StrokeGeometry::Shape { kind, start, end } => {
            paint_shape(painter, transform, stroke, *kind, *start, *end, stroke.config.color);
        }
        StrokeGeometry::Text { .. } => {}
    }
}

/// Dashed selection rectangle with the bottom-right scale handle.
pub fn render_selection_box(painter: &Painter, transform: &CanvasTransform, bounds: &BoundingBox) {
    let min = transform.to_screen(bounds.top_left());
    let max = transform.to_screen(bounds.bottom_right());
    let style = egui::Stroke::new(1.0, SELECTION_COLOR);
    let corners = [
        min,
        Pos2::new(max.x, min.y),
        max,
        Pos2::new(min.x, max.y),
        min,
    ];
    painter.extend(Shape::dashed_line(&corners, style, 5.0, 5.0));

    // The handle stays 10 px on screen at every zoom level.
    let handle = Rect::from_center_size(max, Vec2::splat(10.0));
    painter.rect_filled(handle, 0.0, SELECTION_COLOR);
}

/// Re-draw a stroke widened and translucent red to mark it as the smart
/// eraser's current target.
pub fn render_hover(painter: &Painter, transform: &CanvasTransform, stroke: &Stroke) {
    let highlighted = Stroke {
        id: stroke.id.clone(),
        config: PenConfig {
            size: stroke.config.size + 4.0,
            color: Color32::from_rgba_unmultiplied(255, 0, 0, 128),
        },
        geometry: stroke.geometry.clone(),
    };
    render_preview(painter, transform, &highlighted);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_holds_base_value_before_fade_start() {
        assert_eq!(highlighter_alpha(0.0), HIGHLIGHTER_BASE_ALPHA);
        assert_eq!(highlighter_alpha(3000.0), HIGHLIGHTER_BASE_ALPHA);
    }

    #[test]
    fn alpha_fades_between_start_and_lifespan() {
        let alpha = highlighter_alpha(4000.0);
        assert!(alpha > 0.0);
        assert!(alpha < HIGHLIGHTER_BASE_ALPHA);
    }

    #[test]
    fn alpha_reaches_zero_at_end_of_life() {
        assert_eq!(highlighter_alpha(5000.0), 0.0);
        assert_eq!(highlighter_alpha(9000.0), 0.0);
    }

    #[test]
    fn glow_decays_over_its_duration() {
        assert_eq!(glow_opacity(0.0), 1.0);
        assert!((glow_opacity(750.0) - 0.5).abs() < 1e-4);
        assert_eq!(glow_opacity(1500.0), 0.0);
        assert_eq!(glow_opacity(4000.0), 0.0);
    }

    #[test]
    fn transform_round_trips() {
        let transform = CanvasTransform {
            origin: Pos2::new(100.0, 50.0),
            pan: Vec2::new(-20.0, 12.0),
            zoom: 2.5,
        };
        let doc = Pos2::new(33.0, -7.0);
        let back = transform.to_doc(transform.to_screen(doc));
        assert!((back - doc).length() < 1e-3);
    }

    #[test]
    fn zoom_scales_lengths() {
        let transform = CanvasTransform {
            origin: Pos2::ZERO,
            pan: Vec2::ZERO,
            zoom: 2.0,
        };
        assert_eq!(transform.scale(8.0), 16.0);
    }
}
