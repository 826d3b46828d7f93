//! The canvas controller: interprets pointer input against the live stroke
//! history and owns all interaction state (the active gesture, selection,
//! pan/zoom, hover).
//!
//! The gesture state machine is explicit: one enum value holds whatever data
//! the active gesture needs, so cancellation and commit are single
//! transitions instead of scattered boolean flags.

use std::collections::HashSet;

use egui::{Color32, PointerButton, Pos2, Vec2};

use crate::geometry::{
    self, bounding_box, representative_points, stroke_bounds, BoundingBox, TransformKind,
};
use crate::history::StrokeHistory;
use crate::renderer::CanvasTransform;
use crate::stroke::{
    PenConfig, Stroke, StrokeGeometry, HIGHLIGHTER_LIFESPAN_MS, SELECTION_COLOR,
};
use crate::tools::{Tool, ToolSettings};

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 5.0;
/// Side of the bottom-right scale handle, in screen pixels.
pub const SCALE_HANDLE_SIZE: f32 = 10.0;
/// Extra slop around a stroke's width for the smart-eraser segment test,
/// in screen pixels.
pub const ERASER_HIT_SLOP: f32 = 5.0;
/// Segment distance for the smart-eraser hover highlight, in screen pixels.
pub const HOVER_DISTANCE: f32 = 10.0;

/// A move or scale drag applied to the current selection.
#[derive(Debug, Clone)]
pub struct TransformDrag {
    pub kind: TransformKind,
    pub start_point: Pos2,
    pub start_bounds: BoundingBox,
}

/// An open text input awaiting commit (Enter/blur) or cancel (Escape).
#[derive(Debug, Clone)]
pub struct TextSession {
    pub anchor: Pos2,
    pub buffer: String,
    pub focused: bool,
}

/// The active gesture. Exactly one is in effect at a time.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drawing {
        stroke: Stroke,
    },
    Panning,
    Transforming(TransformDrag),
    Erasing,
    TextEditing(TextSession),
}

/// Interaction state for the canvas of the current page.
pub struct CanvasController {
    zoom: f32,
    pan: Vec2,
    gesture: Gesture,
    selection: Vec<Stroke>,
    /// Live transform preview: committed strokes outside the selection plus
    /// the transformed copies. Rendered instead of the committed list, never
    /// stored until pointer-up.
    preview: Option<Vec<Stroke>>,
    hovered: Option<String>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            gesture: Gesture::Idle,
            selection: Vec::new(),
            preview: None,
            hovered: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn transform(&self, origin: Pos2) -> CanvasTransform {
        CanvasTransform {
            origin,
            pan: self.pan,
            zoom: self.zoom,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning)
    }

    pub fn is_transforming(&self) -> bool {
        matches!(self.gesture, Gesture::Transforming(_))
    }

    pub fn selection(&self) -> &[Stroke] {
        &self.selection
    }

    pub fn selection_bounds(&self) -> Option<BoundingBox> {
        bounding_box(&self.selection)
    }

    pub fn hovered_id(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The list to render instead of the committed one while transforming.
    pub fn preview_strokes(&self) -> Option<&[Stroke]> {
        self.preview.as_deref()
    }

    /// The stroke currently being dragged, if any.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        match &self.gesture {
            Gesture::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }

    pub fn text_session_mut(&mut self) -> Option<&mut TextSession> {
        match &mut self.gesture {
            Gesture::TextEditing(session) => Some(session),
            _ => None,
        }
    }

    /// Pointer press in document coordinates.
    pub fn pointer_down(
        &mut self,
        point: Pos2,
        button: PointerButton,
        tool: Tool,
        settings: &ToolSettings,
        background: Color32,
        history: &mut StrokeHistory,
        now_ms: f64,
    ) {
        // A press anywhere outside the text input commits it, like blur.
        if matches!(self.gesture, Gesture::TextEditing(_)) {
            self.commit_text(settings.pen, history);
        }

        if button == PointerButton::Middle {
            self.gesture = Gesture::Panning;
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        match tool {
            Tool::EraserPlus => {
                self.gesture = Gesture::Erasing;
                self.delete_stroke_at(point, history);
                return;
            }
            Tool::Text => {
                self.selection.clear();
                self.gesture = Gesture::TextEditing(TextSession {
                    anchor: point,
                    buffer: String::new(),
                    focused: false,
                });
                return;
            }
            _ => {}
        }

        // A press on the selection starts a transform; outside it, the
        // selection clears and the press falls through to drawing.
        if !self.selection.is_empty() {
            if let Some(bounds) = bounding_box(&self.selection) {
                let handle = SCALE_HANDLE_SIZE / self.zoom;
                if point.x > bounds.max_x - handle && point.y > bounds.max_y - handle {
                    self.gesture = Gesture::Transforming(TransformDrag {
                        kind: TransformKind::Scale,
                        start_point: point,
                        start_bounds: bounds,
                    });
                    return;
                }
                if point.x > bounds.min_x
                    && point.x < bounds.max_x
                    && point.y > bounds.min_y
                    && point.y < bounds.max_y
                {
                    self.gesture = Gesture::Transforming(TransformDrag {
                        kind: TransformKind::Move,
                        start_point: point,
                        start_bounds: bounds,
                    });
                    return;
                }
            }
            self.selection.clear();
        }

        let stroke = match tool {
            Tool::Pen => Stroke::new(
                settings.pen,
                StrokeGeometry::Path {
                    points: vec![point],
                },
            ),
            Tool::Highlighter => Stroke::new(
                // Internal color only marks the live path; the committed
                // render substitutes the fixed highlighter ink.
                PenConfig {
                    size: settings.highlighter_size,
                    color: Color32::RED,
                },
                StrokeGeometry::Timed {
                    points: vec![point],
                    created_at: now_ms,
                },
            ),
            Tool::Eraser => Stroke::new(
                // The plain eraser paints with the page background.
                PenConfig {
                    size: settings.eraser_size,
                    color: background,
                },
                StrokeGeometry::Path {
                    points: vec![point],
                },
            ),
            Tool::Lasso => Stroke::new(
                PenConfig {
                    size: 1.0,
                    color: SELECTION_COLOR,
                },
                StrokeGeometry::Lasso {
                    points: vec![point],
                },
            ),
            _ => match tool.shape_kind() {
                Some(kind) => Stroke::new(
                    settings.pen,
                    StrokeGeometry::Shape {
                        kind,
                        start: point,
                        end: point,
                    },
                ),
                None => return,
            },
        };
        self.gesture = Gesture::Drawing { stroke };
    }

    /// Pointer motion. `point` is in document coordinates, `raw_delta` the
    /// unscaled screen-pixel motion used for panning.
    pub fn pointer_move(
        &mut self,
        point: Pos2,
        raw_delta: Vec2,
        tool: Tool,
        history: &mut StrokeHistory,
    ) {
        if matches!(self.gesture, Gesture::Panning) {
            self.pan += raw_delta;
            return;
        }
        if matches!(self.gesture, Gesture::Erasing) {
            self.delete_stroke_at(point, history);
            return;
        }
        if let Gesture::Transforming(drag) = &self.gesture {
            let transformed = geometry::transform_strokes(
                &self.selection,
                &drag.start_bounds,
                point,
                drag.kind,
                drag.start_point,
            );
            let selected: HashSet<&str> = self.selection.iter().map(|s| s.id.as_str()).collect();
            let mut preview: Vec<Stroke> = history
                .current()
                .iter()
                .filter(|s| !selected.contains(s.id.as_str()))
                .cloned()
                .collect();
            preview.extend(transformed);
            self.preview = Some(preview);
            return;
        }
        if let Gesture::Drawing { stroke } = &mut self.gesture {
            stroke.extend_to(point);
            return;
        }
        if tool == Tool::EraserPlus {
            self.update_hover(point, history);
        }
    }

    /// Pointer release: ends the active gesture and applies its commit
    /// policy. Returns an advisory message, if any.
    pub fn pointer_up(&mut self, history: &mut StrokeHistory) -> Option<String> {
        match std::mem::take(&mut self.gesture) {
            // Text editing outlives the press that opened it.
            session @ Gesture::TextEditing(_) => {
                self.gesture = session;
                None
            }
            Gesture::Idle | Gesture::Panning | Gesture::Erasing => None,
            Gesture::Transforming(_) => {
                if let Some(preview) = self.preview.take() {
                    let selected: HashSet<String> =
                        self.selection.iter().map(|s| s.id.clone()).collect();
                    history.push(preview.clone());
                    // Selection follows the transformed copies, matched by id.
                    self.selection = preview
                        .into_iter()
                        .filter(|s| selected.contains(&s.id))
                        .collect();
                }
                None
            }
            Gesture::Drawing { stroke } => self.commit_stroke(stroke, history),
        }
    }

    fn commit_stroke(&mut self, stroke: Stroke, history: &mut StrokeHistory) -> Option<String> {
        match &stroke.geometry {
            StrokeGeometry::Lasso { points } => {
                // The lasso itself is discarded; it only computes a selection.
                self.selection = if points.len() >= 3 {
                    history
                        .current()
                        .iter()
                        .filter(|s| {
                            representative_points(s)
                                .iter()
                                .any(|p| geometry::point_in_polygon(*p, points))
                        })
                        .cloned()
                        .collect()
                } else {
                    Vec::new()
                };
                Some(format!("{} item(s) selected", self.selection.len()))
            }
            StrokeGeometry::Shape { .. } => {
                let mut strokes = history.current().clone();
                strokes.push(stroke.clone());
                history.push(strokes);
                // A fresh shape is immediately transformable.
                self.selection = vec![stroke];
                None
            }
            StrokeGeometry::Path { .. } | StrokeGeometry::Timed { .. } => {
                let mut strokes = history.current().clone();
                strokes.push(stroke);
                history.push(strokes);
                None
            }
            StrokeGeometry::Text { .. } => None,
        }
    }

    /// Delete the topmost committed stroke under `point`, as an undoable
    /// history entry. Text hits on its bounding box; everything else needs a
    /// path segment within `(width/2 + slop)/zoom`.
    pub fn delete_stroke_at(&mut self, point: Pos2, history: &mut StrokeHistory) -> bool {
        let strokes = history.current();
        let mut target: Option<String> = None;

        'scan: for stroke in strokes.iter().rev() {
            let Some(bounds) = stroke_bounds(stroke) else {
                continue;
            };
            if !bounds.contains(point) {
                continue;
            }
            if matches!(stroke.geometry, StrokeGeometry::Text { .. }) {
                target = Some(stroke.id.clone());
                break 'scan;
            }
            if let Some(points) = stroke.path_points() {
                let threshold = (stroke.config.size / 2.0 + ERASER_HIT_SLOP) / self.zoom;
                for pair in points.windows(2) {
                    if geometry::distance_to_segment(point, pair[0], pair[1]) < threshold {
                        target = Some(stroke.id.clone());
                        break 'scan;
                    }
                }
            }
        }

        let Some(id) = target else {
            return false;
        };
        log::debug!("smart eraser deleting stroke {id}");
        let filtered: Vec<Stroke> = strokes.iter().filter(|s| s.id != id).cloned().collect();
        history.push(filtered);
        if self.hovered.as_deref() == Some(&id) {
            self.hovered = None;
        }
        true
    }

    fn update_hover(&mut self, point: Pos2, history: &StrokeHistory) {
        let threshold = HOVER_DISTANCE / self.zoom;
        self.hovered = history.current().iter().rev().find_map(|stroke| {
            let points = stroke.path_points()?;
            points
                .windows(2)
                .any(|pair| geometry::distance_to_segment(point, pair[0], pair[1]) < threshold)
                .then(|| stroke.id.clone())
        });
    }

    /// Wheel zoom around the pointer: the world point under the cursor stays
    /// fixed on screen. `pointer` and `origin` are in screen coordinates.
    pub fn wheel_zoom(&mut self, pointer: Pos2, origin: Pos2, scroll_y: f32) {
        if scroll_y == 0.0 {
            return;
        }
        let mouse = pointer - origin;
        let factor = if scroll_y > 0.0 { 1.1 } else { 0.9 };
        let new_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let world = (mouse - self.pan) / self.zoom;
        self.pan = mouse - world * new_zoom;
        self.zoom = new_zoom;
    }

    /// Drop highlighters past their lifespan from the committed list.
    ///
    /// Expiry must never be undoable (or redoable back into existence), so it
    /// rewrites the current snapshot in place, computed from the *current*
    /// snapshot rather than anything captured earlier.
    pub fn prune_expired(&mut self, history: &mut StrokeHistory, now_ms: f64) -> bool {
        let strokes = history.current();
        let live: Vec<Stroke> = strokes
            .iter()
            .filter(|s| match s.created_at() {
                Some(created_at) => now_ms - created_at < HIGHLIGHTER_LIFESPAN_MS,
                None => true,
            })
            .cloned()
            .collect();
        if live.len() == strokes.len() {
            return false;
        }
        history.replace_current(live);
        true
    }

    /// Commit the open text session as a text stroke; empty input is
    /// discarded.
    pub fn commit_text(&mut self, pen: PenConfig, history: &mut StrokeHistory) {
        if let Gesture::TextEditing(session) = std::mem::take(&mut self.gesture) {
            let text = session.buffer.trim_end();
            if text.trim().is_empty() {
                return;
            }
            let stroke = Stroke::new(
                pen,
                StrokeGeometry::Text {
                    anchor: session.anchor,
                    text: text.to_owned(),
                },
            );
            let mut strokes = history.current().clone();
            strokes.push(stroke);
            history.push(strokes);
        }
    }

    /// Abort the open text session, discarding its content.
    pub fn cancel_text(&mut self) {
        if matches!(self.gesture, Gesture::TextEditing(_)) {
            self.gesture = Gesture::Idle;
        }
    }
}

/// Whether any committed highlighter exists; drives the continuous repaint
/// loop (fade/glow animate only while one is alive).
pub fn has_highlighters(strokes: &[Stroke]) -> bool {
    strokes.iter().any(|s| s.is_highlighter())
}
