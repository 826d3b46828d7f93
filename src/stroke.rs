use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long the glow layered under a fresh highlighter stroke lasts.
pub const HIGHLIGHTER_GLOW_DURATION_MS: f64 = 1500.0;
/// Total lifetime of a highlighter stroke before it is pruned.
pub const HIGHLIGHTER_LIFESPAN_MS: f64 = 5000.0;

/// Accent color for the lasso path, selection box and smart-eraser hover.
pub const SELECTION_COLOR: Color32 = Color32::from_rgb(0x0e, 0xa5, 0xe9);

/// Pen colors offered by the toolbar palette.
pub const PALETTE: [Color32; 8] = [
    Color32::from_rgb(0x00, 0x00, 0x00),
    Color32::from_rgb(0xef, 0x44, 0x44),
    Color32::from_rgb(0xf9, 0x73, 0x16),
    Color32::from_rgb(0xea, 0xb3, 0x08),
    Color32::from_rgb(0x22, 0xc5, 0x5e),
    Color32::from_rgb(0x3b, 0x82, 0xf6),
    Color32::from_rgb(0x8b, 0x5c, 0xf6),
    Color32::from_rgb(0xec, 0x48, 0x99),
];

/// Stroke width and paint color, captured at creation time.
///
/// Shared by pen, highlighter and eraser strokes, shape outlines, and text
/// (where `size` doubles as the font size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenConfig {
    pub size: f32,
    pub color: Color32,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: Color32::BLACK,
        }
    }
}

/// The two-point shape kinds, defined by a drag anchor and its opposite end.
///
/// Regular polygons derive every vertex from `start` (center) and `end`
/// (first vertex); line and rectangle use the pair as endpoints/corners and
/// circle as center plus a radius vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
}

impl ShapeKind {
    /// Number of sides for the regular-polygon kinds, `None` otherwise.
    pub fn polygon_sides(self) -> Option<u32> {
        match self {
            ShapeKind::Triangle => Some(3),
            ShapeKind::Pentagon => Some(5),
            ShapeKind::Hexagon => Some(6),
            _ => None,
        }
    }
}

/// Per-kind stroke payload.
///
/// Which fields a stroke carries is a compile-time fact: a free-form path has
/// points, a two-point shape has only its anchors, text has an anchor and the
/// string. Geometry and rendering dispatch with an exhaustive match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrokeGeometry {
    /// Free-form polyline: pen and (paint-over) eraser.
    Path { points: Vec<Pos2> },
    /// Highlighter path, stamped with its creation time (ms) for fade/glow
    /// and lifespan expiry.
    Timed { points: Vec<Pos2>, created_at: f64 },
    /// Two-point shape dragged from `start` to `end`.
    Shape {
        kind: ShapeKind,
        start: Pos2,
        end: Pos2,
    },
    /// Multi-line text anchored at its top-left corner.
    Text { anchor: Pos2, text: String },
    /// Selection path; computes a selection on release and is never committed.
    Lasso { points: Vec<Pos2> },
}

/// One drawable unit with a stable identity.
///
/// Immutable once committed; the move/scale transform replaces the whole
/// stroke with a geometry-adjusted copy that keeps the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: String,
    pub config: PenConfig,
    pub geometry: StrokeGeometry,
}

impl Stroke {
    pub fn new(config: PenConfig, geometry: StrokeGeometry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            geometry,
        }
    }

    pub fn is_highlighter(&self) -> bool {
        matches!(self.geometry, StrokeGeometry::Timed { .. })
    }

    pub fn is_lasso(&self) -> bool {
        matches!(self.geometry, StrokeGeometry::Lasso { .. })
    }

    /// Creation timestamp (ms), present only for highlighter strokes.
    pub fn created_at(&self) -> Option<f64> {
        match self.geometry {
            StrokeGeometry::Timed { created_at, .. } => Some(created_at),
            _ => None,
        }
    }

    /// The free-form point path, if this stroke has one.
    ///
    /// Two-point shapes and text carry no path, so callers doing per-segment
    /// work (the smart eraser, hover) fall back to other gates for them.
    pub fn path_points(&self) -> Option<&[Pos2]> {
        match &self.geometry {
            StrokeGeometry::Path { points }
            | StrokeGeometry::Timed { points, .. }
            | StrokeGeometry::Lasso { points } => Some(points),
            _ => None,
        }
    }

    /// Extend an in-progress stroke with the next pointer position.
    ///
    /// Free-form kinds append to the path; two-point shapes track the drag by
    /// updating `end`. Text is committed in one step and never extended.
    pub fn extend_to(&mut self, point: Pos2) {
        match &mut self.geometry {
            StrokeGeometry::Path { points }
            | StrokeGeometry::Timed { points, .. }
            | StrokeGeometry::Lasso { points } => points.push(point),
            StrokeGeometry::Shape { end, .. } => *end = point,
            StrokeGeometry::Text { .. } => {}
        }
    }
}
