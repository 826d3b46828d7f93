//! Pure geometric queries over strokes: bounding boxes, regular-polygon
//! vertices, point-in-polygon, segment distance and the move/scale transform.
//!
//! Nothing here mutates its input or fails: malformed or degenerate strokes
//! degrade to `None`/empty results so a single bad stroke can never take down
//! a render or hit-test pass.

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::stroke::{ShapeKind, Stroke, StrokeGeometry};

/// Axis-aligned bounding box in document coordinates.
///
/// Built up from infinity seeds; a box that never saw a point stays inverted
/// (`min_x > max_x`) and is reported as `None` at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    fn include(&mut self, p: Pos2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    fn from_points<'a>(points: impl IntoIterator<Item = &'a Pos2>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(*p);
        }
        bounds
    }

    fn outset(self, amount: f32) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn top_left(&self) -> Pos2 {
        Pos2::new(self.min_x, self.min_y)
    }

    pub fn bottom_right(&self) -> Pos2 {
        Pos2::new(self.max_x, self.max_y)
    }

    pub fn contains(&self, p: Pos2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Vertices of a regular-polygon stroke (triangle/pentagon/hexagon).
///
/// `start` is the center, `end` the first vertex; the remaining vertices are
/// spaced evenly on the circle through `end`, so vertex 0 always coincides
/// with the dragged point. Empty for every other geometry.
pub fn polygon_vertices(stroke: &Stroke) -> Vec<Pos2> {
    let StrokeGeometry::Shape { kind, start, end } = stroke.geometry else {
        return Vec::new();
    };
    let Some(sides) = kind.polygon_sides() else {
        return Vec::new();
    };

    let d = end - start;
    let radius = d.length();
    let rotation = d.y.atan2(d.x);

    (0..sides)
        .map(|i| {
            let angle = rotation + i as f32 * std::f32::consts::TAU / sides as f32;
            Pos2::new(
                start.x + radius * angle.cos(),
                start.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Bounding box of a single stroke, or `None` for malformed/empty ones.
///
/// Free-form paths, lines and polygons are outset by half the stroke width;
/// rectangle and circle report exact geometric extents; text uses a crude
/// character-count heuristic rather than real glyph metrics.
pub fn stroke_bounds(stroke: &Stroke) -> Option<BoundingBox> {
    let size = stroke.config.size;
    match &stroke.geometry {
        StrokeGeometry::Text { anchor, text } => {
            if text.is_empty() {
                return None;
            }
            let lines: Vec<&str> = text.split('\n').collect();
            let line_height = size * 1.2;
            let height = lines.len() as f32 * line_height;
            let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let max_width = max_chars as f32 * size * 0.6;
            Some(BoundingBox {
                min_x: anchor.x,
                min_y: anchor.y,
                max_x: anchor.x + max_width,
                max_y: anchor.y + height,
            })
        }
        StrokeGeometry::Shape { kind, start, end } => {
            if kind.polygon_sides().is_some() {
                let vertices = polygon_vertices(stroke);
                if vertices.is_empty() {
                    return None;
                }
                return Some(BoundingBox::from_points(&vertices).outset(size / 2.0));
            }
            match kind {
                ShapeKind::Rectangle => Some(BoundingBox {
                    min_x: start.x.min(end.x),
                    min_y: start.y.min(end.y),
                    max_x: start.x.max(end.x),
                    max_y: start.y.max(end.y),
                }),
                ShapeKind::Circle => {
                    let radius = (*end - *start).length();
                    Some(BoundingBox {
                        min_x: start.x - radius,
                        min_y: start.y - radius,
                        max_x: start.x + radius,
                        max_y: start.y + radius,
                    })
                }
                // Line: envelope of the two anchors, outset like a path.
                _ => Some(BoundingBox::from_points([start, end]).outset(size / 2.0)),
            }
        }
        StrokeGeometry::Path { points }
        | StrokeGeometry::Timed { points, .. }
        | StrokeGeometry::Lasso { points } => {
            if points.is_empty() {
                return None;
            }
            Some(BoundingBox::from_points(points).outset(size / 2.0))
        }
    }
}

/// Union of the bounding boxes of a stroke set.
///
/// `None` when the set is empty or no stroke contributes a box.
pub fn bounding_box(strokes: &[Stroke]) -> Option<BoundingBox> {
    let mut bounds = BoundingBox::empty();
    for stroke in strokes {
        if let Some(b) = stroke_bounds(stroke) {
            bounds.include(b.top_left());
            bounds.include(b.bottom_right());
        }
    }
    if bounds.is_empty() {
        None
    } else {
        Some(bounds)
    }
}

/// Even-odd ray-casting containment test.
///
/// Degenerate for polygons with fewer than 3 vertices; callers guard.
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);
        if (yi > point.y) != (yj > point.y)
            && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Euclidean distance from `p` to the closest point on segment `a`-`b`.
///
/// Falls back to plain point distance when the segment has zero length.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let len_sq = (a - b).length_sq();
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    let closest = Pos2::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    (p - closest).length()
}

/// Which transform a selection drag applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    Move,
    Scale,
}

/// Representative points used by the lasso containment query.
///
/// Rectangle contributes its four corners, line its endpoints, circle its
/// center, regular polygons their vertices, everything else its raw path
/// (text: the anchor).
pub fn representative_points(stroke: &Stroke) -> Vec<Pos2> {
    match &stroke.geometry {
        StrokeGeometry::Shape { kind, start, end } => match kind {
            ShapeKind::Rectangle => vec![
                Pos2::new(start.x, start.y),
                Pos2::new(end.x, start.y),
                Pos2::new(end.x, end.y),
                Pos2::new(start.x, end.y),
            ],
            ShapeKind::Line => vec![*start, *end],
            ShapeKind::Circle => vec![*start],
            _ => polygon_vertices(stroke),
        },
        StrokeGeometry::Text { anchor, .. } => vec![*anchor],
        StrokeGeometry::Path { points }
        | StrokeGeometry::Timed { points, .. }
        | StrokeGeometry::Lasso { points } => points.clone(),
    }
}

/// Move or scale a stroke set, producing new strokes with the same ids.
///
/// Move translates every point and anchor by `current - start`. Scale anchors
/// at the top-left of `original_bounds` and maps everything by the ratio of
/// the dragged extent to the original extent; a zero original extent forces
/// the corresponding factor to 1 instead of dividing by zero. Stroke width
/// scales uniformly by the smaller factor.
pub fn transform_strokes(
    strokes: &[Stroke],
    original_bounds: &BoundingBox,
    current: Pos2,
    kind: TransformKind,
    start: Pos2,
) -> Vec<Stroke> {
    match kind {
        TransformKind::Move => {
            let delta = current - start;
            strokes
                .iter()
                .map(|stroke| map_stroke_points(stroke, 1.0, |p| p + delta))
                .collect()
        }
        TransformKind::Scale => {
            let original_width = original_bounds.width();
            let original_height = original_bounds.height();
            let scale_x = if original_width == 0.0 {
                1.0
            } else {
                (current.x - original_bounds.min_x) / original_width
            };
            let scale_y = if original_height == 0.0 {
                1.0
            } else {
                (current.y - original_bounds.min_y) / original_height
            };
            let anchor = original_bounds.top_left();
            strokes
                .iter()
                .map(|stroke| {
                    map_stroke_points(stroke, scale_x.min(scale_y), |p| {
                        Pos2::new(
                            anchor.x + (p.x - anchor.x) * scale_x,
                            anchor.y + (p.y - anchor.y) * scale_y,
                        )
                    })
                })
                .collect()
        }
    }
}

fn map_stroke_points(stroke: &Stroke, size_factor: f32, f: impl Fn(Pos2) -> Pos2) -> Stroke {
    let geometry = match &stroke.geometry {
        StrokeGeometry::Path { points } => StrokeGeometry::Path {
            points: points.iter().copied().map(&f).collect(),
        },
        StrokeGeometry::Timed { points, created_at } => StrokeGeometry::Timed {
            points: points.iter().copied().map(&f).collect(),
            created_at: *created_at,
        },
        StrokeGeometry::Shape { kind, start, end } => StrokeGeometry::Shape {
            kind: *kind,
            start: f(*start),
            end: f(*end),
        },
        StrokeGeometry::Text { anchor, text } => StrokeGeometry::Text {
            anchor: f(*anchor),
            text: text.clone(),
        },
        StrokeGeometry::Lasso { points } => StrokeGeometry::Lasso {
            points: points.iter().copied().map(&f).collect(),
        },
    };
    Stroke {
        id: stroke.id.clone(),
        config: crate::stroke::PenConfig {
            size: stroke.config.size * size_factor,
            color: stroke.config.color,
        },
        geometry,
    }
}
