use egui::{Color32, PointerButton, Pos2, Vec2};
use whiteboard::canvas::{CanvasController, ZOOM_MAX, ZOOM_MIN};
use whiteboard::history::StrokeHistory;
use whiteboard::stroke::{PenConfig, Stroke, StrokeGeometry};
use whiteboard::tools::{Tool, ToolSettings};

fn horizontal_stroke(y: f32) -> Stroke {
    Stroke::new(
        PenConfig {
            size: 4.0,
            color: Color32::BLACK,
        },
        StrokeGeometry::Path {
            points: vec![Pos2::new(0.0, y), Pos2::new(20.0, y)],
        },
    )
}

fn highlighter(created_at: f64) -> Stroke {
    Stroke::new(
        PenConfig {
            size: 20.0,
            color: Color32::RED,
        },
        StrokeGeometry::Timed {
            points: vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0)],
            created_at,
        },
    )
}

#[test]
fn test_smart_eraser_deletes_the_topmost_hit() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    let settings = ToolSettings::default();

    // Two nearly coincident strokes; the later one is on top.
    let bottom = horizontal_stroke(0.0);
    let top = horizontal_stroke(1.0);
    let top_id = top.id.clone();
    history.push(vec![bottom.clone()]);
    history.push(vec![bottom.clone(), top]);

    canvas.pointer_down(
        Pos2::new(10.0, 0.5),
        PointerButton::Primary,
        Tool::EraserPlus,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    canvas.pointer_up(&mut history);

    let remaining = history.current();
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].id, top_id);

    // The deletion is one undoable step.
    history.undo();
    assert_eq!(history.current().len(), 2);
}

#[test]
fn test_smart_eraser_misses_outside_the_hit_distance() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    let settings = ToolSettings::default();
    history.push(vec![horizontal_stroke(0.0)]);

    // Width 4 gives a hit threshold of 4/2 + 5 = 7, but the bounding box
    // gate (outset by width/2) rejects the press first.
    canvas.pointer_down(
        Pos2::new(10.0, 9.0),
        PointerButton::Primary,
        Tool::EraserPlus,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    canvas.pointer_up(&mut history);

    assert_eq!(history.current().len(), 1);
}

#[test]
fn test_smart_eraser_removes_text_by_bounding_box() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    let settings = ToolSettings::default();
    history.push(vec![Stroke::new(
        PenConfig::default(),
        StrokeGeometry::Text {
            anchor: Pos2::new(10.0, 10.0),
            text: "hello".to_owned(),
        },
    )]);

    canvas.pointer_down(
        Pos2::new(20.0, 15.0),
        PointerButton::Primary,
        Tool::EraserPlus,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    canvas.pointer_up(&mut history);

    assert!(history.current().is_empty());
}

#[test]
fn test_hover_tracks_the_topmost_stroke_under_the_pointer() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();

    let bottom = horizontal_stroke(0.0);
    let top = horizontal_stroke(1.0);
    let top_id = top.id.clone();
    history.push(vec![bottom, top]);

    canvas.pointer_move(
        Pos2::new(10.0, 0.5),
        Vec2::ZERO,
        Tool::EraserPlus,
        &mut history,
    );
    assert_eq!(canvas.hovered_id(), Some(top_id.as_str()));

    canvas.pointer_move(
        Pos2::new(10.0, 50.0),
        Vec2::ZERO,
        Tool::EraserPlus,
        &mut history,
    );
    assert_eq!(canvas.hovered_id(), None);
}

#[test]
fn test_expired_highlighters_are_pruned_without_a_history_entry() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();

    let pen = horizontal_stroke(0.0);
    history.push(vec![pen.clone()]);
    history.push(vec![pen.clone(), highlighter(1000.0)]);
    let index_before = history.index();

    // Not expired yet.
    assert!(!canvas.prune_expired(&mut history, 5000.0));
    assert_eq!(history.current().len(), 2);

    // Past the 5 s lifespan.
    assert!(canvas.prune_expired(&mut history, 6001.0));
    assert_eq!(history.current().len(), 1);
    assert_eq!(history.index(), index_before);

    // Undoing past the prune and redoing must not resurrect the highlighter.
    history.undo();
    assert_eq!(history.current().len(), 1);
    history.redo();
    assert_eq!(history.current().len(), 1);
    assert!(!history.current().iter().any(|s| s.is_highlighter()));
}

#[test]
fn test_prune_keeps_live_highlighters() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    history.push(vec![highlighter(0.0), highlighter(4000.0)]);

    assert!(canvas.prune_expired(&mut history, 5500.0));
    let remaining = history.current();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].created_at(), Some(4000.0));
}

#[test]
fn test_middle_button_pans_the_view() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    let settings = ToolSettings::default();

    canvas.pointer_down(
        Pos2::new(50.0, 50.0),
        PointerButton::Middle,
        Tool::Pen,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    assert!(canvas.is_panning());
    canvas.pointer_move(Pos2::new(55.0, 53.0), Vec2::new(5.0, 3.0), Tool::Pen, &mut history);
    canvas.pointer_move(Pos2::new(60.0, 56.0), Vec2::new(5.0, 3.0), Tool::Pen, &mut history);
    canvas.pointer_up(&mut history);

    let transform = canvas.transform(Pos2::ZERO);
    assert_eq!(transform.pan, Vec2::new(10.0, 6.0));
    // Nothing was drawn or committed.
    assert!(history.current().is_empty());
    assert!(!history.can_undo());
}

#[test]
fn test_wheel_zoom_keeps_the_point_under_the_cursor_fixed() {
    let mut canvas = CanvasController::new();
    let origin = Pos2::new(100.0, 50.0);
    let pointer = Pos2::new(300.0, 250.0);

    let doc_before = canvas.transform(origin).to_doc(pointer);
    canvas.wheel_zoom(pointer, origin, 40.0);
    assert!(canvas.zoom() > 1.0);

    let screen_after = canvas.transform(origin).to_screen(doc_before);
    assert!((screen_after - pointer).length() < 0.01);
}

#[test]
fn test_zoom_clamps_at_both_ends() {
    let mut canvas = CanvasController::new();
    let pointer = Pos2::new(10.0, 10.0);

    for _ in 0..100 {
        canvas.wheel_zoom(pointer, Pos2::ZERO, -1.0);
    }
    assert_eq!(canvas.zoom(), ZOOM_MIN);

    for _ in 0..100 {
        canvas.wheel_zoom(pointer, Pos2::ZERO, 1.0);
    }
    assert_eq!(canvas.zoom(), ZOOM_MAX);
}
