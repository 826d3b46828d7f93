use egui::{Color32, PointerButton, Pos2, Vec2};
use whiteboard::canvas::CanvasController;
use whiteboard::history::StrokeHistory;
use whiteboard::stroke::{PenConfig, Stroke, StrokeGeometry};
use whiteboard::tools::{Tool, ToolSettings};

fn stroke_at(x: f32, y: f32) -> Stroke {
    Stroke::new(
        PenConfig::default(),
        StrokeGeometry::Path {
            points: vec![Pos2::new(x, y), Pos2::new(x + 1.0, y)],
        },
    )
}

// Three committed strokes: two inside the unit square around the origin, one
// far away.
fn seeded_history() -> StrokeHistory {
    let mut history = StrokeHistory::new();
    history.push(vec![
        stroke_at(5.0, 5.0),
        stroke_at(20.0, 20.0),
        stroke_at(100.0, 100.0),
    ]);
    history
}

fn lasso(canvas: &mut CanvasController, history: &mut StrokeHistory, path: &[Pos2]) -> Option<String> {
    let settings = ToolSettings::default();
    canvas.pointer_down(
        path[0],
        PointerButton::Primary,
        Tool::Lasso,
        &settings,
        Color32::WHITE,
        history,
        0.0,
    );
    for point in &path[1..] {
        canvas.pointer_move(*point, Vec2::ZERO, Tool::Lasso, history);
    }
    canvas.pointer_up(history)
}

const SQUARE: [Pos2; 4] = [
    Pos2::new(0.0, 0.0),
    Pos2::new(30.0, 0.0),
    Pos2::new(30.0, 30.0),
    Pos2::new(0.0, 30.0),
];

#[test]
fn test_lasso_selects_enclosed_strokes_without_committing() {
    let mut canvas = CanvasController::new();
    let mut history = seeded_history();
    let entries_before = history.stack().len();

    let message = lasso(&mut canvas, &mut history, &SQUARE);

    assert_eq!(message.as_deref(), Some("2 item(s) selected"));
    assert_eq!(canvas.selection().len(), 2);
    // The lasso path itself never lands in the document.
    assert_eq!(history.current().len(), 3);
    assert_eq!(history.stack().len(), entries_before);
}

#[test]
fn test_degenerate_lasso_clears_the_selection() {
    let mut canvas = CanvasController::new();
    let mut history = seeded_history();
    lasso(&mut canvas, &mut history, &SQUARE);
    assert_eq!(canvas.selection().len(), 2);

    let message = lasso(
        &mut canvas,
        &mut history,
        &[Pos2::new(200.0, 200.0), Pos2::new(201.0, 200.0)],
    );
    assert_eq!(message.as_deref(), Some("0 item(s) selected"));
    assert!(canvas.selection().is_empty());
}

#[test]
fn test_move_drag_translates_the_selection() {
    let mut canvas = CanvasController::new();
    let mut history = seeded_history();
    let settings = ToolSettings::default();
    lasso(&mut canvas, &mut history, &SQUARE);

    // Press inside the selection bounds and drag by (5, 5).
    canvas.pointer_down(
        Pos2::new(10.0, 10.0),
        PointerButton::Primary,
        Tool::Lasso,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    assert!(canvas.is_transforming());
    canvas.pointer_move(Pos2::new(15.0, 15.0), Vec2::ZERO, Tool::Lasso, &mut history);

    // Still a preview: the committed list is untouched until release.
    assert!(canvas.preview_strokes().is_some());
    assert_eq!(history.current()[0].path_points().unwrap()[0], Pos2::new(5.0, 5.0));

    canvas.pointer_up(&mut history);
    assert!(canvas.preview_strokes().is_none());

    let strokes = history.current();
    assert_eq!(strokes.len(), 3);
    let moved: Vec<Pos2> = strokes
        .iter()
        .filter_map(|s| s.path_points())
        .map(|p| p[0])
        .collect();
    assert!(moved.contains(&Pos2::new(10.0, 10.0)));
    assert!(moved.contains(&Pos2::new(25.0, 25.0)));
    // The stroke outside the lasso stays put.
    assert!(moved.contains(&Pos2::new(100.0, 100.0)));

    // The move is one undoable step.
    history.undo();
    let restored: Vec<Pos2> = history
        .current()
        .iter()
        .filter_map(|s| s.path_points())
        .map(|p| p[0])
        .collect();
    assert!(restored.contains(&Pos2::new(5.0, 5.0)));
}

#[test]
fn test_selection_follows_the_moved_strokes() {
    let mut canvas = CanvasController::new();
    let mut history = seeded_history();
    let settings = ToolSettings::default();
    lasso(&mut canvas, &mut history, &SQUARE);

    canvas.pointer_down(
        Pos2::new(10.0, 10.0),
        PointerButton::Primary,
        Tool::Lasso,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    canvas.pointer_move(Pos2::new(15.0, 15.0), Vec2::ZERO, Tool::Lasso, &mut history);
    canvas.pointer_up(&mut history);

    assert_eq!(canvas.selection().len(), 2);
    let bounds = canvas.selection_bounds().unwrap();
    assert!(bounds.min_x >= 2.0);
    assert!(bounds.contains(Pos2::new(10.0, 10.0)));
}

#[test]
fn test_corner_drag_scales_around_the_top_left() {
    let mut canvas = CanvasController::new();
    let mut history = StrokeHistory::new();
    let settings = ToolSettings::default();

    // A committed rectangle auto-selects; bounds are (10,10)..(30,40).
    canvas.pointer_down(
        Pos2::new(10.0, 10.0),
        PointerButton::Primary,
        Tool::Rectangle,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    canvas.pointer_move(Pos2::new(30.0, 40.0), Vec2::ZERO, Tool::Rectangle, &mut history);
    canvas.pointer_up(&mut history);

    // Press inside the 10 px handle region at the bottom-right corner.
    canvas.pointer_down(
        Pos2::new(28.0, 38.0),
        PointerButton::Primary,
        Tool::Lasso,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    assert!(canvas.is_transforming());
    canvas.pointer_move(Pos2::new(50.0, 80.0), Vec2::ZERO, Tool::Lasso, &mut history);
    canvas.pointer_up(&mut history);

    // Per-axis scale anchored at (10,10): the dragged corner lands on the
    // pointer, and the stroke width follows the smaller factor.
    match history.current()[0].geometry {
        StrokeGeometry::Shape { start, end, .. } => {
            assert_eq!(start, Pos2::new(10.0, 10.0));
            assert!((end.x - 50.0).abs() < 0.001);
            assert!((end.y - 80.0).abs() < 0.001);
        }
        _ => panic!("expected a shape"),
    }
    let scale_x: f32 = (50.0 - 10.0) / 20.0;
    assert_eq!(
        history.current()[0].config.size,
        PenConfig::default().size * scale_x
    );
}

#[test]
fn test_press_outside_the_selection_clears_it() {
    let mut canvas = CanvasController::new();
    let mut history = seeded_history();
    let settings = ToolSettings::default();
    lasso(&mut canvas, &mut history, &SQUARE);
    assert_eq!(canvas.selection().len(), 2);

    canvas.pointer_down(
        Pos2::new(200.0, 5.0),
        PointerButton::Primary,
        Tool::Pen,
        &settings,
        Color32::WHITE,
        &mut history,
        0.0,
    );
    assert!(canvas.selection().is_empty());
    // The press falls through and starts a pen stroke.
    assert!(canvas.current_stroke().is_some());
    canvas.pointer_up(&mut history);
    assert_eq!(history.current().len(), 4);
}
