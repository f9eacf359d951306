use super::*;
use crate::draw::{Figure, LineMark, PointMark};
use std::cell::RefCell;
use std::rc::Rc;

fn create_test_figure() -> Figure {
    Figure::new(Bounds::new(0.0, 10.0, 0.0, 10.0))
}

fn create_test_tool(figure: &Figure) -> LineDrawTool {
    LineDrawTool::new(figure, Point::new(0.0, 0.0), LineStyle::default())
}

fn line_of(figure: &Figure, tool: &LineDrawTool) -> LineMark {
    let id = tool.line().expect("line exists");
    figure
        .mark(id)
        .and_then(Mark::as_line)
        .cloned()
        .expect("line mark on canvas")
}

fn endpoint_of(figure: &Figure, tool: &LineDrawTool) -> PointMark {
    let id = tool.endpoint().expect("endpoint exists");
    figure
        .mark(id)
        .and_then(Mark::as_point)
        .cloned()
        .expect("point mark on canvas")
}

/// Mimics the host canvas: the dragged point moves itself, then the tool hears about it.
fn drag_endpoint(figure: &mut Figure, tool: &mut LineDrawTool, path: &[Point]) {
    let id = tool.endpoint().expect("endpoint exists");
    tool.on_endpoint_drag_start(figure);
    for at in path {
        if let Some(point) = figure.mark_mut(id).and_then(Mark::as_point_mut) {
            point.position = *at;
        }
        tool.on_endpoint_drag(figure, *at);
    }
    tool.on_endpoint_drag_end(figure);
}

fn commit_line(figure: &mut Figure, tool: &mut LineDrawTool, at: Point) {
    tool.activate(figure);
    tool.on_pointer_move(figure, Point::new(1.0, 1.0));
    tool.on_pointer_move(figure, at);
    tool.on_click(figure, at);
}

#[test]
fn activate_installs_tool_listener() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    assert_eq!(figure.interaction(), Interaction::PanZoom);

    tool.activate(&mut figure);

    assert_eq!(figure.interaction(), Interaction::Tool(TOOL_ID));
    assert!(tool.is_listening());
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());
}

#[test]
fn moves_before_activation_are_ignored() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);

    tool.on_pointer_move(&mut figure, Point::new(3.0, 3.0));
    tool.on_click(&mut figure, Point::new(3.0, 3.0));

    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());
}

#[test]
fn first_move_creates_line_following_cursor() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.activate(&mut figure);

    tool.on_pointer_move(&mut figure, Point::new(2.0, 3.0));

    assert!(matches!(tool.state(), DrawState::FollowingCursor { .. }));
    let line = line_of(&figure, &tool);
    assert_eq!(line.start, Point::new(0.0, 0.0));
    assert_eq!(line.end, Point::new(2.0, 3.0));
    assert_eq!(figure.len(), 1);
}

#[test]
fn line_end_tracks_latest_cursor_and_base_never_moves() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.activate(&mut figure);

    let path = [
        Point::new(1.0, 1.0),
        Point::new(4.0, 2.5),
        Point::new(-3.0, 7.0),
        Point::new(9.5, 0.5),
    ];
    for at in path {
        tool.on_pointer_move(&mut figure, at);
        let line = line_of(&figure, &tool);
        assert_eq!(line.end, at);
        assert_eq!(line.start, tool.base());
    }
    assert_eq!(figure.len(), 1);
}

#[test]
fn click_commits_exactly_one_endpoint() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));

    assert!(matches!(tool.state(), DrawState::LineFixed { .. }));
    assert_eq!(figure.len(), 2);
    let endpoint = endpoint_of(&figure, &tool);
    assert_eq!(endpoint.position, Point::new(6.0, 4.0));
    assert!(endpoint.enable_move);
    assert_eq!(endpoint.hovered_cursor, Cursor::Grab);
    assert_eq!(line_of(&figure, &tool).end, Point::new(6.0, 4.0));

    assert_eq!(figure.interaction(), Interaction::None);
    assert!(!tool.is_listening());
    assert!(tool.line_drawn());
    assert_eq!(ViewerTool::tool_tip(&tool), UPDATE_TOOL_TIP);
}

#[test]
fn click_without_line_is_noop() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.activate(&mut figure);

    tool.on_click(&mut figure, Point::new(5.0, 5.0));

    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());
    assert!(!tool.line_drawn());
}

#[test]
fn click_after_commit_is_noop() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    let committed = tool.state();

    tool.on_click(&mut figure, Point::new(1.0, 9.0));
    tool.on_pointer_move(&mut figure, Point::new(1.0, 9.0));

    assert_eq!(tool.state(), committed);
    assert_eq!(figure.len(), 2);
    assert_eq!(endpoint_of(&figure, &tool).position, Point::new(6.0, 4.0));
}

#[test]
fn line_drawn_notifies_observers_once() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    tool.line_drawn_mut()
        .subscribe(move |drawn| sink.borrow_mut().push(*drawn));

    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    tool.on_click(&mut figure, Point::new(7.0, 4.0));
    tool.clear(&mut figure);

    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn deactivate_discards_uncommitted_line_idempotently() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.activate(&mut figure);
    tool.on_pointer_move(&mut figure, Point::new(2.0, 2.0));
    assert_eq!(figure.len(), 1);

    tool.deactivate(&mut figure);
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());
    assert_eq!(figure.interaction(), Interaction::PanZoom);
    assert!(!tool.is_listening());

    tool.deactivate(&mut figure);
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());
    assert_eq!(figure.interaction(), Interaction::PanZoom);
    assert_eq!(ViewerTool::tool_tip(&tool), DRAW_TOOL_TIP);
}

#[test]
fn deactivate_keeps_committed_line() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));

    tool.deactivate(&mut figure);

    assert!(matches!(tool.state(), DrawState::LineFixed { .. }));
    assert_eq!(figure.len(), 2);
    assert_eq!(figure.interaction(), Interaction::PanZoom);
    assert!(tool.line_drawn());
}

#[test]
fn reactivating_after_commit_does_not_rearm() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    tool.deactivate(&mut figure);

    tool.activate(&mut figure);

    assert_eq!(figure.interaction(), Interaction::None);
    assert!(!tool.is_listening());
    tool.on_pointer_move(&mut figure, Point::new(1.0, 1.0));
    assert_eq!(figure.len(), 2);
}

#[test]
fn clear_removes_everything_from_any_state() {
    // Inactive
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.clear(&mut figure);
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());

    // Following the cursor
    tool.activate(&mut figure);
    tool.on_pointer_move(&mut figure, Point::new(2.0, 2.0));
    tool.clear(&mut figure);
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(figure.is_empty());

    // Committed, cleared twice
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    tool.clear(&mut figure);
    tool.clear(&mut figure);
    assert_eq!(tool.state(), DrawState::Inactive);
    assert!(tool.line().is_none());
    assert!(tool.endpoint().is_none());
    assert!(figure.is_empty());
    assert!(!tool.line_drawn());
}

#[test]
fn clear_then_activate_allows_a_new_line() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    tool.clear(&mut figure);

    commit_line(&mut figure, &mut tool, Point::new(3.0, 8.0));

    assert!(tool.line_drawn());
    assert_eq!(figure.len(), 2);
    assert_eq!(endpoint_of(&figure, &tool).position, Point::new(3.0, 8.0));
}

#[test]
fn drag_moves_line_without_clamping_until_release() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    let endpoint = tool.endpoint().unwrap();

    tool.on_endpoint_drag_start(&mut figure);
    assert_eq!(endpoint_of(&figure, &tool).hovered_cursor, Cursor::Grabbing);

    if let Some(point) = figure.mark_mut(endpoint).and_then(Mark::as_point_mut) {
        point.position = Point::new(20.0, 5.0);
    }
    tool.on_endpoint_drag(&mut figure, Point::new(20.0, 5.0));
    assert_eq!(line_of(&figure, &tool).end, Point::new(20.0, 5.0));

    tool.on_endpoint_drag_end(&mut figure);
    let end = line_of(&figure, &tool).end;
    assert!((end.x - 4.9).abs() < 1e-9);
    assert!((end.y - 2.45).abs() < 1e-9);
    assert_eq!(endpoint_of(&figure, &tool).position, end);
    assert_eq!(endpoint_of(&figure, &tool).hovered_cursor, Cursor::Grab);
}

#[test]
fn drag_end_inside_bounds_leaves_endpoint_unchanged() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));

    drag_endpoint(
        &mut figure,
        &mut tool,
        &[Point::new(7.0, 5.0), Point::new(8.0, 9.0)],
    );

    assert_eq!(endpoint_of(&figure, &tool).position, Point::new(8.0, 9.0));
    assert_eq!(line_of(&figure, &tool).end, Point::new(8.0, 9.0));
}

#[test]
fn drag_end_clamps_relative_to_base_point() {
    let mut figure = create_test_figure();
    let mut tool = LineDrawTool::new(&figure, Point::new(2.0, 2.0), LineStyle::default());
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));

    drag_endpoint(&mut figure, &mut tool, &[Point::new(22.0, 7.0)]);

    let t = 0.4 * DEFAULT_BOUNDARY_INSET;
    let expected = Point::new(2.0 + 20.0 * t, 2.0 + 5.0 * t);
    let position = endpoint_of(&figure, &tool).position;
    assert!((position.x - expected.x).abs() < 1e-9);
    assert!((position.y - expected.y).abs() < 1e-9);
    assert_eq!(line_of(&figure, &tool).start, Point::new(2.0, 2.0));
}

#[test]
fn drag_events_without_endpoint_are_ignored() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    tool.activate(&mut figure);
    tool.on_pointer_move(&mut figure, Point::new(2.0, 2.0));

    tool.on_endpoint_drag_start(&mut figure);
    tool.on_endpoint_drag_end(&mut figure);

    assert!(matches!(tool.state(), DrawState::FollowingCursor { .. }));
    assert_eq!(line_of(&figure, &tool).end, Point::new(2.0, 2.0));
}

#[test]
fn on_mark_drag_ignores_foreign_marks() {
    let mut figure = create_test_figure();
    let mut tool = create_test_tool(&figure);
    commit_line(&mut figure, &mut tool, Point::new(6.0, 4.0));
    let other = figure.add_mark(Mark::draggable_point(Point::new(1.0, 1.0), BLACK));

    let handled = tool.on_mark_drag(&mut figure, other, DragPhase::Drag, Point::new(3.0, 3.0));

    assert!(!handled);
    assert_eq!(line_of(&figure, &tool).end, Point::new(6.0, 4.0));
}

#[test]
fn style_from_config_uses_configured_colors() {
    let mut config = LineToolConfig::default();
    config.line_color = crate::config::ColorSpec::Name("blue".to_string());
    config.boundary_inset = 0.9;
    let style = LineStyle::from(&config);
    assert_eq!(style.line_color, crate::draw::BLUE);
    assert_eq!(style.endpoint_color, BLACK);
    assert_eq!(style.boundary_inset, 0.9);
}

#[test]
fn coordinates_in_bounds_uses_base_and_style_inset() {
    let figure = create_test_figure();
    let style = LineStyle {
        boundary_inset: 0.9,
        ..LineStyle::default()
    };
    let tool = LineDrawTool::new(&figure, Point::new(2.0, 2.0), style);
    let bounds = Bounds::new(0.0, 10.0, 0.0, 10.0);

    assert_eq!(
        tool.coordinates_in_bounds(Point::new(5.0, 5.0), &bounds),
        Point::new(5.0, 5.0)
    );

    let clamped = tool.coordinates_in_bounds(Point::new(22.0, 7.0), &bounds);
    assert!((clamped.x - 9.2).abs() < 1e-9);
    assert!((clamped.y - 3.8).abs() < 1e-9);
}
