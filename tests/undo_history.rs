mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{draw_line, erase_at, tap, whiteboard};
use eframe_whiteboard::{HistoryState, StrokeAction, StrokeId, StrokeShape, WhiteboardAction, WhiteboardEvent};
use egui::Pos2;

fn live_ids(whiteboard: &eframe_whiteboard::Whiteboard) -> Vec<StrokeId> {
    whiteboard.log().live_strokes().map(StrokeAction::id).collect()
}

#[test]
fn test_erase_straight_line_then_undo() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 0.0), (100.0, 0.0)]);
    assert!(matches!(wb.log().entries()[0].as_stroke().map(StrokeAction::shape), Some(StrokeShape::Path(_))));

    assert!(wb.erase(Pos2::new(50.0, 0.0)));
    assert!(!wb.has_any_visible_stroke());
    assert!(wb.is_next_undo_an_erase());

    wb.undo();
    assert!(wb.has_any_visible_stroke());
    assert_eq!(wb.log().len(), 1);
    assert!(!wb.is_next_undo_an_erase());
}

#[test]
fn test_undo_tap() {
    let (mut wb, _) = whiteboard();
    tap(&mut wb, 10.0, 10.0);
    assert!(matches!(
        wb.log().entries()[0].as_stroke().map(StrokeAction::shape),
        Some(StrokeShape::Point(p)) if *p == Pos2::new(10.0, 10.0)
    ));

    wb.undo();
    assert!(wb.log().is_empty());
    assert!(wb.is_history_empty());
}

#[test]
fn test_erase_second_stroke_and_restore_its_index() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 0.0), (100.0, 0.0)]);
    draw_line(&mut wb, &[(200.0, 200.0), (300.0, 200.0)]);
    let ids = live_ids(&wb);

    assert!(wb.erase(Pos2::new(250.0, 200.0)));
    let entries = wb.log().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].as_stroke().map(StrokeAction::id), Some(ids[0]));
    let WhiteboardAction::Erase(erase) = &entries[1] else {
        panic!("expected an erase record");
    };
    assert_eq!(erase.erased()[0].id(), ids[1]);
    assert_eq!(erase.erased()[0].original_index(), Some(1));

    wb.undo();
    assert_eq!(live_ids(&wb), ids);
    assert_eq!(wb.log().len(), 2);
}

#[test]
fn test_one_erase_removes_non_adjacent_strokes() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 50.0), (200.0, 50.0)]);
    draw_line(&mut wb, &[(300.0, 0.0), (300.0, 200.0)]);
    draw_line(&mut wb, &[(100.0, 0.0), (100.0, 200.0)]);
    let before = wb.log().clone();
    let ids = live_ids(&wb);

    assert!(wb.erase(Pos2::new(100.0, 50.0)));
    assert_eq!(live_ids(&wb), vec![ids[1]]);
    assert_eq!(wb.log().len(), 2);

    wb.undo();
    assert_eq!(*wb.log(), before);
}

#[test]
fn test_degenerate_lines_are_erasable() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(50.0, 10.0), (50.0, 100.0)]);
    assert!(wb.erase(Pos2::new(55.0, 60.0)));

    draw_line(&mut wb, &[(10.0, 150.0), (90.0, 150.0)]);
    assert!(wb.erase(Pos2::new(30.0, 145.0)));
    assert!(!wb.has_any_visible_stroke());
}

#[test]
fn test_erase_miss_changes_nothing() {
    let (mut wb, recorded) = whiteboard();
    draw_line(&mut wb, &[(0.0, 0.0), (100.0, 0.0)]);
    let clears = recorded.borrow().clears;

    assert!(!wb.erase(Pos2::new(200.0, 200.0)));
    assert_eq!(wb.log().len(), 1);
    assert_eq!(recorded.borrow().clears, clears);
}

#[test]
fn test_replay_draws_exactly_the_live_strokes() {
    let (mut wb, recorded) = whiteboard();
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    tap(&mut wb, 150.0, 150.0);
    draw_line(&mut wb, &[(0.0, 250.0), (100.0, 250.0)]);
    draw_line(&mut wb, &[(200.0, 20.0), (300.0, 20.0)]);

    wb.erase(Pos2::new(150.0, 150.0));
    wb.erase(Pos2::new(50.0, 250.0));
    let live: Vec<StrokeShape> = wb.log().live_strokes().map(|s| s.shape().clone()).collect();
    assert_eq!(live.len(), 2);
    assert_eq!(recorded.borrow().drawn, live);

    wb.undo();
    let live: Vec<StrokeShape> = wb.log().live_strokes().map(|s| s.shape().clone()).collect();
    assert_eq!(live.len(), 3);
    assert_eq!(recorded.borrow().drawn, live);
}

#[test]
fn test_undo_on_empty_history_touches_nothing() {
    let (mut wb, recorded) = whiteboard();
    let (clears, repaints) = {
        let recorded = recorded.borrow();
        (recorded.clears, recorded.repaints)
    };

    wb.undo();
    assert!(wb.is_history_empty());
    assert_eq!(recorded.borrow().clears, clears);
    assert_eq!(recorded.borrow().repaints, repaints);
}

#[test]
fn test_clear_drops_history() {
    let (mut wb, recorded) = whiteboard();
    draw_line(&mut wb, &[(0.0, 0.0), (100.0, 0.0)]);
    wb.erase(Pos2::new(50.0, 0.0));
    let clears = recorded.borrow().clears;

    wb.clear();
    assert!(wb.is_history_empty());
    assert_eq!(recorded.borrow().clears, clears + 1);
    wb.undo();
    assert!(wb.is_history_empty());
}

#[test]
fn test_consecutive_erases_stay_separate() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    draw_line(&mut wb, &[(0.0, 200.0), (100.0, 200.0)]);
    erase_at(&mut wb, 50.0, 20.0);
    erase_at(&mut wb, 50.0, 200.0);
    assert_eq!(wb.log().len(), 2);
    assert!(wb.log().entries().iter().all(WhiteboardAction::is_erase));

    wb.undo();
    assert_eq!(wb.log().live_strokes().count(), 1);
    assert!(wb.is_next_undo_an_erase());
    wb.undo();
    assert_eq!(wb.log().live_strokes().count(), 2);
    assert!(!wb.is_next_undo_an_erase());
}

#[test]
fn test_history_events_only_on_relevant_changes() {
    let (mut wb, _) = whiteboard();
    let seen: Rc<RefCell<Vec<HistoryState>>> = Rc::default();
    let sink = Rc::clone(&seen);
    wb.events().subscribe(Box::new(move |event: &WhiteboardEvent| {
        if let WhiteboardEvent::HistoryChanged(state) = event {
            sink.borrow_mut().push(*state);
        }
    }));

    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    draw_line(&mut wb, &[(0.0, 200.0), (100.0, 200.0)]);
    assert_eq!(seen.borrow().len(), 1);
    assert!(!seen.borrow()[0].history_empty);

    wb.erase(Pos2::new(50.0, 20.0));
    assert_eq!(seen.borrow().len(), 2);
    assert!(seen.borrow()[1].next_undo_is_erase);

    wb.erase(Pos2::new(50.0, 200.0));
    let last = *seen.borrow().last().unwrap();
    assert!(!last.any_visible_stroke);
}

#[test]
fn test_erase_far_outside_the_surface_is_a_miss() {
    let (mut wb, recorded) = whiteboard();
    draw_line(&mut wb, &[(0.0, 0.0), (100.0, 0.0)]);
    let clears = recorded.borrow().clears;

    assert!(!wb.erase(Pos2::new(3.0e9, 3.0e9)));
    assert!(!wb.erase(Pos2::new(-3.0e9, f32::MAX)));
    erase_at(&mut wb, 3.0e9, -3.0e9);

    assert_eq!(wb.log().len(), 1);
    assert!(wb.has_any_visible_stroke());
    assert_eq!(recorded.borrow().clears, clears);
}
