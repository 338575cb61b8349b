mod common;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use common::{draw_line, whiteboard, whiteboard_with, DISPLAY};
use eframe_whiteboard::{
    SoftwareCompositor, Whiteboard, WhiteboardConfig, WhiteboardError, WhiteboardEvent,
};
use egui::Color32;

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("whiteboard-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_raster_is_square_of_longer_side() {
    let (wb, _) = whiteboard();
    assert_eq!(wb.raster().dimensions(), (DISPLAY.0, DISPLAY.0));
    assert_eq!(wb.size(), DISPLAY);
}

#[test]
fn test_resize_to_nothing_keeps_raster() {
    let (mut wb, _) = whiteboard();
    let version = wb.raster_version();

    let result = wb.resize(0, 120);
    assert!(matches!(
        result,
        Err(WhiteboardError::SurfaceNotReady { width: 0, height: 120 })
    ));
    assert!(wb.resize(120, -1).is_err());
    assert_eq!(wb.raster_version(), version);
    assert_eq!(wb.raster().dimensions(), (DISPLAY.0, DISPLAY.0));
}

#[test]
fn test_resize_stretches_without_replaying() {
    let (mut wb, recorded) = whiteboard();
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    let clears = recorded.borrow().clears;

    wb.resize(200, 150).unwrap();
    assert_eq!(wb.size(), (200, 150));
    assert_eq!(wb.raster().dimensions(), (200, 150));
    assert_eq!(recorded.borrow().clears, clears);
    assert_eq!(wb.log().len(), 1);
}

#[test]
fn test_software_compositor_paints_strokes() {
    let mut wb = Whiteboard::new(WhiteboardConfig::default(), 200, 200, Box::new(SoftwareCompositor::new()));
    draw_line(&mut wb, &[(10.0, 50.0), (190.0, 50.0)]);
    assert_eq!(wb.raster().get_pixel(100, 50)[3], 255);
    assert_eq!(wb.raster().get_pixel(100, 150)[3], 0);

    wb.undo();
    assert_eq!(wb.raster().get_pixel(100, 50)[3], 0);
}

#[test]
fn test_export_jpeg() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    let bytes = wb.export_jpeg().unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_save_whiteboard_names_file_by_time() {
    let (wb, _) = whiteboard();
    let dir = scratch_dir("save");
    let time = NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|date| date.and_hms_opt(14, 5, 7))
        .unwrap();

    let path = wb.save_whiteboard(&dir, &time).unwrap();
    assert_eq!(path, dir.join("Whiteboard20240309140507.jpg"));
    assert!(path.is_file());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_save_without_destination() {
    let (wb, _) = whiteboard();
    let dir = std::env::temp_dir().join("whiteboard-no-such-dir").join("nested");
    let result = wb.save_whiteboard(&dir, &eframe_whiteboard::util::time::now());
    assert!(matches!(result, Err(WhiteboardError::NoDestination(path)) if path == dir));
}

#[test]
fn test_inverted_theme_uses_white_pen() {
    let mut config = WhiteboardConfig::default();
    config.inverted = true;
    let (wb, _) = whiteboard_with(config);
    assert_eq!(wb.foreground_color(), Color32::WHITE);
    assert_eq!(wb.pen_color(), Color32::WHITE);

    let (wb, _) = whiteboard();
    assert_eq!(wb.pen_color(), Color32::BLACK);
}

#[test]
fn test_pen_color_and_width_apply_to_new_strokes() {
    let (mut wb, _) = whiteboard();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    wb.events().subscribe(Box::new(move |event: &WhiteboardEvent| {
        sink.borrow_mut().push(event.clone());
    }));

    wb.set_pen_color(Color32::RED);
    wb.set_stroke_width(12);
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);

    assert_eq!(seen.borrow().first(), Some(&WhiteboardEvent::PenColorChanged(Color32::RED)));
    let stroke = wb.log().live_strokes().next().unwrap();
    assert_eq!(stroke.paint().color, Color32::RED);
    assert_eq!(stroke.paint().width, 12.0);
}

#[test]
fn test_clear_emits_cleared_then_history() {
    let (mut wb, _) = whiteboard();
    draw_line(&mut wb, &[(0.0, 20.0), (100.0, 20.0)]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    wb.events().subscribe(Box::new(move |event: &WhiteboardEvent| {
        sink.borrow_mut().push(event.clone());
    }));

    wb.clear();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], WhiteboardEvent::Cleared);
    assert!(matches!(seen[1], WhiteboardEvent::HistoryChanged(state) if state.history_empty));
}
