#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use eframe_whiteboard::{
    Paint, PointerEvent, PointerPhase, RasterCompositor, StrokeShape, ToolKind, Whiteboard,
    WhiteboardConfig,
};
use egui::Pos2;
use image::RgbaImage;

pub const DISPLAY: (u32, u32) = (400, 300);

/// What the whiteboard asked the compositor to do
#[derive(Debug, Default)]
pub struct Recorded {
    pub clears: usize,
    pub repaints: usize,
    /// Shapes drawn since the last clear
    pub drawn: Vec<StrokeShape>,
}

/// Compositor double that records calls instead of painting
#[derive(Clone, Default)]
pub struct RecordingCompositor {
    pub recorded: Rc<RefCell<Recorded>>,
}

impl RasterCompositor for RecordingCompositor {
    fn clear_raster(&mut self, _raster: &mut RgbaImage) {
        let mut recorded = self.recorded.borrow_mut();
        recorded.clears += 1;
        recorded.drawn.clear();
    }

    fn draw_onto(&mut self, _raster: &mut RgbaImage, shape: &StrokeShape, _paint: &Paint) {
        self.recorded.borrow_mut().drawn.push(shape.clone());
    }

    fn request_repaint(&mut self) {
        self.recorded.borrow_mut().repaints += 1;
    }
}

pub fn whiteboard() -> (Whiteboard, Rc<RefCell<Recorded>>) {
    whiteboard_with(WhiteboardConfig::default())
}

pub fn whiteboard_with(config: WhiteboardConfig) -> (Whiteboard, Rc<RefCell<Recorded>>) {
    let compositor = RecordingCompositor::default();
    let recorded = Rc::clone(&compositor.recorded);
    let whiteboard = Whiteboard::new(config, DISPLAY.0, DISPLAY.1, Box::new(compositor));
    (whiteboard, recorded)
}

pub fn press(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerPhase::Press, ToolKind::Finger, Pos2::new(x, y))
}

pub fn moved(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerPhase::Move, ToolKind::Finger, Pos2::new(x, y))
}

pub fn release(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerPhase::Release, ToolKind::Finger, Pos2::new(x, y))
}

/// Finger stroke through the given points
pub fn draw_line(whiteboard: &mut Whiteboard, points: &[(f32, f32)]) {
    let (first, rest) = points.split_first().expect("at least one point");
    whiteboard.handle_touch_event(&press(first.0, first.1));
    for &(x, y) in rest {
        whiteboard.handle_touch_event(&moved(x, y));
    }
    let last = points.last().expect("at least one point");
    whiteboard.handle_touch_event(&release(last.0, last.1));
}

pub fn tap(whiteboard: &mut Whiteboard, x: f32, y: f32) {
    whiteboard.handle_touch_event(&press(x, y));
    whiteboard.handle_touch_event(&release(x, y));
}

/// One eraser-tip contact at (x, y)
pub fn erase_at(whiteboard: &mut Whiteboard, x: f32, y: f32) {
    let event = PointerEvent::new(PointerPhase::Press, ToolKind::EraserTip, Pos2::new(x, y));
    whiteboard.handle_touch_event(&event);
}
