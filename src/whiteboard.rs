use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use egui::{Color32, Pos2};
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::action::{ActionLog, StrokeAction};
use crate::config::WhiteboardConfig;
use crate::error::{WhiteboardError, WhiteboardResult};
use crate::eraser::Eraser;
use crate::event::{EventBus, HistoryState, WhiteboardEvent};
use crate::export;
use crate::geometry::IntRect;
use crate::input::{MultiTouchHandler, PointerEvent, PointerPhase, SecondFinger, ToolKind};
use crate::renderer::RasterCompositor;
use crate::stroke::{Paint, SmoothPath, StrokeBuilder};

/// Free-hand annotation surface with an undoable stroke history.
///
/// Owns the action log, the backing raster and the stroke in progress. All
/// mutation happens on the caller's thread, one pointer event at a time.
pub struct Whiteboard {
    config: WhiteboardConfig,
    log: ActionLog,
    raster: RgbaImage,
    /// Bumped whenever the raster pixels change
    raster_version: u64,
    compositor: Box<dyn RasterCompositor>,
    eraser: Eraser,
    /// Display bounds; hit regions are clipped to these
    display: IntRect,
    /// Current on-screen size of the surface
    size: (u32, u32),
    foreground: Color32,
    paint: Paint,
    current: Option<StrokeBuilder>,
    eraser_mode: bool,
    second_finger: SecondFinger,
    multi_touch: Option<Box<dyn MultiTouchHandler>>,
    events: EventBus,
    reported: HistoryState,
}

impl Whiteboard {
    /// Create a blank whiteboard for a display of the given size.
    ///
    /// The raster is a square as large as the longer display side, so
    /// rotating the device never clips what was drawn.
    pub fn new(
        config: WhiteboardConfig,
        display_width: u32,
        display_height: u32,
        compositor: Box<dyn RasterCompositor>,
    ) -> Self {
        let side = display_width.max(display_height);
        let foreground = if config.inverted { Color32::WHITE } else { Color32::BLACK };
        let paint = Paint::new(foreground, config.stroke_width as f32);
        let mut whiteboard = Self {
            eraser: Eraser::new(config.eraser_half_width),
            config,
            log: ActionLog::new(),
            raster: RgbaImage::new(side, side),
            raster_version: 0,
            compositor,
            display: IntRect::new(0, 0, display_width as i32, display_height as i32),
            size: (display_width, display_height),
            foreground,
            paint,
            current: None,
            eraser_mode: false,
            second_finger: SecondFinger::default(),
            multi_touch: None,
            events: EventBus::new(),
            reported: HistoryState {
                history_empty: true,
                next_undo_is_erase: false,
                any_visible_stroke: false,
            },
        };
        whiteboard.clear();
        whiteboard
    }

    /// Route second-finger scrolls and taps to `handler`
    pub fn with_multi_touch(mut self, handler: Box<dyn MultiTouchHandler>) -> Self {
        self.multi_touch = Some(handler);
        self
    }

    /// Handle one pointer event: drawing and erasing first, then second
    /// finger gestures. Returns whether the event was consumed.
    pub fn handle_touch_event(&mut self, event: &PointerEvent) -> bool {
        self.handle_draw_event(event) || self.handle_multi_touch_event(event)
    }

    fn handle_draw_event(&mut self, event: &PointerEvent) -> bool {
        let pos = event.position;
        if event.tool == ToolKind::EraserTip || self.eraser_mode {
            self.erase(pos);
            return true;
        }
        if self.config.stylus_only && event.tool != ToolKind::Stylus {
            return false;
        }
        match event.phase {
            PointerPhase::Press => {
                if event.stylus_button {
                    self.erase(pos);
                } else {
                    self.draw_start(pos);
                    self.compositor.request_repaint();
                }
                true
            }
            PointerPhase::Move => {
                if event.stylus_button {
                    self.erase(pos);
                    return true;
                }
                if !self.is_currently_drawing() {
                    return false;
                }
                for sample in &event.history {
                    self.draw_along(*sample);
                }
                self.draw_along(pos);
                self.compositor.request_repaint();
                true
            }
            PointerPhase::Release => {
                if !self.is_currently_drawing() {
                    return false;
                }
                self.draw_finish();
                self.compositor.request_repaint();
                true
            }
            PointerPhase::SecondaryPress => {
                if self.is_currently_drawing() {
                    self.draw_abort();
                }
                false
            }
            PointerPhase::ButtonPress | PointerPhase::ButtonRelease => {
                if event.stylus_button {
                    self.erase(pos);
                }
                true
            }
            PointerPhase::SecondaryRelease => false,
        }
    }

    fn handle_multi_touch_event(&mut self, event: &PointerEvent) -> bool {
        if !self.config.handle_multi_touch || event.pointer_count() != 2 {
            return false;
        }
        let tolerance = self.config.touch_tolerance;
        match event.phase {
            PointerPhase::SecondaryPress => {
                self.second_finger.reinitialize(event);
                true
            }
            PointerPhase::Move => {
                self.second_finger
                    .try_scroll(event, tolerance, self.multi_touch.as_deref_mut())
            }
            PointerPhase::SecondaryRelease => {
                self.second_finger
                    .try_click(event, tolerance, self.multi_touch.as_deref_mut())
            }
            _ => false,
        }
    }

    fn draw_start(&mut self, pos: Pos2) {
        self.current = Some(StrokeBuilder::new(pos, self.config.touch_tolerance));
    }

    fn draw_along(&mut self, pos: Pos2) {
        if let Some(builder) = &mut self.current {
            builder.extend(pos);
        }
    }

    /// Record the stroke in progress and draw it straight onto the raster
    fn draw_finish(&mut self) {
        let Some(builder) = self.current.take() else {
            return;
        };
        let action = StrokeAction::new(builder.finish(), self.paint);
        action.draw(self.compositor.as_mut(), &mut self.raster);
        self.raster_version += 1;
        self.log.append(action);
        self.notify_history_if_necessary();
    }

    /// A second contact interrupts drawing: keep nothing of the stroke
    fn draw_abort(&mut self) {
        self.draw_finish();
        self.undo();
    }

    /// Erase every visible stroke touched by the eraser at `pos`, as one
    /// undoable step. Returns whether anything was erased.
    pub fn erase(&mut self, pos: Pos2) -> bool {
        let (x, y) = (pos.x as i32, pos.y as i32);
        let erased = self.eraser.erase(&mut self.log, x, y, self.display);
        if erased {
            self.replay();
            self.notify_history_if_necessary();
        }
        erased
    }

    /// Remove every stroke and the whole history
    pub fn clear(&mut self) {
        self.compositor.clear_raster(&mut self.raster);
        self.raster_version += 1;
        self.log.clear();
        self.compositor.request_repaint();
        self.events.emit(WhiteboardEvent::Cleared);
        self.reported = self.history_state();
        self.events.emit(WhiteboardEvent::HistoryChanged(self.reported));
    }

    /// Undo the last stroke or erase; a no-op on an empty history
    pub fn undo(&mut self) {
        if self.log.undo() {
            self.replay();
            self.notify_history_if_necessary();
        }
    }

    fn replay(&mut self) {
        self.log.replay(self.compositor.as_mut(), &mut self.raster);
        self.raster_version += 1;
    }

    pub fn is_history_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn has_any_visible_stroke(&self) -> bool {
        self.log.has_any_visible_stroke()
    }

    /// Lets the host label its undo control ("undo erase" vs "undo stroke")
    pub fn is_next_undo_an_erase(&self) -> bool {
        self.log.last_is_erase()
    }

    pub fn is_currently_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn history_state(&self) -> HistoryState {
        HistoryState {
            history_empty: self.is_history_empty(),
            next_undo_is_erase: self.is_next_undo_an_erase(),
            any_visible_stroke: self.has_any_visible_stroke(),
        }
    }

    /// Tell the host about history changes that affect its controls: the
    /// history became empty or non-empty, the kind of the next undo changed,
    /// or nothing is left to erase.
    fn notify_history_if_necessary(&mut self) {
        let state = self.history_state();
        if state.history_empty != self.reported.history_empty
            || state.next_undo_is_erase != self.reported.next_undo_is_erase
            || !state.any_visible_stroke
        {
            self.reported = state;
            self.events.emit(WhiteboardEvent::HistoryChanged(state));
        }
    }

    /// Follow a change of the on-screen size by stretching the raster.
    ///
    /// The history is not replayed. A non-positive size means the surface
    /// is not laid out yet; the previous raster is kept.
    pub fn resize(&mut self, width: i32, height: i32) -> WhiteboardResult<()> {
        if width <= 0 || height <= 0 {
            log::warn!(
                "Width or height <= 0: w: {} h: {} raster couldn't be resized",
                width,
                height
            );
            return Err(WhiteboardError::SurfaceNotReady { width, height });
        }
        let (width, height) = (width as u32, height as u32);
        self.raster = imageops::resize(&self.raster, width, height, FilterType::Triangle);
        self.raster_version += 1;
        self.size = (width, height);
        Ok(())
    }

    /// Composite the drawing onto a background contrasting with the pen and
    /// encode it as JPEG
    pub fn export_jpeg(&self) -> WhiteboardResult<Vec<u8>> {
        let background = export::contrasting_background(self.foreground);
        let flat = export::composite(&self.raster, self.size.0, self.size.1, background);
        export::encode_jpeg(&flat, export::JPEG_QUALITY)
    }

    /// Export into `dir` as `Whiteboard<timestamp>.jpg`
    pub fn save_whiteboard(&self, dir: &Path, time: &NaiveDateTime) -> WhiteboardResult<PathBuf> {
        if !dir.is_dir() {
            return Err(WhiteboardError::NoDestination(dir.to_path_buf()));
        }
        let bytes = self.export_jpeg()?;
        export::write_to_dir(dir, time, &bytes)
    }

    pub fn pen_color(&self) -> Color32 {
        self.paint.color
    }

    pub fn set_pen_color(&mut self, color: Color32) {
        log::debug!("Setting pen color to {:?}", color);
        self.paint.color = color;
        self.events.emit(WhiteboardEvent::PenColorChanged(color));
    }

    pub fn stroke_width(&self) -> u32 {
        self.config.stroke_width
    }

    /// Width for strokes drawn from now on
    pub fn set_stroke_width(&mut self, width: u32) {
        self.config.stroke_width = width;
        self.paint.width = width as f32;
    }

    /// Default pen colour for the theme: black, or white when inverted
    pub fn foreground_color(&self) -> Color32 {
        self.foreground
    }

    pub fn eraser_mode(&self) -> bool {
        self.eraser_mode
    }

    /// While on, every contact erases instead of drawing
    pub fn set_eraser_mode(&mut self, on: bool) {
        self.eraser_mode = on;
    }

    pub fn set_stylus_only(&mut self, on: bool) {
        self.config.stylus_only = on;
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn raster_version(&self) -> u64 {
        self.raster_version
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Path and paint of the stroke in progress, for live preview
    pub fn current_stroke(&self) -> Option<(&SmoothPath, &Paint)> {
        self.current.as_ref().map(|builder| (builder.preview(), &self.paint))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
