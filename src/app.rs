use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use egui::{Color32, ColorImage, Pos2, TextureHandle, TextureOptions};

use crate::config::WhiteboardConfig;
use crate::event::{HistoryState, WhiteboardEvent};
use crate::input::{MultiTouchHandler, PointerEvent, PointerPhase, ToolKind};
use crate::renderer::SoftwareCompositor;
use crate::util::time;
use crate::whiteboard::Whiteboard;

const PEN_COLORS: [(Color32, &str); 6] = [
    (Color32::BLACK, "Black"),
    (Color32::WHITE, "White"),
    (Color32::from_rgb(0xF4, 0x43, 0x36), "Red"),
    (Color32::from_rgb(0x4C, 0xAF, 0x50), "Green"),
    (Color32::from_rgb(0x21, 0x96, 0xF3), "Blue"),
    (Color32::from_rgb(0xFF, 0xEB, 0x3B), "Yellow"),
];

/// Second-finger gestures have nothing behind the board to act on in the
/// desktop host, so they are only logged
struct LoggingMultiTouch;

impl MultiTouchHandler for LoggingMultiTouch {
    fn tap_on_current_card(&mut self, x: i32, y: i32) {
        log::debug!("Second finger tap at ({}, {})", x, y);
    }

    fn scroll_current_card_by(&mut self, dy: i32) {
        log::debug!("Second finger scroll by {}", dy);
    }
}

fn needs_resize(current: (u32, u32), wanted: (i32, i32), rejected: Option<(i32, i32)>) -> bool {
    wanted != (current.0 as i32, current.1 as i32) && rejected != Some(wanted)
}

/// Native host showing the whiteboard with a small toolbar
pub struct WhiteboardApp {
    whiteboard: Whiteboard,
    texture: Option<TextureHandle>,
    texture_version: Option<u64>,
    /// Latest history state reported by the whiteboard
    history: Rc<RefCell<HistoryState>>,
    export_dir: PathBuf,
    status: Option<String>,
    /// Touch contacts currently down, in press order
    touches: Vec<(u64, Pos2)>,
    touch_input: bool,
    /// Last canvas size the whiteboard refused; not retried until it changes
    rejected_size: Option<(i32, i32)>,
}

impl WhiteboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<WhiteboardConfig>) -> Self {
        let config = config
            .or_else(|| cc.storage.and_then(|storage| eframe::get_value(storage, eframe::APP_KEY)))
            .unwrap_or_default();

        let screen = cc.egui_ctx.screen_rect();
        let (width, height) = (screen.width().max(1.0) as u32, screen.height().max(1.0) as u32);
        let compositor = SoftwareCompositor::with_repaint_context(cc.egui_ctx.clone());
        let whiteboard = Whiteboard::new(config, width, height, Box::new(compositor))
            .with_multi_touch(Box::new(LoggingMultiTouch));

        let history = Rc::new(RefCell::new(whiteboard.history_state()));
        let sink = Rc::clone(&history);
        whiteboard.events().subscribe(Box::new(move |event: &WhiteboardEvent| {
            if let WhiteboardEvent::HistoryChanged(state) = event {
                *sink.borrow_mut() = *state;
            }
        }));

        Self {
            whiteboard,
            texture: None,
            texture_version: None,
            history,
            export_dir: std::env::current_dir().unwrap_or_default(),
            status: None,
            touches: Vec::new(),
            touch_input: false,
            rejected_size: None,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let history = *self.history.borrow();
        ui.horizontal(|ui| {
            for (color, name) in PEN_COLORS {
                let selected = self.whiteboard.pen_color() == color;
                if ui.selectable_label(selected, name).clicked() {
                    self.whiteboard.set_pen_color(color);
                }
            }

            ui.separator();
            let mut width = self.whiteboard.stroke_width();
            ui.label("Width:");
            if ui.add(egui::Slider::new(&mut width, 1..=60)).changed() {
                self.whiteboard.set_stroke_width(width);
            }

            let mut stylus_only = self.whiteboard.config().stylus_only;
            if ui.checkbox(&mut stylus_only, "Stylus only").changed() {
                self.whiteboard.set_stylus_only(stylus_only);
            }

            ui.separator();
            if history.any_visible_stroke {
                let mut eraser = self.whiteboard.eraser_mode();
                if ui.toggle_value(&mut eraser, "Eraser").changed() {
                    self.whiteboard.set_eraser_mode(eraser);
                }
            } else if self.whiteboard.eraser_mode() {
                // Nothing left to erase
                self.whiteboard.set_eraser_mode(false);
            }

            if !history.history_empty {
                let label = if history.next_undo_is_erase { "Undo erase stroke" } else { "Undo stroke" };
                if ui.button(label).clicked() {
                    self.whiteboard.undo();
                }
            }
            if ui.button("Clear").clicked() {
                self.whiteboard.clear();
            }
            if ui.button("Save").clicked() {
                self.status = Some(match self.whiteboard.save_whiteboard(&self.export_dir, &time::now()) {
                    Ok(path) => format!("Saved {}", path.display()),
                    Err(err) => {
                        log::error!("Failed to save whiteboard: {}", err);
                        err.to_string()
                    }
                });
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });
    }

    /// Follow the canvas size. A collapsed panel reports a zero size; the
    /// old raster is kept and the same size is not retried every frame.
    fn sync_size(&mut self, canvas: egui::Rect) {
        let wanted = (canvas.width() as i32, canvas.height() as i32);
        if !needs_resize(self.whiteboard.size(), wanted, self.rejected_size) {
            return;
        }
        match self.whiteboard.resize(wanted.0, wanted.1) {
            Ok(()) => self.rejected_size = None,
            Err(err) => {
                log::debug!("Keeping the previous raster: {}", err);
                self.rejected_size = Some(wanted);
            }
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let version = self.whiteboard.raster_version();
        if self.texture_version == Some(version) {
            return;
        }
        let raster = self.whiteboard.raster();
        let image = ColorImage::from_rgba_unmultiplied(
            [raster.width() as usize, raster.height() as usize],
            raster.as_raw(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => self.texture = Some(ctx.load_texture("whiteboard", image, TextureOptions::LINEAR)),
        }
        self.texture_version = Some(version);
    }

    /// Turn this frame's raw egui input into whiteboard pointer events.
    /// Contacts that start outside the canvas are ignored.
    fn pointer_events(&mut self, ctx: &egui::Context, canvas: egui::Rect) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let local = |pos: Pos2| pos - canvas.min.to_vec2();
        ctx.input(|input| {
            for event in &input.raw.events {
                match event {
                    egui::Event::Touch { id, phase, pos, .. } => {
                        // Touch screens also emit emulated mouse events; use the touches only
                        self.touch_input = true;
                        if *phase == egui::TouchPhase::Start && !canvas.contains(*pos) {
                            continue;
                        }
                        if let Some(event) = self.touch_event(id.0, *phase, local(*pos)) {
                            events.push(event);
                        }
                    }
                    egui::Event::PointerButton { pos, button: egui::PointerButton::Primary, pressed, .. }
                        if !self.touch_input =>
                    {
                        if *pressed && !canvas.contains(*pos) {
                            continue;
                        }
                        let phase = if *pressed { PointerPhase::Press } else { PointerPhase::Release };
                        events.push(PointerEvent::new(phase, ToolKind::Mouse, local(*pos)));
                    }
                    egui::Event::PointerMoved(pos) if !self.touch_input && input.pointer.primary_down() => {
                        events.push(PointerEvent::new(PointerPhase::Move, ToolKind::Mouse, local(*pos)));
                    }
                    _ => {}
                }
            }
        });
        events
    }

    fn touch_event(&mut self, id: u64, phase: egui::TouchPhase, pos: Pos2) -> Option<PointerEvent> {
        let tracked = self.touches.iter().any(|(touch_id, _)| *touch_id == id);
        if phase != egui::TouchPhase::Start && !tracked {
            return None;
        }
        let phase = match phase {
            egui::TouchPhase::Start => {
                self.touches.push((id, pos));
                if self.touches.len() == 1 { PointerPhase::Press } else { PointerPhase::SecondaryPress }
            }
            egui::TouchPhase::Move => {
                if let Some(touch) = self.touches.iter_mut().find(|(touch_id, _)| *touch_id == id) {
                    touch.1 = pos;
                }
                PointerPhase::Move
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                if self.touches.len() > 1 { PointerPhase::SecondaryRelease } else { PointerPhase::Release }
            }
        };
        let event = PointerEvent::new(phase, ToolKind::Finger, pos).with_pointers(id, self.touches.clone());
        if matches!(phase, PointerPhase::Release | PointerPhase::SecondaryRelease) {
            self.touches.retain(|(touch_id, _)| *touch_id != id);
        }
        Some(event)
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.whiteboard.config());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("whiteboard_toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::drag());
            let rect = response.rect;

            self.sync_size(rect);

            for event in self.pointer_events(ctx, rect) {
                self.whiteboard.handle_touch_event(&event);
            }

            self.sync_texture(ctx);
            if let Some(texture) = &self.texture {
                let size = texture.size_vec2();
                let uv = egui::Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), egui::Rect::from_min_size(rect.min, size), uv, Color32::WHITE);
            }

            if let Some((path, paint)) = self.whiteboard.current_stroke() {
                let points: Vec<Pos2> = path.flatten().into_iter().map(|p| p + rect.min.to_vec2()).collect();
                painter.add(egui::Shape::line(points, egui::Stroke::new(paint.width, paint.color)));
            }
        });
    }
}
