use egui::Pos2;

/// Phase of a pointer event, mirroring the platform's touch actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// First contact goes down
    Press,
    Move,
    /// Last contact lifts
    Release,
    /// An additional contact goes down while another is held
    SecondaryPress,
    /// An additional contact lifts while another is still held
    SecondaryRelease,
    /// A stylus barrel button went down
    ButtonPress,
    /// A stylus barrel button went up
    ButtonRelease,
}

/// Kind of device that produced the contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Finger,
    Stylus,
    /// The eraser end of a stylus
    EraserTip,
    Mouse,
}

/// One event from the input source
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Device of the contact that caused this event
    pub tool: ToolKind,
    /// Stylus primary barrel button is held
    pub stylus_button: bool,
    /// Position of the contact that caused this event
    pub position: Pos2,
    /// Intermediate samples batched into a move, oldest first
    pub history: Vec<Pos2>,
    /// Id of the contact that caused this event
    pub pointer_id: u64,
    /// Every contact currently down, including this one
    pub pointers: Vec<(u64, Pos2)>,
}

impl PointerEvent {
    /// Single-contact event with no history
    pub fn new(phase: PointerPhase, tool: ToolKind, position: Pos2) -> Self {
        Self {
            phase,
            tool,
            stylus_button: false,
            position,
            history: Vec::new(),
            pointer_id: 0,
            pointers: vec![(0, position)],
        }
    }

    pub fn with_history(mut self, history: Vec<Pos2>) -> Self {
        self.history = history;
        self
    }

    pub fn with_stylus_button(mut self, pressed: bool) -> Self {
        self.stylus_button = pressed;
        self
    }

    /// Attribute the event to contact `pointer_id` among `pointers`
    pub fn with_pointers(mut self, pointer_id: u64, pointers: Vec<(u64, Pos2)>) -> Self {
        self.pointer_id = pointer_id;
        self.pointers = pointers;
        self
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Current position of a contact, if it is still down
    pub fn position_of(&self, pointer_id: u64) -> Option<Pos2> {
        self.pointers
            .iter()
            .find(|(id, _)| *id == pointer_id)
            .map(|(_, pos)| *pos)
    }
}

/// What a second finger can do to the content behind the whiteboard
pub trait MultiTouchHandler {
    fn tap_on_current_card(&mut self, x: i32, y: i32);
    fn scroll_current_card_by(&mut self, dy: i32);
}

/// Tracks the second contact to tell a tap from a scroll
#[derive(Debug, Clone, Default)]
pub(crate) struct SecondFinger {
    pointer_id: u64,
    start: Pos2,
    current: Pos2,
    within_tap_tolerance: bool,
}

impl SecondFinger {
    /// Start a new round of tap/drag detection
    pub(crate) fn reinitialize(&mut self, event: &PointerEvent) {
        self.within_tap_tolerance = true;
        self.pointer_id = event.pointer_id;
        self.start = event.position_of(event.pointer_id).unwrap_or(event.position);
        self.current = self.start;
    }

    fn update(&mut self, event: &PointerEvent, tolerance: f32) -> bool {
        let Some(pos) = event.position_of(self.pointer_id) else {
            return false;
        };
        self.current = pos;
        let dx = (self.start.x - pos.x).abs();
        let dy = (self.start.y - pos.y).abs();
        if dx >= tolerance || dy >= tolerance {
            self.within_tap_tolerance = false;
        }
        true
    }

    /// Scroll by the vertical drag once the finger left the tap tolerance
    pub(crate) fn try_scroll(
        &mut self,
        event: &PointerEvent,
        tolerance: f32,
        handler: Option<&mut (dyn MultiTouchHandler + 'static)>,
    ) -> bool {
        if !self.update(event, tolerance) || self.within_tap_tolerance {
            return false;
        }
        let dy = (self.start.y - self.current.y) as i32;
        if dy != 0 {
            if let Some(handler) = handler {
                handler.scroll_current_card_by(dy);
                self.start = self.current;
            }
        }
        true
    }

    /// Forward a tap when the tracked finger lifts without having moved
    pub(crate) fn try_click(
        &mut self,
        event: &PointerEvent,
        tolerance: f32,
        handler: Option<&mut (dyn MultiTouchHandler + 'static)>,
    ) -> bool {
        if self.pointer_id != event.pointer_id {
            return false;
        }
        self.update(event, tolerance);
        match handler {
            Some(handler) if self.within_tap_tolerance => {
                handler.tap_on_current_card(self.current.x as i32, self.current.y as i32);
                true
            }
            _ => false,
        }
    }
}
