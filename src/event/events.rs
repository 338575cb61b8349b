use egui::Color32;

/// Snapshot of what the host's undo and eraser controls depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryState {
    pub history_empty: bool,
    /// The next undo would restore erased strokes rather than remove a stroke
    pub next_undo_is_erase: bool,
    pub any_visible_stroke: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WhiteboardEvent {
    HistoryChanged(HistoryState),
    PenColorChanged(Color32),
    Cleared,
}
