use super::{ActionLog, WhiteboardAction};

impl ActionLog {
    /// Undo the newest entry.
    ///
    /// Popping a stroke is the whole undo. Popping an erase record puts its
    /// strokes back, newest removal first, each at the index it was removed
    /// from, which restores the exact pre-erase order. Returns `false` on an
    /// empty log.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.pop_last() else {
            return false;
        };
        if let WhiteboardAction::Erase(erase) = last {
            for stroke in erase.into_erased().into_iter().rev() {
                self.restore(stroke);
            }
        }
        true
    }
}
