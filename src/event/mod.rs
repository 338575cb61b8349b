mod bus;
mod events;

pub use bus::EventBus;
pub use events::{HistoryState, WhiteboardEvent};

pub trait EventHandler {
    fn handle_event(&mut self, event: &WhiteboardEvent);
}

impl<F: FnMut(&WhiteboardEvent)> EventHandler for F {
    fn handle_event(&mut self, event: &WhiteboardEvent) {
        self(event)
    }
}
