use std::cell::RefCell;

use crate::event::{EventHandler, WhiteboardEvent};

type Handlers = RefCell<Vec<Box<dyn EventHandler>>>;

/// Broadcasts whiteboard events to subscribed handlers, in subscription order.
///
/// A handler may subscribe further handlers while it runs; those start
/// receiving events from the next emit. Handlers must not emit themselves.
#[derive(Default)]
pub struct EventBus {
    handlers: Handlers,
    /// Subscribed during a delivery
    pending: Handlers,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventBus({} handlers)", self.handler_count())
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(handler),
            Err(_) => self.pending.borrow_mut().push(handler),
        }
    }

    pub fn emit(&self, event: WhiteboardEvent) {
        let mut handlers = self.handlers.borrow_mut();
        for handler in handlers.iter_mut() {
            handler.handle_event(&event);
        }
        handlers.append(&mut self.pending.borrow_mut());
    }

    pub fn handler_count(&self) -> usize {
        let delivering = self.handlers.try_borrow().map_or(0, |handlers| handlers.len());
        delivering + self.pending.borrow().len()
    }
}
