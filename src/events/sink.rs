use std::cell::RefCell;

use super::Event;

/// Receiver of [`Event`]s emitted by the map widget.
pub trait EventSink {
    fn send(&self, event: Event);
}

impl EventSink for RefCell<Vec<Event>> {
    fn send(&self, event: Event) {
        self.borrow_mut().push(event);
    }
}

#[cfg(feature = "events")]
impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        if let Err(err) = crossbeam::channel::Sender::send(self, event) {
            log::warn!("dropping map event, receiver is gone: {err}");
        }
    }
}
